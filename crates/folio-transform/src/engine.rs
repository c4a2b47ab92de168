//! Schema traversal: assembling one nested target record per legacy row.

use serde_json::Value;
use tracing::{debug, error};
use uuid::Uuid;

use folio_model::{
    LegacyRecord, PropertyDescriptor, PropertyKind, RecordMap, Result, TargetRecord, TargetSchema,
    TransformationError, TransformationStats,
};

use crate::resolver::PropertyResolver;

/// Field names the record system reserves on every record; the schema also
/// declares them but they are never mapped from legacy data.
const RESERVED_PROPERTIES: [&str; 3] = ["id", "metadata", "type"];

/// Prefix of computed fields the catalog derives on its side.
const COMPUTED_PREFIX: &str = "effective";

/// Bounds and allowlists for the positional-slot scans.
///
/// Flat legacy rows express repetitions as indexed column variants, so the
/// engine probes a bounded number of synthetic slots instead of scanning
/// unbounded. The caps assume no legacy record repeats a field more often;
/// both are caller-configurable.
#[derive(Debug, Clone)]
pub struct TraversalOptions {
    /// Slot cap for arrays nested inside object properties.
    pub nested_slot_cap: usize,
    /// Slot cap for top-level repeatable arrays of objects.
    pub array_slot_cap: usize,
    /// Array child fields exempt from the all-non-empty slot rule.
    pub excluded_slot_fields: Vec<String>,
}

impl Default for TraversalOptions {
    fn default() -> Self {
        Self {
            nested_slot_cap: 5,
            array_slot_cap: 15,
            excluded_slot_fields: vec!["staffOnly".to_string()],
        }
    }
}

/// Walks the target schema in declared property order and assembles the
/// output record, delegating every value decision to a [`PropertyResolver`].
pub struct MappingEngine<'a> {
    schema: &'a TargetSchema,
    record_map: &'a RecordMap,
    metadata: Value,
    options: TraversalOptions,
}

impl<'a> MappingEngine<'a> {
    pub fn new(
        schema: &'a TargetSchema,
        record_map: &'a RecordMap,
        metadata: Value,
        options: TraversalOptions,
    ) -> Self {
        Self {
            schema,
            record_map,
            metadata,
            options,
        }
    }

    pub fn options(&self) -> &TraversalOptions {
        &self.options
    }

    /// Map one legacy row to a nested target record.
    ///
    /// Per-field `Data` errors are caught, counted under "Data issues
    /// found", and the remaining fields of the record keep mapping. Other
    /// error kinds propagate and fail the record (or the run).
    pub fn map_record(
        &self,
        resolver: &mut dyn PropertyResolver,
        stats: &mut TransformationStats,
        legacy: &LegacyRecord,
        index_or_id: &str,
    ) -> Result<TargetRecord> {
        let mut record = self.instantiate_record(stats);
        for prop in &self.schema.properties {
            if prop.is_deprecated {
                stats.report_target_field(&format!("{} (deprecated)", prop.name), false, true);
                continue;
            }
            if RESERVED_PROPERTIES.contains(&prop.name.as_str())
                || prop.name.starts_with(COMPUTED_PREFIX)
                || prop.is_virtual
            {
                continue;
            }
            let outcome = match &prop.kind {
                PropertyKind::Basic => self.map_basic(
                    resolver,
                    stats,
                    legacy,
                    index_or_id,
                    &prop.name,
                    &prop.name,
                    &mut record,
                ),
                PropertyKind::Object(children) => self.map_object(
                    resolver,
                    stats,
                    legacy,
                    index_or_id,
                    &prop.name,
                    children,
                    &mut record,
                ),
                PropertyKind::ArrayOfObject(children) => self.map_object_array(
                    resolver,
                    stats,
                    legacy,
                    index_or_id,
                    &prop.name,
                    children,
                    &mut record,
                ),
                PropertyKind::ArrayOfString => self.map_string_array(
                    resolver,
                    stats,
                    legacy,
                    index_or_id,
                    &prop.name,
                    &mut record,
                ),
                PropertyKind::ArrayOfOther(item_kind) => {
                    stats.report_target_field(
                        &format!("Unhandled array of {item_kind}: {}", prop.name),
                        false,
                        false,
                    );
                    Ok(())
                }
            };
            if let Err(err) = outcome {
                match err {
                    TransformationError::Data { .. } => {
                        stats.add_general("Data issues found");
                        error!(field = %prop.name, %err, "field left unset, record continues");
                    }
                    other => return Err(other),
                }
            }
        }
        record.remove("type");
        Ok(record)
    }

    /// Raise when a finished record misses declared required fields,
    /// listing every missing field at once.
    pub fn validate_required(
        &self,
        record: &TargetRecord,
        index_or_id: &str,
        stats: &mut TransformationStats,
    ) -> Result<()> {
        let missing: Vec<String> = self
            .schema
            .required
            .iter()
            .filter(|name| !record.contains_key(*name))
            .cloned()
            .collect();
        if missing.is_empty() {
            return Ok(());
        }
        for field in &missing {
            stats.add_to_report("Record validation", field);
        }
        Err(TransformationError::FailedValidation {
            index_or_id: index_or_id.to_string(),
            fields: missing,
        })
    }

    /// Seed the output record with its identifier and the metadata stamp
    /// supplied by the catalog client, plus the bookkeeping `type` marker
    /// that is stripped again before the record is returned.
    fn instantiate_record(&self, stats: &mut TransformationStats) -> TargetRecord {
        let mut record = TargetRecord::new();
        record.insert(
            "id".to_string(),
            Value::String(Uuid::new_v4().to_string()),
        );
        record.insert("metadata".to_string(), self.metadata.clone());
        record.insert("type".to_string(), Value::String("object".to_string()));
        stats.report_target_field("id", true, false);
        stats.report_target_field("metadata", true, false);
        record
    }

    #[allow(clippy::too_many_arguments)]
    fn map_basic(
        &self,
        resolver: &mut dyn PropertyResolver,
        stats: &mut TransformationStats,
        legacy: &LegacyRecord,
        index_or_id: &str,
        path: &str,
        key: &str,
        out: &mut TargetRecord,
    ) -> Result<()> {
        if !self.record_map.has_property(path, legacy) {
            stats.report_target_field(path, false, false);
            return Ok(());
        }
        let value = resolver.get_value(legacy, path, index_or_id, 0, stats)?;
        let text = value.into_joined();
        let legacy_field = self
            .record_map
            .first_legacy_field(path)
            .unwrap_or_default()
            .to_string();
        if text.is_empty() {
            stats.report_legacy_field(&legacy_field, true, true);
            stats.report_target_field(path, true, true);
        } else {
            out.insert(key.to_string(), Value::String(text));
            stats.report_legacy_field(&legacy_field, true, false);
            stats.report_target_field(path, true, false);
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn map_object(
        &self,
        resolver: &mut dyn PropertyResolver,
        stats: &mut TransformationStats,
        legacy: &LegacyRecord,
        index_or_id: &str,
        name: &str,
        children: &[PropertyDescriptor],
        out: &mut TargetRecord,
    ) -> Result<()> {
        let mut child_object = TargetRecord::new();
        for child in children {
            if child.is_virtual {
                continue;
            }
            let child_path = format!("{name}.{}", child.name);
            match &child.kind {
                PropertyKind::Basic => {
                    let value = resolver.get_value(legacy, &child_path, index_or_id, 0, stats)?;
                    let text = value.into_joined();
                    if !text.is_empty() {
                        child_object.insert(child.name.clone(), Value::String(text));
                    }
                }
                PropertyKind::ArrayOfObject(sub_children) => {
                    let slots = self.collect_nested_slots(
                        resolver,
                        stats,
                        legacy,
                        index_or_id,
                        &child_path,
                        sub_children,
                    )?;
                    if !slots.is_empty() {
                        child_object.insert(child.name.clone(), Value::Array(slots));
                    }
                }
                PropertyKind::ArrayOfString => {
                    let mut values = Vec::new();
                    for slot in 0..self.options.nested_slot_cap {
                        let slot_path = format!("{child_path}[{slot}]");
                        let value =
                            resolver.get_value(legacy, &slot_path, index_or_id, slot, stats)?;
                        let text = value.into_joined();
                        if text.is_empty() {
                            break;
                        }
                        values.push(Value::String(text));
                    }
                    if !values.is_empty() {
                        child_object.insert(child.name.clone(), Value::Array(values));
                    }
                }
                PropertyKind::Object(_) => {
                    // Traversal recurses exactly one object level; there is
                    // no legacy column convention for anything deeper.
                    debug!(path = %child_path, "object nested below one level skipped");
                    stats.report_target_field(
                        &format!("Unhandled nested object: {child_path}"),
                        false,
                        false,
                    );
                }
                PropertyKind::ArrayOfOther(item_kind) => {
                    stats.report_target_field(
                        &format!("Unhandled array of {item_kind}: {child_path}"),
                        false,
                        false,
                    );
                }
            }
        }
        if !child_object.is_empty() {
            out.insert(name.to_string(), Value::Object(child_object));
        }
        Ok(())
    }

    /// Probe synthetic slots for an array nested inside an object property
    /// and stop at the first slot that comes back entirely empty.
    fn collect_nested_slots(
        &self,
        resolver: &mut dyn PropertyResolver,
        stats: &mut TransformationStats,
        legacy: &LegacyRecord,
        index_or_id: &str,
        parent_path: &str,
        children: &[PropertyDescriptor],
    ) -> Result<Vec<Value>> {
        let mut slots = Vec::new();
        for slot in 0..self.options.nested_slot_cap {
            let mut slot_object = TargetRecord::new();
            for child in children {
                if child.is_virtual {
                    continue;
                }
                let sub_path = format!("{parent_path}[{slot}].{}", child.name);
                let value = resolver.get_value(legacy, &sub_path, index_or_id, slot, stats)?;
                let text = value.into_joined();
                if !text.is_empty() {
                    slot_object.insert(child.name.clone(), Value::String(text));
                }
            }
            if slot_object.is_empty() {
                if slot == 0 {
                    stats.add_to_report("Skipped properties since empty", parent_path);
                }
                break;
            }
            slots.push(Value::Object(slot_object));
        }
        Ok(slots)
    }

    #[allow(clippy::too_many_arguments)]
    fn map_object_array(
        &self,
        resolver: &mut dyn PropertyResolver,
        stats: &mut TransformationStats,
        legacy: &LegacyRecord,
        index_or_id: &str,
        name: &str,
        children: &[PropertyDescriptor],
        out: &mut TargetRecord,
    ) -> Result<()> {
        let mut kept = Vec::new();
        for slot in 0..self.options.array_slot_cap {
            let mut slot_object = TargetRecord::new();
            let mut qualifies = true;
            let mut has_value = false;
            for child in children {
                if child.is_virtual {
                    continue;
                }
                let slot_path = format!("{name}[{slot}].{}", child.name);
                let value = resolver.get_value(legacy, &slot_path, index_or_id, slot, stats)?;
                let text = value.into_joined();
                let excluded = self.options.excluded_slot_fields.contains(&child.name);
                if text.is_empty() {
                    if !excluded {
                        qualifies = false;
                    }
                    continue;
                }
                if !excluded {
                    has_value = true;
                }
                slot_object.insert(child.name.clone(), Value::String(text));
            }
            if !qualifies || !has_value {
                continue;
            }
            for child_name in slot_object.keys() {
                let child_path = format!("{name}.{child_name}");
                stats.report_target_field(&child_path, true, false);
                if let Some(legacy_field) = self.record_map.first_legacy_field(&child_path) {
                    let legacy_field = legacy_field.to_string();
                    stats.report_legacy_field(&legacy_field, true, false);
                }
            }
            kept.push(Value::Object(slot_object));
        }
        if !kept.is_empty() {
            out.insert(name.to_string(), Value::Array(kept));
        }
        Ok(())
    }

    fn map_string_array(
        &self,
        resolver: &mut dyn PropertyResolver,
        stats: &mut TransformationStats,
        legacy: &LegacyRecord,
        index_or_id: &str,
        name: &str,
        out: &mut TargetRecord,
    ) -> Result<()> {
        if !self.record_map.has_property(name, legacy) {
            stats.report_target_field(name, false, false);
            return Ok(());
        }
        let value = resolver.get_value(legacy, name, index_or_id, 0, stats)?;
        let text = value.into_joined();
        let legacy_field = self
            .record_map
            .first_legacy_field(name)
            .unwrap_or_default()
            .to_string();
        if text.is_empty() {
            stats.report_legacy_field(&legacy_field, true, true);
            stats.report_target_field(name, true, true);
            return Ok(());
        }
        let entry = out
            .entry(name.to_string())
            .or_insert_with(|| Value::Array(Vec::new()));
        if let Value::Array(values) = entry {
            values.push(Value::String(text));
        }
        stats.report_legacy_field(&legacy_field, true, false);
        stats.report_target_field(name, true, false);
        Ok(())
    }
}
