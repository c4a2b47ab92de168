//! The holdings record type: mapping-table lookups plus the fields that
//! need reference-data or cross-record resolution.

use folio_model::{
    InstanceIdMap, LegacyRecord, RecordMap, Result, TransformationStats, normalize_target_path,
};
use folio_refdata::RefDataMapping;

use crate::linker::InstanceLinker;
use crate::resolver::{PropertyResolver, PropertyValue};

pub struct HoldingsResolver<'a> {
    record_map: &'a RecordMap,
    location_mapping: RefDataMapping,
    call_number_mapping: Option<RefDataMapping>,
    linker: InstanceLinker<'a>,
}

impl<'a> HoldingsResolver<'a> {
    pub fn new(
        record_map: &'a RecordMap,
        location_mapping: RefDataMapping,
        call_number_mapping: Option<RefDataMapping>,
        instance_id_map: &'a InstanceIdMap,
    ) -> Self {
        Self {
            record_map,
            location_mapping,
            call_number_mapping,
            linker: InstanceLinker::new(instance_id_map),
        }
    }

    fn location_id(
        &self,
        legacy: &LegacyRecord,
        stats: &mut TransformationStats,
        allow_default: bool,
    ) -> PropertyValue {
        let legacy_values = self.location_mapping.legacy_values_from(legacy);
        match self.location_mapping.resolve(&legacy_values, allow_default) {
            Some(tuple) => {
                stats.add_to_report("Location mapping", &tuple.name);
                PropertyValue::Text(tuple.id)
            }
            None => {
                stats.add_to_report("Location mapping", "Unmapped temporary location");
                PropertyValue::empty()
            }
        }
    }

    fn call_number_type_id(
        &self,
        legacy: &LegacyRecord,
        stats: &mut TransformationStats,
    ) -> PropertyValue {
        match &self.call_number_mapping {
            Some(mapping) => {
                let legacy_values = mapping.legacy_values_from(legacy);
                match mapping.resolve(&legacy_values, true) {
                    Some(tuple) => {
                        stats.add_to_report("Call number type mapping", &tuple.name);
                        PropertyValue::Text(tuple.id)
                    }
                    None => PropertyValue::empty(),
                }
            }
            None => {
                stats.add_to_report("Call number type mapping", "No mapping");
                PropertyValue::empty()
            }
        }
    }

    /// Mapping-table fallback shared by every field without special logic.
    ///
    /// Slot-qualified paths select the slot-th mapped legacy column so
    /// fan-in columns fill successive array slots. Non-array paths with a
    /// single mapped column honor the configured literal override; paths
    /// with several mapped columns return them all.
    fn mapped_value(
        &self,
        legacy: &LegacyRecord,
        target_path: &str,
        normalized: &str,
        slot: usize,
    ) -> PropertyValue {
        let columns = self.record_map.legacy_fields_for(normalized);
        if target_path.contains('[') {
            return columns
                .get(slot)
                .map(|column| PropertyValue::from(legacy.value(column)))
                .unwrap_or_else(PropertyValue::empty);
        }
        if columns.len() <= 1 {
            if let Some(literal) = self.record_map.literal_override(normalized) {
                return PropertyValue::from(literal);
            }
            return columns
                .first()
                .map(|column| PropertyValue::from(legacy.value(column)))
                .unwrap_or_else(PropertyValue::empty);
        }
        PropertyValue::List(legacy.values_for(columns))
    }
}

impl PropertyResolver for HoldingsResolver<'_> {
    fn get_value(
        &mut self,
        legacy: &LegacyRecord,
        target_path: &str,
        index_or_id: &str,
        slot: usize,
        stats: &mut TransformationStats,
    ) -> Result<PropertyValue> {
        let normalized = normalize_target_path(target_path);
        match normalized.as_str() {
            "permanentLocationId" => Ok(self.location_id(legacy, stats, true)),
            // A temporary location must stay unset when unmapped.
            "temporaryLocationId" => Ok(self.location_id(legacy, stats, false)),
            "callNumber" => {
                let columns = self.record_map.legacy_fields_for(&normalized);
                let value = PropertyValue::List(legacy.values_for(columns)).into_joined();
                if value.starts_with('[') {
                    stats.add_general("Bound-with call numbers identified");
                    stats.add_to_report(
                        "Bound-with mappings",
                        &format!("Bib-level call numbers in record: {}", value.split(',').count()),
                    );
                }
                Ok(PropertyValue::Text(value))
            }
            "callNumberTypeId" => Ok(self.call_number_type_id(legacy, stats)),
            "instanceId" => {
                let columns = self.record_map.legacy_fields_for(&normalized);
                let raw = PropertyValue::List(legacy.values_for(columns)).into_joined();
                self.linker
                    .resolve_instance_ids(&raw, index_or_id, stats)
                    .map(PropertyValue::List)
            }
            _ => Ok(self.mapped_value(legacy, target_path, &normalized, slot)),
        }
    }
}
