//! Run statistics: per-field counters and the sectioned migration report.

use std::collections::BTreeMap;

use serde::Serialize;

/// Two additive counters per field name.
///
/// For target fields, `mapped` counts records where the field was mapped
/// (or present) and `empty` counts records where the mapped value turned
/// out empty. For legacy fields the same pair tracks presence and
/// mapped-but-empty. Counters are never reset mid-run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FieldCounter {
    pub mapped: u64,
    pub empty: u64,
}

/// Accumulates everything the reporting layer needs at run end.
///
/// Mutated additively by the engine, the reference-data mappings, and the
/// linker. Single-threaded within the core; a multi-threaded host must
/// route records through one aggregator or serialize access.
#[derive(Debug, Default)]
pub struct TransformationStats {
    legacy_fields: BTreeMap<String, FieldCounter>,
    target_fields: BTreeMap<String, FieldCounter>,
    general: BTreeMap<String, u64>,
    report: BTreeMap<String, BTreeMap<String, u64>>,
}

impl TransformationStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report_legacy_field(&mut self, field_name: &str, mapped: bool, empty: bool) {
        if field_name.is_empty() {
            return;
        }
        let counter = self.legacy_fields.entry(field_name.to_string()).or_default();
        counter.mapped += u64::from(mapped);
        counter.empty += u64::from(empty);
    }

    pub fn report_target_field(&mut self, field_name: &str, mapped: bool, empty: bool) {
        let counter = self.target_fields.entry(field_name.to_string()).or_default();
        counter.mapped += u64::from(mapped);
        counter.empty += u64::from(empty);
    }

    /// General counters ("Data issues found", "Holdings IDs mapped", ...).
    pub fn add_general(&mut self, measure: &str) {
        self.add_general_by(measure, 1);
    }

    pub fn add_general_by(&mut self, measure: &str, count: u64) {
        *self.general.entry(measure.to_string()).or_default() += count;
    }

    /// Sectioned measure counts for the markdown migration report.
    pub fn add_to_report(&mut self, section: &str, measure: &str) {
        *self
            .report
            .entry(section.to_string())
            .or_default()
            .entry(measure.to_string())
            .or_default() += 1;
    }

    pub fn legacy_fields(&self) -> &BTreeMap<String, FieldCounter> {
        &self.legacy_fields
    }

    pub fn target_fields(&self) -> &BTreeMap<String, FieldCounter> {
        &self.target_fields
    }

    pub fn general(&self) -> &BTreeMap<String, u64> {
        &self.general
    }

    pub fn general_count(&self, measure: &str) -> u64 {
        self.general.get(measure).copied().unwrap_or(0)
    }

    pub fn report_sections(&self) -> &BTreeMap<String, BTreeMap<String, u64>> {
        &self.report
    }
}
