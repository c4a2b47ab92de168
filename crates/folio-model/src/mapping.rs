//! The human-authored mapping table linking legacy columns to target paths.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::record::LegacyRecord;

/// The literal a map author writes to say a target field has no source.
pub const NOT_MAPPED: &str = "Not mapped";

/// One row of the mapping file.
///
/// `folio_field` is a dot path into the target schema and may carry bracket
/// indices (`notes[2].note`) which are stripped before matching.
/// `legacy_field` is empty or [`NOT_MAPPED`] when the row is a placeholder.
/// `value` is an optional literal that overrides the legacy value for
/// single-column mappings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingRow {
    pub folio_field: String,
    pub legacy_field: String,
    #[serde(default)]
    pub value: Option<String>,
}

impl MappingRow {
    /// True when the row actually names a legacy source column.
    pub fn is_mapped(&self) -> bool {
        !self.legacy_field.trim().is_empty() && self.legacy_field.trim() != NOT_MAPPED
    }
}

/// The loaded mapping table, indexed by normalized target path.
///
/// Multiple rows may share a target path (fan-in); their legacy columns are
/// kept in row order so concatenation and slot-indexed access are stable.
#[derive(Debug, Clone, Default)]
pub struct RecordMap {
    rows: Vec<MappingRow>,
    legacy_fields: BTreeMap<String, Vec<String>>,
    overrides: BTreeMap<String, String>,
}

impl RecordMap {
    pub fn new(rows: Vec<MappingRow>) -> Self {
        let mut legacy_fields: BTreeMap<String, Vec<String>> = BTreeMap::new();
        let mut overrides = BTreeMap::new();
        for row in &rows {
            let path = normalize_target_path(&row.folio_field);
            if let Some(value) = row.value.as_deref()
                && !value.trim().is_empty()
            {
                overrides.insert(path.clone(), value.trim().to_string());
            }
            if !row.is_mapped() {
                continue;
            }
            legacy_fields
                .entry(path)
                .or_default()
                .push(row.legacy_field.trim().to_string());
        }
        Self {
            rows,
            legacy_fields,
            overrides,
        }
    }

    pub fn rows(&self) -> &[MappingRow] {
        &self.rows
    }

    /// Legacy columns mapped to a target path, in mapping-file row order.
    pub fn legacy_fields_for(&self, target_path: &str) -> &[String] {
        self.legacy_fields
            .get(&normalize_target_path(target_path))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The first mapped legacy column for a path; used to attribute
    /// field statistics to a legacy column name.
    pub fn first_legacy_field(&self, target_path: &str) -> Option<&str> {
        self.legacy_fields_for(target_path)
            .first()
            .map(String::as_str)
    }

    /// Literal override configured for a single-column mapping.
    pub fn literal_override(&self, target_path: &str) -> Option<&str> {
        self.overrides
            .get(&normalize_target_path(target_path))
            .map(String::as_str)
    }

    /// True when the target path has a mapped legacy column and the legacy
    /// record carries a value for at least one of them, or when a literal
    /// override is configured. A whitespace-only value still counts as
    /// present; the engine reports it as mapped but empty rather than
    /// unmapped.
    pub fn has_property(&self, target_path: &str, record: &LegacyRecord) -> bool {
        self.literal_override(target_path).is_some()
            || self
                .legacy_fields_for(target_path)
                .iter()
                .any(|column| !record.value(column).is_empty())
    }
}

/// Strip bracket indices from a target path: `notes[2].note` -> `notes.note`.
pub fn normalize_target_path(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut chars = path.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '[' {
            let mut index = String::new();
            let mut closed = false;
            for inner in chars.by_ref() {
                if inner == ']' {
                    closed = true;
                    break;
                }
                index.push(inner);
            }
            // Only numeric indices are positional markers; anything else
            // is part of the field name and is kept as written.
            if closed && !index.is_empty() && index.chars().all(|c| c.is_ascii_digit()) {
                continue;
            }
            out.push('[');
            out.push_str(&index);
            if closed {
                out.push(']');
            }
            continue;
        }
        out.push(ch);
    }
    out.trim_matches('.').to_string()
}
