//! Reference-data mapping: legacy codes/names to target `(id, name)` pairs.
//!
//! A map file is a tabular set of rows. Each row carries one or more
//! legacy-match columns (holding a literal legacy value or the wildcard
//! `*`) plus the target key column (`folio_code` or `folio_name`). Rows
//! classify into exactly one of:
//!
//! - **default**: every legacy-match column is `*`; exactly one must exist
//!   and becomes the fallback for unmatched legacy values
//! - **hybrid**: some but not all legacy-match columns are `*`
//! - **regular**: no wildcards
//!
//! Every row's target key must resolve against the live reference snapshot
//! at load time, otherwise the run is misconfigured and aborts.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use tracing::info;

use folio_model::{LegacyRecord, Result, TransformationError};

use crate::entity::{KeyType, RefDataTuple, RefEntity, normalize_key};

pub const WILDCARD: &str = "*";

/// Map-file columns that are not legacy-match columns.
const RESERVED_COLUMNS: [&str; 4] = ["folio_code", "folio_id", "folio_name", "legacy_code"];

/// One classified map row with its resolved target tuple.
#[derive(Debug, Clone)]
struct MapEntry {
    columns: BTreeMap<String, String>,
    tuple: RefDataTuple,
}

impl MapEntry {
    fn matches(&self, legacy_keys: &[String], legacy_values: &BTreeMap<String, String>) -> bool {
        legacy_keys.iter().all(|key| {
            let expected = self.columns.get(key).map(String::as_str).unwrap_or("");
            if expected == WILDCARD {
                return true;
            }
            let supplied = legacy_values.get(key).map(String::as_str).unwrap_or("");
            normalize_key(expected) == normalize_key(supplied)
        })
    }
}

/// A loaded, validated reference-data mapping for one reference type.
#[derive(Debug)]
pub struct RefDataMapping {
    name: String,
    key_type: KeyType,
    ref_data: Vec<RefEntity>,
    legacy_keys: Vec<String>,
    regular: Vec<MapEntry>,
    hybrid: Vec<MapEntry>,
    default_tuple: RefDataTuple,
    tuples: OnceLock<BTreeMap<String, RefDataTuple>>,
}

impl RefDataMapping {
    /// Load and validate a mapping against the live reference snapshot.
    ///
    /// Fails with a configuration error when the key column is missing,
    /// a row names a target entity absent from the snapshot, a mandatory
    /// cell is empty, or the number of default rows is not exactly one.
    pub fn new(
        name: &str,
        ref_data: Vec<RefEntity>,
        map_rows: Vec<BTreeMap<String, String>>,
        key_type: KeyType,
    ) -> Result<Self> {
        info!(name, rows = map_rows.len(), "initializing reference data mapping");
        let mut mapping = Self {
            name: name.to_string(),
            key_type,
            ref_data,
            legacy_keys: Vec::new(),
            regular: Vec::new(),
            hybrid: Vec::new(),
            default_tuple: RefDataTuple::new("", ""),
            tuples: OnceLock::new(),
        };
        mapping.pre_validate(&map_rows)?;
        mapping.legacy_keys = legacy_match_keys(&map_rows);
        mapping.classify_rows(&map_rows)?;
        mapping.post_validate(&map_rows)?;
        info!(
            name,
            regular = mapping.regular.len(),
            hybrid = mapping.hybrid.len(),
            entities = mapping.ref_data.len(),
            "reference data mapping loaded"
        );
        Ok(mapping)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn key_type(&self) -> KeyType {
        self.key_type
    }

    pub fn legacy_keys(&self) -> &[String] {
        &self.legacy_keys
    }

    pub fn default_tuple(&self) -> &RefDataTuple {
        &self.default_tuple
    }

    /// Pull this mapping's legacy-match column values out of a legacy row.
    pub fn legacy_values_from(&self, record: &LegacyRecord) -> BTreeMap<String, String> {
        self.legacy_keys
            .iter()
            .map(|key| (key.clone(), record.value(key).to_string()))
            .collect()
    }

    /// Resolve the supplied legacy column values to a target tuple.
    ///
    /// Regular rows are tried first, then hybrid rows, then the default
    /// fallback. Callers that must leave a field unset when unmapped (a
    /// temporary location, say) pass `allow_default = false`.
    pub fn resolve(
        &self,
        legacy_values: &BTreeMap<String, String>,
        allow_default: bool,
    ) -> Option<RefDataTuple> {
        for entry in &self.regular {
            if entry.matches(&self.legacy_keys, legacy_values) {
                return Some(entry.tuple.clone());
            }
        }
        for entry in &self.hybrid {
            if entry.matches(&self.legacy_keys, legacy_values) {
                return Some(entry.tuple.clone());
            }
        }
        if allow_default {
            return Some(self.default_tuple.clone());
        }
        None
    }

    /// Look a key up directly in the reference snapshot, bypassing the map.
    ///
    /// The normalized-key index is built on first use and then read-only
    /// for the rest of the run.
    pub fn ref_data_tuple(&self, key_value: &str) -> Option<RefDataTuple> {
        let tuples = self.tuples.get_or_init(|| {
            self.ref_data
                .iter()
                .map(|entity| {
                    (
                        normalize_key(entity.key(self.key_type)),
                        RefDataTuple::new(entity.id.clone(), entity.name.clone()),
                    )
                })
                .collect()
        });
        tuples.get(&normalize_key(key_value)).cloned()
    }

    fn pre_validate(&self, map_rows: &[BTreeMap<String, String>]) -> Result<()> {
        let key_column = self.key_type.column();
        if !map_rows
            .iter()
            .any(|row| row.get(key_column).is_some_and(|value| !value.trim().is_empty()))
        {
            return Err(TransformationError::process(format!(
                "column {key_column} missing from {} map file",
                self.name
            )));
        }
        let map_values: Vec<String> = map_rows
            .iter()
            .filter_map(|row| row.get(key_column))
            .map(|value| normalize_key(value))
            .collect();
        let folio_values: Vec<String> = self
            .ref_data
            .iter()
            .map(|entity| normalize_key(entity.key(self.key_type)))
            .collect();
        let unmapped: Vec<&String> = folio_values
            .iter()
            .filter(|value| !map_values.contains(value))
            .collect();
        if !unmapped.is_empty() {
            info!(
                name = %self.name,
                values = ?unmapped,
                "reference data values not present in the map"
            );
        }
        let missing: Vec<&String> = map_values
            .iter()
            .filter(|value| !folio_values.contains(value))
            .collect();
        if !missing.is_empty() {
            return Err(TransformationError::process(format!(
                "values from the {} map are not in the catalog: {missing:?}",
                self.name
            )));
        }
        Ok(())
    }

    fn classify_rows(&mut self, map_rows: &[BTreeMap<String, String>]) -> Result<()> {
        let key_column = self.key_type.column();
        let mut default_tuple: Option<RefDataTuple> = None;
        for row in map_rows {
            let key_value = row.get(key_column).map(String::as_str).unwrap_or("");
            let tuple = self.ref_data_tuple(key_value).ok_or_else(|| {
                TransformationError::process(format!(
                    "{} \"{key_value}\" set up in the map could not be found in the catalog",
                    self.name
                ))
            })?;
            let wildcard_count = self
                .legacy_keys
                .iter()
                .filter(|key| row.get(*key).map(String::as_str) == Some(WILDCARD))
                .count();
            let entry = MapEntry {
                columns: row.clone(),
                tuple,
            };
            if wildcard_count == self.legacy_keys.len() && !self.legacy_keys.is_empty() {
                if default_tuple.is_some() {
                    return Err(TransformationError::process(format!(
                        "more than one default (all-wildcard) row in the {} map",
                        self.name
                    )));
                }
                info!(name = %self.name, key = key_value, "set default mapping");
                default_tuple = Some(entry.tuple);
            } else if wildcard_count > 0 {
                self.hybrid.push(entry);
            } else {
                self.regular.push(entry);
            }
        }
        self.default_tuple = default_tuple.ok_or_else(|| {
            TransformationError::process(format!(
                "no default {} mapping found. Add a row with * in every legacy column \
                 and a valid {} value",
                self.name,
                self.key_type.column()
            ))
        })?;
        Ok(())
    }

    fn post_validate(&self, map_rows: &[BTreeMap<String, String>]) -> Result<()> {
        let key_column = self.key_type.column();
        for row in map_rows {
            if !row.contains_key(key_column) {
                return Err(TransformationError::process(format!(
                    "{key_column} is not a column of the {} map file",
                    self.name
                )));
            }
            if self.legacy_keys.iter().all(|key| !row.contains_key(key)) {
                return Err(TransformationError::process(format!(
                    "row in the {} map file carries none of the legacy columns {:?}",
                    self.name, self.legacy_keys
                )));
            }
            if row.values().any(|value| value.trim().is_empty()) {
                return Err(TransformationError::process(format!(
                    "empty value in a {} map row: {row:?}",
                    self.name
                )));
            }
        }
        Ok(())
    }
}

/// Legacy-match columns are whatever the first row carries beyond the
/// reserved target-key columns.
fn legacy_match_keys(map_rows: &[BTreeMap<String, String>]) -> Vec<String> {
    let Some(first) = map_rows.first() else {
        return Vec::new();
    };
    first
        .keys()
        .filter(|key| !RESERVED_COLUMNS.contains(&key.as_str()))
        .cloned()
        .collect()
}
