//! Direct reference-data lookups with a per-key-type cache.
//!
//! Some call sites match reference entities by code or name without going
//! through a map file. The cache is keyed by a `(reference name, key type)`
//! tuple and each inner index is built once from the snapshot on first
//! lookup, then treated as read-only for the rest of the run.

use std::collections::HashMap;

use crate::entity::{KeyType, RefDataTuple, RefEntity, normalize_key};

#[derive(Debug, Default)]
pub struct RefDataCache {
    dicts: HashMap<(String, KeyType), HashMap<String, RefDataTuple>>,
}

impl RefDataCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tuple_by_code(
        &mut self,
        ref_data: &[RefEntity],
        ref_name: &str,
        code: &str,
    ) -> Option<RefDataTuple> {
        self.tuple(ref_data, ref_name, code, KeyType::Code)
    }

    pub fn tuple_by_name(
        &mut self,
        ref_data: &[RefEntity],
        ref_name: &str,
        name: &str,
    ) -> Option<RefDataTuple> {
        self.tuple(ref_data, ref_name, name, KeyType::Name)
    }

    pub fn tuple(
        &mut self,
        ref_data: &[RefEntity],
        ref_name: &str,
        key_value: &str,
        key_type: KeyType,
    ) -> Option<RefDataTuple> {
        let dict = self
            .dicts
            .entry((ref_name.to_string(), key_type))
            .or_insert_with(|| {
                ref_data
                    .iter()
                    .map(|entity| {
                        (
                            normalize_key(entity.key(key_type)),
                            RefDataTuple::new(entity.id.clone(), entity.name.clone()),
                        )
                    })
                    .collect()
            });
        dict.get(&normalize_key(key_value)).cloned()
    }
}
