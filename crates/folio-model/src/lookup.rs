use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One entry of the identifier lookup table produced by the earlier
/// bib (instance) transformation pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceIdEntry {
    pub folio_id: String,
}

/// Legacy identifier -> previously assigned target identifier.
///
/// Supplied by the caller and read-only here; the linker probes it with
/// normalized and raw keys when resolving bound-with references.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InstanceIdMap {
    entries: BTreeMap<String, InstanceIdEntry>,
}

impl InstanceIdMap {
    pub fn new(entries: BTreeMap<String, InstanceIdEntry>) -> Self {
        Self { entries }
    }

    pub fn get(&self, legacy_id: &str) -> Option<&InstanceIdEntry> {
        self.entries.get(legacy_id)
    }

    pub fn folio_id(&self, legacy_id: &str) -> Option<&str> {
        self.entries.get(legacy_id).map(|entry| entry.folio_id.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
