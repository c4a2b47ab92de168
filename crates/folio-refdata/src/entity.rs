use serde::{Deserialize, Serialize};

/// Which reference-entity field a map keys on.
///
/// Locations are matched by `code`, call number types by `name`. The key
/// type also names the map-file column (`folio_code` / `folio_name`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum KeyType {
    Code,
    Name,
}

impl KeyType {
    /// Map-file column carrying the target key value.
    pub fn column(self) -> &'static str {
        match self {
            KeyType::Code => "folio_code",
            KeyType::Name => "folio_name",
        }
    }

    /// Reference-entity field the key is matched against.
    pub fn field(self) -> &'static str {
        match self {
            KeyType::Code => "code",
            KeyType::Name => "name",
        }
    }
}

/// One reference-data entity fetched from the catalog service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefEntity {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
}

impl RefEntity {
    pub fn key(&self, key_type: KeyType) -> &str {
        match key_type {
            KeyType::Code => self.code.as_deref().unwrap_or(""),
            KeyType::Name => &self.name,
        }
    }
}

/// A resolved `(id, name)` pair from the reference snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefDataTuple {
    pub id: String,
    pub name: String,
}

impl RefDataTuple {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Normalization applied before any reference-data comparison.
pub(crate) fn normalize_key(value: &str) -> String {
    value.trim().to_lowercase()
}
