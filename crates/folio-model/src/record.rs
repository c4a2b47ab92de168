use std::collections::BTreeMap;

/// One flat legacy row, keyed by legacy column name.
///
/// Values are whitespace-normalized by the ingest layer and immutable once
/// read; missing columns read as empty.
#[derive(Debug, Clone, Default)]
pub struct LegacyRecord {
    values: BTreeMap<String, String>,
}

impl LegacyRecord {
    pub fn new(values: BTreeMap<String, String>) -> Self {
        Self { values }
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: pairs
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.values.get(column).map(String::as_str)
    }

    /// Column value, or the empty string when the column is absent.
    pub fn value(&self, column: &str) -> &str {
        self.get(column).unwrap_or("")
    }

    /// Values for a set of legacy columns, in the order the columns are
    /// given. Missing columns contribute empty strings so positions stay
    /// stable for slot-indexed access.
    pub fn values_for(&self, columns: &[String]) -> Vec<String> {
        columns
            .iter()
            .map(|column| self.value(column).to_string())
            .collect()
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

/// The assembled nested record, ready for serialization to the catalog.
pub type TargetRecord = serde_json::Map<String, serde_json::Value>;
