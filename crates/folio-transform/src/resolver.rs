//! The per-record-type resolution contract the mapping engine works against.

use folio_model::{LegacyRecord, Result, TransformationStats};

/// A value pulled out of a legacy row for one target field path.
///
/// Single-column mappings produce `Text`; fan-in mappings and cross-record
/// links produce `List`. How a list lands on the record is the engine's
/// policy per property kind (joined for basic fields, consumed element-wise
/// for arrays).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
    Text(String),
    List(Vec<String>),
}

impl PropertyValue {
    pub fn empty() -> Self {
        Self::Text(String::new())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(text) => text.trim().is_empty(),
            Self::List(values) => values.iter().all(|value| value.trim().is_empty()),
        }
    }

    /// Collapse to a single trimmed string; list members are joined with a
    /// single space in order, empty members dropped.
    pub fn into_joined(self) -> String {
        match self {
            Self::Text(text) => text.trim().to_string(),
            Self::List(values) => {
                let parts: Vec<&str> = values
                    .iter()
                    .map(|value| value.trim())
                    .filter(|value| !value.is_empty())
                    .collect();
                parts.join(" ")
            }
        }
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<Vec<String>> for PropertyValue {
    fn from(values: Vec<String>) -> Self {
        Self::List(values)
    }
}

/// Record-type-specific value resolution.
///
/// The engine calls this once per visited leaf (and once per synthetic
/// array slot, with `slot` qualifying which repetition is being filled).
/// Implementations special-case fields that need more than a direct
/// legacy-column lookup and fall back to the mapping table for the rest.
///
/// Errors of the `Data` class are recoverable: the engine counts them and
/// leaves the field unset. Anything else fails the record or the run.
pub trait PropertyResolver {
    fn get_value(
        &mut self,
        legacy: &LegacyRecord,
        target_path: &str,
        index_or_id: &str,
        slot: usize,
        stats: &mut TransformationStats,
    ) -> Result<PropertyValue>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joined_drops_empty_members() {
        let value = PropertyValue::List(vec![
            "QA".to_string(),
            "  ".to_string(),
            "76.73".to_string(),
        ]);
        assert_eq!(value.into_joined(), "QA 76.73");
    }

    #[test]
    fn whitespace_only_text_is_empty() {
        assert!(PropertyValue::Text("   ".to_string()).is_empty());
        assert!(PropertyValue::List(vec![String::new()]).is_empty());
        assert!(!PropertyValue::Text("x".to_string()).is_empty());
    }
}
