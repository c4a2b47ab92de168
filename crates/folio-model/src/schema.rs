//! Target schema model.
//!
//! The catalog service declares each record type as a JSON schema with
//! `properties`, nested `items` for arrays, a `folio:isVirtual` marker for
//! computed fields, and the literal description `"Deprecated"` for fields
//! kept only for backwards compatibility. The traversal engine works on the
//! typed tree built here instead of inspecting raw JSON per record.

use serde_json::Value;

/// Shape of one schema property, dispatched by the traversal engine.
///
/// A closed set of variants: anything that is not an object or a known
/// array item kind falls into `Basic` (strings, booleans, numbers are all
/// mapped from legacy string columns the same way), and array item kinds
/// the engine cannot map land in `ArrayOfOther` so they show up as
/// unhandled in the target field stats instead of vanishing.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyKind {
    Basic,
    Object(Vec<PropertyDescriptor>),
    ArrayOfObject(Vec<PropertyDescriptor>),
    ArrayOfString,
    ArrayOfOther(String),
}

/// One node in the target schema tree.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDescriptor {
    pub name: String,
    pub kind: PropertyKind,
    /// `folio:isVirtual`: derived by the catalog service, never mapped.
    pub is_virtual: bool,
    /// `description == "Deprecated"`: skipped, counted separately.
    pub is_deprecated: bool,
}

impl PropertyDescriptor {
    /// Child descriptors for object-like kinds, empty otherwise.
    pub fn children(&self) -> &[PropertyDescriptor] {
        match &self.kind {
            PropertyKind::Object(children) | PropertyKind::ArrayOfObject(children) => children,
            _ => &[],
        }
    }
}

/// The declared object schema for one record type, loaded once per run.
///
/// Property order follows the schema's declared order (the JSON parser is
/// configured to preserve object key order), which keeps reports
/// reproducible between runs.
#[derive(Debug, Clone, Default)]
pub struct TargetSchema {
    pub properties: Vec<PropertyDescriptor>,
    pub required: Vec<String>,
}

impl TargetSchema {
    /// Build the typed property tree from a raw catalog schema document.
    ///
    /// Parsing is tolerant: missing `type` means basic, missing
    /// `properties` means no children. The schema is trusted input from
    /// the catalog service; this is shape extraction, not validation.
    pub fn from_json(schema: &Value) -> Self {
        Self {
            properties: parse_properties(schema),
            required: schema
                .get("required")
                .and_then(Value::as_array)
                .map(|names| {
                    names
                        .iter()
                        .filter_map(Value::as_str)
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
        }
    }

    pub fn property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties.iter().find(|prop| prop.name == name)
    }
}

fn parse_properties(node: &Value) -> Vec<PropertyDescriptor> {
    let Some(properties) = node.get("properties").and_then(Value::as_object) else {
        return Vec::new();
    };
    properties
        .iter()
        .map(|(name, prop)| parse_property(name, prop))
        .collect()
}

fn parse_property(name: &str, prop: &Value) -> PropertyDescriptor {
    let kind = match prop.get("type").and_then(Value::as_str) {
        Some("object") => PropertyKind::Object(parse_properties(prop)),
        Some("array") => match item_type(prop) {
            Some("object") => {
                let items = prop.get("items").cloned().unwrap_or(Value::Null);
                PropertyKind::ArrayOfObject(parse_properties(&items))
            }
            Some("string") => PropertyKind::ArrayOfString,
            other => PropertyKind::ArrayOfOther(other.unwrap_or("unknown").to_string()),
        },
        _ => PropertyKind::Basic,
    };
    PropertyDescriptor {
        name: name.to_string(),
        kind,
        is_virtual: prop
            .get("folio:isVirtual")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        is_deprecated: prop.get("description").and_then(Value::as_str) == Some("Deprecated"),
    }
}

fn item_type(prop: &Value) -> Option<&str> {
    prop.get("items")
        .and_then(|items| items.get("type"))
        .and_then(Value::as_str)
}
