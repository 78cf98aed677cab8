use std::collections::HashMap;

use chrono::{DateTime, Utc};

/// The value type for fields in a document.
///
/// Covers the scalar types a JSON document body can carry. Dates are held
/// as typed values client-side and written as RFC 3339 strings on the
/// wire (see [`DocumentCodec`](crate::codec::DocumentCodec)).
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    /// Date and time in UTC.
    DateTime(DateTime<Utc>),
}

impl FieldValue {
    /// Returns the string value if this is a String variant.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer value if this is an Integer variant.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the float value if this is a Float variant.
    ///
    /// Integers widen to `f64` so numeric fields compose.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            FieldValue::Float(f) => Some(*f),
            FieldValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Returns the boolean value if this is a Bool variant.
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the datetime value if this is a DateTime variant.
    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            FieldValue::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    /// Returns true if this is the Null variant.
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }
}

// --- Conversions ---

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::String(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::String(v.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Integer(v)
    }
}

impl From<i32> for FieldValue {
    fn from(v: i32) -> Self {
        FieldValue::Integer(v as i64)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Float(v)
    }
}

impl From<f32> for FieldValue {
    fn from(v: f32) -> Self {
        FieldValue::Float(v as f64)
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Bool(v)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(dt: DateTime<Utc>) -> Self {
        FieldValue::DateTime(dt)
    }
}

/// A document bound for (or read from) the engine.
///
/// A document is a collection of named fields, each holding a
/// [`FieldValue`], plus an optional identifier. If `id` is `None` the
/// engine assigns one at index time. The client keeps no authoritative
/// copy after a write; the engine's stored `_source` is the truth.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    /// Optional unique identifier for the document.
    pub id: Option<String>,

    /// Field data.
    pub fields: HashMap<String, FieldValue>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self {
            id: None,
            fields: HashMap::new(),
        }
    }

    /// Create a new document with a specific ID.
    pub fn new_with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            fields: HashMap::new(),
        }
    }

    /// Set the document ID.
    pub fn set_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Add a field to the document.
    pub fn add_field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Add a text field.
    pub fn add_text(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.fields
            .insert(name.into(), FieldValue::String(text.into()));
        self
    }

    /// Add an integer field.
    pub fn add_integer(mut self, name: impl Into<String>, value: i64) -> Self {
        self.fields.insert(name.into(), FieldValue::Integer(value));
        self
    }

    /// Add a float field.
    pub fn add_float(mut self, name: impl Into<String>, value: f64) -> Self {
        self.fields.insert(name.into(), FieldValue::Float(value));
        self
    }

    /// Add a boolean field.
    pub fn add_boolean(mut self, name: impl Into<String>, value: bool) -> Self {
        self.fields.insert(name.into(), FieldValue::Bool(value));
        self
    }

    /// Add a datetime field.
    pub fn add_datetime(mut self, name: impl Into<String>, value: DateTime<Utc>) -> Self {
        self.fields.insert(name.into(), FieldValue::DateTime(value));
        self
    }

    /// Get a reference to a field's value.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Check if the document has a field.
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Get all field names.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.keys().map(|s| s.as_str()).collect()
    }

    /// Get the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the document has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_builder_chain() {
        let doc = Document::new_with_id("1")
            .add_text("name", "intro")
            .add_float("price", 5.6)
            .add_boolean("published", true);

        assert_eq!(doc.id.as_deref(), Some("1"));
        assert_eq!(doc.len(), 3);
        assert_eq!(doc.get("name").and_then(|v| v.as_str()), Some("intro"));
        assert_eq!(doc.get("price").and_then(|v| v.as_float()), Some(5.6));
        assert_eq!(
            doc.get("published").and_then(|v| v.as_boolean()),
            Some(true)
        );
        assert!(!doc.has_field("missing"));
    }

    #[test]
    fn test_integer_widens_to_float() {
        let v = FieldValue::Integer(7);
        assert_eq!(v.as_float(), Some(7.0));
        assert_eq!(v.as_integer(), Some(7));
    }

    #[test]
    fn test_from_conversions() {
        assert_eq!(FieldValue::from("x"), FieldValue::String("x".to_string()));
        assert_eq!(FieldValue::from(3i32), FieldValue::Integer(3));
        assert_eq!(FieldValue::from(2.5f64), FieldValue::Float(2.5));
        assert_eq!(FieldValue::from(false), FieldValue::Bool(false));

        let dt = Utc.with_ymd_and_hms(2020, 5, 17, 12, 0, 0).unwrap();
        assert_eq!(FieldValue::from(dt).as_datetime(), Some(dt));
    }
}
