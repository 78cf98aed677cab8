//! Document codec: typed fields to and from wire JSON.
//!
//! [`DocumentCodec`] turns a [`Document`] into the JSON object body the
//! engine stores as `_source`, and back. A codec built
//! [`with_mapping`](DocumentCodec::with_mapping) validates every encoded
//! field against the declared [`FieldType`] and rejects mismatches before
//! anything reaches the wire; on decode the mapping is what lets a bare
//! JSON string become a typed date again.
//!
//! Round-trip law: `decode(encode(d)) == d` for documents with supported
//! field types. For `DateTime` fields this holds when the codec carries a
//! mapping declaring the field as `date`, since the wire format has no
//! date type of its own.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::{Map, Value};

use crate::data::{Document, FieldValue};
use crate::error::{Result, TernError};
use crate::index::{FieldType, Mapping};

/// Serializes and deserializes documents against an optional declared
/// mapping.
#[derive(Debug, Clone, Default)]
pub struct DocumentCodec {
    mapping: Option<Mapping>,
}

impl DocumentCodec {
    /// Create a codec with no declared mapping.
    ///
    /// Encoding is unvalidated and decoded strings stay strings.
    pub fn new() -> Self {
        Self { mapping: None }
    }

    /// Create a codec that validates against `mapping` and restores
    /// typed dates for fields the mapping declares as `date`.
    pub fn with_mapping(mapping: Mapping) -> Self {
        Self {
            mapping: Some(mapping),
        }
    }

    /// Encode a document's fields as wire-format JSON bytes.
    ///
    /// The id never appears in the body; it travels in the request path
    /// or bulk action metadata.
    pub fn encode(&self, doc: &Document) -> Result<Vec<u8>> {
        let value = self.source_value(doc)?;
        Ok(serde_json::to_vec(&value)?)
    }

    /// Encode a document's fields as a JSON object value.
    pub fn source_value(&self, doc: &Document) -> Result<Value> {
        let mut map = Map::with_capacity(doc.fields.len());
        for (name, value) in &doc.fields {
            if let Some(mapping) = &self.mapping {
                if let Some(declared) = mapping.field_type(name) {
                    check_declared_type(name, declared, value)?;
                }
            }
            map.insert(name.clone(), encode_value(name, value)?);
        }
        Ok(Value::Object(map))
    }

    /// Decode wire-format JSON bytes into a document.
    ///
    /// The result carries no id; callers that know the `_id` attach it.
    pub fn decode(&self, bytes: &[u8]) -> Result<Document> {
        let value: Value = serde_json::from_slice(bytes)
            .map_err(|e| TernError::encoding(format!("invalid document body: {e}")))?;
        self.document_from_value(&value)
    }

    /// Decode a JSON object value (e.g. a hit's `_source`) into a document.
    pub fn document_from_value(&self, value: &Value) -> Result<Document> {
        let Value::Object(map) = value else {
            return Err(TernError::encoding("document body must be a JSON object"));
        };

        let mut doc = Document::new();
        for (name, raw) in map {
            doc.fields.insert(name.clone(), self.decode_value(name, raw)?);
        }
        Ok(doc)
    }

    fn decode_value(&self, name: &str, raw: &Value) -> Result<FieldValue> {
        match raw {
            Value::Null => Ok(FieldValue::Null),
            Value::Bool(b) => Ok(FieldValue::Bool(*b)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(FieldValue::Integer(i))
                } else if let Some(f) = n.as_f64() {
                    Ok(FieldValue::Float(f))
                } else {
                    Err(TernError::encoding(format!(
                        "field '{name}' holds a number outside the supported range"
                    )))
                }
            }
            Value::String(s) => {
                let is_date_field = self
                    .mapping
                    .as_ref()
                    .and_then(|m| m.field_type(name))
                    .map(|t| t == FieldType::Date)
                    .unwrap_or(false);
                if is_date_field {
                    parse_date(s).map(FieldValue::DateTime).ok_or_else(|| {
                        TernError::encoding(format!(
                            "field '{name}' is mapped as date but holds '{s}'"
                        ))
                    })
                } else {
                    Ok(FieldValue::String(s.clone()))
                }
            }
            Value::Array(_) | Value::Object(_) => Err(TernError::encoding(format!(
                "field '{name}' holds a nested value, which is not supported"
            ))),
        }
    }
}

fn encode_value(name: &str, value: &FieldValue) -> Result<Value> {
    match value {
        FieldValue::Null => Ok(Value::Null),
        FieldValue::Bool(b) => Ok(Value::Bool(*b)),
        FieldValue::Integer(i) => Ok(Value::from(*i)),
        FieldValue::Float(f) => {
            if !f.is_finite() {
                return Err(TernError::encoding(format!(
                    "field '{name}' holds a non-finite float"
                )));
            }
            Ok(Value::from(*f))
        }
        FieldValue::String(s) => Ok(Value::String(s.clone())),
        FieldValue::DateTime(dt) => Ok(Value::String(dt.to_rfc3339())),
    }
}

fn check_declared_type(name: &str, declared: FieldType, value: &FieldValue) -> Result<()> {
    // Null is always acceptable; the engine treats it as an absent value.
    if value.is_null() {
        return Ok(());
    }

    let ok = match declared {
        FieldType::Text | FieldType::Keyword => matches!(value, FieldValue::String(_)),
        FieldType::Integer | FieldType::Long => matches!(value, FieldValue::Integer(_)),
        // Integral literals are valid float JSON.
        FieldType::Float | FieldType::Double => {
            matches!(value, FieldValue::Float(_) | FieldValue::Integer(_))
        }
        FieldType::Boolean => matches!(value, FieldValue::Bool(_)),
        // Pre-formatted date strings pass through unchecked.
        FieldType::Date => matches!(value, FieldValue::DateTime(_) | FieldValue::String(_)),
    };

    if ok {
        Ok(())
    } else {
        Err(TernError::encoding(format!(
            "field '{name}' is mapped as {declared:?} but holds {value:?}"
        )))
    }
}

/// Parse a wire date string.
///
/// Accepts RFC 3339 plus the `yyyy-MM-dd HH:mm:ss` and `yyyy-MM-dd`
/// forms commonly declared in mappings.
fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::FieldMapping;
    use chrono::TimeZone;

    fn catalog_mapping() -> Mapping {
        Mapping::builder()
            .add_text("name")
            .add_float("price")
            .add_date("timestamp")
            .build()
    }

    #[test]
    fn test_round_trip_scalars() -> Result<()> {
        let codec = DocumentCodec::new();
        let doc = Document::new()
            .add_text("name", "spring cloud in practice")
            .add_integer("lessons", 42)
            .add_float("price", 5.6)
            .add_boolean("published", true)
            .add_field("retired", FieldValue::Null);

        let decoded = codec.decode(&codec.encode(&doc)?)?;
        assert_eq!(decoded, doc);
        Ok(())
    }

    #[test]
    fn test_round_trip_date_through_mapping() -> Result<()> {
        let codec = DocumentCodec::with_mapping(catalog_mapping());
        let dt = Utc.with_ymd_and_hms(2020, 5, 17, 8, 30, 0).unwrap();
        let doc = Document::new()
            .add_text("name", "intro")
            .add_datetime("timestamp", dt);

        let decoded = codec.decode(&codec.encode(&doc)?)?;
        assert_eq!(decoded, doc);
        Ok(())
    }

    #[test]
    fn test_date_stays_string_without_mapping() -> Result<()> {
        let plain = DocumentCodec::new();
        let dt = Utc.with_ymd_and_hms(2020, 5, 17, 8, 30, 0).unwrap();
        let doc = Document::new().add_datetime("timestamp", dt);

        let decoded = plain.decode(&plain.encode(&doc)?)?;
        assert_eq!(
            decoded.get("timestamp").and_then(|v| v.as_str()),
            Some(dt.to_rfc3339().as_str())
        );
        Ok(())
    }

    #[test]
    fn test_mapping_accepted_date_formats() -> Result<()> {
        let codec = DocumentCodec::with_mapping(catalog_mapping());

        let doc = codec.decode(br#"{"timestamp": "2020-05-17 08:30:00"}"#)?;
        let expected = Utc.with_ymd_and_hms(2020, 5, 17, 8, 30, 0).unwrap();
        assert_eq!(doc.get("timestamp").and_then(|v| v.as_datetime()), Some(expected));

        let doc = codec.decode(br#"{"timestamp": "2020-05-17"}"#)?;
        let expected = Utc.with_ymd_and_hms(2020, 5, 17, 0, 0, 0).unwrap();
        assert_eq!(doc.get("timestamp").and_then(|v| v.as_datetime()), Some(expected));
        Ok(())
    }

    #[test]
    fn test_encode_rejects_mapping_mismatch() {
        let codec = DocumentCodec::with_mapping(catalog_mapping());
        let doc = Document::new().add_text("price", "not a number");

        let err = codec.encode(&doc).unwrap_err();
        assert!(matches!(err, TernError::Encoding(_)), "got {err:?}");
    }

    #[test]
    fn test_encode_rejects_non_finite_float() {
        let codec = DocumentCodec::new();
        let doc = Document::new().add_float("price", f64::NAN);

        let err = codec.encode(&doc).unwrap_err();
        assert!(matches!(err, TernError::Encoding(_)));
    }

    #[test]
    fn test_encode_allows_integer_in_float_field() -> Result<()> {
        let codec = DocumentCodec::with_mapping(catalog_mapping());
        let doc = Document::new().add_integer("price", 5);
        codec.encode(&doc)?;
        Ok(())
    }

    #[test]
    fn test_decode_rejects_nested_values() {
        let codec = DocumentCodec::new();
        let err = codec.decode(br#"{"tags": ["a", "b"]}"#).unwrap_err();
        assert!(matches!(err, TernError::Encoding(_)));
    }

    #[test]
    fn test_decode_rejects_non_object_body() {
        let codec = DocumentCodec::new();
        assert!(codec.decode(b"[1, 2]").is_err());
        assert!(codec.decode(b"not json").is_err());
    }

    #[test]
    fn test_unmapped_fields_pass_through() -> Result<()> {
        // Dynamic-mapping engines accept undeclared fields; so does the codec.
        let codec = DocumentCodec::with_mapping(catalog_mapping());
        let doc = Document::new().add_text("studymodel", "201001");
        let decoded = codec.decode(&codec.encode(&doc)?)?;
        assert_eq!(decoded, doc);
        Ok(())
    }
}
