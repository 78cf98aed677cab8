//! Typed index settings and mapping documents.
//!
//! [`IndexSettings`] and [`Mapping`] serialize to the exact JSON the
//! engine's index-creation endpoint expects (`number_of_shards`,
//! `_source.excludes`, `properties`, ...). The mapping also doubles as
//! the declared schema a [`DocumentCodec`](crate::codec::DocumentCodec)
//! validates against.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Shard and replica configuration for a new index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexSettings {
    pub number_of_shards: u32,
    pub number_of_replicas: u32,
}

impl IndexSettings {
    pub fn new(shards: u32, replicas: u32) -> Self {
        Self {
            number_of_shards: shards,
            number_of_replicas: replicas,
        }
    }
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self {
            number_of_shards: 1,
            number_of_replicas: 1,
        }
    }
}

/// Field data types the mapping can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Keyword,
    Integer,
    Long,
    Float,
    Double,
    Boolean,
    Date,
}

impl FieldType {
    /// Returns true for the numeric types.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            FieldType::Integer | FieldType::Long | FieldType::Float | FieldType::Double
        )
    }
}

/// Declared options for a single field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldMapping {
    #[serde(rename = "type")]
    pub field_type: FieldType,

    /// Analyzer applied at index time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analyzer: Option<String>,

    /// Analyzer applied to query text, when it differs from `analyzer`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_analyzer: Option<String>,

    /// Set to `false` to store a field without making it searchable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<bool>,

    /// Accepted date format(s), `||`-separated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl FieldMapping {
    pub fn new(field_type: FieldType) -> Self {
        Self {
            field_type,
            analyzer: None,
            search_analyzer: None,
            index: None,
            format: None,
        }
    }

    pub fn analyzer(mut self, analyzer: impl Into<String>) -> Self {
        self.analyzer = Some(analyzer.into());
        self
    }

    pub fn search_analyzer(mut self, analyzer: impl Into<String>) -> Self {
        self.search_analyzer = Some(analyzer.into());
        self
    }

    pub fn index(mut self, index: bool) -> Self {
        self.index = Some(index);
        self
    }

    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }
}

/// Source filtering section of a mapping.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceFilter {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub excludes: Vec<String>,
}

/// Schema for an index: field types, analyzers, and source filtering.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Mapping {
    #[serde(rename = "_source", default, skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceFilter>,

    #[serde(default)]
    pub properties: HashMap<String, FieldMapping>,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> MappingBuilder {
        MappingBuilder::default()
    }

    /// Declared type of a field, if the mapping knows it.
    pub fn field_type(&self, name: &str) -> Option<FieldType> {
        self.properties.get(name).map(|f| f.field_type)
    }

    /// Declared date format(s) of a field.
    pub fn date_format(&self, name: &str) -> Option<&str> {
        self.properties.get(name).and_then(|f| f.format.as_deref())
    }
}

#[derive(Default)]
pub struct MappingBuilder {
    source_excludes: Vec<String>,
    properties: HashMap<String, FieldMapping>,
}

impl MappingBuilder {
    pub fn add_field(mut self, name: impl Into<String>, mapping: FieldMapping) -> Self {
        self.properties.insert(name.into(), mapping);
        self
    }

    pub fn add_text(self, name: impl Into<String>) -> Self {
        self.add_field(name, FieldMapping::new(FieldType::Text))
    }

    pub fn add_keyword(self, name: impl Into<String>) -> Self {
        self.add_field(name, FieldMapping::new(FieldType::Keyword))
    }

    pub fn add_float(self, name: impl Into<String>) -> Self {
        self.add_field(name, FieldMapping::new(FieldType::Float))
    }

    pub fn add_date(self, name: impl Into<String>) -> Self {
        self.add_field(name, FieldMapping::new(FieldType::Date))
    }

    /// Exclude a field from the stored `_source`.
    pub fn exclude_source(mut self, name: impl Into<String>) -> Self {
        self.source_excludes.push(name.into());
        self
    }

    pub fn build(self) -> Mapping {
        let source = if self.source_excludes.is_empty() {
            None
        } else {
            Some(SourceFilter {
                excludes: self.source_excludes,
            })
        };
        Mapping {
            source,
            properties: self.properties,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_settings_wire_shape() {
        let settings = IndexSettings::new(3, 1);
        let value = serde_json::to_value(&settings).unwrap();
        assert_eq!(
            value,
            json!({"number_of_shards": 3, "number_of_replicas": 1})
        );
    }

    #[test]
    fn test_mapping_wire_shape() {
        let mapping = Mapping::builder()
            .add_field(
                "name",
                FieldMapping::new(FieldType::Text)
                    .analyzer("ik_max_word")
                    .search_analyzer("ik_smart"),
            )
            .add_field("pic", FieldMapping::new(FieldType::Text).index(false))
            .add_float("price")
            .add_field(
                "timestamp",
                FieldMapping::new(FieldType::Date).format("yyyy-MM-dd HH:mm:ss||yyyy-MM-dd"),
            )
            .exclude_source("description")
            .build();

        let value = serde_json::to_value(&mapping).unwrap();
        assert_eq!(value["_source"]["excludes"], json!(["description"]));
        assert_eq!(value["properties"]["name"]["type"], "text");
        assert_eq!(value["properties"]["name"]["analyzer"], "ik_max_word");
        assert_eq!(value["properties"]["name"]["search_analyzer"], "ik_smart");
        assert_eq!(value["properties"]["pic"]["index"], json!(false));
        assert_eq!(value["properties"]["price"]["type"], "float");
        assert_eq!(
            value["properties"]["timestamp"]["format"],
            "yyyy-MM-dd HH:mm:ss||yyyy-MM-dd"
        );
        // Absent options stay off the wire entirely.
        assert!(value["properties"]["price"].get("analyzer").is_none());
    }

    #[test]
    fn test_mapping_without_excludes_omits_source() {
        let mapping = Mapping::builder().add_text("name").build();
        let value = serde_json::to_value(&mapping).unwrap();
        assert!(value.get("_source").is_none());
    }

    #[test]
    fn test_field_type_lookup() {
        let mapping = Mapping::builder().add_float("price").build();
        assert_eq!(mapping.field_type("price"), Some(FieldType::Float));
        assert_eq!(mapping.field_type("missing"), None);
        assert!(FieldType::Float.is_numeric());
        assert!(!FieldType::Text.is_numeric());
    }
}
