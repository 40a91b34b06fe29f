//! Records stored in a vector collection

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single record in a vector collection
///
/// `fields` carries the collection-specific payload (document content, cached
/// completion, token counts). `written_at` is assigned by the store on insert
/// and is strictly increasing within a store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorRecord {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partition_key: Option<String>,
    #[serde(default)]
    pub fields: Map<String, Value>,
    pub vector: Vec<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub written_at: Option<DateTime<Utc>>,
}

impl VectorRecord {
    pub fn new(id: impl Into<String>, vector: Vec<f32>) -> Self {
        Self {
            id: id.into(),
            partition_key: None,
            fields: Map::new(),
            vector,
            written_at: None,
        }
    }

    pub fn with_partition_key(mut self, key: impl Into<String>) -> Self {
        self.partition_key = Some(key.into());
        self
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn with_written_at(mut self, written_at: DateTime<Utc>) -> Self {
        self.written_at = Some(written_at);
        self
    }

    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }

    pub fn u32_field(&self, name: &str) -> Option<u32> {
        self.fields
            .get(name)
            .and_then(Value::as_u64)
            .and_then(|v| u32::try_from(v).ok())
    }

    pub fn dimensions(&self) -> usize {
        self.vector.len()
    }
}

/// A record returned by a query, with its score against the query vector
///
/// Without a similarity expression both scores are zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredRecord {
    pub record: VectorRecord,
    pub similarity: f32,
    pub distance: f32,
}

impl ScoredRecord {
    pub fn new(record: VectorRecord, similarity: f32, distance: f32) -> Self {
        Self {
            record,
            similarity,
            distance,
        }
    }

    pub fn unscored(record: VectorRecord) -> Self {
        Self::new(record, 0.0, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_fields() {
        let record = VectorRecord::new("doc-1", vec![0.1, 0.2])
            .with_partition_key("docs")
            .with_field("content", "Azure Blob Storage stores objects")
            .with_field("totalTokens", 59u32);

        assert_eq!(record.partition_key.as_deref(), Some("docs"));
        assert_eq!(
            record.str_field("content"),
            Some("Azure Blob Storage stores objects")
        );
        assert_eq!(record.u32_field("totalTokens"), Some(59));
        assert_eq!(record.str_field("missing"), None);
        assert_eq!(record.dimensions(), 2);
    }

    #[test]
    fn test_record_deserializes_without_optional_fields() {
        let record: VectorRecord =
            serde_json::from_str(r#"{"id":"x","vector":[1.0,0.0]}"#).unwrap();

        assert_eq!(record.id, "x");
        assert!(record.fields.is_empty());
        assert!(record.written_at.is_none());
    }
}
