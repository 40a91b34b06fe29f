//! Grounding documents

use serde::{Deserialize, Serialize};

use crate::domain::vector_store::{ScoredRecord, VectorRecord};
use crate::domain::DomainError;

/// A document used to ground answers
///
/// The answer pipeline only reads documents. They are written by seeding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub content_vector: Vec<f32>,
}

impl Document {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content: content.into(),
            category: category.into(),
            content_vector: Vec::new(),
        }
    }

    pub fn with_vector(mut self, vector: Vec<f32>) -> Self {
        self.content_vector = vector;
        self
    }

    pub fn has_vector(&self) -> bool {
        !self.content_vector.is_empty()
    }

    /// Text embedded for documents that arrive without a vector
    pub fn embedding_text(&self) -> String {
        if self.title.is_empty() {
            self.content.clone()
        } else {
            format!("{}\n{}", self.title, self.content)
        }
    }

    pub fn into_record(self) -> VectorRecord {
        let partition = if self.category.is_empty() {
            self.id.clone()
        } else {
            self.category.clone()
        };

        VectorRecord::new(self.id, self.content_vector)
            .with_partition_key(partition)
            .with_field("title", self.title)
            .with_field("content", self.content)
            .with_field("category", self.category)
    }
}

/// A document returned by knowledge retrieval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeHit {
    pub content: String,
    pub title: String,
    pub category: String,
    /// Lower is closer
    pub distance: f32,
}

impl TryFrom<ScoredRecord> for KnowledgeHit {
    type Error = DomainError;

    fn try_from(scored: ScoredRecord) -> Result<Self, Self::Error> {
        let record = scored.record;
        let content = record.str_field("content").ok_or_else(|| {
            DomainError::retrieval(format!("Document '{}' has no content", record.id))
        })?;

        Ok(Self {
            content: content.to_string(),
            title: record.str_field("title").unwrap_or_default().to_string(),
            category: record.str_field("category").unwrap_or_default().to_string(),
            distance: scored.distance,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_into_record() {
        let record = Document::new("1", "Azure Blob Storage", "Object storage", "Storage")
            .with_vector(vec![0.5, 0.5])
            .into_record();

        assert_eq!(record.id, "1");
        assert_eq!(record.partition_key.as_deref(), Some("Storage"));
        assert_eq!(record.str_field("content"), Some("Object storage"));
        assert_eq!(record.vector, vec![0.5, 0.5]);
    }

    #[test]
    fn test_document_deserializes_reference_shape() {
        let json = r#"{"id":"7","title":"Azure Functions","content":"Serverless compute","category":"Compute"}"#;
        let doc: Document = serde_json::from_str(json).unwrap();

        assert_eq!(doc.title, "Azure Functions");
        assert!(!doc.has_vector());
        assert_eq!(doc.embedding_text(), "Azure Functions\nServerless compute");
    }

    #[test]
    fn test_hit_from_scored_record() {
        let record = Document::new("1", "Title", "Body", "Cat").into_record();
        let hit = KnowledgeHit::try_from(ScoredRecord::new(record, 0.8, 0.2)).unwrap();

        assert_eq!(hit.content, "Body");
        assert_eq!(hit.category, "Cat");
        assert!((hit.distance - 0.2).abs() < f32::EPSILON);
    }

    #[test]
    fn test_hit_requires_content() {
        let record = VectorRecord::new("1", vec![1.0]);
        assert!(KnowledgeHit::try_from(ScoredRecord::unscored(record)).is_err());
    }
}
