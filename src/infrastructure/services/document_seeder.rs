//! Loads grounding documents into the knowledge collection

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use super::EmbeddingClient;
use crate::domain::knowledge_base::Document;
use crate::domain::vector_store::VectorStore;
use crate::domain::DomainError;

/// Outcome of a seeding run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub inserted: usize,
    /// Documents that arrived without a vector and were embedded
    pub embedded: usize,
    pub failed: Vec<(String, String)>,
}

/// Writes documents into the knowledge collection, embedding those that
/// arrive without a vector
pub struct DocumentSeeder {
    store: Arc<dyn VectorStore>,
    embedding: Arc<EmbeddingClient>,
    collection: String,
}

impl DocumentSeeder {
    pub fn new(
        store: Arc<dyn VectorStore>,
        embedding: Arc<EmbeddingClient>,
        collection: impl Into<String>,
    ) -> Self {
        Self {
            store,
            embedding,
            collection: collection.into(),
        }
    }

    /// Parse a JSON array of documents
    pub fn parse(json: &str) -> Result<Vec<Document>, DomainError> {
        serde_json::from_str(json)
            .map_err(|e| DomainError::validation(format!("Invalid documents file: {}", e)))
    }

    pub async fn seed_file(&self, path: &Path) -> Result<SeedReport, DomainError> {
        let json = tokio::fs::read_to_string(path).await.map_err(|e| {
            DomainError::configuration(format!("Failed to read {}: {}", path.display(), e))
        })?;

        self.seed(Self::parse(&json)?).await
    }

    /// Insert documents one by one; a failing document does not stop the run
    /// unless embedding is unavailable
    pub async fn seed(&self, documents: Vec<Document>) -> Result<SeedReport, DomainError> {
        let mut report = SeedReport::default();

        for mut document in documents {
            if !document.has_vector() {
                document.content_vector = self.embedding.embed(&document.embedding_text()).await?;
                report.embedded += 1;
            }

            let id = document.id.clone();
            match self.store.insert(&self.collection, document.into_record()).await {
                Ok(_) => report.inserted += 1,
                Err(e) => {
                    warn!(document_id = %id, error = %e, "Failed to insert document");
                    report.failed.push((id, e.to_string()));
                }
            }
        }

        info!(
            collection = %self.collection,
            inserted = report.inserted,
            embedded = report.embedded,
            failed = report.failed.len(),
            "Seeding completed"
        );

        Ok(report)
    }
}

impl fmt::Debug for DocumentSeeder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentSeeder")
            .field("store", &self.store.store_type())
            .field("collection", &self.collection)
            .finish()
    }
}
