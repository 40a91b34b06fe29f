//! Vector store construction

use serde::Deserialize;
use std::sync::Arc;

use super::{InMemoryVectorStore, PgVectorStore, PgvectorConfig};
use crate::domain::{DomainError, VectorStore};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VectorStoreKind {
    #[default]
    InMemory,
    Pgvector,
}

/// Vector store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct VectorStoreConfig {
    #[serde(default, rename = "type")]
    pub kind: VectorStoreKind,
    #[serde(default)]
    pub database_url: Option<String>,
    /// Embedding dimensions, required by pgvector table definitions
    #[serde(default = "default_dimensions")]
    pub dimensions: u32,
    #[serde(default = "default_table_prefix")]
    pub table_prefix: String,
}

fn default_dimensions() -> u32 {
    1536
}

fn default_table_prefix() -> String {
    "rag_".to_string()
}

impl Default for VectorStoreConfig {
    fn default() -> Self {
        Self {
            kind: VectorStoreKind::default(),
            database_url: None,
            dimensions: default_dimensions(),
            table_prefix: default_table_prefix(),
        }
    }
}

/// Factory for creating vector stores
#[derive(Debug)]
pub struct VectorStoreFactory;

impl VectorStoreFactory {
    pub async fn create(config: &VectorStoreConfig) -> Result<Arc<dyn VectorStore>, DomainError> {
        match config.kind {
            VectorStoreKind::InMemory => Ok(Arc::new(InMemoryVectorStore::new())),
            VectorStoreKind::Pgvector => {
                let url = config.database_url.as_deref().ok_or_else(|| {
                    DomainError::configuration("pgvector store requires store.database_url")
                })?;

                let pg_config =
                    PgvectorConfig::new(config.dimensions).with_table_prefix(&config.table_prefix);
                let store = PgVectorStore::connect(url, pg_config).await?;

                Ok(Arc::new(store))
            }
        }
    }
}
