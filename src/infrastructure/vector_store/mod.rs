//! Vector store implementations

mod factory;
mod in_memory;
mod pgvector;

pub use factory::{VectorStoreConfig, VectorStoreFactory, VectorStoreKind};
pub use in_memory::InMemoryVectorStore;
pub use pgvector::{PgVectorStore, PgvectorConfig};
