//! Knowledge base domain - grounding documents and retrieval hits

mod document;

pub use document::{Document, KnowledgeHit};
