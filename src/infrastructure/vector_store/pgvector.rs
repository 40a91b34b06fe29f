//! pgvector-backed vector store

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::postgres::{PgPool, PgRow};
use sqlx::Row;
use tokio::sync::RwLock;
use tracing::{debug, error};

use crate::domain::vector_store::{
    OrderBy, ScoredRecord, SimilarityMetric, VectorQuery, VectorRecord, VectorStore,
};
use crate::domain::DomainError;

/// Configuration for the pgvector store
#[derive(Debug, Clone, Deserialize)]
pub struct PgvectorConfig {
    /// Embedding dimensions of every collection
    pub dimensions: u32,
    /// Prefix for collection tables; the table name is prefix + collection
    #[serde(default = "default_table_prefix")]
    pub table_prefix: String,
}

fn default_table_prefix() -> String {
    "rag_".to_string()
}

impl PgvectorConfig {
    pub fn new(dimensions: u32) -> Self {
        Self {
            dimensions,
            table_prefix: default_table_prefix(),
        }
    }

    pub fn with_table_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.table_prefix = prefix.into();
        self
    }

    /// Table backing a collection; collection names are restricted to
    /// ASCII alphanumerics and underscores
    pub fn table_name(&self, collection: &str) -> Result<String, DomainError> {
        let valid = !collection.is_empty()
            && collection
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_');

        if !valid {
            return Err(DomainError::validation(format!(
                "Invalid collection name '{}'",
                collection
            )));
        }

        Ok(format!("{}{}", self.table_prefix, collection))
    }
}

/// Get the pgvector operator for a metric
fn operator(metric: SimilarityMetric) -> &'static str {
    match metric {
        SimilarityMetric::Cosine => "<=>",
        SimilarityMetric::Euclidean => "<->",
        SimilarityMetric::DotProduct => "<#>",
    }
}

fn embedding_to_pgvector(embedding: &[f32]) -> String {
    let values: Vec<String> = embedding.iter().map(|v| v.to_string()).collect();
    format!("[{}]", values.join(","))
}

fn parse_pgvector(s: &str) -> Result<Vec<f32>, DomainError> {
    let trimmed = s.trim().trim_start_matches('[').trim_end_matches(']');
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    trimmed
        .split(',')
        .map(|v| v.trim().parse::<f32>())
        .collect::<Result<Vec<f32>, _>>()
        .map_err(|e| DomainError::storage(format!("Failed to parse vector: {}", e)))
}

/// Build the SELECT for a query; `$1` is the query vector when present and
/// the partition key follows it
fn build_select(table: &str, query: &VectorQuery) -> String {
    let mut param = 0;
    let mut next_param = || {
        param += 1;
        format!("${}", param)
    };

    let distance_expr = match query.similarity {
        Some(ref expr) => format!(
            "embedding {} {}::vector",
            operator(expr.metric),
            next_param()
        ),
        None => "0::float8".to_string(),
    };

    let where_clause = if query.cross_partition {
        String::new()
    } else {
        format!(" WHERE partition_key = {}", next_param())
    };

    let order_clause = match query.order_by {
        OrderBy::Similarity => "distance ASC, written_at DESC, seq DESC",
        OrderBy::WrittenAtDesc => "written_at DESC, seq DESC",
    };

    format!(
        "SELECT id, partition_key, fields, embedding::text AS embedding, written_at, \
         ({}) AS distance FROM {}{} ORDER BY {} LIMIT {}",
        distance_expr, table, where_clause, order_clause, query.top_k
    )
}

/// Vector store over PostgreSQL with the pgvector extension
///
/// Each collection is a table with `partition_key`, `fields` (JSONB),
/// `embedding` and a server-assigned `written_at`.
#[derive(Debug)]
pub struct PgVectorStore {
    pool: PgPool,
    config: PgvectorConfig,
    ready: RwLock<HashSet<String>>,
}

impl PgVectorStore {
    pub fn new(pool: PgPool, config: PgvectorConfig) -> Self {
        Self {
            pool,
            config,
            ready: RwLock::new(HashSet::new()),
        }
    }

    pub async fn connect(database_url: &str, config: PgvectorConfig) -> Result<Self, DomainError> {
        let pool = PgPool::connect(database_url)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to connect to database: {}", e)))?;

        Ok(Self::new(pool, config))
    }

    /// Ensure the vector extension and the collection table exist
    pub async fn ensure_collection(&self, collection: &str) -> Result<String, DomainError> {
        let table = self.config.table_name(collection)?;

        if self.ready.read().await.contains(&table) {
            return Ok(table);
        }

        sqlx::query("CREATE EXTENSION IF NOT EXISTS vector")
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DomainError::storage(format!("Failed to create vector extension: {}", e))
            })?;

        let create = format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                seq BIGSERIAL,
                id VARCHAR(255) PRIMARY KEY,
                partition_key VARCHAR(255),
                fields JSONB NOT NULL DEFAULT '{{}}',
                embedding vector({}) NOT NULL,
                written_at TIMESTAMPTZ NOT NULL DEFAULT clock_timestamp()
            )
            "#,
            table, self.config.dimensions
        );

        sqlx::query(&create)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to create table: {}", e)))?;

        let index = format!(
            "CREATE INDEX IF NOT EXISTS idx_{}_written_at ON {} (written_at DESC)",
            table, table
        );

        sqlx::query(&index)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to create index: {}", e)))?;

        self.ready.write().await.insert(table.clone());
        debug!(table = %table, "Collection table ready");

        Ok(table)
    }

    fn row_to_scored(&self, row: &PgRow, query: &VectorQuery) -> Result<ScoredRecord, DomainError> {
        let fields: serde_json::Value = row.get("fields");
        let embedding: String = row.get("embedding");
        let written_at: DateTime<Utc> = row.get("written_at");
        let raw_distance: f64 = row.get("distance");

        let record = VectorRecord {
            id: row.get("id"),
            partition_key: row.get("partition_key"),
            fields: match fields {
                serde_json::Value::Object(map) => map,
                _ => serde_json::Map::new(),
            },
            vector: parse_pgvector(&embedding)?,
            written_at: Some(written_at),
        };

        Ok(match query.similarity {
            Some(ref expr) => {
                let similarity = expr.metric.similarity_from_distance(raw_distance);
                ScoredRecord::new(record, similarity, raw_distance as f32)
            }
            None => ScoredRecord::unscored(record),
        })
    }
}

#[async_trait]
impl VectorStore for PgVectorStore {
    async fn query(&self, query: VectorQuery) -> Result<Vec<ScoredRecord>, DomainError> {
        query.validate()?;

        let table = self.ensure_collection(&query.collection).await?;
        let sql = build_select(&table, &query);

        let mut statement = sqlx::query(&sql);
        if let Some(ref expr) = query.similarity {
            statement = statement.bind(embedding_to_pgvector(&expr.vector));
        }
        if !query.cross_partition {
            statement = statement.bind(query.partition_key.clone());
        }

        let rows = statement.fetch_all(&self.pool).await.map_err(|e| {
            error!(table = %table, error = %e, "Vector query failed");
            DomainError::storage(format!("Query failed: {}", e))
        })?;

        let mut results = Vec::with_capacity(rows.len());
        for row in &rows {
            let scored = self.row_to_scored(row, &query)?;

            if query
                .filter
                .is_none_or(|filter| filter.accepts(scored.similarity))
            {
                results.push(scored);
            }
        }

        debug!(
            table = %table,
            rows = rows.len(),
            results = results.len(),
            "Vector query completed"
        );

        Ok(results)
    }

    async fn insert(
        &self,
        collection: &str,
        mut record: VectorRecord,
    ) -> Result<VectorRecord, DomainError> {
        if record.vector.len() != self.config.dimensions as usize {
            return Err(DomainError::validation(format!(
                "Record vector has {} dimensions, collection expects {}",
                record.vector.len(),
                self.config.dimensions
            )));
        }

        let table = self.ensure_collection(collection).await?;
        let sql = format!(
            "INSERT INTO {} (id, partition_key, fields, embedding) \
             VALUES ($1, $2, $3, $4::vector) RETURNING written_at",
            table
        );

        let row = sqlx::query(&sql)
            .bind(&record.id)
            .bind(&record.partition_key)
            .bind(serde_json::Value::Object(record.fields.clone()))
            .bind(embedding_to_pgvector(&record.vector))
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Insert failed: {}", e)))?;

        record.written_at = Some(row.get("written_at"));

        Ok(record)
    }

    async fn health_check(&self) -> Result<bool, DomainError> {
        let result = sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Health check failed: {}", e)))?;

        let _: i32 = result.get(0);
        Ok(true)
    }

    fn store_type(&self) -> &'static str {
        "pgvector"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_name() {
        let config = PgvectorConfig::new(1536);

        assert_eq!(config.table_name("cache").unwrap(), "rag_cache");
        assert!(config.table_name("docs; DROP TABLE x").is_err());
        assert!(config.table_name("").is_err());
    }

    #[test]
    fn test_operators() {
        assert_eq!(operator(SimilarityMetric::Cosine), "<=>");
        assert_eq!(operator(SimilarityMetric::Euclidean), "<->");
        assert_eq!(operator(SimilarityMetric::DotProduct), "<#>");
    }

    #[test]
    fn test_vector_text_round_trip() {
        let text = embedding_to_pgvector(&[0.5, -1.0, 2.25]);
        assert_eq!(text, "[0.5,-1,2.25]");
        assert_eq!(parse_pgvector(&text).unwrap(), vec![0.5, -1.0, 2.25]);
        assert!(parse_pgvector("[a,b]").is_err());
    }

    #[test]
    fn test_build_similarity_select() {
        let query = VectorQuery::new("cache")
            .similar_to(vec![1.0], SimilarityMetric::Cosine)
            .top_k(1);

        let sql = build_select("rag_cache", &query);

        assert!(sql.contains("embedding <=> $1::vector"));
        assert!(sql.contains("ORDER BY distance ASC, written_at DESC"));
        assert!(sql.ends_with("LIMIT 1"));
        assert!(!sql.contains("WHERE"));
    }

    #[test]
    fn test_build_recency_select_in_partition() {
        let query = VectorQuery::new("cache")
            .order_by(OrderBy::WrittenAtDesc)
            .in_partition("p1")
            .top_k(3);

        let sql = build_select("rag_cache", &query);

        assert!(sql.contains("WHERE partition_key = $1"));
        assert!(sql.contains("ORDER BY written_at DESC, seq DESC LIMIT 3"));
    }
}
