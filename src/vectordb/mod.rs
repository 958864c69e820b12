// Vector index module
// Trait seam for the hosted similarity-search service plus the Pinecone
// serverless REST client.

pub mod pinecone;

pub use pinecone::PineconeClient;

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::Result;

/// One record to upsert: a vector keyed by a stable id, carrying the source
/// text and metadata. Re-upserting an id overwrites it, which is what makes
/// pipeline re-runs safe.
#[derive(Debug, Clone, PartialEq)]
pub struct UpsertRecord {
    pub id: String,
    pub values: Vec<f32>,
    pub text: String,
    pub metadata: BTreeMap<String, String>,
}

/// A similarity-search hit above the score threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredDocument {
    pub text: String,
    pub metadata: BTreeMap<String, String>,
    pub score: f32,
}

/// Readiness and size of the hosted index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexStats {
    pub ready: bool,
    pub dimension: usize,
    pub vector_count: u64,
}

/// Opaque external similarity-search service.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Ensure the named index exists with this client's dimension and
    /// metric. Idempotent: an already-existing index is a no-op, not an
    /// error.
    async fn create_index(&self) -> Result<()>;

    /// Current stats of the index.
    async fn describe(&self) -> Result<IndexStats>;

    /// Write all records; all-or-nothing per invocation.
    async fn upsert(&self, records: Vec<UpsertRecord>) -> Result<()>;

    /// Top-k nearest neighbors of the query vector, keeping only hits at or
    /// above the score threshold.
    async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
        score_threshold: f32,
    ) -> Result<Vec<ScoredDocument>>;

    /// Name of the index this client talks to.
    fn index_name(&self) -> &str;
}
