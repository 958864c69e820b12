// Embeddings module
// Trait seam for the hosted embedding provider plus the NVIDIA NIM client

pub mod nvidia;

pub use nvidia::NvidiaClient;

use async_trait::async_trait;

use crate::Result;

/// Opaque text-to-vector function. The output dimension is fixed per
/// provider and must match the vector index's declared dimension exactly.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single retrieval query.
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed catalog documents for indexing.
    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Fixed output dimension of this provider's model.
    fn dimension(&self) -> usize;
}
