//! Vector index trait for similarity retrieval

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::Document;

/// Summary statistics of an index
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexStats {
    /// Vector dimensionality
    #[serde(default)]
    pub dimension: usize,
    /// Number of stored vectors
    #[serde(default)]
    pub total_vector_count: u64,
    /// Fraction of capacity in use
    #[serde(default)]
    pub index_fullness: f64,
}

/// Trait for read-only nearest-neighbour retrieval
///
/// Implementations:
/// - `PineconeIndex`: managed Pinecone index
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Return the `top_k` documents closest to `vector`, most similar first
    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<Document>>;

    /// Describe the index
    async fn describe(&self) -> Result<IndexStats>;

    /// Get index name for logging
    fn name(&self) -> &str;
}
