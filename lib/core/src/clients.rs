//! Collaborator contracts for the remote services the retrieval pipeline
//! depends on.
//!
//! The pipeline never talks to a provider directly; each external concern is
//! a trait here, implemented over HTTP in `ragx-remote` and by in-memory
//! doubles in tests. Clients are stateless and shared across requests.

use crate::error::Result;
use crate::filter::FilterCondition;
use crate::metadata::Metadata;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Fixed dimensionality of every vector in an index. Must match the
/// embedding model's output size.
pub const EMBEDDING_DIM: usize = 3072;

/// One stored vector with its metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorEntry {
    pub id: String,
    pub values: Vec<f32>,
    pub metadata: Metadata,
}

/// One nearest-neighbor match as returned by the index.
///
/// Score is cosine similarity in [-1, 1]. The order of a match list is
/// whatever the index returned; rank assignment happens downstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexMatch {
    pub id: String,
    pub score: f32,
    pub metadata: Metadata,
}

/// Index occupancy statistics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexStats {
    pub total_vector_count: u64,
    pub dimension: Option<usize>,
    pub index_fullness: Option<f64>,
    #[serde(default)]
    pub namespaces: BTreeMap<String, u64>,
}

/// Produces a semantic embedding for a text. Fallible, no retries: callers
/// own the failure policy.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

/// A remote similarity index.
///
/// `query` and `upsert` are the load-bearing operations; `list_ids` and
/// `fetch` are best-effort and may be unsupported by a given backend.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Nearest-neighbor query with metadata included. `filter = None` must
    /// be sent as no filter clause at all, never as an empty filter object.
    async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
        filter: Option<&BTreeMap<String, FilterCondition>>,
    ) -> Result<Vec<IndexMatch>>;

    async fn upsert(&self, entries: &[VectorEntry]) -> Result<usize>;

    async fn describe_stats(&self) -> Result<IndexStats>;

    /// Delete every vector in the index.
    async fn clear(&self) -> Result<()>;

    async fn list_ids(&self, limit: usize) -> Result<Vec<String>>;

    async fn fetch(&self, ids: &[String]) -> Result<Vec<VectorEntry>>;
}

/// A chat-completion generator used for grounded reasoning.
#[async_trait]
pub trait ChatGenerator: Send + Sync {
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String>;
}
