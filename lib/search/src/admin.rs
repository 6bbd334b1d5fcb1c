//! Index administration: details and clearing.
//!
//! Details assembly is best-effort throughout. Stats, control-plane info and
//! the sample record are fetched independently; each failure lands in its own
//! `*_error` field instead of failing the whole report.

use async_trait::async_trait;
use ragx_core::{Metadata, Result, VectorIndex};
use ragx_remote::PineconeControl;
pub use ragx_remote::IndexDescription;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::warn;

/// Control-plane operations the admin layer needs. Kept narrow so tests can
/// stand in for the real client.
#[async_trait]
pub trait IndexControl: Send + Sync {
    async fn describe(&self, name: &str) -> Result<IndexDescription>;
    async fn delete(&self, name: &str) -> Result<()>;
}

#[async_trait]
impl IndexControl for PineconeControl {
    async fn describe(&self, name: &str) -> Result<IndexDescription> {
        self.describe_index(name).await
    }

    async fn delete(&self, name: &str) -> Result<()> {
        self.delete_index(name).await
    }
}

/// Best-effort index report. Each section is independent.
#[derive(Debug, Clone, Serialize)]
pub struct IndexDetails {
    pub index_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<IndexStatsReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<IndexDescription>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info_error: Option<String>,
    /// A stored record's metadata, or the ingestion schema as a fallback.
    pub sample_structure: Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct IndexStatsReport {
    pub total_vector_count: u64,
    pub namespaces: std::collections::BTreeMap<String, u64>,
    pub dimension: Option<usize>,
    pub index_fullness: Option<f64>,
}

/// Outcome of a clear operation.
#[derive(Debug, Clone, Serialize)]
pub struct ClearReport {
    pub index_name: String,
    pub deleted_index: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_all_vectors: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Administrative operations over one configured index.
#[derive(Clone)]
pub struct IndexAdmin {
    index: Arc<dyn VectorIndex>,
    control: Arc<dyn IndexControl>,
    index_name: String,
}

impl IndexAdmin {
    pub fn new(
        index: Arc<dyn VectorIndex>,
        control: Arc<dyn IndexControl>,
        index_name: impl Into<String>,
    ) -> Self {
        Self { index, control, index_name: index_name.into() }
    }

    /// Assemble the details report. Never fails; partial data carries the
    /// per-section error strings.
    pub async fn details(&self, sample_limit: usize) -> IndexDetails {
        let (stats, stats_error) = match self.index.describe_stats().await {
            Ok(stats) => (
                Some(IndexStatsReport {
                    total_vector_count: stats.total_vector_count,
                    namespaces: stats.namespaces,
                    dimension: stats.dimension,
                    index_fullness: stats.index_fullness,
                }),
                None,
            ),
            Err(e) => {
                warn!(index = %self.index_name, error = %e, "stats lookup failed");
                (None, Some(e.to_string()))
            }
        };

        let (info, info_error) = match self.control.describe(&self.index_name).await {
            Ok(description) => (Some(description), None),
            Err(e) => (None, Some(e.to_string())),
        };

        IndexDetails {
            index_name: self.index_name.clone(),
            stats,
            stats_error,
            info,
            info_error,
            sample_structure: self.sample_structure(sample_limit).await,
        }
    }

    /// Delete all vectors, or the whole index when `delete_index` is set.
    pub async fn clear(&self, delete_index: bool) -> ClearReport {
        let outcome = if delete_index {
            self.control.delete(&self.index_name).await
        } else {
            self.index.clear().await
        };
        match outcome {
            Ok(()) => ClearReport {
                index_name: self.index_name.clone(),
                deleted_index: delete_index,
                deleted_all_vectors: (!delete_index).then_some(true),
                error: None,
            },
            Err(e) => {
                warn!(index = %self.index_name, delete_index, error = %e, "clear failed");
                ClearReport {
                    index_name: self.index_name.clone(),
                    deleted_index: false,
                    deleted_all_vectors: None,
                    error: Some(e.to_string()),
                }
            }
        }
    }

    /// Fetch one stored record's metadata via list+fetch. Falls back to the
    /// ingestion schema description when nothing can be fetched.
    async fn sample_structure(&self, sample_limit: usize) -> Value {
        let ids = match self.index.list_ids(sample_limit.max(1)).await {
            Ok(ids) => ids,
            Err(_) => Vec::new(),
        };
        if !ids.is_empty() {
            if let Ok(entries) = self.index.fetch(&ids).await {
                if let Some(entry) = entries.first() {
                    return metadata_to_value(&entry.metadata);
                }
            }
        }
        schema_fallback()
    }
}

fn metadata_to_value(meta: &Metadata) -> Value {
    serde_json::to_value(meta).unwrap_or(Value::Null)
}

/// The company ingestion schema, field name to type label.
fn schema_fallback() -> Value {
    serde_json::json!({
        "company_name": "string",
        "industry": "string",
        "headquarters": "string",
        "revenue": "string",
        "employees": "int",
        "business_model": "string",
        "strategic_priorities": ["string"],
        "ideal_op_industry": "string",
        "ideal_op_functional": ["string"],
        "ideal_op_leadership": ["string"],
        "description": "string"
    })
}
