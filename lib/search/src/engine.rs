//! The query-time retrieval engine.
//!
//! One request flows embed -> compile filters -> index query -> rank/shape
//! -> optional per-result reasoning -> summary. Embedding and index failures
//! are recovered here into an error-annotated (but well-formed) result set;
//! a metadata schema violation on a returned match propagates, because it
//! means the index holds records from an incompatible schema.

use crate::domain::{Ranked, SearchDomain, SearchRequest, SearchResults};
use crate::reasoning::{fallback_reasoning, ReasoningStrategy};
use ragx_core::{Embedder, Result, VectorIndex};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Retrieval engine over injected collaborator clients.
///
/// Stateless across requests; clone fields are `Arc`s, so engines are cheap
/// to share with an HTTP server.
#[derive(Clone)]
pub struct SearchEngine {
    embedder: Arc<dyn Embedder>,
    index: Arc<dyn VectorIndex>,
    reasoner: Option<Arc<dyn ReasoningStrategy>>,
}

impl SearchEngine {
    pub fn new(embedder: Arc<dyn Embedder>, index: Arc<dyn VectorIndex>) -> Self {
        Self { embedder, index, reasoner: None }
    }

    /// Attach the reasoning strategy used when a request asks for
    /// per-result justifications.
    pub fn with_reasoner(mut self, reasoner: Arc<dyn ReasoningStrategy>) -> Self {
        self.reasoner = Some(reasoner);
        self
    }

    pub fn index(&self) -> &Arc<dyn VectorIndex> {
        &self.index
    }

    pub fn embedder(&self) -> &Arc<dyn Embedder> {
        &self.embedder
    }

    /// Run one retrieval request for domain `D`.
    ///
    /// Returns `Ok` with an error-annotated result set on embedding or index
    /// failure; returns `Err` only for a metadata schema violation.
    pub async fn search<D: SearchDomain>(
        &self,
        request: &SearchRequest<D::Filters>,
    ) -> Result<SearchResults<D>> {
        let vector = match self.embedder.embed(&request.query).await {
            Ok(vector) => vector,
            Err(e) => {
                warn!(query = %request.query, error = %e, "query embedding failed");
                return Ok(Self::error_results(
                    request,
                    "Failed to generate query embedding".to_string(),
                    "Unable to process query".to_string(),
                ));
            }
        };

        let compiled = D::compile_filters(&request.filters);
        let filter = (!compiled.is_empty()).then_some(&compiled.index_filter);

        let matches = match self.index.query(&vector, request.top_k, filter).await {
            Ok(matches) => matches,
            Err(e) => {
                warn!(query = %request.query, error = %e, "index query failed");
                return Ok(Self::error_results(
                    request,
                    format!("Search error: {e}"),
                    "Search encountered an error".to_string(),
                ));
            }
        };
        debug!(query = %request.query, matches = matches.len(), "index query succeeded");

        let mut items: Vec<Ranked<D>> = Vec::with_capacity(matches.len());
        for (position, m) in matches.iter().enumerate() {
            // Upstream order is trusted; rank is ours to assign.
            items.push(Ranked {
                rank: position + 1,
                score: round3(m.score),
                record: D::from_metadata(&m.metadata)?,
                reasoning: None,
            });
        }

        if request.with_reasoning {
            // Sequential, in rank order: the latency-dominant path, kept
            // serial so repeated requests explain results identically.
            for (item, m) in items.iter_mut().zip(matches.iter()) {
                item.reasoning = Some(match &self.reasoner {
                    Some(reasoner) => {
                        match reasoner.explain(&request.query, &m.metadata, item.score).await {
                            Ok(text) => text,
                            Err(e) => {
                                warn!(id = %m.id, error = %e, "reasoning failed, using fallback");
                                fallback_reasoning(item.score)
                            }
                        }
                    }
                    None => fallback_reasoning(item.score),
                });
            }
        }

        let search_summary = D::summarize(&request.query, &items, &compiled.applied);
        let total_found = items.len();
        Ok(SearchResults {
            query: request.query.clone(),
            top_k: request.top_k,
            filters_applied: compiled.applied,
            items,
            total_found,
            search_summary,
            error: None,
        })
    }

    fn error_results<D: SearchDomain>(
        request: &SearchRequest<D::Filters>,
        error: String,
        search_summary: String,
    ) -> SearchResults<D> {
        SearchResults {
            query: request.query.clone(),
            top_k: request.top_k,
            filters_applied: BTreeMap::new(),
            items: Vec::new(),
            total_found: 0,
            search_summary,
            error: Some(error),
        }
    }
}

/// Round a cosine score to exactly 3 decimal digits.
fn round3(score: f32) -> f64 {
    (f64::from(score) * 1000.0).round() / 1000.0
}
