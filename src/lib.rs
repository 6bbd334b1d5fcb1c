//! # ragx
//!
//! Ingestion and retrieval over a managed vector index.
//!
//! ragx turns structured records (companies, real-estate properties) into
//! prose descriptions, embeds them with OpenAI `text-embedding-3-large`,
//! stores vector+metadata pairs in Pinecone, and answers natural-language
//! queries with ranked, filtered, optionally explained results.
//!
//! ## Quick Start
//!
//! ### As a Server
//!
//! ```bash
//! cargo install ragx
//! OPENAI_API_KEY=... PINECONE_API_KEY=... ragx --http-port 5000
//! ```
//!
//! ### As a Library
//!
//! ```rust,no_run
//! use ragx::prelude::*;
//! use std::sync::Arc;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let embedder = Arc::new(OpenAiEmbedder::new("sk-..."));
//! let control = PineconeControl::new("pc-...");
//! let description = control.ensure_index("company-information").await?;
//! let index = Arc::new(PineconeIndex::new(
//!     format!("https://{}", description.host),
//!     "pc-...",
//! ));
//!
//! let engine = SearchEngine::new(embedder, index);
//! let mut request: SearchRequest<CompanyFilterParams> =
//!     SearchRequest::new("logistics companies in the midwest", 5);
//! request.filters.employees_min = Some("100".to_string());
//!
//! let results = engine.search::<Company>(&request).await?;
//! println!("{}", results.search_summary);
//! # Ok(())
//! # }
//! ```
//!
//! ## Crate Structure
//!
//! - [`ragx-core`](https://docs.rs/ragx-core) - Records, metadata, the filter
//!   language and collaborator traits
//! - [`ragx-remote`](https://docs.rs/ragx-remote) - OpenAI and Pinecone HTTP
//!   clients
//! - [`ragx-search`](https://docs.rs/ragx-search) - Retrieval engine,
//!   reasoning, summaries, ingestion and index administration
//! - [`ragx-api`](https://docs.rs/ragx-api) - actix-web REST surface

// Re-export core types
pub use ragx_core::{
    Company, CompanyFilterParams, CompanyIngest, CompiledFilters, Embedder, Error, FilterCondition,
    IndexMatch, IndexStats, Metadata, MetadataValue, Property, PropertyFilterParams, Result,
    VectorEntry, VectorIndex, EMBEDDING_DIM,
};

// Re-export remote clients
pub use ragx_remote::{OpenAiChat, OpenAiEmbedder, PineconeControl, PineconeIndex};

// Re-export the search layer
pub use ragx_search::{
    fallback_reasoning, GroundedLlm, IndexAdmin, IngestReport, Ingestor, Ranked, ReasoningStrategy,
    RuleBased, SearchDomain, SearchEngine, SearchRequest, SearchResults,
};

// Re-export the API
pub use ragx_api::{AppState, DomainState, RestApi};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Company, CompanyFilterParams, CompanyIngest, Embedder, Error, FilterCondition, GroundedLlm,
        IndexAdmin, IngestReport, Ingestor, Metadata, MetadataValue, OpenAiChat, OpenAiEmbedder,
        PineconeControl, PineconeIndex, Property, PropertyFilterParams, Ranked, ReasoningStrategy,
        RestApi, Result, RuleBased, SearchDomain, SearchEngine, SearchRequest, SearchResults,
        VectorEntry, VectorIndex,
    };
}
