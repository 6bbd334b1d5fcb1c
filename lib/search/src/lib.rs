//! # ragx Search
//!
//! The retrieval core: domain abstraction, query pipeline, reasoning,
//! summaries, ingestion and index administration.
//!
//! [`SearchEngine`] drives one request end to end: embed the query, compile
//! the structured filters, query the index, rank and shape the matches, and
//! (optionally) attach a per-result justification from a
//! [`ReasoningStrategy`]. Domains plug in through [`SearchDomain`], which is
//! implemented for the company and property record types.
//!
//! ```no_run
//! use ragx_search::{SearchEngine, SearchRequest};
//! use ragx_core::{Company, CompanyFilterParams};
//! # async fn run(engine: SearchEngine) -> ragx_core::Result<()> {
//! let mut request: SearchRequest<CompanyFilterParams> =
//!     SearchRequest::new("logistics companies in Ohio", 5);
//! request.with_reasoning = true;
//! let results = engine.search::<Company>(&request).await?;
//! println!("{}", results.search_summary);
//! # Ok(())
//! # }
//! ```

pub mod admin;
pub mod domain;
pub mod engine;
pub mod ingest;
pub mod reasoning;
pub mod summary;

pub use admin::{ClearReport, IndexAdmin, IndexControl, IndexDescription, IndexDetails};
pub use domain::{Ranked, SearchDomain, SearchRequest, SearchResults};
pub use engine::SearchEngine;
pub use ingest::{parse_companies_from_csv, parse_properties_from_csv, IngestReport, Ingestor};
pub use reasoning::{fallback_reasoning, GroundedLlm, ReasoningStrategy, RuleBased};
