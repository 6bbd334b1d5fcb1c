//! # ragx Core
//!
//! Core library for the ragx retrieval layer.
//!
//! This crate provides the shared data model and the contracts the retrieval
//! pipeline is built on:
//!
//! - [`MetadataValue`] / [`Metadata`] - flat metadata attached to each vector
//! - [`Company`] / [`Property`] - the two fixed domain record schemas
//! - [`FilterCondition`] - the tagged predicate tree compiled from raw
//!   filter parameters, serialized into the index's operator language
//! - [`Embedder`] / [`VectorIndex`] / [`ChatGenerator`] - collaborator traits
//!   implemented over HTTP in `ragx-remote` and by test doubles in tests
//!
//! ## Example
//!
//! ```rust
//! use ragx_core::{CompanyFilterParams, FilterCondition};
//!
//! let params = CompanyFilterParams {
//!     industry_list: Some("EdTech, SaaS Data Analytics".to_string()),
//!     employees_min: Some("100".to_string()),
//!     ..Default::default()
//! };
//! let compiled = params.compile();
//! assert!(compiled.index_filter.contains_key("industry"));
//! assert!(matches!(compiled.index_filter["employees"], FilterCondition::Range { .. }));
//! ```

pub mod clients;
pub mod error;
pub mod filter;
pub mod metadata;
pub mod record;

pub use clients::{
    ChatGenerator, Embedder, IndexMatch, IndexStats, VectorEntry, VectorIndex, EMBEDDING_DIM,
};
pub use error::{Error, Result};
pub use filter::{CompanyFilterParams, CompiledFilters, FilterCondition, PropertyFilterParams};
pub use metadata::{Metadata, MetadataExt, MetadataValue};
pub use record::{
    format_thousands, BasicInfo, Company, CompanyIngest, DealAnalysis, IdealOpProfile, Property,
};
