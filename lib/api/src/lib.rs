//! # ragx API
//!
//! The REST surface: search, ingestion and index administration over HTTP,
//! built on actix-web. Handlers stay thin; all behavior lives in
//! `ragx-search`.

pub mod rest;

pub use rest::{configure, AppState, DomainState, RestApi};
