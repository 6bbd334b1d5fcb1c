//! # ragx Remote
//!
//! HTTP clients for the external collaborators ragx depends on:
//!
//! - [`OpenAiEmbedder`] - OpenAI embeddings (`text-embedding-3-large`)
//! - [`OpenAiChat`] - OpenAI chat completions (deterministic decoding)
//! - [`PineconeIndex`] - one index's data plane (query/upsert/stats/delete)
//! - [`PineconeControl`] - index lifecycle on the control plane
//!
//! Each client implements the corresponding `ragx-core` trait, so the
//! retrieval pipeline and tests never depend on this crate's HTTP details.

pub mod chat;
pub mod control;
pub mod embedding;
pub mod index;

pub use chat::OpenAiChat;
pub use control::{IndexDescription, PineconeControl, DEFAULT_CONTROL_PLANE_URL};
pub use embedding::{OpenAiEmbedder, EMBEDDING_MODEL};
pub use index::PineconeIndex;
