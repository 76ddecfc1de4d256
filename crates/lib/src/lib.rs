//! # Tender Analysis Core
//!
//! This crate holds the domain logic of the `tenderlens` service: the LLM-backed
//! tender analyzer, the embedding-backed document store, the prompt templates and
//! the helpers that flatten an analysis into response-ready fields.
//!
//! HTTP concerns live in `tenderlens-server` and PDF text extraction lives in
//! `tenderlens-pdf`; this crate only deals with text.

pub mod analysis;
pub mod constants;
pub mod errors;
pub mod prompts;
pub mod providers;
pub mod report;
pub mod types;

pub use analysis::{parse_sections, truncate_chars, TenderAnalyzer};
pub use errors::{AnalysisError, ProviderError, StoreError};
pub use providers::{
    ai::{embedding::EmbeddingProvider, AiProvider},
    db::storage::VectorStore,
};
pub use report::{TenderMeta, TenderReport};
pub use types::{AnalysisResult, DocumentMetadataMap, SearchHit};
