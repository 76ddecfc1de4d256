use crate::{
    errors::StoreError,
    types::{DocumentMetadataMap, SearchHit},
};
use async_trait::async_trait;
use std::fmt::Debug;

/// A persistent, embedding-backed document index.
///
/// Documents are only ever added; this service never updates or deletes them.
#[async_trait]
pub trait VectorStore: Send + Sync + Debug {
    /// Embeds `text`, upserts it under a fresh UUID together with `metadata`
    /// (plus a `document_id` entry) and returns that UUID.
    async fn add_document(
        &self,
        text: &str,
        metadata: DocumentMetadataMap,
    ) -> Result<String, StoreError>;

    /// Returns at most `limit` documents closest to `query`, best match first.
    ///
    /// `limit` is passed to the index as-is.
    async fn search_similar(&self, query: &str, limit: i64) -> Result<Vec<SearchHit>, StoreError>;
}
