use crate::{
    constants::{INDEX_FILE_NAME, METADATA_DOCUMENT_ID},
    errors::StoreError,
    providers::{ai::EmbeddingProvider, db::storage::VectorStore},
    types::{DocumentMetadataMap, SearchHit},
};
use async_trait::async_trait;
use chrono::Utc;
use std::{
    fmt::{self, Debug},
    path::Path,
    sync::Arc,
};
use tracing::{debug, info, instrument};
use turso::{params, Database, Value as TursoValue};
use uuid::Uuid;

pub mod sql;

/// A vector store backed by a local SQLite-compatible database (Turso).
///
/// Embeddings are computed by the configured `EmbeddingProvider` and kept as
/// an `f32` blob next to the document text and its metadata. Cloning the
/// store shares the same underlying database, which is how an in-memory store
/// is shared between handles in tests.
#[derive(Clone)]
pub struct SqliteVectorStore {
    db: Database,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl SqliteVectorStore {
    /// Opens (or creates) the index inside `persist_directory`, creating the
    /// directory first if it does not exist.
    pub async fn open(
        persist_directory: impl AsRef<Path>,
        embedder: Arc<dyn EmbeddingProvider>,
    ) -> Result<Self, StoreError> {
        let dir = persist_directory.as_ref();
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|source| StoreError::Directory {
                path: dir.display().to_string(),
                source,
            })?;
        let db_path = dir.join(INDEX_FILE_NAME);
        Self::new(&db_path.to_string_lossy(), embedder).await
    }

    /// Creates a store from a database file path, or `":memory:"` for an
    /// isolated in-memory index. The schema is created if missing.
    pub async fn new(db_path: &str, embedder: Arc<dyn EmbeddingProvider>) -> Result<Self, StoreError> {
        let db = turso::Builder::new_local(db_path).build().await?;

        // WAL has no effect on in-memory databases but is safe to request.
        let conn = db.connect()?;
        conn.query("PRAGMA journal_mode=WAL;", ()).await?;

        let store = Self { db, embedder };
        store.initialize_schema().await?;
        info!(db_path = %db_path, "Vector index ready.");
        Ok(store)
    }

    /// Ensures that all required tables exist. Idempotent.
    pub async fn initialize_schema(&self) -> Result<(), StoreError> {
        let conn = self.db.connect()?;
        for statement in sql::ALL_TABLE_CREATION_SQL {
            conn.execute(statement, ()).await?;
        }
        Ok(())
    }

    /// Number of documents currently in the index.
    pub async fn document_count(&self) -> Result<u64, StoreError> {
        let conn = self.db.connect()?;
        let mut rows = conn.query(sql::COUNT_TENDER_DOCUMENTS, ()).await?;
        let count = match rows.next().await? {
            Some(row) => match row.get_value(0)? {
                TursoValue::Integer(n) => n.max(0) as u64,
                _ => 0,
            },
            None => 0,
        };
        Ok(count)
    }
}

impl Debug for SqliteVectorStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteVectorStore")
            .field("embedder", &self.embedder)
            .finish_non_exhaustive()
    }
}

/// Packs an embedding into the `f32` blob layout the vector functions read.
fn vector_blob(vector: &[f32]) -> Vec<u8> {
    vector.iter().flat_map(|f| f.to_le_bytes()).collect()
}

/// Renders an embedding as the JSON array text accepted by `vector32()`.
fn vector_literal(vector: &[f32]) -> String {
    format!(
        "[{}]",
        vector
            .iter()
            .map(|f| f.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    )
}

fn text_value(value: TursoValue) -> String {
    match value {
        TursoValue::Text(s) => s,
        _ => String::new(),
    }
}

#[async_trait]
impl VectorStore for SqliteVectorStore {
    #[instrument(skip(self, text, metadata), fields(text_chars = text.len()))]
    async fn add_document(
        &self,
        text: &str,
        mut metadata: DocumentMetadataMap,
    ) -> Result<String, StoreError> {
        let document_id = Uuid::new_v4().to_string();
        let embedding = self.embedder.embed(text).await?;
        metadata.insert(METADATA_DOCUMENT_ID.to_string(), document_id.clone());
        let metadata_json = serde_json::to_string(&metadata)?;
        let embedding_bytes = vector_blob(&embedding);

        // Each statement commits on return, so the row is durable once this resolves.
        let conn = self.db.connect()?;
        conn.execute(
            sql::UPSERT_TENDER_DOCUMENT,
            params![
                document_id.clone(),
                text,
                embedding_bytes.as_slice(),
                metadata_json,
                Utc::now().to_rfc3339()
            ],
        )
        .await?;

        info!(%document_id, dimensions = embedding.len(), "Stored tender document.");
        Ok(document_id)
    }

    #[instrument(skip(self))]
    async fn search_similar(&self, query: &str, limit: i64) -> Result<Vec<SearchHit>, StoreError> {
        let query_vector = self.embedder.embed(query).await?;
        let sql = sql::nearest_tender_documents(&vector_literal(&query_vector), limit);
        debug!(limit, "Executing vector search.");

        let conn = self.db.connect()?;
        let mut rows = conn.query(&sql, ()).await?;
        let mut hits = Vec::new();

        while let Some(row) = rows.next().await? {
            let document_id = text_value(row.get_value(0)?);
            let content = text_value(row.get_value(1)?);
            let metadata: DocumentMetadataMap = serde_json::from_str(&text_value(row.get_value(2)?))?;
            let score = match row.get_value(3)? {
                TursoValue::Real(f) => f,
                TursoValue::Integer(i) => i as f64,
                _ => 0.0,
            };
            hits.push(SearchHit {
                document_id,
                score,
                content,
                metadata,
            });
        }

        info!(hits = hits.len(), "Vector search finished.");
        Ok(hits)
    }
}
