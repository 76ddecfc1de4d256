//! # SQLite Specific SQL Queries
//!
//! This module centralizes SQL query strings for the vector store.
//! This makes the core logic cleaner and isolates database-specific syntax.

pub const CREATE_TENDER_DOCUMENTS_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS tender_documents (
        id TEXT PRIMARY KEY,
        content TEXT NOT NULL,
        embedding BLOB NOT NULL,
        metadata TEXT NOT NULL,
        created_at TEXT NOT NULL
    );
";

/// All statements needed to bring a fresh database up to the current schema.
pub const ALL_TABLE_CREATION_SQL: &[&str] = &[CREATE_TENDER_DOCUMENTS_TABLE];

/// Inserts or replaces a document. Expects `?1` id, `?2` content, `?3` the
/// embedding as little-endian `f32` bytes, `?4` metadata JSON and `?5` a timestamp.
pub const UPSERT_TENDER_DOCUMENT: &str = "
    INSERT INTO tender_documents (id, content, embedding, metadata, created_at)
    VALUES (?1, ?2, ?3, ?4, ?5)
    ON CONFLICT(id) DO UPDATE SET
        content = excluded.content,
        embedding = excluded.embedding,
        metadata = excluded.metadata;
";

pub const COUNT_TENDER_DOCUMENTS: &str = "SELECT COUNT(*) FROM tender_documents;";

/// Returns the SQL for a nearest-neighbour search over `tender_documents`.
///
/// Rows come back as `(id, content, metadata, distance)`, smallest cosine
/// distance first.
///
/// # Arguments
///
/// * `vector_literal`: The query embedding as a JSON array, e.g. `[0.1, 0.2]`.
/// * `limit`: The maximum number of results to return.
pub fn nearest_tender_documents(vector_literal: &str, limit: i64) -> String {
    format!(
        "
        SELECT id, content, metadata,
               vector_distance_cos(embedding, vector32('{vector_literal}')) AS distance
        FROM tender_documents
        ORDER BY distance ASC
        LIMIT {limit};
    "
    )
}
