//! # Search Handlers

use super::{AppError, AppState};
use crate::types::{SearchRequest, SearchResponse, SearchResultItem};
use axum::{extract::State, Json};
use axum_extra::extract::WithRejection;
use tenderlens::constants::{METADATA_ANALYSIS_SUMMARY, METADATA_TITLE};
use tokio::time::timeout;
use tracing::info;

/// Handler for `POST /search-tenders`.
///
/// Results keep the store's order and carry its score unchanged.
pub async fn search_tenders_handler(
    State(app_state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<SearchRequest>, AppError>,
) -> Result<Json<SearchResponse>, AppError> {
    info!(
        "Received tender search: '{}' (limit {})",
        payload.query, payload.limit
    );

    let hits = timeout(
        app_state.config.embedding.timeout(),
        app_state.store.search_similar(&payload.query, payload.limit),
    )
    .await
    .map_err(|_| AppError::Timeout("tender search"))??;

    let results = hits
        .into_iter()
        .map(|hit| SearchResultItem {
            title: hit.metadata.get(METADATA_TITLE).cloned(),
            summary: hit.metadata.get(METADATA_ANALYSIS_SUMMARY).cloned(),
            document_id: hit.document_id,
            score: hit.score,
        })
        .collect();

    Ok(Json(SearchResponse { results }))
}
