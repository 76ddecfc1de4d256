use super::{handlers, state::AppState};
use axum::extract::DefaultBodyLimit;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Creates the Axum router with all the application routes.
pub fn create_router(app_state: AppState) -> Router {
    let upload_limit = app_state.config.max_upload_bytes;

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .route(
            "/upload-tender",
            post(handlers::upload_tender_handler).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/search-tenders", post(handlers::search_tenders_handler))
        .route(
            "/tender-analysis/{document_id}",
            get(handlers::tender_analysis_handler),
        )
        .with_state(app_state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
