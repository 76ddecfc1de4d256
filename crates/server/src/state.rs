//! # Application State
//!
//! The shared, cloneable state handed to every request handler, and the logic
//! that builds it from configuration at startup.

use crate::config::AppConfig;
use std::sync::Arc;
use tenderlens::{
    providers::{
        ai::{OpenAiEmbeddingProvider, XaiProvider},
        db::sqlite::SqliteVectorStore,
    },
    TenderAnalyzer, VectorStore,
};
use tenderlens_pdf::PdfExtractor;
use tracing::info;

/// The shared application state, accessible from all request handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub extractor: Arc<PdfExtractor>,
    pub analyzer: Arc<TenderAnalyzer>,
    pub store: Arc<dyn VectorStore>,
}

impl AppState {
    /// Assembles state from already-built parts. Tests use this to plug in fakes.
    pub fn new(config: AppConfig, analyzer: TenderAnalyzer, store: Arc<dyn VectorStore>) -> Self {
        Self {
            config: Arc::new(config),
            extractor: Arc::new(PdfExtractor::new()),
            analyzer: Arc::new(analyzer),
            store,
        }
    }
}

/// Builds the shared application state from the configuration.
///
/// Fails when either API key is missing, when a provider client cannot be
/// built, or when the vector index cannot be opened.
pub async fn build_app_state(config: AppConfig) -> anyhow::Result<AppState> {
    let (xai_api_key, openai_api_key) = config.require_keys()?;

    let ai_provider = XaiProvider::new(
        config.llm.api_url.clone(),
        xai_api_key.to_string(),
        config.llm.model.clone(),
    )?;
    let embedder = OpenAiEmbeddingProvider::new(
        config.embedding.api_url.clone(),
        openai_api_key.to_string(),
        config.embedding.model_name.clone(),
    )?;

    let store = SqliteVectorStore::open(&config.persist_directory, Arc::new(embedder)).await?;

    if let Some(upload_dir) = &config.upload_dir {
        tokio::fs::create_dir_all(upload_dir).await?;
    }

    info!(
        llm = %config.llm.api_url,
        embedding = %config.embedding.api_url,
        "Application state initialised."
    );

    Ok(AppState::new(
        config,
        TenderAnalyzer::new(Box::new(ai_provider)),
        Arc::new(store),
    ))
}
