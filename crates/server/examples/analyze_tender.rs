//! Example: Analysing a local tender PDF without the HTTP layer.
//!
//! This example runs the same pipeline as `POST /upload-tender` against a file
//! on disk. It will:
//! 1. Load configuration from `config.yml` / `.env` / the environment.
//! 2. Extract the text and metadata of the PDF.
//! 3. Send the text to the LLM for a structured analysis.
//! 4. Store the document in the vector index and print the report as JSON.
//!
//! # Prerequisites
//!
//! - `XAI_API_KEY` and `OPENAI_API_KEY` set in the environment or a `.env` file.
//!
//! # Usage
//!
//! From the workspace root:
//! `cargo run -p tenderlens-server --example analyze_tender -- path/to/tender.pdf`

use std::collections::HashMap;
use tenderlens::{
    constants::{METADATA_ANALYSIS_SUMMARY, METADATA_FILENAME, METADATA_TITLE},
    TenderMeta, TenderReport,
};
use tenderlens_server::{config::get_config, state::build_app_state, types::TenderAnalysisResponse};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    dotenvy::dotenv().ok();

    let pdf_path = std::env::args()
        .nth(1)
        .ok_or_else(|| anyhow::anyhow!("usage: analyze_tender <path/to/tender.pdf>"))?;

    let app_state = build_app_state(get_config(None)?).await?;
    tracing::info!("Application state built successfully.");

    let text = app_state.extractor.extract_text(&pdf_path)?;
    let pdf_metadata = app_state.extractor.extract_metadata(&pdf_path)?;
    tracing::info!(
        pages = pdf_metadata.page_count,
        chars = text.len(),
        "Extracted tender text."
    );

    let analysis = app_state.analyzer.analyze(&text).await?;
    let report = TenderReport::from_sections(&analysis.structured_data);

    let document_id = app_state
        .store
        .add_document(
            &text,
            HashMap::from([
                (METADATA_FILENAME.to_string(), pdf_path.clone()),
                (
                    METADATA_TITLE.to_string(),
                    pdf_metadata.title.clone().unwrap_or_default(),
                ),
                (METADATA_ANALYSIS_SUMMARY.to_string(), report.summary.clone()),
            ]),
        )
        .await?;

    let response = TenderAnalysisResponse {
        document_id,
        metadata: TenderMeta::from_parts(pdf_metadata.title.as_deref(), &report.basic_info),
        report,
        full_analysis: None,
    };
    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(())
}
