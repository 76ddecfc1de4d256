//! # Tender Handlers
//!
//! Upload and analysis of tender PDFs. An upload lives in a scoped temporary
//! file for the duration of the request; the handle removes it on drop, so it
//! is gone on every exit path.

use super::{AppError, AppState};
use crate::types::TenderAnalysisResponse;
use axum::{
    extract::{Path, State},
    Json,
};
use axum_extra::extract::Multipart;
use std::{io::Write, path::Path as FsPath};
use tempfile::NamedTempFile;
use tenderlens::{
    constants::{METADATA_ANALYSIS_SUMMARY, METADATA_FILENAME, METADATA_TITLE},
    DocumentMetadataMap, TenderMeta, TenderReport,
};
use tenderlens_pdf::{DocumentMetadata, PdfExtractor};
use tokio::time::timeout;
use tracing::{info, warn};

const UPLOAD_FIELD: &str = "file";

/// Handler for `POST /upload-tender`.
pub async fn upload_tender_handler(
    State(app_state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<TenderAnalysisResponse>, AppError> {
    let (filename, pdf_data) = read_upload(&mut multipart).await?;
    info!("Received tender upload '{}' ({} bytes)", filename, pdf_data.len());

    if !filename.ends_with(".pdf") {
        return Err(AppError::Validation("Only PDF files are supported".to_string()));
    }

    let extractor = app_state.extractor.clone();
    let upload_dir = app_state.config.upload_dir();
    let (temp_file, text, pdf_metadata) = tokio::task::spawn_blocking(move || {
        extract_upload(&extractor, &upload_dir, &pdf_data)
    })
    .await
    .map_err(anyhow::Error::from)??;

    if text.trim().is_empty() {
        return Err(AppError::Validation(
            "Could not extract text from PDF".to_string(),
        ));
    }

    let analysis = timeout(
        app_state.config.llm.timeout(),
        app_state.analyzer.analyze(&text),
    )
    .await
    .map_err(|_| AppError::Timeout("tender analysis"))??;

    let report = TenderReport::from_sections(&analysis.structured_data);
    let document_metadata = DocumentMetadataMap::from([
        (METADATA_FILENAME.to_string(), filename.clone()),
        (
            METADATA_TITLE.to_string(),
            pdf_metadata.title.clone().unwrap_or_default(),
        ),
        (METADATA_ANALYSIS_SUMMARY.to_string(), report.summary.clone()),
    ]);

    let document_id = timeout(
        app_state.config.embedding.timeout(),
        app_state.store.add_document(&text, document_metadata),
    )
    .await
    .map_err(|_| AppError::Timeout("document storage"))??;

    let metadata = TenderMeta::from_parts(pdf_metadata.title.as_deref(), &report.basic_info);

    if let Err(e) = temp_file.close() {
        warn!("Failed to remove temporary upload for '{}': {}", filename, e);
    }

    info!("Tender '{}' analysed and stored as {}", filename, document_id);
    Ok(Json(TenderAnalysisResponse {
        document_id,
        report,
        metadata,
        full_analysis: Some(analysis.full_analysis),
    }))
}

/// Handler for `GET /tender-analysis/{document_id}`. Not implemented.
pub async fn tender_analysis_handler(Path(document_id): Path<String>) -> AppError {
    info!("Analysis lookup requested for '{}'", document_id);
    AppError::NotImplemented
}

/// Pulls the filename and bytes of the `file` field out of the form.
async fn read_upload(multipart: &mut Multipart) -> Result<(String, Vec<u8>), AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let filename = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| AppError::Validation("Uploaded file has no filename".to_string()))?;
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read uploaded file: {e}")))?;
        return Ok((filename, data.to_vec()));
    }

    Err(AppError::Validation(format!(
        "Missing '{UPLOAD_FIELD}' field in upload"
    )))
}

/// Writes the upload to a scoped temp file and extracts its text and metadata.
///
/// Runs on the blocking pool. Metadata is best-effort; text extraction is not.
fn extract_upload(
    extractor: &PdfExtractor,
    upload_dir: &FsPath,
    pdf_data: &[u8],
) -> Result<(NamedTempFile, String, DocumentMetadata), AppError> {
    let mut temp_file = tempfile::Builder::new()
        .prefix("tender-")
        .suffix(".pdf")
        .tempfile_in(upload_dir)
        .map_err(|e| anyhow::Error::from(e).context("Failed to create temporary upload file"))?;
    temp_file
        .write_all(pdf_data)
        .and_then(|_| temp_file.flush())
        .map_err(|e| anyhow::Error::from(e).context("Failed to write temporary upload file"))?;

    let text = extractor.extract_text(temp_file.path())?;
    let metadata = extractor
        .extract_metadata(temp_file.path())
        .unwrap_or_else(|e| {
            warn!("Metadata extraction failed, continuing without it: {}", e);
            DocumentMetadata::default()
        });

    Ok((temp_file, text, metadata))
}
