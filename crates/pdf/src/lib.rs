//! # tenderlens-pdf: PDF Text Extraction
//!
//! Reads an uploaded tender PDF from disk and returns its text and a small
//! metadata record. The file is only ever read; its lifecycle belongs to the
//! caller.

use lopdf::{Dictionary, Document, Object};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, instrument};

// --- Error Definitions ---

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("Failed to read PDF file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse PDF content: {0}")]
    Parse(String),
}

impl From<lopdf::Error> for ExtractionError {
    fn from(err: lopdf::Error) -> Self {
        ExtractionError::Parse(err.to_string())
    }
}

// --- Data Structures ---

/// Document-level information from the PDF `Info` dictionary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    /// The raw `CreationDate` string, e.g. `D:20240101120000Z`. Not parsed.
    pub creation_date: Option<String>,
    pub page_count: usize,
}

/// Extracts text and metadata from PDF files on disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfExtractor;

impl PdfExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Returns the text of every page in page order, each followed by `"\n"`.
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn extract_text(&self, path: impl AsRef<Path>) -> Result<String, ExtractionError> {
        let document = load(path.as_ref())?;
        let mut text = String::new();

        for page_number in document.get_pages().into_keys() {
            text.push_str(&document.extract_text(&[page_number])?);
            text.push('\n');
        }

        debug!(chars = text.len(), "Extracted PDF text.");
        Ok(text)
    }

    /// Reads title, author, creation date and page count. Missing entries are `None`.
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn extract_metadata(
        &self,
        path: impl AsRef<Path>,
    ) -> Result<DocumentMetadata, ExtractionError> {
        let document = load(path.as_ref())?;
        let page_count = document.get_pages().len();

        let Some(info) = info_dictionary(&document) else {
            return Ok(DocumentMetadata {
                page_count,
                ..Default::default()
            });
        };

        Ok(DocumentMetadata {
            title: text_entry(&document, info, b"Title"),
            author: text_entry(&document, info, b"Author"),
            creation_date: text_entry(&document, info, b"CreationDate"),
            page_count,
        })
    }
}

/// Reads the whole file first so I/O failures stay distinct from parse failures.
fn load(path: &Path) -> Result<Document, ExtractionError> {
    let bytes = std::fs::read(path)?;
    Ok(Document::load_mem(&bytes)?)
}

fn info_dictionary(document: &Document) -> Option<&Dictionary> {
    match document.trailer.get(b"Info").ok()? {
        Object::Reference(id) => document.get_dictionary(*id).ok(),
        Object::Dictionary(dict) => Some(dict),
        _ => None,
    }
}

fn text_entry(document: &Document, info: &Dictionary, key: &[u8]) -> Option<String> {
    let (_, object) = document.dereference(info.get(key).ok()?).ok()?;
    match object {
        Object::String(bytes, _) => Some(decode_text_string(bytes)),
        _ => None,
    }
}

/// Decodes a PDF text string: UTF-16BE when it starts with a byte order mark,
/// otherwise one character per byte.
fn decode_text_string(bytes: &[u8]) -> String {
    match bytes.strip_prefix(&[0xFE, 0xFF]) {
        Some(utf16) => {
            let units: Vec<u16> = utf16
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect();
            String::from_utf16_lossy(&units)
        }
        None => bytes.iter().map(|&b| char::from(b)).collect(),
    }
}
