use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Metadata stored next to a document in the vector index.
pub type DocumentMetadataMap = HashMap<String, String>;

/// The outcome of one tender analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// The model's response, verbatim.
    pub full_analysis: String,
    /// Section bodies keyed by heading, exactly as the model spelled them.
    pub structured_data: HashMap<String, String>,
}

impl AnalysisResult {
    pub fn section(&self, name: &str) -> Option<&str> {
        self.structured_data.get(name).map(String::as_str)
    }
}

/// One ranked match from a similarity search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub document_id: String,
    /// The store's native distance, passed through unchanged.
    pub score: f64,
    pub content: String,
    pub metadata: DocumentMetadataMap,
}
