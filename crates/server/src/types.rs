//! # API Payloads
//!
//! Request and response bodies of the HTTP endpoints.

use serde::{Deserialize, Serialize};
use tenderlens::{TenderMeta, TenderReport};

/// The response body of `/upload-tender`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TenderAnalysisResponse {
    pub document_id: String,
    #[serde(flatten)]
    pub report: TenderReport,
    pub metadata: TenderMeta,
    pub full_analysis: Option<String>,
}

/// The request body for the `/search-tenders` endpoint.
#[derive(Deserialize, Debug)]
pub struct SearchRequest {
    pub query: String,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    5
}

#[derive(Serialize, Deserialize, Debug)]
pub struct SearchResultItem {
    pub document_id: String,
    pub score: f64,
    pub title: Option<String>,
    pub summary: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct SearchResponse {
    pub results: Vec<SearchResultItem>,
}
