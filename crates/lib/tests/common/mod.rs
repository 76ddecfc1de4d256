#![allow(dead_code)]
//! # Common Test Utilities
//!
//! Shared helpers for the `tenderlens` library tests: tracing setup, canned
//! provider payloads and a small deterministic embedder.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Once;
use tenderlens::{EmbeddingProvider, ProviderError};

static INIT: Once = Once::new();

/// Initializes the tracing subscriber once per test binary.
pub fn setup_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt().with_test_writer().init();
    });
}

/// A chat-completion body as returned by an OpenAI-compatible endpoint.
pub fn chat_completion_body(content: &str) -> Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
}

/// An embeddings body carrying a single vector.
pub fn embedding_body(vector: &[f32]) -> Value {
    json!({
        "object": "list",
        "data": [{ "object": "embedding", "index": 0, "embedding": vector }],
        "model": "text-embedding-ada-002"
    })
}

/// A well-formed analysis with every heading the prompt asks for.
pub const SAMPLE_ANALYSIS: &str = "\
# TENDER SUMMARY
Supply of road maintenance services for the northern district.
# BASIC INFORMATION
- Tender Reference Number: RD-2024-017
- Issuing Organization: Northern Roads Authority
- Submission Deadline: 2024-09-30
- Estimated Budget: 1,200,000 EUR
# KEY REQUIREMENTS
- ISO 9001 certification
- Minimum five years of road works experience
# ELIGIBILITY CRITERIA
- Registered construction company
# EVALUATION CRITERIA
- Price 60%
- Technical quality 40%
# REQUIRED DOCUMENTS
- Company registration certificate
- Financial statements
# COMPLIANCE CHECKLIST
- Signed declaration of honour
# WINNING STRATEGY
Lead with the maintenance track record and price aggressively.
# RISKS AND MITIGATIONS
- Weather delays: build slack into the schedule
- Material price volatility: fix supplier prices early";

/// Maps text onto a few keyword axes so similarity is predictable in tests.
///
/// Each axis counts occurrences of its keyword; one constant axis keeps every
/// vector non-zero.
#[derive(Clone, Debug, Default)]
pub struct KeywordEmbedder;

pub const KEYWORDS: [&str; 4] = ["road", "hospital", "software", "catering"];

#[async_trait]
impl EmbeddingProvider for KeywordEmbedder {
    async fn embed(&self, input: &str) -> Result<Vec<f32>, ProviderError> {
        let lower = input.to_lowercase();
        let mut vector: Vec<f32> = KEYWORDS
            .iter()
            .map(|k| lower.matches(k).count() as f32)
            .collect();
        vector.push(0.1);
        Ok(vector)
    }
}

/// An embedder that always fails, for error-path tests.
#[derive(Clone, Debug, Default)]
pub struct FailingEmbedder;

#[async_trait]
impl EmbeddingProvider for FailingEmbedder {
    async fn embed(&self, _input: &str) -> Result<Vec<f32>, ProviderError> {
        Err(ProviderError::AiApi {
            status: 503,
            body: "embedding service unavailable".to_string(),
        })
    }
}
