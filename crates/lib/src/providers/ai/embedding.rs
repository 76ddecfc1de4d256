//! # Embeddings Provider
//!
//! This module provides functionality for generating vector embeddings by calling
//! an external, OpenAI-compatible embeddings API.

use crate::errors::ProviderError;
use async_trait::async_trait;
use dyn_clone::DynClone;
use reqwest::Client as ReqwestClient;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug};
use tracing::debug;

/// A source of embedding vectors for text.
///
/// Every vector produced by one provider must have the same dimension, since the
/// index compares them directly.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync + Debug + DynClone {
    async fn embed(&self, input: &str) -> Result<Vec<f32>, ProviderError>;
}

dyn_clone::clone_trait_object!(EmbeddingProvider);

// --- OpenAI-compatible request and response structures ---

#[derive(Serialize, Debug)]
struct OpenAIEmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Deserialize, Debug)]
struct OpenAIEmbeddingResponse {
    data: Vec<OpenAIEmbeddingData>,
}

#[derive(Deserialize, Debug)]
struct OpenAIEmbeddingData {
    embedding: Vec<f32>,
}

/// Embeddings from the OpenAI `/v1/embeddings` API.
#[derive(Clone)]
pub struct OpenAiEmbeddingProvider {
    client: ReqwestClient,
    api_url: String,
    api_key: String,
    model: String,
}

impl OpenAiEmbeddingProvider {
    pub fn new(api_url: String, api_key: String, model: String) -> Result<Self, ProviderError> {
        if api_key.trim().is_empty() {
            return Err(ProviderError::MissingApiKey("OPENAI_API_KEY"));
        }
        let client = ReqwestClient::builder()
            .build()
            .map_err(ProviderError::ReqwestClientBuild)?;
        Ok(Self {
            client,
            api_url,
            api_key,
            model,
        })
    }
}

impl Debug for OpenAiEmbeddingProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiEmbeddingProvider")
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddingProvider {
    async fn embed(&self, input: &str) -> Result<Vec<f32>, ProviderError> {
        let request_body = OpenAIEmbeddingRequest {
            model: &self.model,
            input,
        };
        debug!(model = %self.model, input_chars = input.len(), "--> Sending request to OpenAI Embeddings API");

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(ProviderError::AiRequest)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::AiApi {
                status: status.as_u16(),
                body,
            });
        }

        let openai_response: OpenAIEmbeddingResponse = response
            .json()
            .await
            .map_err(ProviderError::AiDeserialization)?;

        openai_response
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or(ProviderError::MalformedResponse("data[0].embedding"))
    }
}
