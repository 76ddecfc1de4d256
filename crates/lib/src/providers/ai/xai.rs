use crate::{
    constants::{ANALYSIS_MAX_TOKENS, ANALYSIS_TEMPERATURE},
    errors::ProviderError,
    providers::ai::AiProvider,
};
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug};
use tracing::debug;

// --- OpenAI-compatible chat-completion structures ---

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
    stream: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize, Debug)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize, Debug)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize, Debug)]
struct ChatResponseMessage {
    content: Option<String>,
}

// --- xAI Provider implementation ---

/// A provider for the xAI (Grok) chat-completion API, or any endpoint that
/// speaks the same OpenAI-compatible protocol.
#[derive(Clone)]
pub struct XaiProvider {
    client: ReqwestClient,
    api_url: String,
    api_key: String,
    model: String,
}

impl XaiProvider {
    /// Creates a new `XaiProvider`. An empty API key is rejected here, at
    /// construction, rather than on the first request.
    pub fn new(api_url: String, api_key: String, model: String) -> Result<Self, ProviderError> {
        if api_key.trim().is_empty() {
            return Err(ProviderError::MissingApiKey("XAI_API_KEY"));
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

impl Debug for XaiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("XaiProvider")
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl AiProvider for XaiProvider {
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, ProviderError> {
        let request_body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system_prompt.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user_prompt.to_string(),
                },
            ],
            temperature: ANALYSIS_TEMPERATURE,
            max_tokens: ANALYSIS_MAX_TOKENS,
            stream: false,
        };

        debug!(
            api_url = %self.api_url,
            model = %self.model,
            prompt_chars = user_prompt.len(),
            "--> Sending chat completion request"
        );

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

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(ProviderError::AiDeserialization)?;

        chat_response
            .choices
            .into_iter()
            .next()
            .ok_or(ProviderError::MalformedResponse("choices[0]"))?
            .message
            .content
            .ok_or(ProviderError::MalformedResponse("choices[0].message.content"))
    }
}
