use thiserror::Error;

/// Errors raised while talking to a remote LLM or embedding provider.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Failed to build Reqwest client: {0}")]
    ReqwestClientBuild(reqwest::Error),
    #[error("Failed to send request to AI provider: {0}")]
    AiRequest(reqwest::Error),
    #[error("Failed to deserialize AI provider response: {0}")]
    AiDeserialization(reqwest::Error),
    #[error("AI provider returned status {status}: {body}")]
    AiApi { status: u16, body: String },
    #[error("AI provider response is missing {0}")]
    MalformedResponse(&'static str),
    #[error("{0} is required")]
    MissingApiKey(&'static str),
}

/// The single failure kind of a tender analysis.
///
/// Transport failures, error statuses and malformed responses all collapse into
/// this type; callers only learn that the analysis failed and why, in text.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Error analyzing tender: {0}")]
    Provider(#[from] ProviderError),
}

/// Errors raised by the vector store while embedding, persisting or querying.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to generate embedding: {0}")]
    Embedding(#[from] ProviderError),
    #[error("Vector index error: {0}")]
    Database(#[from] turso::Error),
    #[error("Failed to (de)serialize document metadata: {0}")]
    Metadata(#[from] serde_json::Error),
    #[error("Failed to prepare storage directory '{path}': {source}")]
    Directory {
        path: String,
        source: std::io::Error,
    },
}
