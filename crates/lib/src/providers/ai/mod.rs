pub mod embedding;
pub mod xai;

use crate::errors::ProviderError;
use async_trait::async_trait;
use dyn_clone::DynClone;
pub use embedding::{EmbeddingProvider, OpenAiEmbeddingProvider};
use std::fmt::Debug;
pub use xai::XaiProvider;

/// A trait for interacting with a chat-completion LLM.
///
/// The analyzer only needs one round trip: a fixed system prompt plus a user
/// prompt in, the model's text out. Implementations are expected to surface
/// every failure (transport, status, shape) as a `ProviderError`.
#[async_trait]
pub trait AiProvider: Send + Sync + Debug + DynClone {
    /// Generates a response from a given system and user prompt.
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, ProviderError>;
}

dyn_clone::clone_trait_object!(AiProvider);
