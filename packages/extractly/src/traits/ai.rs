//! AI trait for LLM text generation.

use async_trait::async_trait;

use crate::error::Result;

/// The single seam to a hosted LLM.
///
/// Implementations wrap a specific provider and return the model's raw text
/// reply; prompt construction and response parsing live in the pipeline so
/// every provider gets the same defensive handling.
#[async_trait]
pub trait AI: Send + Sync {
    /// Send one prompt and await the raw text response. One attempt, no
    /// retry; transport and provider failures surface as
    /// [`ExtractlyError::AI`](crate::error::ExtractlyError::AI).
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Cheap liveness probe against the provider.
    async fn health_check(&self) -> bool {
        self.generate("Hello, respond with \"OK\"")
            .await
            .map(|text| text.contains("OK"))
            .unwrap_or(false)
    }
}
