pub mod error;
pub mod gemini;

use async_trait::async_trait;

pub use error::ProviderError;
pub use gemini::GeminiService;

/// A text-in, text-out generative model.
///
/// Implementations hold no per-request state, so one instance is shared by
/// every in-flight request.
#[async_trait]
pub trait TextProvider: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, ProviderError>;
}
