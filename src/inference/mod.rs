// Remote inference
//
// One call per backend profile: a fixed system turn plus the composed prompt,
// returning the raw text of the first choice.

use async_trait::async_trait;

pub mod openrouter;
pub mod types;

pub use openrouter::OpenRouterClient;
pub use types::{ChatMessage, ChatRequest, ChatResponse, InferenceError};

/// Trait for inference backends
///
/// The orchestrator only ever talks to this trait, so tests can count calls
/// and script responses without a network.
#[async_trait]
pub trait InferenceClient: Send + Sync {
    /// Ask `model` for a completion of `prompt`, authenticating with `credential`.
    ///
    /// Returns the first choice's content, or `""` if the reply lacks it.
    async fn infer(
        &self,
        credential: &str,
        model: &str,
        prompt: &str,
    ) -> Result<String, InferenceError>;
}
