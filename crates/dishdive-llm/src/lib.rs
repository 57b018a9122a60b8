//! Chat-completion client for the external extraction model.
//!
//! One non-streaming request per review. Providers are OpenAI, Groq
//! (OpenAI-compatible) and Anthropic.

pub mod config;
pub mod error;
pub mod providers;
pub mod types;

use futures::future::BoxFuture;

pub use config::LLMConfig;
pub use error::LlmError;
pub use providers::LlmClient;
pub use types::*;

/// Anything that can answer a single completion request with raw text.
pub trait CompletionModel: Send + Sync {
    fn complete<'a>(&'a self, request: &'a CompletionRequest) -> BoxFuture<'a, Result<String, LlmError>>;
}
