//! Provider-agnostic seam for single-shot text completion.
//!
//! Callers depend on [`CompletionClient`] instead of a concrete HTTP client so
//! the pipeline can run against a scripted fake in tests.

use async_trait::async_trait;

use crate::error_handler::AiLlmError;

/// One chat-style completion call.
#[derive(Debug, Clone, Copy)]
pub struct CompletionRequest<'a> {
    /// System instruction (persona + output format directive).
    pub system: &'a str,
    /// User prompt.
    pub prompt: &'a str,
    /// Upper bound on generated tokens.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
    /// Ask the provider to return a single JSON object.
    pub json_mode: bool,
}

/// Something that turns a [`CompletionRequest`] into raw model text.
///
/// Implementations are built once at startup and shared behind an `Arc`.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Model identifier reported back to API callers.
    fn model(&self) -> &str;

    /// Performs one completion and returns the reply text (trimmed).
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, AiLlmError>;
}
