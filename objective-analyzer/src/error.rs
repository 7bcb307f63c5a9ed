//! Typed error for the objective-analyzer crate.

use ai_llm_service::AiLlmError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Generation parameters failed validation before any provider call.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The completion call failed (transport, auth, quota, provider fault).
    #[error("generation failed: {0}")]
    Generation(#[from] AiLlmError),

    /// Structured reply did not match the expected shape.
    ///
    /// `raw` is the model text exactly as received.
    #[error("failed to parse AI response into required format: {reason}. Raw response: {raw}")]
    Parse { reason: String, raw: String },
}

impl AnalysisError {
    pub(crate) fn parse(reason: impl Into<String>, raw: &str) -> Self {
        Self::Parse {
            reason: reason.into(),
            raw: raw.to_string(),
        }
    }
}
