//! Default LLM config loaded strictly from environment variables.
//!
//! # Environment variables
//!
//! - `OPENAI_API_KEY`   = provider secret (mandatory)
//! - `OPENAI_MODEL`     = model identifier (default `gpt-4-turbo-preview`)
//! - `OPENAI_URL`       = API base URL (default `https://api.openai.com`)
//! - `LLM_TIMEOUT_SECS` = optional HTTP timeout in seconds (default 60)

use crate::{
    config::llm_model_config::LlmModelConfig,
    error_handler::{AiLlmError, env_opt_u64, env_or, must_env, validate_http_endpoint},
};

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4-turbo-preview";
pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Constructs the OpenAI config from environment.
///
/// # Errors
///
/// - [`ConfigError::MissingVar`] if `OPENAI_API_KEY` is missing
/// - [`ConfigError::InvalidFormat`] if `OPENAI_URL` has no http/https scheme
/// - [`ConfigError::InvalidNumber`] if `LLM_TIMEOUT_SECS` is not a number
///
/// [`ConfigError::MissingVar`]: crate::error_handler::ConfigError::MissingVar
/// [`ConfigError::InvalidFormat`]: crate::error_handler::ConfigError::InvalidFormat
/// [`ConfigError::InvalidNumber`]: crate::error_handler::ConfigError::InvalidNumber
pub fn config_openai() -> Result<LlmModelConfig, AiLlmError> {
    let api_key = must_env("OPENAI_API_KEY")?;
    let model = env_or("OPENAI_MODEL", DEFAULT_OPENAI_MODEL);
    let endpoint = env_or("OPENAI_URL", DEFAULT_OPENAI_URL);
    validate_http_endpoint("OPENAI_URL", &endpoint)?;
    let timeout_secs = env_opt_u64("LLM_TIMEOUT_SECS")?.unwrap_or(DEFAULT_TIMEOUT_SECS);

    Ok(LlmModelConfig {
        model,
        endpoint,
        api_key: Some(api_key),
        timeout_secs: Some(timeout_secs),
    })
}
