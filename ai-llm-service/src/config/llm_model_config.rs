/// Connection settings for the OpenAI completion model.
///
/// Per-request generation options (max tokens, temperature) are not part of
/// this struct; they travel with each [`CompletionRequest`].
///
/// # Examples
///
/// ```
/// use ai_llm_service::config::llm_model_config::LlmModelConfig;
///
/// let cfg = LlmModelConfig {
///     model: "gpt-4-turbo-preview".to_string(),
///     endpoint: "https://api.openai.com".to_string(),
///     api_key: Some("sk-...".to_string()),
///     timeout_secs: Some(60),
/// };
/// assert_eq!(cfg.timeout_secs, Some(60));
/// ```
///
/// [`CompletionRequest`]: crate::completion::CompletionRequest
#[derive(Clone, PartialEq, Eq)]
pub struct LlmModelConfig {
    /// Model identifier string (e.g., `"gpt-4-turbo-preview"`).
    pub model: String,

    /// Base URL of the API; `/v1/chat/completions` is appended.
    pub endpoint: String,

    /// API key sent as a bearer token.
    pub api_key: Option<String>,

    /// Optional request timeout (in seconds).
    pub timeout_secs: Option<u64>,
}

// Hand-written so the API key never lands in logs.
impl std::fmt::Debug for LlmModelConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmModelConfig")
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_redacts_key() {
        let cfg = LlmModelConfig {
            model: "gpt-4".into(),
            endpoint: "https://api.openai.com".into(),
            api_key: Some("sk-secret".into()),
            timeout_secs: None,
        };
        let dbg = format!("{cfg:?}");
        assert!(!dbg.contains("sk-secret"));
        assert!(dbg.contains("***"));
    }
}
