//! Request pipeline: prompt → completion → parse → response.

use std::sync::Arc;

use ai_llm_service::{CompletionClient, CompletionRequest};
use tracing::{debug, info, instrument, warn};

use crate::{
    error::AnalysisError,
    parse::ParseStrategy,
    prompt::{build_user_prompt, system_prompt},
    types::{AnalysisMetadata, AnalysisRequest, AnalysisResponse},
};

/// Characters of raw model text included in parse-failure logs.
const RAW_LOG_CHARS: usize = 400;

/// Runs one analysis per call; holds no per-request state.
///
/// Build once at startup and share behind an `Arc`.
pub struct ObjectiveAnalyzer {
    client: Arc<dyn CompletionClient>,
    strategy: ParseStrategy,
    system: String,
}

impl ObjectiveAnalyzer {
    pub fn new(client: Arc<dyn CompletionClient>, strategy: ParseStrategy) -> Self {
        Self {
            client,
            strategy,
            system: system_prompt(strategy),
        }
    }

    pub fn strategy(&self) -> ParseStrategy {
        self.strategy
    }

    pub fn model(&self) -> &str {
        self.client.model()
    }

    /// Builds the prompt, calls the provider once, and parses the reply.
    ///
    /// Any failing step ends the pipeline; there is no retry and no partial
    /// result.
    ///
    /// # Errors
    /// - [`AnalysisError::InvalidRequest`] for out-of-range generation parameters
    /// - [`AnalysisError::Generation`] when the provider call fails
    /// - [`AnalysisError::Parse`] when a structured reply is malformed
    #[instrument(
        name = "analyze_objectives",
        skip_all,
        fields(industry = %request.context.industry, strategy = %self.strategy)
    )]
    pub async fn analyze(
        &self,
        request: AnalysisRequest,
    ) -> Result<AnalysisResponse, AnalysisError> {
        let params = request.parameters.resolve()?;

        let prompt = build_user_prompt(&request.context);
        debug!(
            prompt_len = prompt.len(),
            max_tokens = params.max_tokens,
            temperature = params.temperature,
            "prompt built"
        );

        let raw = self
            .client
            .complete(CompletionRequest {
                system: &self.system,
                prompt: &prompt,
                max_tokens: params.max_tokens,
                temperature: params.temperature,
                json_mode: self.strategy.wants_json(),
            })
            .await
            .inspect_err(|e| warn!(error = %e, "completion request failed"))?;
        debug!(reply_len = raw.len(), "completion received");

        let objectives = self.strategy.parse(&raw).inspect_err(|e| {
            let snippet: String = raw.chars().take(RAW_LOG_CHARS).collect();
            warn!(error = %e, raw = %snippet, "model reply could not be parsed");
        })?;
        info!(count = objectives.len(), "objectives parsed");

        let metadata = AnalysisMetadata {
            model: self.client.model().to_string(),
            max_tokens: params.max_tokens,
            temperature: params.temperature,
            parse_strategy: self.strategy,
        };

        Ok(AnalysisResponse::assemble(
            request.context,
            objectives,
            metadata,
        ))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use ai_llm_service::{
        AiLlmError,
        error_handler::{ProviderError, ProviderErrorKind},
    };
    use async_trait::async_trait;

    use super::*;
    use crate::types::{
        BusinessContext, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, GenerationParameters, Objective,
    };

    #[derive(Debug, Clone)]
    struct Seen {
        system: String,
        prompt: String,
        max_tokens: u32,
        temperature: f32,
        json_mode: bool,
    }

    /// Returns a fixed reply (or failure) and records what it was asked.
    struct ScriptedClient {
        reply: Result<String, String>,
        seen: Mutex<Vec<Seen>>,
    }

    impl ScriptedClient {
        fn ok(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(reply.to_string()),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn failing(message: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Err(message.to_string()),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<Seen> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CompletionClient for ScriptedClient {
        fn model(&self) -> &str {
            "scripted-model"
        }

        async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, AiLlmError> {
            self.seen.lock().unwrap().push(Seen {
                system: request.system.to_string(),
                prompt: request.prompt.to_string(),
                max_tokens: request.max_tokens,
                temperature: request.temperature,
                json_mode: request.json_mode,
            });
            self.reply
                .clone()
                .map_err(|m| ProviderError::new(ProviderErrorKind::Decode(m)).into())
        }
    }

    fn request(parameters: GenerationParameters) -> AnalysisRequest {
        AnalysisRequest {
            context: BusinessContext {
                company_name: Some("Acme".into()),
                industry: "retail".into(),
                business_type: "B2C".into(),
                customer_segments: vec!["students".into(), "families".into()],
                current_loyalty_program: None,
                current_challenges: Some(vec!["churn".into()]),
                business_goals: None,
                competitors: None,
            },
            parameters,
        }
    }

    #[tokio::test]
    async fn numbered_pipeline_assembles_response() {
        let client = ScriptedClient::ok(
            "1. Increase repeat purchase rate\nRationale: drives margin\n\n2. Launch tiered rewards\nRationale: differentiates from competitor X",
        );
        let analyzer = ObjectiveAnalyzer::new(client.clone(), ParseStrategy::Numbered);

        let out = analyzer
            .analyze(request(GenerationParameters::default()))
            .await
            .unwrap();

        assert_eq!(out.company_name.as_deref(), Some("Acme"));
        assert_eq!(out.industry, "retail");
        assert_eq!(out.customer_segments, vec!["students", "families"]);
        assert_eq!(
            out.objectives,
            vec![
                Objective::new("Increase repeat purchase rate", "drives margin"),
                Objective::new("Launch tiered rewards", "differentiates from competitor X"),
            ]
        );
        assert_eq!(out.metadata.model, "scripted-model");
        assert_eq!(out.metadata.max_tokens, DEFAULT_MAX_TOKENS);
        assert_eq!(out.metadata.temperature, DEFAULT_TEMPERATURE);
        assert_eq!(out.metadata.parse_strategy, ParseStrategy::Numbered);

        let calls = client.calls();
        assert_eq!(calls.len(), 1);
        assert!(!calls[0].json_mode);
        assert!(calls[0].system.contains("Rationale:"));
        assert!(calls[0].prompt.contains("Current Challenges:\n- churn\n"));
    }

    #[tokio::test]
    async fn structured_pipeline_uses_json_mode_and_caller_parameters() {
        let client = ScriptedClient::ok(
            r#"{"objectives": [{"objective": "Grow retention", "rationale": "cheaper"}]}"#,
        );
        let analyzer = ObjectiveAnalyzer::new(client.clone(), ParseStrategy::Structured);

        let out = analyzer
            .analyze(request(GenerationParameters {
                max_tokens: Some(700),
                temperature: Some(0.1),
            }))
            .await
            .unwrap();

        assert_eq!(out.objectives, vec![Objective::new("Grow retention", "cheaper")]);
        assert_eq!(out.metadata.max_tokens, 700);
        assert_eq!(out.metadata.temperature, 0.1);

        let call = &client.calls()[0];
        assert!(call.json_mode);
        assert_eq!(call.max_tokens, 700);
        assert_eq!(call.temperature, 0.1);
    }

    #[tokio::test]
    async fn structured_mismatch_is_parse_error_with_raw_text() {
        let raw = r#"{"result": "no objectives key"}"#;
        let analyzer = ObjectiveAnalyzer::new(ScriptedClient::ok(raw), ParseStrategy::Structured);

        let err = analyzer
            .analyze(request(GenerationParameters::default()))
            .await
            .unwrap_err();
        assert!(matches!(&err, AnalysisError::Parse { raw: r, .. } if r == raw));
        assert!(err.to_string().contains(raw));
    }

    #[tokio::test]
    async fn provider_failure_is_generation_error() {
        let analyzer = ObjectiveAnalyzer::new(
            ScriptedClient::failing("connection reset by peer"),
            ParseStrategy::Numbered,
        );

        let err = analyzer
            .analyze(request(GenerationParameters::default()))
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::Generation(_)));
        let msg = err.to_string();
        assert!(msg.starts_with("generation failed:"));
        assert!(msg.contains("connection reset by peer"));
    }

    #[tokio::test]
    async fn invalid_parameters_skip_the_provider() {
        let client = ScriptedClient::ok("1. unused");
        let analyzer = ObjectiveAnalyzer::new(client.clone(), ParseStrategy::Numbered);

        let err = analyzer
            .analyze(request(GenerationParameters {
                max_tokens: Some(0),
                temperature: None,
            }))
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidRequest(_)));
        assert!(client.calls().is_empty());
    }
}
