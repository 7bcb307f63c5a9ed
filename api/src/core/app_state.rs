use std::sync::Arc;

use ai_llm_service::{
    CompletionClient, OpenAiService, config::default_config::config_openai,
    error_handler::env_or,
};
use objective_analyzer::{ObjectiveAnalyzer, ParseStrategy};

use crate::error_handler::AppError;

pub const DEFAULT_API_ADDRESS: &str = "0.0.0.0:8000";

/// Process-level settings read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Socket address to bind, e.g. `0.0.0.0:8000`.
    pub address: String,
    /// Which reply format the model is asked for and parsed with.
    pub parse_strategy: ParseStrategy,
}

impl AppConfig {
    /// Load settings from environment variables.
    ///
    /// - `API_ADDRESS` (default `0.0.0.0:8000`)
    /// - `OBJECTIVES_PARSE_STRATEGY` = `structured` | `numbered` (default `structured`)
    pub fn from_env() -> Result<Self, AppError> {
        let address = env_or("API_ADDRESS", DEFAULT_API_ADDRESS);
        Self::from_values(address, std::env::var("OBJECTIVES_PARSE_STRATEGY").ok())
    }

    fn from_values(address: String, strategy: Option<String>) -> Result<Self, AppError> {
        let parse_strategy = match strategy.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => {
                s.parse()
                    .map_err(|reason| AppError::InvalidConfig {
                        var: "OBJECTIVES_PARSE_STRATEGY",
                        reason,
                    })?
            }
            _ => ParseStrategy::default(),
        };

        Ok(Self {
            address,
            parse_strategy,
        })
    }
}

/// Shared state for all HTTP handlers. Immutable after startup.
pub struct AppState {
    pub analyzer: ObjectiveAnalyzer,
}

impl AppState {
    pub fn new(client: Arc<dyn CompletionClient>, strategy: ParseStrategy) -> Self {
        Self {
            analyzer: ObjectiveAnalyzer::new(client, strategy),
        }
    }

    /// Build the state with the OpenAI client configured from environment.
    pub fn from_env(config: &AppConfig) -> Result<Self, AppError> {
        let client = OpenAiService::new(config_openai()?)?;
        Ok(Self::new(Arc::new(client), config.parse_strategy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_defaults_to_structured() {
        let cfg = AppConfig::from_values("127.0.0.1:9000".into(), None).unwrap();
        assert_eq!(cfg.parse_strategy, ParseStrategy::Structured);
        assert_eq!(cfg.address, "127.0.0.1:9000");

        let blank = AppConfig::from_values(DEFAULT_API_ADDRESS.into(), Some("  ".into())).unwrap();
        assert_eq!(blank.parse_strategy, ParseStrategy::Structured);
    }

    #[test]
    fn strategy_is_read_and_validated() {
        let cfg =
            AppConfig::from_values(DEFAULT_API_ADDRESS.into(), Some("numbered".into())).unwrap();
        assert_eq!(cfg.parse_strategy, ParseStrategy::Numbered);

        let err = AppConfig::from_values(DEFAULT_API_ADDRESS.into(), Some("both".into()))
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::InvalidConfig {
                var: "OBJECTIVES_PARSE_STRATEGY",
                ..
            }
        ));
    }
}
