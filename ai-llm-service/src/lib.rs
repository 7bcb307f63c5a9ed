//! OpenAI completion client shared by the loyalty objectives service.
//!
//! - [`config`]: model connection settings and env loading
//! - [`completion`]: the [`CompletionClient`] seam used by callers
//! - [`services::open_ai_service`]: the reqwest-backed implementation
//! - [`error_handler`]: unified [`AiLlmError`]
//! - [`telemetry`]: tracing layer and filter helpers for the binary

pub mod completion;
pub mod config;
pub mod error_handler;
pub mod services;
pub mod telemetry;

pub use completion::{CompletionClient, CompletionRequest};
pub use config::llm_model_config::LlmModelConfig;
pub use error_handler::AiLlmError;
pub use services::open_ai_service::OpenAiService;
