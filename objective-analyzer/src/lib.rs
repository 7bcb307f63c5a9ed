//! Loyalty-objective analysis with a single entry point.
//!
//! Public API: [`ObjectiveAnalyzer::analyze`]. It builds a prompt from the
//! caller's [`BusinessContext`], asks the configured [`CompletionClient`] for
//! a reply, parses that reply with the deployment's [`ParseStrategy`], and
//! returns a ranked list of at most five [`Objective`]s.
//!
//! [`CompletionClient`]: ai_llm_service::CompletionClient

mod analyzer;
mod error;
pub mod parse;
pub mod prompt;
mod types;

pub use analyzer::ObjectiveAnalyzer;
pub use error::AnalysisError;
pub use parse::{ParseStrategy, parse_numbered, parse_structured};
pub use types::{
    AnalysisMetadata, AnalysisRequest, AnalysisResponse, BusinessContext, Competitor,
    DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, EffectiveParameters, GenerationParameters,
    MAX_OBJECTIVES, Objective, RATIONALE_NOT_PROVIDED,
};
