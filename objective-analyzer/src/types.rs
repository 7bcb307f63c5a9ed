//! Request and response shapes for objective analysis.

use serde::{Deserialize, Serialize};

use crate::{error::AnalysisError, parse::ParseStrategy};

/// Used when the request omits `max_tokens`.
pub const DEFAULT_MAX_TOKENS: u32 = 2000;
/// Used when the request omits `temperature`.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
/// Inclusive upper bound accepted for `temperature`.
pub const MAX_TEMPERATURE: f32 = 2.0;
/// Objectives kept per analysis, most important first.
pub const MAX_OBJECTIVES: usize = 5;
/// Rationale stored when the model gave none.
pub const RATIONALE_NOT_PROVIDED: &str = "Not provided";

/// A competitor described by the caller.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Competitor {
    pub name: String,
    #[serde(default)]
    pub loyalty_program_description: Option<String>,
    #[serde(default)]
    pub strengths: Option<Vec<String>>,
    #[serde(default)]
    pub weaknesses: Option<Vec<String>>,
}

/// Business description the prompt is built from.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BusinessContext {
    #[serde(default)]
    pub company_name: Option<String>,
    pub industry: String,
    pub business_type: String,
    /// Target customer segments, in the caller's order.
    pub customer_segments: Vec<String>,
    #[serde(default)]
    pub current_loyalty_program: Option<String>,
    #[serde(default)]
    pub current_challenges: Option<Vec<String>>,
    #[serde(default)]
    pub business_goals: Option<Vec<String>>,
    #[serde(default)]
    pub competitors: Option<Vec<Competitor>>,
}

/// Sampling knobs as sent by the caller; `None` means "use the default".
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize)]
pub struct GenerationParameters {
    #[serde(default)]
    pub max_tokens: Option<u32>,
    #[serde(default)]
    pub temperature: Option<f32>,
}

/// Generation parameters after defaults and validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectiveParameters {
    pub max_tokens: u32,
    pub temperature: f32,
}

impl GenerationParameters {
    /// Applies defaults and checks ranges.
    ///
    /// # Errors
    /// [`AnalysisError::InvalidRequest`] when `max_tokens` is zero or
    /// `temperature` is outside `0.0..=2.0`.
    pub fn resolve(&self) -> Result<EffectiveParameters, AnalysisError> {
        let max_tokens = self.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS);
        if max_tokens == 0 {
            return Err(AnalysisError::InvalidRequest(
                "max_tokens must be a positive integer".into(),
            ));
        }

        let temperature = self.temperature.unwrap_or(DEFAULT_TEMPERATURE);
        if !temperature.is_finite() || !(0.0..=MAX_TEMPERATURE).contains(&temperature) {
            return Err(AnalysisError::InvalidRequest(format!(
                "temperature must be between 0.0 and {MAX_TEMPERATURE}"
            )));
        }

        Ok(EffectiveParameters {
            max_tokens,
            temperature,
        })
    }
}

/// Full payload of `POST /api/v1/analyze-objectives`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnalysisRequest {
    #[serde(flatten)]
    pub context: BusinessContext,
    #[serde(flatten)]
    pub parameters: GenerationParameters,
}

/// One suggested loyalty-program objective.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Objective {
    pub objective: String,
    pub rationale: String,
}

impl Objective {
    pub fn new(objective: impl Into<String>, rationale: impl Into<String>) -> Self {
        Self {
            objective: objective.into(),
            rationale: rationale.into(),
        }
    }
}

/// Generation settings actually used, echoed back to the caller.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AnalysisMetadata {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub parse_strategy: ParseStrategy,
}

/// Successful analysis result.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnalysisResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    pub industry: String,
    pub business_type: String,
    pub customer_segments: Vec<String>,
    /// Ranked, at most [`MAX_OBJECTIVES`] entries.
    pub objectives: Vec<Objective>,
    pub metadata: AnalysisMetadata,
}

impl AnalysisResponse {
    pub(crate) fn assemble(
        context: BusinessContext,
        objectives: Vec<Objective>,
        metadata: AnalysisMetadata,
    ) -> Self {
        Self {
            company_name: context.company_name,
            industry: context.industry,
            business_type: context.business_type,
            customer_segments: context.customer_segments,
            objectives,
            metadata,
        }
    }
}
