use ai_llm_service::AiLlmError;
use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use objective_analyzer::AnalysisError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

/// Public application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Boot / config ---
    #[error(transparent)]
    Llm(#[from] AiLlmError),

    #[error("invalid configuration in {var}: {reason}")]
    InvalidConfig { var: &'static str, reason: String },

    // --- IO / network / server ---
    #[error("failed to bind listener")]
    Bind(#[source] std::io::Error),

    #[error("server error")]
    Server(#[source] std::io::Error),

    // --- Request / pipeline ---
    /// Body failed schema checks before the pipeline ran.
    #[error("{0}")]
    UnprocessableEntity(String),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    /// Anything that escaped the typed paths (e.g. a panicking handler).
    #[error("{0}")]
    Unexpected(String),
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            // 4xx
            AppError::UnprocessableEntity(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Analysis(AnalysisError::InvalidRequest(_)) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }

            // 5xx
            AppError::Analysis(_)
            | AppError::Unexpected(_)
            | AppError::Llm(_)
            | AppError::InvalidConfig { .. }
            | AppError::Bind(_)
            | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            AppError::Llm(_) => "LLM_CONFIG_ERROR",
            AppError::InvalidConfig { .. } => "CONFIG_ERROR",
            AppError::Bind(_) => "BIND_ERROR",
            AppError::Server(_) => "SERVER_ERROR",
            AppError::UnprocessableEntity(_) => "REQUEST_SCHEMA_ERROR",
            AppError::Analysis(AnalysisError::InvalidRequest(_)) => "REQUEST_SCHEMA_ERROR",
            AppError::Analysis(AnalysisError::Generation(_)) => "GENERATION_ERROR",
            AppError::Analysis(AnalysisError::Parse { .. }) => "PARSE_ERROR",
            AppError::Unexpected(_) => "UNEXPECTED_ERROR",
        }
    }
}

/// Error envelope returned to API callers.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code();
        let detail = self.to_string();

        if status.is_server_error() {
            error!(%status, code, %detail, "request failed");
        } else {
            warn!(%status, code, %detail, "request rejected");
        }

        (status, Json(ErrorBody { detail })).into_response()
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;

/// Schema-level body failures (bad JSON, missing field, wrong type, content type).
impl From<JsonRejection> for AppError {
    fn from(err: JsonRejection) -> Self {
        AppError::UnprocessableEntity(err.body_text())
    }
}
