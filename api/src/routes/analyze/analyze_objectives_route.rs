//! POST /api/v1/analyze-objectives: ranked loyalty objectives for a business.

use std::sync::Arc;

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use objective_analyzer::{AnalysisRequest, AnalysisResponse};
use tracing::instrument;

use crate::{core::app_state::AppState, error_handler::AppResult};

/// Handler: POST /api/v1/analyze-objectives
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:8000/api/v1/analyze-objectives \
///   -H 'content-type: application/json' \
///   -d '{"industry":"retail","business_type":"B2C","customer_segments":["students"]}'
/// ```
#[instrument(name = "analyze_objectives_route", skip_all)]
pub async fn analyze_objectives(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AnalysisRequest>, JsonRejection>,
) -> AppResult<Json<AnalysisResponse>> {
    let Json(request) = payload?;
    let response = state.analyzer.analyze(request).await?;
    Ok(Json(response))
}
