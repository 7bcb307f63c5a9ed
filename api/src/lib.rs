use std::{any::Any, sync::Arc};

pub mod core;
pub mod error_handler;
mod middleware_layer;
mod routes;

use axum::{
    Router, middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tokio::signal;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
};
use tracing::{error, info};

use crate::{
    core::app_state::{AppConfig, AppState},
    error_handler::AppError,
    middleware_layer::request_id::request_span,
    routes::{analyze::analyze_objectives_route::analyze_objectives, health::health_route::health},
};

/// Load config, build the provider client once, and serve until Ctrl+C.
pub async fn start() -> Result<(), AppError> {
    let config = AppConfig::from_env()?;
    let state = Arc::new(AppState::from_env(&config)?);

    let listener = tokio::net::TcpListener::bind(&config.address)
        .await
        .map_err(AppError::Bind)?;

    info!(
        address = %config.address,
        model = %state.analyzer.model(),
        strategy = %state.analyzer.strategy(),
        "loyalty objectives API listening"
    );

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    info!("server stopped");
    Ok(())
}

/// All routes with their middleware stack.
///
/// Outermost first: request id is set, then propagated to the response, then
/// the request span opens around CORS, panic recovery and the handler.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/v1/analyze-objectives", post(analyze_objectives))
        .with_state(state)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(CorsLayer::permissive())
        .layer(middleware::from_fn(request_span))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

/// Maps a handler panic to the regular error envelope.
fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else {
        "unexpected internal error".to_string()
    };
    AppError::Unexpected(message).into_response()
}

/// Returns a future that resolves when Ctrl+C is pressed
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ai_llm_service::{
        AiLlmError, CompletionClient, CompletionRequest,
        error_handler::{HttpError, ProviderError, ProviderErrorKind},
    };
    use async_trait::async_trait;
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use objective_analyzer::{AnalysisResponse, ParseStrategy};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::{error_handler::ErrorBody, routes::health::health_route::HealthResponse};

    enum Reply {
        Text(&'static str),
        Upstream503(&'static str),
        Panic,
    }

    struct FakeClient(Reply);

    #[async_trait]
    impl CompletionClient for FakeClient {
        fn model(&self) -> &str {
            "fake-gpt"
        }

        async fn complete(&self, _request: CompletionRequest<'_>) -> Result<String, AiLlmError> {
            match &self.0 {
                Reply::Text(t) => Ok(t.to_string()),
                Reply::Upstream503(body) => {
                    Err(ProviderError::new(ProviderErrorKind::HttpStatus(HttpError {
                        status: StatusCode::SERVICE_UNAVAILABLE,
                        url: "https://api.openai.com/v1/chat/completions".into(),
                        snippet: body.to_string(),
                    }))
                    .into())
                }
                Reply::Panic => panic!("provider client blew up"),
            }
        }
    }

    fn app(reply: Reply, strategy: ParseStrategy) -> Router {
        router(Arc::new(AppState::new(Arc::new(FakeClient(reply)), strategy)))
    }

    fn analyze_request(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/v1/analyze-objectives")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn minimal_body() -> Value {
        json!({
            "industry": "retail",
            "business_type": "B2C",
            "customer_segments": ["students", "families", "seniors"]
        })
    }

    async fn read_json<T: serde::de::DeserializeOwned>(res: Response) -> T {
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_reports_fixed_payload() {
        let res = app(Reply::Text(""), ParseStrategy::Numbered)
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        assert!(res.headers().contains_key("x-request-id"));
        let body: HealthResponse = read_json(res).await;
        assert_eq!(body.status, "healthy");
        assert_eq!(body.version, "1.0.0");
    }

    #[tokio::test]
    async fn numbered_reply_becomes_ranked_objectives() {
        let reply = "1. Increase repeat purchase rate\nRationale: drives margin\n\n2. Launch tiered rewards\nRationale: differentiates from competitor X";
        let res = app(Reply::Text(reply), ParseStrategy::Numbered)
            .oneshot(analyze_request(minimal_body()))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        let body: AnalysisResponse = read_json(res).await;
        assert!(body.company_name.is_none());
        assert_eq!(body.industry, "retail");
        assert_eq!(body.business_type, "B2C");
        assert_eq!(body.customer_segments.len(), 3);
        assert_eq!(body.objectives.len(), 2);
        assert_eq!(body.objectives[0].objective, "Increase repeat purchase rate");
        assert_eq!(body.objectives[1].rationale, "differentiates from competitor X");
        assert_eq!(body.metadata.model, "fake-gpt");
        assert_eq!(body.metadata.max_tokens, 2000);
        assert_eq!(body.metadata.temperature, 0.7);
    }

    #[tokio::test]
    async fn seven_sections_are_cut_to_five() {
        let reply = "1. A\n2. B\n3. C\n4. D\n5. E\n6. F\n7. G";
        let res = app(Reply::Text(reply), ParseStrategy::Numbered)
            .oneshot(analyze_request(minimal_body()))
            .await
            .unwrap();

        let body: AnalysisResponse = read_json(res).await;
        let names: Vec<_> = body.objectives.iter().map(|o| o.objective.as_str()).collect();
        assert_eq!(names, ["A", "B", "C", "D", "E"]);
    }

    #[tokio::test]
    async fn missing_required_field_is_422() {
        let res = app(Reply::Text(""), ParseStrategy::Numbered)
            .oneshot(analyze_request(json!({
                "business_type": "B2C",
                "customer_segments": ["students"]
            })))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: ErrorBody = read_json(res).await;
        assert!(body.detail.contains("industry"), "{}", body.detail);
    }

    #[tokio::test]
    async fn zero_max_tokens_is_422() {
        let mut payload = minimal_body();
        payload["max_tokens"] = json!(0);
        let res = app(Reply::Text("1. A"), ParseStrategy::Numbered)
            .oneshot(analyze_request(payload))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn provider_failure_is_500_with_provider_message() {
        let res = app(Reply::Upstream503("upstream overloaded"), ParseStrategy::Numbered)
            .oneshot(analyze_request(minimal_body()))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: ErrorBody = read_json(res).await;
        assert!(body.detail.starts_with("generation failed:"), "{}", body.detail);
        assert!(body.detail.contains("upstream overloaded"));
    }

    #[tokio::test]
    async fn structured_mismatch_is_500_with_raw_text() {
        let raw = r#"{"suggestions": ["grow"]}"#;
        let res = app(Reply::Text(raw), ParseStrategy::Structured)
            .oneshot(analyze_request(minimal_body()))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: ErrorBody = read_json(res).await;
        assert!(body
            .detail
            .starts_with("failed to parse AI response into required format"));
        assert!(body.detail.contains(raw));
    }

    #[tokio::test]
    async fn panic_is_500_envelope() {
        let res = app(Reply::Panic, ParseStrategy::Numbered)
            .oneshot(analyze_request(minimal_body()))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: ErrorBody = read_json(res).await;
        assert!(body.detail.contains("provider client blew up"));
    }

    #[tokio::test]
    async fn caller_request_id_is_echoed() {
        let req = Request::get("/health")
            .header("X-Request-Id", "abc-123")
            .body(Body::empty())
            .unwrap();
        let res = app(Reply::Text(""), ParseStrategy::Numbered)
            .oneshot(req)
            .await
            .unwrap();

        assert_eq!(res.headers()["x-request-id"], "abc-123");
    }

    #[tokio::test]
    async fn missing_request_id_gets_a_fresh_uuid() {
        let mut ids = Vec::new();
        for _ in 0..2 {
            let res = app(Reply::Text(""), ParseStrategy::Numbered)
                .oneshot(Request::get("/health").body(Body::empty()).unwrap())
                .await
                .unwrap();
            let id = res.headers()["x-request-id"].to_str().unwrap().to_string();
            assert_eq!(id.len(), 36, "{id}");
            assert_eq!(id.matches('-').count(), 4, "{id}");
            ids.push(id);
        }
        assert_ne!(ids[0], ids[1]);
    }

    #[tokio::test]
    async fn structured_success_round_trip() {
        let raw = r#"{"objectives": [{"objective": "Grow retention", "rationale": "cheaper"}]}"#;
        let mut payload = minimal_body();
        payload["company_name"] = json!("Acme");
        payload["temperature"] = json!(0.3);

        let res = app(Reply::Text(raw), ParseStrategy::Structured)
            .oneshot(analyze_request(payload))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = read_json(res).await;
        assert_eq!(body["company_name"], "Acme");
        assert_eq!(body["objectives"][0]["objective"], "Grow retention");
        assert_eq!(body["metadata"]["parse_strategy"], "structured");
        assert_eq!(body["metadata"]["temperature"], 0.3);
    }
}
