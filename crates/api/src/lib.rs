mod rate_limit;

use std::env;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::extract::{Query, Request, State};
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use triage_agents::TriageAgent;
use triage_core::{sample_catalog, SymptomReport, UrgencyLevel};
use triage_llm::{OpenAiClassifier, OpenAiConfig};
use triage_observability::AppMetrics;

use crate::rate_limit::IpRateLimiter;

const SERVICE_NAME: &str = "triage-ai-backend";
const MAX_BODY_BYTES: usize = 64 * 1024;

#[derive(Clone)]
pub struct ApiState {
    pub agent: Arc<TriageAgent<OpenAiClassifier>>,
    pub metrics: Arc<AppMetrics>,
    pub limiter: IpRateLimiter,
    pub llm_model: Option<String>,
    pub allowed_origins: Arc<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
struct AssessRequest {
    symptoms: Option<String>,
    location: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct ResourcesQuery {
    location: Option<String>,
    urgency: Option<String>,
}

pub async fn build_app() -> Result<Router> {
    let metrics = AppMetrics::shared();
    let catalog = Arc::new(sample_catalog());

    let request_timeout = Duration::from_secs(
        env::var("TRIAGE_OPENAI_TIMEOUT_SECONDS")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .unwrap_or(20),
    );
    let http_client = Client::builder()
        .connect_timeout(Duration::from_secs(6))
        .timeout(request_timeout)
        .build()
        .context("failed to build HTTP client")?;

    let delegate =
        OpenAiConfig::from_env().map(|config| OpenAiClassifier::new(config, http_client));
    let llm_model = delegate
        .as_ref()
        .map(|classifier| classifier.model().to_string());

    let agent = Arc::new(TriageAgent::new(catalog, delegate, metrics.clone()));

    let rate_limit_window = Duration::from_secs(
        env::var("TRIAGE_RATE_LIMIT_WINDOW_SECONDS")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .unwrap_or(60),
    );
    let rate_limit_max = env::var("TRIAGE_RATE_LIMIT_MAX")
        .ok()
        .and_then(|value| value.parse::<usize>().ok())
        .unwrap_or(120);

    let state = ApiState {
        agent,
        metrics,
        limiter: IpRateLimiter::new(rate_limit_window, rate_limit_max),
        llm_model,
        allowed_origins: Arc::new(parse_allowed_origins()),
    };

    Ok(build_router(state))
}

pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/assess", post(assess))
        .route("/resources", get(resources))
        .layer(build_cors_layer(&state.allowed_origins))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .with_state(state)
}

async fn health(State(state): State<ApiState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": SERVICE_NAME,
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "metrics": state.metrics.snapshot(),
            "capabilities": {
                "llm": state.agent.delegate_enabled(),
                "llm_model": state.llm_model,
            }
        })),
    )
}

async fn assess(
    State(state): State<ApiState>,
    request: Option<Json<AssessRequest>>,
) -> Response {
    // A missing, empty, or unparseable body carries no symptoms either; all
    // of them get the same client error instead of the extractor rejection.
    let Some(Json(request)) = request else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Symptoms are required" })),
        )
            .into_response();
    };

    let Some(symptoms) = request.symptoms else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Symptoms are required" })),
        )
            .into_response();
    };

    if symptoms.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Symptoms cannot be empty" })),
        )
            .into_response();
    }

    let report = SymptomReport {
        symptoms,
        location: request.location,
    };

    match state.agent.assess(report).await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(error) => {
            tracing::error!(%error, "assessment failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "An error occurred during assessment" })),
            )
                .into_response()
        }
    }
}

async fn resources(
    State(state): State<ApiState>,
    Query(query): Query<ResourcesQuery>,
) -> impl IntoResponse {
    let urgency = UrgencyLevel::from_optional_str(query.urgency.as_deref());
    let location = query.location.unwrap_or_default();
    let resources = state.agent.resources_for(&location, urgency);
    let total = resources.len();

    (
        StatusCode::OK,
        Json(json!({
            "resources": resources,
            "total": total,
        })),
    )
}

fn parse_allowed_origins() -> Vec<String> {
    env::var("TRIAGE_ALLOWED_ORIGINS")
        .ok()
        .map(|value| {
            value
                .split(',')
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

fn build_cors_layer(allowed_origins: &Arc<Vec<String>>) -> CorsLayer {
    let origins = allowed_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect::<Vec<_>>();
    let origins = if origins.is_empty() {
        vec![
            HeaderValue::from_static("http://localhost:5173"),
            HeaderValue::from_static("http://localhost:3000"),
        ]
    } else {
        origins
    };

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

async fn rate_limit_middleware(
    State(state): State<ApiState>,
    request: Request,
    next: Next,
) -> Response {
    let client_ip = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| "unknown".to_string());

    if !state.limiter.allow(&client_ip) {
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({ "error": "Too many requests" })),
        )
            .into_response();
    }

    next.run(request).await
}
