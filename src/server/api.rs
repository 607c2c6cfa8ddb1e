use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::Local;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::errors::StoreError;
use crate::orchestrator::{ClaimText, Detector, VerificationResponse};
use crate::store::ResultStore;

// ── Shared application state ──────────────────────────────────────────

pub struct AppState {
    /// Absent when no search credential is configured.
    pub detector: Option<Arc<Detector>>,
    pub store: Arc<ResultStore>,
}

impl AppState {
    pub fn api_configured(&self) -> bool {
        self.detector.is_some()
    }
}

pub type SharedState = Arc<AppState>;

// ── Request payload types ─────────────────────────────────────────────

#[derive(Deserialize)]
pub struct VerifyRequest {
    #[serde(default)]
    pub claim: String,
}

// ── Error handling ────────────────────────────────────────────────────

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Unavailable(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        (status, Json(json!({"error": message}))).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(_) => ApiError::NotFound(e.to_string()),
            StoreError::InvalidName(_) => ApiError::BadRequest(e.to_string()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

// ── Router ────────────────────────────────────────────────────────────

pub fn api_router() -> Router<SharedState> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/verify", post(verify))
        .route("/results", get(list_results))
        .route("/results/{filename}", get(get_result))
}

// ── Handlers ──────────────────────────────────────────────────────────

async fn root(State(state): State<SharedState>) -> Json<Value> {
    Json(json!({
        "status": "online",
        "timestamp": Local::now().to_rfc3339(),
        "api_configured": state.api_configured(),
    }))
}

async fn health(State(state): State<SharedState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": Local::now().to_rfc3339(),
        "api_configured": state.api_configured(),
    }))
}

async fn verify(
    State(state): State<SharedState>,
    Json(request): Json<VerifyRequest>,
) -> Result<Json<VerificationResponse>, ApiError> {
    let detector = state
        .detector
        .clone()
        .ok_or_else(|| ApiError::Unavailable("Perplexity API key not configured".into()))?;
    let claim = ClaimText::parse(&request.claim).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    tracing::info!(claim = %claim, "Verification requested");
    Ok(Json(detector.verify(claim.as_str()).await))
}

async fn list_results(State(state): State<SharedState>) -> Result<Json<Value>, ApiError> {
    let results = state.store.list()?;
    Ok(Json(json!({ "results": results })))
}

async fn get_result(
    State(state): State<SharedState>,
    Path(filename): Path<String>,
) -> Result<Json<Value>, ApiError> {
    Ok(Json(state.store.load(&filename)?))
}
