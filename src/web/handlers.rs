//! HTTP request handlers

use super::error::ApiError;
use super::state::AppState;
use crate::prompt::build_prd_prompt;
use axum::{
    extract::{rejection::JsonRejection, State},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{error, info};

/// Body of `POST /api/deep-research`
#[derive(Debug, Clone, Deserialize)]
pub struct PrdRequest {
    /// Product idea to write the PRD for
    pub query: String,
    /// Accepted for compatibility; generation does not use it
    #[serde(default = "default_max_sources")]
    pub max_sources: i64,
    /// Accepted for compatibility; generation does not use it
    #[serde(default = "default_pro_mode")]
    pub pro_mode: bool,
}

fn default_max_sources() -> i64 {
    3
}

fn default_pro_mode() -> bool {
    true
}

/// Generated document
#[derive(Debug, Serialize, Deserialize)]
pub struct PrdResponse {
    pub result: String,
    /// Always empty: the delegate does not report attribution
    pub sources: Vec<serde_json::Map<String, serde_json::Value>>,
}

/// Root handler
pub async fn index() -> impl IntoResponse {
    Json(serde_json::json!({
        "message": "OpenDeepSearch PRD Generator is running"
    }))
}

/// Health check handler. Never consults the delegate.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy" }))
}

/// Generate a PRD for the requested product idea
pub async fn deep_research(
    State(state): State<AppState>,
    payload: Result<Json<PrdRequest>, JsonRejection>,
) -> Result<Json<PrdResponse>, ApiError> {
    let Json(request) = payload?;
    if request.query.trim().is_empty() {
        return Err(ApiError::unprocessable("query must not be empty"));
    }

    info!(
        query_len = request.query.len(),
        max_sources = request.max_sources,
        pro_mode = request.pro_mode,
        model = %state.settings.delegate.model_id,
        "PRD request received"
    );

    let prompt = build_prd_prompt(&request.query);
    let start = Instant::now();

    let result = state.delegate.execute(&prompt).await.map_err(|e| {
        error!("PRD generation failed after {:?}: {}", start.elapsed(), e);
        ApiError::from(e)
    })?;

    info!("PRD generated in {:?} ({} chars)", start.elapsed(), result.len());

    Ok(Json(PrdResponse {
        result,
        sources: Vec::new(),
    }))
}
