//! Health check endpoints.

use axum::{extract::State, Json};

use crate::dto::HealthResponse;
use crate::error::ApiResult;
use crate::state::AppState;

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    let claim_count = state
        .store
        .stats()
        .await
        .map(|s| s.claim_count)
        .unwrap_or(0);

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
        allocation_count: state.registry.len(),
        claim_count,
    }))
}

/// Ready check endpoint (verifies store reachability)
pub async fn ready_check(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    let (status, claim_count) = match state.store.stats().await {
        Ok(stats) => ("ready", stats.claim_count),
        Err(_) => ("degraded", 0),
    };

    Ok(Json(HealthResponse {
        status: status.to_string(),
        version: state.version.clone(),
        allocation_count: state.registry.len(),
        claim_count,
    }))
}
