//! Global statistics and registry administration endpoints.

use axum::{extract::State, Json};

use crate::dto::{ReloadResponse, StatsResponse};
use crate::error::ApiResult;
use crate::state::AppState;

/// Store-wide statistics
pub async fn global_stats(State(state): State<AppState>) -> ApiResult<Json<StatsResponse>> {
    let stats = state.aggregator.global_stats().await?;
    Ok(Json(stats.into()))
}

/// Re-read the allocation source and swap the snapshot
pub async fn reload_allocations(
    State(state): State<AppState>,
) -> ApiResult<Json<ReloadResponse>> {
    let wallet_count = state.registry.reload()?;

    Ok(Json(ReloadResponse {
        status: "reloaded".to_string(),
        wallet_count,
    }))
}
