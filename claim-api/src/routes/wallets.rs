//! Wallet summary and allocation status endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::dto::{AllocationStatusResponse, SummaryResponse};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Re-derived claim totals for a wallet
pub async fn wallet_summary(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> ApiResult<Json<SummaryResponse>> {
    let summary = state
        .aggregator
        .summary(&address)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("No claims for wallet {}", address)))?;

    Ok(Json(summary.into()))
}

/// Per-kind allocation consumption for a wallet
pub async fn allocation_status(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> ApiResult<Json<AllocationStatusResponse>> {
    let status = state
        .aggregator
        .allocation_status(&address)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("No allocation for wallet {}", address)))?;

    Ok(Json(status.into()))
}
