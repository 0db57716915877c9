//! Claim submission and lookup endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use claim_core::validate;

use crate::dto::{ClaimRecordResponse, ClaimResponse, SubmitClaimRequest};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Submit a claim
pub async fn submit_claim(
    State(state): State<AppState>,
    Json(req): Json<SubmitClaimRequest>,
) -> ApiResult<(StatusCode, Json<ClaimResponse>)> {
    // Validation and allocation matching run against the current snapshot,
    // before any storage access
    let snapshot = state.registry.snapshot();
    let claim = validate(&req.into_raw(), &snapshot)?;

    let submitted = state.ledger.submit(claim).await?;

    Ok((
        StatusCode::CREATED,
        Json(ClaimResponse::new(&submitted.record, &submitted.account)),
    ))
}

/// Get a claim record by id
pub async fn get_claim(
    State(state): State<AppState>,
    Path(claim_id): Path<String>,
) -> ApiResult<Json<ClaimRecordResponse>> {
    let record = state
        .ledger
        .get_claim(&claim_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Claim {} not found", claim_id)))?;

    Ok(Json(ClaimRecordResponse::from(&record)))
}
