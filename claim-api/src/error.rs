//! API error types and the claim-error to status-code mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use claim_core::{AuthorizationError, ClaimError, ConflictError, RegistryError, ValidationError};

/// API error types
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Claim(#[from] ClaimError),

    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),
}

/// Error response body: a stable discriminator, a human-readable message
/// and optional structured details
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub kind: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

fn claim_error_details(error: &ClaimError) -> Option<serde_json::Value> {
    match error {
        ClaimError::Validation(ValidationError::MissingFields { missing }) => {
            Some(json!({ "missing": missing }))
        }
        ClaimError::Validation(
            ValidationError::InvalidTokenKind { provided }
            | ValidationError::InvalidAmount { provided }
            | ValidationError::InvalidRate { provided },
        ) => Some(json!({ "provided": provided })),
        ClaimError::Authorization(AuthorizationError::UnknownWallet { wallet, kind }) => {
            Some(json!({ "wallet": wallet, "tokenKind": kind }))
        }
        ClaimError::Authorization(AuthorizationError::AllocationMismatch {
            wallet,
            kind,
            expected,
            provided,
        }) => Some(json!({
            "wallet": wallet,
            "tokenKind": kind,
            "expected": expected,
            "provided": provided,
        })),
        ClaimError::Conflict(ConflictError::DuplicateTransaction {
            reference,
            existing_claim_id,
            claimed_at,
        }) => Some(json!({
            "transactionReference": reference,
            "existingClaimId": existing_claim_id,
            "claimedAt": claimed_at,
        })),
        ClaimError::Conflict(ConflictError::AlreadyClaimed {
            wallet,
            kind,
            existing_claim_id,
            claimed_at,
        }) => Some(json!({
            "wallet": wallet,
            "tokenKind": kind,
            "existingClaimId": existing_claim_id,
            "claimedAt": claimed_at,
        })),
        ClaimError::Internal(_) => None,
    }
}

fn claim_error_status(error: &ClaimError) -> StatusCode {
    match error {
        ClaimError::Validation(_) => StatusCode::BAD_REQUEST,
        ClaimError::Authorization(_) => StatusCode::FORBIDDEN,
        ClaimError::Conflict(_) => StatusCode::CONFLICT,
        ClaimError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind, message, details) = match &self {
            ApiError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                "not_found".to_string(),
                msg.clone(),
                None,
            ),
            ApiError::Claim(e) => (
                claim_error_status(e),
                e.code().to_string(),
                e.to_string(),
                claim_error_details(e),
            ),
            ApiError::Registry(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "registry_error".to_string(),
                e.to_string(),
                None,
            ),
        };

        let body = ErrorResponse {
            error: ErrorBody {
                kind,
                message,
                details,
            },
        };
        (status, Json(body)).into_response()
    }
}

/// API result type
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            claim_error_status(&ClaimError::Validation(ValidationError::InvalidAmount {
                provided: "x".to_string()
            })),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            claim_error_status(&ClaimError::Internal("boom".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_details_carry_missing_fields() {
        let error = ClaimError::Validation(ValidationError::MissingFields {
            missing: vec!["amount".to_string()],
        });
        let details = claim_error_details(&error).unwrap();
        assert_eq!(details["missing"][0], "amount");
    }
}
