//! Error taxonomy for claim processing.
//!
//! Closed tagged variants instead of free-form payloads: every failure
//! carries a stable discriminator (`code()`) plus the structured fields a
//! caller needs to decide whether to retry, correct the input, or treat the
//! claim as already done.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::types::TokenKind;

/// Request-shape failures, detectable before any storage access
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Missing required fields: {}", missing.join(", "))]
    MissingFields { missing: Vec<String> },

    #[error("Invalid token kind: {provided}")]
    InvalidTokenKind { provided: String },

    #[error("Invalid amount: {provided}")]
    InvalidAmount { provided: String },

    #[error("Invalid conversion rate: {provided}")]
    InvalidRate { provided: String },
}

/// Entitlement failures: the request does not match the allocation table
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AuthorizationError {
    #[error("Wallet {wallet} has no allocation for {kind}")]
    UnknownWallet { wallet: String, kind: TokenKind },

    #[error("Amount {provided} does not match allocation {expected} for wallet {wallet}")]
    AllocationMismatch {
        wallet: String,
        kind: TokenKind,
        expected: Decimal,
        provided: Decimal,
    },
}

/// Uniqueness conflicts; the existing record is the authoritative outcome
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConflictError {
    #[error("Transaction reference {reference} already claimed as {existing_claim_id}")]
    DuplicateTransaction {
        reference: String,
        existing_claim_id: String,
        claimed_at: DateTime<Utc>,
    },

    #[error("Wallet {wallet} already claimed {kind} as {existing_claim_id}")]
    AlreadyClaimed {
        wallet: String,
        kind: TokenKind,
        existing_claim_id: String,
        claimed_at: DateTime<Utc>,
    },
}

/// Top-level claim processing error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClaimError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Authorization failed: {0}")]
    Authorization(#[from] AuthorizationError),

    #[error("Conflict: {0}")]
    Conflict(#[from] ConflictError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ValidationError {
    /// Stable discriminator
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingFields { .. } => "missing_fields",
            Self::InvalidTokenKind { .. } => "invalid_token_kind",
            Self::InvalidAmount { .. } => "invalid_amount",
            Self::InvalidRate { .. } => "invalid_rate",
        }
    }
}

impl AuthorizationError {
    /// Stable discriminator
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownWallet { .. } => "unknown_wallet",
            Self::AllocationMismatch { .. } => "allocation_mismatch",
        }
    }
}

impl ConflictError {
    /// Stable discriminator
    pub fn code(&self) -> &'static str {
        match self {
            Self::DuplicateTransaction { .. } => "duplicate_transaction",
            Self::AlreadyClaimed { .. } => "already_claimed",
        }
    }

    /// Identifier of the record the conflict points at
    pub fn existing_claim_id(&self) -> &str {
        match self {
            Self::DuplicateTransaction { existing_claim_id, .. } => existing_claim_id,
            Self::AlreadyClaimed { existing_claim_id, .. } => existing_claim_id,
        }
    }
}

impl ClaimError {
    /// Stable discriminator
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(e) => e.code(),
            Self::Authorization(e) => e.code(),
            Self::Conflict(e) => e.code(),
            Self::Internal(_) => "internal_error",
        }
    }
}

/// Result alias for claim operations
pub type ClaimResult<T> = Result<T, ClaimError>;
