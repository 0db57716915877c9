//! Claim records.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::common::{generate_claim_id, TokenKind};

/// Claim lifecycle status
///
/// A record is written as `completed`; no further transitions exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimStatus {
    /// Claim committed and counted
    Completed,
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed => write!(f, "completed"),
        }
    }
}

/// A single committed redemption
///
/// Identified three ways: by its generated claim id, by the caller-supplied
/// transaction reference (globally unique), and by the (wallet, kind) pair
/// (a wallet claims each kind at most once). Never mutated or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimRecord {
    /// Generated claim identifier
    pub claim_id: String,
    /// Wallet address (lowercase)
    pub wallet_address: String,
    /// Token kind claimed
    pub token_kind: TokenKind,
    /// Claimed amount
    pub amount: Decimal,
    /// Conversion rate into the derived unit
    pub conversion_rate: Decimal,
    /// amount * conversion_rate
    pub derived_amount: Decimal,
    /// Caller-supplied transaction reference
    pub transaction_reference: String,
    /// Claim timestamp (caller-supplied or server-assigned)
    pub timestamp: DateTime<Utc>,
    /// Lifecycle status
    pub status: ClaimStatus,
    /// Server-assigned creation time
    pub created_at: DateTime<Utc>,
}

impl ClaimRecord {
    /// Build a new record with a freshly generated id
    pub fn new(
        wallet_address: impl Into<String>,
        token_kind: TokenKind,
        amount: Decimal,
        conversion_rate: Decimal,
        transaction_reference: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            claim_id: generate_claim_id(),
            wallet_address: wallet_address.into(),
            token_kind,
            amount,
            conversion_rate,
            derived_amount: amount * conversion_rate,
            transaction_reference: transaction_reference.into(),
            timestamp,
            status: ClaimStatus::Completed,
            created_at: Utc::now(),
        }
    }
}
