//! Request and response shapes for the HTTP API.
//!
//! Wire names are camelCase; all inbound fields arrive as strings and are
//! validated by the core, not by serde.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use claim_core::{ClaimRecord, RawClaimRequest, TokenKind, WalletAccount};
use claim_store::{AllocationStatus, GlobalStats, KindAllocationStatus, WalletSummary};

/// Claim submission request body
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubmitClaimRequest {
    pub token_kind: Option<String>,
    pub amount: Option<String>,
    pub transaction_reference: Option<String>,
    pub wallet_address: Option<String>,
    pub timestamp: Option<String>,
    pub conversion_rate: Option<String>,
}

impl SubmitClaimRequest {
    /// Hand the untrusted fields to the core validator
    pub fn into_raw(self) -> RawClaimRequest {
        RawClaimRequest {
            token_kind: self.token_kind,
            amount: self.amount,
            transaction_reference: self.transaction_reference,
            wallet_address: self.wallet_address,
            timestamp: self.timestamp,
            conversion_rate: self.conversion_rate,
        }
    }
}

/// Per-wallet totals embedded in a successful claim response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletTotals {
    pub kind_a: Decimal,
    pub kind_b: Decimal,
    pub total_derived: Decimal,
    pub claim_count: u64,
}

impl From<&WalletAccount> for WalletTotals {
    fn from(account: &WalletAccount) -> Self {
        Self {
            kind_a: account.claimed_kind_a,
            kind_b: account.claimed_kind_b,
            total_derived: account.total_derived,
            claim_count: account.claim_count,
        }
    }
}

/// Successful claim submission response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimResponse {
    pub claim_id: String,
    pub wallet_address: String,
    pub token_kind: TokenKind,
    pub amount_claimed: Decimal,
    pub derived_amount: Decimal,
    pub transaction_reference: String,
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub wallet_totals: WalletTotals,
}

impl ClaimResponse {
    pub fn new(record: &ClaimRecord, account: &WalletAccount) -> Self {
        Self {
            claim_id: record.claim_id.clone(),
            wallet_address: record.wallet_address.clone(),
            token_kind: record.token_kind,
            amount_claimed: record.amount,
            derived_amount: record.derived_amount,
            transaction_reference: record.transaction_reference.clone(),
            status: record.status.to_string(),
            timestamp: record.timestamp,
            wallet_totals: WalletTotals::from(account),
        }
    }
}

/// A stored claim record
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimRecordResponse {
    pub claim_id: String,
    pub wallet_address: String,
    pub token_kind: TokenKind,
    pub amount_claimed: Decimal,
    pub derived_amount: Decimal,
    pub transaction_reference: String,
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl From<&ClaimRecord> for ClaimRecordResponse {
    fn from(record: &ClaimRecord) -> Self {
        Self {
            claim_id: record.claim_id.clone(),
            wallet_address: record.wallet_address.clone(),
            token_kind: record.token_kind,
            amount_claimed: record.amount,
            derived_amount: record.derived_amount,
            transaction_reference: record.transaction_reference.clone(),
            status: record.status.to_string(),
            timestamp: record.timestamp,
            created_at: record.created_at,
        }
    }
}

/// Wallet summary response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    pub wallet_address: String,
    pub kind_a: Decimal,
    pub kind_b: Decimal,
    pub total_derived: Decimal,
    pub claim_count: u64,
    pub first_claim_at: DateTime<Utc>,
    pub last_claim_at: DateTime<Utc>,
}

impl From<WalletSummary> for SummaryResponse {
    fn from(summary: WalletSummary) -> Self {
        Self {
            wallet_address: summary.wallet_address,
            kind_a: summary.claimed_kind_a,
            kind_b: summary.claimed_kind_b,
            total_derived: summary.total_derived,
            claim_count: summary.claim_count,
            first_claim_at: summary.first_claim_at,
            last_claim_at: summary.last_claim_at,
        }
    }
}

/// Per-kind allocation status
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KindStatusResponse {
    pub allocated: Decimal,
    pub claimed: Decimal,
    pub remaining: Decimal,
    pub can_claim: bool,
}

impl From<KindAllocationStatus> for KindStatusResponse {
    fn from(status: KindAllocationStatus) -> Self {
        Self {
            allocated: status.allocated,
            claimed: status.claimed,
            remaining: status.remaining,
            can_claim: status.can_claim,
        }
    }
}

/// Allocation status response for one wallet
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationStatusResponse {
    pub wallet_address: String,
    pub kind_a: KindStatusResponse,
    pub kind_b: KindStatusResponse,
}

impl From<AllocationStatus> for AllocationStatusResponse {
    fn from(status: AllocationStatus) -> Self {
        Self {
            wallet_address: status.wallet_address,
            kind_a: status.kind_a.into(),
            kind_b: status.kind_b.into(),
        }
    }
}

/// Global statistics response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub wallet_count: u64,
    pub claim_count: u64,
    pub total_kind_a: Decimal,
    pub total_kind_b: Decimal,
    pub total_derived: Decimal,
    pub recent_claims: Vec<ClaimRecordResponse>,
}

impl From<GlobalStats> for StatsResponse {
    fn from(stats: GlobalStats) -> Self {
        Self {
            wallet_count: stats.wallet_count,
            claim_count: stats.claim_count,
            total_kind_a: stats.total_kind_a,
            total_kind_b: stats.total_kind_b,
            total_derived: stats.total_derived,
            recent_claims: stats.recent_claims.iter().map(Into::into).collect(),
        }
    }
}

/// Registry reload response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReloadResponse {
    pub status: String,
    pub wallet_count: usize,
}

/// Health/readiness response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub allocation_count: usize,
    pub claim_count: u64,
}
