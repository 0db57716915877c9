//! Wallet accounts: per-wallet claim aggregates.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::claim::ClaimRecord;
use super::common::TokenKind;

/// Cumulative claim totals for one wallet
///
/// Created lazily on the wallet's first successful claim and incremented in
/// the same atomic unit as the record insert. The increments are plain
/// additions, so the aggregate stays correct even if more than one record
/// per kind were ever admitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletAccount {
    /// Wallet address (lowercase)
    pub wallet_address: String,
    /// Cumulative claimed amount of kind A
    pub claimed_kind_a: Decimal,
    /// Cumulative claimed amount of kind B
    pub claimed_kind_b: Decimal,
    /// Cumulative derived-unit total
    pub total_derived: Decimal,
    /// Number of committed claims
    pub claim_count: u64,
    /// Timestamp of the first claim
    pub first_claim_at: DateTime<Utc>,
    /// Timestamp of the most recent claim
    pub last_claim_at: DateTime<Utc>,
    /// Last account update time
    pub updated_at: DateTime<Utc>,
}

impl WalletAccount {
    /// Create a fresh account with zero totals
    pub fn new(wallet_address: impl Into<String>, first_claim_at: DateTime<Utc>) -> Self {
        Self {
            wallet_address: wallet_address.into(),
            claimed_kind_a: Decimal::ZERO,
            claimed_kind_b: Decimal::ZERO,
            total_derived: Decimal::ZERO,
            claim_count: 0,
            first_claim_at,
            last_claim_at: first_claim_at,
            updated_at: Utc::now(),
        }
    }

    /// Fold a committed claim into the totals
    pub fn apply_claim(&mut self, record: &ClaimRecord) {
        match record.token_kind {
            TokenKind::KindA => self.claimed_kind_a += record.amount,
            TokenKind::KindB => self.claimed_kind_b += record.amount,
        }
        self.total_derived += record.derived_amount;
        self.claim_count += 1;
        self.last_claim_at = record.timestamp;
        self.updated_at = Utc::now();
    }

    /// Cumulative claimed amount for the given kind
    pub fn claimed_for(&self, kind: TokenKind) -> Decimal {
        match kind {
            TokenKind::KindA => self.claimed_kind_a,
            TokenKind::KindB => self.claimed_kind_b,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(kind: TokenKind, amount: i64, rate: i64) -> ClaimRecord {
        ClaimRecord::new(
            "0xabc",
            kind,
            Decimal::new(amount, 0),
            Decimal::new(rate, 0),
            format!("tx-{}-{}", kind, amount),
            Utc::now(),
        )
    }

    #[test]
    fn test_apply_claim() {
        let mut account = WalletAccount::new("0xabc", Utc::now());
        account.apply_claim(&record(TokenKind::KindA, 50, 2));

        assert_eq!(account.claimed_kind_a, Decimal::new(50, 0));
        assert_eq!(account.claimed_kind_b, Decimal::ZERO);
        assert_eq!(account.total_derived, Decimal::new(100, 0));
        assert_eq!(account.claim_count, 1);
    }

    #[test]
    fn test_apply_claim_is_additive() {
        let mut account = WalletAccount::new("0xabc", Utc::now());
        account.apply_claim(&record(TokenKind::KindA, 50, 1));
        account.apply_claim(&record(TokenKind::KindB, 30, 2));

        assert_eq!(account.claimed_for(TokenKind::KindA), Decimal::new(50, 0));
        assert_eq!(account.claimed_for(TokenKind::KindB), Decimal::new(30, 0));
        assert_eq!(account.total_derived, Decimal::new(110, 0));
        assert_eq!(account.claim_count, 2);
    }
}
