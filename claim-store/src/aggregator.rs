//! Balance aggregation: wallet summaries, global stats, allocation status.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::sync::Arc;

use claim_core::{AllocationRegistry, ClaimRecord, ClaimResult, TokenKind};

use crate::storage::ClaimStore;

/// How many records `global_stats` returns as recent activity
const RECENT_CLAIMS_LIMIT: usize = 10;

/// Re-derived claim totals for one wallet
#[derive(Debug, Clone, PartialEq)]
pub struct WalletSummary {
    /// Wallet address (lowercase)
    pub wallet_address: String,
    /// Total claimed amount of kind A
    pub claimed_kind_a: Decimal,
    /// Total claimed amount of kind B
    pub claimed_kind_b: Decimal,
    /// Total derived units
    pub total_derived: Decimal,
    /// Number of committed claims
    pub claim_count: u64,
    /// Earliest claim timestamp
    pub first_claim_at: DateTime<Utc>,
    /// Latest claim timestamp
    pub last_claim_at: DateTime<Utc>,
}

/// Store-wide aggregate view
#[derive(Debug, Clone)]
pub struct GlobalStats {
    /// Number of wallets with at least one claim
    pub wallet_count: u64,
    /// Number of committed claims
    pub claim_count: u64,
    /// Total claimed amount of kind A
    pub total_kind_a: Decimal,
    /// Total claimed amount of kind B
    pub total_kind_b: Decimal,
    /// Total derived units
    pub total_derived: Decimal,
    /// Most recent claims, newest first
    pub recent_claims: Vec<ClaimRecord>,
}

/// Allocation consumption for one (wallet, kind)
#[derive(Debug, Clone, PartialEq)]
pub struct KindAllocationStatus {
    /// Entitled amount
    pub allocated: Decimal,
    /// Claimed so far
    pub claimed: Decimal,
    /// max(0, allocated - claimed)
    pub remaining: Decimal,
    /// Whether anything is left to claim
    pub can_claim: bool,
}

/// Allocation consumption for one wallet, both kinds
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationStatus {
    /// Wallet address (lowercase)
    pub wallet_address: String,
    /// Status for kind A
    pub kind_a: KindAllocationStatus,
    /// Status for kind B
    pub kind_b: KindAllocationStatus,
}

/// Read-side aggregation over the claim store and the allocation registry
///
/// Summaries are re-derived from the claim records rather than read from the
/// maintained account, so a drifted aggregate can never be reported. All
/// operations here are read-only and run outside the commit transaction;
/// they tolerate momentarily stale totals under concurrent writes.
pub struct BalanceAggregator {
    store: Arc<dyn ClaimStore>,
    registry: Arc<AllocationRegistry>,
}

impl BalanceAggregator {
    /// Create an aggregator over the given store and registry
    pub fn new(store: Arc<dyn ClaimStore>, registry: Arc<AllocationRegistry>) -> Self {
        Self { store, registry }
    }

    /// Totals for one wallet, or `None` if it has no claims
    pub async fn summary(&self, wallet: &str) -> ClaimResult<Option<WalletSummary>> {
        let wallet = claim_core::normalize_address(wallet);
        let claims = self.store.claims_for_wallet(&wallet).await?;
        let Some(first) = claims.first() else {
            return Ok(None);
        };

        let mut summary = WalletSummary {
            wallet_address: wallet,
            claimed_kind_a: Decimal::ZERO,
            claimed_kind_b: Decimal::ZERO,
            total_derived: Decimal::ZERO,
            claim_count: claims.len() as u64,
            first_claim_at: first.timestamp,
            last_claim_at: first.timestamp,
        };
        for claim in &claims {
            match claim.token_kind {
                TokenKind::KindA => summary.claimed_kind_a += claim.amount,
                TokenKind::KindB => summary.claimed_kind_b += claim.amount,
            }
            summary.total_derived += claim.derived_amount;
            summary.first_claim_at = summary.first_claim_at.min(claim.timestamp);
            summary.last_claim_at = summary.last_claim_at.max(claim.timestamp);
        }

        Ok(Some(summary))
    }

    /// Store-wide totals plus recent activity
    pub async fn global_stats(&self) -> ClaimResult<GlobalStats> {
        let stats = self.store.stats().await?;
        let recent_claims = self.store.recent_claims(RECENT_CLAIMS_LIMIT).await?;

        Ok(GlobalStats {
            wallet_count: stats.wallet_count,
            claim_count: stats.claim_count,
            total_kind_a: stats.total_kind_a,
            total_kind_b: stats.total_kind_b,
            total_derived: stats.total_derived,
            recent_claims,
        })
    }

    /// Per-kind allocation consumption, or `None` if the wallet has no
    /// allocation entry
    pub async fn allocation_status(&self, wallet: &str) -> ClaimResult<Option<AllocationStatus>> {
        let wallet = claim_core::normalize_address(wallet);
        let snapshot = self.registry.snapshot();
        let Some(entry) = snapshot.get(&wallet) else {
            return Ok(None);
        };

        let claims = self.store.claims_for_wallet(&wallet).await?;
        let status_for = |kind: TokenKind| {
            let allocated = entry.amount_for(kind);
            let claimed: Decimal = claims
                .iter()
                .filter(|c| c.token_kind == kind)
                .map(|c| c.amount)
                .sum();
            // Clamp: a data anomaly must not surface a negative remaining
            let remaining = (allocated - claimed).max(Decimal::ZERO);
            KindAllocationStatus {
                allocated,
                claimed,
                remaining,
                can_claim: remaining > Decimal::ZERO,
            }
        };

        Ok(Some(AllocationStatus {
            wallet_address: wallet,
            kind_a: status_for(TokenKind::KindA),
            kind_b: status_for(TokenKind::KindB),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use claim_core::{AllocationEntry, AllocationTable, ClaimRecord};

    use crate::storage::MemoryStore;

    fn registry() -> Arc<AllocationRegistry> {
        let mut table = AllocationTable::new();
        table.insert(AllocationEntry::new(
            "0xabc",
            Decimal::new(50, 0),
            Decimal::ZERO,
        ));
        Arc::new(AllocationRegistry::from_table(table))
    }

    async fn store_with_claim() -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        let record = ClaimRecord::new(
            "0xabc",
            TokenKind::KindA,
            Decimal::new(50, 0),
            Decimal::new(2, 0),
            "tx1",
            Utc::now(),
        );
        store.commit_claim(&record).await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_summary_rederives_totals() {
        let store = store_with_claim().await;
        let aggregator = BalanceAggregator::new(store, registry());

        let summary = aggregator.summary("0xABC").await.unwrap().unwrap();
        assert_eq!(summary.wallet_address, "0xabc");
        assert_eq!(summary.claimed_kind_a, Decimal::new(50, 0));
        assert_eq!(summary.claimed_kind_b, Decimal::ZERO);
        assert_eq!(summary.total_derived, Decimal::new(100, 0));
        assert_eq!(summary.claim_count, 1);
        assert_eq!(summary.first_claim_at, summary.last_claim_at);
    }

    #[tokio::test]
    async fn test_summary_absent_wallet() {
        let aggregator = BalanceAggregator::new(Arc::new(MemoryStore::new()), registry());
        assert!(aggregator.summary("0xabc").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_global_stats() {
        let store = store_with_claim().await;
        let aggregator = BalanceAggregator::new(store, registry());

        let stats = aggregator.global_stats().await.unwrap();
        assert_eq!(stats.wallet_count, 1);
        assert_eq!(stats.claim_count, 1);
        assert_eq!(stats.total_kind_a, Decimal::new(50, 0));
        assert_eq!(stats.total_derived, Decimal::new(100, 0));
        assert_eq!(stats.recent_claims.len(), 1);
    }

    #[tokio::test]
    async fn test_allocation_status_exhausted() {
        let store = store_with_claim().await;
        let aggregator = BalanceAggregator::new(store, registry());

        let status = aggregator.allocation_status("0xabc").await.unwrap().unwrap();
        assert_eq!(status.kind_a.allocated, Decimal::new(50, 0));
        assert_eq!(status.kind_a.claimed, Decimal::new(50, 0));
        assert_eq!(status.kind_a.remaining, Decimal::ZERO);
        assert!(!status.kind_a.can_claim);

        // Kind B has a zero allocation: nothing to claim either
        assert_eq!(status.kind_b.allocated, Decimal::ZERO);
        assert!(!status.kind_b.can_claim);
    }

    #[tokio::test]
    async fn test_allocation_status_unknown_wallet() {
        let aggregator = BalanceAggregator::new(Arc::new(MemoryStore::new()), registry());
        assert!(aggregator
            .allocation_status("0xdef")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_allocation_status_never_negative() {
        // An over-claimed wallet (data anomaly) clamps remaining to zero
        let store = Arc::new(MemoryStore::new());
        let record = ClaimRecord::new(
            "0xabc",
            TokenKind::KindA,
            Decimal::new(80, 0),
            Decimal::ONE,
            "tx1",
            Utc::now(),
        );
        store.commit_claim(&record).await.unwrap();

        let aggregator = BalanceAggregator::new(store, registry());
        let status = aggregator.allocation_status("0xabc").await.unwrap().unwrap();
        assert_eq!(status.kind_a.claimed, Decimal::new(80, 0));
        assert_eq!(status.kind_a.remaining, Decimal::ZERO);
        assert!(!status.kind_a.can_claim);
    }
}
