//! The claim ledger: exactly-once claim submission.

use std::sync::Arc;
use tracing::{info, warn};

use claim_core::logging::operations;
use claim_core::{ClaimError, ClaimRecord, ClaimResult, NormalizedClaim, WalletAccount};

use crate::error::StoreError;
use crate::storage::ClaimStore;

/// Outcome of a successful submission: the committed record and the
/// post-commit wallet account
#[derive(Debug, Clone)]
pub struct SubmittedClaim {
    /// The committed record
    pub record: ClaimRecord,
    /// Wallet account after the increment
    pub account: WalletAccount,
}

/// Transactional claim ledger
///
/// Turns a validated claim into a committed [`ClaimRecord`]. Uniqueness per
/// transaction reference and per (wallet, kind) pair is enforced by the
/// store's commit transaction; resubmitting an already-committed reference
/// is a no-op conflict carrying the original record's identity, so retries
/// are idempotent.
pub struct ClaimLedger {
    store: Arc<dyn ClaimStore>,
}

impl ClaimLedger {
    /// Create a ledger over the given store
    pub fn new(store: Arc<dyn ClaimStore>) -> Self {
        Self { store }
    }

    /// Submit a validated claim
    pub async fn submit(&self, claim: NormalizedClaim) -> ClaimResult<SubmittedClaim> {
        let record = ClaimRecord::new(
            claim.wallet_address,
            claim.token_kind,
            claim.amount,
            claim.conversion_rate,
            claim.transaction_reference,
            claim.timestamp,
        );

        match self.store.commit_claim(&record).await {
            Ok(account) => {
                info!(
                    operation = operations::CLAIM_SUBMIT,
                    claim_id = %record.claim_id,
                    wallet = %record.wallet_address,
                    kind = %record.token_kind,
                    reference = %record.transaction_reference,
                    amount = %record.amount,
                    derived = %record.derived_amount,
                    "Claim committed"
                );
                Ok(SubmittedClaim { record, account })
            }
            Err(StoreError::Conflict(conflict)) => {
                warn!(
                    operation = operations::CLAIM_CONFLICT,
                    wallet = %record.wallet_address,
                    reference = %record.transaction_reference,
                    existing_claim_id = conflict.existing_claim_id(),
                    code = conflict.code(),
                    "Claim rejected as conflict"
                );
                Err(ClaimError::Conflict(conflict))
            }
            Err(other) => {
                tracing::error!(
                    operation = operations::CLAIM_SUBMIT,
                    wallet = %record.wallet_address,
                    reference = %record.transaction_reference,
                    error = %other,
                    "Claim transaction failed"
                );
                Err(ClaimError::Internal(other.to_string()))
            }
        }
    }

    /// Fetch a committed record by claim id
    pub async fn get_claim(&self, claim_id: &str) -> ClaimResult<Option<ClaimRecord>> {
        Ok(self.store.get_claim(claim_id).await?)
    }

    /// Fetch a committed record by transaction reference
    pub async fn get_claim_by_reference(
        &self,
        reference: &str,
    ) -> ClaimResult<Option<ClaimRecord>> {
        Ok(self.store.get_claim_by_reference(reference).await?)
    }

    /// The underlying store
    pub fn store(&self) -> &Arc<dyn ClaimStore> {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use claim_core::{ConflictError, TokenKind};
    use rust_decimal::Decimal;

    use crate::storage::MemoryStore;

    fn claim(wallet: &str, kind: TokenKind, reference: &str, amount: i64) -> NormalizedClaim {
        NormalizedClaim {
            wallet_address: wallet.to_string(),
            token_kind: kind,
            amount: Decimal::new(amount, 0),
            conversion_rate: Decimal::new(2, 0),
            transaction_reference: reference.to_string(),
            timestamp: Utc::now(),
        }
    }

    fn ledger() -> ClaimLedger {
        ClaimLedger::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn test_submit_success() {
        let ledger = ledger();
        let submitted = ledger
            .submit(claim("0xabc", TokenKind::KindA, "tx1", 50))
            .await
            .unwrap();

        assert_eq!(submitted.record.derived_amount, Decimal::new(100, 0));
        assert_eq!(submitted.account.claimed_kind_a, Decimal::new(50, 0));
        assert_eq!(submitted.account.claim_count, 1);

        let loaded = ledger
            .get_claim(&submitted.record.claim_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded, submitted.record);
    }

    #[tokio::test]
    async fn test_resubmission_is_idempotent_conflict() {
        let ledger = ledger();
        let first = ledger
            .submit(claim("0xabc", TokenKind::KindA, "tx1", 50))
            .await
            .unwrap();

        // Identical reference, even with a different payload, points back at
        // the original record and writes nothing
        match ledger
            .submit(claim("0xother", TokenKind::KindB, "tx1", 99))
            .await
        {
            Err(ClaimError::Conflict(ConflictError::DuplicateTransaction {
                existing_claim_id,
                ..
            })) => assert_eq!(existing_claim_id, first.record.claim_id),
            other => panic!("expected DuplicateTransaction, got {:?}", other),
        }

        let stats = ledger.store().stats().await.unwrap();
        assert_eq!(stats.claim_count, 1);
        assert_eq!(stats.total_kind_a, Decimal::new(50, 0));
    }

    #[tokio::test]
    async fn test_one_claim_per_pair() {
        let ledger = ledger();
        let first = ledger
            .submit(claim("0xabc", TokenKind::KindA, "tx1", 50))
            .await
            .unwrap();

        match ledger
            .submit(claim("0xabc", TokenKind::KindA, "tx2", 50))
            .await
        {
            Err(ClaimError::Conflict(ConflictError::AlreadyClaimed {
                existing_claim_id, ..
            })) => assert_eq!(existing_claim_id, first.record.claim_id),
            other => panic!("expected AlreadyClaimed, got {:?}", other),
        }

        assert_eq!(ledger.store().stats().await.unwrap().claim_count, 1);
    }

    #[tokio::test]
    async fn test_concurrent_submits_same_reference() {
        let ledger = Arc::new(ledger());

        let mut handles = Vec::new();
        for i in 0..10 {
            let ledger = ledger.clone();
            handles.push(tokio::spawn(async move {
                ledger
                    .submit(claim(&format!("0x{:03}", i), TokenKind::KindA, "tx-race", 50))
                    .await
            }));
        }

        let mut ok = 0;
        let mut duplicates = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => ok += 1,
                Err(ClaimError::Conflict(ConflictError::DuplicateTransaction { .. })) => {
                    duplicates += 1
                }
                other => panic!("unexpected outcome {:?}", other),
            }
        }

        assert_eq!(ok, 1);
        assert_eq!(duplicates, 9);
        assert_eq!(ledger.store().stats().await.unwrap().claim_count, 1);
    }
}
