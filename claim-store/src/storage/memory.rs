//! In-memory storage implementation, for tests and development.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use claim_core::{ClaimRecord, ConflictError, TokenKind, WalletAccount};

use super::{pair_key, ClaimStore, StoreStats};
use crate::error::{StoreError, StoreResult};

#[derive(Debug, Default)]
struct MemoryInner {
    claims: HashMap<String, ClaimRecord>,
    reference_index: HashMap<String, String>,
    pair_index: HashMap<String, String>,
    accounts: HashMap<String, WalletAccount>,
    // claim ids in commit order, for recent_claims
    order: Vec<String>,
}

/// In-memory claim store
///
/// The commit path takes the single writer lock for its whole duration, so
/// both uniqueness checks and the account increment are serialized with
/// respect to every other commit.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<MemoryInner>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all data
    pub async fn clear(&self) {
        let mut inner = self.inner.write().await;
        inner.claims.clear();
        inner.reference_index.clear();
        inner.pair_index.clear();
        inner.accounts.clear();
        inner.order.clear();
    }
}

#[async_trait]
impl ClaimStore for MemoryStore {
    async fn commit_claim(&self, record: &ClaimRecord) -> StoreResult<WalletAccount> {
        let mut inner = self.inner.write().await;

        if let Some(existing_id) = inner.reference_index.get(&record.transaction_reference) {
            let existing = inner.claims.get(existing_id).ok_or_else(|| {
                StoreError::Storage(format!("dangling reference index entry {}", existing_id))
            })?;
            return Err(ConflictError::DuplicateTransaction {
                reference: record.transaction_reference.clone(),
                existing_claim_id: existing.claim_id.clone(),
                claimed_at: existing.created_at,
            }
            .into());
        }

        let pair = pair_key(&record.wallet_address, record.token_kind);
        if let Some(existing_id) = inner.pair_index.get(&pair) {
            let existing = inner.claims.get(existing_id).ok_or_else(|| {
                StoreError::Storage(format!("dangling pair index entry {}", existing_id))
            })?;
            return Err(ConflictError::AlreadyClaimed {
                wallet: record.wallet_address.clone(),
                kind: record.token_kind,
                existing_claim_id: existing.claim_id.clone(),
                claimed_at: existing.created_at,
            }
            .into());
        }

        inner
            .claims
            .insert(record.claim_id.clone(), record.clone());
        inner
            .reference_index
            .insert(record.transaction_reference.clone(), record.claim_id.clone());
        inner.pair_index.insert(pair, record.claim_id.clone());
        inner.order.push(record.claim_id.clone());

        let account = inner
            .accounts
            .entry(record.wallet_address.clone())
            .or_insert_with(|| WalletAccount::new(&record.wallet_address, record.timestamp));
        account.apply_claim(record);

        Ok(account.clone())
    }

    async fn get_claim(&self, claim_id: &str) -> StoreResult<Option<ClaimRecord>> {
        let inner = self.inner.read().await;
        Ok(inner.claims.get(claim_id).cloned())
    }

    async fn get_claim_by_reference(&self, reference: &str) -> StoreResult<Option<ClaimRecord>> {
        let inner = self.inner.read().await;
        Ok(inner
            .reference_index
            .get(reference)
            .and_then(|id| inner.claims.get(id))
            .cloned())
    }

    async fn get_claim_for_pair(
        &self,
        wallet: &str,
        kind: TokenKind,
    ) -> StoreResult<Option<ClaimRecord>> {
        let inner = self.inner.read().await;
        Ok(inner
            .pair_index
            .get(&pair_key(wallet, kind))
            .and_then(|id| inner.claims.get(id))
            .cloned())
    }

    async fn claims_for_wallet(&self, wallet: &str) -> StoreResult<Vec<ClaimRecord>> {
        let inner = self.inner.read().await;
        Ok(inner
            .claims
            .values()
            .filter(|c| c.wallet_address == wallet)
            .cloned()
            .collect())
    }

    async fn get_account(&self, wallet: &str) -> StoreResult<Option<WalletAccount>> {
        let inner = self.inner.read().await;
        Ok(inner.accounts.get(wallet).cloned())
    }

    async fn recent_claims(&self, limit: usize) -> StoreResult<Vec<ClaimRecord>> {
        let inner = self.inner.read().await;
        Ok(inner
            .order
            .iter()
            .rev()
            .take(limit)
            .filter_map(|id| inner.claims.get(id))
            .cloned()
            .collect())
    }

    async fn stats(&self) -> StoreResult<StoreStats> {
        let inner = self.inner.read().await;
        let mut stats = StoreStats {
            wallet_count: inner.accounts.len() as u64,
            claim_count: inner.claims.len() as u64,
            ..Default::default()
        };
        for claim in inner.claims.values() {
            match claim.token_kind {
                TokenKind::KindA => stats.total_kind_a += claim.amount,
                TokenKind::KindB => stats.total_kind_b += claim.amount,
            }
            stats.total_derived += claim.derived_amount;
        }
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn record(wallet: &str, kind: TokenKind, reference: &str) -> ClaimRecord {
        ClaimRecord::new(
            wallet,
            kind,
            Decimal::new(50, 0),
            Decimal::new(2, 0),
            reference,
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn test_commit_and_lookups() {
        let store = MemoryStore::new();
        let rec = record("0xabc", TokenKind::KindA, "tx1");

        let account = store.commit_claim(&rec).await.unwrap();
        assert_eq!(account.claim_count, 1);
        assert_eq!(account.claimed_kind_a, Decimal::new(50, 0));
        assert_eq!(account.total_derived, Decimal::new(100, 0));

        assert!(store.get_claim(&rec.claim_id).await.unwrap().is_some());
        assert!(store.get_claim_by_reference("tx1").await.unwrap().is_some());
        assert!(store
            .get_claim_for_pair("0xabc", TokenKind::KindA)
            .await
            .unwrap()
            .is_some());
        assert!(store
            .get_claim_for_pair("0xabc", TokenKind::KindB)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_duplicate_reference_conflict() {
        let store = MemoryStore::new();
        let first = record("0xabc", TokenKind::KindA, "tx1");
        store.commit_claim(&first).await.unwrap();

        // Same reference from a different wallet and kind still conflicts
        let second = record("0xdef", TokenKind::KindB, "tx1");
        match store.commit_claim(&second).await {
            Err(StoreError::Conflict(ConflictError::DuplicateTransaction {
                existing_claim_id,
                ..
            })) => assert_eq!(existing_claim_id, first.claim_id),
            other => panic!("expected DuplicateTransaction, got {:?}", other),
        }

        // Original record untouched, aggregate reflects one claim
        let stats = store.stats().await.unwrap();
        assert_eq!(stats.claim_count, 1);
        let account = store.get_account("0xabc").await.unwrap().unwrap();
        assert_eq!(account.claim_count, 1);
    }

    #[tokio::test]
    async fn test_pair_conflict() {
        let store = MemoryStore::new();
        let first = record("0xabc", TokenKind::KindA, "tx1");
        store.commit_claim(&first).await.unwrap();

        let second = record("0xabc", TokenKind::KindA, "tx2");
        match store.commit_claim(&second).await {
            Err(StoreError::Conflict(ConflictError::AlreadyClaimed {
                existing_claim_id, ..
            })) => assert_eq!(existing_claim_id, first.claim_id),
            other => panic!("expected AlreadyClaimed, got {:?}", other),
        }

        assert_eq!(store.stats().await.unwrap().claim_count, 1);
    }

    #[tokio::test]
    async fn test_concurrent_same_reference_commits_once() {
        use std::sync::Arc;

        let store = Arc::new(MemoryStore::new());
        let mut handles = Vec::new();
        for i in 0..8 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                // Distinct wallets so only the reference uniqueness can reject
                let rec = record(&format!("0x{:03}", i), TokenKind::KindA, "tx-race");
                store.commit_claim(&rec).await
            }));
        }

        let mut ok = 0;
        let mut conflicts = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => ok += 1,
                Err(StoreError::Conflict(ConflictError::DuplicateTransaction { .. })) => {
                    conflicts += 1
                }
                other => panic!("unexpected outcome {:?}", other),
            }
        }
        assert_eq!(ok, 1);
        assert_eq!(conflicts, 7);
        assert_eq!(store.stats().await.unwrap().claim_count, 1);
    }

    #[tokio::test]
    async fn test_recent_claims_newest_first() {
        let store = MemoryStore::new();
        let first = record("0xaaa", TokenKind::KindA, "tx1");
        let second = record("0xbbb", TokenKind::KindA, "tx2");
        store.commit_claim(&first).await.unwrap();
        store.commit_claim(&second).await.unwrap();

        let recent = store.recent_claims(1).await.unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].claim_id, second.claim_id);
    }

    #[tokio::test]
    async fn test_clear() {
        let store = MemoryStore::new();
        store
            .commit_claim(&record("0xabc", TokenKind::KindA, "tx1"))
            .await
            .unwrap();
        store.clear().await;
        assert_eq!(store.stats().await.unwrap().claim_count, 0);
    }
}
