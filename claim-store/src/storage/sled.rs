//! Sled persistent storage implementation.
//!
//! Both uniqueness invariants are enforced inside a single serializable
//! multi-tree transaction: the index probes, the record insert and the
//! account increment either all commit or all roll back, and a probe hit
//! aborts the transaction with the existing claim id, which is translated
//! into the matching conflict error. A pre-check outside the transaction
//! would not be enough; two concurrent submits could both pass it.

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use sled::transaction::{ConflictableTransactionError, TransactionError};
use sled::Transactional;
use std::path::Path;

use claim_core::{ClaimRecord, ConflictError, TokenKind, WalletAccount};

use super::{pair_key, ClaimStore, StorageConfig, StoreStats};
use crate::error::{StoreError, StoreResult};

const CLAIMS_TREE: &str = "claims";
const REFERENCES_TREE: &str = "references";
const PAIRS_TREE: &str = "pairs";
const ACCOUNTS_TREE: &str = "accounts";

/// Reason a commit transaction aborted
#[derive(Debug)]
enum CommitAbort {
    DuplicateReference(String),
    PairClaimed(String),
    Codec(String),
}

/// Sled-backed claim store
#[derive(Debug, Clone)]
pub struct SledStore {
    db: sled::Db,
    claims: sled::Tree,
    references: sled::Tree,
    pairs: sled::Tree,
    accounts: sled::Tree,
}

impl SledStore {
    /// Open a store with the given configuration
    pub fn new(config: &StorageConfig) -> StoreResult<Self> {
        let db = sled::Config::new()
            .path(&config.data_dir)
            .cache_capacity(config.cache_size)
            .open()
            .map_err(|e| StoreError::Storage(format!("Failed to open sled db: {}", e)))?;
        Self::from_db(db)
    }

    /// Open or create a store at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let db = sled::open(path)
            .map_err(|e| StoreError::Storage(format!("Failed to open sled db: {}", e)))?;
        Self::from_db(db)
    }

    fn from_db(db: sled::Db) -> StoreResult<Self> {
        let open_tree = |name: &str| {
            db.open_tree(name)
                .map_err(|e| StoreError::Storage(format!("Failed to open {} tree: {}", name, e)))
        };
        let claims = open_tree(CLAIMS_TREE)?;
        let references = open_tree(REFERENCES_TREE)?;
        let pairs = open_tree(PAIRS_TREE)?;
        let accounts = open_tree(ACCOUNTS_TREE)?;

        Ok(Self {
            db,
            claims,
            references,
            pairs,
            accounts,
        })
    }

    /// Flush dirty buffers to disk
    pub fn flush(&self) -> StoreResult<()> {
        self.db
            .flush()
            .map_err(|e| StoreError::Storage(format!("Failed to flush db: {}", e)))?;
        Ok(())
    }

    fn serialize<T: Serialize>(value: &T) -> StoreResult<Vec<u8>> {
        serde_json::to_vec(value).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    fn deserialize<T: DeserializeOwned>(bytes: &[u8]) -> StoreResult<T> {
        serde_json::from_slice(bytes).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    fn claim_by_id(&self, claim_id: &str) -> StoreResult<Option<ClaimRecord>> {
        match self
            .claims
            .get(claim_id.as_bytes())
            .map_err(|e| StoreError::Storage(format!("Failed to get claim: {}", e)))?
        {
            Some(bytes) => Ok(Some(Self::deserialize(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Build the conflict error for an abort, reading the surviving record
    fn conflict_for(&self, record: &ClaimRecord, abort: CommitAbort) -> StoreError {
        match abort {
            CommitAbort::DuplicateReference(existing_id) => match self.claim_by_id(&existing_id) {
                Ok(Some(existing)) => ConflictError::DuplicateTransaction {
                    reference: record.transaction_reference.clone(),
                    existing_claim_id: existing.claim_id,
                    claimed_at: existing.created_at,
                }
                .into(),
                Ok(None) => {
                    StoreError::Storage(format!("dangling reference index entry {}", existing_id))
                }
                Err(e) => e,
            },
            CommitAbort::PairClaimed(existing_id) => match self.claim_by_id(&existing_id) {
                Ok(Some(existing)) => ConflictError::AlreadyClaimed {
                    wallet: record.wallet_address.clone(),
                    kind: record.token_kind,
                    existing_claim_id: existing.claim_id,
                    claimed_at: existing.created_at,
                }
                .into(),
                Ok(None) => {
                    StoreError::Storage(format!("dangling pair index entry {}", existing_id))
                }
                Err(e) => e,
            },
            CommitAbort::Codec(reason) => StoreError::Serialization(reason),
        }
    }
}

fn abort_codec<E: std::fmt::Display>(e: E) -> ConflictableTransactionError<CommitAbort> {
    ConflictableTransactionError::Abort(CommitAbort::Codec(e.to_string()))
}

#[async_trait]
impl ClaimStore for SledStore {
    async fn commit_claim(&self, record: &ClaimRecord) -> StoreResult<WalletAccount> {
        let pair = pair_key(&record.wallet_address, record.token_kind);

        let result = (&self.claims, &self.references, &self.pairs, &self.accounts)
            .transaction(|(claims, references, pairs, accounts)| {
                if let Some(existing) = references.get(record.transaction_reference.as_bytes())? {
                    let existing_id = String::from_utf8_lossy(&existing).to_string();
                    return Err(ConflictableTransactionError::Abort(
                        CommitAbort::DuplicateReference(existing_id),
                    ));
                }

                if let Some(existing) = pairs.get(pair.as_bytes())? {
                    let existing_id = String::from_utf8_lossy(&existing).to_string();
                    return Err(ConflictableTransactionError::Abort(CommitAbort::PairClaimed(
                        existing_id,
                    )));
                }

                let record_bytes = serde_json::to_vec(record).map_err(abort_codec)?;
                claims.insert(record.claim_id.as_bytes(), record_bytes)?;
                references.insert(
                    record.transaction_reference.as_bytes(),
                    record.claim_id.as_bytes(),
                )?;
                pairs.insert(pair.as_bytes(), record.claim_id.as_bytes())?;

                let mut account = match accounts.get(record.wallet_address.as_bytes())? {
                    Some(bytes) => serde_json::from_slice(&bytes).map_err(abort_codec)?,
                    None => WalletAccount::new(&record.wallet_address, record.timestamp),
                };
                account.apply_claim(record);
                let account_bytes = serde_json::to_vec(&account).map_err(abort_codec)?;
                accounts.insert(record.wallet_address.as_bytes(), account_bytes)?;

                Ok(account)
            });

        match result {
            Ok(account) => Ok(account),
            Err(TransactionError::Abort(abort)) => Err(self.conflict_for(record, abort)),
            Err(TransactionError::Storage(e)) => {
                Err(StoreError::Storage(format!("Claim transaction failed: {}", e)))
            }
        }
    }

    async fn get_claim(&self, claim_id: &str) -> StoreResult<Option<ClaimRecord>> {
        self.claim_by_id(claim_id)
    }

    async fn get_claim_by_reference(&self, reference: &str) -> StoreResult<Option<ClaimRecord>> {
        match self
            .references
            .get(reference.as_bytes())
            .map_err(|e| StoreError::Storage(format!("Failed to get reference index: {}", e)))?
        {
            Some(id) => self.claim_by_id(&String::from_utf8_lossy(&id)),
            None => Ok(None),
        }
    }

    async fn get_claim_for_pair(
        &self,
        wallet: &str,
        kind: TokenKind,
    ) -> StoreResult<Option<ClaimRecord>> {
        match self
            .pairs
            .get(pair_key(wallet, kind).as_bytes())
            .map_err(|e| StoreError::Storage(format!("Failed to get pair index: {}", e)))?
        {
            Some(id) => self.claim_by_id(&String::from_utf8_lossy(&id)),
            None => Ok(None),
        }
    }

    async fn claims_for_wallet(&self, wallet: &str) -> StoreResult<Vec<ClaimRecord>> {
        let mut claims = Vec::new();
        for item in self.claims.iter() {
            let (_, value) =
                item.map_err(|e| StoreError::Storage(format!("Failed to iterate claims: {}", e)))?;
            let claim: ClaimRecord = Self::deserialize(&value)?;
            if claim.wallet_address == wallet {
                claims.push(claim);
            }
        }
        Ok(claims)
    }

    async fn get_account(&self, wallet: &str) -> StoreResult<Option<WalletAccount>> {
        match self
            .accounts
            .get(wallet.as_bytes())
            .map_err(|e| StoreError::Storage(format!("Failed to get account: {}", e)))?
        {
            Some(bytes) => Ok(Some(Self::deserialize(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn recent_claims(&self, limit: usize) -> StoreResult<Vec<ClaimRecord>> {
        let mut claims = Vec::new();
        for item in self.claims.iter() {
            let (_, value) =
                item.map_err(|e| StoreError::Storage(format!("Failed to iterate claims: {}", e)))?;
            claims.push(Self::deserialize::<ClaimRecord>(&value)?);
        }
        claims.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        claims.truncate(limit);
        Ok(claims)
    }

    async fn stats(&self) -> StoreResult<StoreStats> {
        let mut stats = StoreStats {
            wallet_count: self.accounts.len() as u64,
            ..Default::default()
        };
        for item in self.claims.iter() {
            let (_, value) =
                item.map_err(|e| StoreError::Storage(format!("Failed to iterate claims: {}", e)))?;
            let claim: ClaimRecord = Self::deserialize(&value)?;
            stats.claim_count += 1;
            match claim.token_kind {
                TokenKind::KindA => stats.total_kind_a += claim.amount,
                TokenKind::KindB => stats.total_kind_b += claim.amount,
            }
            stats.total_derived += claim.derived_amount;
        }
        Ok(stats)
    }
}
