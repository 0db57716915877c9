//! Claim storage backends.
//!
//! The [`ClaimStore`] trait is the ledger's storage contract. The one write
//! operation, [`ClaimStore::commit_claim`], is atomic: both uniqueness
//! checks, the record insert and the account increment happen inside a
//! single exclusive unit, so a constraint hit surfaces as a
//! [`crate::StoreError::Conflict`] and never leaves partial state behind.
//! Read operations run outside that unit and may observe momentarily stale
//! aggregates, but never a half-written record.

pub mod memory;
pub mod sled;

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::env;

use claim_core::{ClaimRecord, TokenKind, WalletAccount};

use crate::error::StoreResult;

/// Storage contract for the claim ledger
#[async_trait]
pub trait ClaimStore: Send + Sync {
    /// Atomically insert a record and fold it into the wallet account
    ///
    /// Rejects with `Conflict` if the transaction reference or the
    /// (wallet, kind) pair already has a record; the existing record is
    /// left untouched. Returns the post-commit account.
    async fn commit_claim(&self, record: &ClaimRecord) -> StoreResult<WalletAccount>;

    /// Fetch a record by claim id
    async fn get_claim(&self, claim_id: &str) -> StoreResult<Option<ClaimRecord>>;

    /// Fetch a record by transaction reference
    async fn get_claim_by_reference(&self, reference: &str) -> StoreResult<Option<ClaimRecord>>;

    /// Fetch the record for a (wallet, kind) pair
    async fn get_claim_for_pair(
        &self,
        wallet: &str,
        kind: TokenKind,
    ) -> StoreResult<Option<ClaimRecord>>;

    /// All records for a wallet
    async fn claims_for_wallet(&self, wallet: &str) -> StoreResult<Vec<ClaimRecord>>;

    /// Fetch the aggregate account for a wallet
    async fn get_account(&self, wallet: &str) -> StoreResult<Option<WalletAccount>>;

    /// Most recently created records, newest first
    async fn recent_claims(&self, limit: usize) -> StoreResult<Vec<ClaimRecord>>;

    /// Store-wide totals
    async fn stats(&self) -> StoreResult<StoreStats>;
}

/// Store-wide aggregate totals
#[derive(Debug, Clone, Default)]
pub struct StoreStats {
    /// Number of wallet accounts
    pub wallet_count: u64,
    /// Number of claim records
    pub claim_count: u64,
    /// Total claimed amount of kind A
    pub total_kind_a: Decimal,
    /// Total claimed amount of kind B
    pub total_kind_b: Decimal,
    /// Total derived units
    pub total_derived: Decimal,
}

/// Storage configuration
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Data directory for the persistent backend
    pub data_dir: String,
    /// Cache size in bytes
    pub cache_size: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: "./claim_data".to_string(),
            cache_size: 64 * 1024 * 1024,
        }
    }
}

impl StorageConfig {
    /// Load configuration from environment variables
    ///
    /// - `CLAIM_DATA_DIR`: data directory
    /// - `CLAIM_STORE_CACHE_SIZE`: cache size in bytes
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            data_dir: env::var("CLAIM_DATA_DIR").unwrap_or(defaults.data_dir),
            cache_size: env::var("CLAIM_STORE_CACHE_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.cache_size),
        }
    }
}

/// Key for the (wallet, kind) uniqueness index
pub(crate) fn pair_key(wallet: &str, kind: TokenKind) -> String {
    format!("{}::{}", wallet, kind)
}

pub use self::sled::SledStore;
pub use memory::MemoryStore;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_key_distinguishes_kinds() {
        assert_ne!(
            pair_key("0xabc", TokenKind::KindA),
            pair_key("0xabc", TokenKind::KindB)
        );
        assert_eq!(pair_key("0xabc", TokenKind::KindA), "0xabc::kindA");
    }

    #[test]
    fn test_storage_config_defaults() {
        let config = StorageConfig::default();
        assert_eq!(config.data_dir, "./claim_data");
        assert_eq!(config.cache_size, 64 * 1024 * 1024);
    }
}
