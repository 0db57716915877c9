//! Claim Store
//!
//! Transactional persistence and aggregation for the claim service:
//!
//! - [`storage::ClaimStore`] — storage contract with an atomic commit
//!   operation backing both uniqueness invariants.
//! - [`storage::MemoryStore`] / [`storage::SledStore`] — in-memory and
//!   sled-backed implementations.
//! - [`ledger::ClaimLedger`] — exactly-once claim submission.
//! - [`aggregator::BalanceAggregator`] — wallet summaries, global stats,
//!   allocation status.

pub mod aggregator;
pub mod error;
pub mod ledger;
pub mod storage;

pub use aggregator::{
    AllocationStatus, BalanceAggregator, GlobalStats, KindAllocationStatus, WalletSummary,
};
pub use error::{StoreError, StoreResult};
pub use ledger::{ClaimLedger, SubmittedClaim};
pub use storage::{ClaimStore, MemoryStore, SledStore, StorageConfig, StoreStats};
