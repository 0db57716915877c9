//! Domain types for the claim service.

pub mod allocation;
pub mod claim;
pub mod common;
pub mod wallet;

pub use allocation::{AllocationEntry, AllocationTable};
pub use claim::{ClaimRecord, ClaimStatus};
pub use common::{allocation_tolerance, generate_claim_id, normalize_address, TokenKind};
pub use wallet::WalletAccount;
