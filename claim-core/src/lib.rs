//! Claim Service Core
//!
//! Domain types and pure logic for the token claim service:
//!
//! - **Types**: token kinds, claim records, wallet accounts, allocation
//!   entries, all amounts as `rust_decimal::Decimal`.
//! - **Validator**: pure request validation and normalization against the
//!   current allocation snapshot.
//! - **Registry**: immutable allocation table with atomic reload.
//! - **Errors**: closed taxonomy (validation / authorization / conflict /
//!   internal) with stable discriminators.
//!
//! Storage and transport live in the `claim-store` and `claim-api` crates.

pub mod error;
pub mod logging;
pub mod registry;
pub mod types;
pub mod validator;

pub use error::{
    AuthorizationError, ClaimError, ClaimResult, ConflictError, ValidationError,
};
pub use registry::{parse_allocations, AllocationRegistry, RegistryError, RegistryResult};
pub use types::{
    allocation_tolerance, generate_claim_id, normalize_address, AllocationEntry,
    AllocationTable, ClaimRecord, ClaimStatus, TokenKind, WalletAccount,
};
pub use validator::{validate, NormalizedClaim, RawClaimRequest};
