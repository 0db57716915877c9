//! Shared base types for the claim service.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Token kind a claim can target
///
/// Exactly two kinds exist; the wire names are `kindA` and `kindB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TokenKind {
    /// First token kind
    KindA,
    /// Second token kind
    KindB,
}

impl TokenKind {
    /// Both kinds, in declaration order
    pub const ALL: [TokenKind; 2] = [TokenKind::KindA, TokenKind::KindB];

    /// Parse from a wire string (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "kinda" | "kind_a" => Some(Self::KindA),
            "kindb" | "kind_b" => Some(Self::KindB),
            _ => None,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KindA => write!(f, "kindA"),
            Self::KindB => write!(f, "kindB"),
        }
    }
}

/// Absolute tolerance for matching a claimed amount against its allocation
pub fn allocation_tolerance() -> Decimal {
    Decimal::new(1, 2) // 0.01
}

/// Canonicalize a wallet address for case-insensitive matching
pub fn normalize_address(address: &str) -> String {
    address.trim().to_lowercase()
}

/// Generate a claim identifier
///
/// Time-based millisecond prefix plus a random hex suffix. The suffix is
/// derived from a digest over the nanosecond clock, process id and thread
/// id, so concurrent generators cannot collide on the prefix alone.
pub fn generate_claim_id() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();

    let mut hasher = Sha256::new();
    hasher.update(now.as_nanos().to_le_bytes());
    hasher.update(std::process::id().to_le_bytes());
    let thread_id = format!("{:?}", std::thread::current().id());
    hasher.update(thread_id.as_bytes());
    let digest = hasher.finalize();

    format!("clm_{}_{}", now.as_millis(), hex::encode(&digest[..6]))
}
