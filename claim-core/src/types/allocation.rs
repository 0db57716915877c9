//! Allocation entries and the immutable allocation table.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::common::{normalize_address, TokenKind};

/// Entitlement of a single wallet, per token kind
///
/// Immutable once loaded; the table is only ever replaced wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationEntry {
    /// Wallet address (lowercase)
    pub wallet_address: String,
    /// Entitled amount of kind A
    pub kind_a: Decimal,
    /// Entitled amount of kind B
    pub kind_b: Decimal,
}

impl AllocationEntry {
    /// Create an entry, canonicalizing the address
    pub fn new(wallet_address: impl Into<String>, kind_a: Decimal, kind_b: Decimal) -> Self {
        Self {
            wallet_address: normalize_address(&wallet_address.into()),
            kind_a,
            kind_b,
        }
    }

    /// Entitled amount for the given kind
    pub fn amount_for(&self, kind: TokenKind) -> Decimal {
        match kind {
            TokenKind::KindA => self.kind_a,
            TokenKind::KindB => self.kind_b,
        }
    }
}

/// Address-keyed snapshot of all allocation entries
#[derive(Debug, Clone, Default)]
pub struct AllocationTable {
    entries: HashMap<String, AllocationEntry>,
}

impl AllocationTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry; a later entry for the same address replaces the earlier one
    pub fn insert(&mut self, entry: AllocationEntry) {
        self.entries.insert(entry.wallet_address.clone(), entry);
    }

    /// Full entry for an address, if registered
    pub fn get(&self, address: &str) -> Option<&AllocationEntry> {
        self.entries.get(&normalize_address(address))
    }

    /// Entitled amount for an (address, kind) pair, if registered
    pub fn lookup(&self, address: &str, kind: TokenKind) -> Option<Decimal> {
        self.get(address).map(|e| e.amount_for(kind))
    }

    /// Number of registered wallets
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
