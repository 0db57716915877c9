//! Allocation registry: load, snapshot, reload.
//!
//! The registry owns an immutable [`AllocationTable`] snapshot behind a
//! lock. Lookups clone the `Arc`, so readers never block a reload; a reload
//! parses the source fully before swapping the snapshot in one step.
//! Entries are never mutated in place.

use parking_lot::RwLock;
use rust_decimal::Decimal;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

use crate::types::{AllocationEntry, AllocationTable, TokenKind};

/// Allocation source errors, reported to the caller
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Failed to read allocation source: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed allocation row at line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("Registry has no source to reload from")]
    NoSource,
}

/// Result alias for registry operations
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Immutable, reloadable allocation lookup
pub struct AllocationRegistry {
    table: RwLock<Arc<AllocationTable>>,
    source: Option<PathBuf>,
}

impl AllocationRegistry {
    /// Create a registry with no entries and no source
    ///
    /// Every lookup reports "absent", which downstream maps to an
    /// authorization failure rather than a crash.
    pub fn empty() -> Self {
        Self {
            table: RwLock::new(Arc::new(AllocationTable::new())),
            source: None,
        }
    }

    /// Create a registry from an already-built table (no reload source)
    pub fn from_table(table: AllocationTable) -> Self {
        Self {
            table: RwLock::new(Arc::new(table)),
            source: None,
        }
    }

    /// Load a registry from a CSV file
    ///
    /// Row format: `address,kind_a,kind_b`. An initial `address,...` header
    /// row is detected and skipped; blank lines are ignored; a later row for
    /// an address replaces the earlier one.
    pub fn load(path: impl AsRef<Path>) -> RegistryResult<Self> {
        let path = path.as_ref();
        let table = parse_allocations(BufReader::new(File::open(path)?))?;

        tracing::info!(
            operation = crate::logging::operations::REGISTRY_LOAD,
            source = %path.display(),
            count = table.len(),
            "Allocation table loaded"
        );

        Ok(Self {
            table: RwLock::new(Arc::new(table)),
            source: Some(path.to_path_buf()),
        })
    }

    /// Re-read the original source and atomically swap the snapshot
    ///
    /// Idempotent; on failure the previous snapshot stays in place.
    pub fn reload(&self) -> RegistryResult<usize> {
        let path = self.source.as_ref().ok_or(RegistryError::NoSource)?;
        let table = parse_allocations(BufReader::new(File::open(path)?))?;
        let count = table.len();

        *self.table.write() = Arc::new(table);

        tracing::info!(
            operation = crate::logging::operations::REGISTRY_RELOAD,
            source = %path.display(),
            count,
            "Allocation table reloaded"
        );
        Ok(count)
    }

    /// Current snapshot; safe to hold across a concurrent reload
    pub fn snapshot(&self) -> Arc<AllocationTable> {
        self.table.read().clone()
    }

    /// Entitled amount for an (address, kind) pair, if registered
    pub fn lookup(&self, address: &str, kind: TokenKind) -> Option<Decimal> {
        self.snapshot().lookup(address, kind)
    }

    /// Number of registered wallets in the current snapshot
    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    /// Whether the current snapshot has no entries
    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }
}

/// Parse an allocation table from CSV rows
pub fn parse_allocations<R: BufRead>(reader: R) -> RegistryResult<AllocationTable> {
    let mut table = AllocationTable::new();
    let mut saw_row = false;

    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let line = line?;
        let row = line.trim();
        if row.is_empty() {
            continue;
        }

        let fields: Vec<&str> = row.split(',').map(str::trim).collect();
        if !saw_row && fields.first().map(|f| f.eq_ignore_ascii_case("address")) == Some(true) {
            saw_row = true;
            continue;
        }
        saw_row = true;

        if fields.len() != 3 {
            return Err(RegistryError::Parse {
                line: line_no,
                reason: format!("expected 3 columns, found {}", fields.len()),
            });
        }

        let kind_a = parse_amount(fields[1], line_no)?;
        let kind_b = parse_amount(fields[2], line_no)?;
        table.insert(AllocationEntry::new(fields[0], kind_a, kind_b));
    }

    Ok(table)
}

fn parse_amount(field: &str, line: usize) -> RegistryResult<Decimal> {
    let amount = Decimal::from_str(field).map_err(|_| RegistryError::Parse {
        line,
        reason: format!("invalid amount {:?}", field),
    })?;
    if amount < Decimal::ZERO {
        return Err(RegistryError::Parse {
            line,
            reason: format!("negative allocation {:?}", field),
        });
    }
    Ok(amount)
}
