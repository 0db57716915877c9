//! Claim request validation.
//!
//! Pure and side-effect free: a raw request either normalizes into a
//! [`NormalizedClaim`] or is rejected with the first applicable error, in a
//! fixed order (shape, token kind, amount, rate, allocation lookup,
//! allocation match).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{AuthorizationError, ClaimResult, ValidationError};
use crate::types::{allocation_tolerance, normalize_address, AllocationTable, TokenKind};

/// Claim request as received from the transport layer, untrusted
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawClaimRequest {
    /// Token kind name
    pub token_kind: Option<String>,
    /// Claimed amount
    pub amount: Option<String>,
    /// Externally supplied transaction reference
    pub transaction_reference: Option<String>,
    /// Claiming wallet address
    pub wallet_address: Option<String>,
    /// Optional claim timestamp (RFC 3339)
    pub timestamp: Option<String>,
    /// Optional conversion rate; defaults to 1
    pub conversion_rate: Option<String>,
}

/// Validated and canonicalized claim request
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedClaim {
    /// Wallet address, lowercase
    pub wallet_address: String,
    /// Token kind
    pub token_kind: TokenKind,
    /// Claimed amount, positive
    pub amount: Decimal,
    /// Conversion rate, positive
    pub conversion_rate: Decimal,
    /// Transaction reference, trimmed
    pub transaction_reference: String,
    /// Claim timestamp, caller-supplied or assigned at validation time
    pub timestamp: DateTime<Utc>,
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Validate a raw request against the current allocation snapshot
///
/// First failure wins; nothing past the failing step is evaluated. The
/// allocation lookup is a read of the immutable snapshot passed in, so the
/// whole function stays free of I/O.
pub fn validate(
    raw: &RawClaimRequest,
    allocations: &AllocationTable,
) -> ClaimResult<NormalizedClaim> {
    let mut missing = Vec::new();
    if present(&raw.token_kind).is_none() {
        missing.push("tokenKind".to_string());
    }
    if present(&raw.amount).is_none() {
        missing.push("amount".to_string());
    }
    if present(&raw.transaction_reference).is_none() {
        missing.push("transactionReference".to_string());
    }
    if present(&raw.wallet_address).is_none() {
        missing.push("walletAddress".to_string());
    }
    if !missing.is_empty() {
        return Err(ValidationError::MissingFields { missing }.into());
    }

    let kind_str = present(&raw.token_kind).unwrap_or_default();
    let token_kind = TokenKind::parse(kind_str).ok_or_else(|| ValidationError::InvalidTokenKind {
        provided: kind_str.to_string(),
    })?;

    let amount_str = present(&raw.amount).unwrap_or_default();
    let amount = Decimal::from_str(amount_str)
        .ok()
        .filter(|a| *a > Decimal::ZERO)
        .ok_or_else(|| ValidationError::InvalidAmount {
            provided: amount_str.to_string(),
        })?;

    let conversion_rate = match present(&raw.conversion_rate) {
        None => Decimal::ONE,
        Some(rate_str) => Decimal::from_str(rate_str)
            .ok()
            .filter(|r| *r > Decimal::ZERO)
            .ok_or_else(|| ValidationError::InvalidRate {
                provided: rate_str.to_string(),
            })?,
    };

    let wallet_address = normalize_address(present(&raw.wallet_address).unwrap_or_default());
    let allocated = allocations
        .lookup(&wallet_address, token_kind)
        .ok_or_else(|| AuthorizationError::UnknownWallet {
            wallet: wallet_address.clone(),
            kind: token_kind,
        })?;

    if (amount - allocated).abs() > allocation_tolerance() {
        return Err(AuthorizationError::AllocationMismatch {
            wallet: wallet_address,
            kind: token_kind,
            expected: allocated,
            provided: amount,
        }
        .into());
    }

    // A timestamp that fails to parse is treated as absent; the reference
    // itself is trusted as given.
    let timestamp = present(&raw.timestamp)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|t| t.with_timezone(&Utc))
        .unwrap_or_else(Utc::now);

    Ok(NormalizedClaim {
        wallet_address,
        token_kind,
        amount,
        conversion_rate,
        transaction_reference: present(&raw.transaction_reference)
            .unwrap_or_default()
            .to_string(),
        timestamp,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClaimError;
    use crate::types::AllocationEntry;

    fn table() -> AllocationTable {
        let mut table = AllocationTable::new();
        table.insert(AllocationEntry::new(
            "0xabc",
            Decimal::new(50, 0),
            Decimal::ZERO,
        ));
        table.insert(AllocationEntry::new(
            "0xdef",
            Decimal::new(100, 0),
            Decimal::new(25, 0),
        ));
        table
    }

    fn request() -> RawClaimRequest {
        RawClaimRequest {
            token_kind: Some("kindA".to_string()),
            amount: Some("50".to_string()),
            transaction_reference: Some("tx1".to_string()),
            wallet_address: Some("0xABC".to_string()),
            timestamp: None,
            conversion_rate: Some("2".to_string()),
        }
    }

    #[test]
    fn test_valid_request_normalizes() {
        let claim = validate(&request(), &table()).unwrap();
        assert_eq!(claim.wallet_address, "0xabc");
        assert_eq!(claim.token_kind, TokenKind::KindA);
        assert_eq!(claim.amount, Decimal::new(50, 0));
        assert_eq!(claim.conversion_rate, Decimal::new(2, 0));
        assert_eq!(claim.transaction_reference, "tx1");
    }

    #[test]
    fn test_missing_fields_reported_together() {
        let raw = RawClaimRequest {
            token_kind: Some("kindA".to_string()),
            amount: Some("   ".to_string()),
            ..Default::default()
        };
        match validate(&raw, &table()) {
            Err(ClaimError::Validation(ValidationError::MissingFields { missing })) => {
                assert_eq!(
                    missing,
                    vec!["amount", "transactionReference", "walletAddress"]
                );
            }
            other => panic!("expected MissingFields, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_token_kind_wins_over_bad_amount() {
        let mut raw = request();
        raw.token_kind = Some("kindC".to_string());
        raw.amount = Some("not-a-number".to_string());
        match validate(&raw, &table()) {
            Err(ClaimError::Validation(ValidationError::InvalidTokenKind { provided })) => {
                assert_eq!(provided, "kindC");
            }
            other => panic!("expected InvalidTokenKind, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_non_positive_amounts() {
        for bad in ["0", "-1", "abc", "NaN"] {
            let mut raw = request();
            raw.amount = Some(bad.to_string());
            match validate(&raw, &table()) {
                Err(ClaimError::Validation(ValidationError::InvalidAmount { .. })) => {}
                other => panic!("expected InvalidAmount for {:?}, got {:?}", bad, other),
            }
        }
    }

    #[test]
    fn test_rate_defaults_to_one() {
        let mut raw = request();
        raw.conversion_rate = None;
        let claim = validate(&raw, &table()).unwrap();
        assert_eq!(claim.conversion_rate, Decimal::ONE);
    }

    #[test]
    fn test_rejects_non_positive_rate() {
        let mut raw = request();
        raw.conversion_rate = Some("0".to_string());
        match validate(&raw, &table()) {
            Err(ClaimError::Validation(ValidationError::InvalidRate { .. })) => {}
            other => panic!("expected InvalidRate, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_wallet_is_authorization_failure() {
        let mut raw = request();
        raw.wallet_address = Some("0x999".to_string());
        match validate(&raw, &table()) {
            Err(ClaimError::Authorization(AuthorizationError::UnknownWallet { wallet, .. })) => {
                assert_eq!(wallet, "0x999");
            }
            other => panic!("expected UnknownWallet, got {:?}", other),
        }
    }

    #[test]
    fn test_allocation_tolerance_boundary() {
        // allocated 100.00: 100.005 is within the 0.01 tolerance, 100.02 is not
        let mut raw = request();
        raw.wallet_address = Some("0xdef".to_string());

        raw.amount = Some("100.005".to_string());
        assert!(validate(&raw, &table()).is_ok());

        raw.amount = Some("100.02".to_string());
        match validate(&raw, &table()) {
            Err(ClaimError::Authorization(AuthorizationError::AllocationMismatch {
                expected,
                provided,
                ..
            })) => {
                assert_eq!(expected, Decimal::new(100, 0));
                assert_eq!(provided, Decimal::new(10002, 2));
            }
            other => panic!("expected AllocationMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_caller_timestamp_is_honored() {
        let mut raw = request();
        raw.timestamp = Some("2024-05-01T12:00:00Z".to_string());
        let claim = validate(&raw, &table()).unwrap();
        assert_eq!(claim.timestamp.to_rfc3339(), "2024-05-01T12:00:00+00:00");

        // Unparseable timestamps fall back to server time
        raw.timestamp = Some("yesterday".to_string());
        let claim = validate(&raw, &table()).unwrap();
        assert!(claim.timestamp <= Utc::now());
    }
}
