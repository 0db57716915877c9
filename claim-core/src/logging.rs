//! Logging conventions for the claim service.
//!
//! # Log levels
//!
//! | Level | Usage | Examples |
//! |-------|-------|----------|
//! | ERROR | Unrecoverable errors | Storage failure, rolled-back transaction |
//! | WARN  | Rejected or conflicting requests | Duplicate reference, allocation mismatch |
//! | INFO  | Committed state changes | Claim committed, registry reloaded |
//! | DEBUG | Operation flow | Validation outcomes, lookups |
//!
//! Use structured fields (`wallet`, `reference`, `claim_id`, `operation`,
//! `count`) rather than interpolated messages.

use serde::{Deserialize, Serialize};

/// Log level enumeration matching tracing levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Unrecoverable errors
    Error,
    /// Recoverable warnings
    Warn,
    /// Significant events
    Info,
    /// Detailed debugging
    Debug,
    /// Fine-grained tracing
    Trace,
}

impl LogLevel {
    /// Get the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }

    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "error" => Some(Self::Error),
            "warn" | "warning" => Some(Self::Warn),
            "info" => Some(Self::Info),
            "debug" => Some(Self::Debug),
            "trace" => Some(Self::Trace),
            _ => None,
        }
    }
}

impl Default for LogLevel {
    fn default() -> Self {
        Self::Info
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Operation names used in the `operation` log field
pub mod operations {
    pub const CLAIM_SUBMIT: &str = "claim_submit";
    pub const CLAIM_CONFLICT: &str = "claim_conflict";
    pub const CLAIM_REJECT: &str = "claim_reject";
    pub const REGISTRY_LOAD: &str = "registry_load";
    pub const REGISTRY_RELOAD: &str = "registry_reload";
    pub const WALLET_SUMMARY: &str = "wallet_summary";
    pub const GLOBAL_STATS: &str = "global_stats";
    pub const HEALTH_CHECK: &str = "health_check";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(LogLevel::from_str("error"), Some(LogLevel::Error));
        assert_eq!(LogLevel::from_str("INFO"), Some(LogLevel::Info));
        assert_eq!(LogLevel::from_str("warning"), Some(LogLevel::Warn));
        assert_eq!(LogLevel::from_str("invalid"), None);
    }

    #[test]
    fn test_log_level_display() {
        assert_eq!(LogLevel::default().to_string(), "info");
        assert_eq!(LogLevel::Trace.as_str(), "trace");
    }
}
