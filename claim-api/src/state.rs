//! Application state for the API server.

use std::env;
use std::sync::Arc;

use claim_core::AllocationRegistry;
use claim_store::{BalanceAggregator, ClaimLedger, ClaimStore};

/// API server state
#[derive(Clone)]
pub struct AppState {
    /// Allocation registry
    pub registry: Arc<AllocationRegistry>,
    /// Claim ledger
    pub ledger: Arc<ClaimLedger>,
    /// Balance aggregator
    pub aggregator: Arc<BalanceAggregator>,
    /// Underlying claim store (for readiness probes)
    pub store: Arc<dyn ClaimStore>,
    /// API version
    pub version: String,
}

impl AppState {
    /// Create app state over a store and an allocation registry
    pub fn new(store: Arc<dyn ClaimStore>, registry: Arc<AllocationRegistry>) -> Self {
        let ledger = Arc::new(ClaimLedger::new(store.clone()));
        let aggregator = Arc::new(BalanceAggregator::new(store.clone(), registry.clone()));

        Self {
            registry,
            ledger,
            aggregator,
            store,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    pub enable_cors: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            enable_cors: true,
        }
    }
}

impl ApiConfig {
    /// Load configuration from environment variables
    ///
    /// - `CLAIM_HOST`: bind host
    /// - `CLAIM_PORT`: bind port
    /// - `CLAIM_ENABLE_CORS`: enable permissive CORS (true/false)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: env::var("CLAIM_HOST").unwrap_or(defaults.host),
            port: env::var("CLAIM_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.port),
            enable_cors: env::var("CLAIM_ENABLE_CORS")
                .map(|s| s.to_lowercase() == "true" || s == "1")
                .unwrap_or(defaults.enable_cors),
        }
    }
}
