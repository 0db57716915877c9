//! CLI command implementations.

use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use claim_api::{run_server, ApiConfig, AppState};
use claim_core::AllocationRegistry;
use claim_store::{ClaimStore, MemoryStore, SledStore, StorageConfig};

type CliResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Start the claim API server
pub async fn start(
    allocations: &Path,
    data_dir: &Path,
    host: String,
    port: u16,
    in_memory: bool,
) -> CliResult {
    // A missing or malformed allocation file is reported, not fatal: the
    // server comes up with an empty registry and rejects all claims as
    // unknown wallets until a successful reload
    let registry = match AllocationRegistry::load(allocations) {
        Ok(registry) => registry,
        Err(e) => {
            warn!(
                source = %allocations.display(),
                error = %e,
                "Failed to load allocation table; starting with an empty registry"
            );
            AllocationRegistry::empty()
        }
    };

    let store: Arc<dyn ClaimStore> = if in_memory {
        info!("Using in-memory claim store");
        Arc::new(MemoryStore::new())
    } else {
        let config = StorageConfig {
            data_dir: data_dir.display().to_string(),
            ..StorageConfig::from_env()
        };
        info!(data_dir = %config.data_dir, "Opening sled claim store");
        Arc::new(SledStore::new(&config)?)
    };

    let state = AppState::new(store, Arc::new(registry));
    let config = ApiConfig {
        host,
        port,
        ..ApiConfig::from_env()
    };

    run_server(&config, state).await
}

/// Validate the allocation file
pub fn validate(allocations: &Path) -> CliResult {
    let registry = AllocationRegistry::load(allocations)?;
    println!(
        "{}: {} wallet(s) allocated",
        allocations.display(),
        registry.len()
    );
    Ok(())
}
