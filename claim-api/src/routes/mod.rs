//! API route handlers.

pub mod admin;
pub mod claims;
pub mod health;
pub mod wallets;

use axum::{routing::get, routing::post, Router};

use crate::state::AppState;

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health endpoints
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        // Claim endpoints
        .route("/claims", post(claims::submit_claim))
        .route("/claims/:claim_id", get(claims::get_claim))
        // Wallet endpoints
        .route("/wallets/:address/summary", get(wallets::wallet_summary))
        .route(
            "/wallets/:address/allocation",
            get(wallets::allocation_status),
        )
        // Admin endpoints
        .route("/stats", get(admin::global_stats))
        .route("/allocations/reload", post(admin::reload_allocations))
        // State
        .with_state(state)
}
