//! Claim API
//!
//! HTTP surface for the token claim service: claim submission and lookup,
//! wallet summaries, allocation status, global statistics, allocation
//! reload, and health endpoints. All claim semantics live in `claim-core`
//! and `claim-store`; this crate only frames requests and maps errors to
//! status codes.

pub mod dto;
pub mod error;
pub mod routes;
pub mod server;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use server::{create_server, run_server, start_background_server};
pub use state::{ApiConfig, AppState};
