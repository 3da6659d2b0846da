//! Axum HTTP API server.
//!
//! The library assembles the application (middleware, credential service,
//! database client, resource routers) without binding a port, so the same
//! router serves production and tests. The binary in `main.rs` does the
//! listening.

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
