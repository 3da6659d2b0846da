//! API routes.

use axum::middleware;
use axum::routing::get;
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;

use crate::handlers::health::{health, ready};
use crate::handlers::home::homepage;
use crate::handlers::{blogs, users};
use crate::middleware::{cors_layer, request_id, request_logging, security_headers};
use crate::state::AppState;

/// Create the API router.
///
/// Layer order is part of the contract: security headers wrap the body
/// stage, which wraps CORS. A request refused by the CORS layer still
/// leaves with the security headers applied.
pub fn create_router(state: AppState) -> Router {
    let health_routes = Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready));

    Router::new()
        .route("/", get(homepage))
        .nest("/blogs", blogs::router())
        .nest("/users", users::router())
        .merge(health_routes)
        // Innermost of the cross-cutting layers: CORS policy enforcement.
        .layer(cors_layer(&state.config.cors_origins))
        // Body stage: size cap; JSON/form parsing happens in the extractors.
        .layer(RequestBodyLimitLayer::new(state.config.max_body_size))
        .layer(middleware::from_fn(security_headers))
        .layer(middleware::from_fn(request_id))
        .layer(middleware::from_fn(request_logging))
        .with_state(state)
}
