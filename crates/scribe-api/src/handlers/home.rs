//! Homepage handler.

use axum::Json;
use tracing::info;

use super::MessageResponse;

/// Greeting on the root path.
///
/// `NODE_ENV` is read per request, not captured at startup, so the greeting
/// follows the live environment value.
pub async fn homepage() -> Json<MessageResponse> {
    info!("API homepage received a request");

    let target = std::env::var("NODE_ENV").unwrap_or_else(|_| "not yet set".to_string());
    Json(MessageResponse {
        message: format!("Hello {} world, wohoooo!", target),
    })
}
