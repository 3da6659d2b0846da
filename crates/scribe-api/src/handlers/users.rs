//! Users resource router.
//!
//! Same shape as the blogs router, mounted under `/users`.

use axum::extract::{OriginalUri, Path};
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::info;

use crate::extract::EchoBody;
use crate::state::AppState;

use super::{EchoResponse, MessageResponse};

/// Route bundle mounted under `/users`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users))
        .route("/:user_id", get(get_user))
        .route("/:user_id", post(create_user))
}

async fn list_users(OriginalUri(uri): OriginalUri) -> Json<MessageResponse> {
    Json(MessageResponse {
        message: format!("Received a request on {}", uri.path()),
    })
}

async fn get_user(Path(user_id): Path<String>) -> Json<MessageResponse> {
    Json(MessageResponse {
        message: format!("Received a GET request for a user with ID of {}", user_id),
    })
}

async fn create_user(Path(user_id): Path<String>, EchoBody(body): EchoBody) -> Json<EchoResponse> {
    info!(user_id = %user_id, "User submission received");

    Json(EchoResponse {
        message: format!("Received a POST request for a user with ID of {}", user_id),
        body_content: body,
    })
}
