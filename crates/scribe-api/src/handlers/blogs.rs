//! Blogs resource router.

use axum::extract::{OriginalUri, Path};
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::info;

use crate::extract::EchoBody;
use crate::state::AppState;

use super::{EchoResponse, MessageResponse};

/// Route bundle mounted under `/blogs`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_blogs))
        .route("/:blog_id/notAParam/:another_param", get(get_blog_by_params))
        .route("/:blog_id", post(create_blog_post))
}

/// Root of the router; the mount prefix decides its public path.
async fn list_blogs(OriginalUri(uri): OriginalUri) -> Json<MessageResponse> {
    Json(MessageResponse {
        message: format!("Received a request on {}", uri.path()),
    })
}

/// Two captured path params around a fixed segment.
async fn get_blog_by_params(
    Path((blog_id, another_param)): Path<(String, String)>,
) -> Json<MessageResponse> {
    Json(MessageResponse {
        message: format!(
            "Received a GET request for a blog post with ID of {} and nested param of {}",
            blog_id, another_param
        ),
    })
}

/// Accepts a submission and echoes the parsed body back verbatim.
async fn create_blog_post(
    Path(blog_id): Path<String>,
    EchoBody(body): EchoBody,
) -> Json<EchoResponse> {
    match body.get("postAuthorID") {
        Some(author) => info!(author = %author, "Content author on blog post submission"),
        None => info!("Blog post submission without a postAuthorID"),
    }

    Json(EchoResponse {
        message: format!("Received a POST request for a blog post with ID of {}", blog_id),
        body_content: body,
    })
}
