//! Request handlers.

use serde::Serialize;
use serde_json::Value;

pub mod blogs;
pub mod health;
pub mod home;
pub mod users;

/// The common JSON envelope every route answers with.
#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Envelope for POST routes that echo the request body back.
#[derive(Serialize)]
pub struct EchoResponse {
    pub message: String,
    #[serde(rename = "bodyContent")]
    pub body_content: Value,
}
