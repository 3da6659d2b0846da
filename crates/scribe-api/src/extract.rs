//! Request body extraction.

use axum::async_trait;
use axum::body::Bytes;
use axum::extract::{Form, FromRequest, Request};
use axum::http::header;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::convert::Infallible;

/// The request body as a JSON object, however the client sent it.
///
/// Accepts JSON and URL-encoded bodies. An absent or unparseable body
/// degrades to an empty object rather than rejecting the request; the POST
/// routes echo whatever arrived and never validate it.
pub struct EchoBody(pub Value);

#[async_trait]
impl<S> FromRequest<S> for EchoBody
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_ascii_lowercase();

        if content_type.starts_with("application/x-www-form-urlencoded") {
            let value = match Form::<HashMap<String, String>>::from_request(req, state).await {
                Ok(Form(fields)) => Value::Object(
                    fields
                        .into_iter()
                        .map(|(k, v)| (k, Value::String(v)))
                        .collect::<Map<_, _>>(),
                ),
                Err(_) => Value::Object(Map::new()),
            };
            return Ok(Self(value));
        }

        let bytes = match Bytes::from_request(req, state).await {
            Ok(bytes) => bytes,
            Err(_) => return Ok(Self(Value::Object(Map::new()))),
        };

        if bytes.is_empty() {
            return Ok(Self(Value::Object(Map::new())));
        }

        let value = serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::Object(Map::new()));
        Ok(Self(value))
    }
}
