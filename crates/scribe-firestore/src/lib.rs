//! Firestore REST API client for the scribe API.
//!
//! This crate provides:
//! - Service account authentication via gcp_auth, assembled from the
//!   `FIREBASE_ADMIN_*` credential fields
//! - A token cache with single-flight refresh
//! - A narrow document client (single reads plus a connectivity probe)
//! - Retry with exponential backoff for reads

pub mod client;
pub mod credentials;
pub mod error;
pub mod retry;
pub mod token_cache;
pub mod types;

pub use client::{FirestoreClient, FirestoreConfig};
pub use credentials::{AdminCredentials, TokenSource};
pub use error::{FirestoreError, FirestoreResult};
pub use retry::RetryConfig;
pub use types::{Document, Value};
