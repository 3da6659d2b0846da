//! Firestore REST API client.
//!
//! Deliberately narrow: the API only needs a connectivity probe and single
//! document reads. Authentication runs through the token cache; reads retry
//! with backoff, the probe is a single shot.

use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::{Client, StatusCode};
use tracing::{debug, info_span, Instrument};

use crate::credentials::{AdminCredentials, TokenSource};
use crate::error::{FirestoreError, FirestoreResult};
use crate::retry::{with_retry, RetryConfig};
use crate::token_cache::TokenCache;
use crate::types::Document;

/// Firestore client configuration.
#[derive(Debug, Clone)]
pub struct FirestoreConfig {
    /// GCP project ID
    pub project_id: String,
    /// Database ID (usually "(default)")
    pub database_id: String,
    /// Documents endpoint root
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// Connect timeout
    pub connect_timeout: Duration,
    /// Retry configuration
    pub retry: RetryConfig,
}

impl FirestoreConfig {
    /// Create config from environment variables.
    ///
    /// `DATABASE_URI` overrides the documents endpoint; without it the client
    /// targets a local Firestore emulator.
    pub fn from_env() -> Self {
        let project_id = std::env::var(crate::credentials::ENV_PROJECT_ID)
            .unwrap_or_else(|_| "demo-scribe".to_string());
        let database_id = std::env::var("FIRESTORE_DATABASE_ID")
            .unwrap_or_else(|_| "(default)".to_string());

        let base_url = std::env::var("DATABASE_URI").unwrap_or_else(|_| {
            format!(
                "http://localhost:8080/v1/projects/{}/databases/{}/documents",
                project_id, database_id
            )
        });

        let connect_timeout_secs: u64 = std::env::var("DATABASE_CONNECT_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(5);

        Self {
            project_id,
            database_id,
            base_url,
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(connect_timeout_secs),
            retry: RetryConfig::from_env(),
        }
    }
}

/// Narrow Firestore REST client.
pub struct FirestoreClient {
    http: Client,
    config: FirestoreConfig,
    token_cache: Arc<TokenCache>,
}

impl FirestoreClient {
    /// Create a new client over an explicit token source.
    pub fn new(config: FirestoreConfig, source: TokenSource) -> FirestoreResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .user_agent(concat!("scribe-firestore/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(FirestoreError::Network)?;

        Ok(Self {
            http,
            config,
            token_cache: Arc::new(TokenCache::new(source)),
        })
    }

    /// Create a client from environment variables.
    ///
    /// With the `FIREBASE_ADMIN_*` credential fields set, tokens are minted
    /// from the service account; a missing credential is only tolerated for
    /// non-Google endpoints (the emulator takes any bearer value).
    pub fn from_env() -> FirestoreResult<Self> {
        let config = FirestoreConfig::from_env();

        let source = match AdminCredentials::from_env()? {
            Some(credentials) => TokenSource::ServiceAccount(credentials.into_service_account()?),
            None if config.base_url.contains("googleapis.com") => {
                return Err(FirestoreError::auth_error(
                    "FIREBASE_ADMIN_* credentials are required to reach Firestore",
                ));
            }
            None => {
                debug!("No admin credentials configured, assuming emulator endpoint");
                TokenSource::Fixed("owner".to_string())
            }
        };

        Self::new(config, source)
    }

    pub fn config(&self) -> &FirestoreConfig {
        &self.config
    }

    fn document_url(&self, collection: &str, doc_id: &str) -> String {
        format!("{}/{}/{}", self.config.base_url, collection, doc_id)
    }

    fn is_access_token_expired(body: &str) -> bool {
        body.contains("ACCESS_TOKEN_EXPIRED") || body.contains("\"UNAUTHENTICATED\"")
    }

    /// Get a document. Returns `None` when it does not exist.
    pub async fn get_document(
        &self,
        collection: &str,
        doc_id: &str,
    ) -> FirestoreResult<Option<Document>> {
        let span = info_span!("firestore_request", operation = "get_document", collection = %collection, doc_id = %doc_id);
        with_retry(&self.config.retry, "get_document", || {
            self.get_document_once(collection, doc_id)
        })
        .instrument(span)
        .await
    }

    async fn get_document_once(
        &self,
        collection: &str,
        doc_id: &str,
    ) -> FirestoreResult<Option<Document>> {
        let url = self.document_url(collection, doc_id);

        let mut token = self.token_cache.get_token().await?;
        let mut response = self.http.get(&url).bearer_auth(&token).send().await?;
        let mut status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            let body = response.text().await.unwrap_or_default();
            if Self::is_access_token_expired(&body) {
                self.token_cache.invalidate().await;
                token = self.token_cache.get_token().await?;
                response = self.http.get(&url).bearer_auth(&token).send().await?;
                status = response.status();
            } else {
                return Err(FirestoreError::from_http_status(
                    status.as_u16(),
                    format!("{} failed: {}", url, body),
                ));
            }
        }

        match status {
            StatusCode::OK => {
                let doc: Document = response.json().await?;
                Ok(Some(doc))
            }
            StatusCode::NOT_FOUND => Ok(None),
            _ => {
                let body = response.text().await.unwrap_or_default();
                Err(FirestoreError::from_http_status(
                    status.as_u16(),
                    format!("{} failed: {}", url, body),
                ))
            }
        }
    }

    /// Connectivity probe: one read against a sentinel document, no retry.
    ///
    /// A missing sentinel still proves the database is reachable.
    pub async fn ping(&self) -> FirestoreResult<Duration> {
        let start = Instant::now();
        let span = info_span!("firestore_request", operation = "ping");
        self.get_document_once("_health", "_check")
            .instrument(span)
            .await?;
        Ok(start.elapsed())
    }
}
