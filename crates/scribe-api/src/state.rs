//! Application state and assembly-time side effects.

use std::sync::{Arc, Once};

use anyhow::Context;
use scribe_firestore::FirestoreClient;
use tracing::{error, info, warn};

use crate::config::ApiConfig;

static DIAGNOSTIC_HOOK: Once = Once::new();

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub firestore: Arc<FirestoreClient>,
}

impl AppState {
    /// Create new application state.
    ///
    /// Initializes the credential service (fatal on failure) and, outside
    /// the test environment, spawns a non-blocking connection probe against
    /// the document database. The probe logs its outcome and is never
    /// awaited here; a failure does not abort assembly.
    pub async fn new(config: ApiConfig) -> anyhow::Result<Self> {
        install_diagnostic_hook();

        let firestore = Arc::new(
            FirestoreClient::from_env().context("Failed to initialize document database client")?,
        );

        if !config.is_test() {
            spawn_connection_probe(Arc::clone(&firestore));
        }

        Ok(Self { config, firestore })
    }
}

/// Last-resort diagnostic for panics that escape a task.
///
/// Failures are expected to travel through `Result`s and the supervised
/// spawn blocks; this hook only makes sure nothing dies silently. Installed
/// once per process.
pub fn install_diagnostic_hook() {
    DIAGNOSTIC_HOOK.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            error!("Unhandled panic: {}", info);
            previous(info);
        }));
    });
}

/// Fire-and-forget startup probe. No retry; the outcome is only logged.
fn spawn_connection_probe(firestore: Arc<FirestoreClient>) {
    tokio::spawn(async move {
        match firestore.ping().await {
            Ok(latency) => info!(
                latency_ms = latency.as_millis() as u64,
                "Database connected"
            ),
            Err(e) => warn!("Database connection attempt failed: {}", e),
        }
    });
}
