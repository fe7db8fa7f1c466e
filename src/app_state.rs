use std::sync::Arc;

use tokio::sync::Mutex;

use crate::metrics::ExporterMetrics;
use crate::snyk::SnykClient;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub client: Arc<SnykClient>,
    pub metrics: Arc<ExporterMetrics>,
    /// Serialises overlapping scrape requests; the sink is shared mutable
    /// state and an unguarded concurrent scrape could interleave its reset
    /// with another scrape's writes.
    pub scrape_gate: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(client: SnykClient, metrics: ExporterMetrics) -> Self {
        Self {
            client: Arc::new(client),
            metrics: Arc::new(metrics),
            scrape_gate: Arc::new(Mutex::new(())),
        }
    }
}
