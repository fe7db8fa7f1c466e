pub mod aggregate;
pub mod app_state;
pub mod config;
pub mod error;
pub mod metrics;
pub mod metrics_handler;
pub mod scrape;
pub mod snyk;

// Re-export key types for tests
pub use crate::aggregate::{aggregate, dedupe, CountsForProject, Severity, SeverityCounts};
pub use crate::app_state::AppState;
pub use crate::config::ExporterConfig;
pub use crate::error::ExporterError;
pub use crate::metrics::ExporterMetrics;
pub use crate::metrics_handler::metrics_endpoint;
pub use crate::scrape::run_scrape;
pub use crate::snyk::{Issue, Project, ProjectListing, SnykClient};
