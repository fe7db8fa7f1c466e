use thiserror::Error;

/// Closed error taxonomy for the exporter. Nothing here is recovered
/// internally: any error raised during a scrape aborts that scrape and is
/// surfaced to the caller as the `up=0` response.
#[derive(Debug, Error)]
pub enum ExporterError {
    /// Missing required configuration; fatal at startup.
    #[error("configuration error: {0}")]
    Config(String),

    /// The caller handed the client an unusable argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The upstream response parsed but is structurally incomplete.
    #[error("upstream response error: {0}")]
    Upstream(String),

    /// An issue carried a severity outside the known set.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// Network or HTTP-level failure, single attempt, no retry.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}
