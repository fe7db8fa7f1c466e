use std::env;
use std::net::SocketAddr;

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use snyk_exporter::app_state::AppState;
use snyk_exporter::config::ExporterConfig;
use snyk_exporter::metrics::ExporterMetrics;
use snyk_exporter::metrics_handler::metrics_endpoint;
use snyk_exporter::snyk::SnykClient;

async fn health() -> &'static str {
    "ok"
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let default_level = if env::var("SNYK_EXPORTER_DEBUG").is_ok() {
        "debug"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let config = ExporterConfig::from_env()?;
    let client = SnykClient::new(&config, reqwest::Client::new());
    let metrics = ExporterMetrics::new()?;
    let state = AppState::new(client, metrics);

    let app = Router::new()
        .route("/healthz", get(health))
        .route("/metrics", get(metrics_endpoint))
        .with_state(state);

    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(9207);
    let ip: std::net::IpAddr = host.parse()?;
    let addr = SocketAddr::from((ip, port));
    info!(%addr, org = %config.org_name, "starting snyk-exporter, metrics exposed on /metrics");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
