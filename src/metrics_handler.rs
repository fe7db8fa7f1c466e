use axum::extract::State;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use tracing::{error, warn};

use crate::app_state::AppState;
use crate::scrape::run_scrape;

pub const ERROR_HEADER: &str = "x-error";

/// `GET /metrics`: run one full scrape, then render the registry. On scrape
/// failure the body carries only the `up` gauge (set to 0) plus an `X-Error`
/// header with the failure message; gauges written earlier in the failed
/// cycle are withheld from the body.
pub async fn metrics_endpoint(State(state): State<AppState>) -> Response {
    let _guard = state.scrape_gate.lock().await;

    match run_scrape(&state.client, &state.metrics).await {
        Ok(()) => match state.metrics.render() {
            Ok(response) => response,
            Err(err) => render_failure(err),
        },
        Err(err) => {
            warn!(error = %err, "scrape failed");
            state.metrics.mark_down();
            match state.metrics.render_up_only() {
                Ok(mut response) => {
                    let value = HeaderValue::from_str(&err.to_string())
                        .unwrap_or_else(|_| HeaderValue::from_static("scrape failed"));
                    response.headers_mut().insert(ERROR_HEADER, value);
                    response
                }
                Err(render_err) => render_failure(render_err),
            }
        }
    }
}

fn render_failure(err: anyhow::Error) -> Response {
    error!(error = %err, "failed to render metrics");
    StatusCode::INTERNAL_SERVER_ERROR.into_response()
}
