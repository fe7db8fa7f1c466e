use std::collections::HashMap;

use anyhow::Result;
use axum::body::Body;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::Response;
use prometheus::proto::MetricFamily;
use prometheus::{Encoder, IntGauge, IntGaugeVec, Opts, Registry, TextEncoder};

use crate::aggregate::{Severity, SeverityCounts};

pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4";

/// Exported gauge state, owned and injectable rather than a process-global
/// registry so tests can run isolated sinks side by side.
///
/// Severity and type gauges are cleared wholesale at the start of every
/// scrape; label combinations never survive from one cycle to the next.
#[derive(Clone)]
pub struct ExporterMetrics {
    registry: Registry,
    up: IntGauge,
    by_severity: IntGaugeVec,
    by_type: IntGaugeVec,
}

impl ExporterMetrics {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();
        let up = IntGauge::new("up", "UP Status")?;
        let by_severity = IntGaugeVec::new(
            Opts::new(
                "snyk_num_vulnerabilities_by_severity",
                "Number of Snyk vulnerabilities by severity",
            ),
            &["project", "severity"],
        )?;
        let by_type = IntGaugeVec::new(
            Opts::new(
                "snyk_num_vulnerabilities_by_type",
                "Number of Snyk vulnerabilities by type",
            ),
            &["project", "type"],
        )?;
        registry.register(Box::new(up.clone()))?;
        registry.register(Box::new(by_severity.clone()))?;
        registry.register(Box::new(by_type.clone()))?;
        Ok(Self {
            registry,
            up,
            by_severity,
            by_type,
        })
    }

    /// Drop every label combination from the previous cycle and mark the
    /// exporter up. Called once at the start of each scrape.
    pub fn reset_scrape(&self) {
        self.by_severity.reset();
        self.by_type.reset();
        self.up.set(1);
    }

    pub fn mark_down(&self) {
        self.up.set(0);
    }

    /// All three severities are written, zeros included, so a clean project
    /// still exposes an explicit zero per severity.
    pub fn set_severity_counts(&self, project: &str, counts: &SeverityCounts) {
        for severity in Severity::ALL {
            self.by_severity
                .with_label_values(&[project, severity.as_str()])
                .set(counts.get(severity) as i64);
        }
    }

    pub fn set_type_counts(&self, project: &str, types: &HashMap<String, u64>) {
        for (title, count) in types {
            self.by_type
                .with_label_values(&[project, title])
                .set(*count as i64);
        }
    }

    pub fn render(&self) -> Result<Response> {
        text_response(encode(&self.registry.gather())?)
    }

    /// Failure-path rendering: only the `up` family, so partial gauge state
    /// accumulated before the failure is withheld from the response body.
    pub fn render_up_only(&self) -> Result<Response> {
        let families: Vec<MetricFamily> = self
            .registry
            .gather()
            .into_iter()
            .filter(|family| family.get_name() == "up")
            .collect();
        text_response(encode(&families)?)
    }
}

fn encode(families: &[MetricFamily]) -> Result<String> {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder.encode(families, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

fn text_response(body: String) -> Result<Response> {
    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE))
        .body(Body::from(body))?;
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn severity_family(metrics: &ExporterMetrics) -> MetricFamily {
        metrics
            .registry
            .gather()
            .into_iter()
            .find(|family| family.get_name() == "snyk_num_vulnerabilities_by_severity")
            .unwrap()
    }

    #[test]
    fn severity_counts_write_all_three_labels() {
        let metrics = ExporterMetrics::new().unwrap();
        metrics.reset_scrape();
        metrics.set_severity_counts(
            "burns",
            &SeverityCounts {
                high: 2,
                medium: 0,
                low: 1,
            },
        );
        let family = severity_family(&metrics);
        assert_eq!(family.get_metric().len(), 3);
        let rendered = encode(&metrics.registry.gather()).unwrap();
        assert!(rendered.contains(
            r#"snyk_num_vulnerabilities_by_severity{project="burns",severity="high"} 2"#
        ));
        assert!(rendered.contains(
            r#"snyk_num_vulnerabilities_by_severity{project="burns",severity="medium"} 0"#
        ));
    }

    #[test]
    fn reset_clears_prior_label_sets() {
        let metrics = ExporterMetrics::new().unwrap();
        metrics.reset_scrape();
        metrics.set_severity_counts("burns", &SeverityCounts::default());
        let mut types = HashMap::new();
        types.insert("XSS".to_string(), 3);
        metrics.set_type_counts("burns", &types);

        metrics.reset_scrape();
        let family = metrics
            .registry
            .gather()
            .into_iter()
            .find(|family| family.get_name() == "snyk_num_vulnerabilities_by_severity");
        assert!(family.map_or(true, |family| family.get_metric().is_empty()));
        let rendered = encode(&metrics.registry.gather()).unwrap();
        assert!(!rendered.contains("burns"));
        assert!(!rendered.contains("XSS"));
        assert!(rendered.contains("up 1"));
    }

    #[test]
    fn up_only_rendering_omits_vulnerability_families() {
        let metrics = ExporterMetrics::new().unwrap();
        metrics.reset_scrape();
        metrics.set_severity_counts(
            "burns",
            &SeverityCounts {
                high: 1,
                medium: 0,
                low: 0,
            },
        );
        metrics.mark_down();

        let families: Vec<MetricFamily> = metrics
            .registry
            .gather()
            .into_iter()
            .filter(|family| family.get_name() == "up")
            .collect();
        let rendered = encode(&families).unwrap();
        assert!(rendered.contains("up 0"));
        assert!(!rendered.contains("snyk_num_vulnerabilities"));
    }
}
