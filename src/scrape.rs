//! One scrape cycle: reset exported state, list projects, fetch and
//! aggregate issues per project, write gauges. Projects are processed
//! sequentially in listing order; the first failure aborts the scrape and
//! leaves the remaining projects unprocessed.

use tracing::{debug, info};

use crate::aggregate::{aggregate, dedupe};
use crate::error::ExporterError;
use crate::metrics::ExporterMetrics;
use crate::snyk::SnykClient;

pub async fn run_scrape(
    client: &SnykClient,
    sink: &ExporterMetrics,
) -> Result<(), ExporterError> {
    sink.reset_scrape();

    let listing = client.list_projects().await?;
    let org_id = listing.org_id()?.to_owned();

    for project in &listing.projects {
        debug!(project = %project.name, project_id = %project.id, "processing project");
        let issues = dedupe(client.fetch_issues(&org_id, project).await?);
        let counts = aggregate(&issues)?;
        sink.set_severity_counts(&project.name, &counts.severities);
        sink.set_type_counts(&project.name, &counts.types);
    }

    info!(projects = listing.projects.len(), "scrape complete");
    Ok(())
}
