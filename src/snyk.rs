//! Minimal Snyk v1 API client: the two calls the exporter needs, one shared
//! `reqwest::Client`, a static token in the `Authorization` header. No retry
//! and no timeout override; a failed call fails the scrape.

use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::config::ExporterConfig;
use crate::error::ExporterError;

#[derive(Debug, Clone, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct OrgRef {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Response of `GET /org/{org}/projects`. `org` is optional so a malformed
/// response surfaces as `Upstream` rather than a deserialization failure.
#[derive(Debug, Deserialize)]
pub struct ProjectListing {
    #[serde(default)]
    pub org: Option<OrgRef>,
    #[serde(default)]
    pub projects: Vec<Project>,
}

impl ProjectListing {
    pub fn org_id(&self) -> Result<&str, ExporterError> {
        self.org
            .as_ref()
            .and_then(|org| org.id.as_deref())
            .ok_or_else(|| {
                ExporterError::Upstream("unable to find org id in projects response".into())
            })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Issue {
    pub id: String,
    pub severity: String,
    pub title: String,
}

#[derive(Debug, Deserialize)]
struct IssuesEnvelope {
    #[serde(default)]
    issues: Option<IssuesBody>,
}

#[derive(Debug, Deserialize)]
struct IssuesBody {
    #[serde(default)]
    vulnerabilities: Vec<Issue>,
}

pub struct SnykClient {
    http: Client,
    base_url: String,
    token: String,
    org_name: String,
}

impl SnykClient {
    pub fn new(config: &ExporterConfig, http: Client) -> Self {
        Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.api_token.clone(),
            org_name: config.org_name.clone(),
        }
    }

    pub async fn list_projects(&self) -> Result<ProjectListing, ExporterError> {
        let url = format!("{}/org/{}/projects", self.base_url, self.org_name);
        debug!(%url, "listing projects");
        let listing = self
            .http
            .get(&url)
            .header(AUTHORIZATION, self.token.as_str())
            .send()
            .await?
            .error_for_status()?
            .json::<ProjectListing>()
            .await?;
        Ok(listing)
    }

    /// Fetch the issue set for one project. Licenses are included in the
    /// filter but only the vulnerabilities array is counted downstream.
    pub async fn fetch_issues(
        &self,
        org_id: &str,
        project: &Project,
    ) -> Result<Vec<Issue>, ExporterError> {
        if project.id.trim().is_empty() {
            return Err(ExporterError::InvalidArgument(
                "project id must not be empty".into(),
            ));
        }

        let url = format!(
            "{}/org/{}/project/{}/issues",
            self.base_url, org_id, project.id
        );
        debug!(%url, project = %project.name, "fetching issues");
        let envelope = self
            .http
            .post(&url)
            .header(AUTHORIZATION, self.token.as_str())
            .json(&issue_filters())
            .send()
            .await?
            .error_for_status()?
            .json::<IssuesEnvelope>()
            .await?;

        let body = envelope.issues.ok_or_else(|| {
            ExporterError::Upstream("could not find issues object in response".into())
        })?;
        Ok(body.vulnerabilities)
    }
}

fn issue_filters() -> serde_json::Value {
    json!({
        "filters": {
            "severity": ["high", "medium", "low"],
            "types": ["vuln", "license"],
            "ignored": false,
            "patched": false
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_payload_matches_api_contract() {
        let filters = issue_filters();
        assert_eq!(filters["filters"]["severity"][0], "high");
        assert_eq!(filters["filters"]["types"][1], "license");
        assert_eq!(filters["filters"]["ignored"], false);
        assert_eq!(filters["filters"]["patched"], false);
    }

    #[test]
    fn org_id_missing_is_upstream_error() {
        let listing = ProjectListing {
            org: None,
            projects: vec![],
        };
        assert!(matches!(
            listing.org_id(),
            Err(ExporterError::Upstream(_))
        ));

        let listing = ProjectListing {
            org: Some(OrgRef {
                id: None,
                name: Some("springfield".into()),
            }),
            projects: vec![],
        };
        assert!(matches!(
            listing.org_id(),
            Err(ExporterError::Upstream(_))
        ));
    }

    #[test]
    fn org_id_present_is_returned() {
        let listing: ProjectListing = serde_json::from_value(serde_json::json!({
            "org": {"id": "1234567a-123b-456c-def7-890abcdefg01", "name": "springfield"},
            "projects": [{"id": "p1", "name": "burns", "origin": "github"}]
        }))
        .unwrap();
        assert_eq!(
            listing.org_id().unwrap(),
            "1234567a-123b-456c-def7-890abcdefg01"
        );
        assert_eq!(listing.projects.len(), 1);
        assert_eq!(listing.projects[0].name, "burns");
    }
}
