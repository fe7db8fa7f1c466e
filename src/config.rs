use std::env;

use crate::error::ExporterError;

pub const DEFAULT_BASE_URL: &str = "https://snyk.io/api/v1";

#[derive(Debug, Clone)]
pub struct ExporterConfig {
    pub api_token: String,
    pub org_name: String,
    pub base_url: String,
}

impl ExporterConfig {
    pub fn from_env() -> Result<Self, ExporterError> {
        Self::new(
            env::var("SNYK_API_TOKEN").ok(),
            env::var("SNYK_ORG_NAME").ok(),
            env::var("SNYK_API_BASE_URL").ok(),
        )
    }

    pub fn new(
        api_token: Option<String>,
        org_name: Option<String>,
        base_url: Option<String>,
    ) -> Result<Self, ExporterError> {
        let api_token = api_token
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| ExporterError::Config("SNYK_API_TOKEN must be set".into()))?;
        let org_name = org_name
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| ExporterError::Config("SNYK_ORG_NAME must be set".into()))?;
        let base_url = base_url
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(Self {
            api_token,
            org_name,
            base_url,
        })
    }
}
