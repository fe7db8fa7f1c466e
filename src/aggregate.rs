//! Deduplication and counting of Snyk issues.
//!
//! The API attributes one logical vulnerability to every top-level package
//! that introduces it, so the raw issue set contains duplicate ids; counting
//! without collapsing them would overstate the totals.

use std::collections::{HashMap, HashSet};
use std::str::FromStr;

use crate::error::ExporterError;
use crate::snyk::Issue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl Severity {
    pub const ALL: [Severity; 3] = [Severity::High, Severity::Medium, Severity::Low];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }
}

impl FromStr for Severity {
    type Err = ExporterError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "high" => Ok(Severity::High),
            "medium" => Ok(Severity::Medium),
            "low" => Ok(Severity::Low),
            other => Err(ExporterError::InvalidData(format!(
                "invalid severity: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeverityCounts {
    pub high: u64,
    pub medium: u64,
    pub low: u64,
}

impl SeverityCounts {
    fn increment(&mut self, severity: Severity) {
        match severity {
            Severity::High => self.high += 1,
            Severity::Medium => self.medium += 1,
            Severity::Low => self.low += 1,
        }
    }

    pub fn get(&self, severity: Severity) -> u64 {
        match severity {
            Severity::High => self.high,
            Severity::Medium => self.medium,
            Severity::Low => self.low,
        }
    }

    pub fn total(&self) -> u64 {
        self.high + self.medium + self.low
    }
}

/// Per-project counters, recomputed from scratch every scrape.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountsForProject {
    pub severities: SeverityCounts,
    /// Issue title -> count; only titles that occur are present.
    pub types: HashMap<String, u64>,
}

/// Keep the first occurrence of each issue id, preserving order.
pub fn dedupe(issues: Vec<Issue>) -> Vec<Issue> {
    let mut seen = HashSet::new();
    issues
        .into_iter()
        .filter(|issue| seen.insert(issue.id.clone()))
        .collect()
}

/// Reduce a deduplicated issue set into severity and type counts. An issue
/// with a severity outside {high, medium, low} fails the whole scrape.
pub fn aggregate(issues: &[Issue]) -> Result<CountsForProject, ExporterError> {
    let mut counts = CountsForProject::default();
    for issue in issues {
        let severity = issue.severity.parse::<Severity>()?;
        counts.severities.increment(severity);
        *counts.types.entry(issue.title.clone()).or_insert(0) += 1;
    }
    Ok(counts)
}
