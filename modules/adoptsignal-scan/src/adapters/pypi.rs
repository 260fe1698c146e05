use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use adoptsignal_common::{CompanyRef, RawFinding, SourceId};

use crate::product::ProductProfile;

use super::SourceAdapter;

const BASE_URL: &str = "https://pypi.org/pypi";
/// Candidate distributions probed per scan.
const MAX_CANDIDATES: usize = 5;

#[derive(Debug, Deserialize)]
struct ProjectResponse {
    info: ProjectInfo,
}

#[derive(Debug, Deserialize)]
struct ProjectInfo {
    name: String,
    #[serde(default)]
    requires_dist: Option<Vec<String>>,
}

/// Probes company-derived distribution names on PyPI and reports the ones
/// whose requirements include the product SDK. PyPI has no search API, so
/// this mirrors the org-name probing used for GitHub.
pub struct PypiAdapter {
    client: reqwest::Client,
    profile: ProductProfile,
}

impl PypiAdapter {
    pub fn new(profile: ProductProfile) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(15))
                .build()
                .expect("Failed to build HTTP client"),
            profile,
        }
    }

    /// Fetch project metadata. None on 404 (candidate does not exist).
    async fn project(&self, name: &str) -> Result<Option<ProjectInfo>> {
        let resp = self
            .client
            .get(format!("{BASE_URL}/{name}/json"))
            .send()
            .await
            .context("PyPI request failed")?;

        if resp.status().as_u16() == 404 {
            return Ok(None);
        }
        let resp = resp
            .error_for_status()
            .context("PyPI returned an error status")?;

        let data: ProjectResponse = resp.json().await.context("Failed to parse PyPI response")?;
        Ok(Some(data.info))
    }
}

/// Extract the bare distribution name from a PEP 508 requirement string
/// ("anthropic (>=0.3); extra == 'ai'" -> "anthropic").
fn requirement_name(requirement: &str) -> &str {
    let end = requirement
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.'))
        .unwrap_or(requirement.len());
    &requirement[..end]
}

#[async_trait]
impl SourceAdapter for PypiAdapter {
    fn source(&self) -> SourceId {
        SourceId::Pypi
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(15)
    }

    async fn fetch(&self, company: &CompanyRef) -> Result<Vec<RawFinding>> {
        let mut findings = Vec::new();

        for candidate in company.package_candidates().into_iter().take(MAX_CANDIDATES) {
            let Some(info) = self.project(&candidate).await? else {
                continue;
            };
            debug!(company = company.name.as_str(), distribution = info.name.as_str(), "Found PyPI distribution");

            let target = self.profile.pypi_package.to_lowercase();
            let depends = info
                .requires_dist
                .as_deref()
                .unwrap_or_default()
                .iter()
                .any(|req| requirement_name(req).to_lowercase() == target);

            if depends {
                findings.push(RawFinding {
                    source: SourceId::Pypi,
                    title: info.name.clone(),
                    url: format!("https://pypi.org/project/{}/", info.name),
                    snippet: format!("{} requires {}", info.name, self.profile.pypi_package),
                    path: None,
                    repo: None,
                    matched: Some(self.profile.pypi_package.to_string()),
                });
            }
        }

        Ok(findings)
    }

    async fn ping(&self) -> Result<()> {
        // pip is guaranteed to exist; any 200 means the JSON API is up.
        self.client
            .get(format!("{BASE_URL}/pip/json"))
            .send()
            .await
            .context("PyPI unreachable")?
            .error_for_status()
            .context("PyPI returned an error status")?;
        Ok(())
    }
}
