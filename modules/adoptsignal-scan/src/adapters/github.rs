use std::time::Duration;

use anyhow::{bail, Result};
use async_trait::async_trait;
use tracing::{debug, warn};

use adoptsignal_common::{CompanyRef, RawFinding, SourceId};
use github_client::{GithubClient, GithubError};

use crate::product::ProductProfile;

use super::SourceAdapter;

/// Max hits kept per code-search query.
const PER_PAGE: u32 = 5;

/// Org-scoped code search for config files, SDK references, and credential
/// env vars. The org is resolved by probing name variations, the same way a
/// human would guess "Acme Corp" -> acmecorp, acme-corp, acmehq.
pub struct GithubAdapter {
    client: GithubClient,
    profile: ProductProfile,
}

impl GithubAdapter {
    pub fn new(token: Option<&str>, profile: ProductProfile) -> Self {
        Self {
            client: GithubClient::new(token),
            profile,
        }
    }

    /// Probe org-name candidates until one exists. None if the company has
    /// no discoverable GitHub org (a no-evidence outcome, not a failure).
    async fn resolve_org(&self, company: &CompanyRef) -> Result<Option<String>> {
        for candidate in company.org_candidates() {
            match self.client.get_org(&candidate).await {
                Ok(Some(_)) => {
                    debug!(company = company.name.as_str(), org = candidate.as_str(), "Resolved GitHub org");
                    return Ok(Some(candidate));
                }
                Ok(None) => continue,
                Err(e) => bail!("org lookup failed for {candidate}: {e}"),
            }
        }
        Ok(None)
    }

    /// The org-scoped query set, strongest signal first.
    fn queries(&self, org: &str) -> Vec<String> {
        let mut queries = Vec::new();
        for cf in &self.profile.config_file_names {
            queries.push(format!("org:{org} filename:{cf}"));
        }
        queries.push(format!("org:{org} \"{}\"", self.profile.npm_package));
        if let Some(pattern) = self.profile.sdk_import_patterns.first() {
            queries.push(format!("org:{org} \"{pattern}\""));
        }
        if let Some(key) = self.profile.env_keys.first() {
            queries.push(format!("org:{org} {key}"));
        }
        queries
    }
}

#[async_trait]
impl SourceAdapter for GithubAdapter {
    fn source(&self) -> SourceId {
        SourceId::Github
    }

    fn configured(&self) -> bool {
        // Anonymous search is allowed upstream but rate-limited to the point
        // of uselessness, so the adapter requires a token.
        self.client.has_token()
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(30)
    }

    async fn fetch(&self, company: &CompanyRef) -> Result<Vec<RawFinding>> {
        let Some(org) = self.resolve_org(company).await? else {
            debug!(company = company.name.as_str(), "No GitHub org found");
            return Ok(Vec::new());
        };

        let mut findings = Vec::new();
        for query in self.queries(&org) {
            let results = match self.client.code_search(&query, PER_PAGE).await {
                Ok(r) => r,
                Err(GithubError::RateLimited(msg)) => {
                    bail!("GitHub search rate limited: {msg}");
                }
                Err(e) => {
                    warn!(query = query.as_str(), error = %e, "Code search query failed, continuing");
                    continue;
                }
            };

            for item in results.items {
                findings.push(RawFinding {
                    source: SourceId::Github,
                    title: item.repository.full_name.clone(),
                    url: item.html_url,
                    snippet: String::new(),
                    path: Some(item.path),
                    repo: Some(item.repository.full_name),
                    matched: Some(query.clone()),
                });
            }
        }

        Ok(findings)
    }

    async fn ping(&self) -> Result<()> {
        self.client.rate_limit().await?;
        Ok(())
    }
}
