use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use adoptsignal_common::{CompanyRef, RawFinding, SourceId};

use crate::product::ProductProfile;

use super::SourceAdapter;

const REGISTRY_URL: &str = "https://registry.npmjs.org";
const SEARCH_SIZE: u32 = 20;
/// Manifest fetches per scan; each is one extra round trip.
const MAX_MANIFEST_FETCHES: usize = 10;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    objects: Vec<SearchObject>,
}

#[derive(Debug, Deserialize)]
struct SearchObject {
    package: PackageSummary,
}

#[derive(Debug, Deserialize)]
struct PackageSummary {
    name: String,
}

#[derive(Debug, Deserialize)]
struct Manifest {
    #[serde(default)]
    dependencies: std::collections::HashMap<String, String>,
    #[serde(default, rename = "devDependencies")]
    dev_dependencies: std::collections::HashMap<String, String>,
}

/// Finds packages published under the company's npm scope that depend on the
/// product SDK. Public registry endpoints, no credential.
pub struct NpmAdapter {
    client: reqwest::Client,
    profile: ProductProfile,
}

impl NpmAdapter {
    pub fn new(profile: ProductProfile) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(15))
                .build()
                .expect("Failed to build HTTP client"),
            profile,
        }
    }

    async fn search_scope(&self, scope: &str) -> Result<Vec<String>> {
        let resp = self
            .client
            .get(format!("{REGISTRY_URL}/-/v1/search"))
            .query(&[
                ("text", format!("scope:{scope}")),
                ("size", SEARCH_SIZE.to_string()),
            ])
            .send()
            .await
            .context("npm search request failed")?;

        let data: SearchResponse = resp.json().await.context("Failed to parse npm search")?;
        Ok(data.objects.into_iter().map(|o| o.package.name).collect())
    }

    /// Fetch the latest manifest for a package. Scoped names hold a slash
    /// that must be percent-encoded in the registry path.
    async fn latest_manifest(&self, package: &str) -> Result<Manifest> {
        let encoded = package.replace('/', "%2F");
        let resp = self
            .client
            .get(format!("{REGISTRY_URL}/{encoded}/latest"))
            .send()
            .await
            .context("npm manifest request failed")?;

        let manifest: Manifest = resp
            .json()
            .await
            .context("Failed to parse npm manifest")?;
        Ok(manifest)
    }
}

#[async_trait]
impl SourceAdapter for NpmAdapter {
    fn source(&self) -> SourceId {
        SourceId::Npm
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(15)
    }

    async fn fetch(&self, company: &CompanyRef) -> Result<Vec<RawFinding>> {
        let scope = company.slug();
        let packages = self.search_scope(&scope).await?;
        debug!(company = company.name.as_str(), scope = scope.as_str(), packages = packages.len(), "npm scope search");

        let mut findings = Vec::new();
        for package in packages.into_iter().take(MAX_MANIFEST_FETCHES) {
            let manifest = match self.latest_manifest(&package).await {
                Ok(m) => m,
                Err(e) => {
                    warn!(package = package.as_str(), error = %e, "Skipping npm manifest");
                    continue;
                }
            };

            let dep = self.profile.npm_package;
            if manifest.dependencies.contains_key(dep)
                || manifest.dev_dependencies.contains_key(dep)
            {
                findings.push(RawFinding {
                    source: SourceId::Npm,
                    title: package.clone(),
                    url: format!("https://www.npmjs.com/package/{package}"),
                    snippet: format!("{package} depends on {dep}"),
                    path: None,
                    repo: None,
                    matched: Some(dep.to_string()),
                });
            }
        }

        Ok(findings)
    }

    async fn ping(&self) -> Result<()> {
        self.client
            .get(format!("{REGISTRY_URL}/-/v1/search"))
            .query(&[("text", "test"), ("size", "1")])
            .send()
            .await
            .context("npm registry unreachable")?
            .error_for_status()
            .context("npm registry returned an error status")?;
        Ok(())
    }
}
