use std::collections::BTreeSet;

use futures::future::join_all;
use tracing::{info, warn};

use adoptsignal_common::{
    AdoptSignalError, CompanyRef, Config, RawFinding, ScanResult, SourceId, SourceStatus,
};

use crate::adapters::{
    GithubAdapter, HackerNewsAdapter, JobsAdapter, NpmAdapter, PypiAdapter, SourceAdapter,
    WebSearchAdapter,
};
use crate::aggregate::aggregate;
use crate::extractor::extract;
use crate::product::{has_profile, product_profile, ProductProfile};
use crate::status;

/// Fans a scan out over the source adapters and hands the merged signal set
/// to the aggregator. One source failing never aborts the scan; it is
/// recorded in `sources_failed` and the rest proceed.
pub struct Scanner {
    adapters: Vec<Box<dyn SourceAdapter>>,
    profile: ProductProfile,
}

impl Scanner {
    /// Build the full six-adapter scanner from configuration. Credentialed
    /// adapters are constructed unconditionally so the status tool can
    /// report them as unconfigured; default scans skip them.
    pub fn from_config(config: &Config) -> Result<Self, AdoptSignalError> {
        if !has_profile(&config.product) {
            return Err(AdoptSignalError::Config(format!(
                "unknown product profile: {}",
                config.product
            )));
        }
        let profile = product_profile(&config.product);

        let adapters: Vec<Box<dyn SourceAdapter>> = vec![
            Box::new(GithubAdapter::new(
                config.github_token.as_deref(),
                profile.clone(),
            )),
            Box::new(HackerNewsAdapter::new(profile.clone())),
            Box::new(NpmAdapter::new(profile.clone())),
            Box::new(PypiAdapter::new(profile.clone())),
            Box::new(WebSearchAdapter::new(
                config.serper_api_key.as_deref(),
                profile.clone(),
            )),
            Box::new(JobsAdapter::new(
                config.theirstack_api_key.as_deref(),
                profile.clone(),
            )),
        ];

        Ok(Self { adapters, profile })
    }

    /// Assemble a scanner from explicit adapters (tests use mocks here).
    pub fn new(adapters: Vec<Box<dyn SourceAdapter>>, profile: ProductProfile) -> Self {
        Self { adapters, profile }
    }

    fn adapter(&self, source: SourceId) -> Option<&dyn SourceAdapter> {
        self.adapters
            .iter()
            .map(|a| a.as_ref())
            .find(|a| a.source() == source)
    }

    /// Resolve a source selection to adapters, rejecting explicit requests
    /// for unconfigured sources before any network call is made.
    fn resolve(
        &self,
        sources: Option<&[SourceId]>,
    ) -> Result<Vec<&dyn SourceAdapter>, AdoptSignalError> {
        match sources {
            Some(requested) => {
                let mut resolved = Vec::new();
                let mut seen = BTreeSet::new();
                for &source in requested {
                    if !seen.insert(source) {
                        continue;
                    }
                    let adapter = self.adapter(source).ok_or_else(|| {
                        AdoptSignalError::Config(format!("no adapter for source {source}"))
                    })?;
                    if !adapter.configured() {
                        return Err(AdoptSignalError::Config(format!(
                            "source {source} is not configured"
                        )));
                    }
                    resolved.push(adapter);
                }
                Ok(resolved)
            }
            None => Ok(self
                .adapters
                .iter()
                .map(|a| a.as_ref())
                .filter(|a| a.configured())
                .collect()),
        }
    }

    /// Check a source selection without scanning. Used by the batch driver
    /// to reject a bad selection before any company is scanned.
    pub fn validate_sources(
        &self,
        sources: Option<&[SourceId]>,
    ) -> Result<(), AdoptSignalError> {
        self.resolve(sources).map(|_| ())
    }

    /// Scan one company across the requested sources (default: everything
    /// configured).
    pub async fn scan(
        &self,
        company: &CompanyRef,
        sources: Option<&[SourceId]>,
    ) -> Result<ScanResult, AdoptSignalError> {
        let adapters = self.resolve(sources)?;

        let mut sources_queried = BTreeSet::new();
        let mut sources_failed = BTreeSet::new();
        let mut signals = Vec::new();

        let fetches = adapters.iter().map(|&adapter| async move {
            let outcome =
                tokio::time::timeout(adapter.timeout(), adapter.fetch(company)).await;
            (adapter.source(), outcome)
        });

        for (source, outcome) in join_all(fetches).await {
            sources_queried.insert(source);
            match outcome {
                Ok(Ok(findings)) => {
                    let extracted = extract(company, &self.profile, &findings);
                    info!(
                        company = company.name.as_str(),
                        %source,
                        findings = findings.len(),
                        signals = extracted.len(),
                        "Source queried"
                    );
                    signals.extend(extracted);
                }
                Ok(Err(e)) => {
                    warn!(company = company.name.as_str(), %source, error = %e, "Source failed");
                    sources_failed.insert(source);
                }
                Err(_) => {
                    warn!(company = company.name.as_str(), %source, "Source timed out");
                    sources_failed.insert(source);
                }
            }
        }

        let result = aggregate(&company.name, &signals, sources_queried, sources_failed)?;
        info!(
            company = company.name.as_str(),
            score = result.score,
            verdict = %result.verdict,
            failed = result.sources_failed.len(),
            "Scan complete"
        );
        Ok(result)
    }

    /// Fast path: the fixed highest-signal subset only.
    pub async fn scan_fast(&self, company: &CompanyRef) -> Result<ScanResult, AdoptSignalError> {
        self.scan(company, Some(&SourceId::FAST_PATH)).await
    }

    /// Raw findings from a single source, for direct inspection.
    pub async fn raw_findings(
        &self,
        source: SourceId,
        company: &CompanyRef,
    ) -> Result<Vec<RawFinding>, AdoptSignalError> {
        let adapter = self
            .adapter(source)
            .ok_or_else(|| AdoptSignalError::Config(format!("no adapter for source {source}")))?;
        if !adapter.configured() {
            return Err(AdoptSignalError::Config(format!(
                "source {source} is not configured"
            )));
        }

        match tokio::time::timeout(adapter.timeout(), adapter.fetch(company)).await {
            Ok(Ok(findings)) => Ok(findings),
            Ok(Err(e)) => Err(AdoptSignalError::SourceUnavailable {
                source,
                reason: e.to_string(),
            }),
            Err(_) => Err(AdoptSignalError::SourceUnavailable {
                source,
                reason: "timed out".to_string(),
            }),
        }
    }

    /// Per-source configured/reachable status.
    pub async fn status(&self) -> std::collections::BTreeMap<SourceId, SourceStatus> {
        status::check_api_status(&self.adapters).await
    }

    pub fn profile(&self) -> &ProductProfile {
        &self.profile
    }
}
