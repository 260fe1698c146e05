// Trait boundary for the six source adapters.
//
// Each adapter wraps one external API and returns normalized RawFindings.
// The orchestrator only sees this trait, which is what lets the integration
// tests run against HashMap-backed mocks: no network, no credentials.

pub mod github;
pub mod hackernews;
pub mod jobs;
pub mod npm;
pub mod pypi;
pub mod websearch;

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;

use adoptsignal_common::{CompanyRef, RawFinding, SourceId};

pub use github::GithubAdapter;
pub use hackernews::HackerNewsAdapter;
pub use jobs::JobsAdapter;
pub use npm::NpmAdapter;
pub use pypi::PypiAdapter;
pub use websearch::WebSearchAdapter;

#[async_trait]
pub trait SourceAdapter: Send + Sync {
    fn source(&self) -> SourceId;

    /// Whether the adapter has the credentials it needs. Unconfigured
    /// adapters are skipped by default scans and report unconfigured (not
    /// failed) in the status probe.
    fn configured(&self) -> bool {
        true
    }

    /// Per-call budget enforced by the orchestrator. Exceeding it counts as
    /// a source failure, never a scan failure.
    fn timeout(&self) -> Duration;

    /// Query the external API for raw adoption evidence for one company.
    async fn fetch(&self, company: &CompanyRef) -> Result<Vec<RawFinding>>;

    /// Cheap reachability probe for the status tool.
    async fn ping(&self) -> Result<()>;
}

/// Truncate to at most `max` bytes on a char boundary, for evidence snippets.
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    s[..end].to_string()
}
