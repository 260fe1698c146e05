// Test mocks for the scan pipeline.
//
// MockAdapter implements the SourceAdapter boundary with canned behavior per
// company: findings, a failure, or a hang (to exercise the orchestrator's
// timeout handling). No network, no credentials.

use std::collections::HashMap;
use std::time::Duration;

use anyhow::{bail, Result};
use async_trait::async_trait;

use adoptsignal_common::{CompanyRef, RawFinding, SourceId};

use crate::adapters::SourceAdapter;

enum Behavior {
    Findings(Vec<RawFinding>),
    Fail(String),
    /// Sleep past any timeout the orchestrator applies.
    Hang,
}

/// Canned-response adapter. Builder pattern:
/// `.on_company()`, `.failing()`, `.hanging()`, `.unconfigured()`.
pub struct MockAdapter {
    source: SourceId,
    configured: bool,
    timeout: Duration,
    by_company: HashMap<String, Behavior>,
    default: Behavior,
}

impl MockAdapter {
    pub fn new(source: SourceId) -> Self {
        Self {
            source,
            configured: true,
            timeout: Duration::from_secs(5),
            by_company: HashMap::new(),
            default: Behavior::Findings(Vec::new()),
        }
    }

    /// Return these findings for one specific company.
    pub fn on_company(mut self, name: &str, findings: Vec<RawFinding>) -> Self {
        self.by_company
            .insert(name.to_string(), Behavior::Findings(findings));
        self
    }

    /// Fail every fetch with this message.
    pub fn failing(mut self, message: &str) -> Self {
        self.default = Behavior::Fail(message.to_string());
        self
    }

    /// Hang until the orchestrator's timeout fires.
    pub fn hanging(mut self) -> Self {
        self.default = Behavior::Hang;
        self
    }

    pub fn unconfigured(mut self) -> Self {
        self.configured = false;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Convenience constructor for a finding that the extractor will classify.
pub fn finding(source: SourceId, url: &str, matched: &str) -> RawFinding {
    RawFinding {
        source,
        title: url.to_string(),
        url: url.to_string(),
        snippet: String::new(),
        path: None,
        repo: None,
        matched: Some(matched.to_string()),
    }
}

#[async_trait]
impl SourceAdapter for MockAdapter {
    fn source(&self) -> SourceId {
        self.source
    }

    fn configured(&self) -> bool {
        self.configured
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn fetch(&self, company: &CompanyRef) -> Result<Vec<RawFinding>> {
        let behavior = self
            .by_company
            .get(&company.name)
            .unwrap_or(&self.default);
        match behavior {
            Behavior::Findings(findings) => Ok(findings.clone()),
            Behavior::Fail(message) => bail!("{message}"),
            Behavior::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(Vec::new())
            }
        }
    }

    async fn ping(&self) -> Result<()> {
        match &self.default {
            Behavior::Fail(message) => bail!("{message}"),
            Behavior::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(())
            }
            Behavior::Findings(_) => Ok(()),
        }
    }
}
