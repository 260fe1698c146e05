use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use adoptsignal_common::{CompanyRef, RawFinding, SourceId};

use crate::product::ProductProfile;

use super::SourceAdapter;

const SERPER_URL: &str = "https://google.serper.dev/search";
const RESULTS_PER_QUERY: usize = 10;

#[derive(Debug, Deserialize)]
struct SerperResponse {
    #[serde(default)]
    organic: Vec<SerperResult>,
}

#[derive(Debug, Deserialize)]
struct SerperResult {
    #[serde(default)]
    link: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    snippet: String,
}

/// Serper (Google Search) adapter covering the three text-mention signal
/// shapes: engineering blogs, professional-network posts, and news.
pub struct WebSearchAdapter {
    client: reqwest::Client,
    api_key: Option<String>,
    profile: ProductProfile,
}

impl WebSearchAdapter {
    pub fn new(api_key: Option<&str>, profile: ProductProfile) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .expect("Failed to build HTTP client"),
            api_key: api_key.map(String::from),
            profile,
        }
    }

    async fn search(&self, query: &str) -> Result<Vec<SerperResult>> {
        let api_key = self
            .api_key
            .as_deref()
            .context("Serper API key not configured")?;

        let body = serde_json::json!({
            "q": query,
            "num": RESULTS_PER_QUERY,
        });

        let resp = self
            .client
            .post(SERPER_URL)
            .header("X-API-KEY", api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .context("Serper API request failed")?;

        let data: SerperResponse = resp
            .json()
            .await
            .context("Failed to parse Serper response")?;
        Ok(data.organic)
    }

    /// One query per mention shape. The extractor classifies hits by URL, so
    /// a blog post surfaced by the news query still lands in the right kind.
    fn queries(&self, company: &CompanyRef) -> Vec<String> {
        let product = self.profile.name;
        let name = &company.name;
        vec![
            format!("\"{name}\" \"{product}\" engineering blog"),
            format!("site:linkedin.com/posts \"{name}\" \"{product}\""),
            format!("\"{name}\" \"{product}\" news"),
        ]
    }
}

#[async_trait]
impl SourceAdapter for WebSearchAdapter {
    fn source(&self) -> SourceId {
        SourceId::WebSearch
    }

    fn configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(30)
    }

    async fn fetch(&self, company: &CompanyRef) -> Result<Vec<RawFinding>> {
        let mut findings = Vec::new();
        let mut first_error = None;

        for query in self.queries(company) {
            match self.search(&query).await {
                Ok(results) => {
                    debug!(query = query.as_str(), count = results.len(), "Web search");
                    for r in results {
                        let text = format!("{} {}", r.title, r.snippet);
                        findings.push(RawFinding {
                            source: SourceId::WebSearch,
                            title: r.title,
                            url: r.link,
                            snippet: r.snippet,
                            path: None,
                            repo: None,
                            matched: self.profile.matched_keyword(&text).map(String::from),
                        });
                    }
                }
                Err(e) => {
                    warn!(query = query.as_str(), error = %e, "Web search query failed");
                    first_error.get_or_insert(e);
                }
            }
        }

        // All queries failing is a source failure; partial results are fine.
        if findings.is_empty() {
            if let Some(e) = first_error {
                return Err(e);
            }
        }
        Ok(findings)
    }

    async fn ping(&self) -> Result<()> {
        self.search("ping").await?;
        Ok(())
    }
}
