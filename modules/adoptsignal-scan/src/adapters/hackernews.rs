use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use adoptsignal_common::{CompanyRef, RawFinding, SourceId};

use crate::product::ProductProfile;

use super::{truncate, SourceAdapter};

const BASE_URL: &str = "https://hn.algolia.com/api/v1";
const HITS_PER_PAGE: u32 = 20;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    hits: Vec<Hit>,
}

#[derive(Debug, Deserialize)]
struct Hit {
    #[serde(rename = "objectID")]
    object_id: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    story_text: Option<String>,
    #[serde(default)]
    comment_text: Option<String>,
}

/// Algolia-backed Hacker News search. No credential required.
pub struct HackerNewsAdapter {
    client: reqwest::Client,
    profile: ProductProfile,
}

impl HackerNewsAdapter {
    pub fn new(profile: ProductProfile) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .expect("Failed to build HTTP client"),
            profile,
        }
    }

    async fn search(&self, query: &str) -> Result<Vec<Hit>> {
        let hits_per_page = HITS_PER_PAGE.to_string();
        let resp = self
            .client
            .get(format!("{BASE_URL}/search"))
            .query(&[
                ("query", query),
                ("tags", "(story,comment)"),
                ("hitsPerPage", hits_per_page.as_str()),
            ])
            .send()
            .await
            .context("Hacker News search request failed")?;

        let data: SearchResponse = resp
            .json()
            .await
            .context("Failed to parse Hacker News response")?;
        Ok(data.hits)
    }
}

#[async_trait]
impl SourceAdapter for HackerNewsAdapter {
    fn source(&self) -> SourceId {
        SourceId::HackerNews
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(10)
    }

    async fn fetch(&self, company: &CompanyRef) -> Result<Vec<RawFinding>> {
        let query = format!("{} {}", company.name, self.profile.name);
        let hits = self.search(&query).await?;
        debug!(company = company.name.as_str(), hits = hits.len(), "Hacker News search");

        let company_lower = company.name.to_lowercase();
        let findings = hits
            .into_iter()
            .filter_map(|hit| {
                let title = hit.title.unwrap_or_default();
                let body = hit.story_text.or(hit.comment_text).unwrap_or_default();
                let text = format!("{title} {body}");
                // Algolia matches loosely; require the company to actually
                // appear before handing the hit to the extractor.
                if !text.to_lowercase().contains(&company_lower) {
                    return None;
                }
                let discussion_url =
                    format!("https://news.ycombinator.com/item?id={}", hit.object_id);
                Some(RawFinding {
                    source: SourceId::HackerNews,
                    title: if title.is_empty() { discussion_url.clone() } else { title },
                    url: hit.url.unwrap_or(discussion_url),
                    snippet: truncate(&body, 300),
                    path: None,
                    repo: None,
                    matched: self.profile.matched_keyword(&text).map(String::from),
                })
            })
            .collect();

        Ok(findings)
    }

    async fn ping(&self) -> Result<()> {
        self.client
            .get(format!("{BASE_URL}/search"))
            .query(&[("query", "test"), ("hitsPerPage", "1")])
            .send()
            .await
            .context("Hacker News unreachable")?
            .error_for_status()
            .context("Hacker News returned an error status")?;
        Ok(())
    }
}
