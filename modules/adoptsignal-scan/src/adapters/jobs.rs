use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

use adoptsignal_common::{CompanyRef, RawFinding, SourceId};
use theirstack_client::{JobSearchRequest, TheirStackClient};

use crate::product::ProductProfile;

use super::{truncate, SourceAdapter};

/// How far back job postings are searched.
const DAYS_BACK: i64 = 30;
const RESULT_LIMIT: u32 = 100;
/// Mid-market to enterprise band, applied when no domain filter narrows the
/// search.
const MIN_EMPLOYEES: u32 = 50;
const MAX_EMPLOYEES: u32 = 10_000;

/// TheirStack job-posting search scoped to the company (by domain when known,
/// by name match otherwise).
pub struct JobsAdapter {
    client: Option<TheirStackClient>,
    profile: ProductProfile,
}

impl JobsAdapter {
    pub fn new(api_key: Option<&str>, profile: ProductProfile) -> Self {
        Self {
            client: api_key.map(TheirStackClient::new),
            profile,
        }
    }

    fn client(&self) -> Result<&TheirStackClient> {
        self.client
            .as_ref()
            .context("TheirStack API key not configured")
    }
}

#[async_trait]
impl SourceAdapter for JobsAdapter {
    fn source(&self) -> SourceId {
        SourceId::Jobs
    }

    fn configured(&self) -> bool {
        self.client.is_some()
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(60)
    }

    async fn fetch(&self, company: &CompanyRef) -> Result<Vec<RawFinding>> {
        let client = self.client()?;

        let posted_after = (Utc::now() - chrono::Duration::days(DAYS_BACK))
            .format("%Y-%m-%d")
            .to_string();
        let patterns: Vec<String> = self.profile.keywords.iter().map(|k| k.to_string()).collect();

        let request = match &company.domain {
            Some(domain) => {
                JobSearchRequest::keyword_search(patterns, &posted_after, RESULT_LIMIT)
                    .for_domain(domain)
            }
            None => JobSearchRequest::keyword_search(patterns, &posted_after, RESULT_LIMIT)
                .employees(MIN_EMPLOYEES, MAX_EMPLOYEES),
        };

        let jobs = client.search_jobs(&request).await?;
        debug!(company = company.name.as_str(), jobs = jobs.len(), "Job search");

        let name_lower = company.name.to_lowercase();
        let findings = jobs
            .into_iter()
            .filter_map(|job| {
                // Without a domain filter the API returns every matching
                // company; keep only postings from the one being scanned.
                if company.domain.is_none() {
                    let posted_by = job.company_name.as_deref().unwrap_or_default();
                    if !posted_by.to_lowercase().contains(&name_lower) {
                        return None;
                    }
                }

                let title = job.job_title.unwrap_or_default();
                let description = job.job_description.unwrap_or_default();
                let text = format!("{title} {description}");
                Some(RawFinding {
                    source: SourceId::Jobs,
                    title,
                    url: job.job_url.unwrap_or_default(),
                    snippet: truncate(&description, 300),
                    path: None,
                    repo: None,
                    matched: self.profile.matched_keyword(&text).map(String::from),
                })
            })
            .collect();

        Ok(findings)
    }

    async fn ping(&self) -> Result<()> {
        self.client()?.probe().await?;
        Ok(())
    }
}
