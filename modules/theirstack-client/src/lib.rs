pub mod error;
pub mod types;

pub use error::{Result, TheirStackError};
pub use types::{JobPosting, JobSearchRequest, JobSearchResponse, OrderBy};

use std::time::Duration;

const BASE_URL: &str = "https://api.theirstack.com/v1";

pub struct TheirStackClient {
    client: reqwest::Client,
    api_key: String,
}

impl TheirStackClient {
    pub fn new(api_key: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            api_key: api_key.to_string(),
        }
    }

    /// Search job postings.
    pub async fn search_jobs(&self, request: &JobSearchRequest) -> Result<Vec<JobPosting>> {
        tracing::debug!(
            patterns = request.job_description_pattern_or.len(),
            posted_after = request.posted_at_gte.as_str(),
            "TheirStack job search"
        );

        let resp = self
            .client
            .post(format!("{BASE_URL}/jobs/search"))
            .bearer_auth(&self.api_key)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(TheirStackError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let data: JobSearchResponse = resp.json().await?;
        Ok(data.data)
    }

    /// Hit the technologies listing with `limit=1` as a cheap auth +
    /// reachability probe.
    pub async fn probe(&self) -> Result<()> {
        let resp = self
            .client
            .get(format!("{BASE_URL}/technologies"))
            .bearer_auth(&self.api_key)
            .query(&[("limit", "1")])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(TheirStackError::Api {
                status: status.as_u16(),
                message: body,
            });
        }
        Ok(())
    }
}
