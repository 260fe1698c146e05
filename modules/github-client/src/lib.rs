pub mod error;
pub mod types;

pub use error::{GithubError, Result};
pub use types::{
    CodeSearchItem, CodeSearchResults, OrgInfo, OwnerRef, RateLimit, RepoRef,
};

use std::time::Duration;

const BASE_URL: &str = "https://api.github.com";
const USER_AGENT: &str = "adoptsignal";

pub struct GithubClient {
    client: reqwest::Client,
    token: Option<String>,
}

impl GithubClient {
    pub fn new(token: Option<&str>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            token: token.map(String::from),
        }
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    fn request(&self, url: &str) -> reqwest::RequestBuilder {
        let mut req = self
            .client
            .get(url)
            .header("Accept", "application/vnd.github.v3+json");
        if let Some(ref token) = self.token {
            req = req.header("Authorization", format!("token {token}"));
        }
        req
    }

    /// Run one code-search query. 403 is surfaced as `RateLimited` so callers
    /// can back off instead of treating it as a hard API failure.
    pub async fn code_search(&self, query: &str, per_page: u32) -> Result<CodeSearchResults> {
        tracing::debug!(query, per_page, "GitHub code search");

        let per_page = per_page.to_string();
        let resp = self
            .request(&format!("{BASE_URL}/search/code"))
            .query(&[("q", query), ("per_page", per_page.as_str())])
            .send()
            .await?;

        let status = resp.status();
        if status.as_u16() == 403 {
            let body = resp.text().await.unwrap_or_default();
            return Err(GithubError::RateLimited(body));
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(GithubError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let results: CodeSearchResults = resp.json().await?;
        Ok(results)
    }

    /// Look up an organization. Returns `None` on 404 (the org simply does
    /// not exist under that login).
    pub async fn get_org(&self, org: &str) -> Result<Option<OrgInfo>> {
        let resp = self
            .request(&format!("{BASE_URL}/orgs/{org}"))
            .send()
            .await?;

        let status = resp.status();
        if status.as_u16() == 404 {
            return Ok(None);
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(GithubError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let info: OrgInfo = resp.json().await?;
        Ok(Some(info))
    }

    /// Fetch current rate-limit buckets. Cheap, does not count against the
    /// search quota; used as the reachability probe.
    pub async fn rate_limit(&self) -> Result<RateLimit> {
        let resp = self
            .request(&format!("{BASE_URL}/rate_limit"))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(GithubError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let limits: RateLimit = resp.json().await?;
        Ok(limits)
    }
}
