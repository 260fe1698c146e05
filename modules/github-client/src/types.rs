use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct CodeSearchResults {
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub items: Vec<CodeSearchItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CodeSearchItem {
    pub path: String,
    #[serde(default)]
    pub html_url: String,
    pub repository: RepoRef,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RepoRef {
    pub full_name: String,
    #[serde(default)]
    pub html_url: String,
    #[serde(default)]
    pub description: Option<String>,
    pub owner: OwnerRef,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwnerRef {
    pub login: String,
    /// "User" or "Organization".
    #[serde(rename = "type", default)]
    pub owner_type: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrgInfo {
    #[serde(default)]
    pub login: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub blog: Option<String>,
    #[serde(default)]
    pub public_repos: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RateLimit {
    pub resources: RateLimitResources,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitResources {
    pub search: RateLimitBucket,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitBucket {
    pub limit: u32,
    pub remaining: u32,
}
