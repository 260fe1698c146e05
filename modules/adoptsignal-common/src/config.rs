use std::env;

/// Application configuration loaded from environment variables.
///
/// Source credentials are optional: a missing key disables that source's
/// adapter (it reports unconfigured, not failed). Sources without credentials
/// (Hacker News, npm, PyPI) are always available.
#[derive(Debug, Clone)]
pub struct Config {
    /// GitHub personal access token for code search.
    pub github_token: Option<String>,
    /// TheirStack API key for job-posting search.
    pub theirstack_api_key: Option<String>,
    /// Serper API key for web search.
    pub serper_api_key: Option<String>,

    /// Which product profile to track (default "claude").
    pub product: String,

    // Web server
    pub api_host: String,
    pub api_port: u16,
}

impl Config {
    /// Load configuration from environment variables. All credentials are
    /// optional; only a malformed port is fatal.
    pub fn from_env() -> Self {
        Self {
            github_token: optional_env("GITHUB_TOKEN"),
            theirstack_api_key: optional_env("THEIRSTACK_API_KEY"),
            serper_api_key: optional_env("SERPER_API_KEY"),
            product: env::var("PRODUCT").unwrap_or_else(|_| "claude".to_string()),
            api_host: env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            api_port: env::var("API_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .expect("API_PORT must be a number"),
        }
    }

    /// Log which credentials are present without printing their values.
    pub fn log_redacted(&self) {
        tracing::info!(
            github = self.github_token.is_some(),
            theirstack = self.theirstack_api_key.is_some(),
            serper = self.serper_api_key.is_some(),
            product = self.product.as_str(),
            "Config loaded"
        );
    }
}

fn optional_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
