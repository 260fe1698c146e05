use std::collections::BTreeSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// --- Enums ---

/// The six external data sources a scan can query.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum SourceId {
    Github,
    HackerNews,
    Npm,
    Pypi,
    WebSearch,
    Jobs,
}

impl SourceId {
    pub const ALL: [SourceId; 6] = [
        SourceId::Github,
        SourceId::HackerNews,
        SourceId::Npm,
        SourceId::Pypi,
        SourceId::WebSearch,
        SourceId::Jobs,
    ];

    /// The fixed high-signal subset used by the fast-path check.
    pub const FAST_PATH: [SourceId; 3] = [SourceId::Github, SourceId::Npm, SourceId::Pypi];

    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "github" => Some(Self::Github),
            "hackernews" | "hacker_news" | "hn" => Some(Self::HackerNews),
            "npm" => Some(Self::Npm),
            "pypi" => Some(Self::Pypi),
            "websearch" | "web_search" | "web" => Some(Self::WebSearch),
            "jobs" | "job_postings" => Some(Self::Jobs),
            _ => None,
        }
    }
}

impl std::fmt::Display for SourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceId::Github => write!(f, "github"),
            SourceId::HackerNews => write!(f, "hacker_news"),
            SourceId::Npm => write!(f, "npm"),
            SourceId::Pypi => write!(f, "pypi"),
            SourceId::WebSearch => write!(f, "web_search"),
            SourceId::Jobs => write!(f, "jobs"),
        }
    }
}

impl std::error::Error for SourceId {}

/// What kind of adoption evidence a signal carries. Each kind maps to exactly
/// one weight in the fixed table (`scoring`).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    /// Product config file found in a source repository.
    ConfigFileMatch,
    /// Package on the npm registry depends on the product SDK.
    NpmDependency,
    /// Distribution on PyPI depends on the product SDK.
    PypiDependency,
    /// Product SDK imported or referenced in source code.
    SdkUsage,
    /// Mention on the company's engineering blog.
    EngineeringBlog,
    /// Employee post on a professional network.
    EmployeePost,
    /// Credential / API-key environment variable referenced in code.
    ApiKeyReference,
    /// Mention in a job posting.
    JobPosting,
    /// Mention in a news article.
    NewsArticle,
    /// Mention on a discussion forum.
    ForumMention,
}

impl std::fmt::Display for SignalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SignalKind::ConfigFileMatch => write!(f, "config_file_match"),
            SignalKind::NpmDependency => write!(f, "npm_dependency"),
            SignalKind::PypiDependency => write!(f, "pypi_dependency"),
            SignalKind::SdkUsage => write!(f, "sdk_usage"),
            SignalKind::EngineeringBlog => write!(f, "engineering_blog"),
            SignalKind::EmployeePost => write!(f, "employee_post"),
            SignalKind::ApiKeyReference => write!(f, "api_key_reference"),
            SignalKind::JobPosting => write!(f, "job_posting"),
            SignalKind::NewsArticle => write!(f, "news_article"),
            SignalKind::ForumMention => write!(f, "forum_mention"),
        }
    }
}

/// Four ordered confidence tiers derived from the numeric score.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Low => write!(f, "low"),
            Verdict::Medium => write!(f, "medium"),
            Verdict::High => write!(f, "high"),
            Verdict::VeryHigh => write!(f, "very_high"),
        }
    }
}

// --- Signal ---

/// One normalized piece of adoption evidence. Immutable once created; the
/// weight is copied from the fixed kind table at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Signal {
    pub kind: SignalKind,
    pub source: SourceId,
    pub weight: u32,
    /// URL or other evidence pointer for display.
    pub evidence: String,
    pub company: String,
}

impl Signal {
    pub fn new(kind: SignalKind, source: SourceId, evidence: &str, company: &str) -> Self {
        Self {
            kind,
            source,
            weight: kind.weight(),
            evidence: evidence.to_string(),
            company: company.to_string(),
        }
    }
}

// --- Raw findings ---

/// One raw hit from a source adapter, before classification. Evidence snippet
/// plus whatever source-specific metadata the API returned.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RawFinding {
    pub source: SourceId,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub snippet: String,
    /// File path within a repository (GitHub findings).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Repository full name (GitHub findings).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,
    /// The query or pattern that produced this hit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched: Option<String>,
}

// --- Company identity ---

/// A company to scan, identified by name and optionally domain / GitHub org.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CompanyRef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_org: Option<String>,
}

impl CompanyRef {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            domain: None,
            github_org: None,
        }
    }

    /// Compact slug: lowercased with spaces, hyphens, and dots stripped.
    pub fn slug(&self) -> String {
        self.name
            .to_lowercase()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '.'))
            .collect()
    }

    /// Candidate GitHub org names, most likely first. An explicit org wins;
    /// otherwise probe the same name variations the registry adapters use.
    pub fn org_candidates(&self) -> Vec<String> {
        if let Some(org) = &self.github_org {
            return vec![org.clone()];
        }

        let lower = self.name.to_lowercase();
        let mut candidates = vec![
            self.slug(),
            lower.clone(),
            lower.replace(' ', "-"),
            format!("{}hq", self.slug()),
            format!("{}-inc", lower.replace(' ', "-")),
        ];
        if let Some(stem) = self.domain_stem() {
            candidates.push(stem);
        }

        let mut seen = std::collections::HashSet::new();
        candidates.retain(|c| !c.is_empty() && seen.insert(c.clone()));
        candidates
    }

    /// Candidate PyPI distribution names derived from the company identity.
    pub fn package_candidates(&self) -> Vec<String> {
        let lower = self.name.to_lowercase();
        let mut candidates = vec![self.slug(), lower.replace(' ', "-")];
        if let Some(stem) = self.domain_stem() {
            candidates.push(stem);
        }

        let mut seen = std::collections::HashSet::new();
        candidates.retain(|c| !c.is_empty() && seen.insert(c.clone()));
        candidates
    }

    /// The bare domain with scheme, `www.`, and TLD stripped
    /// ("https://www.stripe.com" -> "stripe").
    fn domain_stem(&self) -> Option<String> {
        let domain = self.domain.as_deref()?;
        let host = domain
            .split("://")
            .last()
            .unwrap_or(domain)
            .trim_start_matches("www.")
            .split('/')
            .next()
            .unwrap_or("");
        let stem = host.split('.').next().unwrap_or("");
        if stem.is_empty() {
            None
        } else {
            Some(stem.to_lowercase())
        }
    }
}

// --- Scan result ---

/// The outcome of one scan for one company. Constructed once by the
/// aggregator, returned to the caller, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ScanResult {
    pub company: String,
    /// Deduplicated signals in first-seen order.
    pub signals: Vec<Signal>,
    pub score: u32,
    pub verdict: Verdict,
    /// Sources whose adapters were actually invoked.
    pub sources_queried: BTreeSet<SourceId>,
    /// Sources whose adapters errored or timed out. Disjoint from "queried
    /// and found nothing" — consumers must not conflate the two.
    pub sources_failed: BTreeSet<SourceId>,
}

// --- Source status ---

/// Per-source health as reported by the status probe.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema)]
pub struct SourceStatus {
    pub configured: bool,
    pub reachable: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_strips_separators() {
        let c = CompanyRef::named("Acme Data-Works Inc.");
        assert_eq!(c.slug(), "acmedataworksinc");
    }

    #[test]
    fn explicit_org_short_circuits_candidates() {
        let c = CompanyRef {
            name: "Stripe".to_string(),
            domain: Some("stripe.com".to_string()),
            github_org: Some("stripe".to_string()),
        };
        assert_eq!(c.org_candidates(), vec!["stripe".to_string()]);
    }

    #[test]
    fn org_candidates_include_domain_stem() {
        let c = CompanyRef {
            name: "Example Co".to_string(),
            domain: Some("https://www.widgets.io/about".to_string()),
            github_org: None,
        };
        let candidates = c.org_candidates();
        assert!(candidates.contains(&"exampleco".to_string()));
        assert!(candidates.contains(&"example-co".to_string()));
        assert!(candidates.contains(&"widgets".to_string()));
    }

    #[test]
    fn org_candidates_deduped() {
        let c = CompanyRef::named("stripe");
        let candidates = c.org_candidates();
        let unique: std::collections::HashSet<_> = candidates.iter().collect();
        assert_eq!(candidates.len(), unique.len());
    }

    #[test]
    fn source_id_round_trips_loose_parse() {
        for id in SourceId::ALL {
            assert_eq!(SourceId::from_str_loose(&id.to_string()), Some(id));
        }
        assert_eq!(SourceId::from_str_loose("hn"), Some(SourceId::HackerNews));
        assert_eq!(SourceId::from_str_loose("bogus"), None);
    }

    #[test]
    fn signal_new_fills_weight_from_table() {
        let s = Signal::new(
            SignalKind::ConfigFileMatch,
            SourceId::Github,
            "https://github.com/acme/app",
            "acme",
        );
        assert_eq!(s.weight, 40);
    }

    #[test]
    fn verdict_serializes_snake_case() {
        let json = serde_json::to_string(&Verdict::VeryHigh).unwrap();
        assert_eq!(json, "\"very_high\"");
    }
}
