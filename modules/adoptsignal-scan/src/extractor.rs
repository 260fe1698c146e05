//! Classification of raw findings into canonical signals.
//!
//! Pure functions: same finding, same profile, same kind. Findings that match
//! no known pattern are dropped and logged at debug level.
//!
//! Precedence for findings that could match more than one kind:
//! - GitHub: config-file match, then SDK usage, then API-key reference.
//! - Web search: employee post (professional-network URL), then engineering
//!   blog (company domain or blog/engineering URL), then news article.
//! The remaining sources each map to a single kind.

use tracing::debug;

use adoptsignal_common::{CompanyRef, RawFinding, Signal, SignalKind, SourceId};

use crate::product::ProductProfile;

/// Classify one adapter's findings into signals, preserving adapter order.
pub fn extract(
    company: &CompanyRef,
    profile: &ProductProfile,
    findings: &[RawFinding],
) -> Vec<Signal> {
    findings
        .iter()
        .filter_map(|finding| {
            let Some(kind) = classify(company, profile, finding) else {
                debug!(
                    source = %finding.source,
                    url = finding.url.as_str(),
                    "Dropping unclassifiable finding"
                );
                return None;
            };
            Some(Signal::new(kind, finding.source, &finding.url, &company.name))
        })
        .collect()
}

/// The per-source classification rules. Deterministic, no I/O.
pub fn classify(
    company: &CompanyRef,
    profile: &ProductProfile,
    finding: &RawFinding,
) -> Option<SignalKind> {
    match finding.source {
        SourceId::Github => classify_github(profile, finding),
        SourceId::Npm => {
            (finding.matched.as_deref() == Some(profile.npm_package))
                .then_some(SignalKind::NpmDependency)
        }
        SourceId::Pypi => {
            (finding.matched.as_deref() == Some(profile.pypi_package))
                .then_some(SignalKind::PypiDependency)
        }
        SourceId::WebSearch => classify_web(company, profile, finding),
        SourceId::HackerNews => {
            mentions(profile, finding).then_some(SignalKind::ForumMention)
        }
        SourceId::Jobs => mentions(profile, finding).then_some(SignalKind::JobPosting),
    }
}

fn classify_github(profile: &ProductProfile, finding: &RawFinding) -> Option<SignalKind> {
    if let Some(path) = &finding.path {
        let file_name = path.rsplit('/').next().unwrap_or(path);
        if profile.config_file_names.contains(&file_name) {
            return Some(SignalKind::ConfigFileMatch);
        }
    }

    let matched = finding.matched.as_deref().unwrap_or_default();
    let haystack = format!("{matched} {}", finding.snippet);
    if haystack.contains(profile.npm_package)
        || profile.sdk_import_patterns.iter().any(|p| haystack.contains(p))
    {
        return Some(SignalKind::SdkUsage);
    }
    if profile.env_keys.iter().any(|k| haystack.contains(k)) {
        return Some(SignalKind::ApiKeyReference);
    }
    None
}

fn classify_web(
    company: &CompanyRef,
    profile: &ProductProfile,
    finding: &RawFinding,
) -> Option<SignalKind> {
    if !mentions(profile, finding) {
        return None;
    }

    let url = finding.url.to_lowercase();
    if url.contains("linkedin.com") {
        return Some(SignalKind::EmployeePost);
    }

    let on_company_domain = company_host(company)
        .map(|host| url.contains(&host))
        .unwrap_or(false);
    if on_company_domain
        || url.contains("/blog")
        || url.contains("blog.")
        || url.contains("/engineering")
        || url.contains("engineering.")
    {
        return Some(SignalKind::EngineeringBlog);
    }

    Some(SignalKind::NewsArticle)
}

/// Does the finding mention the product? Adapters stamp `matched` with the
/// keyword they saw; fall back to re-scanning the text so classification
/// stays a function of the finding alone.
fn mentions(profile: &ProductProfile, finding: &RawFinding) -> bool {
    finding.matched.is_some()
        || profile.mentions_product(&format!("{} {}", finding.title, finding.snippet))
}

/// The company's bare host ("https://www.stripe.com/x" -> "stripe.com").
fn company_host(company: &CompanyRef) -> Option<String> {
    let domain = company.domain.as_deref()?;
    let host = domain
        .split("://")
        .last()
        .unwrap_or(domain)
        .trim_start_matches("www.")
        .split('/')
        .next()
        .unwrap_or("");
    if host.is_empty() {
        None
    } else {
        Some(host.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::product_profile;

    fn finding(source: SourceId) -> RawFinding {
        RawFinding {
            source,
            title: String::new(),
            url: "https://example.com/x".to_string(),
            snippet: String::new(),
            path: None,
            repo: None,
            matched: None,
        }
    }

    fn company() -> CompanyRef {
        CompanyRef {
            name: "Acme".to_string(),
            domain: Some("acme.com".to_string()),
            github_org: None,
        }
    }

    #[test]
    fn github_config_file_beats_sdk_and_key() {
        let profile = product_profile("claude");
        let mut f = finding(SourceId::Github);
        f.path = Some("tools/.mcp.json".to_string());
        // A finding that would also match the SDK and env-key rules.
        f.matched = Some("org:acme \"@anthropic-ai/sdk\" ANTHROPIC_API_KEY".to_string());
        assert_eq!(
            classify(&company(), &profile, &f),
            Some(SignalKind::ConfigFileMatch)
        );
    }

    #[test]
    fn github_sdk_beats_api_key() {
        let profile = product_profile("claude");
        let mut f = finding(SourceId::Github);
        f.path = Some("package.json".to_string());
        f.matched = Some("org:acme \"@anthropic-ai/sdk\" ANTHROPIC_API_KEY".to_string());
        assert_eq!(classify(&company(), &profile, &f), Some(SignalKind::SdkUsage));
    }

    #[test]
    fn github_api_key_alone() {
        let profile = product_profile("claude");
        let mut f = finding(SourceId::Github);
        f.path = Some(".env.example".to_string());
        f.matched = Some("org:acme ANTHROPIC_API_KEY".to_string());
        assert_eq!(
            classify(&company(), &profile, &f),
            Some(SignalKind::ApiKeyReference)
        );
    }

    #[test]
    fn github_unmatched_dropped() {
        let profile = product_profile("claude");
        let mut f = finding(SourceId::Github);
        f.path = Some("README.md".to_string());
        f.matched = Some("org:acme something-else".to_string());
        assert_eq!(classify(&company(), &profile, &f), None);
    }

    #[test]
    fn web_linkedin_beats_blog() {
        let profile = product_profile("claude");
        let mut f = finding(SourceId::WebSearch);
        f.url = "https://www.linkedin.com/posts/someone-blog".to_string();
        f.snippet = "How we use Claude at Acme".to_string();
        assert_eq!(
            classify(&company(), &profile, &f),
            Some(SignalKind::EmployeePost)
        );
    }

    #[test]
    fn web_company_domain_is_engineering_blog() {
        let profile = product_profile("claude");
        let mut f = finding(SourceId::WebSearch);
        f.url = "https://acme.com/posts/ai-rollout".to_string();
        f.snippet = "Claude in production".to_string();
        assert_eq!(
            classify(&company(), &profile, &f),
            Some(SignalKind::EngineeringBlog)
        );
    }

    #[test]
    fn web_blog_path_is_engineering_blog() {
        let profile = product_profile("claude");
        let mut f = finding(SourceId::WebSearch);
        f.url = "https://medium.com/acme-eng/blog/claude-rollout".to_string();
        f.snippet = "Anthropic models at Acme".to_string();
        assert_eq!(
            classify(&company(), &profile, &f),
            Some(SignalKind::EngineeringBlog)
        );
    }

    #[test]
    fn web_other_is_news() {
        let profile = product_profile("claude");
        let mut f = finding(SourceId::WebSearch);
        f.url = "https://techdaily.example/acme-adopts-ai".to_string();
        f.snippet = "Acme signs deal with Anthropic".to_string();
        assert_eq!(
            classify(&company(), &profile, &f),
            Some(SignalKind::NewsArticle)
        );
    }

    #[test]
    fn web_without_product_mention_dropped() {
        let profile = product_profile("claude");
        let mut f = finding(SourceId::WebSearch);
        f.url = "https://techdaily.example/acme-funding".to_string();
        f.snippet = "Acme raises a series B".to_string();
        assert_eq!(classify(&company(), &profile, &f), None);
    }

    #[test]
    fn classification_is_deterministic() {
        let profile = product_profile("claude");
        let mut f = finding(SourceId::WebSearch);
        f.url = "https://blog.example.com/post".to_string();
        f.snippet = "Claude Code rollout".to_string();
        let first = classify(&company(), &profile, &f);
        for _ in 0..10 {
            assert_eq!(classify(&company(), &profile, &f), first);
        }
    }

    #[test]
    fn extract_preserves_adapter_order_and_drops_junk() {
        let profile = product_profile("claude");
        let c = company();

        let mut good1 = finding(SourceId::HackerNews);
        good1.url = "https://news.ycombinator.com/item?id=1".to_string();
        good1.matched = Some("Claude".to_string());

        let junk = finding(SourceId::HackerNews);

        let mut good2 = finding(SourceId::HackerNews);
        good2.url = "https://news.ycombinator.com/item?id=2".to_string();
        good2.snippet = "Acme is all-in on Claude Code".to_string();

        let signals = extract(&c, &profile, &[good1, junk, good2]);
        assert_eq!(signals.len(), 2);
        assert_eq!(signals[0].evidence, "https://news.ycombinator.com/item?id=1");
        assert_eq!(signals[1].evidence, "https://news.ycombinator.com/item?id=2");
        assert!(signals.iter().all(|s| s.kind == SignalKind::ForumMention));
        assert!(signals.iter().all(|s| s.company == "Acme"));
    }
}
