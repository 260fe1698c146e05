/// Per-product detection profile: the keyword tiers, file names, and package
/// identifiers that every adapter and the extractor key off.
#[derive(Debug, Clone)]
pub struct ProductProfile {
    pub name: &'static str,
    /// Any mention of these counts as a product reference.
    pub keywords: Vec<&'static str>,
    /// Explicit, unambiguous mentions. A job posting or snippet matching one
    /// of these is a much stronger indicator than the base keywords.
    pub high_confidence_keywords: Vec<&'static str>,
    /// Config file names whose presence in a repo indicates active usage.
    pub config_file_names: Vec<&'static str>,
    /// The product SDK package on the npm registry.
    pub npm_package: &'static str,
    /// The product SDK distribution on PyPI.
    pub pypi_package: &'static str,
    /// Credential environment-variable names referenced in code.
    pub env_keys: Vec<&'static str>,
    /// Source-level import patterns for the SDK.
    pub sdk_import_patterns: Vec<&'static str>,
}

impl ProductProfile {
    /// True if `text` mentions the product at all (case-insensitive).
    pub fn mentions_product(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        self.keywords.iter().any(|kw| lower.contains(&kw.to_lowercase()))
    }

    /// First keyword found in `text`, high-confidence tier checked first.
    pub fn matched_keyword(&self, text: &str) -> Option<&'static str> {
        let lower = text.to_lowercase();
        self.high_confidence_keywords
            .iter()
            .chain(self.keywords.iter())
            .find(|kw| lower.contains(&kw.to_lowercase()))
            .copied()
    }
}

pub fn has_profile(key: &str) -> bool {
    matches!(key, "claude")
}

/// Build the ProductProfile for the given product key.
/// Panics if the product is not recognized.
pub fn product_profile(key: &str) -> ProductProfile {
    match key {
        "claude" => claude_profile(),
        other => panic!("Unknown product: {other}. Supported: claude"),
    }
}

fn claude_profile() -> ProductProfile {
    ProductProfile {
        name: "Claude",
        keywords: vec![
            "Claude",
            "Anthropic",
            "Claude Code",
            "Claude Desktop",
            "MCP",
            "Model Context Protocol",
        ],
        high_confidence_keywords: vec![
            "Claude Code",
            "Claude Desktop",
            "Anthropic API",
            "ANTHROPIC_API_KEY",
            "Model Context Protocol",
        ],
        config_file_names: vec![".mcp.json", "mcp.json"],
        npm_package: "@anthropic-ai/sdk",
        pypi_package: "anthropic",
        env_keys: vec!["ANTHROPIC_API_KEY", "ANTHROPIC_BASE_URL"],
        sdk_import_patterns: vec!["from anthropic import", "@anthropic-ai/sdk"],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claude_profile_resolves() {
        let p = product_profile("claude");
        assert_eq!(p.npm_package, "@anthropic-ai/sdk");
        assert_eq!(p.pypi_package, "anthropic");
        assert!(has_profile("claude"));
        assert!(!has_profile("unknown"));
    }

    #[test]
    fn mentions_product_is_case_insensitive() {
        let p = product_profile("claude");
        assert!(p.mentions_product("We are rolling out CLAUDE code to all teams"));
        assert!(!p.mentions_product("We use a different assistant"));
    }

    #[test]
    fn matched_keyword_prefers_high_confidence_tier() {
        let p = product_profile("claude");
        // "Claude Code" contains both the base keyword "Claude" and the
        // high-confidence phrase; the phrase must win.
        assert_eq!(
            p.matched_keyword("Experience with Claude Code required"),
            Some("Claude Code")
        );
        assert_eq!(p.matched_keyword("Familiarity with Claude"), Some("Claude"));
        assert_eq!(p.matched_keyword("nothing relevant"), None);
    }
}
