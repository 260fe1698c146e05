//! Batch/CRM driver: scan an ordered company list, one result per company,
//! input order preserved no matter which individual sources fail.

use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::info;

use adoptsignal_common::{AdoptSignalError, CompanyRef, ScanResult, SourceId};

use crate::scanner::Scanner;

/// Largest accepted batch. Keeps one batch inside the external APIs'
/// per-minute search quotas.
pub const MAX_BATCH: usize = 50;

/// Companies scanned concurrently. `buffered` preserves input order.
const CONCURRENCY: usize = 4;

/// Scan every company in order. Output has exactly one entry per input, in
/// input order; per-source failures are recorded inside each `ScanResult`.
pub async fn scan_companies(
    scanner: &Scanner,
    companies: &[CompanyRef],
    sources: Option<&[SourceId]>,
) -> Result<Vec<ScanResult>, AdoptSignalError> {
    if companies.is_empty() {
        return Err(AdoptSignalError::Config("no companies provided".to_string()));
    }
    if companies.len() > MAX_BATCH {
        return Err(AdoptSignalError::Config(format!(
            "too many companies ({}), max {MAX_BATCH} per batch",
            companies.len()
        )));
    }

    // Surface a bad source selection before any scan starts.
    scanner.validate_sources(sources)?;

    info!(companies = companies.len(), "Batch scan starting");

    let results: Vec<ScanResult> = stream::iter(companies)
        .map(|company| scanner.scan(company, sources))
        .buffered(CONCURRENCY)
        .try_collect()
        .await?;

    info!(companies = results.len(), "Batch scan complete");
    Ok(results)
}

/// Normalize CRM-export records into company refs. Accepts bare name strings
/// or objects with whatever field names the CRM used (`name`, `company_name`,
/// `company`, `domain`, `website`, optional `github_org`). A record with no
/// usable identity is an input error, reported by index.
pub fn parse_crm_records(
    records: &[serde_json::Value],
) -> Result<Vec<CompanyRef>, AdoptSignalError> {
    records
        .iter()
        .enumerate()
        .map(|(i, record)| parse_record(record).ok_or_else(|| {
            AdoptSignalError::Config(format!(
                "record {i} has no usable company identity \
                 (expected name, company_name, company, domain, or website)"
            ))
        }))
        .collect()
}

fn parse_record(record: &serde_json::Value) -> Option<CompanyRef> {
    if let Some(name) = record.as_str() {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        return Some(CompanyRef::named(name));
    }

    let obj = record.as_object()?;
    let field = |keys: &[&str]| {
        keys.iter()
            .filter_map(|k| obj.get(*k).and_then(|v| v.as_str()))
            .map(str::trim)
            .find(|v| !v.is_empty())
            .map(String::from)
    };

    let domain = field(&["domain", "website"]);
    let name = field(&["name", "company_name", "company"])
        .or_else(|| domain.as_deref().map(domain_stem).filter(|s| !s.is_empty()))?;

    Some(CompanyRef {
        name,
        domain,
        github_org: field(&["github_org"]),
    })
}

/// "https://www.stripe.com/about" -> "stripe".
fn domain_stem(domain: &str) -> String {
    domain
        .split("://")
        .last()
        .unwrap_or(domain)
        .trim_start_matches("www.")
        .split('/')
        .next()
        .unwrap_or("")
        .split('.')
        .next()
        .unwrap_or("")
        .to_lowercase()
}
