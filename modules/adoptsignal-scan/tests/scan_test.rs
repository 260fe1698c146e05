//! Orchestrator tests: Scanner over MockAdapters. No network.

use std::time::Duration;

use adoptsignal_common::{AdoptSignalError, CompanyRef, SignalKind, SourceId, Verdict};
use adoptsignal_scan::product::product_profile;
use adoptsignal_scan::scanner::Scanner;
use adoptsignal_scan::testing::{finding, MockAdapter};

fn acme() -> CompanyRef {
    CompanyRef::named("Acme")
}

#[tokio::test]
async fn partial_failure_keeps_other_sources_scoring() {
    // HN and web search succeed with 15 + 30 = 45 points, jobs times out.
    let scanner = Scanner::new(
        vec![
            Box::new(MockAdapter::new(SourceId::HackerNews).on_company(
                "Acme",
                vec![finding(
                    SourceId::HackerNews,
                    "https://news.ycombinator.com/item?id=1",
                    "Claude",
                )],
            )),
            Box::new(MockAdapter::new(SourceId::WebSearch).on_company(
                "Acme",
                vec![finding(
                    SourceId::WebSearch,
                    "https://acme.com/blog/claude",
                    "Claude",
                )],
            )),
            Box::new(
                MockAdapter::new(SourceId::Jobs)
                    .hanging()
                    .with_timeout(Duration::from_millis(50)),
            ),
        ],
        product_profile("claude"),
    );

    let result = scanner.scan(&acme(), None).await.unwrap();

    assert_eq!(result.score, 45);
    assert_eq!(result.verdict, Verdict::High);
    assert!(result.sources_failed.contains(&SourceId::Jobs));
    assert!(result.sources_queried.contains(&SourceId::Jobs));
    assert!(result.sources_queried.contains(&SourceId::HackerNews));
    assert!(!result.sources_failed.contains(&SourceId::HackerNews));
}

#[tokio::test]
async fn adapter_error_recorded_not_propagated() {
    let scanner = Scanner::new(
        vec![
            Box::new(MockAdapter::new(SourceId::Github).failing("rate limited")),
            Box::new(MockAdapter::new(SourceId::HackerNews)),
        ],
        product_profile("claude"),
    );

    let result = scanner.scan(&acme(), None).await.unwrap();

    assert_eq!(result.score, 0);
    assert_eq!(result.verdict, Verdict::Low);
    assert_eq!(
        result.sources_failed.iter().collect::<Vec<_>>(),
        vec![&SourceId::Github]
    );
}

#[tokio::test]
async fn all_sources_failing_still_yields_result() {
    let scanner = Scanner::new(
        vec![
            Box::new(MockAdapter::new(SourceId::Github).failing("down")),
            Box::new(MockAdapter::new(SourceId::Npm).failing("down")),
        ],
        product_profile("claude"),
    );

    let result = scanner.scan(&acme(), None).await.unwrap();
    assert_eq!(result.score, 0);
    assert_eq!(result.verdict, Verdict::Low);
    assert_eq!(result.sources_failed.len(), 2);
}

#[tokio::test]
async fn empty_sources_distinct_from_failed_sources() {
    // npm queried and clean; github queried and failed. A consumer must be
    // able to tell the two apart.
    let scanner = Scanner::new(
        vec![
            Box::new(MockAdapter::new(SourceId::Npm)),
            Box::new(MockAdapter::new(SourceId::Github).failing("500")),
        ],
        product_profile("claude"),
    );

    let result = scanner.scan(&acme(), None).await.unwrap();
    assert!(result.sources_queried.contains(&SourceId::Npm));
    assert!(!result.sources_failed.contains(&SourceId::Npm));
    assert!(result.sources_failed.contains(&SourceId::Github));
}

#[tokio::test]
async fn unconfigured_source_skipped_by_default_scan() {
    let scanner = Scanner::new(
        vec![
            Box::new(MockAdapter::new(SourceId::Jobs).unconfigured()),
            Box::new(MockAdapter::new(SourceId::HackerNews).on_company(
                "Acme",
                vec![finding(
                    SourceId::HackerNews,
                    "https://news.ycombinator.com/item?id=9",
                    "Claude",
                )],
            )),
        ],
        product_profile("claude"),
    );

    let result = scanner.scan(&acme(), None).await.unwrap();
    // Jobs was neither queried nor failed: it was never eligible.
    assert!(!result.sources_queried.contains(&SourceId::Jobs));
    assert!(!result.sources_failed.contains(&SourceId::Jobs));
    assert_eq!(result.score, 15);
}

#[tokio::test]
async fn explicitly_requesting_unconfigured_source_is_config_error() {
    let scanner = Scanner::new(
        vec![Box::new(MockAdapter::new(SourceId::Jobs).unconfigured())],
        product_profile("claude"),
    );

    let err = scanner
        .scan(&acme(), Some(&[SourceId::Jobs]))
        .await
        .unwrap_err();
    assert!(matches!(err, AdoptSignalError::Config(_)));
}

#[tokio::test]
async fn duplicate_findings_across_fetch_score_once() {
    let scanner = Scanner::new(
        vec![Box::new(MockAdapter::new(SourceId::HackerNews).on_company(
            "Acme",
            vec![
                finding(
                    SourceId::HackerNews,
                    "https://news.ycombinator.com/item?id=1",
                    "Claude",
                ),
                finding(
                    SourceId::HackerNews,
                    "https://news.ycombinator.com/item?id=2",
                    "Claude",
                ),
            ],
        ))],
        product_profile("claude"),
    );

    let result = scanner.scan(&acme(), None).await.unwrap();
    assert_eq!(result.score, 15);
    assert_eq!(result.signals.len(), 1);
    assert_eq!(
        result.signals[0].evidence,
        "https://news.ycombinator.com/item?id=1"
    );
}

#[tokio::test]
async fn fast_path_queries_fixed_subset() {
    let scanner = Scanner::new(
        vec![
            Box::new(MockAdapter::new(SourceId::Github)),
            Box::new(MockAdapter::new(SourceId::Npm)),
            Box::new(MockAdapter::new(SourceId::Pypi)),
            Box::new(MockAdapter::new(SourceId::HackerNews)),
            Box::new(MockAdapter::new(SourceId::WebSearch)),
            Box::new(MockAdapter::new(SourceId::Jobs)),
        ],
        product_profile("claude"),
    );

    let result = scanner.scan_fast(&acme()).await.unwrap();
    let queried: Vec<_> = result.sources_queried.iter().copied().collect();
    assert_eq!(queried, vec![SourceId::Github, SourceId::Npm, SourceId::Pypi]);
}

#[tokio::test]
async fn raw_findings_surface_source_unavailable() {
    let scanner = Scanner::new(
        vec![Box::new(MockAdapter::new(SourceId::Github).failing("boom"))],
        product_profile("claude"),
    );

    let err = scanner
        .raw_findings(SourceId::Github, &acme())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AdoptSignalError::SourceUnavailable {
            source: SourceId::Github,
            ..
        }
    ));
}

#[tokio::test]
async fn status_reports_unconfigured_and_unreachable() {
    let scanner = Scanner::new(
        vec![
            Box::new(MockAdapter::new(SourceId::Github)),
            Box::new(MockAdapter::new(SourceId::Jobs).unconfigured()),
            Box::new(MockAdapter::new(SourceId::WebSearch).failing("auth")),
        ],
        product_profile("claude"),
    );

    let status = scanner.status().await;

    assert!(status[&SourceId::Github].configured);
    assert!(status[&SourceId::Github].reachable);
    assert!(!status[&SourceId::Jobs].configured);
    assert!(!status[&SourceId::Jobs].reachable);
    assert!(status[&SourceId::WebSearch].configured);
    assert!(!status[&SourceId::WebSearch].reachable);
}
