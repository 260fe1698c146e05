//! Confidence aggregation: the one pure function the whole system hangs off.
//!
//! `aggregate` is total, deterministic, and does no I/O. Signals are
//! deduplicated by (kind, source) keeping the first-seen evidence pointer,
//! the surviving weights are summed, and the sum maps onto the fixed verdict
//! thresholds. A signal whose stored weight disagrees with its kind's table
//! weight indicates a bug upstream and fails fast rather than silently
//! under- or over-reporting confidence.

use std::collections::{BTreeSet, HashSet};

use adoptsignal_common::{
    AdoptSignalError, ScanResult, Signal, SignalKind, SourceId, Verdict,
};

/// Combine the signal set for one company into a scored, tiered result.
pub fn aggregate(
    company: &str,
    signals: &[Signal],
    sources_queried: BTreeSet<SourceId>,
    sources_failed: BTreeSet<SourceId>,
) -> Result<ScanResult, AdoptSignalError> {
    let mut seen: HashSet<(SignalKind, SourceId)> = HashSet::new();
    let mut deduped: Vec<Signal> = Vec::new();

    for signal in signals {
        if signal.weight != signal.kind.weight() {
            return Err(AdoptSignalError::Precondition(format!(
                "signal of kind {} carries weight {} but the table says {}",
                signal.kind,
                signal.weight,
                signal.kind.weight()
            )));
        }
        if seen.insert((signal.kind, signal.source)) {
            deduped.push(signal.clone());
        }
    }

    // Weights are all positive so the sum cannot go below zero, but the
    // contract clamps anyway rather than assuming it.
    let raw: i64 = deduped.iter().map(|s| i64::from(s.weight)).sum();
    let score = raw.max(0) as u32;

    Ok(ScanResult {
        company: company.to_string(),
        signals: deduped,
        score,
        verdict: Verdict::from_score(score),
        sources_queried,
        sources_failed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sig(kind: SignalKind, source: SourceId) -> Signal {
        Signal::new(kind, source, "https://example.com/evidence", "acme")
    }

    fn run(signals: &[Signal]) -> ScanResult {
        aggregate("acme", signals, BTreeSet::new(), BTreeSet::new()).unwrap()
    }

    #[test]
    fn empty_signal_set_scores_zero_low() {
        let result = run(&[]);
        assert_eq!(result.score, 0);
        assert_eq!(result.verdict, Verdict::Low);
        assert!(result.signals.is_empty());
    }

    #[test]
    fn aggregate_is_idempotent() {
        let signals = vec![
            sig(SignalKind::ConfigFileMatch, SourceId::Github),
            sig(SignalKind::JobPosting, SourceId::Jobs),
        ];
        let a = run(&signals);
        let b = run(&signals);
        assert_eq!(a.score, b.score);
        assert_eq!(a.verdict, b.verdict);
        assert_eq!(a.signals, b.signals);
    }

    #[test]
    fn score_is_order_independent() {
        let signals = vec![
            sig(SignalKind::ConfigFileMatch, SourceId::Github),
            sig(SignalKind::ForumMention, SourceId::HackerNews),
            sig(SignalKind::NpmDependency, SourceId::Npm),
            sig(SignalKind::JobPosting, SourceId::Jobs),
        ];
        let baseline = run(&signals);

        // Walk a handful of distinct permutations.
        let permutations: [[usize; 4]; 5] = [
            [3, 2, 1, 0],
            [1, 0, 3, 2],
            [2, 3, 0, 1],
            [0, 2, 1, 3],
            [3, 0, 2, 1],
        ];
        for perm in permutations {
            let shuffled: Vec<Signal> = perm.iter().map(|&i| signals[i].clone()).collect();
            let result = run(&shuffled);
            assert_eq!(result.score, baseline.score);
            assert_eq!(result.verdict, baseline.verdict);
        }
    }

    #[test]
    fn duplicate_kind_source_counts_once() {
        let one = run(&[sig(SignalKind::SdkUsage, SourceId::Github)]);
        let two = run(&[
            sig(SignalKind::SdkUsage, SourceId::Github),
            sig(SignalKind::SdkUsage, SourceId::Github),
        ]);
        assert_eq!(one.score, two.score);
        assert_eq!(two.signals.len(), 1);
    }

    #[test]
    fn same_kind_different_source_counts_twice() {
        let result = run(&[
            sig(SignalKind::NewsArticle, SourceId::WebSearch),
            sig(SignalKind::NewsArticle, SourceId::HackerNews),
        ]);
        assert_eq!(result.score, 40);
    }

    #[test]
    fn dedup_keeps_first_seen_evidence() {
        let mut first = sig(SignalKind::SdkUsage, SourceId::Github);
        first.evidence = "https://github.com/acme/app/a".to_string();
        let mut second = sig(SignalKind::SdkUsage, SourceId::Github);
        second.evidence = "https://github.com/acme/app/b".to_string();

        let result = run(&[first, second]);
        assert_eq!(result.signals.len(), 1);
        assert_eq!(result.signals[0].evidence, "https://github.com/acme/app/a");
    }

    #[test]
    fn score_monotonic_as_distinct_signals_accumulate() {
        let pool = vec![
            sig(SignalKind::ConfigFileMatch, SourceId::Github),
            sig(SignalKind::NpmDependency, SourceId::Npm),
            sig(SignalKind::PypiDependency, SourceId::Pypi),
            sig(SignalKind::JobPosting, SourceId::Jobs),
            sig(SignalKind::ForumMention, SourceId::HackerNews),
            sig(SignalKind::NewsArticle, SourceId::WebSearch),
        ];
        let mut prev = 0;
        for n in 0..=pool.len() {
            let score = run(&pool[..n]).score;
            assert!(score >= prev, "score shrank when adding signal {n}");
            prev = score;
        }
    }

    #[test]
    fn config_plus_job_hits_very_high_boundary() {
        let result = run(&[
            sig(SignalKind::ConfigFileMatch, SourceId::Github),
            sig(SignalKind::JobPosting, SourceId::Jobs),
        ]);
        assert_eq!(result.score, 60);
        assert_eq!(result.verdict, Verdict::VeryHigh);
    }

    #[test]
    fn lone_forum_mention_stays_low() {
        let result = run(&[sig(SignalKind::ForumMention, SourceId::HackerNews)]);
        assert_eq!(result.score, 15);
        assert_eq!(result.verdict, Verdict::Low);
    }

    #[test]
    fn failed_sources_ride_along_without_affecting_score() {
        let signals = vec![
            sig(SignalKind::ForumMention, SourceId::HackerNews),
            sig(SignalKind::EngineeringBlog, SourceId::WebSearch),
        ];
        let queried = BTreeSet::from([SourceId::HackerNews, SourceId::WebSearch, SourceId::Jobs]);
        let failed = BTreeSet::from([SourceId::Jobs]);

        let result = aggregate("acme", &signals, queried, failed).unwrap();
        assert_eq!(result.score, 45);
        assert_eq!(result.verdict, Verdict::High);
        assert!(result.sources_failed.contains(&SourceId::Jobs));
        assert!(!result.sources_failed.contains(&SourceId::HackerNews));
    }

    #[test]
    fn tampered_weight_is_a_precondition_error() {
        let mut bad = sig(SignalKind::ForumMention, SourceId::HackerNews);
        bad.weight = 99;

        let err = aggregate("acme", &[bad], BTreeSet::new(), BTreeSet::new()).unwrap_err();
        assert!(matches!(err, AdoptSignalError::Precondition(_)));
        assert!(err.to_string().contains("forum_mention"));
    }

    #[test]
    fn tampered_weight_not_silently_scored() {
        let mut bad = sig(SignalKind::ConfigFileMatch, SourceId::Github);
        bad.weight = 0;
        assert!(aggregate("acme", &[bad], BTreeSet::new(), BTreeSet::new()).is_err());
    }

    #[test]
    fn all_ten_kinds_sum_to_full_table() {
        let signals = vec![
            sig(SignalKind::ConfigFileMatch, SourceId::Github),
            sig(SignalKind::NpmDependency, SourceId::Npm),
            sig(SignalKind::PypiDependency, SourceId::Pypi),
            sig(SignalKind::SdkUsage, SourceId::Github),
            sig(SignalKind::EngineeringBlog, SourceId::WebSearch),
            sig(SignalKind::EmployeePost, SourceId::WebSearch),
            sig(SignalKind::ApiKeyReference, SourceId::Github),
            sig(SignalKind::JobPosting, SourceId::Jobs),
            sig(SignalKind::NewsArticle, SourceId::WebSearch),
            sig(SignalKind::ForumMention, SourceId::HackerNews),
        ];
        let result = run(&signals);
        assert_eq!(result.score, 40 + 35 + 35 + 30 + 30 + 25 + 25 + 20 + 20 + 15);
        assert_eq!(result.verdict, Verdict::VeryHigh);
    }
}
