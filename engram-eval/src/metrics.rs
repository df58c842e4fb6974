//! Metric primitives. All pure functions over per-case outcomes so they
//! can be unit-tested without a store.

use std::collections::BTreeSet;

/// True when none of the expected ids appear in the top-k of `retrieved`.
pub fn case_failed_at_k(retrieved: &[String], expected: &BTreeSet<String>, k: usize) -> bool {
    !retrieved.iter().take(k).any(|id| expected.contains(id))
}

/// Fraction of the top-k that is relevant. Denominator is what was actually
/// returned (up to k), so short result lists are not penalized twice.
pub fn precision_at_k(retrieved: &[String], expected: &BTreeSet<String>, k: usize) -> f64 {
    let top: Vec<&String> = retrieved.iter().take(k).collect();
    if top.is_empty() {
        return 0.0;
    }
    let hits = top.iter().filter(|id| expected.contains(**id)).count();
    hits as f64 / top.len() as f64
}

/// Fraction of the expected set found in the top-k.
pub fn recall_at_k(retrieved: &[String], expected: &BTreeSet<String>, k: usize) -> f64 {
    if expected.is_empty() {
        return 0.0;
    }
    let hits = retrieved
        .iter()
        .take(k)
        .filter(|id| expected.contains(*id))
        .count();
    hits as f64 / expected.len() as f64
}

/// Nearest-rank percentile over an unsorted sample. `p` in 0..=100.
pub fn percentile(samples: &[f64], p: f64) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let rank = ((p / 100.0) * sorted.len() as f64).ceil() as usize;
    sorted[rank.clamp(1, sorted.len()) - 1]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(entries: &[&str]) -> Vec<String> {
        entries.iter().map(|s| s.to_string()).collect()
    }

    fn expected(entries: &[&str]) -> BTreeSet<String> {
        entries.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn failure_requires_a_complete_miss_in_the_window() {
        let retrieved = ids(&["a", "b", "c"]);
        assert!(!case_failed_at_k(&retrieved, &expected(&["c"]), 3));
        assert!(case_failed_at_k(&retrieved, &expected(&["c"]), 2));
        assert!(case_failed_at_k(&retrieved, &expected(&["z"]), 3));
        assert!(case_failed_at_k(&[], &expected(&["z"]), 3));
    }

    #[test]
    fn precision_uses_the_returned_window_as_denominator() {
        let retrieved = ids(&["a", "b"]);
        // 1 hit of 2 returned, even though k is 10.
        assert_eq!(precision_at_k(&retrieved, &expected(&["a", "z"]), 10), 0.5);
        assert_eq!(precision_at_k(&[], &expected(&["a"]), 10), 0.0);
    }

    #[test]
    fn recall_is_against_the_expected_set() {
        let retrieved = ids(&["a", "b", "c"]);
        let exp = expected(&["a", "b", "z", "y"]);
        assert_eq!(recall_at_k(&retrieved, &exp, 10), 0.5);
        assert_eq!(recall_at_k(&retrieved, &exp, 1), 0.25);
    }

    #[test]
    fn nearest_rank_percentiles() {
        let samples: Vec<f64> = (1..=100).map(f64::from).collect();
        assert_eq!(percentile(&samples, 50.0), 50.0);
        assert_eq!(percentile(&samples, 95.0), 95.0);
        assert_eq!(percentile(&samples, 99.0), 99.0);
        assert_eq!(percentile(&samples, 100.0), 100.0);
        assert_eq!(percentile(&[7.0], 50.0), 7.0);
        assert_eq!(percentile(&[], 50.0), 0.0);
    }
}
