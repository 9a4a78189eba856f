//! Set-based F1 similarity between a candidate and a gold tree.
//!
//! Follows the unlabeled bracket scoring of Klein (2005), section 2.2.2,
//! averaged with an F1 over the sets of leaf values.

use std::collections::HashSet;
use std::hash::Hash;

use serde::Serialize;

use crate::tree::NestedList;

/// Precision, recall and their harmonic mean for one pair of sets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct F1 {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

/// Both F1 components of [`score`] and their mean.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    /// F1 over bracket spans.
    pub brackets: f64,
    /// F1 over leaf values.
    pub descendants: f64,
    /// Mean of the two.
    pub total: f64,
}

/// F1 of `candidate` against `gold`.
///
/// An empty candidate set has precision 1 and an empty gold set has recall 1,
/// so two empty sets score 1 and an empty candidate against a non-empty gold
/// scores 0.
pub fn f1_score<T: Eq + Hash>(candidate: &HashSet<T>, gold: &HashSet<T>) -> F1 {
    let hits = candidate.intersection(gold).count() as f64;

    let precision = if candidate.is_empty() {
        1.0
    } else {
        hits / candidate.len() as f64
    };
    let recall = if gold.is_empty() {
        1.0
    } else {
        hits / gold.len() as f64
    };

    let f1 = if precision == 0.0 && recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    };

    F1 {
        precision,
        recall,
        f1,
    }
}

/// Similarity of `candidate` to `gold` in `[0, 1]`.
pub fn score(candidate: &NestedList, gold: &NestedList) -> f64 {
    score_breakdown(candidate, gold).total
}

/// [`score`] with its two components.
pub fn score_breakdown(candidate: &NestedList, gold: &NestedList) -> ScoreBreakdown {
    let brackets = f1_score(&candidate.brackets(), &gold.brackets()).f1;

    let candidate_leaves: HashSet<u32> = candidate.descendants().collect();
    let gold_leaves: HashSet<u32> = gold.descendants().collect();
    let descendants = f1_score(&candidate_leaves, &gold_leaves).f1;

    ScoreBreakdown {
        brackets,
        descendants,
        total: (brackets + descendants) / 2.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(values: &[i32]) -> HashSet<i32> {
        values.iter().copied().collect()
    }

    fn tree(s: &str) -> NestedList {
        s.parse().unwrap()
    }

    #[test]
    fn test_f1_identical_sets() {
        let f = f1_score(&set(&[1, 2, 3]), &set(&[1, 2, 3]));
        assert!((f.f1 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_f1_both_empty() {
        let f = f1_score(&set(&[]), &set(&[]));
        assert_eq!(f.f1, 1.0);
    }

    #[test]
    fn test_f1_empty_candidate() {
        let f = f1_score(&set(&[]), &set(&[1]));
        assert_eq!(f.precision, 1.0);
        assert_eq!(f.recall, 0.0);
        assert_eq!(f.f1, 0.0);
    }

    #[test]
    fn test_f1_empty_gold() {
        let f = f1_score(&set(&[1]), &set(&[]));
        assert_eq!(f.precision, 0.0);
        assert_eq!(f.recall, 1.0);
        assert_eq!(f.f1, 0.0);
    }

    #[test]
    fn test_f1_disjoint() {
        let f = f1_score(&set(&[1, 2]), &set(&[3]));
        assert_eq!(f.f1, 0.0);
    }

    #[test]
    fn test_f1_partial_overlap() {
        // P = 1/2, R = 1/3, F1 = 2 * (1/6) / (5/6) = 0.4
        let f = f1_score(&set(&[1, 9]), &set(&[1, 2, 3]));
        assert!((f.precision - 0.5).abs() < 1e-12);
        assert!((f.recall - 1.0 / 3.0).abs() < 1e-12);
        assert!((f.f1 - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_self_score_is_one() {
        let t = tree("[0, [1, 2], [3, [4]]]");
        assert!((score(&t, &t) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_flat_candidate_against_nested_gold() {
        // candidate [[1, 2, 3]] vs gold [[1, [2, 3]]]
        // brackets: {(1,3)} vs {(1,3), (2,3)} -> P=1, R=1/2, F1=2/3
        // leaves identical -> 1
        let candidate = tree("[[1, 2, 3]]");
        let gold = tree("[1, [2, 3]]").wrapped();
        let b = score_breakdown(&candidate, &gold);
        assert!((b.brackets - 2.0 / 3.0).abs() < 1e-12);
        assert!((b.descendants - 1.0).abs() < 1e-12);
        assert!((b.total - 5.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_lists_penalised() {
        let gold = tree("[[1]]");
        let clean = tree("[[1]]");
        let with_empty = tree("[[1], []]");
        assert!(score(&with_empty, &gold) < score(&clean, &gold));
    }

    #[test]
    fn test_empty_candidate_scores_zero_leaves() {
        let gold = tree("[1, 2]").wrapped();
        let b = score_breakdown(&NestedList::new(), &gold);
        assert_eq!(b.descendants, 0.0);
        assert_eq!(b.brackets, 0.0);
        assert_eq!(b.total, 0.0);
    }

    #[test]
    fn test_duplicates_collapse() {
        let candidate = tree("[1, 1, 1]");
        let gold = tree("[1]");
        let b = score_breakdown(&candidate, &gold);
        assert_eq!(b.descendants, 1.0);
        assert_eq!(b.brackets, 1.0);
    }

    #[test]
    fn test_score_bounds() {
        let gold = tree("[0, [1, 2, [3]], 4]").wrapped();
        for s in ["[]", "[[]]", "[0, 1, 2, 3, 4]", "[[0], [1], [2]]", "[[[[4]]]]"] {
            let b = score_breakdown(&tree(s), &gold);
            assert!((0.0..=1.0).contains(&b.brackets), "{s}");
            assert!((0.0..=1.0).contains(&b.descendants), "{s}");
            assert!((0.0..=1.0).contains(&b.total), "{s}");
        }
    }
}
