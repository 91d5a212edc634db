//! Greedy distance-threshold matching of detections against ground truth.
//!
//! Each prediction, in input order, claims the closest still-unclaimed
//! ground-truth point if it lies within the distance threshold. This is a
//! greedy assignment, not a globally optimal one: near-tied distances can
//! resolve differently under a different prediction order, which is
//! acceptable for evaluation but not a substitute for optimal bipartite
//! matching.

use crate::field::PixelPoint;
use crate::util::{DetectError, DetectResult};

/// Default match distance threshold in pixels.
pub const DEFAULT_MATCH_DISTANCE: f64 = 10.0;

/// Match counts and the metrics derived from them. Immutable once computed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MatchResult {
    /// Predictions matched to a ground-truth point.
    pub true_positives: usize,
    /// Predictions left unmatched.
    pub false_positives: usize,
    /// Ground-truth points left unmatched.
    pub false_negatives: usize,
    /// TP / (TP + FP), 0 when there are no predictions.
    pub precision: f64,
    /// TP / (TP + FN), 0 when there is no ground truth.
    pub recall: f64,
    /// Harmonic mean of precision and recall, 0 when both are 0.
    pub f1: f64,
}

impl MatchResult {
    /// Derives precision, recall, and F1 from raw counts.
    ///
    /// Empty-list cases resolve to 0 by policy rather than dividing by zero.
    pub fn from_counts(
        true_positives: usize,
        false_positives: usize,
        false_negatives: usize,
    ) -> Self {
        let tp = true_positives as f64;
        let predicted = true_positives + false_positives;
        let actual = true_positives + false_negatives;
        let precision = if predicted > 0 {
            tp / predicted as f64
        } else {
            0.0
        };
        let recall = if actual > 0 { tp / actual as f64 } else { 0.0 };
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };
        Self {
            true_positives,
            false_positives,
            false_negatives,
            precision,
            recall,
            f1,
        }
    }
}

/// Greedily matches predictions to ground truth under `max_dist`.
///
/// Both lists must be in the same coordinate space. Empty lists are valid
/// inputs and resolve through the zero-division policies on [`MatchResult`].
pub fn match_detections(
    predicted: &[PixelPoint],
    truth: &[PixelPoint],
    max_dist: f64,
) -> DetectResult<MatchResult> {
    if !max_dist.is_finite() || max_dist < 0.0 {
        return Err(DetectError::InvalidMatchDistance { distance: max_dist });
    }

    let mut truth_taken = vec![false; truth.len()];
    let mut true_positives = 0usize;

    for pred in predicted {
        let mut best: Option<(usize, f64)> = None;
        for (idx, gt) in truth.iter().enumerate() {
            if truth_taken[idx] {
                continue;
            }
            let dist = pred.distance_to(gt);
            if best.map_or(true, |(_, d)| dist < d) {
                best = Some((idx, dist));
            }
        }
        if let Some((idx, dist)) = best {
            if dist <= max_dist {
                truth_taken[idx] = true;
                true_positives += 1;
            }
        }
    }

    let false_positives = predicted.len() - true_positives;
    let false_negatives = truth.len() - true_positives;
    Ok(MatchResult::from_counts(
        true_positives,
        false_positives,
        false_negatives,
    ))
}
