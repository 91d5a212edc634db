//! Azimuth-aware deduplication of peak candidates.
//!
//! Raw pixel coordinates put azimuth 0 and azimuth 359 at opposite ends of
//! the grid, so clustering on them directly would fail to merge detections
//! that straddle the seam. Candidates are instead converted to polar
//! coordinates about the image center and re-embedded as
//! `(r sin a, r cos a)`, a Cartesian reconstruction of the physical target
//! position where real-world neighbors stay close regardless of wraparound.

pub mod dbscan;

use crate::field::PixelPoint;
use crate::peaks::Peak;
use crate::trace::{trace_event, trace_span};
use crate::util::math::embed_polar;
use crate::util::{to_polar, DetectResult};
use dbscan::{dbscan, Label};

/// Merges near-duplicate peaks into one detection per physical target.
///
/// `width` and `height` are the dimensions of the field the peaks came from;
/// they fix the center of the polar conversion. Every cluster contributes
/// its highest-confidence member (first in input order on ties) and every
/// noise point passes through unchanged, so the output is a subset of the
/// input and is never empty for non-empty input.
pub fn dedup_peaks(
    peaks: &[Peak],
    width: usize,
    height: usize,
    eps: f64,
    min_pts: usize,
) -> DetectResult<Vec<Peak>> {
    dbscan::validate_params(eps, min_pts)?;
    if peaks.is_empty() {
        return Ok(Vec::new());
    }

    let _span = trace_span!("dedup_peaks", candidates = peaks.len()).entered();

    let embedded: Vec<[f64; 2]> = peaks
        .iter()
        .map(|peak| embed_polar(to_polar(peak.point.x, peak.point.y, width, height)))
        .collect();
    let labels = dbscan(&embedded, eps, min_pts)?;

    let num_clusters = labels
        .iter()
        .filter_map(|label| match label {
            Label::Cluster(id) => Some(id + 1),
            Label::Noise => None,
        })
        .max()
        .unwrap_or(0);

    // Best member seen so far per cluster; strict comparison keeps the
    // first occurrence on equal scores.
    let mut best: Vec<Option<Peak>> = vec![None; num_clusters];
    let mut out = Vec::new();
    for (peak, label) in peaks.iter().zip(&labels) {
        match label {
            Label::Noise => out.push(*peak),
            Label::Cluster(id) => match best[*id] {
                Some(current) if peak.score <= current.score => {}
                _ => best[*id] = Some(*peak),
            },
        }
    }
    out.extend(best.into_iter().flatten());

    trace_event!("deduped", kept = out.len());
    Ok(out)
}

/// Convenience accessor: the pixel locations of a peak list.
pub fn peak_points(peaks: &[Peak]) -> Vec<PixelPoint> {
    peaks.iter().map(|peak| peak.point).collect()
}

#[cfg(test)]
mod tests {
    use super::dedup_peaks;
    use crate::peaks::Peak;

    #[test]
    fn duplicate_peaks_collapse_to_best_scored() {
        let peaks = vec![
            Peak::new(50, 10, 0.7),
            Peak::new(51, 10, 0.9),
            Peak::new(50, 11, 0.6),
        ];
        let kept = dedup_peaks(&peaks, 100, 100, 5.0, 2).unwrap();
        assert_eq!(kept, vec![Peak::new(51, 10, 0.9)]);
    }

    #[test]
    fn tie_keeps_first_in_input_order() {
        let peaks = vec![Peak::new(50, 10, 0.8), Peak::new(51, 10, 0.8)];
        let kept = dedup_peaks(&peaks, 100, 100, 5.0, 2).unwrap();
        assert_eq!(kept, vec![Peak::new(50, 10, 0.8)]);
    }

    #[test]
    fn noise_points_pass_through() {
        let peaks = vec![Peak::new(10, 10, 0.5), Peak::new(90, 90, 0.4)];
        let kept = dedup_peaks(&peaks, 100, 100, 2.0, 2).unwrap();
        assert_eq!(kept.len(), 2);
        assert!(kept.contains(&peaks[0]));
        assert!(kept.contains(&peaks[1]));
    }

    #[test]
    fn output_never_exceeds_input() {
        let peaks: Vec<Peak> = (0..20).map(|i| Peak::new(40 + i % 5, 40, 0.5)).collect();
        let kept = dedup_peaks(&peaks, 100, 100, 10.0, 2).unwrap();
        assert!(!kept.is_empty());
        assert!(kept.len() <= peaks.len());
        for peak in &kept {
            assert!(peaks.contains(peak));
        }
    }

    #[test]
    fn empty_input_short_circuits() {
        assert!(dedup_peaks(&[], 100, 100, 5.0, 2).unwrap().is_empty());
    }
}
