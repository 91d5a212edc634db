//! Peak extraction via windowed non-maximum suppression.
//!
//! A pixel is a peak iff its value equals the maximum over a `k x k` window
//! centered on it and exceeds the detection threshold. Out-of-bounds
//! neighbors do not count toward the window maximum, so edge pixels compete
//! only against their in-bounds neighborhood. Adjacent pixels sharing the
//! exact maximum all pass; the clustering stage merges such ties.

use crate::field::{FieldView, PixelPoint};
use crate::util::{DetectError, DetectResult};

/// A peak candidate with the confidence sampled at its location.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Peak {
    /// Grid location of the peak.
    pub point: PixelPoint,
    /// Heatmap value at the peak location.
    pub score: f32,
}

impl Peak {
    /// Creates a peak.
    pub fn new(x: usize, y: usize, score: f32) -> Self {
        Self {
            point: PixelPoint::new(x, y),
            score,
        }
    }
}

/// Validates an NMS window size: odd and at least 1.
pub(crate) fn validate_window(window: usize) -> DetectResult<()> {
    if window == 0 || window % 2 == 0 {
        return Err(DetectError::InvalidWindow { window });
    }
    Ok(())
}

/// Validates a detection threshold: inside the open interval (0, 1).
pub(crate) fn validate_threshold(threshold: f32) -> DetectResult<()> {
    if !threshold.is_finite() || threshold <= 0.0 || threshold >= 1.0 {
        return Err(DetectError::InvalidThreshold { threshold });
    }
    Ok(())
}

/// Extracts local maxima above `threshold` from a confidence field.
///
/// Returns an empty list when no pixel exceeds the threshold. Output
/// ordering is unspecified; callers must not depend on it.
pub fn extract_peaks(
    field: FieldView<'_>,
    threshold: f32,
    window: usize,
) -> DetectResult<Vec<Peak>> {
    validate_threshold(threshold)?;
    validate_window(window)?;

    let width = field.width();
    let height = field.height();
    let radius = (window - 1) / 2;

    let mut peaks = Vec::new();
    for y in 0..height {
        let y0 = y.saturating_sub(radius);
        let y1 = (y + radius + 1).min(height);
        for x in 0..width {
            let value = match field.get(x, y) {
                Some(v) => v,
                None => continue,
            };
            if value <= threshold {
                continue;
            }

            let x0 = x.saturating_sub(radius);
            let x1 = (x + radius + 1).min(width);
            if value >= window_max(field, x0, x1, y0, y1) {
                peaks.push(Peak::new(x, y, value));
            }
        }
    }
    Ok(peaks)
}

fn window_max(field: FieldView<'_>, x0: usize, x1: usize, y0: usize, y1: usize) -> f32 {
    let mut max = f32::NEG_INFINITY;
    for y in y0..y1 {
        if let Some(row) = field.row(y) {
            for &value in &row[x0..x1] {
                if value > max {
                    max = value;
                }
            }
        }
    }
    max
}

#[cfg(test)]
mod tests {
    use super::{extract_peaks, Peak};
    use crate::field::FieldView;
    use crate::util::DetectError;

    fn field_3x3(values: [f32; 9]) -> Vec<f32> {
        values.to_vec()
    }

    #[test]
    fn isolated_maximum_is_a_peak() {
        let data = field_3x3([0.0, 0.0, 0.0, 0.0, 0.9, 0.0, 0.0, 0.0, 0.0]);
        let view = FieldView::from_slice(&data, 3, 3).unwrap();
        let peaks = extract_peaks(view, 0.3, 3).unwrap();
        assert_eq!(peaks, vec![Peak::new(1, 1, 0.9)]);
    }

    #[test]
    fn below_threshold_maximum_is_suppressed() {
        let data = field_3x3([0.0, 0.0, 0.0, 0.0, 0.2, 0.0, 0.0, 0.0, 0.0]);
        let view = FieldView::from_slice(&data, 3, 3).unwrap();
        assert!(extract_peaks(view, 0.3, 3).unwrap().is_empty());
    }

    #[test]
    fn adjacent_ties_all_pass() {
        let data = field_3x3([0.0, 0.0, 0.0, 0.8, 0.8, 0.0, 0.0, 0.0, 0.0]);
        let view = FieldView::from_slice(&data, 3, 3).unwrap();
        let peaks = extract_peaks(view, 0.3, 3).unwrap();
        assert_eq!(peaks.len(), 2);
    }

    #[test]
    fn edge_pixel_can_be_a_peak() {
        let data = field_3x3([0.9, 0.1, 0.0, 0.1, 0.1, 0.0, 0.0, 0.0, 0.0]);
        let view = FieldView::from_slice(&data, 3, 3).unwrap();
        let peaks = extract_peaks(view, 0.3, 3).unwrap();
        assert_eq!(peaks, vec![Peak::new(0, 0, 0.9)]);
    }

    #[test]
    fn rejects_even_window() {
        let data = field_3x3([0.0; 9]);
        let view = FieldView::from_slice(&data, 3, 3).unwrap();
        let err = extract_peaks(view, 0.3, 4).err().unwrap();
        assert_eq!(err, DetectError::InvalidWindow { window: 4 });
    }

    #[test]
    fn rejects_out_of_range_threshold() {
        let data = field_3x3([0.0; 9]);
        let view = FieldView::from_slice(&data, 3, 3).unwrap();
        let err = extract_peaks(view, 1.0, 3).err().unwrap();
        assert_eq!(err, DetectError::InvalidThreshold { threshold: 1.0 });
    }
}
