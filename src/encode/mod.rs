//! Gaussian heatmap encoding of ground-truth targets.
//!
//! Each target is splatted as a discrete 2D Gaussian of size `(6σ+1)²` at its
//! grid location; overlapping kernels are merged with element-wise maximum so
//! the brighter peak wins and no cell ever exceeds 1. Kernels that straddle a
//! grid edge are clipped, not dropped.
//!
//! Known limitation: the kernel is clipped at the azimuth edges too, with no
//! wraparound to the opposite row block, even though the azimuth axis is
//! conceptually circular. The decode side compensates by clustering in an
//! azimuth-aware embedding.

use crate::field::{Heatmap, PixelPoint};
use crate::trace::{trace_event, trace_span};
use crate::util::{DetectError, DetectResult};

/// A ground-truth target in radar coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct GroundTruthTarget {
    /// Bearing in degrees, `[0, 360)`.
    pub azimuth_deg: f64,
    /// Distance from the radar, in the same units as the radial range.
    pub distance: f64,
    /// Optional caller-supplied identifier.
    pub id: Option<String>,
}

impl GroundTruthTarget {
    /// Creates an anonymous target.
    pub fn new(azimuth_deg: f64, distance: f64) -> Self {
        Self {
            azimuth_deg,
            distance,
            id: None,
        }
    }
}

/// Encoder parameters.
#[derive(Clone, Debug)]
pub struct EncoderConfig {
    /// Gaussian spread in pixels. Default 2.
    pub sigma: f64,
    /// Angular span of the source frame in degrees. Default 360.
    pub angular_span_deg: f64,
    /// Radial range of the source frame, in target distance units.
    pub radial_range: f64,
}

impl EncoderConfig {
    /// Creates a config with the default spread and a full angular span.
    pub fn new(radial_range: f64) -> Self {
        Self {
            sigma: 2.0,
            angular_span_deg: 360.0,
            radial_range,
        }
    }

    fn validate(&self) -> DetectResult<()> {
        if !self.sigma.is_finite() || self.sigma <= 0.0 {
            return Err(DetectError::InvalidSigma { sigma: self.sigma });
        }
        if !self.angular_span_deg.is_finite() || self.angular_span_deg <= 0.0 {
            return Err(DetectError::InvalidAngularSpan {
                span: self.angular_span_deg,
            });
        }
        if !self.radial_range.is_finite() || self.radial_range <= 0.0 {
            return Err(DetectError::InvalidRadialRange {
                range: self.radial_range,
            });
        }
        Ok(())
    }

    /// Forward mapping from radar coordinates to the grid cell a target
    /// lands on, clamped to the grid bounds.
    ///
    /// Azimuth scales linearly onto the y axis, distance onto the x axis.
    pub fn target_pixel(
        &self,
        target: &GroundTruthTarget,
        width: usize,
        height: usize,
    ) -> PixelPoint {
        let y = target.azimuth_deg / self.angular_span_deg * height as f64;
        let x = target.distance / self.radial_range * width as f64;
        PixelPoint {
            x: clamp_index(x, width),
            y: clamp_index(y, height),
        }
    }
}

fn clamp_index(value: f64, dim: usize) -> usize {
    let idx = value as isize;
    idx.clamp(0, dim as isize - 1) as usize
}

/// Renders a ground-truth heatmap of size `(width, height)`.
///
/// Returns an all-zero heatmap for an empty target list.
pub fn encode_heatmap(
    width: usize,
    height: usize,
    cfg: &EncoderConfig,
    targets: &[GroundTruthTarget],
) -> DetectResult<Heatmap> {
    cfg.validate()?;
    let mut heatmap = Heatmap::zeros(width, height)?;

    let _span = trace_span!("encode_heatmap", targets = targets.len()).entered();

    let ksize = (6.0 * cfg.sigma) as usize + 1;
    let center = ksize / 2;
    let inv_two_sigma_sq = 1.0 / (2.0 * cfg.sigma * cfg.sigma);

    let kernel = gaussian_kernel(ksize, center, inv_two_sigma_sq);

    for target in targets {
        let point = cfg.target_pixel(target, width, height);
        splat(&mut heatmap, &kernel, ksize, center, point);
    }

    trace_event!("encoded", width = width, height = height);
    Ok(heatmap)
}

fn gaussian_kernel(ksize: usize, center: usize, inv_two_sigma_sq: f64) -> Vec<f32> {
    let mut kernel = vec![0.0f32; ksize * ksize];
    for row in 0..ksize {
        for col in 0..ksize {
            let dr = row as f64 - center as f64;
            let dc = col as f64 - center as f64;
            kernel[row * ksize + col] = (-(dr * dr + dc * dc) * inv_two_sigma_sq).exp() as f32;
        }
    }
    kernel
}

/// Max-merges one clipped kernel into the heatmap around `point`.
fn splat(heatmap: &mut Heatmap, kernel: &[f32], ksize: usize, center: usize, point: PixelPoint) {
    let width = heatmap.width();
    let height = heatmap.height();

    let x0 = point.x.saturating_sub(center);
    let x1 = (point.x + center + 1).min(width);
    let y0 = point.y.saturating_sub(center);
    let y1 = (point.y + center + 1).min(height);

    let data = heatmap.as_mut_slice();
    for y in y0..y1 {
        let krow = y + center - point.y;
        for x in x0..x1 {
            let kcol = x + center - point.x;
            let value = kernel[krow * ksize + kcol];
            let cell = &mut data[y * width + x];
            if value > *cell {
                *cell = value;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{encode_heatmap, EncoderConfig, GroundTruthTarget};
    use crate::util::DetectError;

    #[test]
    fn single_target_peaks_at_forward_mapping() {
        let cfg = EncoderConfig::new(1000.0);
        let target = GroundTruthTarget::new(90.0, 500.0);
        let heatmap = encode_heatmap(100, 100, &cfg, std::slice::from_ref(&target)).unwrap();

        let expected = cfg.target_pixel(&target, 100, 100);
        let peak = heatmap.view().get(expected.x, expected.y).unwrap();
        assert!((peak - 1.0).abs() < 1e-6);
    }

    #[test]
    fn overlapping_targets_merge_with_max() {
        let cfg = EncoderConfig::new(1000.0);
        let targets = vec![
            GroundTruthTarget::new(90.0, 500.0),
            GroundTruthTarget::new(90.0, 505.0),
        ];
        let heatmap = encode_heatmap(100, 100, &cfg, &targets).unwrap();
        for &value in heatmap.as_slice() {
            assert!((0.0..=1.0).contains(&value));
        }
    }

    #[test]
    fn boundary_target_renders_clipped_kernel() {
        let cfg = EncoderConfig::new(1000.0);
        // Azimuth 0 lands on row 0; the kernel upper half is clipped.
        let target = GroundTruthTarget::new(0.0, 500.0);
        let heatmap = encode_heatmap(100, 100, &cfg, std::slice::from_ref(&target)).unwrap();

        let view = heatmap.view();
        let peak = view.get(50, 0).unwrap();
        assert!((peak - 1.0).abs() < 1e-6);
        // No wraparound: the opposite azimuth edge stays dark.
        let opposite = view.get(50, 99).unwrap();
        assert!(opposite < 1e-3);
    }

    #[test]
    fn rejects_non_positive_sigma() {
        let mut cfg = EncoderConfig::new(1000.0);
        cfg.sigma = 0.0;
        let err = encode_heatmap(10, 10, &cfg, &[]).err().unwrap();
        assert_eq!(err, DetectError::InvalidSigma { sigma: 0.0 });
    }

    #[test]
    fn empty_target_list_gives_zero_heatmap() {
        let cfg = EncoderConfig::new(1000.0);
        let heatmap = encode_heatmap(10, 10, &cfg, &[]).unwrap();
        assert!(heatmap.as_slice().iter().all(|&v| v == 0.0));
    }
}
