//! The decode pipeline: peak extraction followed by azimuth-aware dedup.
//!
//! `Detector` is a caller-owned handle around a validated configuration.
//! Call sites that run the pipeline repeatedly (training evaluation, a live
//! visualization loop) construct one detector up front and pass it around
//! instead of keeping module-level state.

use crate::cluster::dedup_peaks;
use crate::field::{FieldView, Heatmap};
use crate::peaks::{extract_peaks, validate_threshold, validate_window, Peak};
use crate::trace::{trace_event, trace_span};
use crate::util::{DetectError, DetectResult};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Decode pipeline parameters. All defaults are the documented ones.
#[derive(Clone, Debug)]
pub struct DetectConfig {
    /// Detection threshold in (0, 1). Default 0.3.
    pub threshold: f32,
    /// NMS window size, odd and >= 1. Default 3.
    pub nms_window: usize,
    /// Cluster radius in embedding units. Default 20.
    pub cluster_eps: f64,
    /// Minimum neighborhood size for a dense cluster. Default 2.
    pub cluster_min_pts: usize,
}

impl Default for DetectConfig {
    fn default() -> Self {
        Self {
            threshold: 0.3,
            nms_window: 3,
            cluster_eps: 20.0,
            cluster_min_pts: 2,
        }
    }
}

/// Validated handle running extract-then-dedup over confidence fields.
#[derive(Clone, Debug)]
pub struct Detector {
    config: DetectConfig,
    expected_size: Option<(usize, usize)>,
}

impl Detector {
    /// Builds a detector, validating every parameter up front.
    pub fn new(config: DetectConfig) -> DetectResult<Self> {
        validate_threshold(config.threshold)?;
        validate_window(config.nms_window)?;
        crate::cluster::dbscan::validate_params(config.cluster_eps, config.cluster_min_pts)?;
        Ok(Self {
            config,
            expected_size: None,
        })
    }

    /// Requires every decoded field to have exactly this size.
    ///
    /// Fields of any other shape fail fast with a shape-mismatch error
    /// instead of being silently resampled.
    pub fn with_expected_size(mut self, width: usize, height: usize) -> Self {
        self.expected_size = Some((width, height));
        self
    }

    /// Returns the validated configuration.
    pub fn config(&self) -> &DetectConfig {
        &self.config
    }

    /// Decodes one confidence field into deduplicated detections.
    ///
    /// Output ordering is unspecified. An empty result is a valid state,
    /// not an error.
    pub fn detect(&self, field: FieldView<'_>) -> DetectResult<Vec<Peak>> {
        if let Some((width, height)) = self.expected_size {
            if field.width() != width || field.height() != height {
                return Err(DetectError::ShapeMismatch {
                    expected_width: width,
                    expected_height: height,
                    width: field.width(),
                    height: field.height(),
                });
            }
        }

        let _span = trace_span!(
            "detect",
            width = field.width(),
            height = field.height()
        )
        .entered();

        let candidates = extract_peaks(field, self.config.threshold, self.config.nms_window)?;
        trace_event!("peaks_extracted", count = candidates.len());
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let detections = dedup_peaks(
            &candidates,
            field.width(),
            field.height(),
            self.config.cluster_eps,
            self.config.cluster_min_pts,
        )?;
        trace_event!("detections", count = detections.len());
        Ok(detections)
    }

    /// Decodes independent frames in parallel.
    ///
    /// Frames share nothing, so this is plain data parallelism; results come
    /// back in frame order.
    #[cfg(feature = "rayon")]
    pub fn detect_batch(&self, frames: &[Heatmap]) -> DetectResult<Vec<Vec<Peak>>> {
        frames
            .par_iter()
            .map(|frame| self.detect(frame.view()))
            .collect()
    }

    /// Sequential fallback of [`Detector::detect_batch`].
    #[cfg(not(feature = "rayon"))]
    pub fn detect_batch(&self, frames: &[Heatmap]) -> DetectResult<Vec<Vec<Peak>>> {
        frames
            .iter()
            .map(|frame| self.detect(frame.view()))
            .collect()
    }
}
