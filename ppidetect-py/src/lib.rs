//! Python bindings for the ppidetect decode-and-score pipeline.
//!
//! The exposed functions mirror the signatures the training and evaluation
//! drivers already use: `detect_points(heatmap, ...)` returns `(x, y)`
//! tuples, `encode_heatmap(...)` builds a reference heatmap as a 2D array,
//! and `calculate_metrics(...)` scores detections against ground truth.

use numpy::{IntoPyArray, PyArray2, PyReadonlyArray2, PyUntypedArrayMethods};
use pyo3::exceptions::PyRuntimeError;
use pyo3::prelude::*;

use ppidetect::{
    encode_heatmap as rust_encode_heatmap, match_detections, DetectConfig, DetectError,
    Detector, EncoderConfig, FieldView, GroundTruthTarget, MatchResult as RustMatchResult,
    PixelPoint,
};

/// Convert a DetectError to a Python exception.
fn to_py_err(err: DetectError) -> PyErr {
    PyRuntimeError::new_err(err.to_string())
}

/// Detection metrics for one comparison.
#[pyclass]
#[derive(Clone)]
pub struct MatchResult {
    /// Predictions matched to ground truth.
    #[pyo3(get)]
    pub true_positives: usize,
    /// Unmatched predictions.
    #[pyo3(get)]
    pub false_positives: usize,
    /// Unmatched ground-truth points.
    #[pyo3(get)]
    pub false_negatives: usize,
    /// TP / (TP + FP), 0 without predictions.
    #[pyo3(get)]
    pub precision: f64,
    /// TP / (TP + FN), 0 without ground truth.
    #[pyo3(get)]
    pub recall: f64,
    /// Harmonic mean of precision and recall.
    #[pyo3(get)]
    pub f1: f64,
}

#[pymethods]
impl MatchResult {
    fn __repr__(&self) -> String {
        format!(
            "MatchResult(tp={}, fp={}, fn={}, precision={:.3}, recall={:.3}, f1={:.3})",
            self.true_positives,
            self.false_positives,
            self.false_negatives,
            self.precision,
            self.recall,
            self.f1
        )
    }
}

impl From<RustMatchResult> for MatchResult {
    fn from(value: RustMatchResult) -> Self {
        Self {
            true_positives: value.true_positives,
            false_positives: value.false_positives,
            false_negatives: value.false_negatives,
            precision: value.precision,
            recall: value.recall,
            f1: value.f1,
        }
    }
}

/// Extract deduplicated detections from a confidence heatmap.
///
/// Args:
///     heatmap: 2D float32 array of confidences in [0, 1], azimuth x range.
///     threshold: Detection threshold in (0, 1) (default: 0.3)
///     nms_window: NMS window size, odd and >= 1 (default: 3)
///     eps: Cluster radius in embedding units (default: 20.0)
///     min_samples: Minimum neighborhood size for a dense cluster (default: 2)
///
/// Returns:
///     List of (x, y) pixel tuples, one per physically distinct target.
#[pyfunction]
#[pyo3(signature = (heatmap, threshold=0.3, nms_window=3, eps=20.0, min_samples=2))]
fn detect_points(
    heatmap: PyReadonlyArray2<'_, f32>,
    threshold: f32,
    nms_window: usize,
    eps: f64,
    min_samples: usize,
) -> PyResult<Vec<(usize, usize)>> {
    let shape = heatmap.shape();
    let height = shape[0];
    let width = shape[1];
    let data = heatmap.as_slice()?;
    let view = FieldView::from_slice(data, width, height).map_err(to_py_err)?;

    let detector = Detector::new(DetectConfig {
        threshold,
        nms_window,
        cluster_eps: eps,
        cluster_min_pts: min_samples,
    })
    .map_err(to_py_err)?;

    let detections = detector.detect(view).map_err(to_py_err)?;
    Ok(detections
        .into_iter()
        .map(|peak| (peak.point.x, peak.point.y))
        .collect())
}

/// Render a reference heatmap from ground-truth targets.
///
/// Args:
///     width: Grid width (range bins).
///     height: Grid height (azimuth bins).
///     targets: List of (azimuth_deg, distance) tuples.
///     radar_range: Radial range of the frame in distance units.
///     sigma: Gaussian spread in pixels (default: 2.0)
///
/// Returns:
///     2D float32 array of shape (height, width).
#[pyfunction]
#[pyo3(signature = (width, height, targets, radar_range, sigma=2.0))]
fn encode_heatmap<'py>(
    py: Python<'py>,
    width: usize,
    height: usize,
    targets: Vec<(f64, f64)>,
    radar_range: f64,
    sigma: f64,
) -> PyResult<Bound<'py, PyArray2<f32>>> {
    let mut cfg = EncoderConfig::new(radar_range);
    cfg.sigma = sigma;
    let targets: Vec<GroundTruthTarget> = targets
        .into_iter()
        .map(|(azimuth, distance)| GroundTruthTarget::new(azimuth, distance))
        .collect();

    let heatmap = rust_encode_heatmap(width, height, &cfg, &targets).map_err(to_py_err)?;
    let data = heatmap.as_slice().to_vec();
    let array = numpy::ndarray::Array2::from_shape_vec((height, width), data)
        .map_err(|err| PyRuntimeError::new_err(err.to_string()))?;
    Ok(array.into_pyarray(py))
}

/// Score predicted points against ground-truth points.
///
/// Args:
///     predictions: List of (x, y) pixel tuples.
///     ground_truth: List of (x, y) pixel tuples in the same space.
///     distance_threshold: Maximum matching distance in pixels (default: 10.0)
///
/// Returns:
///     MatchResult with counts and precision/recall/F1.
#[pyfunction]
#[pyo3(signature = (predictions, ground_truth, distance_threshold=10.0))]
fn calculate_metrics(
    predictions: Vec<(usize, usize)>,
    ground_truth: Vec<(usize, usize)>,
    distance_threshold: f64,
) -> PyResult<MatchResult> {
    let predicted: Vec<PixelPoint> = predictions
        .into_iter()
        .map(|(x, y)| PixelPoint::new(x, y))
        .collect();
    let truth: Vec<PixelPoint> = ground_truth
        .into_iter()
        .map(|(x, y)| PixelPoint::new(x, y))
        .collect();

    let result = match_detections(&predicted, &truth, distance_threshold).map_err(to_py_err)?;
    Ok(result.into())
}

/// Python module for the ppidetect pipeline.
#[pymodule]
fn _ppidetect(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<MatchResult>()?;
    m.add_function(wrap_pyfunction!(detect_points, m)?)?;
    m.add_function(wrap_pyfunction!(encode_heatmap, m)?)?;
    m.add_function(wrap_pyfunction!(calculate_metrics, m)?)?;

    // Add version
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;

    Ok(())
}
