//! Error types for ppidetect.

use thiserror::Error;

/// Result alias for ppidetect operations.
pub type DetectResult<T> = std::result::Result<T, DetectError>;

/// Errors that can occur when building fields or running the pipeline.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DetectError {
    /// A field dimension is zero.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Requested width.
        width: usize,
        /// Requested height.
        height: usize,
    },
    /// Row stride is smaller than the row width.
    #[error("invalid stride {stride} for width {width}")]
    InvalidStride {
        /// Row width in elements.
        width: usize,
        /// Stride in elements.
        stride: usize,
    },
    /// The backing buffer cannot hold the requested view.
    #[error("buffer too small: needed {needed}, got {got}")]
    BufferTooSmall {
        /// Minimum number of elements required.
        needed: usize,
        /// Number of elements provided.
        got: usize,
    },
    /// A heatmap cell is non-finite or outside [0, 1].
    #[error("value {value} at ({x}, {y}) outside [0, 1]")]
    ValueOutOfRange {
        /// Column of the offending cell.
        x: usize,
        /// Row of the offending cell.
        y: usize,
        /// The offending value.
        value: f32,
    },
    /// The field does not match the grid size the caller promised.
    #[error("shape mismatch: expected {expected_width}x{expected_height}, got {width}x{height}")]
    ShapeMismatch {
        /// Expected width.
        expected_width: usize,
        /// Expected height.
        expected_height: usize,
        /// Actual width.
        width: usize,
        /// Actual height.
        height: usize,
    },
    /// Detection threshold is outside the open interval (0, 1).
    #[error("detection threshold {threshold} outside (0, 1)")]
    InvalidThreshold {
        /// The rejected threshold.
        threshold: f32,
    },
    /// NMS window size is zero or even.
    #[error("nms window {window} must be odd and >= 1")]
    InvalidWindow {
        /// The rejected window size.
        window: usize,
    },
    /// Gaussian spread is non-positive or non-finite.
    #[error("gaussian sigma {sigma} must be finite and > 0")]
    InvalidSigma {
        /// The rejected sigma.
        sigma: f64,
    },
    /// Encoder radial range is non-positive or non-finite.
    #[error("radial range {range} must be finite and > 0")]
    InvalidRadialRange {
        /// The rejected range.
        range: f64,
    },
    /// Encoder angular span is non-positive or non-finite.
    #[error("angular span {span} must be finite and > 0")]
    InvalidAngularSpan {
        /// The rejected span in degrees.
        span: f64,
    },
    /// Cluster radius is non-positive or non-finite.
    #[error("cluster eps {eps} must be finite and > 0")]
    InvalidEps {
        /// The rejected eps.
        eps: f64,
    },
    /// Minimum neighborhood size is zero.
    #[error("cluster min_pts {min_pts} must be >= 1")]
    InvalidMinPts {
        /// The rejected min_pts.
        min_pts: usize,
    },
    /// Match distance threshold is negative or non-finite.
    #[error("match distance {distance} must be finite and >= 0")]
    InvalidMatchDistance {
        /// The rejected distance.
        distance: f64,
    },
    /// Failed to read an image file.
    #[cfg(feature = "image-io")]
    #[error("image io error: {reason}")]
    ImageIo {
        /// Underlying decoder error message.
        reason: String,
    },
}
