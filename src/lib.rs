//! Decode-and-score pipeline for radar PPI confidence heatmaps.
//!
//! The crate turns a dense confidence field over an azimuth/range grid into a
//! small deduplicated set of target detections, and scores detection lists
//! against ground truth. Four pure, deterministic stages compose the core:
//! Gaussian heatmap encoding of ground-truth targets, windowed
//! non-maximum-suppression peak extraction, azimuth-aware density clustering
//! of near-duplicate peaks, and greedy distance-threshold matching producing
//! precision/recall/F1.
//!
//! Batch-level parallelism over independent frames is available via the
//! `rayon` feature; grayscale image loading via `image-io`; pipeline spans
//! and events via `tracing`.

pub mod cluster;
pub mod detect;
pub mod encode;
pub mod field;
pub mod matching;
pub mod peaks;
pub(crate) mod trace;
pub mod util;

pub use cluster::dbscan::{dbscan, Label};
pub use cluster::{dedup_peaks, peak_points};
pub use detect::{DetectConfig, Detector};
pub use encode::{encode_heatmap, EncoderConfig, GroundTruthTarget};
pub use field::{FieldView, Heatmap, PixelPoint};
pub use matching::{match_detections, MatchResult, DEFAULT_MATCH_DISTANCE};
pub use peaks::{extract_peaks, Peak};
pub use util::{to_polar, DetectError, DetectResult, PolarPoint};
