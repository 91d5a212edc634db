//! Synthetic encode-then-decode validation of the pipeline stages.

use ppidetect::{
    dedup_peaks, encode_heatmap, match_detections, peak_points, DetectConfig, Detector,
    EncoderConfig, GroundTruthTarget, Peak, PixelPoint, DEFAULT_MATCH_DISTANCE,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use std::collections::HashSet;

fn point_set(peaks: &[Peak]) -> HashSet<PixelPoint> {
    peaks.iter().map(|p| p.point).collect()
}

#[test]
fn single_target_recovers_within_two_pixels() {
    let cfg = EncoderConfig::new(1000.0);
    let target = GroundTruthTarget::new(137.0, 420.0);
    let heatmap = encode_heatmap(100, 100, &cfg, std::slice::from_ref(&target)).unwrap();

    let detector = Detector::new(DetectConfig::default()).unwrap();
    let detections = detector.detect(heatmap.view()).unwrap();

    assert_eq!(detections.len(), 1);
    let expected = cfg.target_pixel(&target, 100, 100);
    assert!(detections[0].point.distance_to(&expected) <= 2.0);
}

#[test]
fn decode_is_deterministic() {
    let cfg = EncoderConfig::new(1000.0);
    let targets = vec![
        GroundTruthTarget::new(30.0, 200.0),
        GroundTruthTarget::new(120.0, 650.0),
        GroundTruthTarget::new(251.0, 880.0),
    ];
    let heatmap = encode_heatmap(100, 100, &cfg, &targets).unwrap();

    let detector = Detector::new(DetectConfig::default()).unwrap();
    let first = detector.detect(heatmap.view()).unwrap();
    let second = detector.detect(heatmap.view()).unwrap();

    assert_eq!(point_set(&first), point_set(&second));
}

#[test]
fn seam_targets_merge_with_sufficient_eps() {
    // Azimuth 359 and azimuth 1 land on opposite edge rows of the grid.
    let cfg = EncoderConfig::new(1000.0);
    let targets = vec![
        GroundTruthTarget::new(359.0, 500.0),
        GroundTruthTarget::new(1.0, 500.0),
    ];
    let heatmap = encode_heatmap(100, 100, &cfg, &targets).unwrap();

    // Default eps keeps the seam peaks apart.
    let strict = Detector::new(DetectConfig::default()).unwrap();
    assert_eq!(strict.detect(heatmap.view()).unwrap().len(), 2);

    // An eps covering their separation in the embedding merges them.
    let wide = Detector::new(DetectConfig {
        cluster_eps: 110.0,
        ..DetectConfig::default()
    })
    .unwrap();
    let detections = wide.detect(heatmap.view()).unwrap();
    assert_eq!(detections.len(), 1);
}

#[test]
fn dedup_never_loses_or_invents_points() {
    let mut rng = StdRng::seed_from_u64(7);
    let peaks: Vec<Peak> = (0..50)
        .map(|_| {
            Peak::new(
                rng.random_range(0..100),
                rng.random_range(0..100),
                rng.random_range(0.3f32..1.0),
            )
        })
        .collect();

    let kept = dedup_peaks(&peaks, 100, 100, 20.0, 2).unwrap();
    assert!(!kept.is_empty());
    assert!(kept.len() <= peaks.len());
    for peak in &kept {
        assert!(peaks.contains(peak), "output point not among inputs");
    }
}

#[derive(Debug, Deserialize)]
struct TargetFixture {
    azimuth: f64,
    distance: f64,
}

#[derive(Debug, Deserialize)]
struct FrameFixture {
    radar_range: f64,
    grid: [usize; 2],
    targets: Vec<TargetFixture>,
}

#[test]
fn json_frame_fixture_decodes_and_scores() {
    // Same record shape the CLI consumes for a frame file.
    let fixture = r#"{
        "radar_range": 1000.0,
        "grid": [100, 100],
        "targets": [
            { "azimuth": 45.0, "distance": 320.0 },
            { "azimuth": 212.0, "distance": 760.0 }
        ]
    }"#;
    let frame: FrameFixture = serde_json::from_str(fixture).unwrap();
    let [width, height] = frame.grid;

    let cfg = EncoderConfig::new(frame.radar_range);
    let targets: Vec<GroundTruthTarget> = frame
        .targets
        .iter()
        .map(|t| GroundTruthTarget::new(t.azimuth, t.distance))
        .collect();
    let heatmap = encode_heatmap(width, height, &cfg, &targets).unwrap();

    let detector = Detector::new(DetectConfig::default()).unwrap();
    let detections = detector.detect(heatmap.view()).unwrap();
    assert_eq!(detections.len(), targets.len());

    let truth: Vec<_> = targets
        .iter()
        .map(|t| cfg.target_pixel(t, width, height))
        .collect();
    let result =
        match_detections(&peak_points(&detections), &truth, DEFAULT_MATCH_DISTANCE).unwrap();
    assert!((result.f1 - 1.0).abs() < 1e-12);
}

#[test]
fn every_detection_comes_from_the_heatmap() {
    let cfg = EncoderConfig::new(1000.0);
    let targets = vec![
        GroundTruthTarget::new(45.0, 300.0),
        GroundTruthTarget::new(200.0, 700.0),
    ];
    let heatmap = encode_heatmap(100, 100, &cfg, &targets).unwrap();

    let detector = Detector::new(DetectConfig::default()).unwrap();
    for detection in detector.detect(heatmap.view()).unwrap() {
        let sampled = heatmap.view().get(detection.point.x, detection.point.y).unwrap();
        assert_eq!(detection.score, sampled);
    }
}
