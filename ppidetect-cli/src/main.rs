use clap::Parser;
use ppidetect::{
    encode_heatmap, match_detections, peak_points, DetectConfig, Detector, EncoderConfig,
    GroundTruthTarget, Heatmap, MatchResult, DEFAULT_MATCH_DISTANCE,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const EXAMPLE_JSON: &str = r#"{
  "frames": ["frame_0001.json"],
  "sigma": 2.0,
  "match_distance": 10.0,
  "output_path": null,
  "detect": {
    "threshold": 0.3,
    "nms_window": 3,
    "cluster_eps": 20.0,
    "cluster_min_pts": 2
  }
}"#;

const FRAME_EXAMPLE_JSON: &str = r#"{
  "radar_range": 1000.0,
  "grid": [100, 100],
  "targets": [
    { "azimuth": 90.0, "distance": 500.0, "id": "ship-1" }
  ],
  "ppi": null
}"#;

#[derive(Parser, Debug)]
#[command(author, version, about = "PPI heatmap decode-and-score CLI (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Print an example frame file and exit.
    #[arg(long)]
    print_frame_example: bool,
    /// Enable tracing output for performance profiling.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct DetectConfigJson {
    threshold: f32,
    nms_window: usize,
    cluster_eps: f64,
    cluster_min_pts: usize,
}

impl Default for DetectConfigJson {
    fn default() -> Self {
        let cfg = DetectConfig::default();
        Self {
            threshold: cfg.threshold,
            nms_window: cfg.nms_window,
            cluster_eps: cfg.cluster_eps,
            cluster_min_pts: cfg.cluster_min_pts,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct Config {
    frames: Vec<PathBuf>,
    sigma: f64,
    match_distance: f64,
    detect: DetectConfigJson,
    output_path: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            frames: Vec::new(),
            sigma: 2.0,
            match_distance: DEFAULT_MATCH_DISTANCE,
            detect: DetectConfigJson::default(),
            output_path: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TargetJson {
    azimuth: f64,
    distance: f64,
    #[serde(default)]
    id: Option<String>,
}

/// One frame: a confidence map plus the ground truth it is scored against.
///
/// When `ppi` is absent the reference heatmap encoded from the targets is
/// decoded instead, which exercises the pipeline against its own encoder.
#[derive(Debug, Deserialize)]
struct FrameJson {
    radar_range: f64,
    grid: [usize; 2],
    targets: Vec<TargetJson>,
    #[serde(default)]
    ppi: Option<Vec<Vec<f32>>>,
}

#[derive(Debug, Serialize)]
struct MetricsRecord {
    true_positives: usize,
    false_positives: usize,
    false_negatives: usize,
    precision: f64,
    recall: f64,
    f1: f64,
}

impl From<MatchResult> for MetricsRecord {
    fn from(value: MatchResult) -> Self {
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

#[derive(Debug, Serialize)]
struct FrameRecord {
    frame: String,
    detections: Vec<(usize, usize)>,
    metrics: MetricsRecord,
}

#[derive(Debug, Serialize)]
struct Output {
    frames: Vec<FrameRecord>,
    aggregate: MetricsRecord,
}

fn frame_heatmap(frame: &FrameJson, sigma: f64) -> Result<Heatmap, Box<dyn std::error::Error>> {
    let [width, height] = frame.grid;
    match &frame.ppi {
        Some(rows) => {
            if rows.len() != height || rows.iter().any(|row| row.len() != width) {
                return Err(format!("ppi grid does not match declared size {width}x{height}").into());
            }
            let data: Vec<f32> = rows.iter().flatten().copied().collect();
            Ok(Heatmap::from_values(data, width, height)?)
        }
        None => {
            let mut cfg = EncoderConfig::new(frame.radar_range);
            cfg.sigma = sigma;
            let targets: Vec<GroundTruthTarget> = frame
                .targets
                .iter()
                .map(|t| GroundTruthTarget {
                    azimuth_deg: t.azimuth,
                    distance: t.distance,
                    id: t.id.clone(),
                })
                .collect();
            Ok(encode_heatmap(width, height, &cfg, &targets)?)
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive("ppidetect=info".parse()?),
            )
            .with_target(false)
            .init();
    }

    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }
    if cli.print_frame_example {
        println!("{FRAME_EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    if config.frames.is_empty() {
        return Err("frames must list at least one frame file".into());
    }

    let detector = Detector::new(DetectConfig {
        threshold: config.detect.threshold,
        nms_window: config.detect.nms_window,
        cluster_eps: config.detect.cluster_eps,
        cluster_min_pts: config.detect.cluster_min_pts,
    })?;

    let mut frame_records = Vec::with_capacity(config.frames.len());
    let mut total_tp = 0usize;
    let mut total_fp = 0usize;
    let mut total_fn = 0usize;

    for path in &config.frames {
        let frame_text = fs::read_to_string(path)?;
        let frame: FrameJson = serde_json::from_str(&frame_text)?;
        let heatmap = frame_heatmap(&frame, config.sigma)?;

        let detections = detector.detect(heatmap.view())?;

        let mut enc = EncoderConfig::new(frame.radar_range);
        enc.sigma = config.sigma;
        let truth: Vec<_> = frame
            .targets
            .iter()
            .map(|t| {
                enc.target_pixel(
                    &GroundTruthTarget::new(t.azimuth, t.distance),
                    heatmap.width(),
                    heatmap.height(),
                )
            })
            .collect();

        let result = match_detections(&peak_points(&detections), &truth, config.match_distance)?;
        total_tp += result.true_positives;
        total_fp += result.false_positives;
        total_fn += result.false_negatives;

        frame_records.push(FrameRecord {
            frame: path.display().to_string(),
            detections: detections.iter().map(|d| (d.point.x, d.point.y)).collect(),
            metrics: result.into(),
        });
    }

    let aggregate = MatchResult::from_counts(total_tp, total_fp, total_fn);
    let output = Output {
        frames: frame_records,
        aggregate: aggregate.into(),
    };
    let json = serde_json::to_string_pretty(&output)?;

    match config.output_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}
