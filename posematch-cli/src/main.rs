use clap::Parser;
use posematch::annotate::{mark_match, outline_rect, MARKER_COLOR, MARKER_RADIUS};
use posematch::io::{save_color_image, save_gray_image};
use posematch::{
    ingest_templates, load_test_image, ChromaKey, ColorImage, Detection, Detector, DetectorConfig,
    IngestConfig, MatchOrchestrator, Rect, TemplateRecord, DEFAULT_THRESHOLD,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Detect rendered templates in images and report their poses")]
struct Cli {
    /// Folder containing template%04d.png and template%04d_pose.txt pairs.
    #[arg(required_unless_present = "print_example")]
    template: Option<PathBuf>,
    /// Test image(s).
    #[arg(required_unless_present = "print_example", num_args = 1..)]
    image: Vec<PathBuf>,
    /// Accept all detections with at least this similarity (percent).
    #[arg(short, long, default_value_t = DEFAULT_THRESHOLD)]
    threshold: f32,
    /// Optional JSON file with detector and ingestion settings.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Print a config with default values and exit.
    #[arg(long)]
    print_example: bool,
    /// Write a JSON report of all detections to this file.
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
    /// Write annotated test images and matched templates to this folder.
    #[arg(long, value_name = "DIR")]
    annotate_dir: Option<PathBuf>,
    /// Enable tracing output.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
struct DetectorConfigJson {
    pyramid_levels: usize,
    per_template_topk: usize,
    nms_radius: usize,
    beam_width: usize,
    roi_radius: usize,
    min_var_i: f32,
    parallel: bool,
}

impl Default for DetectorConfigJson {
    fn default() -> Self {
        let cfg = DetectorConfig::default();
        Self {
            pyramid_levels: cfg.pyramid_levels,
            per_template_topk: cfg.per_template_topk,
            nms_radius: cfg.nms_radius,
            beam_width: cfg.beam_width,
            roi_radius: cfg.roi_radius,
            min_var_i: cfg.min_var_i,
            parallel: cfg.parallel,
        }
    }
}

impl From<DetectorConfigJson> for DetectorConfig {
    fn from(value: DetectorConfigJson) -> Self {
        Self {
            pyramid_levels: value.pyramid_levels,
            per_template_topk: value.per_template_topk,
            nms_radius: value.nms_radius,
            beam_width: value.beam_width,
            roi_radius: value.roi_radius,
            min_var_i: value.min_var_i,
            parallel: value.parallel,
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
struct IngestConfigJson {
    chroma_lower: [u8; 3],
    chroma_upper: [u8; 3],
    crop_margin: i32,
}

impl Default for IngestConfigJson {
    fn default() -> Self {
        let cfg = IngestConfig::default();
        Self {
            chroma_lower: cfg.chroma_key.lower,
            chroma_upper: cfg.chroma_key.upper,
            crop_margin: cfg.crop_margin,
        }
    }
}

impl From<IngestConfigJson> for IngestConfig {
    fn from(value: IngestConfigJson) -> Self {
        Self {
            chroma_key: ChromaKey {
                lower: value.chroma_lower,
                upper: value.chroma_upper,
            },
            crop_margin: value.crop_margin,
        }
    }
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
struct Config {
    detector: DetectorConfigJson,
    ingest: IngestConfigJson,
}

#[derive(Debug, Serialize)]
struct DetectionRecord {
    image: String,
    match_count: usize,
    template_id: String,
    x: usize,
    y: usize,
    similarity: f32,
    pose: [[f32; 4]; 4],
}

impl DetectionRecord {
    fn new(path: &Path, detection: &Detection) -> Self {
        Self {
            image: path.display().to_string(),
            match_count: detection.match_count,
            template_id: detection.template_id.class_id(),
            x: detection.x,
            y: detection.y,
            similarity: detection.similarity,
            pose: detection.pose.to_rows(),
        }
    }
}

fn parse_cli() -> Cli {
    match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            std::process::exit(if err.use_stderr() { 1 } else { 0 });
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<Config, Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            let text = fs::read_to_string(path)?;
            Ok(serde_json::from_str(&text)?)
        }
        None => Ok(Config::default()),
    }
}

fn write_annotations(
    dir: &Path,
    image_index: usize,
    mut image: ColorImage,
    detection: &Detection,
    record: &TemplateRecord,
) -> Result<(), Box<dyn std::error::Error>> {
    fs::create_dir_all(dir)?;

    let bounds = Rect::new(
        detection.x as i32,
        detection.y as i32,
        record.cropped.width() as i32,
        record.cropped.height() as i32,
    );
    outline_rect(&mut image, bounds, MARKER_COLOR);
    mark_match(&mut image, detection.x, detection.y, MARKER_RADIUS, MARKER_COLOR);

    let detection_path = dir.join(format!("detection{image_index:04}.png"));
    let template_path = dir.join(format!("detection{image_index:04}_template.png"));
    let mask_path = dir.join(format!("detection{image_index:04}_mask.png"));
    save_color_image(&image, &detection_path)?;
    save_color_image(&record.original, &template_path)?;
    save_gray_image(&record.mask, &mask_path)?;
    tracing::info!(path = %detection_path.display(), "wrote annotated image");
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = parse_cli();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("posematch=info".parse()?))
            .with_target(false)
            .init();
    }

    if cli.print_example {
        println!("{}", serde_json::to_string_pretty(&Config::default())?);
        return Ok(());
    }

    let template_root = cli.template.ok_or("template folder must be given")?;
    let config = load_config(cli.config.as_deref())?;

    let mut detector = Detector::new(config.detector.into());
    let store = ingest_templates(&template_root, &mut detector, &config.ingest.into())?;
    println!("Number of templates: {}", store.len());

    let orchestrator = MatchOrchestrator::new(detector, store).with_threshold(cli.threshold);
    let mut records = Vec::with_capacity(cli.image.len());
    for (image_index, path) in cli.image.iter().enumerate() {
        let image = load_test_image(path)?;
        let detection = orchestrator.detect_image(&image)?;

        println!("Number of matches: {}", detection.match_count);
        println!(
            "Best match: template {} at ({}, {}) similarity {:.1}",
            detection.template_id, detection.x, detection.y, detection.similarity
        );
        println!("{}", detection.pose);

        if let Some(dir) = &cli.annotate_dir {
            let record = orchestrator.record(&detection)?;
            write_annotations(dir, image_index, image, &detection, record)?;
        }
        records.push(DetectionRecord::new(path, &detection));
    }

    if let Some(path) = &cli.output {
        fs::write(path, serde_json::to_string_pretty(&records)?)?;
    }

    Ok(())
}
