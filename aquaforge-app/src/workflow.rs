use crate::config::AppContext;
use crate::render::{self, BatchReport, BloomReport, Notice, NoticeLevel, OutputFormat, WaterReport};
use anyhow::{Context, Result};
use aquaforge_core::{
    batch, bloom,
    detection::{
        frame::{self, Frame},
        DetectionCapability, DetectionInvoker, DetectionOutcome, DetectionResult, ModelLoader,
    },
    error::AquaforgeError,
    water_quality,
};
use aquaforge_schemas::water::{ColorDescriptor, SmellDescriptor, WaterSample};
use std::{
    fs,
    io,
    path::{Path, PathBuf},
};
use tracing::{info, warn};

pub fn show_ppe(format: OutputFormat) -> Result<String> {
    render::ppe(format)
}

pub fn show_about(ctx: &AppContext, format: OutputFormat) -> Result<String> {
    let status = match &ctx.capability {
        DetectionCapability::Available => format!("available (model: {})", ctx.settings.model.path.display()),
        DetectionCapability::Unavailable(reason) => format!("unavailable ({})", reason),
    };
    render::about(&status, format)
}

/// Assesses one operator reading. The reading is clamped onto the pH scale first.
pub fn run_water_check(
    ph: f64,
    color: ColorDescriptor,
    smell: SmellDescriptor,
    format: OutputFormat,
) -> Result<String> {
    let (ph, clamped) = water_quality::clamp_to_scale(ph);
    if clamped {
        warn!(ph, "pH reading was outside the 0-14 scale and has been clamped");
    }
    let sample = WaterSample { ph, color, smell };
    let verdict = water_quality::assess(&sample);
    info!(status = %verdict.status, "water quality diagnosed");
    render::water(&WaterReport { sample: &sample, verdict: &verdict }, format)
}

pub fn run_water_batch(input: &Path, output: Option<&Path>, format: OutputFormat) -> Result<String> {
    let source = input.display().to_string();
    let reader = fs::File::open(input).with_context(|| format!("Failed to open samples file: {:?}", input))?;

    let output_label = output.map(|p| p.display().to_string());
    match (output, format) {
        (Some(path), _) => {
            let writer = fs::File::create(path)
                .with_context(|| format!("Failed to create verdicts file: {:?}", path))?;
            let summary = batch::assess_csv(&source, reader, writer)?;
            let report = BatchReport {
                source: &source,
                output: output_label.as_deref(),
                summary: &summary,
                verdicts: None,
            };
            render::batch(&report, format)
        }
        // The verdict rows are the text output.
        (None, OutputFormat::Text) => {
            batch::assess_csv(&source, reader, io::stdout().lock())?;
            Ok(String::new())
        }
        (None, OutputFormat::Json) => {
            let (rows, summary) = batch::assess_records(&source, reader)?;
            let report = BatchReport { source: &source, output: None, summary: &summary, verdicts: Some(&rows) };
            render::batch(&report, format)
        }
    }
}

/// Analyses each image with a single model invocation, rendering every
/// outcome inline. One failing image never stops the rest.
pub fn run_bloom_detection<L: ModelLoader>(
    ctx: &AppContext,
    invoker: &DetectionInvoker<L>,
    images: &[PathBuf],
    output: Option<&Path>,
    format: OutputFormat,
) -> Result<String> {
    if let DetectionCapability::Unavailable(reason) = &ctx.capability {
        let message = AquaforgeError::DetectionUnavailable(reason.clone()).to_string();
        return render::notice(&Notice { level: NoticeLevel::Info, message }, format);
    }

    let mut out = String::new();
    for (index, image) in images.iter().enumerate() {
        let rendered = match analyze_image(ctx, invoker, image, index, output) {
            Ok(report) => render::bloom(&report, format)?,
            Err(message) => render::notice(&Notice { level: NoticeLevel::Error, message }, format)?,
        };
        out.push_str(&rendered);
    }
    Ok(out)
}

fn analyze_image<L: ModelLoader>(
    ctx: &AppContext,
    invoker: &DetectionInvoker<L>,
    image: &Path,
    index: usize,
    output: Option<&Path>,
) -> Result<BloomReport, String> {
    let frame = Frame::open(image).map_err(|e| e.to_string())?;

    let result: DetectionResult = match invoker.analyze(frame.into_rgb()) {
        DetectionOutcome::Success(result) => result,
        DetectionOutcome::ArtifactNotFound(path) => {
            return Err(AquaforgeError::ArtifactNotFound(path).to_string())
        }
        DetectionOutcome::InferenceFailure(message) => {
            return Err(format!("Error during detection: {}", message))
        }
    };

    let annotated_path = match output {
        Some(path) => path.to_path_buf(),
        None => default_annotated_path(&ctx.settings.output_dir, image, index),
    };
    let annotated_image = match frame::save_rgb(&result.annotated_image, &annotated_path) {
        Ok(()) => Some(annotated_path),
        Err(e) => {
            warn!(error = %e, "annotated image not saved");
            None
        }
    };

    let verdict = bloom::assess(result.region_count);
    info!(image = %image.display(), regions = result.region_count, severity = %verdict.severity, "bloom analysis complete");
    Ok(BloomReport { image: image.to_path_buf(), annotated_image, regions: result.regions, verdict })
}

/// `index` is the image's position on the command line, so two inputs with
/// the same file stem never share an output file.
fn default_annotated_path(output_dir: &Path, image: &Path, index: usize) -> PathBuf {
    let stem = image.file_stem().and_then(|s| s.to_str()).unwrap_or("image");
    let stamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
    output_dir.join(format!("{}_detection_{}_{}.png", stem, stamp, index + 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use aquaforge_core::detection::UnavailableLoader;
    use aquaforge_schemas::settings::Settings;

    fn context(capability: DetectionCapability) -> AppContext {
        AppContext { settings: Settings::default(), capability }
    }

    #[test]
    fn out_of_scale_ph_is_clamped_before_assessment() {
        let text = run_water_check(20.0, ColorDescriptor::Brown, SmellDescriptor::Fishy, OutputFormat::Text).unwrap();
        assert!(text.contains("CRITICAL"));
        assert!(text.contains("pH:    14.0"));
    }

    #[test]
    fn unavailable_detection_renders_a_notice() {
        let ctx = context(DetectionCapability::Unavailable("no backend".into()));
        let invoker = DetectionInvoker::new(UnavailableLoader, ctx.settings.model.clone());
        let text = run_bloom_detection(&ctx, &invoker, &[PathBuf::from("pond.jpg")], None, OutputFormat::Text).unwrap();
        assert_eq!(text, "Note: Algal bloom detection is unavailable: no backend\n");
    }

    #[test]
    fn bad_images_are_reported_inline() {
        let ctx = context(DetectionCapability::Available);
        let invoker = DetectionInvoker::new(UnavailableLoader, ctx.settings.model.clone());
        let images = [PathBuf::from("pond.gif"), PathBuf::from("missing.png")];
        let text = run_bloom_detection(&ctx, &invoker, &images, None, OutputFormat::Text).unwrap();
        assert!(text.contains("Unsupported image type"));
        assert!(text.contains("Failed to decode image"));
    }

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("aquaforge-{}-{}", name, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn missing_model_is_reported_inline_for_a_real_image() {
        let dir = temp_dir("missing-model");
        let image_path = dir.join("pond.png");
        image::RgbImage::from_pixel(8, 8, image::Rgb([20, 140, 60])).save(&image_path).unwrap();

        let mut ctx = context(DetectionCapability::Available);
        ctx.settings.model.path = dir.join("algaldetection.onnx");
        ctx.settings.output_dir = dir.join("out");
        let invoker = DetectionInvoker::new(UnavailableLoader, ctx.settings.model.clone());

        let text = run_bloom_detection(&ctx, &invoker, &[image_path], None, OutputFormat::Text).unwrap();
        fs::remove_dir_all(&dir).unwrap();

        let expected = format!("Error: {} not found in project folder.\n", ctx.settings.model.path.display());
        assert_eq!(text, expected);
        assert!(!invoker.is_loaded());
    }

    #[test]
    fn json_batch_without_output_embeds_the_verdicts() {
        let dir = temp_dir("batch-json");
        let input = dir.join("samples.csv");
        fs::write(&input, "ph,color,smell\n7.0,Clear,Fresh\n10.01,Murky,Rotten\n").unwrap();

        let text = run_water_batch(&input, None, OutputFormat::Json).unwrap();
        fs::remove_dir_all(&dir).unwrap();

        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["summary"]["samples"], 2);
        assert!(value["output"].is_null());
        let verdicts = value["verdicts"].as_array().unwrap();
        assert_eq!(verdicts.len(), 2);
        assert_eq!(verdicts[0]["status"], "GOOD");
        assert_eq!(verdicts[1]["status"], "CRITICAL");
    }

    #[test]
    fn batch_with_output_file_reports_only_the_summary() {
        let dir = temp_dir("batch-file");
        let input = dir.join("samples.csv");
        let output = dir.join("verdicts.csv");
        fs::write(&input, "ph,color,smell\n6.0,Brown,Earthy\n").unwrap();

        let text = run_water_batch(&input, Some(&output), OutputFormat::Json).unwrap();
        let written = fs::read_to_string(&output).unwrap();
        fs::remove_dir_all(&dir).unwrap();

        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert!(value.get("verdicts").is_none());
        assert_eq!(written, "ph,color,smell,status\n6.0,brown,earthy,MODERATE\n");
    }

    #[test]
    fn annotated_name_keeps_the_source_stem() {
        let path = default_annotated_path(Path::new("out"), Path::new("ponds/east.jpeg"), 0);
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("east_detection_"));
        assert!(name.ends_with("_1.png"));
        assert!(path.starts_with("out"));
    }

    #[test]
    fn images_sharing_a_stem_get_distinct_annotated_paths() {
        let first = default_annotated_path(Path::new("out"), Path::new("a/pond.jpg"), 0);
        let second = default_annotated_path(Path::new("out"), Path::new("b/pond.jpg"), 1);
        assert_ne!(first, second);
    }
}
