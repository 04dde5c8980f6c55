//! Analyze Command
//!
//! The pipeline front end: reads a testimonial blob (file or stdin),
//! runs one analysis, and prints the report JSON on stdout. Failures
//! print the classified error object instead, so the consuming layer
//! always gets machine-readable output.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::ai::gateway::GatewayConfig;
use crate::ai::pipeline::InsightPipeline;
use crate::config::ConfigLoader;
use crate::types::{InsightError, InsightReport, Result, TestimonialBatch, VideoAsset};

/// Options collected from the CLI surface.
pub struct AnalyzeOptions {
    /// Path to the testimonial blob, or "-" for stdin
    pub input: PathBuf,
    /// Treat each non-empty input line as one testimonial
    pub lines: bool,
    /// Subject label shown to the model
    pub title: String,
    /// Business context shown to the model
    pub business: Option<String>,
    /// Optional video attachment
    pub video: Option<PathBuf>,
    /// Model identifier override
    pub model: Option<String>,
    /// Pretty-print the report JSON
    pub pretty: bool,
}

pub async fn run(options: AnalyzeOptions) -> anyhow::Result<()> {
    let mut config = ConfigLoader::load()?;
    if let Some(model) = options.model {
        config.gateway.model = model;
    }
    let pretty = options.pretty || config.output.pretty;

    let raw = read_input(&options.input)
        .with_context(|| format!("failed to read testimonials from {}", input_label(&options.input)))?;
    let batch = build_batch(&raw, options.lines, &options.title, options.business.as_deref());

    let video = match &options.video {
        Some(path) => Some(load_video(path)?),
        None => None,
    };

    match execute(config.gateway, &batch, video.as_ref()).await {
        Ok(report) => {
            let rendered = if pretty {
                report.to_json_pretty()?
            } else {
                serde_json::to_string(&report)?
            };
            println!("{rendered}");
            Ok(())
        }
        Err(err) => {
            // Machine-readable failure object on stdout; the styled
            // line on stderr comes from the top-level handler.
            println!("{}", error_object(&err));
            Err(err.into())
        }
    }
}

/// Everything whose failure is classified: the video gate, gateway
/// construction, and the pipeline run itself.
async fn execute(
    gateway: GatewayConfig,
    batch: &TestimonialBatch,
    video: Option<&VideoAsset>,
) -> Result<InsightReport> {
    if let Some(asset) = video {
        asset.validate()?;
    }
    let pipeline = InsightPipeline::from_config(gateway)?;
    pipeline.analyze(batch, video).await
}

fn read_input(path: &Path) -> std::io::Result<String> {
    if path == Path::new("-") {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        fs::read_to_string(path)
    }
}

fn input_label(path: &Path) -> String {
    if path == Path::new("-") {
        "stdin".to_string()
    } else {
        path.display().to_string()
    }
}

/// Assemble the batch from the raw input text.
///
/// Default mode treats the input as one delimiter-joined blob, exactly
/// as the collection layer submits it; `--lines` mode treats each
/// non-empty line as one testimonial.
fn build_batch(raw: &str, lines: bool, title: &str, business: Option<&str>) -> TestimonialBatch {
    let batch = if lines {
        TestimonialBatch::new(
            raw.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect(),
        )
    } else {
        TestimonialBatch::from_joined(raw.trim())
    };

    batch
        .with_subject_label(title)
        .with_business_context(business.unwrap_or_default())
}

/// Read the attachment and declare its MIME type from the extension.
/// The size/format gate runs later with the other classified checks.
fn load_video(path: &Path) -> anyhow::Result<VideoAsset> {
    let bytes =
        fs::read(path).with_context(|| format!("failed to read video {}", path.display()))?;
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("video")
        .to_string();
    Ok(VideoAsset::new(bytes, mime_from_extension(path), file_name))
}

fn mime_from_extension(path: &Path) -> String {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => format!("video/{}", ext.to_lowercase()),
        None => "application/octet-stream".to_string(),
    }
}

/// Classified failure rendered for the consuming layer
fn error_object(err: &InsightError) -> serde_json::Value {
    serde_json::json!({
        "error": err.to_string(),
        "category": err.category().to_string(),
    })
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_inference() {
        assert_eq!(mime_from_extension(Path::new("clip.mp4")), "video/mp4");
        assert_eq!(mime_from_extension(Path::new("take.MOV")), "video/mov");
        assert_eq!(
            mime_from_extension(Path::new("noext")),
            "application/octet-stream"
        );
    }

    #[test]
    fn test_build_batch_joined_mode() {
        let batch = build_batch("a | b | c\n", false, "My Form", None);
        assert_eq!(batch.len(), 3);
        assert_eq!(batch.subject_label(), "My Form");
        assert_eq!(batch.business_context(), None);
    }

    #[test]
    fn test_build_batch_lines_mode() {
        let batch = build_batch("first\n\n  second  \n", true, "", Some("retail"));
        assert_eq!(batch.entries(), &["first", "second"]);
        assert_eq!(batch.subject_label(), "Product/Service");
        assert_eq!(batch.business_context(), Some("retail"));
    }

    #[test]
    fn test_error_object_carries_category() {
        let object = error_object(&InsightError::EmptyBatch);
        assert_eq!(object["category"], "INVALID_INPUT");
        assert_eq!(object["error"], "no testimonials provided");
    }

    #[test]
    fn test_load_video_reads_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("demo.webm");
        fs::write(&path, [1u8, 2, 3]).unwrap();

        let asset = load_video(&path).unwrap();
        assert_eq!(asset.mime_type, "video/webm");
        assert_eq!(asset.file_name, "demo.webm");
        assert_eq!(asset.size_bytes(), 3);
        assert!(asset.validate().is_ok());
    }
}
