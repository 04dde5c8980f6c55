//! Info Command
//!
//! Prints the service capability report: what this tool can analyze,
//! which model it will call, and the video limits the collection layer
//! enforces.

use chrono::Utc;

use crate::config::ConfigLoader;
use crate::constants::media;

pub fn run() -> anyhow::Result<()> {
    let config = ConfigLoader::load()?;

    let report = serde_json::json!({
        "status": "insight pipeline ready",
        "model": config.gateway.model,
        "features": [
            "Text testimonial analysis",
            "Video testimonial analysis",
            "Detailed sentiment analysis",
            "User segmentation",
            "Competitive insights",
            "Improvement suggestions",
        ],
        "supportedVideoFormats": media::SUPPORTED_VIDEO_FORMATS,
        "maxVideoSize": format!("{}MB", media::MAX_VIDEO_BYTES / (1024 * 1024)),
        "timestamp": Utc::now(),
    });

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capability_limits_render() {
        assert_eq!(format!("{}MB", media::MAX_VIDEO_BYTES / (1024 * 1024)), "50MB");
        assert_eq!(media::SUPPORTED_VIDEO_FORMATS, ["mp4", "mov", "avi", "webm"]);
    }
}
