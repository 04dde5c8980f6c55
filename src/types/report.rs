//! Insight Report Types
//!
//! The typed output of the pipeline. Field names serialize in camelCase
//! to match the wire contract consumed by presentation layers.
//!
//! ## Permissiveness
//!
//! Only `painPoint` and `bestFeature` are required. Every other field is
//! model-supplied and read permissively: absent or malformed sections
//! stay absent rather than failing the run. Numeric fields pass through
//! as the model produced them (sentiment percentages are not normalized,
//! credibility scores are not clamped).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Model-Supplied Sections
// =============================================================================

/// Sentiment percentages plus an overall label.
///
/// Values are whatever the model produced; they need not sum to 100 and
/// callers must not assume normalization.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct SentimentBreakdown {
    pub positive: f64,
    pub negative: f64,
    pub neutral: f64,
    /// Display label, typically "positive", "negative", or "mixed"
    pub overall: String,
}

impl SentimentBreakdown {
    /// Aggregate score in [-1, 1] when inputs are percentages
    pub fn aggregate_score(&self) -> f64 {
        (self.positive - self.negative) / 100.0
    }
}

/// Free-text observations per product dimension
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ThemeAnalysis {
    pub usability: String,
    pub performance: String,
    pub support: String,
    pub pricing: String,
}

/// Feedback excerpts grouped by user maturity
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct UserSegments {
    pub beginners: Vec<String>,
    pub advanced: Vec<String>,
    pub business: Vec<String>,
}

/// Observations from the video attachment, present only when one was sent
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct VideoAnalysis {
    pub emotional_tone: String,
    pub body_language: String,
    pub speech_pattern: String,
    /// Intended range 1-10, passed through as given (not clamped)
    pub credibility_score: i64,
    pub key_moments: Vec<String>,
    pub demographic_insights: String,
    pub engagement_level: String,
}

// =============================================================================
// Validated Model Output
// =============================================================================

/// The validated portion of the model's answer, before local metrics
/// are merged in.
///
/// `pain_point` and `best_feature` are guaranteed non-empty by the
/// validator; everything else may be absent or empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ModelInsights {
    pub pain_point: String,
    pub best_feature: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<SentimentBreakdown>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub themes: Option<ThemeAnalysis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_segments: Option<UserSegments>,
    #[serde(default)]
    pub improvements: Vec<String>,
    #[serde(default)]
    pub competitive_advantages: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_analysis: Option<VideoAnalysis>,
}

// =============================================================================
// Locally-Computed Metadata
// =============================================================================

/// Fields derived from the request itself, never from the model answer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetadata {
    /// Number of testimonials in the analyzed batch
    pub analyzed_count: usize,
    /// `(positive - negative) / 100`, or 0 when the model omitted sentiment
    pub avg_sentiment_score: f64,
    /// Whether a video was supplied with the request (the model may still
    /// omit its videoAnalysis block; the disagreement is diagnostic)
    pub has_video_analysis: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_file_name: Option<String>,
    /// Wall-clock duration of the pipeline run
    pub processing_time_ms: u64,
    /// Request completion time
    pub timestamp: DateTime<Utc>,
}

// =============================================================================
// Final Report
// =============================================================================

/// The complete pipeline output: validated model insights plus metadata
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InsightReport {
    #[serde(flatten)]
    pub insights: ModelInsights,
    pub metadata: ReportMetadata,
}

impl InsightReport {
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_metadata() -> ReportMetadata {
        ReportMetadata {
            analyzed_count: 3,
            avg_sentiment_score: 0.7,
            has_video_analysis: false,
            video_file_name: None,
            processing_time_ms: 1200,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_sentiment_aggregate_score() {
        let sentiment = SentimentBreakdown {
            positive: 80.0,
            negative: 10.0,
            neutral: 10.0,
            overall: "positive".to_string(),
        };
        assert!((sentiment.aggregate_score() - 0.7).abs() < f64::EPSILON);
    }

    #[test]
    fn test_sentiment_not_normalized() {
        // Values that do not sum to 100 pass through untouched
        let sentiment: SentimentBreakdown =
            serde_json::from_str(r#"{"positive": 90, "negative": 90, "neutral": 90}"#).unwrap();
        assert_eq!(sentiment.positive, 90.0);
        assert!((sentiment.aggregate_score() - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_sentiment_partial_fields_default() {
        let sentiment: SentimentBreakdown =
            serde_json::from_str(r#"{"positive": 55.5}"#).unwrap();
        assert_eq!(sentiment.positive, 55.5);
        assert_eq!(sentiment.negative, 0.0);
        assert_eq!(sentiment.overall, "");
    }

    #[test]
    fn test_credibility_score_not_clamped() {
        let video: VideoAnalysis =
            serde_json::from_str(r#"{"credibilityScore": 15, "keyMoments": ["intro"]}"#).unwrap();
        assert_eq!(video.credibility_score, 15);
        assert_eq!(video.key_moments, vec!["intro"]);
    }

    #[test]
    fn test_report_serializes_camel_case() {
        let report = InsightReport {
            insights: ModelInsights {
                pain_point: "slow exports".to_string(),
                best_feature: "search".to_string(),
                ..Default::default()
            },
            metadata: sample_metadata(),
        };
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["painPoint"], "slow exports");
        assert_eq!(json["bestFeature"], "search");
        assert_eq!(json["metadata"]["analyzedCount"], 3);
        assert_eq!(json["metadata"]["avgSentimentScore"], 0.7);
        assert_eq!(json["metadata"]["hasVideoAnalysis"], false);
        assert_eq!(json["metadata"]["processingTimeMs"], 1200);
    }

    #[test]
    fn test_absent_sections_stay_absent() {
        let report = InsightReport {
            insights: ModelInsights {
                pain_point: "a".to_string(),
                best_feature: "b".to_string(),
                ..Default::default()
            },
            metadata: sample_metadata(),
        };
        let json = serde_json::to_value(&report).unwrap();

        assert!(json.get("sentiment").is_none());
        assert!(json.get("videoAnalysis").is_none());
        assert!(json["metadata"].get("videoFileName").is_none());
        // Sequences serialize as empty arrays rather than disappearing
        assert_eq!(json["improvements"], serde_json::json!([]));
    }

    #[test]
    fn test_insights_deserialize_permissively() {
        let insights: ModelInsights = serde_json::from_str(
            r#"{"painPoint": "a", "bestFeature": "b", "userSegments": {"beginners": ["easy"]}}"#,
        )
        .unwrap();
        assert_eq!(insights.pain_point, "a");
        assert!(insights.sentiment.is_none());
        let segments = insights.user_segments.unwrap();
        assert_eq!(segments.beginners, vec!["easy"]);
        assert!(segments.advanced.is_empty());
    }
}
