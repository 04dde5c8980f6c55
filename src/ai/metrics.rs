//! Metric Aggregation
//!
//! Computes the locally-derived metadata block and merges it with the
//! validated model insights into the final report.
//!
//! Every metadata field is derived from the request itself, never from
//! the model's answer: the count comes from the batch object that was
//! actually sent (not from re-splitting echoed text, which drifts when
//! the model paraphrases), and the video flag records whether an asset
//! was supplied, even when the model omitted its videoAnalysis block.

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::types::{
    InsightReport, ModelInsights, ReportMetadata, SentimentBreakdown, TestimonialBatch, VideoAsset,
};

/// Merges validated insights with locally-computed metadata.
pub struct MetricAggregator;

impl MetricAggregator {
    pub fn aggregate(
        insights: ModelInsights,
        batch: &TestimonialBatch,
        video: Option<&VideoAsset>,
        processing_time: Duration,
        completed_at: DateTime<Utc>,
    ) -> InsightReport {
        let avg_sentiment_score = insights
            .sentiment
            .as_ref()
            .map(SentimentBreakdown::aggregate_score)
            .unwrap_or(0.0);

        let metadata = ReportMetadata {
            analyzed_count: batch.len(),
            avg_sentiment_score,
            has_video_analysis: video.is_some(),
            video_file_name: video.map(|asset| asset.file_name.clone()),
            processing_time_ms: processing_time.as_millis() as u64,
            timestamp: completed_at,
        };

        InsightReport { insights, metadata }
    }
}

// =============================================================================
// Tests
// =============================================================================
