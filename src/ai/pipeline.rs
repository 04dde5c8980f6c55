//! Insight Pipeline
//!
//! The single entry point tying the stages together: input gate,
//! credential preflight, prompt compilation, request assembly, one
//! model call, JSON recovery, validation, and metric merge.
//!
//! ## Flow
//!
//! ```text
//! TestimonialBatch ──► compile_prompt ──► assemble_request_parts
//!                                               │
//!                                               ▼
//! InsightReport ◄── MetricAggregator ◄── ResultValidator ◄── gateway
//! ```
//!
//! One invocation makes at most one model call and owns its inputs for
//! the duration; concurrent invocations share nothing but the gateway
//! handle. Failures return immediately and are never downgraded to an
//! empty report, since an empty report is indistinguishable from "no
//! testimonial had interesting content".

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tracing::{info, warn};

use crate::ai::assemble::assemble_request_parts;
use crate::ai::extract::extract_json_span;
use crate::ai::gateway::{GatewayConfig, GeminiGateway, SharedGateway};
use crate::ai::metrics::MetricAggregator;
use crate::ai::prompt::compile_prompt;
use crate::ai::validate::ResultValidator;
use crate::types::{InsightError, InsightReport, Result, TestimonialBatch, VideoAsset};

/// Orchestrates one analysis run per call.
pub struct InsightPipeline {
    gateway: SharedGateway,
}

impl InsightPipeline {
    pub fn new(gateway: SharedGateway) -> Self {
        Self { gateway }
    }

    /// Convenience constructor wiring up the production gateway.
    pub fn from_config(config: GatewayConfig) -> Result<Self> {
        Ok(Self::new(Arc::new(GeminiGateway::new(config)?)))
    }

    /// Analyze a batch, optionally with a video attachment.
    ///
    /// Returns the final report with metadata populated, or the first
    /// failure encountered. Input problems and a missing credential are
    /// rejected before any network activity.
    pub async fn analyze(
        &self,
        batch: &TestimonialBatch,
        video: Option<&VideoAsset>,
    ) -> Result<InsightReport> {
        let started = Instant::now();

        // Covers zero entries and a lone blank entry; a multi-entry
        // batch of blanks still goes through, matching the joined-text
        // semantics the inbound interface uses.
        if batch.joined_text().trim().is_empty() {
            return Err(InsightError::EmptyBatch);
        }

        self.gateway.preflight()?;

        info!(
            "Analyzing {} testimonial(s) for \"{}\" (video: {})",
            batch.len(),
            batch.subject_label(),
            video.is_some()
        );

        let prompt = compile_prompt(batch, video.is_some());
        let parts = assemble_request_parts(prompt, video);

        let raw = self.gateway.generate(&parts).await?;

        let span = extract_json_span(&raw).ok_or_else(|| {
            warn!(
                "Model answer contains no JSON object ({} chars): {}",
                raw.len(),
                raw.chars().take(200).collect::<String>()
            );
            InsightError::extraction(&raw)
        })?;

        let insights = ResultValidator::validate(span)?;

        if video.is_some() && insights.video_analysis.is_none() {
            warn!("Video was supplied but the answer has no videoAnalysis section");
        }

        let report =
            MetricAggregator::aggregate(insights, batch, video, started.elapsed(), Utc::now());
        info!(
            "Analysis complete: {} testimonial(s) in {}ms",
            report.metadata.analyzed_count, report.metadata.processing_time_ms
        );

        Ok(report)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::assemble::RequestPart;
    use crate::ai::gateway::ModelGateway;
    use crate::types::ErrorCategory;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Gateway double that plays back one scripted outcome and records
    /// every request it receives.
    struct ScriptedGateway {
        script: Mutex<Option<Result<String>>>,
        seen_parts: Mutex<Vec<Vec<RequestPart>>>,
        calls: AtomicUsize,
        has_key: bool,
    }

    impl ScriptedGateway {
        fn answering(text: &str) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(Some(Ok(text.to_string()))),
                seen_parts: Mutex::new(Vec::new()),
                calls: AtomicUsize::new(0),
                has_key: true,
            })
        }

        fn failing(err: InsightError) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(Some(Err(err))),
                seen_parts: Mutex::new(Vec::new()),
                calls: AtomicUsize::new(0),
                has_key: true,
            })
        }

        fn without_key() -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(None),
                seen_parts: Mutex::new(Vec::new()),
                calls: AtomicUsize::new(0),
                has_key: false,
            })
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn last_parts(&self) -> Vec<RequestPart> {
            self.seen_parts
                .lock()
                .unwrap()
                .last()
                .cloned()
                .unwrap_or_default()
        }
    }

    #[async_trait]
    impl ModelGateway for ScriptedGateway {
        fn preflight(&self) -> Result<()> {
            if self.has_key {
                Ok(())
            } else {
                Err(InsightError::MissingCredential {
                    env_var: "GEMINI_API_KEY",
                })
            }
        }

        async fn generate(&self, parts: &[RequestPart]) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen_parts.lock().unwrap().push(parts.to_vec());
            self.script
                .lock()
                .unwrap()
                .take()
                .expect("gateway called without a scripted outcome")
        }

        fn name(&self) -> &str {
            "scripted"
        }

        fn model(&self) -> &str {
            "test-model"
        }
    }

    fn sample_batch() -> TestimonialBatch {
        TestimonialBatch::new(vec![
            "Great support!".to_string(),
            "Too expensive".to_string(),
            "Easy to use".to_string(),
        ])
    }

    const GOOD_ANSWER: &str = r#"Here are the requested insights:
{"painPoint": "pricing", "bestFeature": "support", "sentiment": {"overall": "mixed", "positive": 60, "negative": 30, "neutral": 10}}"#;

    #[tokio::test]
    async fn test_end_to_end_text_only() {
        let gateway = ScriptedGateway::answering(GOOD_ANSWER);
        let pipeline = InsightPipeline::new(gateway.clone());

        let report = pipeline.analyze(&sample_batch(), None).await.unwrap();

        assert_eq!(report.insights.pain_point, "pricing");
        assert_eq!(report.insights.best_feature, "support");
        // Count comes from the batch object, never from the answer
        assert_eq!(report.metadata.analyzed_count, 3);
        assert!((report.metadata.avg_sentiment_score - 0.3).abs() < f64::EPSILON);
        assert!(!report.metadata.has_video_analysis);
        assert_eq!(gateway.call_count(), 1);

        // Omitted business context reaches the model as the placeholder
        let parts = gateway.last_parts();
        assert_eq!(parts.len(), 1);
        match &parts[0] {
            RequestPart::Text { text } => {
                assert!(text.contains("\"no specific business given\" business"));
                assert!(text.contains("Great support! | Too expensive | Easy to use"));
            }
            other => panic!("expected text part, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_batch_rejected_without_call() {
        let gateway = ScriptedGateway::answering(GOOD_ANSWER);
        let pipeline = InsightPipeline::new(gateway.clone());

        let err = pipeline
            .analyze(&TestimonialBatch::new(vec![]), None)
            .await
            .unwrap_err();

        assert!(matches!(err, InsightError::EmptyBatch));
        assert_eq!(err.category(), ErrorCategory::InvalidInput);
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn test_blank_entry_rejected_without_call() {
        let gateway = ScriptedGateway::answering(GOOD_ANSWER);
        let pipeline = InsightPipeline::new(gateway.clone());

        let batch = TestimonialBatch::from_joined("   ");
        let err = pipeline.analyze(&batch, None).await.unwrap_err();

        assert!(matches!(err, InsightError::EmptyBatch));
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_credential_makes_zero_calls() {
        let gateway = ScriptedGateway::without_key();
        let pipeline = InsightPipeline::new(gateway.clone());

        let err = pipeline.analyze(&sample_batch(), None).await.unwrap_err();

        assert!(matches!(err, InsightError::MissingCredential { .. }));
        assert_eq!(err.category(), ErrorCategory::InvalidInput);
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn test_prose_only_answer_is_extraction_failure() {
        let gateway = ScriptedGateway::answering("I am unable to produce JSON today.");
        let pipeline = InsightPipeline::new(gateway.clone());

        let err = pipeline.analyze(&sample_batch(), None).await.unwrap_err();

        assert_eq!(err.category(), ErrorCategory::ExtractionFailure);
        assert_eq!(gateway.call_count(), 1);
    }

    #[tokio::test]
    async fn test_incomplete_answer_is_validation_failure() {
        let gateway = ScriptedGateway::answering(r#"{"painPoint": "only this"}"#);
        let pipeline = InsightPipeline::new(gateway);

        let err = pipeline.analyze(&sample_batch(), None).await.unwrap_err();

        assert_eq!(err.category(), ErrorCategory::ValidationFailure);
    }

    #[tokio::test]
    async fn test_gateway_failure_propagates_unmasked() {
        let gateway = ScriptedGateway::failing(InsightError::Provider {
            provider: "gemini".to_string(),
            status: 429,
            message: "Quota exceeded for requests".to_string(),
        });
        let pipeline = InsightPipeline::new(gateway.clone());

        let err = pipeline.analyze(&sample_batch(), None).await.unwrap_err();

        assert_eq!(err.category(), ErrorCategory::QuotaExceeded);
        // Exactly one attempt, no retry
        assert_eq!(gateway.call_count(), 1);
    }

    #[tokio::test]
    async fn test_video_request_sends_two_parts() {
        let gateway = ScriptedGateway::answering(GOOD_ANSWER);
        let pipeline = InsightPipeline::new(gateway.clone());
        let asset = VideoAsset::new(vec![9, 9, 9], "video/webm", "take-two.webm");

        let report = pipeline
            .analyze(&sample_batch(), Some(&asset))
            .await
            .unwrap();

        let parts = gateway.last_parts();
        assert_eq!(parts.len(), 2);
        assert!(parts[0].is_text());
        assert_eq!(parts[1].mime_type(), Some("video/webm"));

        // The answer had no videoAnalysis block, but the metadata still
        // records that an asset was supplied.
        assert!(report.metadata.has_video_analysis);
        assert_eq!(
            report.metadata.video_file_name.as_deref(),
            Some("take-two.webm")
        );
        assert!(report.insights.video_analysis.is_none());
    }

    #[tokio::test]
    async fn test_count_ignores_model_echo() {
        // The model claims a different count in its prose; metadata
        // still reflects the batch that was sent.
        let answer = r#"I analyzed 10 testimonials: {"painPoint": "a", "bestFeature": "b"}"#;
        let gateway = ScriptedGateway::answering(answer);
        let pipeline = InsightPipeline::new(gateway);

        let report = pipeline.analyze(&sample_batch(), None).await.unwrap();
        assert_eq!(report.metadata.analyzed_count, 3);
    }

    #[tokio::test]
    async fn test_fenced_answer_recovered() {
        let answer = "```json\n{\"painPoint\": \"a\", \"bestFeature\": \"b\"}\n```";
        let gateway = ScriptedGateway::answering(answer);
        let pipeline = InsightPipeline::new(gateway);

        let report = pipeline.analyze(&sample_batch(), None).await.unwrap();
        assert_eq!(report.insights.pain_point, "a");
    }
}
