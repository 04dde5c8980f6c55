pub mod batch;
pub mod error;
pub mod report;

pub use batch::{TestimonialBatch, VideoAsset};
pub use error::{ErrorCategory, ErrorClassifier, InsightError, Result};
pub use report::{
    InsightReport, ModelInsights, ReportMetadata, SentimentBreakdown, ThemeAnalysis, UserSegments,
    VideoAnalysis,
};
