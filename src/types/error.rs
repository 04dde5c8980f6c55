//! Unified Error Type System
//!
//! Centralized error types for the whole pipeline, plus the classifier
//! that maps any failure to one of the user-facing categories.
//!
//! ## Error Categories
//!
//! - **InvalidInput**: empty batch or missing credential (fix the request)
//! - **AuthFailure**: provider rejected the credential (configuration problem)
//! - **QuotaExceeded**: provider rate/usage limit (back off, retry later)
//! - **MediaRejected**: video too large or unsupported (retry text-only)
//! - **ExtractionFailure**: no JSON-shaped substring in the model answer
//! - **ValidationFailure**: JSON found but unparseable or missing required fields
//! - **Unclassified**: residual bucket for everything else
//!
//! ## Design Principles
//!
//! - Single error type (`InsightError`) for the entire pipeline
//! - Structured variants classify by construction; free-form provider
//!   text classifies by substring matching
//! - Failures are surfaced distinctly, never collapsed into one generic
//!   fault and never downgraded to an empty report

use thiserror::Error;

// =============================================================================
// Error Categories
// =============================================================================

/// User-facing failure categories, each with a distinct signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Empty batch or missing credential - detected before any external call
    InvalidInput,
    /// Provider rejected the credential - fail fast, fix configuration
    AuthFailure,
    /// Provider-side rate/usage limit - caller may retry later
    QuotaExceeded,
    /// Video too large or unsupported - caller should retry text-only
    MediaRejected,
    /// No JSON object found in the model answer - hard failure
    ExtractionFailure,
    /// JSON found but unparseable or missing required fields - hard failure
    ValidationFailure,
    /// Anything that matched no known pattern
    Unclassified,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput => write!(f, "INVALID_INPUT"),
            Self::AuthFailure => write!(f, "AUTH_FAILURE"),
            Self::QuotaExceeded => write!(f, "QUOTA_EXCEEDED"),
            Self::MediaRejected => write!(f, "MEDIA_REJECTED"),
            Self::ExtractionFailure => write!(f, "EXTRACTION_FAILURE"),
            Self::ValidationFailure => write!(f, "VALIDATION_FAILURE"),
            Self::Unclassified => write!(f, "UNCLASSIFIED"),
        }
    }
}

impl ErrorCategory {
    /// Whether the caller may retry the same request later.
    ///
    /// Only quota exhaustion qualifies: extraction and validation
    /// failures would double the cost of an expensive call with no
    /// guarantee of success, and the rest require the caller to change
    /// something first.
    pub fn is_retry_later(&self) -> bool {
        matches!(self, Self::QuotaExceeded)
    }

    /// Whether the failure was detected before any external call
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::InvalidInput)
    }
}

// =============================================================================
// Pipeline Error
// =============================================================================

#[derive(Debug, Error)]
pub enum InsightError {
    // -------------------------------------------------------------------------
    // Input / configuration errors (raised before any external call)
    // -------------------------------------------------------------------------
    #[error("no testimonials provided")]
    EmptyBatch,

    #[error("model API key not configured: set {env_var}")]
    MissingCredential { env_var: &'static str },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("config error: {0}")]
    Config(String),

    // -------------------------------------------------------------------------
    // Gateway errors (external call failed)
    // -------------------------------------------------------------------------
    /// Request never produced an HTTP response (DNS, connect, timeout)
    #[error("request to {provider} failed: {message}")]
    Transport { provider: String, message: String },

    /// Provider answered with a non-success status
    #[error("{provider} API error ({status}): {message}")]
    Provider {
        provider: String,
        status: u16,
        message: String,
    },

    /// Provider answered 2xx but the envelope was not the documented shape
    #[error("unexpected {provider} response payload: {message}")]
    Payload { provider: String, message: String },

    // -------------------------------------------------------------------------
    // Recovery errors (the model answered, but not usably)
    // -------------------------------------------------------------------------
    #[error("no JSON object found in model response")]
    Extraction {
        /// Truncated raw answer, kept for diagnosis
        preview: String,
    },

    #[error("model response is not valid JSON: {message}")]
    ResponseParse { message: String },

    #[error("model response missing required field '{field}'")]
    MissingField { field: &'static str },

    // -------------------------------------------------------------------------
    // System errors (auto From impl)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl InsightError {
    /// Build a transport error from a reqwest failure
    pub fn transport(provider: impl Into<String>, err: &reqwest::Error) -> Self {
        Self::Transport {
            provider: provider.into(),
            message: err.to_string(),
        }
    }

    /// Build an extraction error, truncating the raw answer to a preview
    pub fn extraction(raw: &str) -> Self {
        Self::Extraction {
            preview: raw.chars().take(200).collect(),
        }
    }

    /// The user-facing category for this failure
    pub fn category(&self) -> ErrorCategory {
        ErrorClassifier::classify(self)
    }
}

pub type Result<T> = std::result::Result<T, InsightError>;

// =============================================================================
// Error Classifier
// =============================================================================

/// Maps any pipeline failure to its user-facing category.
///
/// Structured variants classify by construction. Provider and transport
/// failures carry free-form text, so they fall back to substring
/// matching against the message (pragmatic but fragile; the status code
/// is consulted first where one exists).
pub struct ErrorClassifier;

impl ErrorClassifier {
    pub fn classify(err: &InsightError) -> ErrorCategory {
        match err {
            InsightError::EmptyBatch
            | InsightError::MissingCredential { .. }
            | InsightError::InvalidInput(_)
            | InsightError::Config(_) => ErrorCategory::InvalidInput,

            InsightError::Extraction { .. } => ErrorCategory::ExtractionFailure,

            InsightError::ResponseParse { .. } | InsightError::MissingField { .. } => {
                ErrorCategory::ValidationFailure
            }

            InsightError::Provider {
                status, message, ..
            } => Self::classify_http_status(*status)
                .unwrap_or_else(|| Self::classify_message(message)),

            InsightError::Transport { message, .. } | InsightError::Payload { message, .. } => {
                Self::classify_message(message)
            }

            InsightError::Io(_) | InsightError::Json(_) => ErrorCategory::Unclassified,
        }
    }

    /// Classify an HTTP status code directly (more reliable than text)
    pub fn classify_http_status(status: u16) -> Option<ErrorCategory> {
        match status {
            401 | 403 => Some(ErrorCategory::AuthFailure),
            429 => Some(ErrorCategory::QuotaExceeded),
            413 => Some(ErrorCategory::MediaRejected),
            _ => None,
        }
    }

    /// Classify a free-form provider/transport message by substrings
    pub fn classify_message(message: &str) -> ErrorCategory {
        let lower = message.to_lowercase();

        // Credential patterns
        if lower.contains("api key")
            || lower.contains("unauthorized")
            || lower.contains("unauthenticated")
            || lower.contains("permission denied")
        {
            return ErrorCategory::AuthFailure;
        }

        // Quota / rate-limit patterns
        if lower.contains("quota")
            || lower.contains("rate limit")
            || lower.contains("resource exhausted")
            || lower.contains("too many requests")
        {
            return ErrorCategory::QuotaExceeded;
        }

        // Media patterns
        if lower.contains("file size")
            || lower.contains("video")
            || lower.contains("payload size")
            || lower.contains("unsupported media")
            || lower.contains("mime")
        {
            return ErrorCategory::MediaRejected;
        }

        ErrorCategory::Unclassified
    }
}

// =============================================================================
// Tests
// =============================================================================
