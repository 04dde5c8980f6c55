//! Input Types
//!
//! The testimonial batch handed to the pipeline, and the optional video
//! asset that accompanies it.

use serde::{Deserialize, Serialize};

use crate::constants::{batch, media};
use crate::types::error::{InsightError, Result};

// =============================================================================
// Testimonial Batch
// =============================================================================

/// An ordered collection of testimonial texts to analyze together.
///
/// Entry order is preserved end to end: the prompt renders entries in
/// the order they were provided.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestimonialBatch {
    entries: Vec<String>,
    subject_label: String,
    business_context: Option<String>,
}

impl TestimonialBatch {
    pub fn new(entries: Vec<String>) -> Self {
        Self {
            entries,
            subject_label: batch::DEFAULT_SUBJECT_LABEL.to_string(),
            business_context: None,
        }
    }

    /// Rebuild a batch from text already joined with the batch delimiter
    pub fn from_joined(joined: &str) -> Self {
        let entries = joined
            .split(batch::JOIN_DELIMITER)
            .map(str::to_string)
            .collect();
        Self::new(entries)
    }

    /// Set the subject label. Blank labels keep the generic fallback so
    /// the prompt never renders an unnamed subject.
    pub fn with_subject_label(mut self, label: impl Into<String>) -> Self {
        let label = label.into();
        if !label.trim().is_empty() {
            self.subject_label = label;
        }
        self
    }

    pub fn with_business_context(mut self, context: impl Into<String>) -> Self {
        let context = context.into();
        if !context.trim().is_empty() {
            self.business_context = Some(context);
        }
        self
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn subject_label(&self) -> &str {
        &self.subject_label
    }

    pub fn business_context(&self) -> Option<&str> {
        self.business_context.as_deref()
    }

    /// Business context with the placeholder applied when none was given
    pub fn business_context_or_default(&self) -> &str {
        self.business_context
            .as_deref()
            .unwrap_or(batch::DEFAULT_BUSINESS_CONTEXT)
    }

    /// All entries joined with the batch delimiter, in input order
    pub fn joined_text(&self) -> String {
        self.entries.join(batch::JOIN_DELIMITER)
    }
}

// =============================================================================
// Video Asset
// =============================================================================

/// A video attachment forwarded to the model alongside the batch.
///
/// The pipeline forwards whatever it is given; `validate` is the
/// caller-side gate (size and format) applied before the pipeline runs.
#[derive(Clone, Serialize, Deserialize)]
pub struct VideoAsset {
    pub bytes: Vec<u8>,
    pub mime_type: String,
    pub file_name: String,
}

impl VideoAsset {
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
            file_name: file_name.into(),
        }
    }

    pub fn size_bytes(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_supported_format(&self) -> bool {
        media::ALLOWED_VIDEO_MIME_TYPES
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(&self.mime_type))
    }

    /// Caller-side gate: reject files the provider is known to refuse
    pub fn validate(&self) -> Result<()> {
        if !self.is_supported_format() {
            return Err(InsightError::InvalidInput(format!(
                "unsupported video format '{}' (expected one of: {})",
                self.mime_type,
                media::SUPPORTED_VIDEO_FORMATS.join(", ")
            )));
        }
        if self.bytes.len() > media::MAX_VIDEO_BYTES {
            return Err(InsightError::InvalidInput(format!(
                "video file size must be less than {}MB (got {:.1}MB)",
                media::MAX_VIDEO_BYTES / (1024 * 1024),
                self.bytes.len() as f64 / (1024.0 * 1024.0)
            )));
        }
        Ok(())
    }
}

// Payload bytes are megabytes of noise in logs; print the length only.
impl std::fmt::Debug for VideoAsset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VideoAsset")
            .field("bytes", &format!("<{} bytes>", self.bytes.len()))
            .field("mime_type", &self.mime_type)
            .field("file_name", &self.file_name)
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
