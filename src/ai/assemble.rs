//! Request Assembly
//!
//! Turns a compiled prompt and an optional video attachment into the
//! ordered part list the generation endpoint expects: a text part
//! first, then an inline-data part when a video is present.
//!
//! Assembly does not police the attachment. MIME allow-listing and
//! size limits belong to the caller, and empty payloads are still
//! included rather than silently dropped, so that a provider-level
//! rejection stays visible to the classifier.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::Serialize;

use crate::types::VideoAsset;

// =============================================================================
// Wire Parts
// =============================================================================

/// Base64 payload with its declared MIME type
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct InlineBlob {
    pub data: String,
    pub mime_type: String,
}

/// One element of a multi-part generation request
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum RequestPart {
    Text { text: String },
    Inline { inline_data: InlineBlob },
}

impl RequestPart {
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text {
            text: content.into(),
        }
    }

    pub fn inline(data: String, mime_type: impl Into<String>) -> Self {
        Self::Inline {
            inline_data: InlineBlob {
                data,
                mime_type: mime_type.into(),
            },
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text { .. })
    }

    /// Declared MIME type, present only on inline-data parts
    pub fn mime_type(&self) -> Option<&str> {
        match self {
            Self::Text { .. } => None,
            Self::Inline { inline_data } => Some(&inline_data.mime_type),
        }
    }
}

// =============================================================================
// Assembly
// =============================================================================

/// Build the ordered part list: prompt text, then the encoded video
/// when one accompanies the request.
pub fn assemble_request_parts(prompt: String, video: Option<&VideoAsset>) -> Vec<RequestPart> {
    let mut parts = vec![RequestPart::text(prompt)];

    if let Some(asset) = video {
        let encoded = BASE64.encode(&asset.bytes);
        parts.push(RequestPart::inline(encoded, asset.mime_type.clone()));
    }

    parts
}

// =============================================================================
// Tests
// =============================================================================
