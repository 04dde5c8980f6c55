//! Global Constants
//!
//! Centralized constants for configuration and tuning.
//! All magic numbers should be defined here with documentation.

/// Testimonial batch constants
pub mod batch {
    /// Delimiter joining testimonial entries in the inbound blob.
    ///
    /// The compiled prompt joins entries with this exact string so that
    /// splitting on it recovers the original entry count.
    pub const JOIN_DELIMITER: &str = " | ";

    /// Placeholder used when no business context is supplied
    pub const DEFAULT_BUSINESS_CONTEXT: &str = "no specific business given";

    /// Subject label used when the collection layer passes none
    pub const DEFAULT_SUBJECT_LABEL: &str = "Product/Service";
}

/// Generative model constants
pub mod model {
    /// Default model identifier
    pub const DEFAULT_MODEL: &str = "gemini-2.5-pro";

    /// Default API base for the generateContent endpoint
    pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

    /// Environment variable holding the provider credential
    pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
}

/// Network constants
pub mod network {
    /// Default request timeout (seconds)
    ///
    /// Video payloads increase both upload time and model processing
    /// time, so the default is generous.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

    /// Connection timeout (seconds)
    pub const CONNECTION_TIMEOUT_SECS: u64 = 30;
}

/// Video attachment constants
///
/// These mirror the collection layer's upload gate. The request
/// assembler itself stays permissive; enforcement happens at the
/// CLI/collaborator boundary.
pub mod media {
    /// MIME types the collection layer accepts for video testimonials
    pub const ALLOWED_VIDEO_MIME_TYPES: [&str; 4] =
        ["video/mp4", "video/mov", "video/avi", "video/webm"];

    /// File extensions advertised by the capability report
    pub const SUPPORTED_VIDEO_FORMATS: [&str; 4] = ["mp4", "mov", "avi", "webm"];

    /// Advisory upper bound on video size (bytes)
    pub const MAX_VIDEO_BYTES: usize = 50 * 1024 * 1024;
}
