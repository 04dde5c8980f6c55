//! Response Extraction
//!
//! Pulls a candidate JSON object out of the model's free-form answer.
//!
//! The model is instructed to return bare JSON but commonly wraps it in
//! prose or markdown code fences. A greedy outermost-brace match (first
//! `{` to last `}`) digs the object out of either wrapper without
//! needing a parser-driven scan.
//!
//! Known limitation: if the answer contains two independent objects,
//! the span covers both and will fail to parse downstream. That
//! over-capture is accepted rather than silently worked around, since a
//! multi-object answer already means the model ignored the instructed
//! format.

/// Return the span from the first `{` to the last `}`, inclusive.
///
/// `None` means no brace-delimited span exists in the text; callers
/// treat that as a hard failure for the invocation.
pub fn extract_json_span(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end < start {
        return None;
    }
    // Braces are ASCII, so both offsets sit on char boundaries.
    Some(&raw[start..=end])
}

// =============================================================================
// Tests
// =============================================================================
