//! Prompt Compilation
//!
//! Builds the single instruction prompt sent to the model.
//!
//! ## Structure
//!
//! 1. **Role framing**: product analyst / UX researcher persona
//! 2. **Subject + business context**: interpolated verbatim
//! 3. **Target schema**: a literal JSON template with placeholder values
//! 4. **Testimonial texts**: entries joined by `" | "` in input order
//! 5. **Video instructions**: appended only when a video accompanies the
//!    request, so a text-only call never invites the model to
//!    hallucinate a videoAnalysis section
//!
//! Compilation is a pure function: identical input yields an identical
//! prompt, and nothing here can fail.

use crate::types::TestimonialBatch;

/// JSON template shown to the model, minus the closing brace so the
/// video fragment can slot in after the last field
const SCHEMA_BASE: &str = r#"{
  "painPoint": "Primary challenge or frustration users consistently mention",
  "bestFeature": "Most praised feature or capability",
  "sentiment": {
    "overall": "positive/negative/mixed",
    "positive": 85,
    "negative": 10,
    "neutral": 5
  },
  "themes": {
    "usability": "Insights about ease of use and user experience",
    "performance": "Speed, reliability, and technical performance feedback",
    "support": "Customer service and documentation quality",
    "pricing": "Value perception and cost-related feedback"
  },
  "userSegments": {
    "beginners": ["specific feedback from new users"],
    "advanced": ["feedback from experienced users"],
    "business": ["enterprise or business-focused insights"]
  },
  "improvements": ["specific suggestions for enhancement"],
  "competitiveAdvantages": ["unique strengths vs competitors"]"#;

/// Schema fragment for the video section, inserted after the last base field
const VIDEO_SCHEMA_FRAGMENT: &str = r#",
  "videoAnalysis": {
    "emotionalTone": "...",
    "bodyLanguage": "...",
    "speechPattern": "...",
    "credibilityScore": 8,
    "keyMoments": ["..."],
    "demographicInsights": "...",
    "engagementLevel": "..."
  }"#;

/// Field-by-field guidance for the video section
const VIDEO_INSTRUCTIONS: &str = r#"Additionally, analyze the provided video testimonial and include a "videoAnalysis" object with:
- emotionalTone: Overall emotional state and authenticity
- bodyLanguage: Posture, gestures, and non-verbal cues
- speechPattern: Pace, clarity, enthusiasm level
- credibilityScore: 1-10 rating of authenticity
- keyMoments: Important timestamps or highlights
- demographicInsights: Age group, profession, usage context
- engagementLevel: How engaged/passionate the speaker appears"#;

/// Compile the instruction prompt for a batch.
///
/// `video_requested` controls both the schema fragment and the
/// trailing instruction block; when false neither appears.
pub fn compile_prompt(batch: &TestimonialBatch, video_requested: bool) -> String {
    let mut prompt = String::new();

    // Role framing with the subject and business context verbatim
    prompt.push_str(&format!(
        "You are an expert product analyst and UX researcher. Analyze these testimonials for \"{}\" and a \"{}\" business and return valid JSON with detailed insights.\n\n",
        batch.subject_label(),
        batch.business_context_or_default()
    ));

    // Target shape, spelled out literally so the model has no room to improvise
    prompt.push_str("Return this exact JSON structure:\n");
    prompt.push_str(SCHEMA_BASE);
    if video_requested {
        prompt.push_str(VIDEO_SCHEMA_FRAGMENT);
    }
    prompt.push_str("\n}\n\n");

    prompt.push_str(&format!("Testimonials: {}", batch.joined_text()));

    if video_requested {
        prompt.push_str("\n\n");
        prompt.push_str(VIDEO_INSTRUCTIONS);
    }

    prompt
}

// =============================================================================
// Tests
// =============================================================================
