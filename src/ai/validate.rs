//! Result Validation
//!
//! Parses the extracted JSON span and checks it against the report
//! contract before anything downstream touches it.
//!
//! Only `painPoint` and `bestFeature` are strictly required: they are
//! the minimum viable output of the simplest supported mode (text-only,
//! no video, no sentiment). A model that omits them did not engage with
//! the task and the run fails. Every other section is read permissively
//! because schema adherence is not guaranteed; a partial answer passes
//! through with the malformed or missing sections left absent.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use crate::types::{InsightError, ModelInsights, Result};

/// Validates an extracted JSON span into typed model insights.
pub struct ResultValidator;

impl ResultValidator {
    /// Parse and validate. Unparseable JSON and missing required fields
    /// are hard failures; malformed optional sections are dropped.
    pub fn validate(span: &str) -> Result<ModelInsights> {
        let value: Value =
            serde_json::from_str(span).map_err(|e| InsightError::ResponseParse {
                message: e.to_string(),
            })?;

        let pain_point = Self::required_string(&value, "painPoint")?;
        let best_feature = Self::required_string(&value, "bestFeature")?;

        Ok(ModelInsights {
            pain_point,
            best_feature,
            sentiment: Self::optional_section(&value, "sentiment"),
            themes: Self::optional_section(&value, "themes"),
            user_segments: Self::optional_section(&value, "userSegments"),
            improvements: Self::string_sequence(&value, "improvements"),
            competitive_advantages: Self::string_sequence(&value, "competitiveAdvantages"),
            video_analysis: Self::optional_section(&value, "videoAnalysis"),
        })
    }

    /// A required field must be present, a string, and non-empty
    fn required_string(value: &Value, field: &'static str) -> Result<String> {
        value
            .get(field)
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .ok_or(InsightError::MissingField { field })
    }

    /// Deserialize an optional section, dropping it when malformed
    fn optional_section<T: DeserializeOwned>(value: &Value, field: &str) -> Option<T> {
        let section = value.get(field)?;
        match serde_json::from_value(section.clone()) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                warn!("Dropping malformed '{}' section: {}", field, e);
                None
            }
        }
    }

    /// Read a string array, keeping only string elements
    fn string_sequence(value: &Value, field: &str) -> Vec<String> {
        value
            .get(field)
            .and_then(|v| v.as_array())
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| item.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }
}

// =============================================================================
// Tests
// =============================================================================
