//! Model Gateway
//!
//! Trait abstraction over the generative endpoint, plus the Gemini
//! implementation used in production.
//!
//! ## Contract
//!
//! - One call per invocation, at-most-once. No built-in retry; callers
//!   needing resilience wrap the gateway themselves.
//! - Credential presence is validated at call time via `preflight`,
//!   never relied on at process start. A missing key is rejected before
//!   any network activity.
//! - Transport, provider-status, and payload failures surface as
//!   distinct error variants so the classifier can make a policy call.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::ai::assemble::RequestPart;
use crate::constants::{model, network};
use crate::types::{InsightError, Result};

/// Shared gateway handle for injection into the pipeline.
pub type SharedGateway = Arc<dyn ModelGateway + Send + Sync>;

// =============================================================================
// Gateway Trait
// =============================================================================

/// Abstraction over one multi-part generation call.
#[async_trait]
pub trait ModelGateway: Send + Sync {
    /// Verify the gateway is able to make a call (credential present).
    ///
    /// Must not perform network activity.
    fn preflight(&self) -> Result<()>;

    /// Send the assembled parts and return the model's raw text answer.
    async fn generate(&self, parts: &[RequestPart]) -> Result<String>;

    /// Provider name for logging
    fn name(&self) -> &str;

    /// Model identifier currently in use
    fn model(&self) -> &str;
}

// =============================================================================
// Gateway Configuration
// =============================================================================

/// Configuration for the Gemini gateway.
///
/// The API key is invisible to serde in both directions: it arrives via
/// the `GEMINI_API_KEY` environment variable or programmatic
/// construction, never via config files, and is redacted in debug
/// output.
#[derive(Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Model identifier, e.g. "gemini-2.5-pro"
    #[serde(default = "default_model")]
    pub model: String,
    /// API base URL (override for proxies or test servers)
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(skip)]
    pub api_key: Option<String>,
    /// Request timeout in seconds; video payloads make calls slow
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

fn default_model() -> String {
    model::DEFAULT_MODEL.to_string()
}

fn default_api_base() -> String {
    model::DEFAULT_API_BASE.to_string()
}

fn default_timeout_secs() -> u64 {
    network::DEFAULT_TIMEOUT_SECS
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_base: default_api_base(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

// =============================================================================
// Gemini Gateway
// =============================================================================

const PROVIDER_NAME: &str = "gemini";

/// Gateway to Google's generateContent endpoint.
pub struct GeminiGateway {
    /// Absent until configured; checked by `preflight`, not at construction
    api_key: Option<SecretString>,
    api_base: String,
    model: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for GeminiGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiGateway")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .finish()
    }
}

impl GeminiGateway {
    /// Build a gateway from configuration.
    ///
    /// Construction succeeds without a credential so that commands which
    /// never call the model (capability report, config init) still work;
    /// the missing key is rejected by `preflight` before any call.
    pub fn new(config: GatewayConfig) -> Result<Self> {
        let api_base = Self::validate_endpoint(&config.api_base)?;

        let api_key = config
            .api_key
            .or_else(|| std::env::var(model::API_KEY_ENV).ok())
            .filter(|key| !key.trim().is_empty())
            .map(SecretString::from);

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(network::CONNECTION_TIMEOUT_SECS))
            .build()
            .map_err(|e| InsightError::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            api_key,
            api_base,
            model: config.model,
            client,
        })
    }

    /// Validate the endpoint URL: http/https only, trailing slash stripped
    fn validate_endpoint(endpoint: &str) -> Result<String> {
        let url = url::Url::parse(endpoint)
            .map_err(|e| InsightError::Config(format!("invalid API base URL '{endpoint}': {e}")))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(InsightError::Config(format!(
                "API base must use http or https scheme, got: {}",
                url.scheme()
            )));
        }

        let mut result = url.to_string();
        if result.ends_with('/') {
            result.pop();
        }
        Ok(result)
    }

    /// Pull the human-readable message out of a Gemini error body.
    ///
    /// Bodies look like `{"error": {"code": .., "message": .., "status": ..}}`;
    /// anything else is returned verbatim so no diagnostics are lost.
    fn provider_error_message(body: &str) -> String {
        serde_json::from_str::<ErrorEnvelope>(body)
            .ok()
            .map(|envelope| envelope.error.message)
            .filter(|message| !message.is_empty())
            .unwrap_or_else(|| body.to_string())
    }
}

#[async_trait]
impl ModelGateway for GeminiGateway {
    fn preflight(&self) -> Result<()> {
        if self.api_key.is_none() {
            return Err(InsightError::MissingCredential {
                env_var: model::API_KEY_ENV,
            });
        }
        Ok(())
    }

    async fn generate(&self, parts: &[RequestPart]) -> Result<String> {
        // Reject a missing credential before any network activity.
        let api_key = self
            .api_key
            .as_ref()
            .ok_or(InsightError::MissingCredential {
                env_var: model::API_KEY_ENV,
            })?;

        info!(
            "Calling {} (model: {}, parts: {})",
            PROVIDER_NAME,
            self.model,
            parts.len()
        );

        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: parts.to_vec(),
            }],
        };
        let url = format!("{}/models/{}:generateContent", self.api_base, self.model);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|e| InsightError::transport(PROVIDER_NAME, &e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(InsightError::Provider {
                provider: PROVIDER_NAME.to_string(),
                status: status.as_u16(),
                message: Self::provider_error_message(&body),
            });
        }

        let envelope: GenerateContentResponse =
            response.json().await.map_err(|e| InsightError::Payload {
                provider: PROVIDER_NAME.to_string(),
                message: e.to_string(),
            })?;

        // A blocked or empty candidate list yields an empty answer; the
        // extraction stage reports that as its own failure with the raw
        // text preserved.
        let text = envelope.candidate_text();
        debug!("Received {} chars from {}", text.len(), PROVIDER_NAME);

        Ok(text)
    }

    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn model(&self) -> &str {
        &self.model
    }
}

// =============================================================================
// Wire Types
// =============================================================================

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    role: String,
    parts: Vec<RequestPart>,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    /// Concatenate the text fragments of the first candidate
    fn candidate_text(&self) -> String {
        self.candidates
            .first()
            .map(|candidate| {
                candidate
                    .content
                    .parts
                    .iter()
                    .filter_map(|part| part.text.as_deref())
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: CandidateContent,
}

#[derive(Debug, Default, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Default, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    message: String,
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ErrorCategory;

    fn gateway_without_key() -> GeminiGateway {
        // Construction falls back to the env var, so clear the key
        // afterwards to keep the test hermetic.
        let mut gateway = GeminiGateway::new(GatewayConfig::default()).unwrap();
        gateway.api_key = None;
        gateway
    }

    #[test]
    fn test_construction_succeeds_without_key() {
        let gateway = gateway_without_key();
        assert_eq!(gateway.name(), "gemini");
        assert_eq!(gateway.model(), "gemini-2.5-pro");
    }

    #[test]
    fn test_preflight_rejects_missing_key() {
        let gateway = gateway_without_key();
        let err = gateway.preflight().unwrap_err();
        assert!(matches!(err, InsightError::MissingCredential { .. }));
        assert_eq!(err.category(), ErrorCategory::InvalidInput);
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }

    #[test]
    fn test_preflight_passes_with_key() {
        let gateway = GeminiGateway::new(GatewayConfig {
            api_key: Some("test-key".to_string()),
            ..GatewayConfig::default()
        })
        .unwrap();
        assert!(gateway.preflight().is_ok());
    }

    #[test]
    fn test_blank_configured_key_counts_as_missing() {
        // A whitespace-only key is filtered at construction; the env
        // fallback is not consulted because the config slot was Some.
        let gateway = GeminiGateway::new(GatewayConfig {
            api_key: Some("   ".to_string()),
            ..GatewayConfig::default()
        })
        .unwrap();
        assert!(gateway.preflight().is_err());
    }

    #[test]
    fn test_endpoint_scheme_validation() {
        let err = GeminiGateway::validate_endpoint("ftp://example.com").unwrap_err();
        assert!(err.to_string().contains("http or https"));

        let ok = GeminiGateway::validate_endpoint("https://example.com/v1beta/").unwrap();
        assert_eq!(ok, "https://example.com/v1beta");
    }

    #[test]
    fn test_debug_redacts_key() {
        let gateway = GeminiGateway::new(GatewayConfig {
            api_key: Some("super-secret".to_string()),
            ..GatewayConfig::default()
        })
        .unwrap();
        let rendered = format!("{gateway:?}");
        assert!(rendered.contains("[REDACTED]"));
        assert!(!rendered.contains("super-secret"));
    }

    #[test]
    fn test_config_never_serializes_key() {
        let config = GatewayConfig {
            api_key: Some("super-secret".to_string()),
            ..GatewayConfig::default()
        };
        let serialized = serde_json::to_string(&config).unwrap();
        assert!(!serialized.contains("super-secret"));
    }

    #[test]
    fn test_provider_error_message_extraction() {
        let body = r#"{"error": {"code": 400, "message": "API key not valid. Please pass a valid API key.", "status": "INVALID_ARGUMENT"}}"#;
        assert_eq!(
            GeminiGateway::provider_error_message(body),
            "API key not valid. Please pass a valid API key."
        );

        // Non-JSON bodies come back verbatim
        assert_eq!(
            GeminiGateway::provider_error_message("<html>Bad Gateway</html>"),
            "<html>Bad Gateway</html>"
        );
    }

    #[test]
    fn test_candidate_text_concatenation() {
        let envelope: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates": [{"content": {"parts": [{"text": "{\"a\":"}, {"text": "1}"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(envelope.candidate_text(), "{\"a\":\n1}");
    }

    #[test]
    fn test_empty_candidates_yield_empty_text() {
        let envelope: GenerateContentResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(envelope.candidate_text(), "");
    }

    #[test]
    fn test_request_wire_shape() {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![RequestPart::text("hi")],
            }],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "contents": [{"role": "user", "parts": [{"text": "hi"}]}]
            })
        );
    }
}
