//! Configuration Types
//!
//! Root configuration structure with sensible defaults. The gateway
//! section reuses `GatewayConfig` so that what the loader produces is
//! exactly what the gateway consumes.

use serde::{Deserialize, Serialize};

use crate::ai::gateway::GatewayConfig;
use crate::types::{InsightError, Result};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Configuration version
    pub version: String,

    /// Generative model gateway settings
    pub gateway: GatewayConfig,

    /// Report output settings
    pub output: OutputConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            gateway: GatewayConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    /// Returns `InsightError::Config` on validation failure.
    pub fn validate(&self) -> Result<()> {
        if self.gateway.model.trim().is_empty() {
            return Err(InsightError::Config(
                "gateway model must not be empty".to_string(),
            ));
        }

        if self.gateway.timeout_secs == 0 {
            return Err(InsightError::Config(
                "gateway timeout_secs must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

// =============================================================================
// Output Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct OutputConfig {
    /// Pretty-print report JSON by default (the CLI `--pretty` flag
    /// forces it on for a single run)
    pub pretty: bool,
}

// =============================================================================
// Tests
// =============================================================================
