//! TestiLens - Testimonial Insight Extraction Pipeline
//!
//! Turns an arbitrary batch of customer testimonials (and optionally a
//! video testimonial) into a structured analytics report by delegating
//! the language/vision understanding to an external generative model
//! and recovering a strongly-typed result from its free-form answer.
//!
//! ## Core Features
//!
//! - **Deterministic prompt compilation**: business context and a
//!   literal target-schema template, conditioned on video presence
//! - **Multimodal requests**: text plus an optional base64-inlined
//!   video payload
//! - **Robust answer recovery**: outermost-brace extraction followed by
//!   permissive, two-required-fields validation
//! - **Local metric aggregation**: counts, sentiment score, and timing
//!   computed from the inputs, never trusted from the model
//! - **Classified failures**: every error carries a stable category tag
//!   so callers can make policy decisions
//!
//! ## Quick Start
//!
//! ```ignore
//! use testilens::ai::{GatewayConfig, InsightPipeline};
//! use testilens::types::TestimonialBatch;
//!
//! let pipeline = InsightPipeline::from_config(GatewayConfig::default())?;
//! let batch = TestimonialBatch::from_joined("Great support! | Too expensive")
//!     .with_subject_label("Acme Checkout");
//! let report = pipeline.analyze(&batch, None).await?;
//! println!("{}", report.to_json_pretty()?);
//! ```
//!
//! ## Modules
//!
//! - [`ai`]: prompt compilation, request assembly, the model gateway,
//!   answer extraction/validation, metric aggregation
//! - [`types`]: batch and report data model, error taxonomy
//! - [`config`]: layered configuration (defaults, TOML files, env)
//! - [`cli`]: the command-line front end

pub mod ai;
pub mod cli;
pub mod config;
pub mod constants;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

// Configuration
pub use config::{Config, ConfigLoader, OutputConfig};

// Error Types
pub use types::error::{ErrorCategory, ErrorClassifier, InsightError, Result};

// Data Model
pub use types::{InsightReport, ModelInsights, ReportMetadata, TestimonialBatch, VideoAsset};

// =============================================================================
// Pipeline Re-exports
// =============================================================================

pub use ai::{GatewayConfig, GeminiGateway, InsightPipeline, ModelGateway, SharedGateway};
