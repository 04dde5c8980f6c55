//! Model Integration Layer
//!
//! Everything between a validated testimonial batch and a finished
//! insight report: prompt compilation, multimodal request assembly,
//! the Gemini gateway, answer recovery, and metric aggregation.

pub mod assemble;
pub mod extract;
pub mod gateway;
pub mod metrics;
pub mod pipeline;
pub mod prompt;
pub mod validate;

pub use assemble::{InlineBlob, RequestPart, assemble_request_parts};
pub use extract::extract_json_span;
pub use gateway::{GatewayConfig, GeminiGateway, ModelGateway, SharedGateway};
pub use metrics::MetricAggregator;
pub use pipeline::InsightPipeline;
pub use prompt::compile_prompt;
pub use validate::ResultValidator;
