//! LLM Invocation
//!
//! Chat completion client, invocation error types, and the model
//! compatibility resolver.

pub mod client;
pub mod resolver;
pub mod types;

pub use client::{classify_provider_error, ChatClient, SynthesisBackend};
pub use resolver::{resolve_model, ModelResolution};
pub use types::{InvocationError, InvocationResult, ReportRequest, SectionQuotas, SCHEMA_VERSION};
