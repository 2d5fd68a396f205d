//! LLM Types
//!
//! Configuration and error types for the synthesis invocation.

use serde::{Deserialize, Serialize};

/// Report schema version advertised to the model.
pub const SCHEMA_VERSION: &str = "v1";

/// Per-section item-count targets.
///
/// Advisory only: the prompt asks the model for these counts, the validator
/// never enforces them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionQuotas {
    #[serde(default = "default_news_quota")]
    pub breaking_news: u32,
    #[serde(default = "default_market_quota")]
    pub market_analysis: u32,
    #[serde(default = "default_tech_quota")]
    pub new_tech: u32,
}

fn default_news_quota() -> u32 {
    15
}

fn default_market_quota() -> u32 {
    10
}

fn default_tech_quota() -> u32 {
    10
}

impl Default for SectionQuotas {
    fn default() -> Self {
        Self {
            breaking_news: default_news_quota(),
            market_analysis: default_market_quota(),
            new_tech: default_tech_quota(),
        }
    }
}

/// Parameters for one synthesis request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportRequest {
    /// Caller-requested model identifier. Resolved before submission.
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Generation ceiling, sized so the full item quotas fit without
    /// truncation.
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
    #[serde(default)]
    pub quotas: SectionQuotas,
    #[serde(default = "default_schema_version")]
    pub schema_version: String,
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_output_tokens() -> u32 {
    8192
}

fn default_schema_version() -> String {
    SCHEMA_VERSION.to_string()
}

impl ReportRequest {
    /// Create a request for `model` with default generation parameters.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            temperature: default_temperature(),
            max_output_tokens: default_max_output_tokens(),
            quotas: SectionQuotas::default(),
            schema_version: default_schema_version(),
        }
    }
}

/// Error types for the synthesis invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InvocationError {
    /// Provider signalled overload. Retryable by the caller after a
    /// cool-down; never retried here.
    RateLimited { message: String },
    /// The submitted identifier was rejected. Carries the identifier that
    /// was actually attempted.
    ModelUnavailable { model: String, message: String },
    /// Everything else, surfaced with the provider message verbatim.
    Unclassified { message: String },
}

impl std::fmt::Display for InvocationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvocationError::RateLimited { message } => {
                write!(f, "rate limited: {}", message)
            }
            InvocationError::ModelUnavailable { model, message } => {
                write!(f, "model '{}' unavailable: {}", model, message)
            }
            InvocationError::Unclassified { message } => {
                write!(f, "provider error: {}", message)
            }
        }
    }
}

impl std::error::Error for InvocationError {}

/// Result type for synthesis operations.
pub type InvocationResult<T> = Result<T, InvocationError>;
