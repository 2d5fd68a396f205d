//! Error Handling
//!
//! Unified pipeline error type and its mapping to the renderer-facing
//! `ErrorReport`. Uses thiserror for ergonomic error definitions.

use thiserror::Error;

use crate::models::report::{ErrorReport, Stage};
use crate::services::llm::types::InvocationError;
use crate::services::search::SearchError;

/// Pipeline-wide error type.
///
/// Each variant identifies the stage that failed; nothing is thrown across
/// stage boundaries silently.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A required API key was not supplied. Raised before any network call.
    #[error("missing {0} API key")]
    MissingCredential(&'static str),

    /// Retrieval-stage failure. Only `RetrievalExhausted` reaches here;
    /// single-task failures are logged and tolerated upstream.
    #[error("retrieval failed: {0}")]
    Retrieval(#[from] SearchError),

    /// Model invocation failure with its classification preserved.
    #[error("model invocation failed: {0}")]
    Invocation(#[from] InvocationError),

    /// Model output could not be parsed into a report. The raw text is kept
    /// verbatim for display.
    #[error("failed to parse model output: {message}")]
    Parse { message: String, raw: String },
}

/// Result type alias for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

impl PipelineError {
    /// Stage this failure is attributed to.
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::MissingCredential(_) => Stage::Config,
            PipelineError::Retrieval(_) => Stage::Retrieval,
            PipelineError::Invocation(_) => Stage::Invocation,
            PipelineError::Parse { .. } => Stage::Parsing,
        }
    }

    /// Machine-readable classification label.
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::MissingCredential(_) => "missing_credential",
            PipelineError::Retrieval(SearchError::RetrievalExhausted { .. }) => {
                "retrieval_exhausted"
            }
            PipelineError::Retrieval(_) => "retrieval_failed",
            PipelineError::Invocation(InvocationError::RateLimited { .. }) => "rate_limited",
            PipelineError::Invocation(InvocationError::ModelUnavailable { .. }) => {
                "model_unavailable"
            }
            PipelineError::Invocation(InvocationError::Unclassified { .. }) => "unclassified",
            PipelineError::Parse { .. } => "parse_failure",
        }
    }

    /// What the caller can do about this failure.
    pub fn remediation(&self) -> &'static str {
        match self {
            PipelineError::MissingCredential(_) => "supply both API keys before starting a run",
            PipelineError::Retrieval(_) => {
                "check network connectivity and the search API key, then retry"
            }
            PipelineError::Invocation(InvocationError::RateLimited { .. }) => {
                "wait for the rate limit to cool down, then retry"
            }
            PipelineError::Invocation(InvocationError::ModelUnavailable { .. }) => {
                "pick a different model identifier and retry"
            }
            PipelineError::Invocation(InvocationError::Unclassified { .. }) => {
                "retry; if the error persists, check the provider status"
            }
            PipelineError::Parse { .. } => {
                "retry the run; the raw model output is preserved for inspection"
            }
        }
    }

    /// Convert into the serializable artifact handed to the renderer.
    pub fn to_report(&self) -> ErrorReport {
        ErrorReport::from(self)
    }
}

impl From<&PipelineError> for ErrorReport {
    fn from(err: &PipelineError) -> Self {
        let raw_payload = match err {
            PipelineError::Parse { raw, .. } => Some(raw.clone()),
            _ => None,
        };

        ErrorReport {
            stage: err.stage(),
            kind: err.kind().to_string(),
            message: err.to_string(),
            raw_payload,
            remediation: err.remediation().to_string(),
        }
    }
}
