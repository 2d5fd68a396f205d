//! Chat Completion Client
//!
//! OpenAI-compatible chat completions client for the synthesis call.
//! Single-shot by contract: at most one billed model call per invocation,
//! no internal retry loop.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::types::{InvocationError, InvocationResult, ReportRequest};

/// Default chat completions endpoint
const CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Seam for the synthesis call, so tests can substitute a scripted backend.
#[async_trait]
pub trait SynthesisBackend: Send + Sync {
    /// Submit instruction + corpus to `model` and return the raw response
    /// text, unmodified.
    async fn complete(
        &self,
        model: &str,
        system: &str,
        user: &str,
        request: &ReportRequest,
    ) -> InvocationResult<String>;
}

/// HTTP chat completions client.
pub struct ChatClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl ChatClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, CHAT_COMPLETIONS_URL)
    }

    /// Point the client at an OpenAI-compatible endpoint other than the
    /// default.
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: base_url.into(),
        }
    }

    /// Build the request body for the API.
    fn build_request_body(
        &self,
        model: &str,
        system: &str,
        user: &str,
        request: &ReportRequest,
    ) -> serde_json::Value {
        serde_json::json!({
            "model": model,
            "messages": [
                {"role": "system", "content": system},
                {"role": "user", "content": user},
            ],
            "temperature": request.temperature,
            "max_tokens": request.max_output_tokens,
            "response_format": {"type": "json_object"},
        })
    }
}

#[async_trait]
impl SynthesisBackend for ChatClient {
    async fn complete(
        &self,
        model: &str,
        system: &str,
        user: &str,
        request: &ReportRequest,
    ) -> InvocationResult<String> {
        let body = self.build_request_body(model, system, user, request);

        debug!(model, "submitting synthesis request");

        let response = self
            .client
            .post(&self.base_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| InvocationError::Unclassified {
                message: format!("request failed: {}", e),
            })?;

        let status = response.status().as_u16();
        let body_text = response
            .text()
            .await
            .map_err(|e| InvocationError::Unclassified {
                message: format!("failed to read response body: {}", e),
            })?;

        if status != 200 {
            return Err(classify_provider_error(Some(status), &body_text, model));
        }

        let parsed: ChatResponse =
            serde_json::from_str(&body_text).map_err(|e| InvocationError::Unclassified {
                message: format!("malformed provider response: {}", e),
            })?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| InvocationError::Unclassified {
                message: "provider response contained no text content".to_string(),
            })
    }
}

/// Classify a provider failure.
///
/// The single seam updated when provider error formats change. Structured
/// status codes are authoritative; response text is consulted only when no
/// status is available or the status does not identify the failure.
pub fn classify_provider_error(status: Option<u16>, body: &str, model: &str) -> InvocationError {
    match status {
        Some(429) => InvocationError::RateLimited {
            message: body.to_string(),
        },
        Some(404) => InvocationError::ModelUnavailable {
            model: model.to_string(),
            message: body.to_string(),
        },
        Some(code) => {
            classify_by_text(body, model).unwrap_or_else(|| InvocationError::Unclassified {
                message: format!("HTTP {}: {}", code, body),
            })
        }
        None => classify_by_text(body, model).unwrap_or_else(|| InvocationError::Unclassified {
            message: body.to_string(),
        }),
    }
}

fn classify_by_text(body: &str, model: &str) -> Option<InvocationError> {
    let lower = body.to_lowercase();

    if lower.contains("429") || lower.contains("rate limit") || lower.contains("too many requests")
    {
        return Some(InvocationError::RateLimited {
            message: body.to_string(),
        });
    }
    if lower.contains("model_not_found")
        || lower.contains("model not found")
        || lower.contains("does not exist")
        || lower.contains("404")
    {
        return Some(InvocationError::ModelUnavailable {
            model: model.to_string(),
            message: body.to_string(),
        });
    }

    None
}

/// Chat completions response format
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}
