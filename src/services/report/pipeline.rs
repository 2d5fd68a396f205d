//! Report Pipeline
//!
//! One run: retrieval aggregation, model resolution, a single synthesis
//! call, then sanitize-and-validate. Every stage failure comes back to the
//! caller as a typed result; no stage retries another stage's work.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::models::report::StructuredReport;
use crate::services::llm::client::{ChatClient, SynthesisBackend};
use crate::services::llm::resolver::{resolve_model, ModelResolution};
use crate::services::llm::types::ReportRequest;
use crate::services::report::prompt::{build_system_instruction, build_user_message};
use crate::services::report::sanitizer::parse_report;
use crate::services::search::aggregator::{aggregate, RetrievalStats};
use crate::services::search::provider::{create_provider, SearchProvider};
use crate::services::search::registry::{default_tasks, SearchTask};
use crate::utils::error::{PipelineError, PipelineResult};

/// Search backend used by `run_pipeline`.
const DEFAULT_SEARCH_BACKEND: &str = "tavily";

/// Opaque API keys supplied by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub search_api_key: String,
    pub llm_api_key: String,
}

impl Credentials {
    pub fn new(search_api_key: impl Into<String>, llm_api_key: impl Into<String>) -> Self {
        Self {
            search_api_key: search_api_key.into(),
            llm_api_key: llm_api_key.into(),
        }
    }

    /// Both keys must be present before any network call is made.
    pub fn validate(&self) -> PipelineResult<()> {
        if self.search_api_key.trim().is_empty() {
            return Err(PipelineError::MissingCredential("search"));
        }
        if self.llm_api_key.trim().is_empty() {
            return Err(PipelineError::MissingCredential("llm"));
        }
        Ok(())
    }
}

/// Terminal artifact of a successful run.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineOutput {
    pub report: StructuredReport,
    /// Which identifier was requested and which was actually submitted.
    pub model: ModelResolution,
    pub retrieval: RetrievalStats,
    pub generated_at: DateTime<Utc>,
}

/// Run the full pipeline with the default task registry and request
/// parameters.
pub async fn run_pipeline(
    credentials: &Credentials,
    requested_model: &str,
) -> PipelineResult<PipelineOutput> {
    credentials.validate()?;

    let provider = create_provider(DEFAULT_SEARCH_BACKEND, &credentials.search_api_key)?;
    let synthesis = ChatClient::new(credentials.llm_api_key.as_str());
    let tasks = default_tasks();
    let request = ReportRequest::new(requested_model);

    run_pipeline_with(provider.as_ref(), &synthesis, &tasks, &request).await
}

/// Run the pipeline against explicit collaborators.
///
/// This is the seam integration tests use to substitute scripted search and
/// synthesis backends.
pub async fn run_pipeline_with(
    provider: &dyn SearchProvider,
    synthesis: &dyn SynthesisBackend,
    tasks: &[SearchTask],
    request: &ReportRequest,
) -> PipelineResult<PipelineOutput> {
    let corpus = aggregate(provider, tasks).await?;

    let resolution = resolve_model(&request.model);
    if resolution.remapped {
        info!(
            requested = %resolution.requested,
            resolved = %resolution.resolved,
            "model identifier remapped"
        );
    }

    let system = build_system_instruction(request);
    let user = build_user_message(&corpus.text);
    let raw = synthesis
        .complete(&resolution.resolved, &system, &user, request)
        .await?;

    let report = parse_report(&raw)?;
    info!(
        news = report.breaking_news.len(),
        market = report.market_analysis.len(),
        tech = report.new_tech.len(),
        "report validated"
    );

    Ok(PipelineOutput {
        report,
        model: resolution,
        retrieval: corpus.stats,
        generated_at: Utc::now(),
    })
}
