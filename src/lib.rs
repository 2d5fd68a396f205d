//! AI Brief
//!
//! Daily AI intelligence briefing pipeline. One run aggregates the last 24
//! hours of AI news from a fixed set of categorized web searches, submits
//! the corpus to an LLM under a strict output-schema contract, and returns
//! a validated structured report (or a typed error report) for display.
//!
//! The pipeline owns no UI and persists nothing; callers supply two opaque
//! API keys and consume the terminal artifact of each run.

pub mod models;
pub mod services;
pub mod utils;

// Re-export the pipeline-facing contract
pub use models::report::{
    Category, ErrorReport, MarketItem, NewsItem, Stage, StructuredReport, ToolItem,
};
pub use services::llm::{
    classify_provider_error, resolve_model, ChatClient, InvocationError, ModelResolution,
    ReportRequest, SectionQuotas, SynthesisBackend,
};
pub use services::report::{
    parse_report, run_pipeline, run_pipeline_with, strip_wrappers, Credentials, PipelineOutput,
};
pub use services::search::{
    aggregate, create_provider, default_tasks, AggregatedCorpus, RetrievalStats, SearchError,
    SearchProvider, SearchResult, SearchTask,
};
pub use utils::error::{PipelineError, PipelineResult};
