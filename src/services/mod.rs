//! Services
//!
//! Business logic for the briefing pipeline: web search retrieval, LLM
//! invocation, and report synthesis.

pub mod llm;
pub mod report;
pub mod search;

pub use report::{run_pipeline, run_pipeline_with, Credentials, PipelineOutput};
