//! Search Task Registry
//!
//! The fixed set of categorized queries one briefing run executes. Tasks are
//! immutable configuration, constructed per run and passed explicitly
//! through the pipeline.

use serde::{Deserialize, Serialize};

use crate::models::report::Category;

/// A single categorized search task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchTask {
    pub category: Category,
    pub query: String,
    /// Result cap for this task.
    pub limit: u32,
}

impl SearchTask {
    pub fn new(category: Category, query: impl Into<String>, limit: u32) -> Self {
        Self {
            category,
            query: query.into(),
            limit,
        }
    }
}

/// The default task set: breaking news, open-source tools, business/market.
///
/// Queries are English keyword queries; the model translates and condenses
/// the retrieved material downstream.
pub fn default_tasks() -> Vec<SearchTask> {
    vec![
        SearchTask::new(
            Category::BreakingNews,
            "Artificial Intelligence news latest 24 hours breaking news",
            10,
        ),
        SearchTask::new(
            Category::OpenSourceTools,
            "new AI tools open source framework model release",
            8,
        ),
        SearchTask::new(
            Category::BusinessMarket,
            "AI business market investment funding trend analysis",
            8,
        ),
    ]
}
