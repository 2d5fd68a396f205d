//! Report Data Model
//!
//! Wire-contract types for the daily briefing. The JSON key names on these
//! structs are what the renderer consumes and must not change.

use serde::{Deserialize, Serialize};

/// Search category a task or document belongs to.
///
/// A document's category is always inherited from the task that retrieved
/// it, never inferred from its content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    BreakingNews,
    OpenSourceTools,
    BusinessMarket,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::BreakingNews => write!(f, "breaking_news"),
            Category::OpenSourceTools => write!(f, "open_source_tools"),
            Category::BusinessMarket => write!(f, "business_market"),
        }
    }
}

/// One breaking-news entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    /// Key takeaways extracted from the source material.
    #[serde(default)]
    pub core_points: Vec<String>,
    pub url: String,
    pub source: String,
}

/// One business/market analysis entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketItem {
    pub topic: String,
    pub insight: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// One new tool or framework entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolItem {
    pub name: String,
    pub desc: String,
    pub tech_highlight: String,
    pub url: String,
}

/// The validated report handed to the renderer.
///
/// Section lengths are whatever the model produced; requested item counts
/// are advisory and never enforced here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuredReport {
    #[serde(default)]
    pub breaking_news: Vec<NewsItem>,
    #[serde(default)]
    pub market_analysis: Vec<MarketItem>,
    #[serde(default)]
    pub new_tech: Vec<ToolItem>,
}

impl StructuredReport {
    /// Total items across all sections.
    pub fn total_items(&self) -> usize {
        self.breaking_news.len() + self.market_analysis.len() + self.new_tech.len()
    }
}

/// Pipeline stage a failure is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Precondition checks, before any network call.
    Config,
    Retrieval,
    Invocation,
    Parsing,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Config => write!(f, "config"),
            Stage::Retrieval => write!(f, "retrieval"),
            Stage::Invocation => write!(f, "invocation"),
            Stage::Parsing => write!(f, "parsing"),
        }
    }
}

/// Terminal artifact of a failed run, serializable for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorReport {
    pub stage: Stage,
    /// Machine-readable failure classification.
    pub kind: String,
    pub message: String,
    /// The unmodified model output, preserved when parsing failed. It is the
    /// only diagnostic available when the output contract was violated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_payload: Option<String>,
    /// What the caller can do about it.
    pub remediation: String,
}
