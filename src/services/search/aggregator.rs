//! Retrieval Aggregator
//!
//! Executes every search task, tags each returned document with its task's
//! category, and concatenates everything into one corpus. A single failing
//! task is tolerated; a run that retrieves nothing at all aborts the
//! pipeline before the model is invoked.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, warn};

use super::provider::SearchProvider;
use super::registry::SearchTask;
use super::SearchError;
use crate::models::report::Category;

/// Pause between provider calls. A rate-limit throttle, not a correctness
/// requirement.
const INTER_TASK_PAUSE: Duration = Duration::from_millis(300);

/// A search result tagged with the category of the task that produced it.
#[derive(Debug, Clone)]
pub struct RawDocument {
    pub category: Category,
    pub title: String,
    pub snippet: String,
    pub url: String,
}

/// Per-run retrieval diagnostics.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RetrievalStats {
    /// Documents retrieved per category.
    pub documents: BTreeMap<Category, usize>,
    /// Non-fatal per-task failures.
    pub warnings: Vec<String>,
}

impl RetrievalStats {
    pub fn total(&self) -> usize {
        self.documents.values().sum()
    }
}

/// The concatenated, category-tagged corpus for one run.
#[derive(Debug, Clone)]
pub struct AggregatedCorpus {
    pub text: String,
    pub stats: RetrievalStats,
}

/// Run every task against `provider` and build the corpus.
///
/// Insertion order is task order, then provider response order. Returns
/// `RetrievalExhausted` only when zero documents were retrieved overall.
pub async fn aggregate(
    provider: &dyn SearchProvider,
    tasks: &[SearchTask],
) -> Result<AggregatedCorpus, SearchError> {
    let mut text = String::new();
    let mut stats = RetrievalStats::default();
    let mut index = 0usize;

    for (task_idx, task) in tasks.iter().enumerate() {
        if task_idx > 0 {
            tokio::time::sleep(INTER_TASK_PAUSE).await;
        }

        stats.documents.entry(task.category).or_insert(0);

        let query = sanitize_query(&task.query);
        if query.is_empty() {
            warn!(category = %task.category, "skipping task with empty query");
            stats
                .warnings
                .push(format!("{}: {}", task.category, SearchError::EmptyQuery));
            continue;
        }

        debug!(
            category = %task.category,
            query = %query,
            limit = task.limit,
            backend = provider.name(),
            "executing search task"
        );

        match provider.search(&query, task.limit).await {
            Ok(results) => {
                let count = results.len();
                for result in results {
                    index += 1;
                    let doc = RawDocument {
                        category: task.category,
                        title: result.title,
                        snippet: result.snippet,
                        url: result.url,
                    };
                    append_block(&mut text, index, &doc);
                }
                *stats.documents.entry(task.category).or_insert(0) += count;
                debug!(category = %task.category, count, "search task complete");
            }
            Err(e) => {
                warn!(category = %task.category, error = %e, "search task failed, continuing");
                stats.warnings.push(format!("{}: {}", task.category, e));
            }
        }
    }

    if stats.total() == 0 {
        return Err(SearchError::RetrievalExhausted {
            warnings: stats.warnings,
        });
    }

    info!(
        documents = stats.total(),
        failed_tasks = stats.warnings.len(),
        "retrieval complete"
    );

    Ok(AggregatedCorpus { text, stats })
}

/// Append one document as a numbered, category-tagged block.
fn append_block(text: &mut String, index: usize, doc: &RawDocument) {
    text.push_str(&format!(
        "[{}] ({}) Title: {}\nSnippet: {}\nURL: {}\n\n",
        index, doc.category, doc.title, doc.snippet, doc.url
    ));
}

/// Strip control characters and surrounding whitespace from a query.
fn sanitize_query(query: &str) -> String {
    query
        .chars()
        .filter(|c| !c.is_control() || *c == ' ')
        .collect::<String>()
        .trim()
        .to_string()
}
