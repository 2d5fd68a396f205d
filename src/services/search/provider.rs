//! Search Providers
//!
//! Pluggable web search with keyed Tavily and Brave Search backends. Both
//! constrain results to the most recent 24 hours, which is the only recency
//! window this pipeline uses.

use async_trait::async_trait;

use super::SearchError;

/// Default Tavily search endpoint
const TAVILY_API_URL: &str = "https://api.tavily.com/search";

/// Default Brave Search endpoint
const BRAVE_API_URL: &str = "https://api.search.brave.com/res/v1/web/search";

/// A single result returned by a search backend.
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

/// Trait for pluggable search backends.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Backend name for logging and diagnostics.
    fn name(&self) -> &'static str;

    /// Execute one query, capped at `limit` results, restricted to the most
    /// recent 24 hours.
    async fn search(&self, query: &str, limit: u32) -> Result<Vec<SearchResult>, SearchError>;
}

/// Tavily news search (requires API key).
struct TavilyProvider {
    client: reqwest::Client,
    api_key: String,
}

#[async_trait]
impl SearchProvider for TavilyProvider {
    fn name(&self) -> &'static str {
        "tavily"
    }

    async fn search(&self, query: &str, limit: u32) -> Result<Vec<SearchResult>, SearchError> {
        // topic "news" + days 1 is Tavily's native recency window
        let body = serde_json::json!({
            "api_key": self.api_key,
            "query": query,
            "topic": "news",
            "days": 1,
            "max_results": limit,
            "include_answer": false,
        });

        let response = self
            .client
            .post(TAVILY_API_URL)
            .json(&body)
            .send()
            .await
            .map_err(|e| SearchError::Backend {
                backend: "tavily",
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let err_body = response.text().await.unwrap_or_default();
            return Err(SearchError::Backend {
                backend: "tavily",
                message: format!("HTTP {}: {}", status.as_u16(), err_body),
            });
        }

        let data: serde_json::Value =
            response.json().await.map_err(|e| SearchError::Backend {
                backend: "tavily",
                message: format!("malformed response: {}", e),
            })?;

        let results = data
            .get("results")
            .and_then(|r| r.as_array())
            .map(|arr| {
                arr.iter()
                    .map(|item| SearchResult {
                        title: text_field(item, "title"),
                        url: text_field(item, "url"),
                        snippet: text_field(item, "content"),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(results)
    }
}

/// Brave Search (requires API key).
struct BraveSearchProvider {
    client: reqwest::Client,
    api_key: String,
}

#[async_trait]
impl SearchProvider for BraveSearchProvider {
    fn name(&self) -> &'static str {
        "brave"
    }

    async fn search(&self, query: &str, limit: u32) -> Result<Vec<SearchResult>, SearchError> {
        // freshness "pd" restricts Brave results to the past day
        let response = self
            .client
            .get(BRAVE_API_URL)
            .header("X-Subscription-Token", &self.api_key)
            .header("Accept", "application/json")
            .query(&[
                ("q", query),
                ("count", &limit.to_string()),
                ("freshness", "pd"),
            ])
            .send()
            .await
            .map_err(|e| SearchError::Backend {
                backend: "brave",
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let err_body = response.text().await.unwrap_or_default();
            return Err(SearchError::Backend {
                backend: "brave",
                message: format!("HTTP {}: {}", status.as_u16(), err_body),
            });
        }

        let data: serde_json::Value =
            response.json().await.map_err(|e| SearchError::Backend {
                backend: "brave",
                message: format!("malformed response: {}", e),
            })?;

        let results = data
            .get("web")
            .and_then(|w| w.get("results"))
            .and_then(|r| r.as_array())
            .map(|arr| {
                arr.iter()
                    .map(|item| SearchResult {
                        title: text_field(item, "title"),
                        url: text_field(item, "url"),
                        snippet: text_field(item, "description"),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(results)
    }
}

fn text_field(item: &serde_json::Value, key: &str) -> String {
    item.get(key)
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string()
}

/// Create a search backend by name.
///
/// - `"tavily"` (or empty) selects Tavily
/// - `"brave"` selects Brave Search
pub fn create_provider(
    backend: &str,
    api_key: &str,
) -> Result<Box<dyn SearchProvider>, SearchError> {
    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(15))
        .user_agent("ai-brief/0.1")
        .build()
        .unwrap_or_else(|_| reqwest::Client::new());

    match backend.to_lowercase().as_str() {
        "tavily" | "" => Ok(Box::new(TavilyProvider {
            client,
            api_key: api_key.to_string(),
        })),
        "brave" | "brave_search" => Ok(Box::new(BraveSearchProvider {
            client,
            api_key: api_key.to_string(),
        })),
        other => Err(SearchError::UnknownBackend(other.to_string())),
    }
}
