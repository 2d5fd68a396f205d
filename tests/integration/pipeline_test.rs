//! Pipeline Integration Tests
//!
//! Exercises the retrieval aggregator and the full pipeline against
//! scripted search and synthesis backends:
//! - Partial retrieval failure tolerance and exhaustion
//! - Category tagging across tasks
//! - Invocation error classification surfacing
//! - End-to-end run producing a validated report

use std::collections::HashMap;

use async_trait::async_trait;

use ai_brief::{
    aggregate, classify_provider_error, run_pipeline_with, Category, InvocationError,
    PipelineError, ReportRequest, SearchError, SearchProvider, SearchResult, SearchTask, Stage,
    SynthesisBackend,
};

// ============================================================================
// Scripted collaborators
// ============================================================================

/// Search backend scripted per query string. Queries without a script return
/// zero results.
struct ScriptedSearch {
    outcomes: HashMap<String, Result<Vec<SearchResult>, SearchError>>,
}

impl ScriptedSearch {
    fn new() -> Self {
        Self {
            outcomes: HashMap::new(),
        }
    }

    fn on(mut self, query: &str, outcome: Result<Vec<SearchResult>, SearchError>) -> Self {
        self.outcomes.insert(query.to_string(), outcome);
        self
    }
}

#[async_trait]
impl SearchProvider for ScriptedSearch {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn search(&self, query: &str, _limit: u32) -> Result<Vec<SearchResult>, SearchError> {
        self.outcomes
            .get(query)
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

/// Synthesis backend returning a fixed outcome, recording the model it was
/// asked for.
struct ScriptedSynthesis {
    outcome: Result<String, InvocationError>,
    seen_model: std::sync::Mutex<Option<String>>,
}

impl ScriptedSynthesis {
    fn returning(text: &str) -> Self {
        Self {
            outcome: Ok(text.to_string()),
            seen_model: std::sync::Mutex::new(None),
        }
    }

    fn failing(err: InvocationError) -> Self {
        Self {
            outcome: Err(err),
            seen_model: std::sync::Mutex::new(None),
        }
    }

    fn model_seen(&self) -> Option<String> {
        self.seen_model.lock().unwrap().clone()
    }
}

#[async_trait]
impl SynthesisBackend for ScriptedSynthesis {
    async fn complete(
        &self,
        model: &str,
        _system: &str,
        _user: &str,
        _request: &ReportRequest,
    ) -> Result<String, InvocationError> {
        *self.seen_model.lock().unwrap() = Some(model.to_string());
        self.outcome.clone()
    }
}

fn docs(prefix: &str, count: usize) -> Vec<SearchResult> {
    (1..=count)
        .map(|i| SearchResult {
            title: format!("{} title {}", prefix, i),
            url: format!("https://example.com/{}/{}", prefix, i),
            snippet: format!("{} snippet {}", prefix, i),
        })
        .collect()
}

const VALID_REPORT: &str = r#"{
    "breaking_news": [
        {"title": "新闻", "core_points": ["要点一", "要点二"], "url": "https://example.com/n", "source": "Example"}
    ],
    "market_analysis": [
        {"topic": "市场", "insight": "洞察"}
    ],
    "new_tech": [
        {"name": "ToolKit", "desc": "描述", "tech_highlight": "亮点", "url": "https://example.com/t"}
    ]
}"#;

// ============================================================================
// Aggregator Tests
// ============================================================================

#[tokio::test]
async fn test_partial_failure_keeps_successful_task() {
    let provider = ScriptedSearch::new()
        .on("news query", Ok(docs("news", 3)))
        .on(
            "tools query",
            Err(SearchError::Backend {
                backend: "scripted",
                message: "connection reset".to_string(),
            }),
        );
    let tasks = vec![
        SearchTask::new(Category::BreakingNews, "news query", 10),
        SearchTask::new(Category::OpenSourceTools, "tools query", 8),
    ];

    let corpus = aggregate(&provider, &tasks).await.unwrap();

    assert_eq!(corpus.stats.total(), 3);
    assert_eq!(corpus.stats.documents[&Category::BreakingNews], 3);
    assert_eq!(corpus.stats.documents[&Category::OpenSourceTools], 0);
    assert_eq!(corpus.stats.warnings.len(), 1);
    assert!(corpus.stats.warnings[0].contains("open_source_tools"));
}

#[tokio::test]
async fn test_all_tasks_failing_is_exhausted() {
    let provider = ScriptedSearch::new()
        .on(
            "a",
            Err(SearchError::Backend {
                backend: "scripted",
                message: "down".to_string(),
            }),
        )
        .on(
            "b",
            Err(SearchError::Backend {
                backend: "scripted",
                message: "down".to_string(),
            }),
        );
    let tasks = vec![
        SearchTask::new(Category::BreakingNews, "a", 5),
        SearchTask::new(Category::BusinessMarket, "b", 5),
    ];

    let err = aggregate(&provider, &tasks).await.err().unwrap();
    match err {
        SearchError::RetrievalExhausted { warnings } => assert_eq!(warnings.len(), 2),
        other => panic!("expected RetrievalExhausted, got {:?}", other),
    }
}

#[tokio::test]
async fn test_all_tasks_empty_is_exhausted() {
    let provider = ScriptedSearch::new();
    let tasks = vec![SearchTask::new(Category::BreakingNews, "anything", 5)];

    let err = aggregate(&provider, &tasks).await.err().unwrap();
    assert!(matches!(err, SearchError::RetrievalExhausted { .. }));
}

#[tokio::test]
async fn test_category_tags_never_leak_across_tasks() {
    let provider = ScriptedSearch::new()
        .on("news query", Ok(docs("news", 2)))
        .on("market query", Ok(docs("market", 2)));
    let tasks = vec![
        SearchTask::new(Category::BreakingNews, "news query", 5),
        SearchTask::new(Category::BusinessMarket, "market query", 5),
    ];

    let corpus = aggregate(&provider, &tasks).await.unwrap();

    for line in corpus.text.lines().filter(|l| l.starts_with('[')) {
        if line.contains("news title") {
            assert!(line.contains("(breaking_news)"), "leaked tag in: {}", line);
        }
        if line.contains("market title") {
            assert!(line.contains("(business_market)"), "leaked tag in: {}", line);
        }
    }

    // Insertion order is task order, then response order
    let first_market = corpus.text.find("market title 1").unwrap();
    let last_news = corpus.text.find("news title 2").unwrap();
    assert!(last_news < first_market);
}

// ============================================================================
// Full Pipeline Tests
// ============================================================================

#[tokio::test]
async fn test_pipeline_produces_validated_report() {
    let provider = ScriptedSearch::new().on("news query", Ok(docs("news", 3)));
    let synthesis = ScriptedSynthesis::returning(VALID_REPORT);
    let tasks = vec![SearchTask::new(Category::BreakingNews, "news query", 10)];
    let request = ReportRequest::new("gpt-4o");

    let output = run_pipeline_with(&provider, &synthesis, &tasks, &request)
        .await
        .unwrap();

    assert_eq!(output.report.breaking_news.len(), 1);
    assert_eq!(output.report.market_analysis.len(), 1);
    assert_eq!(output.report.new_tech.len(), 1);
    assert_eq!(output.report.breaking_news[0].core_points.len(), 2);
    assert!(!output.model.remapped);
    assert_eq!(output.retrieval.total(), 3);
}

#[tokio::test]
async fn test_pipeline_submits_resolved_model_and_reports_it() {
    let provider = ScriptedSearch::new().on("news query", Ok(docs("news", 1)));
    let synthesis = ScriptedSynthesis::returning(VALID_REPORT);
    let tasks = vec![SearchTask::new(Category::BreakingNews, "news query", 10)];
    let request = ReportRequest::new("gpt-3.5-turbo");

    let output = run_pipeline_with(&provider, &synthesis, &tasks, &request)
        .await
        .unwrap();

    assert_eq!(synthesis.model_seen().as_deref(), Some("gpt-4o-mini"));
    assert!(output.model.remapped);
    assert_eq!(output.model.requested, "gpt-3.5-turbo");
    assert_eq!(output.model.resolved, "gpt-4o-mini");
}

#[tokio::test]
async fn test_pipeline_accepts_fenced_output() {
    let provider = ScriptedSearch::new().on("news query", Ok(docs("news", 1)));
    let fenced = r#"```json
{"breaking_news":[],"market_analysis":[],"new_tech":[]}
```"#;
    let synthesis = ScriptedSynthesis::returning(fenced);
    let tasks = vec![SearchTask::new(Category::BreakingNews, "news query", 10)];
    let request = ReportRequest::new("gpt-4o");

    let output = run_pipeline_with(&provider, &synthesis, &tasks, &request)
        .await
        .unwrap();

    assert!(output.report.breaking_news.is_empty());
    assert!(output.report.market_analysis.is_empty());
    assert!(output.report.new_tech.is_empty());
}

#[tokio::test]
async fn test_pipeline_halts_on_rate_limit() {
    let provider = ScriptedSearch::new().on("news query", Ok(docs("news", 1)));
    let synthesis = ScriptedSynthesis::failing(classify_provider_error(
        None,
        "Error code: 429 - too many requests",
        "gpt-4o",
    ));
    let tasks = vec![SearchTask::new(Category::BreakingNews, "news query", 10)];
    let request = ReportRequest::new("gpt-4o");

    let err = run_pipeline_with(&provider, &synthesis, &tasks, &request)
        .await
        .err()
        .unwrap();

    assert_eq!(err.stage(), Stage::Invocation);
    assert_eq!(err.kind(), "rate_limited");
}

#[tokio::test]
async fn test_pipeline_surfaces_rejected_identifier() {
    let provider = ScriptedSearch::new().on("news query", Ok(docs("news", 1)));
    let synthesis = ScriptedSynthesis::failing(classify_provider_error(
        Some(404),
        "model not found",
        "my-unmapped-model",
    ));
    let tasks = vec![SearchTask::new(Category::BreakingNews, "news query", 10)];
    let request = ReportRequest::new("my-unmapped-model");

    let err = run_pipeline_with(&provider, &synthesis, &tasks, &request)
        .await
        .err()
        .unwrap();

    match err {
        PipelineError::Invocation(InvocationError::ModelUnavailable { model, .. }) => {
            assert_eq!(model, "my-unmapped-model");
        }
        other => panic!("expected ModelUnavailable, got {:?}", other),
    }
}

#[tokio::test]
async fn test_pipeline_parse_failure_preserves_raw_output() {
    let provider = ScriptedSearch::new().on("news query", Ok(docs("news", 1)));
    let garbage = "Sorry, I could not complete the request.";
    let synthesis = ScriptedSynthesis::returning(garbage);
    let tasks = vec![SearchTask::new(Category::BreakingNews, "news query", 10)];
    let request = ReportRequest::new("gpt-4o");

    let err = run_pipeline_with(&provider, &synthesis, &tasks, &request)
        .await
        .err()
        .unwrap();

    let report = err.to_report();
    assert_eq!(report.stage, Stage::Parsing);
    assert_eq!(report.raw_payload.as_deref(), Some(garbage));
    assert!(!report.remediation.is_empty());
}

#[tokio::test]
async fn test_pipeline_aborts_before_synthesis_when_exhausted() {
    let provider = ScriptedSearch::new();
    let synthesis = ScriptedSynthesis::returning(VALID_REPORT);
    let tasks = vec![SearchTask::new(Category::BreakingNews, "nothing", 10)];
    let request = ReportRequest::new("gpt-4o");

    let err = run_pipeline_with(&provider, &synthesis, &tasks, &request)
        .await
        .err()
        .unwrap();

    assert_eq!(err.stage(), Stage::Retrieval);
    assert_eq!(err.kind(), "retrieval_exhausted");
    assert!(synthesis.model_seen().is_none(), "model must not be invoked");
}
