//! Response Sanitizer & Validator
//!
//! Strips wrapper artifacts the model may emit around the JSON payload, then
//! parses it into the report schema. Item-level damage is tolerated; a
//! payload that cannot be parsed at all fails with the raw text preserved
//! for display.

use serde::de::DeserializeOwned;
use tracing::warn;

use crate::models::report::StructuredReport;
use crate::utils::error::PipelineError;

/// Remove non-content wrappers around a JSON payload.
///
/// Handles markdown code fences (with or without a language tag) and falls
/// back to the outermost object span when prose surrounds the payload.
/// Idempotent on already-clean JSON.
pub fn strip_wrappers(raw: &str) -> &str {
    let trimmed = raw.trim();

    if let Some(start) = trimmed.find("```") {
        let after_fence = &trimmed[start + 3..];
        // Skip the optional language identifier line (e.g. "json")
        let content_start = after_fence.find('\n').map(|nl| nl + 1).unwrap_or(0);
        let content = &after_fence[content_start..];
        if let Some(end) = content.find("```") {
            return content[..end].trim();
        }
    }

    if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}')) {
        if start < end {
            return &trimmed[start..=end];
        }
    }

    trimmed
}

/// Parse sanitized model output into a report.
///
/// Sections missing from the payload default to empty. An item that does not
/// deserialize is dropped rather than failing its section. A payload that is
/// not a JSON object at all fails with the original text preserved verbatim.
pub fn parse_report(raw: &str) -> Result<StructuredReport, PipelineError> {
    let cleaned = strip_wrappers(raw);

    let value: serde_json::Value =
        serde_json::from_str(cleaned).map_err(|e| PipelineError::Parse {
            message: e.to_string(),
            raw: raw.to_string(),
        })?;

    let Some(sections) = value.as_object() else {
        return Err(PipelineError::Parse {
            message: "top-level JSON value is not an object".to_string(),
            raw: raw.to_string(),
        });
    };

    Ok(StructuredReport {
        breaking_news: collect_items(sections.get("breaking_news"), "breaking_news"),
        market_analysis: collect_items(sections.get("market_analysis"), "market_analysis"),
        new_tech: collect_items(sections.get("new_tech"), "new_tech"),
    })
}

/// Deserialize each array item individually, dropping the ones that do not
/// match the schema.
fn collect_items<T: DeserializeOwned>(section: Option<&serde_json::Value>, name: &str) -> Vec<T> {
    let Some(items) = section.and_then(|v| v.as_array()) else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| match serde_json::from_value::<T>(item.clone()) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                warn!(section = name, error = %e, "dropping malformed report item");
                None
            }
        })
        .collect()
}
