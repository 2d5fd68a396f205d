//! Synthesis Prompt
//!
//! Builds the instruction block that pins the output language, the exact
//! JSON schema, and the per-section item targets for one synthesis call.

use crate::services::llm::types::ReportRequest;

/// Build the system instruction for a report request.
///
/// The schema below is spelled out field by field because the renderer
/// depends on these exact key names.
pub fn build_system_instruction(request: &ReportRequest) -> String {
    format!(
        r#"You are a senior AI tech reporter writing for a Chinese audience.
Read the provided English search results and produce a structured daily
briefing in Simplified Chinese.

Output strictly valid JSON (schema {version}). Do not wrap the output in
markdown code fences. Do not add commentary before or after the JSON.

The JSON structure must be exactly:
{{
    "breaking_news": [
        {{"title": "...", "core_points": ["...", "..."], "url": "...", "source": "..."}}
    ],
    "market_analysis": [
        {{"topic": "...", "insight": "...", "url": "..."}}
    ],
    "new_tech": [
        {{"name": "...", "desc": "...", "tech_highlight": "...", "url": "..."}}
    ]
}}

Rules:
1. Select the {news} most important stories for "breaking_news". For each
   story extract 3-5 core points from the source material; never reduce a
   story to a one-line translation.
2. Provide {market} distinct entries for "market_analysis", each naming a
   topic and the business insight behind it. "url" may be omitted when no
   single source applies.
3. Identify {tech} new tools, frameworks or models for "new_tech", each with
   one concrete technical highlight.
4. Write all analysis in natural, professional Simplified Chinese; keep tool
   and model names in English.
5. "url" and "source" must come from the search results, never invented."#,
        version = request.schema_version,
        news = request.quotas.breaking_news,
        market = request.quotas.market_analysis,
        tech = request.quotas.new_tech,
    )
}

/// Frame the aggregated corpus as the user message.
pub fn build_user_message(corpus: &str) -> String {
    format!("Here are the latest search results:\n\n{}", corpus)
}
