//! LLM prompts for the analysis pipeline.
//!
//! Prompt wording is opaque to the pipeline: nodes only fill the
//! placeholders and parse the reply. The drafter's input is the XML-like
//! case document built by [`build_case_document`].

use schemars::JsonSchema;

use crate::pipeline::nodes::specialist::SpecialistResponse;
use crate::types::state::{AnalysisResult, DecisionType, LegalMatter, RetrievalContext};

/// System prompt for the router classification call.
pub const ROUTER_SYSTEM_PROMPT: &str =
    "You are a classifier of Brazilian court documents. You answer with a single JSON object and nothing else.";

/// Prompt for classifying a document's legal matter and decision type.
pub const ROUTER_PROMPT: &str = r#"Classify the extracted document below.

Required fields:
- "legalMatter": one of [{legal_matters}]
- "decisionType": one of [{decision_types}]
- "complexity": integer from 0 to 100 rating how demanding the case is
- "confidence": number from 0 to 1 rating your confidence in the classification
- "reasoning": one or two sentences justifying the classification

<extracted_text>
{text}
</extracted_text>

Respond with the JSON object only."#;

/// System prompt for the specialist analysis call.
pub const SPECIALIST_SYSTEM_PROMPT: &str =
    "You are a specialist in Brazilian legal analysis. You answer with a single JSON object and nothing else.";

/// Prompt for the structured FIRAC analysis.
pub const SPECIALIST_PROMPT: &str = r#"Legal matter: {legal_matter}
Decision type: {decision_type}
{legal_context}
Analyze the extracted document below with the FIRAC framework:
- "facts": objective summary of the relevant facts
- "issue": the central legal question to decide
- "rule": statutes, binding precedents and case law that apply
- "application": application of the rules to the facts, with reasoning
- "conclusion": the result that follows from the analysis

The JSON object must match this schema:
{schema}

<extracted_text>
{text}
</extracted_text>

Respond with the JSON object only."#;

/// Format the router prompt for a document.
pub fn format_router_prompt(text: &str) -> String {
    let legal_matters = quoted_list(LegalMatter::ALL.map(LegalMatter::as_str));
    let decision_types = quoted_list(DecisionType::ALL.map(DecisionType::as_str));

    fill_placeholders(
        ROUTER_PROMPT,
        &[
            ("{legal_matters}", legal_matters.as_str()),
            ("{decision_types}", decision_types.as_str()),
            ("{text}", text),
        ],
    )
}

/// Format the specialist prompt.
///
/// `legal_context` is the fused retrieval text; the section is omitted
/// when there is none.
pub fn format_specialist_prompt(
    text: &str,
    legal_matter: LegalMatter,
    decision_type: DecisionType,
    legal_context: Option<&str>,
) -> String {
    let context_section = legal_context
        .map(|c| format!("\n<legal_context>\n{c}\n</legal_context>\n"))
        .unwrap_or_default();
    let schema = response_schema::<SpecialistResponse>();

    fill_placeholders(
        SPECIALIST_PROMPT,
        &[
            ("{legal_matter}", legal_matter.as_str()),
            ("{decision_type}", decision_type.as_str()),
            ("{legal_context}", context_section.as_str()),
            ("{schema}", schema.as_str()),
            ("{text}", text),
        ],
    )
}

/// Substitute placeholders in one left-to-right pass over `template`.
///
/// Substituted values are never rescanned, so document text or retrieved
/// passages that contain `{text}` stay literal.
fn fill_placeholders(template: &str, values: &[(&str, &str)]) -> String {
    let mut filled = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        filled.push_str(&rest[..open]);
        let tail = &rest[open..];
        match values.iter().find(|(key, _)| tail.starts_with(key)) {
            Some((key, value)) => {
                filled.push_str(value);
                rest = &tail[key.len()..];
            }
            None => {
                filled.push('{');
                rest = &tail[1..];
            }
        }
    }
    filled.push_str(rest);
    filled
}

/// Pretty-printed JSON schema for a response type.
pub fn response_schema<T: JsonSchema>() -> String {
    let schema = schemars::schema_for!(T);
    serde_json::to_string_pretty(&schema).unwrap_or_default()
}

fn quoted_list<const N: usize>(items: [&str; N]) -> String {
    items
        .iter()
        .map(|i| format!("\"{i}\""))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Build the `<case>` document the drafter receives.
///
/// Wraps the full document text, the five analysis fields, and the fused
/// retrieval context (one `[source] content` line per hit). All text is
/// XML-escaped.
pub fn build_case_document(
    raw_text: &str,
    analysis: &AnalysisResult,
    context: Option<&RetrievalContext>,
) -> String {
    let fused = context.map(|c| c.fused.as_slice()).unwrap_or_default();
    let status = if fused.is_empty() { "unavailable" } else { "available" };

    let mut lines = vec![
        "<case>".to_string(),
        "  <document>".to_string(),
        format!("    <content>{}</content>", escape_xml(raw_text)),
        "  </document>".to_string(),
        "  <analysis>".to_string(),
    ];
    for (tag, value) in [
        ("facts", &analysis.facts),
        ("issue", &analysis.issue),
        ("rule", &analysis.rule),
        ("application", &analysis.application),
        ("conclusion", &analysis.conclusion),
    ] {
        lines.push(format!("    <{tag}>{}</{tag}>", escape_xml(value)));
    }
    lines.push("  </analysis>".to_string());
    lines.push("  <retrieval>".to_string());
    lines.push(format!("    <status>{status}</status>"));
    lines.push("    <context>".to_string());
    lines.extend(
        fused
            .iter()
            .map(|hit| format!("[{}] {}", escape_xml(&hit.source), escape_xml(&hit.content))),
    );
    lines.push("    </context>".to_string());
    lines.push("  </retrieval>".to_string());
    lines.push("</case>".to_string());
    lines.join("\n")
}

/// Escape the five XML special characters.
pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
