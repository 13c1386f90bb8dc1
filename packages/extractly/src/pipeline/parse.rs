//! Defensive parsing of LLM extraction responses.
//!
//! Models are told to reply with bare JSON but routinely wrap it in
//! markdown fences or preamble text. Strategy, in order: direct parse,
//! then fence-stripped first `{...}` region, then the unparseable branch.
//! Whatever comes back is coerced into a well-shaped [`FieldExtraction`].

use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;
use serde::Deserialize;

use crate::types::outcome::{ExtractionOutcome, FieldExtraction};

static JSON_OBJECT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{.*\}").expect("json object regex is valid"));

/// Raw response shape before structural coercion. Every field is optional
/// and loosely typed; `coerce` repairs type mismatches.
#[derive(Debug, Deserialize)]
struct RawExtractionResponse {
    #[serde(default)]
    parsed_fields: serde_json::Value,
    #[serde(default)]
    extracted: serde_json::Value,
    #[serde(default)]
    confidence: serde_json::Value,
}

/// Parse a model reply into a tagged outcome.
pub fn parse_extraction_response(response: &str) -> ExtractionOutcome {
    // (a) direct parse
    if let Ok(raw) = serde_json::from_str::<RawExtractionResponse>(response) {
        return ExtractionOutcome::Parsed(coerce(raw));
    }

    // (b) strip markdown fences, then take the outermost {...} region
    let cleaned = response
        .trim()
        .replace("```json", "")
        .replace("```", "");

    if let Some(object) = JSON_OBJECT_RE.find(&cleaned) {
        if let Ok(raw) = serde_json::from_str::<RawExtractionResponse>(object.as_str()) {
            return ExtractionOutcome::Parsed(coerce(raw));
        }
    }

    // (c) nothing recoverable
    ExtractionOutcome::Unparseable {
        raw: response.to_string(),
    }
}

/// Repair structural mismatches: non-array fields become empty, non-object
/// maps become empty, and every confidence value is clamped to a finite
/// number in [0, 1] (anything else becomes 0.0).
fn coerce(raw: RawExtractionResponse) -> FieldExtraction {
    let parsed_fields = match raw.parsed_fields {
        serde_json::Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                serde_json::Value::String(s) => Some(s),
                other => Some(other.to_string()),
            })
            .collect(),
        _ => Vec::new(),
    };

    let extracted: IndexMap<String, serde_json::Value> = match raw.extracted {
        serde_json::Value::Object(map) => map.into_iter().collect(),
        _ => IndexMap::new(),
    };

    let confidence: IndexMap<String, f64> = match raw.confidence {
        serde_json::Value::Object(map) => map
            .into_iter()
            .map(|(key, value)| (key, clamp_confidence(&value)))
            .collect(),
        _ => IndexMap::new(),
    };

    FieldExtraction {
        parsed_fields,
        extracted,
        confidence,
    }
}

/// A confidence score is valid only if it is a finite number in [0, 1];
/// everything else collapses to 0.0.
fn clamp_confidence(value: &serde_json::Value) -> f64 {
    match value.as_f64() {
        Some(score) if score.is_finite() && (0.0..=1.0).contains(&score) => score,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_valid_json_verbatim() {
        let response = r#"{
            "parsed_fields": ["name", "price"],
            "extracted": {"name": "Widget", "price": "$19.99"},
            "confidence": {"name": 0.95, "price": 0.87}
        }"#;

        let outcome = parse_extraction_response(response);
        let fields = outcome.into_fields();
        assert_eq!(fields.parsed_fields, vec!["name", "price"]);
        assert_eq!(fields.extracted["name"], json!("Widget"));
        assert_eq!(fields.confidence["price"], 0.87);
    }

    #[test]
    fn parses_json_wrapped_in_markdown_fences() {
        let response = "```json\n{\"parsed_fields\": [\"title\"], \"extracted\": {\"title\": \"Hello\"}, \"confidence\": {\"title\": 1.0}}\n```";

        let outcome = parse_extraction_response(response);
        assert!(outcome.is_parsed());
        let fields = outcome.into_fields();
        assert_eq!(fields.parsed_fields, vec!["title"]);
        assert_eq!(fields.extracted["title"], json!("Hello"));
    }

    #[test]
    fn parses_json_buried_in_prose() {
        let response = "Here is the extraction you asked for:\n{\"parsed_fields\": [\"a\"], \"extracted\": {\"a\": 1}, \"confidence\": {\"a\": 0.5}}\nLet me know if you need more.";

        let outcome = parse_extraction_response(response);
        assert!(outcome.is_parsed());
    }

    #[test]
    fn unparsable_text_returns_sentinel() {
        let outcome = parse_extraction_response("I could not process this page, sorry.");
        assert!(!outcome.is_parsed());

        let fields = outcome.into_fields();
        assert_eq!(fields, FieldExtraction::parse_failure());
    }

    #[test]
    fn coerces_mismatched_shapes_to_empty() {
        let response = r#"{"parsed_fields": "oops", "extracted": [1, 2], "confidence": null}"#;

        let fields = parse_extraction_response(response).into_fields();
        assert!(fields.parsed_fields.is_empty());
        assert!(fields.extracted.is_empty());
        assert!(fields.confidence.is_empty());
    }

    #[test]
    fn clamps_out_of_range_confidence_to_zero() {
        let response = r#"{
            "parsed_fields": ["a", "b", "c", "d"],
            "extracted": {},
            "confidence": {"a": 1.5, "b": -0.1, "c": "high", "d": 0.42}
        }"#;

        let fields = parse_extraction_response(response).into_fields();
        assert_eq!(fields.confidence["a"], 0.0);
        assert_eq!(fields.confidence["b"], 0.0);
        assert_eq!(fields.confidence["c"], 0.0);
        assert_eq!(fields.confidence["d"], 0.42);
    }

    #[test]
    fn preserves_field_order() {
        let response = r#"{
            "parsed_fields": ["z", "a", "m"],
            "extracted": {"z": 1, "a": 2, "m": 3},
            "confidence": {"z": 0.1, "a": 0.2, "m": 0.3}
        }"#;

        let fields = parse_extraction_response(response).into_fields();
        let keys: Vec<_> = fields.extracted.keys().cloned().collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }
}
