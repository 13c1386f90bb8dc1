//! Extraction results: the validated field set and the tagged parse outcome.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Sentinel message persisted when the model response cannot be parsed.
pub const PARSE_FAILURE_MESSAGE: &str = "Failed to parse extraction results";

/// A structurally valid extraction: every field name in `parsed_fields`
/// keys into `extracted` and `confidence`, and every confidence value is a
/// finite number in [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldExtraction {
    pub parsed_fields: Vec<String>,
    pub extracted: IndexMap<String, serde_json::Value>,
    pub confidence: IndexMap<String, f64>,
}

impl FieldExtraction {
    /// The fixed sentinel returned when parsing fails entirely.
    pub fn parse_failure() -> Self {
        let mut extracted = IndexMap::new();
        extracted.insert(
            "error".to_string(),
            serde_json::Value::String(PARSE_FAILURE_MESSAGE.to_string()),
        );
        let mut confidence = IndexMap::new();
        confidence.insert("error".to_string(), 0.0);
        Self {
            parsed_fields: vec!["error".to_string()],
            extracted,
            confidence,
        }
    }
}

/// Outcome of parsing a model response.
///
/// A tagged result rather than ad hoc shape coercion: callers that care can
/// distinguish a real extraction from an unparseable reply, while
/// [`ExtractionOutcome::into_fields`] collapses both into a well-shaped
/// `FieldExtraction` for persistence.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractionOutcome {
    /// The response parsed (after structural coercion and clamping).
    Parsed(FieldExtraction),
    /// Nothing JSON-shaped could be recovered from the response.
    Unparseable { raw: String },
}

impl ExtractionOutcome {
    /// Collapse to a guaranteed-valid field set, trading fidelity for
    /// availability on the unparseable branch.
    pub fn into_fields(self) -> FieldExtraction {
        match self {
            ExtractionOutcome::Parsed(fields) => fields,
            ExtractionOutcome::Unparseable { .. } => FieldExtraction::parse_failure(),
        }
    }

    pub fn is_parsed(&self) -> bool {
        matches!(self, ExtractionOutcome::Parsed(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_has_fixed_shape() {
        let sentinel = FieldExtraction::parse_failure();
        assert_eq!(sentinel.parsed_fields, vec!["error"]);
        assert_eq!(
            sentinel.extracted["error"],
            serde_json::json!(PARSE_FAILURE_MESSAGE)
        );
        assert_eq!(sentinel.confidence["error"], 0.0);
    }

    #[test]
    fn unparseable_collapses_to_sentinel() {
        let outcome = ExtractionOutcome::Unparseable {
            raw: "not json".to_string(),
        };
        assert!(!outcome.is_parsed());
        assert_eq!(outcome.into_fields(), FieldExtraction::parse_failure());
    }
}
