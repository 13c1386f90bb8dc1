//! The persisted extraction record and its lifecycle status.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of an extraction record.
///
/// A record moves forward through exactly one path:
/// `Pending -> Processing -> (Completed | Failed)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl ProcessingStatus {
    /// Stable string form used in the database and query params.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessingStatus::Pending => "pending",
            ProcessingStatus::Processing => "processing",
            ProcessingStatus::Completed => "completed",
            ProcessingStatus::Failed => "failed",
        }
    }

    /// Parse a lowercase status string.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(ProcessingStatus::Pending),
            "processing" => Some(ProcessingStatus::Processing),
            "completed" => Some(ProcessingStatus::Completed),
            "failed" => Some(ProcessingStatus::Failed),
            _ => None,
        }
    }

    /// Whether the record has reached a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ProcessingStatus::Completed | ProcessingStatus::Failed
        )
    }
}

impl std::fmt::Display for ProcessingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One request/response cycle's persisted state (input + result + status).
///
/// Serialized camelCase to match the records browser contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionRecord {
    pub id: Uuid,
    pub url: String,
    pub instruction: String,
    pub html_content: String,
    pub processing_status: ProcessingStatus,
    /// Field names in the order the model reported them. None until completed.
    pub parsed_fields: Option<Vec<String>>,
    /// Field name -> extracted value. None until completed.
    pub extracted_data: Option<IndexMap<String, serde_json::Value>>,
    /// Field name -> confidence in [0, 1]. None until completed.
    pub confidence_scores: Option<IndexMap<String, f64>>,
    /// Set only when the record failed.
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new record (always starts `pending`).
#[derive(Debug, Clone)]
pub struct NewExtractionRecord {
    pub url: String,
    pub instruction: String,
    pub html_content: String,
}

impl ExtractionRecord {
    /// Build a fresh `pending` record from its inputs.
    pub fn new(input: NewExtractionRecord) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            url: input.url,
            instruction: input.instruction,
            html_content: input.html_content,
            processing_status: ProcessingStatus::Pending,
            parsed_fields: None,
            extracted_data: None,
            confidence_scores: None,
            error_message: None,
            created_at: now,
            updated_at: now,
        }
    }
}
