//! Typed wire protocol for the browser-extension side of the system.
//!
//! The popup, background worker and content script exchange JSON messages
//! tagged by a `type` field. Modelling them as one enum keeps every
//! variant's payload declared in a single place and makes the envelope
//! shape (`{success, data|error}`) explicit, instead of string-tag
//! dispatch over loose objects.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum number of extraction history entries retained locally.
pub const HISTORY_CAP: usize = 50;

/// Request messages passed between popup, background worker and content
/// script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExtensionRequest {
    /// Capture the current tab's HTML.
    #[serde(rename_all = "camelCase")]
    GetPageHtml {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tab_id: Option<i64>,
    },
    /// Relay a capture to the backend's ingest endpoint.
    ExtractData { data: ExtractPayload },
    /// Read the stored extension settings.
    GetSettings,
    /// Ask the content script for the cleaned page content.
    GetPageContent,
    /// Highlight matched elements in the page.
    HighlightElements { data: HighlightPayload },
    /// Remove any highlights previously applied.
    CleanHighlights,
}

/// Payload for `ExtractData`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractPayload {
    pub url: String,
    pub html: String,
    pub instruction: String,
}

/// Payload for `HighlightElements`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighlightPayload {
    pub selectors: Vec<String>,
}

/// The `{success, data|error}` response envelope every message uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> MessageResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }

    /// Collapse the envelope into a `Result`.
    pub fn into_result(self) -> std::result::Result<T, String> {
        if self.success {
            self.data
                .ok_or_else(|| "missing data in successful response".to_string())
        } else {
            Err(self
                .error
                .unwrap_or_else(|| "unknown error".to_string()))
        }
    }
}

/// Local extension settings held in key-value storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionSettings {
    pub api_base_url: String,
    pub max_retries: u32,
    /// Request timeout in milliseconds.
    pub timeout: u64,
}

impl Default for ExtensionSettings {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:3000/api".to_string(),
            max_retries: 3,
            timeout: 30_000,
        }
    }
}

/// One locally stored extraction result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub record_id: Uuid,
    pub url: String,
    pub instruction: String,
    pub timestamp: DateTime<Utc>,
}

/// Newest-first extraction history, capped at [`HISTORY_CAP`] entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionHistory {
    entries: VecDeque<HistoryEntry>,
}

impl ExtractionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new entry, dropping the oldest beyond the cap.
    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push_front(entry);
        self.entries.truncate(HISTORY_CAP);
    }

    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn requests_serialize_with_type_tags() {
        let message = ExtensionRequest::ExtractData {
            data: ExtractPayload {
                url: "https://example.com".to_string(),
                html: "<html></html>".to_string(),
                instruction: "get the title".to_string(),
            },
        };

        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value["type"], "EXTRACT_DATA");
        assert_eq!(value["data"]["url"], "https://example.com");

        let value = serde_json::to_value(ExtensionRequest::CleanHighlights).unwrap();
        assert_eq!(value, json!({"type": "CLEAN_HIGHLIGHTS"}));
    }

    #[test]
    fn get_page_html_accepts_optional_tab_id() {
        let parsed: ExtensionRequest =
            serde_json::from_value(json!({"type": "GET_PAGE_HTML", "tabId": 42})).unwrap();
        assert_eq!(parsed, ExtensionRequest::GetPageHtml { tab_id: Some(42) });

        let parsed: ExtensionRequest =
            serde_json::from_value(json!({"type": "GET_PAGE_HTML"})).unwrap();
        assert_eq!(parsed, ExtensionRequest::GetPageHtml { tab_id: None });
    }

    #[test]
    fn envelope_round_trips_both_branches() {
        let ok = MessageResponse::ok(json!({"html": "<p>x</p>"}));
        let value = serde_json::to_value(&ok).unwrap();
        assert_eq!(value["success"], true);
        assert!(value.get("error").is_none());

        let err: MessageResponse<serde_json::Value> = MessageResponse::err("no tab");
        assert_eq!(err.clone().into_result(), Err("no tab".to_string()));
        let value = serde_json::to_value(&err).unwrap();
        assert_eq!(value["success"], false);
        assert!(value.get("data").is_none());
    }

    #[test]
    fn settings_defaults_match_the_installed_extension() {
        let settings = ExtensionSettings::default();
        let value = serde_json::to_value(&settings).unwrap();
        assert_eq!(value["apiBaseUrl"], "http://localhost:3000/api");
        assert_eq!(value["maxRetries"], 3);
        assert_eq!(value["timeout"], 30_000);
    }

    #[test]
    fn history_caps_at_fifty_newest_first() {
        let mut history = ExtractionHistory::new();
        for i in 0..60 {
            history.push(HistoryEntry {
                record_id: Uuid::new_v4(),
                url: format!("https://example.com/{i}"),
                instruction: "get it".to_string(),
                timestamp: Utc::now(),
            });
        }

        assert_eq!(history.len(), HISTORY_CAP);
        let newest = history.entries().next().unwrap();
        assert_eq!(newest.url, "https://example.com/59");
        let oldest = history.entries().last().unwrap();
        assert_eq!(oldest.url, "https://example.com/10");
    }
}
