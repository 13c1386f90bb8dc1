//! Request validation for the ingest and records endpoints.

use serde::Deserialize;
use url::Url;

use extractly::{ProcessingStatus, RecordQuery, SortField, SortOrder};

/// Maximum instruction length in characters.
pub const MAX_INSTRUCTION_LENGTH: usize = 1_000;

/// Maximum page number accepted by the records listing.
pub const MAX_PAGE: u32 = 1_000;

/// Maximum page size accepted by the records listing.
pub const MAX_LIMIT: u32 = 100;

/// Raw ingest request body. Fields are loose JSON values so missing and
/// mistyped inputs both flow through validation and get the `{error}`
/// envelope, instead of a deserializer rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IngestRequest {
    pub url: Option<serde_json::Value>,
    pub html: Option<serde_json::Value>,
    pub instruction: Option<serde_json::Value>,
}

/// A validated ingest request.
#[derive(Debug, Clone)]
pub struct ValidIngest {
    pub url: String,
    pub html: String,
    pub instruction: String,
}

/// Validate an ingest request, collecting every failure.
pub fn validate_ingest_request(
    request: &IngestRequest,
    max_html_size: usize,
) -> Result<ValidIngest, Vec<String>> {
    let mut errors = Vec::new();

    let url = request.url.as_ref().and_then(serde_json::Value::as_str);
    let html = request.html.as_ref().and_then(serde_json::Value::as_str);
    let instruction = request
        .instruction
        .as_ref()
        .and_then(serde_json::Value::as_str);

    match url {
        None => errors.push("URL is required and must be a string".to_string()),
        Some(url) => {
            if Url::parse(url).is_err() {
                errors.push("URL must be a valid URL format".to_string());
            }
        }
    }

    match html {
        None => errors.push("HTML content is required and must be a string".to_string()),
        Some(html) => {
            if html.chars().count() > max_html_size {
                errors.push(format!(
                    "HTML content exceeds maximum size of {} characters",
                    max_html_size
                ));
            }
            if html.trim().is_empty() {
                errors.push("HTML content cannot be empty".to_string());
            }
        }
    }

    match instruction {
        None => errors.push("Instruction is required and must be a string".to_string()),
        Some(instruction) => {
            if instruction.trim().is_empty() {
                errors.push("Instruction cannot be empty".to_string());
            }
            if instruction.chars().count() > MAX_INSTRUCTION_LENGTH {
                errors.push(format!(
                    "Instruction must be less than {} characters",
                    MAX_INSTRUCTION_LENGTH
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(ValidIngest {
            url: url.unwrap_or_default().to_string(),
            html: html.unwrap_or_default().to_string(),
            instruction: instruction.unwrap_or_default().to_string(),
        })
    } else {
        Err(errors)
    }
}

/// Raw query params for `GET /api/records`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
    pub status: Option<String>,
    #[serde(rename = "sortBy")]
    pub sort_by: Option<String>,
    #[serde(rename = "sortOrder")]
    pub sort_order: Option<String>,
}

/// Validate listing params into a store query.
pub fn validate_list_params(params: &ListParams) -> Result<RecordQuery, Vec<String>> {
    let mut errors = Vec::new();
    let mut query = RecordQuery::default();

    match params.page {
        None => {}
        Some(page) if page < 1 => errors.push("Page must be a positive integer".to_string()),
        Some(page) if page > i64::from(MAX_PAGE) => {
            errors.push(format!("Page cannot exceed {}", MAX_PAGE))
        }
        Some(page) => query.page = page as u32,
    }

    match params.limit {
        None => {}
        Some(limit) if limit < 1 => errors.push("Limit must be a positive integer".to_string()),
        Some(limit) if limit > i64::from(MAX_LIMIT) => {
            errors.push(format!("Limit cannot exceed {}", MAX_LIMIT))
        }
        Some(limit) => query.limit = limit as u32,
    }

    if let Some(status) = params.status.as_deref().filter(|s| !s.is_empty()) {
        match ProcessingStatus::parse(status) {
            Some(parsed) => query.status = Some(parsed),
            None => errors.push(format!("Unknown status filter: {}", status)),
        }
    }

    query.search = params.search.clone().filter(|s| !s.is_empty());
    if let Some(sort_by) = &params.sort_by {
        query.sort_by = SortField::parse(sort_by);
    }
    if let Some(sort_order) = &params.sort_order {
        query.sort_order = SortOrder::parse(sort_order);
    }

    if errors.is_empty() {
        Ok(query)
    } else {
        Err(errors)
    }
}
