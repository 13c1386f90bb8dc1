//! `POST /api/ingest` — run one extraction request end to end.

use axum::{extract::Extension, Json};
use indexmap::IndexMap;
use serde::Serialize;
use tracing::info;

use extractly::NewExtractionRecord;

use crate::app::AppState;
use crate::error::ApiError;
use crate::validation::{validate_ingest_request, IngestRequest};

/// Response body, snake_case per the API contract.
#[derive(Debug, Serialize)]
pub struct IngestResponse {
    pub url: String,
    pub instruction: String,
    pub parsed_fields: Vec<String>,
    pub extracted: IndexMap<String, serde_json::Value>,
    pub confidence: IndexMap<String, f64>,
    pub record_id: uuid::Uuid,
}

pub async fn ingest_handler(
    Extension(state): Extension<AppState>,
    Json(body): Json<IngestRequest>,
) -> Result<Json<IngestResponse>, ApiError> {
    let valid = validate_ingest_request(&body, state.config.max_html_size).map_err(|errors| {
        ApiError::BadRequest(format!("Validation failed: {}", errors.join(", ")))
    })?;

    info!(url = %valid.url, instruction = %valid.instruction, "processing extraction request");

    let result = state
        .pipeline
        .ingest(NewExtractionRecord {
            url: valid.url.clone(),
            instruction: valid.instruction.clone(),
            html_content: valid.html,
        })
        .await
        .map_err(|err| ApiError::internal("Failed to process extraction request", err))?;

    Ok(Json(IngestResponse {
        url: valid.url,
        instruction: valid.instruction,
        parsed_fields: result.fields.parsed_fields,
        extracted: result.fields.extracted,
        confidence: result.fields.confidence,
        record_id: result.record_id,
    }))
}
