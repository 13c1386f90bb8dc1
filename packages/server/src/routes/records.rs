//! `GET/DELETE /api/records` — browse and manage stored records.

use axum::extract::{Extension, Path, Query};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use extractly::ExtractionRecord;

use crate::app::AppState;
use crate::error::ApiError;
use crate::validation::{validate_list_params, ListParams};

#[derive(Debug, Serialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub pages: u64,
}

#[derive(Debug, Serialize)]
pub struct RecordsResponse {
    pub records: Vec<ExtractionRecord>,
    pub pagination: Pagination,
}

fn parse_record_id(id: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(id).map_err(|_| ApiError::BadRequest("Invalid record id".to_string()))
}

pub async fn list_records_handler(
    Extension(state): Extension<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<RecordsResponse>, ApiError> {
    let query = validate_list_params(&params).map_err(|errors| {
        ApiError::BadRequest(format!("Validation failed: {}", errors.join(", ")))
    })?;

    let page = state
        .store
        .list(&query)
        .await
        .map_err(|err| ApiError::internal("Failed to fetch records", err))?;

    let pagination = Pagination {
        page: query.page,
        limit: query.limit,
        total: page.total,
        pages: page.pages(query.limit),
    };

    Ok(Json(RecordsResponse {
        records: page.records,
        pagination,
    }))
}

pub async fn get_record_handler(
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ExtractionRecord>, ApiError> {
    let id = parse_record_id(&id)?;

    let record = state
        .store
        .get(id)
        .await
        .map_err(|err| ApiError::internal("Failed to fetch record", err))?
        .ok_or_else(|| ApiError::NotFound("Record not found".to_string()))?;

    Ok(Json(record))
}

pub async fn delete_record_handler(
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_record_id(&id)?;

    let deleted = state
        .store
        .delete(id)
        .await
        .map_err(|err| ApiError::internal("Failed to delete record", err))?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("Record not found".to_string()))
    }
}
