//! Storage trait for extraction records.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::types::{
    outcome::FieldExtraction,
    query::{RecordPage, RecordQuery},
    record::{ExtractionRecord, NewExtractionRecord},
};

/// Persistence seam for extraction records.
///
/// Implementations must enforce the forward-only status lifecycle:
/// `mark_processing` only moves a `pending` record, `complete`/`fail` only
/// move a `processing` record. Violations are
/// [`ExtractlyError::InvalidTransition`](crate::error::ExtractlyError::InvalidTransition).
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Persist a new record with status `pending`.
    async fn create(&self, input: NewExtractionRecord) -> Result<ExtractionRecord>;

    /// Advance `pending -> processing`.
    async fn mark_processing(&self, id: Uuid) -> Result<()>;

    /// Advance `processing -> completed` and attach the extraction fields.
    async fn complete(&self, id: Uuid, fields: &FieldExtraction) -> Result<ExtractionRecord>;

    /// Advance `processing -> failed` and attach the error message.
    async fn fail(&self, id: Uuid, error_message: &str) -> Result<ExtractionRecord>;

    /// Fetch one record by id.
    async fn get(&self, id: Uuid) -> Result<Option<ExtractionRecord>>;

    /// List records matching the query, with the total match count.
    async fn list(&self, query: &RecordQuery) -> Result<RecordPage>;

    /// Delete a record. Returns false if it did not exist.
    async fn delete(&self, id: Uuid) -> Result<bool>;

    /// Backend connectivity probe.
    async fn health_check(&self) -> bool;
}
