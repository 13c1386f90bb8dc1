//! The ingest pipeline: persist, call the model, persist the result.

use std::sync::Arc;

use tracing::{error, info, warn};
use uuid::Uuid;

use crate::error::Result;
use crate::traits::{ai::AI, store::RecordStore};
use crate::types::{
    config::ExtractionConfig,
    outcome::FieldExtraction,
    record::NewExtractionRecord,
};

use super::parse::parse_extraction_response;
use super::prompts::format_extract_prompt;

/// Error message persisted and surfaced when the AI call fails.
pub const AI_FAILURE_MESSAGE: &str = "AI processing failed";

/// Result of a successful ingest run.
#[derive(Debug, Clone)]
pub struct IngestResult {
    pub record_id: Uuid,
    pub fields: FieldExtraction,
}

/// Drives one extraction request through its full lifecycle.
///
/// Dependencies are injected at construction; there is no global store or
/// AI handle. The record status advances exactly three times:
/// `pending -> processing -> (completed | failed)`. The AI is called once
/// per request, awaited, with no retry.
///
/// Known gap: if persisting the `failed` status itself fails, the record is
/// left in `processing` with no reconciliation sweep.
pub struct Pipeline {
    store: Arc<dyn RecordStore>,
    ai: Arc<dyn AI>,
    config: ExtractionConfig,
}

impl Pipeline {
    pub fn new(store: Arc<dyn RecordStore>, ai: Arc<dyn AI>) -> Self {
        Self {
            store,
            ai,
            config: ExtractionConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ExtractionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }

    /// Run one extraction request end to end.
    pub async fn ingest(&self, input: NewExtractionRecord) -> Result<IngestResult> {
        let record = self.store.create(input).await?;
        info!(record_id = %record.id, url = %record.url, "created extraction record");

        self.store.mark_processing(record.id).await?;

        let prompt = format_extract_prompt(&record.instruction, &record.html_content, &self.config);

        let response = match self.ai.generate(&prompt).await {
            Ok(text) => text,
            Err(err) => {
                error!(record_id = %record.id, error = %err, "AI call failed");
                if let Err(persist_err) = self.store.fail(record.id, AI_FAILURE_MESSAGE).await {
                    // Leaves the record stuck in `processing`.
                    error!(
                        record_id = %record.id,
                        error = %persist_err,
                        "failed to persist failure status"
                    );
                }
                return Err(err);
            }
        };

        let outcome = parse_extraction_response(&response);
        if !outcome.is_parsed() {
            warn!(record_id = %record.id, "model response unparseable, storing sentinel");
        }

        let fields = outcome.into_fields();
        self.store.complete(record.id, &fields).await?;
        info!(
            record_id = %record.id,
            field_count = fields.parsed_fields.len(),
            "extraction completed"
        );

        Ok(IngestResult {
            record_id: record.id,
            fields,
        })
    }
}
