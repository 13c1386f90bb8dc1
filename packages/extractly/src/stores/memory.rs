//! In-memory storage implementation for testing and development.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

use crate::error::{ExtractlyError, Result};
use crate::traits::store::RecordStore;
use crate::types::{
    outcome::FieldExtraction,
    query::{RecordPage, RecordQuery, SortField, SortOrder},
    record::{ExtractionRecord, NewExtractionRecord, ProcessingStatus},
};

/// In-memory record store.
///
/// Useful for tests and development. Not suitable for production as data
/// is lost on restart. Enforces the same status-transition guards as the
/// PostgreSQL store.
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<Uuid, ExtractionRecord>>,
}

impl MemoryStore {
    /// Create a new empty memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Guarded in-place status transition.
    fn transition(
        &self,
        id: Uuid,
        expected: ProcessingStatus,
        to: ProcessingStatus,
        apply: impl FnOnce(&mut ExtractionRecord),
    ) -> Result<ExtractionRecord> {
        let mut records = self.records.write().unwrap();
        let record = records
            .get_mut(&id)
            .ok_or(ExtractlyError::RecordNotFound { id })?;

        if record.processing_status != expected {
            return Err(ExtractlyError::InvalidTransition {
                from: record.processing_status,
                to,
            });
        }

        record.processing_status = to;
        record.updated_at = Utc::now();
        apply(record);
        Ok(record.clone())
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn create(&self, input: NewExtractionRecord) -> Result<ExtractionRecord> {
        let record = ExtractionRecord::new(input);
        self.records
            .write()
            .unwrap()
            .insert(record.id, record.clone());
        Ok(record)
    }

    async fn mark_processing(&self, id: Uuid) -> Result<()> {
        self.transition(
            id,
            ProcessingStatus::Pending,
            ProcessingStatus::Processing,
            |_| {},
        )?;
        Ok(())
    }

    async fn complete(&self, id: Uuid, fields: &FieldExtraction) -> Result<ExtractionRecord> {
        self.transition(
            id,
            ProcessingStatus::Processing,
            ProcessingStatus::Completed,
            |record| {
                record.parsed_fields = Some(fields.parsed_fields.clone());
                record.extracted_data = Some(fields.extracted.clone());
                record.confidence_scores = Some(fields.confidence.clone());
            },
        )
    }

    async fn fail(&self, id: Uuid, error_message: &str) -> Result<ExtractionRecord> {
        self.transition(
            id,
            ProcessingStatus::Processing,
            ProcessingStatus::Failed,
            |record| {
                record.error_message = Some(error_message.to_string());
            },
        )
    }

    async fn get(&self, id: Uuid) -> Result<Option<ExtractionRecord>> {
        Ok(self.records.read().unwrap().get(&id).cloned())
    }

    async fn list(&self, query: &RecordQuery) -> Result<RecordPage> {
        let records = self.records.read().unwrap();

        let mut matches: Vec<ExtractionRecord> = records
            .values()
            .filter(|record| {
                if let Some(status) = query.status {
                    if record.processing_status != status {
                        return false;
                    }
                }
                if let Some(search) = &query.search {
                    let needle = search.to_lowercase();
                    let hit = record.url.to_lowercase().contains(&needle)
                        || record.instruction.to_lowercase().contains(&needle)
                        || record
                            .error_message
                            .as_ref()
                            .is_some_and(|m| m.to_lowercase().contains(&needle));
                    if !hit {
                        return false;
                    }
                }
                true
            })
            .cloned()
            .collect();

        matches.sort_by(|a, b| {
            let ordering = match query.sort_by {
                SortField::CreatedAt => a.created_at.cmp(&b.created_at),
                SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
                SortField::Url => a.url.cmp(&b.url),
                SortField::ProcessingStatus => a
                    .processing_status
                    .as_str()
                    .cmp(b.processing_status.as_str()),
            };
            match query.sort_order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });

        let total = matches.len() as u64;
        let records = matches
            .into_iter()
            .skip(query.offset() as usize)
            .take(query.limit as usize)
            .collect();

        Ok(RecordPage { records, total })
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        Ok(self.records.write().unwrap().remove(&id).is_some())
    }

    async fn health_check(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_input(url: &str) -> NewExtractionRecord {
        NewExtractionRecord {
            url: url.to_string(),
            instruction: "get the title".to_string(),
            html_content: "<html></html>".to_string(),
        }
    }

    async fn completed_record(store: &MemoryStore, url: &str) -> ExtractionRecord {
        let record = store.create(new_input(url)).await.unwrap();
        store.mark_processing(record.id).await.unwrap();
        store
            .complete(record.id, &FieldExtraction::parse_failure())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn lifecycle_advances_through_the_expected_sequence() {
        let store = MemoryStore::new();
        let record = store.create(new_input("https://a.com")).await.unwrap();
        assert_eq!(record.processing_status, ProcessingStatus::Pending);

        store.mark_processing(record.id).await.unwrap();
        let fetched = store.get(record.id).await.unwrap().unwrap();
        assert_eq!(fetched.processing_status, ProcessingStatus::Processing);

        let completed = store
            .complete(record.id, &FieldExtraction::parse_failure())
            .await
            .unwrap();
        assert_eq!(completed.processing_status, ProcessingStatus::Completed);
        assert!(completed.parsed_fields.is_some());
    }

    #[tokio::test]
    async fn transitions_cannot_skip_or_reverse() {
        let store = MemoryStore::new();
        let record = store.create(new_input("https://a.com")).await.unwrap();

        // pending -> completed skips processing
        let err = store
            .complete(record.id, &FieldExtraction::parse_failure())
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractlyError::InvalidTransition { .. }));

        store.mark_processing(record.id).await.unwrap();
        store.fail(record.id, "boom").await.unwrap();

        // terminal records cannot move again
        let err = store.mark_processing(record.id).await.unwrap_err();
        assert!(matches!(err, ExtractlyError::InvalidTransition { .. }));
        let err = store
            .complete(record.id, &FieldExtraction::parse_failure())
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractlyError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn pagination_counts_and_slices() {
        let store = MemoryStore::new();
        for i in 0..15 {
            completed_record(&store, &format!("https://site{i}.com")).await;
        }

        let page2 = store
            .list(&RecordQuery {
                page: 2,
                limit: 10,
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(page2.total, 15);
        assert_eq!(page2.records.len(), 5);
        assert_eq!(page2.pages(10), 2);
    }

    #[tokio::test]
    async fn search_matches_url_instruction_and_error() {
        let store = MemoryStore::new();
        completed_record(&store, "https://shop.example.com/widget").await;

        let record = store.create(new_input("https://other.com")).await.unwrap();
        store.mark_processing(record.id).await.unwrap();
        store.fail(record.id, "Gemini quota exceeded").await.unwrap();

        let by_url = store
            .list(&RecordQuery {
                search: Some("WIDGET".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_url.total, 1);

        let by_error = store
            .list(&RecordQuery {
                search: Some("quota".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_error.total, 1);
        assert_eq!(by_error.records[0].url, "https://other.com");
    }

    #[tokio::test]
    async fn status_filter_and_sort_order() {
        let store = MemoryStore::new();
        completed_record(&store, "https://b.com").await;
        completed_record(&store, "https://a.com").await;
        store.create(new_input("https://c.com")).await.unwrap();

        let completed = store
            .list(&RecordQuery {
                status: Some(ProcessingStatus::Completed),
                sort_by: SortField::Url,
                sort_order: SortOrder::Asc,
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(completed.total, 2);
        assert_eq!(completed.records[0].url, "https://a.com");
        assert_eq!(completed.records[1].url, "https://b.com");
    }

    #[tokio::test]
    async fn delete_reports_existence() {
        let store = MemoryStore::new();
        let record = store.create(new_input("https://a.com")).await.unwrap();

        assert!(store.delete(record.id).await.unwrap());
        assert!(!store.delete(record.id).await.unwrap());
        assert!(store.get(record.id).await.unwrap().is_none());
    }
}
