//! Shared request and record fixtures.

use extractly::{ExtractionRecord, FieldExtraction, MemoryStore, RecordStore};

/// A well-formed model reply naming two product fields.
pub fn product_reply() -> &'static str {
    r#"{
        "parsed_fields": ["name", "price"],
        "extracted": {"name": "Widget", "price": "$19.99"},
        "confidence": {"name": 0.95, "price": 0.9}
    }"#
}

/// A valid ingest request body.
pub fn ingest_body(url: &str) -> serde_json::Value {
    serde_json::json!({
        "url": url,
        "html": "<html><body><h1>Widget</h1><p>$19.99</p></body></html>",
        "instruction": "get the product name and price"
    })
}

/// Drive a record through the full lifecycle to `completed`.
pub async fn seed_completed(store: &MemoryStore, url: &str) -> ExtractionRecord {
    let record = store
        .create(extractly::NewExtractionRecord {
            url: url.to_string(),
            instruction: "get the title".to_string(),
            html_content: "<html></html>".to_string(),
        })
        .await
        .unwrap();
    store.mark_processing(record.id).await.unwrap();
    store
        .complete(record.id, &FieldExtraction::parse_failure())
        .await
        .unwrap()
}
