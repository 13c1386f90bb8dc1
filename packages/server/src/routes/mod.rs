//! HTTP route handlers.

pub mod health;
pub mod ingest;
pub mod records;

pub use health::health_handler;
pub use ingest::ingest_handler;
pub use records::{delete_record_handler, get_record_handler, list_records_handler};
