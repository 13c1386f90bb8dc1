//! Instruction-Driven Web Page Extraction Library
//!
//! Captures a page's HTML together with a natural-language instruction,
//! sends both to a hosted LLM, and turns the free-text reply into a
//! structurally guaranteed extraction result persisted as an
//! [`ExtractionRecord`].
//!
//! # Design
//!
//! - Instruction-driven, not schema-driven: the model names the fields
//! - Defensive parsing: the pipeline always yields a well-shaped result,
//!   trading fidelity for availability on garbage replies
//! - Trait seams ([`AI`], [`RecordStore`]) so applications inject their
//!   own provider and storage at startup
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use extractly::{GeminiAI, MemoryStore, NewExtractionRecord, Pipeline};
//!
//! let store = Arc::new(MemoryStore::new());
//! let ai = Arc::new(GeminiAI::from_env()?);
//! let pipeline = Pipeline::new(store, ai);
//!
//! let result = pipeline
//!     .ingest(NewExtractionRecord {
//!         url: "https://example.com".into(),
//!         html_content: page_html,
//!         instruction: "get the product name and price".into(),
//!     })
//!     .await?;
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Core trait abstractions (AI, RecordStore)
//! - [`types`] - Records, queries, outcomes
//! - [`pipeline`] - Preprocessing, prompts, parsing, orchestration
//! - [`stores`] - Storage implementations (memory, postgres)
//! - [`ai`] - Provider implementations (Gemini)
//! - [`protocol`] - Typed extension message protocol
//! - [`testing`] - Mock implementations for tests

pub mod ai;
pub mod error;
pub mod pipeline;
pub mod protocol;
pub mod stores;
pub mod testing;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use error::{ExtractlyError, Result};
pub use traits::{ai::AI, store::RecordStore};
pub use types::{
    config::{ExtractionConfig, DEFAULT_MAX_PROMPT_HTML_CHARS},
    outcome::{ExtractionOutcome, FieldExtraction, PARSE_FAILURE_MESSAGE},
    query::{RecordPage, RecordQuery, SortField, SortOrder},
    record::{ExtractionRecord, NewExtractionRecord, ProcessingStatus},
};

// Re-export pipeline components
pub use pipeline::{
    clean_html, format_extract_prompt, parse_extraction_response, truncate_html, IngestResult,
    Pipeline, AI_FAILURE_MESSAGE, EXTRACT_PROMPT, TRUNCATION_MARKER,
};

// Re-export AI providers and stores
pub use ai::GeminiAI;
pub use stores::MemoryStore;

#[cfg(feature = "postgres")]
pub use stores::PostgresStore;

// Re-export protocol types
pub use protocol::{
    ExtensionRequest, ExtensionSettings, ExtractionHistory, HistoryEntry, MessageResponse,
    HISTORY_CAP,
};
