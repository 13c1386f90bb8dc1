//! Extraction pipeline: preprocessing, prompt construction, response
//! parsing and lifecycle orchestration.

pub mod ingest;
pub mod parse;
pub mod preprocess;
pub mod prompts;

pub use ingest::{IngestResult, Pipeline, AI_FAILURE_MESSAGE};
pub use parse::parse_extraction_response;
pub use preprocess::{clean_html, truncate_html, TRUNCATION_MARKER};
pub use prompts::{format_extract_prompt, EXTRACT_PROMPT};
