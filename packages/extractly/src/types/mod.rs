//! Data types for extraction records, queries and results.

pub mod config;
pub mod outcome;
pub mod query;
pub mod record;
