//! Core trait abstractions (AI, RecordStore).

pub mod ai;
pub mod store;
