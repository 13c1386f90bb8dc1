//! List-query types for browsing stored records.

use serde::{Deserialize, Serialize};

use crate::types::record::{ExtractionRecord, ProcessingStatus};

/// Sortable columns for record listings.
///
/// A closed set so stores can map names to columns without ever
/// interpolating caller input into SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    CreatedAt,
    UpdatedAt,
    Url,
    ProcessingStatus,
}

impl SortField {
    /// Parse the camelCase query-param form. Unknown values fall back to
    /// `createdAt`, matching the original permissive behavior.
    pub fn parse(s: &str) -> Self {
        match s {
            "updatedAt" => SortField::UpdatedAt,
            "url" => SortField::Url,
            "processingStatus" => SortField::ProcessingStatus,
            _ => SortField::CreatedAt,
        }
    }
}

/// Sort direction, default newest-first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn parse(s: &str) -> Self {
        if s.eq_ignore_ascii_case("asc") {
            SortOrder::Asc
        } else {
            SortOrder::Desc
        }
    }
}

/// A validated records listing query.
#[derive(Debug, Clone)]
pub struct RecordQuery {
    /// 1-based page number.
    pub page: u32,
    /// Page size.
    pub limit: u32,
    /// Case-insensitive substring match over url, instruction and
    /// error message.
    pub search: Option<String>,
    /// Exact status filter.
    pub status: Option<ProcessingStatus>,
    pub sort_by: SortField,
    pub sort_order: SortOrder,
}

impl Default for RecordQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 10,
            search: None,
            status: None,
            sort_by: SortField::default(),
            sort_order: SortOrder::default(),
        }
    }
}

impl RecordQuery {
    /// Row offset for the current page. Page 0 is treated as page 1.
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}

/// One page of records plus the total match count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordPage {
    pub records: Vec<ExtractionRecord>,
    pub total: u64,
}

impl RecordPage {
    /// Total number of pages for the given page size.
    pub fn pages(&self, limit: u32) -> u64 {
        if limit == 0 {
            return 0;
        }
        self.total.div_ceil(u64::from(limit))
    }
}
