//! Shared query parameter types for API handlers.

use agora_core::content::ArchiveFilter;
use serde::Deserialize;

/// Generic pagination parameters (`?limit=&offset=`).
///
/// Clamped in the handler via `clamp_limit` / `clamp_offset`.
#[derive(Debug, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// `?include_archived=true` opts a read into archived rows.
#[derive(Debug, Default, Deserialize)]
pub struct IncludeArchivedParams {
    #[serde(default)]
    pub include_archived: bool,
}

impl IncludeArchivedParams {
    pub fn filter(&self) -> ArchiveFilter {
        ArchiveFilter::from_flag(self.include_archived)
    }
}

/// `?old=&new=` for version comparison.
#[derive(Debug, Deserialize)]
pub struct CompareParams {
    pub old: i32,
    pub new: i32,
}

#[derive(Debug, Deserialize)]
pub struct LimitParams {
    pub limit: Option<i64>,
}
