//! Repository layer.
//!
//! Each repository wraps a cloned [`PgPool`](sqlx::PgPool) and implements one
//! of the `agora_core::repository` contracts.

pub mod comment_repo;
pub mod content_version_repo;
pub mod like_repo;
pub mod post_repo;

pub use comment_repo::PgCommentRepo;
pub use content_version_repo::PgContentVersionRepo;
pub use like_repo::PgLikeRepo;
pub use post_repo::PgPostRepo;

use agora_core::content::ArchiveFilter;

/// Bound as a boolean against `($n OR deleted_at IS NULL)`.
pub(crate) fn include_archived(filter: ArchiveFilter) -> bool {
    matches!(filter, ArchiveFilter::IncludeArchived)
}
