//! Content version model.
//!
//! Versions are immutable snapshots keyed by `(content_type, content_id)`.

use agora_core::content::ContentRef;
use agora_core::error::RepoError;
use agora_core::types::{DbId, Timestamp};
use agora_core::version::ContentVersion;
use sqlx::FromRow;

/// A row from the `content_versions` table.
#[derive(Debug, Clone, FromRow)]
pub struct ContentVersionRow {
    pub id: DbId,
    pub content_type: String,
    pub content_id: DbId,
    pub version_number: i32,
    pub body: String,
    pub created_by: DbId,
    pub created_at: Timestamp,
}

impl TryFrom<ContentVersionRow> for ContentVersion {
    type Error = RepoError;

    fn try_from(row: ContentVersionRow) -> Result<Self, Self::Error> {
        let content = ContentRef::from_parts(&row.content_type, row.content_id).ok_or_else(|| {
            RepoError::Storage(format!(
                "content_versions row {} has unknown content_type '{}'",
                row.id, row.content_type
            ))
        })?;
        Ok(ContentVersion {
            id: row.id,
            content,
            version_number: row.version_number,
            body: row.body,
            created_by: row.created_by,
            created_at: row.created_at,
        })
    }
}
