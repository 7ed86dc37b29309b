use agora_core::error::RepoError;
use agora_core::like::{Like, LikeTarget};
use agora_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `likes` table. Exactly one of `post_id` and `comment_id`
/// is set.
#[derive(Debug, Clone, FromRow)]
pub struct LikeRow {
    pub id: DbId,
    pub user_id: DbId,
    pub post_id: Option<DbId>,
    pub comment_id: Option<DbId>,
    pub created_at: Timestamp,
}

impl TryFrom<LikeRow> for Like {
    type Error = RepoError;

    fn try_from(row: LikeRow) -> Result<Self, Self::Error> {
        let target = LikeTarget::from_columns(row.post_id, row.comment_id).ok_or_else(|| {
            RepoError::Storage(format!("likes row {} has no single target", row.id))
        })?;
        Ok(Like {
            id: row.id,
            user_id: row.user_id,
            target,
            created_at: row.created_at,
        })
    }
}
