//! Repository for the `comments` table.

use async_trait::async_trait;
use sqlx::PgPool;

use agora_core::comment::{Comment, NewComment};
use agora_core::content::ArchiveFilter;
use agora_core::repository::{CommentRepository, RepoResult};
use agora_core::types::DbId;

use super::include_archived;
use crate::error::classify;
use crate::models::CommentRow;

/// Column list for comments queries.
const COLUMNS: &str = "id, post_id, author_id, parent_id, content, like_count, helpful_count, \
                       created_at, updated_at, deleted_at";

#[derive(Debug, Clone)]
pub struct PgCommentRepo {
    pool: PgPool,
}

impl PgCommentRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentRepository for PgCommentRepo {
    async fn find_by_id(&self, id: DbId, filter: ArchiveFilter) -> RepoResult<Option<Comment>> {
        let query = format!(
            "SELECT {COLUMNS} FROM comments
             WHERE id = $1 AND ($2 OR deleted_at IS NULL)"
        );
        let row = sqlx::query_as::<_, CommentRow>(&query)
            .bind(id)
            .bind(include_archived(filter))
            .fetch_optional(&self.pool)
            .await
            .map_err(classify)?;
        Ok(row.map(Comment::from))
    }

    async fn find_by_post_id(
        &self,
        post_id: DbId,
        filter: ArchiveFilter,
    ) -> RepoResult<Vec<Comment>> {
        let query = format!(
            "SELECT {COLUMNS} FROM comments
             WHERE post_id = $1 AND ($2 OR deleted_at IS NULL)
             ORDER BY created_at ASC, id ASC"
        );
        let rows = sqlx::query_as::<_, CommentRow>(&query)
            .bind(post_id)
            .bind(include_archived(filter))
            .fetch_all(&self.pool)
            .await
            .map_err(classify)?;
        Ok(rows.into_iter().map(Comment::from).collect())
    }

    async fn create(&self, input: &NewComment) -> RepoResult<Comment> {
        let query = format!(
            "INSERT INTO comments (post_id, author_id, parent_id, content)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, CommentRow>(&query)
            .bind(input.post_id)
            .bind(input.author_id)
            .bind(input.parent_id)
            .bind(&input.content)
            .fetch_one(&self.pool)
            .await
            .map_err(classify)?;
        Ok(row.into())
    }

    async fn update(&self, comment: &Comment) -> RepoResult<Comment> {
        let query = format!(
            "UPDATE comments SET content = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, CommentRow>(&query)
            .bind(comment.id)
            .bind(&comment.content)
            .fetch_one(&self.pool)
            .await
            .map_err(classify)?;
        Ok(row.into())
    }

    async fn archive(&self, id: DbId) -> RepoResult<bool> {
        let result = sqlx::query(
            "UPDATE comments SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(classify)?;
        Ok(result.rows_affected() > 0)
    }

    async fn adjust_like_count(&self, id: DbId, delta: i32) -> RepoResult<i32> {
        sqlx::query_scalar::<_, i32>(
            "UPDATE comments SET like_count = like_count + $2 WHERE id = $1 RETURNING like_count",
        )
        .bind(id)
        .bind(delta)
        .fetch_one(&self.pool)
        .await
        .map_err(classify)
    }
}
