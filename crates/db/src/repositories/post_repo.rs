//! Repository for the `posts` table.

use async_trait::async_trait;
use sqlx::PgPool;

use agora_core::content::ArchiveFilter;
use agora_core::post::{NewPost, Post};
use agora_core::repository::{PostRepository, RepoResult};
use agora_core::types::DbId;

use super::include_archived;
use crate::error::classify;
use crate::models::PostRow;

/// Column list for posts queries.
const COLUMNS: &str = "id, community_id, author_id, title, content, is_pinned, is_solved, \
                       like_count, helpful_count, comment_count, view_count, \
                       created_at, updated_at, published_at, deleted_at";

#[derive(Debug, Clone)]
pub struct PgPostRepo {
    pool: PgPool,
}

impl PgPostRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostRepository for PgPostRepo {
    async fn find_by_id(&self, id: DbId, filter: ArchiveFilter) -> RepoResult<Option<Post>> {
        let query = format!(
            "SELECT {COLUMNS} FROM posts
             WHERE id = $1 AND ($2 OR deleted_at IS NULL)"
        );
        let row = sqlx::query_as::<_, PostRow>(&query)
            .bind(id)
            .bind(include_archived(filter))
            .fetch_optional(&self.pool)
            .await
            .map_err(classify)?;
        Ok(row.map(Post::from))
    }

    async fn list_by_community(
        &self,
        community_id: DbId,
        filter: ArchiveFilter,
        limit: i64,
        offset: i64,
    ) -> RepoResult<Vec<Post>> {
        let query = format!(
            "SELECT {COLUMNS} FROM posts
             WHERE community_id = $1 AND ($2 OR deleted_at IS NULL)
             ORDER BY is_pinned DESC, created_at DESC, id DESC
             LIMIT $3 OFFSET $4"
        );
        let rows = sqlx::query_as::<_, PostRow>(&query)
            .bind(community_id)
            .bind(include_archived(filter))
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(classify)?;
        Ok(rows.into_iter().map(Post::from).collect())
    }

    async fn create(&self, input: &NewPost) -> RepoResult<Post> {
        let query = format!(
            "INSERT INTO posts (community_id, author_id, title, content)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, PostRow>(&query)
            .bind(input.community_id)
            .bind(input.author_id)
            .bind(&input.title)
            .bind(&input.content)
            .fetch_one(&self.pool)
            .await
            .map_err(classify)?;
        Ok(row.into())
    }

    async fn update(&self, post: &Post) -> RepoResult<Post> {
        let query = format!(
            "UPDATE posts SET
                title = $2,
                content = $3,
                is_pinned = $4,
                is_solved = $5,
                published_at = $6,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, PostRow>(&query)
            .bind(post.id)
            .bind(&post.title)
            .bind(&post.content)
            .bind(post.is_pinned)
            .bind(post.is_solved)
            .bind(post.published_at)
            .fetch_one(&self.pool)
            .await
            .map_err(classify)?;
        Ok(row.into())
    }

    async fn archive(&self, id: DbId) -> RepoResult<bool> {
        let result =
            sqlx::query("UPDATE posts SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL")
                .bind(id)
                .execute(&self.pool)
                .await
                .map_err(classify)?;
        Ok(result.rows_affected() > 0)
    }

    async fn adjust_comment_count(&self, id: DbId, delta: i32) -> RepoResult<()> {
        sqlx::query("UPDATE posts SET comment_count = comment_count + $2 WHERE id = $1")
            .bind(id)
            .bind(delta)
            .execute(&self.pool)
            .await
            .map_err(classify)?;
        Ok(())
    }

    async fn adjust_like_count(&self, id: DbId, delta: i32) -> RepoResult<i32> {
        sqlx::query_scalar::<_, i32>(
            "UPDATE posts SET like_count = like_count + $2 WHERE id = $1 RETURNING like_count",
        )
        .bind(id)
        .bind(delta)
        .fetch_one(&self.pool)
        .await
        .map_err(classify)
    }

    async fn increment_view_count(&self, id: DbId) -> RepoResult<()> {
        sqlx::query("UPDATE posts SET view_count = view_count + 1 WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(classify)?;
        Ok(())
    }
}
