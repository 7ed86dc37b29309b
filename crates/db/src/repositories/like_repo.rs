//! Repository for the `likes` table and leaderboard aggregation.

use async_trait::async_trait;
use sqlx::PgPool;

use agora_core::leaderboard::AuthorPoints;
use agora_core::like::{Like, LikeTarget};
use agora_core::repository::{LikeRepository, RepoResult};
use agora_core::types::DbId;

use crate::error::classify;
use crate::models::LikeRow;

/// Column list for likes queries.
const COLUMNS: &str = "id, user_id, post_id, comment_id, created_at";

#[derive(Debug, Clone)]
pub struct PgLikeRepo {
    pool: PgPool,
}

impl PgLikeRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LikeRepository for PgLikeRepo {
    async fn find(&self, user_id: DbId, target: LikeTarget) -> RepoResult<Option<Like>> {
        let query = format!(
            "SELECT {COLUMNS} FROM likes
             WHERE user_id = $1
               AND post_id IS NOT DISTINCT FROM $2
               AND comment_id IS NOT DISTINCT FROM $3"
        );
        sqlx::query_as::<_, LikeRow>(&query)
            .bind(user_id)
            .bind(target.post_id())
            .bind(target.comment_id())
            .fetch_optional(&self.pool)
            .await
            .map_err(classify)?
            .map(Like::try_from)
            .transpose()
    }

    async fn create(&self, user_id: DbId, target: LikeTarget) -> RepoResult<Like> {
        let query = format!(
            "INSERT INTO likes (user_id, post_id, comment_id)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, LikeRow>(&query)
            .bind(user_id)
            .bind(target.post_id())
            .bind(target.comment_id())
            .fetch_one(&self.pool)
            .await
            .map_err(classify)?;
        Like::try_from(row)
    }

    async fn delete(&self, id: DbId) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM likes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(classify)?;
        Ok(result.rows_affected() > 0)
    }

    async fn points_by_community(&self, community_id: DbId) -> RepoResult<Vec<AuthorPoints>> {
        let rows: Vec<(DbId, i64)> = sqlx::query_as(
            "SELECT author_id, COUNT(*)::BIGINT FROM (
                SELECT p.author_id FROM likes l
                JOIN posts p ON p.id = l.post_id
                WHERE p.community_id = $1 AND p.deleted_at IS NULL
                UNION ALL
                SELECT c.author_id FROM likes l
                JOIN comments c ON c.id = l.comment_id
                JOIN posts p ON p.id = c.post_id
                WHERE p.community_id = $1 AND p.deleted_at IS NULL AND c.deleted_at IS NULL
             ) received
             GROUP BY author_id",
        )
        .bind(community_id)
        .fetch_all(&self.pool)
        .await
        .map_err(classify)?;

        Ok(rows
            .into_iter()
            .map(|(user_id, points)| AuthorPoints { user_id, points })
            .collect())
    }
}
