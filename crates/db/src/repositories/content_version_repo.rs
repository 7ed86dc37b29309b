//! Repository for the `content_versions` table.
//!
//! Versions are append-only; there is no update or delete.

use async_trait::async_trait;
use sqlx::PgPool;

use agora_core::content::ContentRef;
use agora_core::repository::{ContentVersionRepository, RepoResult};
use agora_core::version::{ContentVersion, NewContentVersion};

use crate::error::classify;
use crate::models::ContentVersionRow;

/// Column list for content_versions queries.
const COLUMNS: &str = "id, content_type, content_id, version_number, body, created_by, created_at";

#[derive(Debug, Clone)]
pub struct PgContentVersionRepo {
    pool: PgPool,
}

impl PgContentVersionRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContentVersionRepository for PgContentVersionRepo {
    async fn find_by_content(&self, content: ContentRef) -> RepoResult<Vec<ContentVersion>> {
        let query = format!(
            "SELECT {COLUMNS} FROM content_versions
             WHERE content_type = $1 AND content_id = $2
             ORDER BY version_number ASC"
        );
        sqlx::query_as::<_, ContentVersionRow>(&query)
            .bind(content.content_type())
            .bind(content.id())
            .fetch_all(&self.pool)
            .await
            .map_err(classify)?
            .into_iter()
            .map(ContentVersion::try_from)
            .collect()
    }

    async fn find_by_content_and_version(
        &self,
        content: ContentRef,
        version_number: i32,
    ) -> RepoResult<Option<ContentVersion>> {
        let query = format!(
            "SELECT {COLUMNS} FROM content_versions
             WHERE content_type = $1 AND content_id = $2 AND version_number = $3"
        );
        sqlx::query_as::<_, ContentVersionRow>(&query)
            .bind(content.content_type())
            .bind(content.id())
            .bind(version_number)
            .fetch_optional(&self.pool)
            .await
            .map_err(classify)?
            .map(ContentVersion::try_from)
            .transpose()
    }

    async fn get_latest(&self, content: ContentRef) -> RepoResult<Option<ContentVersion>> {
        let query = format!(
            "SELECT {COLUMNS} FROM content_versions
             WHERE content_type = $1 AND content_id = $2
             ORDER BY version_number DESC
             LIMIT 1"
        );
        sqlx::query_as::<_, ContentVersionRow>(&query)
            .bind(content.content_type())
            .bind(content.id())
            .fetch_optional(&self.pool)
            .await
            .map_err(classify)?
            .map(ContentVersion::try_from)
            .transpose()
    }

    async fn create(&self, version: &NewContentVersion) -> RepoResult<ContentVersion> {
        let query = format!(
            "INSERT INTO content_versions (content_type, content_id, version_number, body, created_by)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, ContentVersionRow>(&query)
            .bind(version.content.content_type())
            .bind(version.content.id())
            .bind(version.version_number)
            .bind(&version.body)
            .bind(version.created_by)
            .fetch_one(&self.pool)
            .await
            .map_err(classify)?;
        ContentVersion::try_from(row)
    }
}
