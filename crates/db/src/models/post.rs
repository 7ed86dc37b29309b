use agora_core::post::Post;
use agora_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `posts` table.
#[derive(Debug, Clone, FromRow)]
pub struct PostRow {
    pub id: DbId,
    pub community_id: DbId,
    pub author_id: DbId,
    pub title: String,
    pub content: String,
    pub is_pinned: bool,
    pub is_solved: bool,
    pub like_count: i32,
    pub helpful_count: i32,
    pub comment_count: i32,
    pub view_count: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub published_at: Option<Timestamp>,
    pub deleted_at: Option<Timestamp>,
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        Post {
            id: row.id,
            community_id: row.community_id,
            author_id: row.author_id,
            title: row.title,
            content: row.content,
            is_pinned: row.is_pinned,
            is_solved: row.is_solved,
            like_count: row.like_count,
            helpful_count: row.helpful_count,
            comment_count: row.comment_count,
            view_count: row.view_count,
            created_at: row.created_at,
            updated_at: row.updated_at,
            published_at: row.published_at,
            deleted_at: row.deleted_at,
        }
    }
}
