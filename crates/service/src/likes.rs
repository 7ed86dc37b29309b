//! Like toggling and the community leaderboard.

use std::sync::Arc;

use agora_core::content::ArchiveFilter;
use agora_core::error::{CoreError, RepoError};
use agora_core::leaderboard::{
    rank_authors, LeaderboardEntry, DEFAULT_LEADERBOARD_LIMIT, MAX_LEADERBOARD_LIMIT,
};
use agora_core::like::{LikeTarget, LikeToggle};
use agora_core::pagination::clamp_limit;
use agora_core::repository::{CommentRepository, LikeRepository, PostRepository};
use agora_core::types::DbId;

use crate::error::{internal, RepoResultExt};

#[derive(Clone)]
pub struct LikeService {
    likes: Arc<dyn LikeRepository>,
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
}

impl LikeService {
    pub fn new(
        likes: Arc<dyn LikeRepository>,
        posts: Arc<dyn PostRepository>,
        comments: Arc<dyn CommentRepository>,
    ) -> Self {
        Self {
            likes,
            posts,
            comments,
        }
    }

    /// Like the target if the user hasn't yet, otherwise remove the like.
    pub async fn toggle(&self, user_id: DbId, target: LikeTarget) -> Result<LikeToggle, CoreError> {
        let archived = match target {
            LikeTarget::Post(id) => self
                .posts
                .find_by_id(id, ArchiveFilter::IncludeArchived)
                .await
                .or_internal("load post")?
                .ok_or(CoreError::PostNotFound(id))?
                .is_archived(),
            LikeTarget::Comment(id) => self
                .comments
                .find_by_id(id, ArchiveFilter::IncludeArchived)
                .await
                .or_internal("load comment")?
                .ok_or(CoreError::CommentNotFound(id))?
                .is_archived(),
        };
        if archived {
            return Err(CoreError::CannotLikeArchivedContent(target.as_content_ref()));
        }

        let existing = self
            .likes
            .find(user_id, target)
            .await
            .or_internal("load like")?;

        let toggle = match existing {
            Some(like) => {
                let removed = self.likes.delete(like.id).await.or_internal("delete like")?;
                // A concurrent unlike already removed the row and decremented.
                let delta = if removed { -1 } else { 0 };
                LikeToggle {
                    liked: false,
                    like_count: self.adjust_count(target, delta).await?,
                }
            }
            None => match self.likes.create(user_id, target).await {
                Ok(_) => LikeToggle {
                    liked: true,
                    like_count: self.adjust_count(target, 1).await?,
                },
                // A concurrent request from the same user won the insert.
                Err(RepoError::UniqueViolation(_)) => LikeToggle {
                    liked: true,
                    like_count: self.adjust_count(target, 0).await?,
                },
                Err(err) => return Err(internal(err, "create like")),
            },
        };

        tracing::info!(
            user_id,
            target = %target.as_content_ref(),
            liked = toggle.liked,
            like_count = toggle.like_count,
            "Like toggled"
        );
        Ok(toggle)
    }

    /// Top authors of a community by likes received.
    pub async fn leaderboard(
        &self,
        community_id: DbId,
        limit: Option<i64>,
    ) -> Result<Vec<LeaderboardEntry>, CoreError> {
        let limit = clamp_limit(limit, DEFAULT_LEADERBOARD_LIMIT, MAX_LEADERBOARD_LIMIT);
        let points = self
            .likes
            .points_by_community(community_id)
            .await
            .or_internal("aggregate leaderboard points")?;
        Ok(rank_authors(points, limit as usize))
    }

    async fn adjust_count(&self, target: LikeTarget, delta: i32) -> Result<i32, CoreError> {
        match target {
            LikeTarget::Post(id) => self
                .posts
                .adjust_like_count(id, delta)
                .await
                .or_internal("adjust post like count"),
            LikeTarget::Comment(id) => self
                .comments
                .adjust_like_count(id, delta)
                .await
                .or_internal("adjust comment like count"),
        }
    }
}
