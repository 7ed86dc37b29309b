//! In-memory implementation of every repository contract.
//!
//! Backs local runs without PostgreSQL and the test suites. It enforces the
//! same uniqueness rules as the database schema, and can inject snapshot
//! insert conflicts and failures to exercise the service retry and error
//! paths.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use agora_core::comment::{Comment, NewComment};
use agora_core::content::{ArchiveFilter, ContentRef};
use agora_core::error::RepoError;
use agora_core::leaderboard::AuthorPoints;
use agora_core::like::{Like, LikeTarget};
use agora_core::post::{NewPost, Post};
use agora_core::repository::{
    CommentRepository, ContentVersionRepository, LikeRepository, PostRepository, RepoResult,
};
use agora_core::types::DbId;
use agora_core::version::{ContentVersion, NewContentVersion};

/// Constraint names mirror the PostgreSQL schema.
pub const UQ_CONTENT_VERSION: &str = "uq_content_versions_content_version";
pub const UQ_POST_LIKE: &str = "uq_likes_user_post";
pub const UQ_COMMENT_LIKE: &str = "uq_likes_user_comment";

#[derive(Default)]
struct State {
    posts: BTreeMap<DbId, Post>,
    comments: BTreeMap<DbId, Comment>,
    versions: Vec<ContentVersion>,
    likes: Vec<Like>,
    last_post_id: DbId,
    last_comment_id: DbId,
    last_version_id: DbId,
    last_like_id: DbId,
}

fn next_id(last: &mut DbId) -> DbId {
    *last += 1;
    *last
}

#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<State>,
    version_conflicts: AtomicU32,
    version_failures: AtomicU32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `n` snapshot inserts lose a race: a competing snapshot
    /// with the same number is stored first and the insert is rejected.
    pub fn inject_version_conflicts(&self, n: u32) {
        self.version_conflicts.store(n, Ordering::SeqCst);
    }

    /// Make the next `n` snapshot inserts fail with a storage error.
    pub fn inject_version_failures(&self, n: u32) {
        self.version_failures.store(n, Ordering::SeqCst);
    }
}

/// Consume one pending injection, if any.
fn take_one(counter: &AtomicU32) -> bool {
    counter
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok()
}

fn missing(entity: &str, id: DbId) -> RepoError {
    RepoError::Storage(format!("{entity} {id} does not exist"))
}

#[async_trait]
impl ContentVersionRepository for MemoryStore {
    async fn find_by_content(&self, content: ContentRef) -> RepoResult<Vec<ContentVersion>> {
        let state = self.state.read().await;
        let mut versions: Vec<ContentVersion> = state
            .versions
            .iter()
            .filter(|v| v.content == content)
            .cloned()
            .collect();
        versions.sort_by_key(|v| v.version_number);
        Ok(versions)
    }

    async fn find_by_content_and_version(
        &self,
        content: ContentRef,
        version_number: i32,
    ) -> RepoResult<Option<ContentVersion>> {
        let state = self.state.read().await;
        Ok(state
            .versions
            .iter()
            .find(|v| v.content == content && v.version_number == version_number)
            .cloned())
    }

    async fn get_latest(&self, content: ContentRef) -> RepoResult<Option<ContentVersion>> {
        let state = self.state.read().await;
        Ok(state
            .versions
            .iter()
            .filter(|v| v.content == content)
            .max_by_key(|v| v.version_number)
            .cloned())
    }

    async fn create(&self, version: &NewContentVersion) -> RepoResult<ContentVersion> {
        if take_one(&self.version_failures) {
            return Err(RepoError::Storage("injected snapshot failure".into()));
        }

        let mut state = self.state.write().await;
        if take_one(&self.version_conflicts) {
            let id = next_id(&mut state.last_version_id);
            state.versions.push(ContentVersion {
                id,
                content: version.content,
                version_number: version.version_number,
                body: version.body.clone(),
                created_by: version.created_by,
                created_at: Utc::now(),
            });
        }

        let taken = state
            .versions
            .iter()
            .any(|v| v.content == version.content && v.version_number == version.version_number);
        if taken {
            return Err(RepoError::UniqueViolation(UQ_CONTENT_VERSION.into()));
        }

        let created = ContentVersion {
            id: next_id(&mut state.last_version_id),
            content: version.content,
            version_number: version.version_number,
            body: version.body.clone(),
            created_by: version.created_by,
            created_at: Utc::now(),
        };
        state.versions.push(created.clone());
        Ok(created)
    }
}

#[async_trait]
impl CommentRepository for MemoryStore {
    async fn find_by_id(&self, id: DbId, filter: ArchiveFilter) -> RepoResult<Option<Comment>> {
        let state = self.state.read().await;
        Ok(state
            .comments
            .get(&id)
            .filter(|c| filter.admits(c.is_archived()))
            .cloned())
    }

    async fn find_by_post_id(
        &self,
        post_id: DbId,
        filter: ArchiveFilter,
    ) -> RepoResult<Vec<Comment>> {
        let state = self.state.read().await;
        Ok(state
            .comments
            .values()
            .filter(|c| c.post_id == post_id && filter.admits(c.is_archived()))
            .cloned()
            .collect())
    }

    async fn create(&self, input: &NewComment) -> RepoResult<Comment> {
        let mut state = self.state.write().await;
        let now = Utc::now();
        let comment = Comment {
            id: next_id(&mut state.last_comment_id),
            post_id: input.post_id,
            author_id: input.author_id,
            parent_id: input.parent_id,
            content: input.content.clone(),
            like_count: 0,
            helpful_count: 0,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        state.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn update(&self, comment: &Comment) -> RepoResult<Comment> {
        let mut state = self.state.write().await;
        let stored = state
            .comments
            .get_mut(&comment.id)
            .ok_or_else(|| missing("comment", comment.id))?;
        stored.content = comment.content.clone();
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }

    async fn archive(&self, id: DbId) -> RepoResult<bool> {
        let mut state = self.state.write().await;
        let stored = state
            .comments
            .get_mut(&id)
            .ok_or_else(|| missing("comment", id))?;
        if stored.is_archived() {
            return Ok(false);
        }
        stored.deleted_at = Some(Utc::now());
        Ok(true)
    }

    async fn adjust_like_count(&self, id: DbId, delta: i32) -> RepoResult<i32> {
        let mut state = self.state.write().await;
        let stored = state
            .comments
            .get_mut(&id)
            .ok_or_else(|| missing("comment", id))?;
        stored.like_count += delta;
        Ok(stored.like_count)
    }
}

#[async_trait]
impl PostRepository for MemoryStore {
    async fn find_by_id(&self, id: DbId, filter: ArchiveFilter) -> RepoResult<Option<Post>> {
        let state = self.state.read().await;
        Ok(state
            .posts
            .get(&id)
            .filter(|p| filter.admits(p.is_archived()))
            .cloned())
    }

    async fn list_by_community(
        &self,
        community_id: DbId,
        filter: ArchiveFilter,
        limit: i64,
        offset: i64,
    ) -> RepoResult<Vec<Post>> {
        let state = self.state.read().await;
        let mut posts: Vec<Post> = state
            .posts
            .values()
            .filter(|p| p.community_id == community_id && filter.admits(p.is_archived()))
            .cloned()
            .collect();
        posts.sort_by(|a, b| {
            b.is_pinned
                .cmp(&a.is_pinned)
                .then(b.created_at.cmp(&a.created_at))
                .then(b.id.cmp(&a.id))
        });
        Ok(posts
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn create(&self, input: &NewPost) -> RepoResult<Post> {
        let mut state = self.state.write().await;
        let now = Utc::now();
        let post = Post {
            id: next_id(&mut state.last_post_id),
            community_id: input.community_id,
            author_id: input.author_id,
            title: input.title.clone(),
            content: input.content.clone(),
            is_pinned: false,
            is_solved: false,
            like_count: 0,
            helpful_count: 0,
            comment_count: 0,
            view_count: 0,
            created_at: now,
            updated_at: now,
            published_at: None,
            deleted_at: None,
        };
        state.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn update(&self, post: &Post) -> RepoResult<Post> {
        let mut state = self.state.write().await;
        let stored = state
            .posts
            .get_mut(&post.id)
            .ok_or_else(|| missing("post", post.id))?;
        stored.title = post.title.clone();
        stored.content = post.content.clone();
        stored.is_pinned = post.is_pinned;
        stored.is_solved = post.is_solved;
        stored.published_at = post.published_at;
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }

    async fn archive(&self, id: DbId) -> RepoResult<bool> {
        let mut state = self.state.write().await;
        let stored = state.posts.get_mut(&id).ok_or_else(|| missing("post", id))?;
        if stored.is_archived() {
            return Ok(false);
        }
        stored.deleted_at = Some(Utc::now());
        Ok(true)
    }

    async fn adjust_comment_count(&self, id: DbId, delta: i32) -> RepoResult<()> {
        let mut state = self.state.write().await;
        let stored = state.posts.get_mut(&id).ok_or_else(|| missing("post", id))?;
        stored.comment_count += delta;
        Ok(())
    }

    async fn adjust_like_count(&self, id: DbId, delta: i32) -> RepoResult<i32> {
        let mut state = self.state.write().await;
        let stored = state.posts.get_mut(&id).ok_or_else(|| missing("post", id))?;
        stored.like_count += delta;
        Ok(stored.like_count)
    }

    async fn increment_view_count(&self, id: DbId) -> RepoResult<()> {
        let mut state = self.state.write().await;
        let stored = state.posts.get_mut(&id).ok_or_else(|| missing("post", id))?;
        stored.view_count += 1;
        Ok(())
    }
}

#[async_trait]
impl LikeRepository for MemoryStore {
    async fn find(&self, user_id: DbId, target: LikeTarget) -> RepoResult<Option<Like>> {
        let state = self.state.read().await;
        Ok(state
            .likes
            .iter()
            .find(|l| l.user_id == user_id && l.target == target)
            .cloned())
    }

    async fn create(&self, user_id: DbId, target: LikeTarget) -> RepoResult<Like> {
        let mut state = self.state.write().await;
        if state
            .likes
            .iter()
            .any(|l| l.user_id == user_id && l.target == target)
        {
            let constraint = match target {
                LikeTarget::Post(_) => UQ_POST_LIKE,
                LikeTarget::Comment(_) => UQ_COMMENT_LIKE,
            };
            return Err(RepoError::UniqueViolation(constraint.into()));
        }
        let like = Like {
            id: next_id(&mut state.last_like_id),
            user_id,
            target,
            created_at: Utc::now(),
        };
        state.likes.push(like.clone());
        Ok(like)
    }

    async fn delete(&self, id: DbId) -> RepoResult<bool> {
        let mut state = self.state.write().await;
        let before = state.likes.len();
        state.likes.retain(|l| l.id != id);
        Ok(state.likes.len() < before)
    }

    async fn points_by_community(&self, community_id: DbId) -> RepoResult<Vec<AuthorPoints>> {
        let guard = self.state.read().await;
        let state: &State = &guard;
        let live_post_in_community = |post_id: DbId| {
            state
                .posts
                .get(&post_id)
                .filter(|p| p.community_id == community_id && !p.is_archived())
        };

        let mut points: HashMap<DbId, i64> = HashMap::new();
        for like in &state.likes {
            let author = match like.target {
                LikeTarget::Post(id) => live_post_in_community(id).map(|p| p.author_id),
                LikeTarget::Comment(id) => state
                    .comments
                    .get(&id)
                    .filter(|c| !c.is_archived() && live_post_in_community(c.post_id).is_some())
                    .map(|c| c.author_id),
            };
            if let Some(author_id) = author {
                *points.entry(author_id).or_insert(0) += 1;
            }
        }

        Ok(points
            .into_iter()
            .map(|(user_id, points)| AuthorPoints { user_id, points })
            .collect())
    }
}
