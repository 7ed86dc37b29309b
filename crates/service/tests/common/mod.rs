#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use agora_core::comment::{Comment, NewComment};
use agora_core::content::ArchiveFilter;
use agora_core::leaderboard::AuthorPoints;
use agora_core::like::{Like, LikeTarget};
use agora_core::post::Post;
use agora_core::repository::{CommentRepository, LikeRepository, RepoResult};
use agora_core::types::DbId;
use agora_service::{MemoryStore, PostEdit, Repositories, Services};

pub const COMMUNITY: i64 = 1;
pub const AUTHOR: i64 = 10;
pub const EDITOR: i64 = 11;
pub const READER: i64 = 12;

/// Services over a fresh in-memory store. The store handle is returned for
/// fault injection.
pub fn setup() -> (Services, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let services = Services::new(Repositories::from_store(store.clone()));
    (services, store)
}

/// Services whose comment and like lookups go through [`StaleReads`].
pub fn setup_with_stale_reads() -> (Services, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let stale = Arc::new(StaleReads::new(store.clone()));
    let mut repos = Repositories::from_store(store.clone());
    repos.comments = stale.clone();
    repos.likes = stale;
    (Services::new(repos), store)
}

/// Remembers the first comment or like it finds and keeps returning it, as
/// if every later request had read before the earlier ones wrote. Writes go
/// straight to the store.
pub struct StaleReads {
    store: Arc<MemoryStore>,
    comments: Mutex<HashMap<DbId, Comment>>,
    likes: Mutex<HashMap<(DbId, LikeTarget), Like>>,
}

impl StaleReads {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self {
            store,
            comments: Mutex::new(HashMap::new()),
            likes: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl CommentRepository for StaleReads {
    async fn find_by_id(&self, id: DbId, filter: ArchiveFilter) -> RepoResult<Option<Comment>> {
        let seen = self.comments.lock().unwrap().get(&id).cloned();
        if seen.is_some() {
            return Ok(seen);
        }
        let found = CommentRepository::find_by_id(&*self.store, id, filter).await?;
        if let Some(comment) = &found {
            self.comments.lock().unwrap().insert(id, comment.clone());
        }
        Ok(found)
    }

    async fn find_by_post_id(
        &self,
        post_id: DbId,
        filter: ArchiveFilter,
    ) -> RepoResult<Vec<Comment>> {
        self.store.find_by_post_id(post_id, filter).await
    }

    async fn create(&self, input: &NewComment) -> RepoResult<Comment> {
        CommentRepository::create(&*self.store, input).await
    }

    async fn update(&self, comment: &Comment) -> RepoResult<Comment> {
        CommentRepository::update(&*self.store, comment).await
    }

    async fn archive(&self, id: DbId) -> RepoResult<bool> {
        CommentRepository::archive(&*self.store, id).await
    }

    async fn adjust_like_count(&self, id: DbId, delta: i32) -> RepoResult<i32> {
        CommentRepository::adjust_like_count(&*self.store, id, delta).await
    }
}

#[async_trait]
impl LikeRepository for StaleReads {
    async fn find(&self, user_id: DbId, target: LikeTarget) -> RepoResult<Option<Like>> {
        let seen = self.likes.lock().unwrap().get(&(user_id, target)).cloned();
        if seen.is_some() {
            return Ok(seen);
        }
        let found = self.store.find(user_id, target).await?;
        if let Some(like) = &found {
            self.likes.lock().unwrap().insert((user_id, target), like.clone());
        }
        Ok(found)
    }

    async fn create(&self, user_id: DbId, target: LikeTarget) -> RepoResult<Like> {
        LikeRepository::create(&*self.store, user_id, target).await
    }

    async fn delete(&self, id: DbId) -> RepoResult<bool> {
        self.store.delete(id).await
    }

    async fn points_by_community(&self, community_id: DbId) -> RepoResult<Vec<AuthorPoints>> {
        self.store.points_by_community(community_id).await
    }
}

/// A draft post by [`AUTHOR`] in [`COMMUNITY`].
pub async fn draft_post(services: &Services, title: &str) -> Post {
    services
        .posts
        .create(COMMUNITY, AUTHOR, title, "Initial body")
        .await
        .unwrap()
}

/// A published post by [`AUTHOR`] in [`COMMUNITY`].
pub async fn published_post(services: &Services, title: &str) -> Post {
    let post = draft_post(services, title).await;
    services.posts.publish(post.id).await.unwrap()
}

pub async fn edit_body(services: &Services, post_id: i64, body: &str) -> Post {
    services
        .posts
        .update(
            post_id,
            EDITOR,
            PostEdit {
                content: Some(body.to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap()
}

pub async fn top_level(services: &Services, post_id: i64, body: &str) -> Comment {
    services
        .comments
        .create(post_id, AUTHOR, body, None)
        .await
        .unwrap()
}

pub async fn reply(services: &Services, post_id: i64, parent_id: i64, body: &str) -> Comment {
    services
        .comments
        .create(post_id, READER, body, Some(parent_id))
        .await
        .unwrap()
}
