//! Domain services for community posts, threaded comments, content
//! versioning and likes.
//!
//! Services depend only on the repository contracts in
//! `agora_core::repository`; [`Repositories`] bundles one implementation of
//! each and [`Services`] wires the services over them.

mod error;

pub mod comments;
pub mod likes;
pub mod memory;
pub mod posts;
pub mod versioning;

use std::sync::Arc;

use agora_core::repository::{
    CommentRepository, ContentVersionRepository, LikeRepository, PostRepository,
};

pub use comments::CommentTreeService;
pub use likes::LikeService;
pub use memory::MemoryStore;
pub use posts::{PostEdit, PostService};
pub use versioning::VersioningService;

#[derive(Clone)]
pub struct Repositories {
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub versions: Arc<dyn ContentVersionRepository>,
    pub likes: Arc<dyn LikeRepository>,
}

impl Repositories {
    /// Every contract backed by one shared [`MemoryStore`].
    pub fn in_memory() -> Self {
        Self::from_store(Arc::new(MemoryStore::new()))
    }

    /// Every contract backed by `store`. Keeps the handle usable for fault
    /// injection in tests.
    pub fn from_store(store: Arc<MemoryStore>) -> Self {
        Self {
            posts: store.clone(),
            comments: store.clone(),
            versions: store.clone(),
            likes: store,
        }
    }
}

#[derive(Clone)]
pub struct Services {
    pub versioning: VersioningService,
    pub comments: CommentTreeService,
    pub posts: PostService,
    pub likes: LikeService,
}

impl Services {
    pub fn new(repos: Repositories) -> Self {
        let versioning = VersioningService::new(
            repos.versions.clone(),
            repos.posts.clone(),
            repos.comments.clone(),
        );
        Self {
            comments: CommentTreeService::new(
                repos.comments.clone(),
                repos.posts.clone(),
                versioning.clone(),
            ),
            posts: PostService::new(repos.posts.clone(), versioning.clone()),
            likes: LikeService::new(repos.likes, repos.posts, repos.comments),
            versioning,
        }
    }
}
