//! Agora community event bus.
//!
//! - [`EventBus`]: in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`CommunityEvent`]: the domain event envelope published by the API
//!   after every successful mutation.
//! - [`EventLogger`]: background subscriber that writes each event to the
//!   structured log.

pub mod bus;
pub mod logger;

pub use bus::{CommunityEvent, EventBus};
pub use logger::EventLogger;

/// Event type names published by the API.
pub mod event_types {
    pub const POST_CREATED: &str = "post.created";
    pub const POST_UPDATED: &str = "post.updated";
    pub const POST_PUBLISHED: &str = "post.published";
    pub const POST_ARCHIVED: &str = "post.archived";
    pub const CONTENT_RESTORED: &str = "content.restored";
    pub const COMMENT_CREATED: &str = "comment.created";
    pub const COMMENT_UPDATED: &str = "comment.updated";
    pub const COMMENT_ARCHIVED: &str = "comment.archived";
    pub const LIKE_TOGGLED: &str = "like.toggled";
}
