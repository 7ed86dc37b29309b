//! Row models.
//!
//! Each submodule holds a `FromRow` struct matching one table and its
//! conversion into the corresponding `agora_core` entity.

pub mod comment;
pub mod content_version;
pub mod like;
pub mod post;

pub use comment::CommentRow;
pub use content_version::ContentVersionRow;
pub use like::LikeRow;
pub use post::PostRow;
