//! Agora domain core.
//!
//! Entities, the error taxonomy, pure lifecycle/tree/versioning rules and
//! the repository contracts. Has no internal dependencies so it can be used
//! by the persistence, service and HTTP layers alike.

pub mod comment;
pub mod content;
pub mod diff;
pub mod error;
pub mod leaderboard;
pub mod like;
pub mod pagination;
pub mod post;
pub mod repository;
pub mod types;
pub mod version;
