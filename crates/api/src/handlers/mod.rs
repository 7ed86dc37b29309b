//! Request handlers.
//!
//! Each submodule delegates to the `agora_service` services held in
//! [`AppState`](crate::state::AppState), maps errors via
//! [`AppError`](crate::error::AppError), and publishes a
//! [`CommunityEvent`](agora_events::CommunityEvent) after every successful
//! mutation.

pub mod comments;
pub mod likes;
pub mod posts;
pub mod versions;
