//! Caller authentication.
//!
//! Tokens are issued by an external identity provider sharing the signing
//! secret; this server only verifies them.

mod extractor;
pub mod token;

pub use extractor::AuthUser;
