use std::sync::Arc;

use agora_db::repositories::{PgCommentRepo, PgContentVersionRepo, PgLikeRepo, PgPostRepo};
use agora_db::DbPool;
use agora_events::EventBus;
use agora_service::{Repositories, Services};

use crate::auth::token::TokenVerifier;
use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything inside is an `Arc` or already `Clone`.
#[derive(Clone)]
pub struct AppState {
    pub services: Services,
    /// Connection pool when running on PostgreSQL. Used by the health check.
    pub pool: Option<DbPool>,
    pub config: Arc<ServerConfig>,
    /// Bus for publishing community events.
    pub event_bus: Arc<EventBus>,
    pub verifier: TokenVerifier,
}

impl AppState {
    pub fn new(
        services: Services,
        pool: Option<DbPool>,
        config: Arc<ServerConfig>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        let verifier = TokenVerifier::new(&config.jwt);
        Self {
            services,
            pool,
            config,
            event_bus,
            verifier,
        }
    }
}

/// Repository set backed by PostgreSQL.
pub fn postgres_repositories(pool: DbPool) -> Repositories {
    Repositories {
        posts: Arc::new(PgPostRepo::new(pool.clone())),
        comments: Arc::new(PgCommentRepo::new(pool.clone())),
        versions: Arc::new(PgContentVersionRepo::new(pool.clone())),
        likes: Arc::new(PgLikeRepo::new(pool)),
    }
}
