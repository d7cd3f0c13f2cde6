use std::sync::Arc;

use coachsync_core::engine::SyncEngine;
use coachsync_core::media::LocalMediaStore;
use coachsync_db::PgStore;

use crate::config::ServerConfig;

/// The engine as wired in the server: PostgreSQL tables, local media files.
pub type Engine = SyncEngine<PgStore, LocalMediaStore>;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: coachsync_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Program synchronization engine.
    pub engine: Arc<Engine>,
}

impl AppState {
    /// Wire the engine over `pool` using the media directory and expiry
    /// policy from `config`.
    pub fn new(pool: coachsync_db::DbPool, config: ServerConfig) -> Self {
        let engine = SyncEngine::new(
            PgStore::new(pool.clone()),
            LocalMediaStore::new(&config.media_dir),
        )
        .with_policy(config.expiry_policy());

        Self {
            pool,
            config: Arc::new(config),
            engine: Arc::new(engine),
        }
    }
}
