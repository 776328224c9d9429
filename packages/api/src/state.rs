use std::sync::Arc;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use sqlx::SqlitePool;

use crate::settings::Settings;

/// Everything a handler may touch, built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub settings: Arc<Settings>,
    /// Encrypts and signs session cookies. Generated per process, so sessions
    /// do not survive a restart.
    pub cookie_key: Key,
}

impl AppState {
    pub fn new(pool: SqlitePool, settings: Settings) -> Self {
        Self {
            pool,
            settings: Arc::new(settings),
            cookie_key: Key::generate(),
        }
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}
