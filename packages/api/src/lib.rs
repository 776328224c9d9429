//! # API crate: the zote note server
//!
//! Everything the server binary needs lives here so it can be driven in-process
//! by tests: the router, its handlers, the SQLite store and the ambient
//! plumbing (settings, logging, errors).
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`auth`] | Argon2id password hashing, cookie-resident [`auth::SessionData`] |
//! | [`db`] | SQLite pool creation and embedded migrations |
//! | [`error`] | [`ApiError`], rendered as `{"status":"error","msg":...}` |
//! | [`logging`] | JSON logs to stdout and an append-only log file |
//! | [`middleware`] | request start/finish logging with a request id |
//! | [`models`] | `User`, `File`, `QuickNote` rows and their queries |
//! | [`routes`] | the `/api/v1` handlers and the embedded static bundle |
//! | [`server`] | accept loop with header limits and idle timeout |
//! | [`settings`] | layered configuration (`config.toml`, environment) |
//!
//! ## Startup
//!
//! ```no_run
//! # async fn run() -> anyhow::Result<()> {
//! let settings = api::Settings::new()?;
//! let pool = api::db::connect(&settings.db_path).await?;
//! let app = api::routes::router(api::AppState::new(pool, settings.clone()));
//! let listener = tokio::net::TcpListener::bind(("0.0.0.0", settings.port)).await?;
//! api::server::serve(listener, app, &settings.timeouts).await;
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod db;
pub mod error;
pub mod logging;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod server;
pub mod settings;
mod state;

pub use error::{ApiError, ApiResult};
pub use settings::Settings;
pub use state::AppState;
