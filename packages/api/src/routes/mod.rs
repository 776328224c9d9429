//! # HTTP routes
//!
//! | Method | Path | Handler |
//! |--------|------|---------|
//! | any | `/api/v1/health` | [`health`] |
//! | POST | `/api/v1/login` | [`auth::login`] |
//! | POST | `/api/v1/signup` | [`auth::signup`] |
//! | GET | `/api/v1/me` | [`auth::me`] |
//! | POST | `/api/v1/logout` | [`auth::logout`] |
//! | POST | `/api/v1/quick-note/update` | [`quick_note::update`] |
//! | any | everything else | [`assets::serve`], gzip-compressed |
//!
//! Every request passes through [`crate::middleware::request_logger`] and the
//! read/write timeouts from [`crate::settings::Timeouts`].

pub mod assets;
pub mod auth;
pub mod quick_note;

use axum::{
    http::StatusCode,
    middleware,
    routing::{any, get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{
    compression::CompressionLayer,
    timeout::{RequestBodyTimeoutLayer, TimeoutLayer},
};

use crate::error::ApiError;
use crate::middleware::request_logger;
use crate::state::AppState;

pub const API_PREFIX: &str = "/api/v1";

/// Build the complete application router.
pub fn router(state: AppState) -> Router {
    let timeouts = state.settings.timeouts.clone();

    let api = Router::new()
        .route("/health", any(health))
        .route("/login", post(auth::login))
        .route("/signup", post(auth::signup))
        .route("/me", get(auth::me))
        .route("/logout", post(auth::logout))
        .route("/quick-note/update", post(quick_note::update))
        .fallback(api_not_found);

    let static_files: Router = Router::new()
        .fallback(assets::serve)
        .layer(CompressionLayer::new());

    Router::new()
        .nest(API_PREFIX, api)
        .fallback_service(static_files)
        .with_state(state)
        .layer(RequestBodyTimeoutLayer::new(timeouts.read))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeouts.write,
        ))
        .layer(middleware::from_fn(request_logger))
}

pub(crate) fn ok() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// `ANY /api/v1/health`
pub async fn health() -> Json<Value> {
    ok()
}

async fn api_not_found() -> ApiError {
    ApiError::NotFound
}
