//! Login, signup and session handlers.
//!
//! Every rejection is an early `return Err(..)`, so a request that has been
//! refused can never reach the code that issues a session.

use anyhow::Context as _;
use axum::{
    extract::{rejection::FormRejection, State},
    Form, Json,
};
use axum_extra::extract::cookie::PrivateCookieJar;
use serde::Deserialize;
use serde_json::{json, Value};

use super::ok;
use crate::auth::{hash_password, verify_password, verify_unknown_user, SessionData};
use crate::error::{ApiError, ApiResult};
use crate::models::User;
use crate::state::AppState;

pub const MIN_PASSWORD_LEN: usize = 6;

const BAD_CREDENTIALS: &str = "Username or password incorrect";
const SIGNUPS_DISABLED: &str = "Signups are disabled";
const USERNAME_REQUIRED: &str = "Username required";
const PASSWORD_TOO_WEAK: &str = "Password too weak, at least 6 character";
const USER_EXISTS: &str = "User already exists";

/// Form body of `/login` and `/signup`. Absent fields read as empty.
#[derive(Debug, Default, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

fn read_form(form: Result<Form<Credentials>, FormRejection>) -> ApiResult<Credentials> {
    form.map(|Form(credentials)| credentials)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

/// `POST /api/v1/login`
///
/// A body that is not a form reads as empty credentials. Unknown users go
/// through a full password verification too, so both failures look alike.
pub async fn login(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    form: Result<Form<Credentials>, FormRejection>,
) -> ApiResult<(PrivateCookieJar, Json<Value>)> {
    let Credentials { username, password } = form
        .map(|Form(credentials)| credentials)
        .unwrap_or_default();
    let username = username.trim().to_owned();

    let user = User::find_by_username(&state.pool, &username)
        .await
        .context("look up user")?;

    let hash = user.as_ref().map(|user| user.password.clone());
    let valid = tokio::task::spawn_blocking(move || match hash {
        Some(hash) => verify_password(&password, &hash),
        None => verify_unknown_user(&password),
    })
    .await
    .context("join password verification")?;

    let user = match user {
        Some(user) if valid => user,
        Some(_) => {
            tracing::info!(username = %username, "login rejected: wrong password");
            return Err(ApiError::Forbidden(BAD_CREDENTIALS.into()));
        }
        None => {
            tracing::info!(username = %username, "login rejected: unknown user");
            return Err(ApiError::Forbidden(BAD_CREDENTIALS.into()));
        }
    };

    let jar = SessionData::for_user(&user.username).save(jar)?;
    tracing::info!(username = %user.username, "login success");
    Ok((jar, ok()))
}

/// `POST /api/v1/signup`
pub async fn signup(
    State(state): State<AppState>,
    form: Result<Form<Credentials>, FormRejection>,
) -> ApiResult<Json<Value>> {
    if !state.settings.signups_allowed {
        return Err(ApiError::Forbidden(SIGNUPS_DISABLED.into()));
    }

    let Credentials { username, password } = read_form(form)?;
    let username = username.trim().to_owned();
    if username.is_empty() {
        return Err(ApiError::BadRequest(USERNAME_REQUIRED.into()));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ApiError::BadRequest(PASSWORD_TOO_WEAK.into()));
    }

    // Cheap early exit; the conditional insert below is what actually decides.
    if User::find_by_username(&state.pool, &username)
        .await
        .context("signup existence check")?
        .is_some()
    {
        return Err(ApiError::Conflict(USER_EXISTS.into()));
    }

    let hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .context("join password hashing")??;

    match User::insert_if_absent(&state.pool, &username, &hash)
        .await
        .context("signup insert")?
    {
        Some(user) => {
            tracing::info!(username = %user.username, user_id = user.model.id, "signup success");
            Ok(ok())
        }
        None => Err(ApiError::Conflict(USER_EXISTS.into())),
    }
}

/// `GET /api/v1/me`
pub async fn me(jar: PrivateCookieJar) -> ApiResult<Json<Value>> {
    let username = SessionData::load(&jar)
        .username
        .ok_or(ApiError::Unauthenticated)?;
    Ok(Json(json!({ "status": "ok", "username": username })))
}

/// `POST /api/v1/logout`
pub async fn logout(jar: PrivateCookieJar) -> (PrivateCookieJar, Json<Value>) {
    (SessionData::clear(jar), ok())
}
