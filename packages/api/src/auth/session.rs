//! Cookie-resident sessions.
//!
//! The whole session lives in one private cookie: its value is the JSON form
//! of [`SessionData`], encrypted and authenticated with the process key held in
//! [`crate::AppState`]. There is no server-side session table; a session is
//! valid exactly as long as the cookie decrypts and has not expired.

use axum_extra::extract::cookie::{Cookie, PrivateCookieJar, SameSite};
use serde::{Deserialize, Serialize};

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "zote-session";

const SESSION_MAX_AGE_DAYS: i64 = 30;

/// Session data carried by the cookie.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    pub username: Option<String>,
}

impl SessionData {
    pub fn for_user(username: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
        }
    }

    /// Load the session from the jar. Missing, undecryptable or malformed
    /// cookies all yield an empty session.
    pub fn load(jar: &PrivateCookieJar) -> Self {
        jar.get(SESSION_COOKIE)
            .and_then(|cookie| serde_json::from_str(cookie.value()).ok())
            .unwrap_or_default()
    }

    /// Store the session in the jar, replacing any previous one.
    pub fn save(&self, jar: PrivateCookieJar) -> Result<PrivateCookieJar, serde_json::Error> {
        let value = serde_json::to_string(self)?;
        let cookie = Cookie::build((SESSION_COOKIE, value))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .max_age(time::Duration::days(SESSION_MAX_AGE_DAYS));
        Ok(jar.add(cookie))
    }

    pub fn clear(jar: PrivateCookieJar) -> PrivateCookieJar {
        jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
    }
}
