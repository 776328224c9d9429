//! # User model
//!
//! [`User`] is the full row of the `users` table: audit columns, the unique
//! `username`, the Argon2 `password` hash (never serialized) and the optional
//! profile fields `name` and `email`.
//!
//! Users are created by [`User::insert_if_absent`] and read by
//! [`User::find_by_username`]; nothing in the server updates them afterwards.

use chrono::Utc;
use serde::Serialize;
use sqlx::{FromRow, SqlitePool};

use super::Model;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub model: Model,
    pub username: String,
    #[serde(skip)]
    pub password: String,
    pub name: Option<String>,
    pub email: Option<String>,
}

impl User {
    pub async fn find_by_username(
        pool: &SqlitePool,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as("SELECT * FROM users WHERE username = ?1 AND deleted_at IS NULL LIMIT 1")
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// Insert a new user unless a live user with the same name exists.
    ///
    /// Returns `Ok(None)` when the username is taken. The existence check and
    /// the insert are a single statement inside one transaction, and the unique
    /// index on `users.username` rejects whatever a concurrent writer slips in,
    /// so at most one caller wins for a given username.
    pub async fn insert_if_absent(
        pool: &SqlitePool,
        username: &str,
        password_hash: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let inserted: Result<Option<User>, sqlx::Error> = sqlx::query_as(
            "INSERT INTO users (created_at, updated_at, username, password)
             SELECT ?1, ?1, ?2, ?3
             WHERE NOT EXISTS (
                 SELECT 1 FROM users WHERE username = ?2 AND deleted_at IS NULL
             )
             RETURNING *",
        )
        .bind(Utc::now())
        .bind(username)
        .bind(password_hash)
        .fetch_optional(&mut *tx)
        .await;

        match inserted {
            Ok(Some(user)) => {
                tx.commit().await?;
                Ok(Some(user))
            }
            Ok(None) => Ok(None),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn count_by_username(pool: &SqlitePool, username: &str) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM users WHERE username = ?1 AND deleted_at IS NULL",
        )
        .bind(username)
        .fetch_one(pool)
        .await?;
        Ok(count)
    }
}
