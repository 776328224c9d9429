//! Stored-file metadata. Only persistence exists for now; no route exposes it.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

use super::Model;

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct File {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub model: Model,
    pub name: String,
    pub path: String,
    pub size: i64,
}

impl File {
    pub async fn create(
        pool: &SqlitePool,
        name: &str,
        path: &str,
        size: i64,
    ) -> Result<File, sqlx::Error> {
        sqlx::query_as(
            "INSERT INTO files (created_at, updated_at, name, path, size)
             VALUES (?1, ?1, ?2, ?3, ?4)
             RETURNING *",
        )
        .bind(Utc::now())
        .bind(name)
        .bind(path)
        .bind(size)
        .fetch_one(pool)
        .await
    }

    /// Live (non-deleted) files, oldest first.
    pub async fn list(pool: &SqlitePool) -> Result<Vec<File>, sqlx::Error> {
        sqlx::query_as("SELECT * FROM files WHERE deleted_at IS NULL ORDER BY id")
            .fetch_all(pool)
            .await
    }

    /// Mark a file deleted without removing its row.
    pub async fn soft_delete(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
        let now = Utc::now();
        let result = sqlx::query(
            "UPDATE files SET deleted_at = ?1, updated_at = ?1 WHERE id = ?2 AND deleted_at IS NULL",
        )
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }
}
