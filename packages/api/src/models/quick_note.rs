//! # Quick notes
//!
//! A quick note is a titled snippet addressed by `path`. The JSON form uses
//! `name` for the title, which is also what clients send.
//!
//! [`QuickNote::upsert`] creates the note for a path or overwrites the title
//! and content of the live note already stored there.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

use super::Model;

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct QuickNote {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub model: Model,
    #[serde(rename = "name")]
    pub title: String,
    pub path: String,
    pub content: String,
}

/// Client payload for creating or updating a quick note. Missing fields read
/// as empty strings and are caught by [`QuickNoteInput::validate`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct QuickNoteInput {
    #[serde(rename = "name", default)]
    pub title: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub content: String,
}

impl QuickNoteInput {
    /// Name of the first missing required field, if any.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.path.trim().is_empty() {
            return Err("Note path required");
        }
        if self.title.trim().is_empty() {
            return Err("Note name required");
        }
        if self.content.is_empty() {
            return Err("Note content required");
        }
        Ok(())
    }
}

impl QuickNote {
    pub async fn upsert(pool: &SqlitePool, input: &QuickNoteInput) -> Result<QuickNote, sqlx::Error> {
        sqlx::query_as(
            "INSERT INTO quick_notes (created_at, updated_at, title, path, content)
             VALUES (?1, ?1, ?2, ?3, ?4)
             ON CONFLICT (path) WHERE deleted_at IS NULL DO UPDATE SET
                title = excluded.title,
                content = excluded.content,
                updated_at = excluded.updated_at
             RETURNING *",
        )
        .bind(Utc::now())
        .bind(&input.title)
        .bind(&input.path)
        .bind(&input.content)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_path(pool: &SqlitePool, path: &str) -> Result<Option<QuickNote>, sqlx::Error> {
        sqlx::query_as("SELECT * FROM quick_notes WHERE path = ?1 AND deleted_at IS NULL")
            .bind(path)
            .fetch_optional(pool)
            .await
    }
}
