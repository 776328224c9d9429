use anyhow::Context as _;
use axum::{body::Bytes, extract::State, Json};
use serde_json::{json, Value};

use crate::error::{ApiError, ApiResult};
use crate::models::{QuickNote, QuickNoteInput};
use crate::state::AppState;

/// `POST /api/v1/quick-note/update`
///
/// The body is decoded as JSON whatever its content type. A body that does not
/// decode is an internal error; a decoded note missing a field is a 400.
pub async fn update(State(state): State<AppState>, body: Bytes) -> ApiResult<Json<Value>> {
    let input: QuickNoteInput =
        serde_json::from_slice(&body).context("Json decode quick note error")?;
    input
        .validate()
        .map_err(|msg| ApiError::BadRequest(msg.into()))?;

    let note = QuickNote::upsert(&state.pool, &input)
        .await
        .context("save quick note")?;
    tracing::debug!(note_id = note.model.id, path = %note.path, "quick note saved");

    Ok(Json(json!({ "status": "ok", "note": note })))
}
