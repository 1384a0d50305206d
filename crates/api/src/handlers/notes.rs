//! Handlers for the `/notes` resource.
//!
//! Every operation resolves the caller through [`AuthUser`] and scopes the
//! query by the caller's id, so a note under a different owner answers 404
//! exactly like a missing one.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use notable_core::error::CoreError;
use notable_core::notes::{validate_description, validate_title};
use notable_core::types::DbId;
use notable_db::models::note::{CreateNote, Note, UpdateNote};
use notable_db::repositories::NoteRepo;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// `{ notes }` envelope for the dashboard listing.
#[derive(Debug, Serialize)]
pub struct NotesResponse {
    pub notes: Vec<Note>,
}

/// `{ note }` envelope for single-note reads and creation.
#[derive(Debug, Serialize)]
pub struct NoteResponse {
    pub note: Note,
}

/// `{ note, message }` envelope for updates.
#[derive(Debug, Serialize)]
pub struct NoteWithMessage {
    pub note: Note,
    pub message: String,
}

/// `{ message }` confirmation for deletes.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/notes
///
/// List the caller's notes, newest first.
pub async fn list_notes(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<NotesResponse>> {
    let notes = NoteRepo::list_for_user(&state.pool, auth.user_id).await?;
    Ok(Json(NotesResponse { notes }))
}

/// GET /api/notes/{id}
///
/// Get a single note owned by the caller.
pub async fn get_note(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<NoteResponse>> {
    let note = NoteRepo::find_for_user(&state.pool, id, auth.user_id)
        .await?
        .ok_or_else(not_found)?;

    Ok(Json(NoteResponse { note }))
}

/// POST /api/notes
///
/// Create a note owned by the caller.
pub async fn create_note(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateNote>,
) -> AppResult<impl IntoResponse> {
    validate_title(&input.title).map_err(AppError::BadRequest)?;
    validate_description(&input.description).map_err(AppError::BadRequest)?;

    let note = NoteRepo::create(&state.pool, auth.user_id, &input).await?;

    tracing::info!(user_id = auth.user_id, note_id = note.id, "Note created");

    Ok((StatusCode::CREATED, Json(NoteResponse { note })))
}

/// PUT /api/notes/{id}
///
/// Replace a note's title and description, scoped to the caller.
pub async fn update_note(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateNote>,
) -> AppResult<Json<NoteWithMessage>> {
    validate_title(&input.title).map_err(AppError::BadRequest)?;
    validate_description(&input.description).map_err(AppError::BadRequest)?;

    let note = NoteRepo::update_for_user(&state.pool, id, auth.user_id, &input)
        .await?
        .ok_or_else(not_found)?;

    tracing::info!(user_id = auth.user_id, note_id = note.id, "Note updated");

    Ok(Json(NoteWithMessage {
        note,
        message: "Note updated successfully".to_string(),
    }))
}

/// DELETE /api/notes/{id}
///
/// Delete a note, scoped to the caller.
pub async fn delete_note(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<MessageResponse>> {
    let deleted = NoteRepo::delete_for_user(&state.pool, id, auth.user_id).await?;
    if !deleted {
        return Err(not_found());
    }

    tracing::info!(user_id = auth.user_id, note_id = id, "Note deleted");

    Ok(Json(MessageResponse {
        message: "Note deleted successfully".to_string(),
    }))
}

/// The uniform miss: wrong id and someone else's note look identical.
fn not_found() -> AppError {
    AppError::Core(CoreError::NotFound("Note not found".into()))
}
