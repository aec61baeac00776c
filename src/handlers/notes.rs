use crate::auth::identity::AuthenticatedUser;
use crate::core::error::ApiError;
use crate::core::state::AppState;
use crate::models::id::DocId;
use crate::models::note::Note;
use crate::wal::wal::WalOperation;
use anyhow::anyhow;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Request body for creating and updating notes.
#[derive(Debug, Deserialize)]
pub struct NotePayload {
    pub content: Option<String>,
    pub important: Option<bool>,
}

/// Owner summary embedded in read responses.
#[derive(Debug, Serialize)]
pub struct OwnerSummary {
    pub username: String,
    pub name: String,
}

/// Note with its owner populated.
#[derive(Debug, Serialize)]
pub struct PopulatedNote {
    pub id: DocId,
    pub content: String,
    pub important: bool,
    pub user: OwnerSummary,
}

fn populate(state: &AppState, note: Note) -> Option<PopulatedNote> {
    let owner = state.user_store.get(note.user)?;

    Some(PopulatedNote {
        id: note.id,
        content: note.content,
        important: note.important,
        user: OwnerSummary {
            username: owner.username,
            name: owner.name,
        },
    })
}

fn parse_id(id: &str) -> Result<DocId, ApiError> {
    DocId::parse(id).map_err(|_| ApiError::MalformedId)
}

/// List all notes with owners populated
///
/// GET /api/notes
pub async fn list_notes(State(state): State<Arc<AppState>>) -> Json<Vec<PopulatedNote>> {
    let notes = state
        .note_store
        .all()
        .into_iter()
        .filter_map(|note| {
            let id = note.id;
            let populated = populate(&state, note);
            if populated.is_none() {
                warn!(note_id = %id, "Note owner missing from user store, skipping");
            }
            populated
        })
        .collect();

    Json(notes)
}

/// Get a single note with its owner populated
///
/// GET /api/notes/{id}
pub async fn get_note(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<PopulatedNote>, ApiError> {
    let id = parse_id(&id)?;

    let note = state.note_store.get(id).ok_or(ApiError::NotFound)?;

    let populated = populate(&state, note)
        .ok_or_else(|| anyhow!("Note {} references a missing owner", id))?;

    Ok(Json(populated))
}

/// Create a note owned by the authenticated caller
///
/// POST /api/notes
#[instrument(skip(state, payload), fields(username = %identity.username))]
pub async fn create_note(
    State(state): State<Arc<AppState>>,
    identity: AuthenticatedUser,
    Json(payload): Json<NotePayload>,
) -> Result<Response, ApiError> {
    let content = match payload.content {
        Some(content) if !content.is_empty() => content,
        _ => return Err(ApiError::Validation("content missing".to_string())),
    };

    let important = payload.important.unwrap_or(false);

    let note = Note::new(content, important, identity.id);

    state.note_store.insert(note.clone());
    state.user_store.append_note(identity.id, note.id);

    if let Err(e) = state.wal.log_operation(WalOperation::PutNote {
        id: note.id,
        content: note.content.clone(),
        important: note.important,
        user: note.user,
    }) {
        warn!(error = %e, "Failed to log note create to WAL");
        // Continue anyway - store is updated
    }

    if let Err(e) = state.wal.log_operation(WalOperation::LinkNote {
        user: identity.id,
        note: note.id,
    }) {
        warn!(error = %e, "Failed to log note link to WAL");
    }

    info!(note_id = %note.id, "Note created");

    Ok((StatusCode::CREATED, Json(note)).into_response())
}

/// Replace a note's content/important flag, owner only
///
/// PUT /api/notes/{id}
pub async fn update_note(
    State(state): State<Arc<AppState>>,
    identity: AuthenticatedUser,
    Path(id): Path<String>,
    Json(payload): Json<NotePayload>,
) -> Result<Json<Note>, ApiError> {
    let id = parse_id(&id)?;

    let mut note = state.note_store.get(id).ok_or(ApiError::NotFound)?;

    if note.user != identity.id {
        warn!(note_id = %id, username = %identity.username, "Rejected update by non-owner");
        return Err(ApiError::Unauthorized);
    }

    if let Some(content) = payload.content {
        if content.is_empty() {
            return Err(ApiError::Validation("content missing".to_string()));
        }
        note.content = content;
    }

    if let Some(important) = payload.important {
        note.important = important;
    }

    state.note_store.insert(note.clone());

    if let Err(e) = state.wal.log_operation(WalOperation::PutNote {
        id: note.id,
        content: note.content.clone(),
        important: note.important,
        user: note.user,
    }) {
        warn!(error = %e, "Failed to log note update to WAL");
    }

    info!(note_id = %note.id, "Note updated");

    Ok(Json(note))
}

/// Delete a note, owner only
///
/// DELETE /api/notes/{id}
pub async fn delete_note(
    State(state): State<Arc<AppState>>,
    identity: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;

    let note = state.note_store.get(id).ok_or(ApiError::NotFound)?;

    if note.user != identity.id {
        warn!(note_id = %id, username = %identity.username, "Rejected delete by non-owner");
        return Err(ApiError::Unauthorized);
    }

    state.note_store.remove(id);

    if let Err(e) = state.wal.log_operation(WalOperation::RemoveNote { id }) {
        warn!(error = %e, "Failed to log note remove to WAL");
    }

    info!(note_id = %id, "Note deleted");

    Ok(StatusCode::NO_CONTENT)
}
