use crate::auth::password::hash_password;
use crate::core::error::ApiError;
use crate::core::state::AppState;
use crate::models::id::DocId;
use crate::models::user::User;
use crate::wal::wal::WalOperation;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Deserialize)]
pub struct NewUser {
    pub username: Option<String>,
    pub name: Option<String>,
    pub password: Option<String>,
}

/// Note summary embedded in user listings.
#[derive(Debug, Serialize)]
pub struct NoteSummary {
    pub id: DocId,
    pub content: String,
    pub important: bool,
}

/// User with owned notes populated.
#[derive(Debug, Serialize)]
pub struct PopulatedUser {
    pub id: DocId,
    pub username: String,
    pub name: String,
    pub notes: Vec<NoteSummary>,
}

/// Register a new user
///
/// POST /api/users
pub async fn register_user(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewUser>,
) -> Result<Response, ApiError> {
    let username = match payload.username {
        Some(username) if username.len() >= 3 => username,
        _ => {
            return Err(ApiError::Validation(
                "username must be at least 3 characters".to_string(),
            ))
        }
    };

    let password = match payload.password {
        Some(password) if password.len() >= 3 => password,
        _ => {
            return Err(ApiError::Validation(
                "password must be at least 3 characters".to_string(),
            ))
        }
    };

    if state.user_store.get_by_username(&username).is_some() {
        return Err(ApiError::Validation("username must be unique".to_string()));
    }

    let password_hash = hash_password(&password)?;
    let user = User::new(username, payload.name.unwrap_or_default(), password_hash);

    state.user_store.insert(user.clone());

    if let Err(e) = state.wal.log_operation(WalOperation::PutUser {
        id: user.id,
        username: user.username.clone(),
        name: user.name.clone(),
        password_hash: user.password_hash.clone(),
    }) {
        warn!(error = %e, "Failed to log user create to WAL");
        // Continue anyway - store is updated
    }

    info!(user_id = %user.id, username = %user.username, "User registered");

    Ok((StatusCode::CREATED, Json(user)).into_response())
}

/// List all users with their notes populated
///
/// GET /api/users
pub async fn list_users(State(state): State<Arc<AppState>>) -> Json<Vec<PopulatedUser>> {
    let users = state
        .user_store
        .all()
        .into_iter()
        .map(|user| {
            let notes = user
                .notes
                .iter()
                .filter_map(|note_id| state.note_store.get(*note_id))
                .map(|note| NoteSummary {
                    id: note.id,
                    content: note.content,
                    important: note.important,
                })
                .collect();

            PopulatedUser {
                id: user.id,
                username: user.username,
                name: user.name,
                notes,
            }
        })
        .collect();

    Json(users)
}
