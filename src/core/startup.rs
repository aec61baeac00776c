use crate::core::state::AppState;
use crate::models::note::Note;
use crate::models::user::User;
use crate::wal::wal::WalOperation;
use anyhow::Result;
use tracing::warn;

/// Rebuild the stores from replayed WAL operations. Runs at boot time,
/// before the server starts accepting requests.
pub fn apply_wal_operations(state: &AppState, operations: &[WalOperation]) -> Result<()> {
    for op in operations {
        match op {
            WalOperation::PutUser {
                id,
                username,
                name,
                password_hash,
            } => {
                let user = User {
                    id: *id,
                    username: username.clone(),
                    name: name.clone(),
                    password_hash: password_hash.clone(),
                    notes: Vec::new(),
                };
                state.user_store.insert(user);
            }
            WalOperation::PutNote {
                id,
                content,
                important,
                user,
            } => {
                let note = Note {
                    id: *id,
                    content: content.clone(),
                    important: *important,
                    user: *user,
                };
                state.note_store.insert(note);
            }
            WalOperation::RemoveNote { id } => {
                state.note_store.remove(*id);
            }
            WalOperation::LinkNote { user, note } => {
                // A dangling link means the PUT_USER record was lost; the
                // note itself is still replayed.
                if !state.user_store.append_note(*user, *note) {
                    warn!(user_id = %user, note_id = %note, "Link for unknown user, skipping");
                }
            }
        }
    }
    Ok(())
}
