use crate::models::id::DocId;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Note {
    pub id: DocId,
    pub content: String,
    pub important: bool,
    /// Owning user. Must resolve to an existing user in the store.
    pub user: DocId,
}

impl Note {
    pub fn new(content: String, important: bool, user: DocId) -> Self {
        Self {
            id: DocId::generate(),
            content,
            important,
            user,
        }
    }
}
