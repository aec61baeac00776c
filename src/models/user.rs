use crate::models::id::DocId;
use serde::Serialize;

#[derive(Clone, Debug, Serialize)]
pub struct User {
    pub id: DocId,
    pub username: String,
    pub name: String,
    /// Salted Argon2 hash. Never serialized.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Notes owned by this user, newest last.
    pub notes: Vec<DocId>,
}

impl User {
    pub fn new(username: String, name: String, password_hash: String) -> Self {
        Self {
            id: DocId::generate(),
            username,
            name,
            password_hash,
            notes: Vec::new(),
        }
    }
}
