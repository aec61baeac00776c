use crate::models::id::DocId;
use crate::models::user::User;
use dashmap::DashMap;

/// In-memory collection of users, keyed by id with a username index.
pub struct UserStore {
    users: DashMap<DocId, User>,
    by_username: DashMap<String, DocId>,
}

impl UserStore {
    pub fn new() -> Self {
        Self {
            users: DashMap::new(),
            by_username: DashMap::new(),
        }
    }

    /// Insert a user, replacing any existing user with the same id.
    pub fn insert(&self, user: User) {
        self.by_username.insert(user.username.clone(), user.id);
        self.users.insert(user.id, user);
    }

    /// Get a user by id.
    /// Returns a clone of the user if found.
    pub fn get(&self, id: DocId) -> Option<User> {
        self.users.get(&id).map(|entry| entry.value().clone())
    }

    pub fn get_by_username(&self, username: &str) -> Option<User> {
        let id = *self.by_username.get(username)?;
        self.get(id)
    }

    /// Append a note id to a user's owned-notes list.
    /// Returns false if the user does not exist.
    pub fn append_note(&self, user_id: DocId, note_id: DocId) -> bool {
        match self.users.get_mut(&user_id) {
            Some(mut entry) => {
                entry.notes.push(note_id);
                true
            }
            None => false,
        }
    }

    pub fn all(&self) -> Vec<User> {
        self.users.iter().map(|entry| entry.value().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn clear(&self) {
        self.users.clear();
        self.by_username.clear();
    }
}

impl Default for UserStore {
    fn default() -> Self {
        Self::new()
    }
}
