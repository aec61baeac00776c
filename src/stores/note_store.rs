use crate::models::id::DocId;
use crate::models::note::Note;
use dashmap::DashMap;

/// In-memory collection of notes, keyed by id.
pub struct NoteStore {
    notes: DashMap<DocId, Note>,
}

impl NoteStore {
    pub fn new() -> Self {
        Self {
            notes: DashMap::new(),
        }
    }

    /// Insert a note, replacing any existing note with the same id.
    pub fn insert(&self, note: Note) {
        self.notes.insert(note.id, note);
    }

    /// Get a note by id.
    /// Returns a clone of the note if found.
    pub fn get(&self, id: DocId) -> Option<Note> {
        self.notes.get(&id).map(|entry| entry.value().clone())
    }

    /// Remove a note by id.
    /// Returns the removed note if it existed.
    pub fn remove(&self, id: DocId) -> Option<Note> {
        self.notes.remove(&id).map(|(_, note)| note)
    }

    pub fn all(&self) -> Vec<Note> {
        self.notes.iter().map(|entry| entry.value().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn clear(&self) {
        self.notes.clear();
    }
}

impl Default for NoteStore {
    fn default() -> Self {
        Self::new()
    }
}
