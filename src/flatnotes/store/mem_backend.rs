use super::StorageBackend;
use crate::error::{NoteError, Result};
use crate::model::{Key, NoteMetadata};
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::PathBuf;

/// In-memory storage backend for testing.
///
/// Uses `RefCell` for interior mutability since the note engine is single-threaded.
/// Individual keys can be "locked" to simulate an external process holding a file,
/// which makes any write, rename or delete touching that key fail with an I/O error.
#[derive(Default)]
pub struct MemBackend {
    notes: RefCell<BTreeMap<Key, String>>,
    metadata: RefCell<BTreeMap<Key, NoteMetadata>>,
    locked: RefCell<BTreeSet<Key>>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a backend pre-populated with `(key, content)` pairs.
    pub fn with_notes<'a>(notes: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let backend = Self::new();
        for (key, content) in notes {
            backend
                .notes
                .borrow_mut()
                .insert(Key::from(key), content.to_string());
        }
        backend
    }

    /// Make every mutation touching `key` fail until [`unlock`](Self::unlock).
    pub fn lock(&self, key: &Key) {
        self.locked.borrow_mut().insert(key.clone());
    }

    pub fn unlock(&self, key: &Key) {
        self.locked.borrow_mut().remove(key);
    }

    /// Sorted snapshot of all note keys.
    pub fn keys(&self) -> Vec<String> {
        self.notes.borrow().keys().map(|k| k.to_string()).collect()
    }

    fn check_lock(&self, key: &Key) -> Result<()> {
        if self.locked.borrow().contains(key) {
            return Err(NoteError::Io(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("{} is locked", key),
            )));
        }
        Ok(())
    }
}

impl StorageBackend for MemBackend {
    fn list_keys(&self) -> Result<Vec<Key>> {
        Ok(self.notes.borrow().keys().cloned().collect())
    }

    fn exists(&self, key: &Key) -> Result<bool> {
        Ok(self.notes.borrow().contains_key(key))
    }

    fn read(&self, key: &Key) -> Result<String> {
        self.notes
            .borrow()
            .get(key)
            .cloned()
            .ok_or_else(|| NoteError::NotFound(key.to_string()))
    }

    fn write(&self, key: &Key, content: &str) -> Result<()> {
        self.check_lock(key)?;
        self.notes
            .borrow_mut()
            .insert(key.clone(), content.to_string());
        Ok(())
    }

    fn delete(&self, key: &Key) -> Result<()> {
        self.check_lock(key)?;
        if self.notes.borrow_mut().remove(key).is_none() {
            return Err(NoteError::NotFound(key.to_string()));
        }
        self.metadata.borrow_mut().remove(key);
        Ok(())
    }

    fn rename(&self, old: &Key, new: &Key) -> Result<()> {
        self.check_lock(old)?;
        self.check_lock(new)?;
        let mut notes = self.notes.borrow_mut();
        if !notes.contains_key(old) {
            return Err(NoteError::NotFound(old.to_string()));
        }
        if notes.contains_key(new) {
            return Err(NoteError::NameConflict(new.to_string()));
        }
        if let Some(content) = notes.remove(old) {
            notes.insert(new.clone(), content);
        }
        let mut metadata = self.metadata.borrow_mut();
        if let Some(meta) = metadata.remove(old) {
            metadata.insert(new.clone(), meta);
        }
        Ok(())
    }

    fn read_metadata(&self, key: &Key) -> Result<Option<NoteMetadata>> {
        Ok(self.metadata.borrow().get(key).cloned())
    }

    fn write_metadata(&self, key: &Key, metadata: &NoteMetadata) -> Result<()> {
        self.check_lock(key)?;
        self.metadata
            .borrow_mut()
            .insert(key.clone(), metadata.clone());
        Ok(())
    }

    fn list_metadata_keys(&self) -> Result<Vec<Key>> {
        Ok(self.metadata.borrow().keys().cloned().collect())
    }

    fn delete_metadata(&self, key: &Key) -> Result<()> {
        self.metadata.borrow_mut().remove(key);
        Ok(())
    }

    fn note_path(&self, key: &Key) -> PathBuf {
        PathBuf::from(format!("memory://{}", key))
    }
}
