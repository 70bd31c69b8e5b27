//! # Storage Layer
//!
//! The backing store is a single flat directory. There is no index file: the
//! folder hierarchy is rebuilt from a directory listing every time it is needed.
//!
//! ## Storage Layout
//!
//! ```text
//! <root>/
//! ├── config.json                 # NotesConfig (see config.rs)
//! └── notes/
//!     ├── Study_Java_Generics.md  # note content, key = "Study_Java_Generics"
//!     ├── Study_Java_Generics.json# optional sidecar metadata
//!     └── Inbox.md                # root-level note
//! ```
//!
//! ## Failure Model
//!
//! The directory is shared with the OS, editors and sync tools. Every call treats
//! "target already exists" ([`NameConflict`](crate::error::NoteError::NameConflict))
//! and "source vanished" ([`NotFound`](crate::error::NoteError::NotFound)) as
//! ordinary errors. Multi-file operations are built from single calls by the
//! command layer; the store itself offers no transactions.
//!
//! ## Implementations
//!
//! - [`fs_backend::FsBackend`]: production, one file per note plus sidecar.
//! - [`mem_backend::MemBackend`]: in-memory, with failure injection for tests.

use crate::error::Result;
use crate::model::{Key, NoteMetadata};
use std::path::PathBuf;

pub mod fs_backend;
pub mod mem_backend;

/// Raw storage I/O for notes and their sidecars.
///
/// All methods take `&self`; implementations use interior mutability where needed.
pub trait StorageBackend {
    /// Every note key currently present, in no particular order.
    fn list_keys(&self) -> Result<Vec<Key>>;

    fn exists(&self, key: &Key) -> Result<bool>;

    /// Read note content. `NotFound` if there is no such note.
    fn read(&self, key: &Key) -> Result<String>;

    /// Create or overwrite note content.
    fn write(&self, key: &Key, content: &str) -> Result<()>;

    /// Remove a note and its sidecar. `NotFound` if there is no such note.
    fn delete(&self, key: &Key) -> Result<()>;

    /// Move a note and its sidecar from `old` to `new`.
    ///
    /// `NotFound` if `old` is missing, `NameConflict` if `new` exists.
    fn rename(&self, old: &Key, new: &Key) -> Result<()>;

    /// Sidecar metadata, `None` when the note has no sidecar.
    fn read_metadata(&self, key: &Key) -> Result<Option<NoteMetadata>>;

    fn write_metadata(&self, key: &Key, metadata: &NoteMetadata) -> Result<()>;

    /// Keys of every sidecar present, whether or not its note exists.
    fn list_metadata_keys(&self) -> Result<Vec<Key>>;

    fn delete_metadata(&self, key: &Key) -> Result<()>;

    /// Location of the note's content. Real for `FsBackend`, virtual otherwise.
    fn note_path(&self, key: &Key) -> PathBuf;
}
