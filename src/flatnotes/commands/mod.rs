//! # Commands
//!
//! Business logic for every note operation. Each submodule exposes plain functions
//! generic over [`StorageBackend`](crate::store::StorageBackend) that take the
//! session by `&mut` when they can change which note is open, and return either a
//! domain value or a [`CmdResult`] for the facade to hand to a UI.
//!
//! Commands never print. User-facing text goes into [`CmdResult::messages`].

use crate::config::NotesConfig;
use crate::error::CascadeReport;
use crate::model::{Key, Note, NoteMetadata};
use crate::namespace::Tree;
use std::path::PathBuf;

pub mod config;
pub mod create;
pub mod delete;
pub mod doctor;
pub mod import;
pub mod list;
pub mod metadata;
pub mod rename;
pub mod save;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    /// Keys created, written or deleted.
    pub affected_keys: Vec<Key>,
    /// `(old, new)` pairs for every rename performed.
    pub renamed: Vec<(Key, Key)>,
    pub tree: Option<Tree>,
    pub notes: Vec<Note>,
    pub metadata: Vec<(Key, NoteMetadata)>,
    pub note_paths: Vec<PathBuf>,
    pub config: Option<NotesConfig>,
    pub report: Option<CascadeReport>,
    /// The open note's key once the command finished.
    pub current: Option<Key>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_affected_keys(mut self, keys: Vec<Key>) -> Self {
        self.affected_keys = keys;
        self
    }

    pub fn with_tree(mut self, tree: Tree) -> Self {
        self.tree = Some(tree);
        self
    }

    pub fn with_notes(mut self, notes: Vec<Note>) -> Self {
        self.notes = notes;
        self
    }

    pub fn with_note_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.note_paths = paths;
        self
    }

    pub fn with_config(mut self, config: NotesConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_report(mut self, report: CascadeReport) -> Self {
        self.report = Some(report);
        self
    }

    pub fn with_current(mut self, current: Option<Key>) -> Self {
        self.current = current;
        self
    }
}
