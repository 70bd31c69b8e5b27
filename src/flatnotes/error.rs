use crate::model::Key;
use std::fmt;
use thiserror::Error;

/// Outcome of a multi-file operation (category rename, move or recursive delete).
///
/// Each entry is an independent filesystem call, so a cascade can stop halfway.
/// `succeeded` lists what was applied, `failed` what was not, with the reason.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CascadeReport {
    pub succeeded: Vec<(Key, Option<Key>)>,
    pub failed: Vec<(Key, Option<Key>, String)>,
}

impl CascadeReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }
}

impl fmt::Display for CascadeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} of {} applied", self.succeeded.len(), self.total())?;
        for (from, to, reason) in &self.failed {
            match to {
                Some(to) => write!(f, "; {} -> {} failed: {}", from, to, reason)?,
                None => write!(f, "; {} failed: {}", from, reason)?,
            }
        }
        Ok(())
    }
}

#[derive(Error, Debug)]
pub enum NoteError {
    #[error("Invalid name: {0}")]
    InvalidName(String),

    #[error("Name already exists: {0}")]
    NameConflict(String),

    #[error("Note not found: {0}")]
    NotFound(String),

    #[error("Cascade incomplete: {0}")]
    PartialCascadeFailure(CascadeReport),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Api Error: {0}")]
    Api(String),
}

impl NoteError {
    /// Errors raised before any filesystem mutation took place.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, NoteError::InvalidName(_) | NoteError::NameConflict(_))
    }
}

pub type Result<T> = std::result::Result<T, NoteError>;
