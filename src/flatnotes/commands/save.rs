//! # Title Synchronizer
//!
//! Keeps a note's first level-1 heading and its key's pure name in step, in both
//! directions.
//!
//! - **Content to key** ([`save`]): the heading is extracted and sanitized; if it
//!   differs from the pure name the note is renamed within its category before the
//!   content is written. A rename that fails (usually a name conflict) is logged and
//!   the content is saved under the old key anyway.
//! - **Key to content** ([`rename_note`]): after a leaf rename the first heading is
//!   rewritten to the new name, or one is inserted at the top. When the note is the
//!   open one, the session buffer is rewritten in place and that buffer is what gets
//!   persisted.
//!
//! Neither direction is atomic. The goal is that after any successful rename the
//! heading and the pure name agree up to sanitizing.

use crate::codec;
use crate::commands::rename::move_note;
use crate::commands::{CmdMessage, CmdResult};
use crate::config::NotesConfig;
use crate::error::{NoteError, Result};
use crate::model::{Key, Note};
use crate::session::Session;
use crate::store::StorageBackend;
use crate::title;
use tracing::{debug, warn};

/// Save `content` as the open note, following its heading to a new name.
pub fn save<B: StorageBackend>(
    backend: &B,
    session: &mut Session,
    config: &NotesConfig,
    content: &str,
    mood: Option<&str>,
) -> Result<CmdResult> {
    let Some(mut key) = session.current().cloned() else {
        return Err(NoteError::Api("no note is open".to_string()));
    };
    let mut result = CmdResult::default();

    if let Some(name) = title::derive_name(content, config.title_max_len) {
        if name != codec::decode(&key).name {
            match move_note(backend, session, &key, None, Some(&name)) {
                Ok(new) => {
                    result.add_message(CmdMessage::info(format!("Renamed {} -> {}", key, new)));
                    result.renamed.push((key.clone(), new.clone()));
                    key = new;
                }
                Err(e) if e.is_recoverable() => {
                    warn!(%key, %name, error = %e, "kept old name on save");
                    result.add_message(CmdMessage::warning(format!(
                        "Kept name {}: {}",
                        key, e
                    )));
                }
                Err(e) => return Err(e),
            }
        }
    }

    backend.write(&key, content)?;
    session.set_buffer(content.to_string());
    debug!(%key, "note saved");

    if let Some(mood) = mood.map(str::trim).filter(|m| !m.is_empty()) {
        let mut meta = backend.read_metadata(&key)?.unwrap_or_default();
        meta.last_mood = Some(mood.to_string());
        backend.write_metadata(&key, &meta)?;
    }

    result.add_message(CmdMessage::success(format!("Saved {}", key)));
    Ok(result
        .with_affected_keys(vec![key.clone()])
        .with_current(Some(key)))
}

/// Open `key` and save `content` to it in one step.
pub fn save_as<B: StorageBackend>(
    backend: &B,
    session: &mut Session,
    config: &NotesConfig,
    key: &Key,
    content: &str,
    mood: Option<&str>,
) -> Result<CmdResult> {
    if !session.is_current(key) {
        let existing = backend.read(key)?;
        session.open(key.clone(), existing);
    }
    save(backend, session, config, content, mood)
}

/// Rename a note's pure name and rewrite its heading to match.
pub fn rename_note<B: StorageBackend>(
    backend: &B,
    session: &mut Session,
    key: &Key,
    new_name: &str,
) -> Result<CmdResult> {
    let new_name = new_name.trim();
    let new = move_note(backend, session, key, None, Some(new_name))?;

    let content = match session.buffer() {
        Some(buffer) if session.is_current(&new) => buffer.to_string(),
        _ => backend.read(&new)?,
    };
    let rewritten = title::rewrite_h1(&content, new_name);
    backend.write(&new, &rewritten)?;
    if session.is_current(&new) {
        session.set_buffer(rewritten.clone());
    }

    let mut result = CmdResult::default()
        .with_affected_keys(vec![new.clone()])
        .with_notes(vec![Note {
            key: new.clone(),
            content: rewritten,
        }])
        .with_current(session.current().cloned());
    if &new != key {
        result.renamed.push((key.clone(), new.clone()));
    }
    result.add_message(CmdMessage::success(format!("Renamed {} -> {}", key, new)));
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::mem_backend::MemBackend;

    fn open(backend: &MemBackend, key: &str) -> Session {
        let mut session = Session::new();
        let key = Key::from(key);
        let content = backend.read(&key).unwrap();
        session.open(key, content);
        session
    }

    #[test]
    fn test_round_trip_save_then_rename() {
        let backend = MemBackend::with_notes([("Cat_OldName", "")]);
        let mut session = open(&backend, "Cat_OldName");
        let config = NotesConfig::default();

        let res = save(&backend, &mut session, &config, "# Hello\nbody", None).unwrap();
        assert_eq!(res.current, Some(Key::from("Cat_Hello")));
        assert_eq!(backend.keys(), vec!["Cat_Hello"]);

        rename_note(&backend, &mut session, &Key::from("Cat_Hello"), "World").unwrap();
        let content = backend.read(&Key::from("Cat_World")).unwrap();
        assert_eq!(content.lines().next(), Some("# World"));
        assert_eq!(content, "# World\nbody");
        assert_eq!(session.buffer(), Some("# World\nbody"));
        assert_eq!(session.current(), Some(&Key::from("Cat_World")));
    }

    #[test]
    fn test_save_after_rename_to_marked_up_name_keeps_key() {
        let backend = MemBackend::with_notes([("Cat_x", "# x\nbody")]);
        let mut session = open(&backend, "Cat_x");
        let config = NotesConfig::default();

        rename_note(&backend, &mut session, &Key::from("Cat_x"), "a `b` [c]").unwrap();
        let key = Key::from("Cat_a `b` [c]");
        let content = backend.read(&key).unwrap();

        let res = save(&backend, &mut session, &config, &content, None).unwrap();
        assert!(res.renamed.is_empty());
        assert_eq!(res.current, Some(key));
        assert_eq!(backend.keys(), vec!["Cat_a `b` [c]"]);
    }

    #[test]
    fn test_save_aborts_when_rename_hits_io_error() {
        let backend = MemBackend::with_notes([("A_Draft", "old")]);
        let mut session = open(&backend, "A_Draft");
        backend.lock(&Key::from("A_Draft"));

        let err = save(&backend, &mut session, &NotesConfig::default(), "# Fresh\nnew", None)
            .unwrap_err();
        assert!(matches!(err, NoteError::Io(_)));
        assert!(!err.is_recoverable());

        backend.unlock(&Key::from("A_Draft"));
        assert_eq!(backend.read(&Key::from("A_Draft")).unwrap(), "old");
        assert_eq!(session.current(), Some(&Key::from("A_Draft")));
    }

    #[test]
    fn test_save_without_open_note() {
        let backend = MemBackend::new();
        let mut session = Session::new();
        let err = save(&backend, &mut session, &NotesConfig::default(), "x", None).unwrap_err();
        assert!(matches!(err, NoteError::Api(_)));
    }

    #[test]
    fn test_save_conflict_keeps_old_key() {
        let backend = MemBackend::with_notes([("A_Draft", ""), ("A_Taken", "other")]);
        let mut session = open(&backend, "A_Draft");

        let config = NotesConfig::default();
        let res = save(&backend, &mut session, &config, "# Taken\nnew", None).unwrap();
        assert_eq!(res.current, Some(Key::from("A_Draft")));
        assert_eq!(backend.read(&Key::from("A_Draft")).unwrap(), "# Taken\nnew");
        assert_eq!(backend.read(&Key::from("A_Taken")).unwrap(), "other");
        assert!(res.renamed.is_empty());
    }

    #[test]
    fn test_save_sanitizes_heading() {
        let backend = MemBackend::with_notes([("Old", "")]);
        let mut session = open(&backend, "Old");
        save(
            &backend,
            &mut session,
            &NotesConfig::default(),
            "# what: is_this?\n",
            None,
        )
        .unwrap();
        assert_eq!(backend.keys(), vec!["what  is this"]);
    }

    #[test]
    fn test_save_without_heading_keeps_key() {
        let backend = MemBackend::with_notes([("Inbox", "")]);
        let mut session = open(&backend, "Inbox");
        save(&backend, &mut session, &NotesConfig::default(), "no heading", None).unwrap();
        assert_eq!(backend.keys(), vec!["Inbox"]);
    }

    #[test]
    fn test_save_records_mood() {
        let backend = MemBackend::with_notes([("Day", "# Day")]);
        let mut session = open(&backend, "Day");
        save(&backend, &mut session, &NotesConfig::default(), "# Day\n", Some("calm")).unwrap();
        let meta = backend.read_metadata(&Key::from("Day")).unwrap().unwrap();
        assert_eq!(meta.last_mood.as_deref(), Some("calm"));
    }

    #[test]
    fn test_rename_inserts_missing_heading() {
        let backend = MemBackend::with_notes([("A_x", "just text")]);
        let mut session = Session::new();
        rename_note(&backend, &mut session, &Key::from("A_x"), "Named").unwrap();
        assert_eq!(
            backend.read(&Key::from("A_Named")).unwrap(),
            "# Named\n\njust text"
        );
    }

    #[test]
    fn test_rename_uses_unsaved_buffer_of_open_note() {
        let backend = MemBackend::with_notes([("A_x", "# x\nsaved")]);
        let mut session = Session::new();
        session.open(Key::from("A_x"), "# x\nunsaved edit".into());

        rename_note(&backend, &mut session, &Key::from("A_x"), "y").unwrap();
        assert_eq!(session.buffer(), Some("# y\nunsaved edit"));
        assert_eq!(backend.read(&Key::from("A_y")).unwrap(), "# y\nunsaved edit");
    }

    #[test]
    fn test_save_as_opens_first() {
        let backend = MemBackend::with_notes([("Cat_Note", "# Note")]);
        let mut session = Session::new();
        let res = save_as(
            &backend,
            &mut session,
            &NotesConfig::default(),
            &Key::from("Cat_Note"),
            "# Better\n",
            None,
        )
        .unwrap();
        assert_eq!(res.current, Some(Key::from("Cat_Better")));
    }
}
