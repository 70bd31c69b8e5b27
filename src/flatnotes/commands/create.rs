use crate::codec;
use crate::commands::{CmdMessage, CmdResult};
use crate::config::NotesConfig;
use crate::error::Result;
use crate::model::{Note, NoteMetadata};
use crate::session::Session;
use crate::store::StorageBackend;
use crate::title;
use crate::unique;
use chrono::Local;
use tracing::{debug, warn};

/// Create a note in `categories` and open it.
///
/// The name is `desired` (or the configured default) made unique; the content
/// starts as a level-1 heading carrying that name.
pub fn note<B: StorageBackend>(
    backend: &B,
    session: &mut Session,
    config: &NotesConfig,
    categories: &[String],
    desired: Option<&str>,
) -> Result<CmdResult> {
    let key = unique::unique_note_key(backend, categories, desired, &config.default_note_name)?;
    let name = codec::decode(&key).name;
    let content = title::heading_line(&name);

    backend.write(&key, &content)?;
    debug!(%key, "note created");

    let meta = NoteMetadata::created_on(Local::now().date_naive());
    if let Err(e) = backend.write_metadata(&key, &meta) {
        warn!(%key, error = %e, "could not write sidecar for new note");
    }

    session.open(key.clone(), content.clone());
    session.prune_folders(std::slice::from_ref(&key));

    let mut result = CmdResult::default()
        .with_affected_keys(vec![key.clone()])
        .with_notes(vec![Note {
            key: key.clone(),
            content,
        }])
        .with_current(Some(key.clone()));
    result.add_message(CmdMessage::success(format!("Created {}", key)));
    Ok(result)
}

/// Create an empty folder under `parent`, held in the session until a note lands in it.
pub fn folder<B: StorageBackend>(
    backend: &B,
    session: &mut Session,
    config: &NotesConfig,
    parent: &[String],
    desired: Option<&str>,
) -> Result<CmdResult> {
    let name = unique::unique_category_name(
        backend,
        session,
        parent,
        desired,
        &config.default_folder_name,
    )?;
    let mut path = parent.to_vec();
    path.push(name);
    debug!(folder = %path.join("/"), "folder created in memory");

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("Created folder {}", path.join("/"))));
    session.add_folder(path);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NoteError;
    use crate::model::Key;
    use crate::namespace::Tree;
    use crate::store::mem_backend::MemBackend;

    fn path(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_create_note_writes_heading_and_opens() {
        let backend = MemBackend::new();
        let mut session = Session::new();
        let config = NotesConfig::default();

        let res = note(&backend, &mut session, &config, &path(&["Study"]), Some("Rust")).unwrap();
        let key = Key::from("Study_Rust");
        assert_eq!(res.current, Some(key.clone()));
        assert_eq!(backend.read(&key).unwrap(), "# Rust");
        assert_eq!(session.buffer(), Some("# Rust"));
        let meta = backend.read_metadata(&key).unwrap().unwrap();
        assert!(meta.create_date.is_some());
    }

    #[test]
    fn test_create_note_rejects_path_like_names() {
        let backend = MemBackend::new();
        let mut session = Session::new();
        let config = NotesConfig::default();

        for name in ["../escaped", "..", "a\\b", "c:d"] {
            let err = note(&backend, &mut session, &config, &[], Some(name)).unwrap_err();
            assert!(matches!(err, NoteError::InvalidName(_)), "{}", name);
        }
        let err = note(&backend, &mut session, &config, &path(&[".."]), Some("x")).unwrap_err();
        assert!(matches!(err, NoteError::InvalidName(_)));
        assert!(backend.keys().is_empty());
    }

    #[test]
    fn test_create_note_heading_reads_back_as_name() {
        let backend = MemBackend::new();
        let mut session = Session::new();
        let config = NotesConfig::default();

        note(&backend, &mut session, &config, &[], Some("C# [draft]")).unwrap();
        let content = backend.read(&Key::from("C# [draft]")).unwrap();
        assert_eq!(crate::title::extract_title(&content).as_deref(), Some("C# [draft]"));
    }

    #[test]
    fn test_create_note_uniquifies_default_name() {
        let backend = MemBackend::with_notes([("New Note", "")]);
        let mut session = Session::new();
        let config = NotesConfig::default();

        note(&backend, &mut session, &config, &[], None).unwrap();
        assert_eq!(backend.read(&Key::from("New Note1")).unwrap(), "# New Note1");
    }

    #[test]
    fn test_folder_then_note_populates_it() {
        let backend = MemBackend::new();
        let mut session = Session::new();
        let config = NotesConfig::default();

        folder(&backend, &mut session, &config, &[], None).unwrap();
        folder(&backend, &mut session, &config, &[], None).unwrap();
        assert!(session.has_folder(&path(&["New Folder"])));
        assert!(session.has_folder(&path(&["New Folder1"])));

        let keys = backend.list_keys().unwrap();
        let tree = Tree::build_with_folders(&keys, session.empty_folders());
        assert!(tree.contains_category(&path(&["New Folder1"])));

        note(&backend, &mut session, &config, &path(&["New Folder"]), None).unwrap();
        assert!(!session.has_folder(&path(&["New Folder"])));
        assert_eq!(backend.keys(), vec!["New Folder_New Note"]);
    }
}
