use crate::commands::CmdResult;
use crate::error::{NoteError, Result};
use crate::model::{Key, Note};
use crate::namespace::Tree;
use crate::session::Session;
use crate::store::StorageBackend;

/// The folder tree, or a flat search tree when `query` is non-blank.
pub fn tree<B: StorageBackend>(
    backend: &B,
    session: &mut Session,
    query: Option<&str>,
) -> Result<CmdResult> {
    let keys = backend.list_keys()?;
    session.prune_folders(&keys);

    let tree = match query.map(str::trim).filter(|q| !q.is_empty()) {
        Some(q) => Tree::search(&keys, q),
        None => Tree::build_with_folders(&keys, session.empty_folders()),
    };
    Ok(CmdResult::default()
        .with_tree(tree)
        .with_current(session.current().cloned()))
}

/// Load a note into the session as the open note.
pub fn open<B: StorageBackend>(backend: &B, session: &mut Session, key: &Key) -> Result<CmdResult> {
    let content = backend.read(key)?;
    session.open(key.clone(), content.clone());
    Ok(CmdResult::default()
        .with_notes(vec![Note {
            key: key.clone(),
            content,
        }])
        .with_current(Some(key.clone())))
}

pub fn paths<B: StorageBackend>(backend: &B, keys: &[Key]) -> Result<CmdResult> {
    let mut paths = Vec::with_capacity(keys.len());
    for key in keys {
        if !backend.exists(key)? {
            return Err(NoteError::NotFound(key.to_string()));
        }
        paths.push(backend.note_path(key));
    }
    Ok(CmdResult::default().with_note_paths(paths))
}
