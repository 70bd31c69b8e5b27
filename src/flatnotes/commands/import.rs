use crate::codec;
use crate::commands::{CmdMessage, CmdResult};
use crate::config::NotesConfig;
use crate::error::{NoteError, Result};
use crate::model::{Key, NoteMetadata};
use crate::session::Session;
use crate::store::StorageBackend;
use crate::title;
use crate::unique;
use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Import text files as notes under `categories`.
///
/// Files are imported directly; directories contribute their immediate children
/// whose extension is listed in `import_extensions`.
pub fn run<B: StorageBackend>(
    backend: &B,
    session: &mut Session,
    config: &NotesConfig,
    paths: Vec<PathBuf>,
    categories: &[String],
) -> Result<CmdResult> {
    codec::validate_category_path(categories)?;
    let mut result = CmdResult::default();

    for path in paths {
        if path.is_dir() {
            let mut entries: Vec<PathBuf> = fs::read_dir(&path)
                .map_err(NoteError::Io)?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|p| p.is_file() && has_import_ext(p, &config.import_extensions))
                .collect();
            entries.sort();
            for sub_path in entries {
                import_one(backend, config, categories, &sub_path, &mut result);
            }
        } else if path.is_file() {
            import_one(backend, config, categories, &path, &mut result);
        } else {
            result.add_message(CmdMessage::warning(format!(
                "Path not found: {}",
                path.display()
            )));
        }
    }

    session.prune_folders(&result.affected_keys);
    result.add_message(CmdMessage::success(format!(
        "Total imported: {}",
        result.affected_keys.len()
    )));
    Ok(result)
}

fn has_import_ext(path: &Path, exts: &[String]) -> bool {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .is_some_and(|ext| exts.iter().any(|e| e.eq_ignore_ascii_case(&ext)))
}

fn import_one<B: StorageBackend>(
    backend: &B,
    config: &NotesConfig,
    categories: &[String],
    path: &Path,
    result: &mut CmdResult,
) {
    match import_file(backend, config, categories, path) {
        Ok(key) => {
            result.add_message(CmdMessage::info(format!(
                "Imported: {} -> {}",
                path.display(),
                key
            )));
            result.affected_keys.push(key);
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "import failed");
            result.add_message(CmdMessage::warning(format!(
                "Failed to import {}: {}",
                path.display(),
                e
            )));
        }
    }
}

/// Name from the file's heading if it has one, else from the file stem.
fn import_file<B: StorageBackend>(
    backend: &B,
    config: &NotesConfig,
    categories: &[String],
    path: &Path,
) -> Result<Key> {
    let content = fs::read_to_string(path).map_err(NoteError::Io)?;

    let stem = path
        .file_stem()
        .map(|s| title::sanitize_file_name(&s.to_string_lossy(), config.title_max_len))
        .filter(|s| !s.is_empty());
    let name = title::derive_name(&content, config.title_max_len).or(stem);

    let key = unique::unique_note_key(
        backend,
        categories,
        name.as_deref(),
        &config.default_note_name,
    )?;
    backend.write(&key, &content)?;
    debug!(%key, source = %path.display(), "imported note");

    let meta = NoteMetadata::created_on(Local::now().date_naive());
    if let Err(e) = backend.write_metadata(&key, &meta) {
        warn!(%key, error = %e, "could not write sidecar for imported note");
    }
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::mem_backend::MemBackend;
    use tempfile::TempDir;

    #[test]
    fn test_import_directory_filters_by_extension() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("first_try.md"), "plain body").unwrap();
        fs::write(dir.path().join("titled.txt"), "# Real Title\ntext").unwrap();
        fs::write(dir.path().join("skip.pdf"), "binary").unwrap();

        let backend = MemBackend::with_notes([("Inbox_Real Title", "")]);
        let mut session = Session::new();
        let inbox = vec!["Inbox".to_string()];
        let res = run(
            &backend,
            &mut session,
            &NotesConfig::default(),
            vec![dir.path().to_path_buf()],
            &inbox,
        )
        .unwrap();

        assert_eq!(res.affected_keys.len(), 2);
        assert_eq!(
            backend.keys(),
            vec!["Inbox_Real Title", "Inbox_Real Title1", "Inbox_first try"]
        );
        assert_eq!(
            backend.read(&Key::from("Inbox_Real Title1")).unwrap(),
            "# Real Title\ntext"
        );
    }

    #[test]
    fn test_missing_path_is_reported() {
        let backend = MemBackend::new();
        let mut session = Session::new();
        let res = run(
            &backend,
            &mut session,
            &NotesConfig::default(),
            vec![PathBuf::from("/definitely/not/here.md")],
            &[],
        )
        .unwrap();
        assert!(res.affected_keys.is_empty());
        assert!(res
            .messages
            .iter()
            .any(|m| m.content.starts_with("Path not found")));
    }
}
