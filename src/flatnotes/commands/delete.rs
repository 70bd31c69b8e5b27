use crate::codec;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{CascadeReport, NoteError, Result};
use crate::model::Key;
use crate::session::Session;
use crate::store::StorageBackend;
use tracing::{debug, info, warn};

/// Delete one note and its sidecar. Closes the session if it was the open note.
pub fn note<B: StorageBackend>(
    backend: &B,
    session: &mut Session,
    key: &Key,
) -> Result<CmdResult> {
    backend.delete(key)?;
    debug!(%key, "note deleted");
    session.forget(key);

    let mut result = CmdResult::default()
        .with_affected_keys(vec![key.clone()])
        .with_current(session.current().cloned());
    result.add_message(CmdMessage::success(format!("Deleted {}", key)));
    Ok(result)
}

/// Delete the category at `path`.
///
/// A category that exists only as an in-memory folder is dropped from the session
/// without any filesystem change. A populated category is refused unless
/// `recursive`, in which case every note below it is deleted one by one.
pub fn category<B: StorageBackend>(
    backend: &B,
    session: &mut Session,
    path: &[String],
    recursive: bool,
) -> Result<CascadeReport> {
    if path.is_empty() {
        return Err(NoteError::InvalidName(
            "the root category cannot be deleted".to_string(),
        ));
    }
    codec::validate_category_path(path)?;

    let prefix = codec::category_prefix(path);
    let mut doomed: Vec<Key> = backend
        .list_keys()?
        .into_iter()
        .filter(|k| k.as_str().starts_with(&prefix))
        .collect();
    doomed.sort();

    if doomed.is_empty() {
        if session.remove_folder_tree(path) == 0 {
            return Err(NoteError::NotFound(format!("category {}", path.join("/"))));
        }
        debug!(category = %path.join("/"), "removed in-memory folder");
        return Ok(CascadeReport::default());
    }

    if !recursive {
        return Err(NoteError::Api(format!(
            "category {} holds {} note(s); delete it recursively to remove them",
            path.join("/"),
            doomed.len()
        )));
    }

    info!(category = %path.join("/"), notes = doomed.len(), "deleting category");
    let mut report = CascadeReport::default();
    for key in doomed {
        match backend.delete(&key) {
            Ok(()) => {
                session.forget(&key);
                report.succeeded.push((key, None));
            }
            Err(e) => {
                warn!(%key, error = %e, "could not delete note");
                report.failed.push((key, None, e.to_string()));
            }
        }
    }
    session.remove_folder_tree(path);

    if !report.is_complete() {
        return Err(NoteError::PartialCascadeFailure(report));
    }
    Ok(report)
}

pub fn run_category<B: StorageBackend>(
    backend: &B,
    session: &mut Session,
    path: &[String],
    recursive: bool,
) -> Result<CmdResult> {
    let report = category(backend, session, path, recursive)?;
    let mut result = CmdResult::default()
        .with_affected_keys(report.succeeded.iter().map(|(k, _)| k.clone()).collect())
        .with_current(session.current().cloned());
    result.add_message(CmdMessage::success(format!(
        "Deleted {} ({} note(s))",
        path.join("/"),
        report.succeeded.len()
    )));
    Ok(result.with_report(report))
}
