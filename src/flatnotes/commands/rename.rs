//! # Rename/Move Engine
//!
//! Two shapes of rename, both expressed as key rewrites on the flat store.
//!
//! ## Leaf
//!
//! [`move_note`] changes one note's category path and/or pure name. The new key is
//! encoded, checked against the store, and the note (with its sidecar) renamed in
//! a single backend call. Renaming a note onto itself is a no-op.
//!
//! ## Category Cascade
//!
//! [`move_category`] rewrites every key under a category. With
//! `old_prefix = "Study_Java_"` and `new_prefix = "Study_JavaLang_"`, each key
//! starting with `old_prefix` becomes `new_prefix` plus the rest of the key. Only
//! the leading prefix is replaced, so `Study_Java_Java_Notes` becomes
//! `Study_JavaLang_Java_Notes`.
//!
//! The cascade runs in three phases:
//!
//! 1. **Stage**: list the live keys and compute the full `(old, new)` plan.
//! 2. **Validate**: refuse with `NameConflict` if the destination category is
//!    already populated by keys outside the plan. Nothing has been touched yet.
//! 3. **Execute**: rename each file in turn. Sources are processed shortest first,
//!    so when a category moves up into one of its ancestors a target that is
//!    itself a source has already been vacated.
//!
//! A plain directory offers no multi-file transactions. If a rename fails midway
//! (another process holds a file, the disk fills up), the renames already done are
//! kept and the call returns [`NoteError::PartialCascadeFailure`] with the full
//! [`CascadeReport`], leaving the caller to retry or reconcile.
//!
//! In every case the session follows along: if the open note is renamed, its key
//! in the session is updated before the function returns.

use crate::codec;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{CascadeReport, NoteError, Result};
use crate::model::Key;
use crate::session::Session;
use crate::store::StorageBackend;
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

/// Leaf rename/move. `None` keeps the note's current categories or name.
///
/// Returns the note's key after the call.
pub fn move_note<B: StorageBackend>(
    backend: &B,
    session: &mut Session,
    old: &Key,
    categories: Option<&[String]>,
    name: Option<&str>,
) -> Result<Key> {
    let mut target = codec::decode(old);
    if let Some(c) = categories {
        codec::validate_category_path(c)?;
        target = target.with_categories(c.to_vec());
    }
    if let Some(name) = name {
        target = target.with_name(name.trim());
    }
    let new = codec::encode(&target)?;

    if !backend.exists(old)? {
        return Err(NoteError::NotFound(old.to_string()));
    }
    if &new == old {
        return Ok(new);
    }
    if backend.exists(&new)? {
        return Err(NoteError::NameConflict(new.to_string()));
    }

    backend.rename(old, &new)?;
    debug!(%old, %new, "moved note");
    session.rekey(old, &new);
    session.prune_folders(std::slice::from_ref(&new));
    Ok(new)
}

/// Re-parent and/or rename the category at `old` so that it lives at `new`.
///
/// Also carries along any in-memory folders below `old`. When `old` exists only
/// as in-memory folders, nothing on disk changes.
pub fn move_category<B: StorageBackend>(
    backend: &B,
    session: &mut Session,
    old: &[String],
    new: &[String],
) -> Result<CascadeReport> {
    if old.is_empty() || new.is_empty() {
        return Err(NoteError::InvalidName(
            "the root category cannot be renamed or moved".to_string(),
        ));
    }
    codec::validate_category_path(old)?;
    codec::validate_category_path(new)?;
    if old == new {
        return Ok(CascadeReport::default());
    }
    if new.starts_with(old) {
        return Err(NoteError::InvalidName(format!(
            "cannot move '{}' into itself",
            old.join("/")
        )));
    }

    let old_prefix = codec::category_prefix(old);
    let new_prefix = codec::category_prefix(new);

    // Stage
    let keys = backend.list_keys()?;
    let sources: BTreeSet<&Key> = keys
        .iter()
        .filter(|k| k.as_str().starts_with(&old_prefix))
        .collect();
    let has_pending = session.empty_folders().any(|f| f.starts_with(old));

    if sources.is_empty() && !has_pending {
        return Err(NoteError::NotFound(format!("category {}", old.join("/"))));
    }

    // Validate
    let occupied = keys
        .iter()
        .any(|k| k.as_str().starts_with(&new_prefix) && !sources.contains(&k));
    if occupied || session.has_folder(new) {
        return Err(NoteError::NameConflict(format!(
            "category {} already exists",
            new.join("/")
        )));
    }

    let mut plan: Vec<(Key, Key)> = sources
        .iter()
        .map(|old_key| {
            let suffix = &old_key.as_str()[old_prefix.len()..];
            ((*old_key).clone(), Key::new(format!("{}{}", new_prefix, suffix)))
        })
        .collect();
    plan.sort_by(|(a, _), (b, _)| a.as_str().len().cmp(&b.as_str().len()).then(a.cmp(b)));

    // Execute
    info!(
        from = %old_prefix,
        to = %new_prefix,
        notes = plan.len(),
        "moving category"
    );
    let mut report = CascadeReport::default();
    for (from, to) in plan {
        match backend.rename(&from, &to) {
            Ok(()) => {
                debug!(%from, %to, "cascade step");
                session.rekey(&from, &to);
                report.succeeded.push((from, Some(to)));
            }
            Err(e) => {
                warn!(%from, %to, error = %e, "cascade step failed");
                report.failed.push((from, Some(to), e.to_string()));
            }
        }
    }

    session.move_folder_tree(old, new);
    let moved: Vec<Key> = report
        .succeeded
        .iter()
        .filter_map(|(_, to)| to.clone())
        .collect();
    session.prune_folders(&moved);

    if !report.is_complete() {
        return Err(NoteError::PartialCascadeFailure(report));
    }
    info!(renamed = report.succeeded.len(), "category moved");
    Ok(report)
}

/// Give the category at `path` a new last segment.
pub fn rename_category<B: StorageBackend>(
    backend: &B,
    session: &mut Session,
    path: &[String],
    new_name: &str,
) -> Result<CascadeReport> {
    let Some((_, parent)) = path.split_last() else {
        return Err(NoteError::InvalidName(
            "the root category cannot be renamed".to_string(),
        ));
    };
    let new_name = new_name.trim();
    codec::validate_name(new_name)?;
    let mut new = parent.to_vec();
    new.push(new_name.to_string());
    move_category(backend, session, path, &new)
}

pub fn run_move_note<B: StorageBackend>(
    backend: &B,
    session: &mut Session,
    key: &Key,
    categories: &[String],
) -> Result<CmdResult> {
    let new = move_note(backend, session, key, Some(categories), None)?;
    let mut result = CmdResult::default().with_current(session.current().cloned());
    if &new == key {
        result.add_message(CmdMessage::info(format!("{} is already there", key)));
    } else {
        result.add_message(CmdMessage::success(format!("Moved {} -> {}", key, new)));
        result.renamed.push((key.clone(), new.clone()));
    }
    result.affected_keys.push(new);
    Ok(result)
}

pub fn run_rename_category<B: StorageBackend>(
    backend: &B,
    session: &mut Session,
    path: &[String],
    new_name: &str,
) -> Result<CmdResult> {
    let report = rename_category(backend, session, path, new_name)?;
    Ok(cascade_result(session, path, report, "Renamed"))
}

pub fn run_move_category<B: StorageBackend>(
    backend: &B,
    session: &mut Session,
    path: &[String],
    parent: &[String],
) -> Result<CmdResult> {
    let Some(last) = path.last() else {
        return Err(NoteError::InvalidName(
            "the root category cannot be moved".to_string(),
        ));
    };
    let mut new = parent.to_vec();
    new.push(last.clone());
    let report = move_category(backend, session, path, &new)?;
    Ok(cascade_result(session, path, report, "Moved"))
}

fn cascade_result(
    session: &Session,
    path: &[String],
    report: CascadeReport,
    verb: &str,
) -> CmdResult {
    let mut result = CmdResult::default().with_current(session.current().cloned());
    for (from, to) in &report.succeeded {
        if let Some(to) = to {
            result.renamed.push((from.clone(), to.clone()));
            result.affected_keys.push(to.clone());
        }
    }
    result.add_message(CmdMessage::success(format!(
        "{} {} ({} note(s))",
        verb,
        path.join("/"),
        report.succeeded.len()
    )));
    result.with_report(report)
}
