//! # Uniqueness Resolver
//!
//! Picks the first free variant of a desired name: the name itself, then
//! `name1`, `name2`, ... The live key set is listed from the backend on every
//! call; a cached tree could be stale if files changed under us.
//!
//! Nothing guards the gap between resolving a name and writing it. The store is
//! single-user, so a racing writer is not expected; if one wins anyway the write
//! or rename reports `NameConflict`.

use crate::codec::{self, DELIMITER};
use crate::error::Result;
use crate::model::{Key, NotePath};
use crate::session::Session;
use crate::store::StorageBackend;
use std::collections::BTreeSet;

pub const DEFAULT_NOTE_NAME: &str = "New Note";
pub const DEFAULT_FOLDER_NAME: &str = "New Folder";

/// First candidate (`base`, `base1`, `base2`, ...) for which `taken` is false.
fn first_free(base: &str, mut taken: impl FnMut(&str) -> Result<bool>) -> Result<String> {
    if !taken(base)? {
        return Ok(base.to_string());
    }
    let mut n: u64 = 1;
    loop {
        let candidate = format!("{}{}", base, n);
        if !taken(&candidate)? {
            return Ok(candidate);
        }
        n += 1;
    }
}

/// A key for a new note named `desired` (or `default_name`) inside `categories`
/// that no existing note uses.
pub fn unique_note_key<B: StorageBackend>(
    backend: &B,
    categories: &[String],
    desired: Option<&str>,
    default_name: &str,
) -> Result<Key> {
    codec::validate_category_path(categories)?;
    let base = desired
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(default_name);
    codec::validate_name(base)?;

    let existing: BTreeSet<Key> = backend.list_keys()?.into_iter().collect();
    let name = first_free(base, |candidate| {
        let key = codec::encode(&NotePath::new(categories.to_vec(), candidate))?;
        Ok(existing.contains(&key))
    })?;
    codec::encode(&NotePath::new(categories.to_vec(), name))
}

/// Category segments directly under `parent`, from live keys plus pending folders.
pub fn sibling_categories<B: StorageBackend>(
    backend: &B,
    session: &Session,
    parent: &[String],
) -> Result<BTreeSet<String>> {
    let prefix = codec::category_prefix(parent);
    let mut siblings = BTreeSet::new();

    for key in backend.list_keys()? {
        let Some(rest) = key.as_str().strip_prefix(&prefix) else {
            continue;
        };
        // Only keys with another delimiter below `parent` contribute a category.
        if let Some((segment, _)) = rest.split_once(DELIMITER) {
            if !segment.is_empty() {
                siblings.insert(segment.to_string());
            }
        }
    }

    for folder in session.empty_folders() {
        if folder.len() > parent.len() && folder.starts_with(parent) {
            siblings.insert(folder[parent.len()].clone());
        }
    }

    Ok(siblings)
}

/// A category name under `parent` that no sibling category uses.
///
/// Only categories are compared. A note with the same pure name under `parent`
/// does not count as a collision.
pub fn unique_category_name<B: StorageBackend>(
    backend: &B,
    session: &Session,
    parent: &[String],
    desired: Option<&str>,
    default_name: &str,
) -> Result<String> {
    codec::validate_category_path(parent)?;
    let base = desired
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(default_name);
    codec::validate_name(base)?;

    let siblings = sibling_categories(backend, session, parent)?;
    first_free(base, |candidate| Ok(siblings.contains(candidate)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NoteError;
    use crate::store::mem_backend::MemBackend;

    fn path(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_suffix_skips_taken_variants() {
        let backend = MemBackend::with_notes([("A_Note", ""), ("A_Note1", "")]);
        let key =
            unique_note_key(&backend, &path(&["A"]), Some("Note"), DEFAULT_NOTE_NAME).unwrap();
        assert_eq!(key.as_str(), "A_Note2");
    }

    #[test]
    fn test_free_name_is_used_as_is() {
        let backend = MemBackend::with_notes([("B_Note", "")]);
        let key =
            unique_note_key(&backend, &path(&["A"]), Some("Note"), DEFAULT_NOTE_NAME).unwrap();
        assert_eq!(key.as_str(), "A_Note");
    }

    #[test]
    fn test_default_name_when_none_given() {
        let backend = MemBackend::with_notes([("New Note", "")]);
        let key = unique_note_key(&backend, &[], None, DEFAULT_NOTE_NAME).unwrap();
        assert_eq!(key.as_str(), "New Note1");
        let key = unique_note_key(&backend, &[], Some("   "), DEFAULT_NOTE_NAME).unwrap();
        assert_eq!(key.as_str(), "New Note1");
    }

    #[test]
    fn test_rescans_live_keys() {
        let backend = MemBackend::new();
        let first = unique_note_key(&backend, &[], Some("X"), DEFAULT_NOTE_NAME).unwrap();
        backend.write(&first, "").unwrap();
        let second = unique_note_key(&backend, &[], Some("X"), DEFAULT_NOTE_NAME).unwrap();
        assert_eq!(second.as_str(), "X1");
    }

    #[test]
    fn test_rejects_delimiter_in_name() {
        let backend = MemBackend::new();
        let err = unique_note_key(&backend, &[], Some("a_b"), DEFAULT_NOTE_NAME).unwrap_err();
        assert!(matches!(err, NoteError::InvalidName(_)));
    }

    #[test]
    fn test_category_name_checks_siblings_only() {
        let backend = MemBackend::with_notes([
            ("New Folder_a", ""),
            ("Work_New Folder1_b", ""),
            ("New Folder1", ""),
        ]);
        let mut session = Session::new();
        session.add_folder(path(&["New Folder1"]));

        let name =
            unique_category_name(&backend, &session, &[], None, DEFAULT_FOLDER_NAME).unwrap();
        assert_eq!(name, "New Folder2");

        let nested =
            unique_category_name(&backend, &session, &path(&["Work"]), None, DEFAULT_FOLDER_NAME)
                .unwrap();
        assert_eq!(nested, "New Folder");
    }

    #[test]
    fn test_sibling_categories() {
        let backend = MemBackend::with_notes([("A_B_x", ""), ("A_C", ""), ("A_D_E_y", "")]);
        let siblings = sibling_categories(&backend, &Session::new(), &path(&["A"])).unwrap();
        assert_eq!(
            siblings.into_iter().collect::<Vec<_>>(),
            vec!["B".to_string(), "D".to_string()]
        );
    }
}
