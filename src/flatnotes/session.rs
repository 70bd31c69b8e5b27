//! # Session State
//!
//! Which note is open, what its unsaved buffer holds, and which folders exist only
//! in memory. Engine operations take a `&mut Session` and update it as part of the
//! same call, so a caller never observes a renamed note under its old key.

use crate::codec;
use crate::model::Key;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default)]
pub struct Session {
    current: Option<Key>,
    buffer: Option<String>,
    empty_folders: BTreeSet<Vec<String>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `key` the open note, with `content` as its loaded buffer.
    pub fn open(&mut self, key: Key, content: String) {
        self.current = Some(key);
        self.buffer = Some(content);
    }

    pub fn close(&mut self) {
        self.current = None;
        self.buffer = None;
    }

    pub fn current(&self) -> Option<&Key> {
        self.current.as_ref()
    }

    pub fn is_current(&self, key: &Key) -> bool {
        self.current.as_ref() == Some(key)
    }

    pub fn buffer(&self) -> Option<&str> {
        self.buffer.as_deref()
    }

    pub fn set_buffer(&mut self, content: String) {
        self.buffer = Some(content);
    }

    /// Follow a rename: if `old` is open, it is now `new`.
    pub fn rekey(&mut self, old: &Key, new: &Key) {
        if self.is_current(old) {
            self.current = Some(new.clone());
        }
    }

    /// Forget the open note if it was `key`.
    pub fn forget(&mut self, key: &Key) {
        if self.is_current(key) {
            self.close();
        }
    }

    pub fn empty_folders(&self) -> impl Iterator<Item = &Vec<String>> {
        self.empty_folders.iter()
    }

    pub fn add_folder(&mut self, path: Vec<String>) {
        self.empty_folders.insert(path);
    }

    pub fn has_folder(&self, path: &[String]) -> bool {
        self.empty_folders.contains(path)
    }

    /// Remove `path` and every in-memory folder below it. Returns how many went.
    pub fn remove_folder_tree(&mut self, path: &[String]) -> usize {
        let before = self.empty_folders.len();
        self.empty_folders.retain(|f| !f.starts_with(path));
        before - self.empty_folders.len()
    }

    /// Re-root every in-memory folder under `old` to `new`.
    pub fn move_folder_tree(&mut self, old: &[String], new: &[String]) {
        let moved: Vec<Vec<String>> = self
            .empty_folders
            .iter()
            .filter(|f| f.starts_with(old))
            .cloned()
            .collect();
        for folder in moved {
            self.empty_folders.remove(&folder);
            let mut renamed = new.to_vec();
            renamed.extend_from_slice(&folder[old.len()..]);
            self.empty_folders.insert(renamed);
        }
    }

    /// Drop in-memory folders that some key now populates.
    pub fn prune_folders(&mut self, keys: &[Key]) {
        let prefixes: Vec<&str> = keys.iter().map(Key::as_str).collect();
        self.empty_folders.retain(|folder| {
            let prefix = codec::category_prefix(folder);
            !prefixes.iter().any(|k| k.starts_with(&prefix))
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_rekey_only_touches_open_note() {
        let mut session = Session::new();
        session.open(Key::from("A_x"), "c".into());
        session.rekey(&Key::from("B_y"), &Key::from("B_z"));
        assert_eq!(session.current(), Some(&Key::from("A_x")));
        session.rekey(&Key::from("A_x"), &Key::from("C_x"));
        assert_eq!(session.current(), Some(&Key::from("C_x")));
        assert_eq!(session.buffer(), Some("c"));
    }

    #[test]
    fn test_forget_closes() {
        let mut session = Session::new();
        session.open(Key::from("A"), "c".into());
        session.forget(&Key::from("A"));
        assert!(session.current().is_none());
        assert!(session.buffer().is_none());
    }

    #[test]
    fn test_folder_tree_moves_and_removes() {
        let mut session = Session::new();
        session.add_folder(path(&["A"]));
        session.add_folder(path(&["A", "B"]));
        session.add_folder(path(&["AB"]));

        session.move_folder_tree(&path(&["A"]), &path(&["Z"]));
        assert!(session.has_folder(&path(&["Z", "B"])));
        assert!(session.has_folder(&path(&["AB"])));
        assert!(!session.has_folder(&path(&["A"])));

        assert_eq!(session.remove_folder_tree(&path(&["Z"])), 2);
        assert_eq!(session.empty_folders().count(), 1);
    }

    #[test]
    fn test_prune_populated_folders() {
        let mut session = Session::new();
        session.add_folder(path(&["Java"]));
        session.add_folder(path(&["Rust"]));
        session.prune_folders(&[Key::from("Java_Intro")]);
        assert!(!session.has_folder(&path(&["Java"])));
        assert!(session.has_folder(&path(&["Rust"])));
    }
}
