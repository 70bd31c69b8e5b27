//! # Namespace Tree
//!
//! The folder hierarchy shown to the user is derived, never stored. [`Tree::build`]
//! assembles it from the flat key set in one pass:
//!
//! 1. Start from an empty root category.
//! 2. Decode each key; walk its categories from the root, reusing a child category
//!    with the exact (case-sensitive) segment or creating it.
//! 3. Attach a note leaf for the pure name under the last category.
//!
//! Children are held in ordered maps keyed by segment, so the same key set yields
//! the same tree whatever order the directory listing came in.
//!
//! ## Notes vs. Categories
//!
//! Categories and notes live in separate child maps. A note named `Java` and a
//! category named `Java` may therefore sit side by side under one parent
//! (`Java.md` next to `Java_Intro.md`); they are different nodes. Whether the UI
//! should allow creating such a pair is left to callers.
//!
//! ## Search Trees
//!
//! [`Tree::search`] builds a flat, category-less tree of matching keys instead.
//! It is displayed by full key and substituted while a filter is active.

use crate::codec::{self, DELIMITER};
use crate::model::Key;
use std::collections::{BTreeMap, BTreeSet};
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteLeaf {
    pub key: Key,
    /// Display name: the pure name in a hierarchy tree, the full key in a search tree.
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CategoryNode {
    /// Own segment; empty for the root.
    pub name: String,
    /// Segments from the root down to and including this category.
    pub path: Vec<String>,
    pub categories: BTreeMap<String, CategoryNode>,
    pub notes: BTreeMap<String, NoteLeaf>,
}

/// A child of a category, as yielded in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeNode<'a> {
    Category(&'a CategoryNode),
    Note(&'a NoteLeaf),
}

impl TreeNode<'_> {
    pub fn name(&self) -> &str {
        match self {
            TreeNode::Category(c) => &c.name,
            TreeNode::Note(n) => &n.name,
        }
    }

    pub fn is_category(&self) -> bool {
        matches!(self, TreeNode::Category(_))
    }
}

/// Kind of a tree edge's child end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NodeKind {
    Category,
    Note,
}

impl CategoryNode {
    fn child(path: Vec<String>) -> Self {
        Self {
            name: path.last().cloned().unwrap_or_default(),
            path,
            ..Default::default()
        }
    }

    /// Identity: the concatenated segments leading here (`"Study_Java"`).
    pub fn id(&self) -> String {
        self.path.join(&DELIMITER.to_string())
    }

    /// Children sorted by display name; a category sorts before a note of the same name.
    pub fn children(&self) -> Vec<TreeNode<'_>> {
        let mut out: Vec<TreeNode<'_>> = self
            .categories
            .values()
            .map(TreeNode::Category)
            .chain(self.notes.values().map(TreeNode::Note))
            .collect();
        out.sort_by(|a, b| {
            a.name()
                .cmp(b.name())
                .then_with(|| b.is_category().cmp(&a.is_category()))
        });
        out
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty() && self.notes.is_empty()
    }

    /// Number of notes in this category and all categories below it.
    pub fn note_count(&self) -> usize {
        self.notes.len()
            + self
                .categories
                .values()
                .map(CategoryNode::note_count)
                .sum::<usize>()
    }

    /// Every note key at or below this category.
    pub fn descendant_keys(&self) -> Vec<Key> {
        let mut keys: Vec<Key> = self.notes.values().map(|n| n.key.clone()).collect();
        for category in self.categories.values() {
            keys.extend(category.descendant_keys());
        }
        keys
    }

    fn ensure_path(&mut self, segments: &[String]) -> &mut CategoryNode {
        let mut node = self;
        for segment in segments {
            let child_path = {
                let mut p = node.path.clone();
                p.push(segment.clone());
                p
            };
            node = node
                .categories
                .entry(segment.clone())
                .or_insert_with(|| CategoryNode::child(child_path));
        }
        node
    }

    fn collect_edges(&self, edges: &mut BTreeSet<(String, NodeKind, String)>) {
        let parent = self.id();
        for category in self.categories.values() {
            edges.insert((parent.clone(), NodeKind::Category, category.id()));
            category.collect_edges(edges);
        }
        for note in self.notes.values() {
            edges.insert((parent.clone(), NodeKind::Note, note.key.to_string()));
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeKind {
    Hierarchy,
    Search(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tree {
    pub root: CategoryNode,
    pub kind: TreeKind,
}

impl Tree {
    /// Build the folder hierarchy from `keys`.
    ///
    /// Keys with an empty segment (`A__B`, `_B`, `A_`) cannot be placed and are
    /// skipped with a warning.
    pub fn build(keys: &[Key]) -> Self {
        Self::build_with_folders(keys, std::iter::empty::<&Vec<String>>())
    }

    /// Build the hierarchy, also showing in-memory folders that hold no notes yet.
    pub fn build_with_folders<'a>(
        keys: &[Key],
        folders: impl IntoIterator<Item = &'a Vec<String>>,
    ) -> Self {
        let mut root = CategoryNode::default();

        for key in keys {
            if !codec::is_well_formed(key) {
                warn!(%key, "skipping malformed key");
                continue;
            }
            let path = codec::decode(key);
            let parent = root.ensure_path(&path.categories);
            parent.notes.insert(
                path.name.clone(),
                NoteLeaf {
                    key: key.clone(),
                    name: path.name,
                },
            );
        }

        for folder in folders {
            root.ensure_path(folder);
        }

        Self {
            root,
            kind: TreeKind::Hierarchy,
        }
    }

    /// Flat tree of keys containing `query`, ignoring case.
    pub fn search(keys: &[Key], query: &str) -> Self {
        let needle = query.to_lowercase();
        let mut root = CategoryNode::default();
        for key in keys {
            if key.as_str().to_lowercase().contains(&needle) {
                root.notes.insert(
                    key.to_string(),
                    NoteLeaf {
                        key: key.clone(),
                        name: key.to_string(),
                    },
                );
            }
        }
        Self {
            root,
            kind: TreeKind::Search(query.to_string()),
        }
    }

    pub fn find_category(&self, path: &[String]) -> Option<&CategoryNode> {
        let mut node = &self.root;
        for segment in path {
            node = node.categories.get(segment)?;
        }
        Some(node)
    }

    pub fn contains_category(&self, path: &[String]) -> bool {
        self.find_category(path).is_some()
    }

    pub fn find_note(&self, key: &Key) -> Option<&NoteLeaf> {
        let path = codec::decode(key);
        self.find_category(&path.categories)?
            .notes
            .get(&path.name)
            .filter(|leaf| &leaf.key == key)
    }

    /// Identity of the tree: every (parent id, child kind, child id) edge.
    ///
    /// Independent of the order keys were supplied in.
    pub fn edges(&self) -> BTreeSet<(String, NodeKind, String)> {
        let mut edges = BTreeSet::new();
        self.root.collect_edges(&mut edges);
        edges
    }

    pub fn note_count(&self) -> usize {
        self.root.note_count()
    }
}
