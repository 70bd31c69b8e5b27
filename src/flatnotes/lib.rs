//! # Flatnotes Architecture
//!
//! Flatnotes keeps markdown notes in **one flat directory** while presenting them as
//! an arbitrarily deep folder tree. The folder path is encoded in each file name:
//! `Study_Java_Generics.md` is the note `Generics` inside `Study/Java`. There is no
//! index file; the tree is rebuilt from a directory listing whenever it is needed.
//!
//! Everything hard lives in keeping that encoding consistent: building the tree,
//! renaming a whole folder (which rewrites every file beneath it), generating
//! collision-free names, and keeping a note's `# heading` equal to its file name.
//!
//! ## The Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, formats output, handles terminal I/O   │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Owns backend, session and config                         │
//! │  - Parses "Study/Java" category arguments                   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Rename/move engine, title sync, create/delete/import     │
//! │  - Built on codec.rs, namespace.rs, unique.rs, title.rs     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - StorageBackend trait over a flat key space               │
//! │  - FsBackend (production), MemBackend (testing)             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Keys and Paths
//!
//! A [`model::Key`] is the file's base name. [`codec`] converts it to and from a
//! [`model::NotePath`] (category segments plus pure name). The delimiter `_` can
//! never appear inside a segment; names that contain it are rejected.
//!
//! ## Session State
//!
//! Which note is open, its unsaved buffer and any folders that exist only in
//! memory are held in an explicit [`session::Session`]. Operations that can rename
//! or delete the open note take it by `&mut` and update it before returning.
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward, code takes Rust arguments, returns `Result<CmdResult>`,
//! and never prints or exits. Diagnostics go through `tracing`.
//!
//! ## Testing Strategy
//!
//! 1. **Commands**: unit tests against [`store::mem_backend::MemBackend`], which can
//!    also simulate a locked file to exercise partial cascade failures.
//! 2. **Storage**: `tests/` exercises [`store::fs_backend::FsBackend`] on a temp dir.
//! 3. **CLI**: `tests/` drives the binary end to end with `assert_cmd`.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: Business logic for each operation
//! - [`codec`]: Key <-> path conversion
//! - [`namespace`]: Tree construction from the flat key set
//! - [`unique`]: Collision-free note and folder names
//! - [`title`]: Heading extraction, rewriting and name sanitizing
//! - [`session`]: Open note, buffer and in-memory folders
//! - [`store`]: Storage abstraction and implementations
//! - [`model`]: Core data types (`Key`, `NotePath`, `NoteMetadata`)
//! - [`config`]: Configuration management
//! - [`editor`]: External editor integration
//! - [`logging`]: `tracing` subscriber setup
//! - [`error`]: Error types
//! - `cli`: Argument parsing and terminal rendering for the binary (not part of the lib API)

pub mod api;
pub mod codec;
pub mod commands;
pub mod config;
pub mod editor;
pub mod error;
pub mod logging;
pub mod model;
pub mod namespace;
pub mod session;
pub mod store;
pub mod title;
pub mod unique;
