//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer. It is the single
//! entry point for every note operation, whatever the UI.
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Owns state**: the storage backend, the [`Session`] and the loaded config
//! - **Normalizes inputs** (e.g., parsing `Study/Java` into category segments)
//! - **Dispatches** to the matching command function
//! - **Returns structured types** (`Result<CmdResult>`)
//!
//! ## What the API Does NOT Do
//!
//! - **Business logic**: That belongs in `commands/*.rs`
//! - **Presentation**: No stdout or stderr; results are data, not strings
//!
//! ## Generic Over StorageBackend
//!
//! `NotesApi<B: StorageBackend>` is generic over the storage backend:
//! - Production: `NotesApi<FsBackend>`
//! - Testing: `NotesApi<MemBackend>`

use crate::codec;
use crate::commands::{self, CmdResult};
use crate::config::NotesConfig;
use crate::error::Result;
use crate::model::Key;
use crate::session::Session;
use crate::store::StorageBackend;
use std::path::{Path, PathBuf};

pub struct NotesApi<B: StorageBackend> {
    backend: B,
    session: Session,
    config: NotesConfig,
    config_dir: PathBuf,
}

impl<B: StorageBackend> NotesApi<B> {
    pub fn new(backend: B, config: NotesConfig, config_dir: PathBuf) -> Self {
        Self {
            backend,
            session: Session::new(),
            config,
            config_dir,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn config(&self) -> &NotesConfig {
        &self.config
    }

    pub fn tree(&mut self, search: Option<&str>) -> Result<CmdResult> {
        commands::list::tree(&self.backend, &mut self.session, search)
    }

    pub fn open(&mut self, key: &str) -> Result<CmdResult> {
        commands::list::open(&self.backend, &mut self.session, &Key::from(key))
    }

    pub fn create_note(&mut self, category: &str, name: Option<&str>) -> Result<CmdResult> {
        let categories = codec::parse_category_arg(category);
        commands::create::note(
            &self.backend,
            &mut self.session,
            &self.config,
            &categories,
            name,
        )
    }

    pub fn create_folder(&mut self, parent: &str, name: Option<&str>) -> Result<CmdResult> {
        let parent = codec::parse_category_arg(parent);
        commands::create::folder(&self.backend, &mut self.session, &self.config, &parent, name)
    }

    /// Save content to the open note.
    pub fn save(&mut self, content: &str, mood: Option<&str>) -> Result<CmdResult> {
        commands::save::save(&self.backend, &mut self.session, &self.config, content, mood)
    }

    /// Save content to `key`, opening it first if needed.
    pub fn save_note(&mut self, key: &str, content: &str, mood: Option<&str>) -> Result<CmdResult> {
        commands::save::save_as(
            &self.backend,
            &mut self.session,
            &self.config,
            &Key::from(key),
            content,
            mood,
        )
    }

    pub fn rename_note(&mut self, key: &str, new_name: &str) -> Result<CmdResult> {
        commands::save::rename_note(&self.backend, &mut self.session, &Key::from(key), new_name)
    }

    pub fn move_note(&mut self, key: &str, category: &str) -> Result<CmdResult> {
        let categories = codec::parse_category_arg(category);
        commands::rename::run_move_note(
            &self.backend,
            &mut self.session,
            &Key::from(key),
            &categories,
        )
    }

    pub fn rename_folder(&mut self, category: &str, new_name: &str) -> Result<CmdResult> {
        let path = codec::parse_category_arg(category);
        commands::rename::run_rename_category(&self.backend, &mut self.session, &path, new_name)
    }

    pub fn move_folder(&mut self, category: &str, parent: &str) -> Result<CmdResult> {
        let path = codec::parse_category_arg(category);
        let parent = codec::parse_category_arg(parent);
        commands::rename::run_move_category(&self.backend, &mut self.session, &path, &parent)
    }

    pub fn delete_note(&mut self, key: &str) -> Result<CmdResult> {
        commands::delete::note(&self.backend, &mut self.session, &Key::from(key))
    }

    pub fn delete_folder(&mut self, category: &str, recursive: bool) -> Result<CmdResult> {
        let path = codec::parse_category_arg(category);
        commands::delete::run_category(&self.backend, &mut self.session, &path, recursive)
    }

    pub fn info(&self, key: &str) -> Result<CmdResult> {
        commands::metadata::info(&self.backend, &Key::from(key))
    }

    pub fn review(&mut self, key: &str) -> Result<CmdResult> {
        commands::metadata::review(&self.backend, &Key::from(key))
    }

    pub fn import(&mut self, paths: Vec<PathBuf>, category: &str) -> Result<CmdResult> {
        let categories = codec::parse_category_arg(category);
        commands::import::run(
            &self.backend,
            &mut self.session,
            &self.config,
            paths,
            &categories,
        )
    }

    pub fn doctor(&mut self) -> Result<CmdResult> {
        commands::doctor::run(&self.backend)
    }

    pub fn note_paths<I: AsRef<str>>(&self, keys: &[I]) -> Result<CmdResult> {
        let keys: Vec<Key> = keys.iter().map(|k| Key::from(k.as_ref())).collect();
        commands::list::paths(&self.backend, &keys)
    }

    pub fn config_cmd(&mut self, action: commands::config::ConfigAction) -> Result<CmdResult> {
        let result = commands::config::run(&self.config_dir, action)?;
        if let Some(config) = &result.config {
            self.config = config.clone();
        }
        Ok(result)
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }
}
