//! # CLI Layer
//!
//! This module is **one possible UI client** for flatnotes. The library does the work;
//! this layer only translates between the shell and [`NotesApi`].
//!
//! The CLI layer is the **only** place in the codebase that:
//! - Knows about terminal I/O (stdout, stderr, stdin)
//! - Handles argument parsing
//! - Formats output for human consumption
//!
//! ## Sessions
//!
//! Each invocation is a fresh process, so the session (open note, unsaved buffer,
//! in-memory folders) lives only for one command. Folders therefore appear once they
//! hold a note; `new --in Some/Folder` creates both at once.
//!
//! ## Structure
//!
//! - `run()`: Main dispatch logic (called by `main.rs`)
//! - `init_context()`: Resolves the data directory, loads config, starts logging
//! - `handle_*()`: Per-command handlers that call the API and print the result

use super::render::{
    print_messages, render_metadata, render_note, render_text_list, render_tree,
    TreeAnnotations,
};
use super::setup::{Cli, Commands};
use chrono::Local;
use clap::Parser;
use directories::ProjectDirs;
use flatnotes::api::NotesApi;
use flatnotes::commands::config::ConfigAction;
use flatnotes::config::NotesConfig;
use flatnotes::editor::open_in_editor;
use flatnotes::error::{NoteError, Result};
use flatnotes::logging;
use flatnotes::store::fs_backend::FsBackend;
use flatnotes::store::StorageBackend;
use std::collections::BTreeMap;
use std::io::Read;
use std::path::PathBuf;
use tracing::{debug, warn};

const HOME_ENV: &str = "FLATNOTES_HOME";
const NOTES_DIR: &str = "notes";

struct AppContext {
    api: NotesApi<FsBackend>,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let mut ctx = init_context(&cli)?;

    match cli.command {
        Some(Commands::Tree { search }) => handle_tree(&mut ctx, search),
        Some(Commands::New { category, name }) => handle_new(&mut ctx, category, name),
        Some(Commands::View { key }) => handle_view(&mut ctx, key),
        Some(Commands::Edit { key }) => handle_edit(&mut ctx, key),
        Some(Commands::Save { key, file, mood }) => handle_save(&mut ctx, key, file, mood),
        Some(Commands::Rename { key, name }) => handle_rename(&mut ctx, key, name),
        Some(Commands::Move { key, to }) => handle_move(&mut ctx, key, to),
        Some(Commands::RenameFolder { category, name }) => {
            handle_rename_folder(&mut ctx, category, name)
        }
        Some(Commands::MoveFolder { category, to }) => handle_move_folder(&mut ctx, category, to),
        Some(Commands::Rm { key }) => handle_rm(&mut ctx, key),
        Some(Commands::Rmdir {
            category,
            recursive,
        }) => handle_rmdir(&mut ctx, category, recursive),
        Some(Commands::Info { key }) => handle_info(&mut ctx, key),
        Some(Commands::Review { key }) => handle_review(&mut ctx, key),
        Some(Commands::Import { paths, category }) => handle_import(&mut ctx, paths, category),
        Some(Commands::Doctor) => handle_doctor(&mut ctx),
        Some(Commands::Path { keys }) => handle_paths(&mut ctx, keys),
        Some(Commands::Config { key, value }) => handle_config(&mut ctx, key, value),
        None => handle_tree(&mut ctx, None),
    }
}

fn data_root(cli: &Cli) -> Result<PathBuf> {
    if let Some(dir) = &cli.dir {
        return Ok(dir.clone());
    }
    if let Ok(home) = std::env::var(HOME_ENV) {
        if !home.trim().is_empty() {
            return Ok(PathBuf::from(home));
        }
    }
    ProjectDirs::from("", "", "flatnotes")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| {
            NoteError::Api(format!(
                "Could not determine a data directory; pass --dir or set ${}",
                HOME_ENV
            ))
        })
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let root = data_root(cli)?;
    let config = NotesConfig::load(&root)?;
    logging::init(cli.verbose, Some(config.log_level.as_str()))?;
    debug!(root = %root.display(), "data directory");

    let backend = FsBackend::new(root.join(NOTES_DIR))
        .with_note_ext(&config.note_ext)
        .with_meta_ext(&config.meta_ext);

    Ok(AppContext {
        api: NotesApi::new(backend, config, root),
    })
}

fn join_words(words: Vec<String>) -> Option<String> {
    let joined = words.join(" ");
    if joined.trim().is_empty() {
        None
    } else {
        Some(joined)
    }
}

fn handle_tree(ctx: &mut AppContext, search: Option<String>) -> Result<()> {
    let result = ctx.api.tree(search.as_deref())?;
    if let Some(tree) = &result.tree {
        let mut metadata = BTreeMap::new();
        for key in tree.root.descendant_keys() {
            match ctx.api.backend().read_metadata(&key) {
                Ok(Some(meta)) => {
                    metadata.insert(key, meta);
                }
                Ok(None) => {}
                Err(e) => warn!(%key, error = %e, "unreadable metadata"),
            }
        }
        let annotations = TreeAnnotations {
            metadata,
            current: result.current.as_ref(),
        };
        print!(
            "{}",
            render_tree(tree, &annotations, Local::now().date_naive())
        );
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_new(ctx: &mut AppContext, category: String, name: Vec<String>) -> Result<()> {
    let name = join_words(name);
    let result = ctx.api.create_note(&category, name.as_deref())?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_view(ctx: &mut AppContext, key: String) -> Result<()> {
    let result = ctx.api.open(&key)?;
    for note in &result.notes {
        print!("{}", render_note(note));
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_edit(ctx: &mut AppContext, key: String) -> Result<()> {
    let result = ctx.api.note_paths(&[key.as_str()])?;
    let Some(path) = result.note_paths.first() else {
        return Err(NoteError::NotFound(key));
    };
    let content = open_in_editor(path)?;
    let result = ctx.api.save_note(&key, &content, None)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_save(
    ctx: &mut AppContext,
    key: String,
    file: Option<PathBuf>,
    mood: Option<String>,
) -> Result<()> {
    let content = match file {
        Some(path) => std::fs::read_to_string(&path).map_err(NoteError::Io)?,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .map_err(NoteError::Io)?;
            buffer
        }
    };
    let result = ctx.api.save_note(&key, &content, mood.as_deref())?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_rename(ctx: &mut AppContext, key: String, name: Vec<String>) -> Result<()> {
    let name = join_words(name).ok_or_else(|| NoteError::InvalidName("name is blank".to_string()))?;
    let result = ctx.api.rename_note(&key, &name)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_move(ctx: &mut AppContext, key: String, to: String) -> Result<()> {
    let result = ctx.api.move_note(&key, &to)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_rename_folder(ctx: &mut AppContext, category: String, name: String) -> Result<()> {
    let result = ctx.api.rename_folder(&category, &name)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_move_folder(ctx: &mut AppContext, category: String, to: String) -> Result<()> {
    let result = ctx.api.move_folder(&category, &to)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_rm(ctx: &mut AppContext, key: String) -> Result<()> {
    let result = ctx.api.delete_note(&key)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_rmdir(ctx: &mut AppContext, category: String, recursive: bool) -> Result<()> {
    let result = ctx.api.delete_folder(&category, recursive)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_info(ctx: &mut AppContext, key: String) -> Result<()> {
    let result = ctx.api.info(&key)?;
    for (key, meta) in &result.metadata {
        print!("{}", render_metadata(key, meta));
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_review(ctx: &mut AppContext, key: String) -> Result<()> {
    let result = ctx.api.review(&key)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_import(ctx: &mut AppContext, paths: Vec<PathBuf>, category: String) -> Result<()> {
    let result = ctx.api.import(paths, &category)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_doctor(ctx: &mut AppContext) -> Result<()> {
    let result = ctx.api.doctor()?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_paths(ctx: &mut AppContext, keys: Vec<String>) -> Result<()> {
    let result = ctx.api.note_paths(keys.as_slice())?;
    let lines: Vec<String> = result
        .note_paths
        .iter()
        .map(|path| path.display().to_string())
        .collect();
    print!("{}", render_text_list(&lines, "No note paths found."));
    print_messages(&result.messages);
    Ok(())
}

fn handle_config(ctx: &mut AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(k), None) => ConfigAction::ShowKey(k),
        (Some(k), Some(v)) => ConfigAction::Set(k, v),
    };
    let show_all = matches!(action, ConfigAction::ShowAll);

    let result = ctx.api.config_cmd(action)?;
    if show_all {
        if let Some(config) = &result.config {
            let lines: Vec<String> = NotesConfig::KEYS
                .iter()
                .filter_map(|k| config.get(k).map(|v| format!("{} = {}", k, v)))
                .collect();
            print!("{}", render_text_list(&lines, "No configuration."));
        }
    }
    print_messages(&result.messages);
    Ok(())
}
