use crate::error::{NoteError, Result};
use std::env;
use std::fs;
use std::path::Path;
use std::process::Command;

/// Gets the editor command from environment.
/// Checks $EDITOR, then $VISUAL, then falls back to common editors.
pub fn get_editor() -> Result<String> {
    for var in ["EDITOR", "VISUAL"] {
        if let Ok(editor) = env::var(var) {
            if !editor.trim().is_empty() {
                return Ok(editor);
            }
        }
    }

    for fallback in &["vim", "vi", "nano"] {
        if Command::new("which")
            .arg(fallback)
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
        {
            return Ok((*fallback).to_string());
        }
    }

    Err(NoteError::Api(
        "No editor found. Set $EDITOR environment variable.".to_string(),
    ))
}

/// Split an editor command like `code --wait` into program and leading args.
fn split_command(editor: &str) -> Option<(&str, Vec<&str>)> {
    let mut parts = editor.split_whitespace();
    let program = parts.next()?;
    Some((program, parts.collect()))
}

/// Opens a file in the user's editor and waits for it to close.
/// Returns the contents of the file after editing.
pub fn open_in_editor<P: AsRef<Path>>(file_path: P) -> Result<String> {
    let editor = get_editor()?;
    let path = file_path.as_ref();
    let (program, args) = split_command(&editor)
        .ok_or_else(|| NoteError::Api("Editor command is empty".to_string()))?;

    let status = Command::new(program)
        .args(args)
        .arg(path)
        .status()
        .map_err(|e| NoteError::Api(format!("Failed to launch editor '{}': {}", editor, e)))?;

    if !status.success() {
        return Err(NoteError::Api(format!(
            "Editor '{}' exited with non-zero status",
            editor
        )));
    }

    fs::read_to_string(path).map_err(NoteError::Io)
}
