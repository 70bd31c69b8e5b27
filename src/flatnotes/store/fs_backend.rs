use super::StorageBackend;
use crate::error::{NoteError, Result};
use crate::model::{Key, NoteMetadata};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

const TMP_PREFIX: &str = ".flatnotes-";

pub struct FsBackend {
    notes_dir: PathBuf,
    note_ext: String,
    meta_ext: String,
}

fn normalize_ext(ext: &str) -> String {
    if ext.starts_with('.') {
        ext.to_string()
    } else {
        format!(".{}", ext)
    }
}

impl FsBackend {
    pub fn new(notes_dir: PathBuf) -> Self {
        Self {
            notes_dir,
            note_ext: ".md".to_string(),
            meta_ext: ".json".to_string(),
        }
    }

    pub fn with_note_ext(mut self, ext: &str) -> Self {
        self.note_ext = normalize_ext(ext);
        self
    }

    pub fn with_meta_ext(mut self, ext: &str) -> Self {
        self.meta_ext = normalize_ext(ext);
        self
    }

    pub fn notes_dir(&self) -> &Path {
        &self.notes_dir
    }

    pub fn note_ext(&self) -> &str {
        &self.note_ext
    }

    fn note_file(&self, key: &Key) -> PathBuf {
        self.notes_dir.join(format!("{}{}", key, self.note_ext))
    }

    fn meta_file(&self, key: &Key) -> PathBuf {
        self.notes_dir.join(format!("{}{}", key, self.meta_ext))
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.notes_dir.exists() {
            fs::create_dir_all(&self.notes_dir).map_err(NoteError::Io)?;
        } else if !self.notes_dir.is_dir() {
            return Err(NoteError::Store(format!(
                "{} is not a directory",
                self.notes_dir.display()
            )));
        }
        Ok(())
    }

    /// Write through a temp file so readers never see a half-written note.
    fn atomic_write(&self, target: &Path, content: &str) -> Result<()> {
        self.ensure_dir()?;
        let tmp = self
            .notes_dir
            .join(format!("{}{}.tmp", TMP_PREFIX, Uuid::new_v4()));
        fs::write(&tmp, content).map_err(NoteError::Io)?;
        if let Err(e) = fs::rename(&tmp, target) {
            let _ = fs::remove_file(&tmp);
            return Err(NoteError::Io(e));
        }
        Ok(())
    }

    /// Base names of files in the notes dir carrying `ext`.
    fn list_with_ext(&self, ext: &str) -> Result<Vec<Key>> {
        if !self.notes_dir.exists() {
            return Ok(Vec::new());
        }

        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.notes_dir).map_err(NoteError::Io)? {
            let entry = entry.map_err(NoteError::Io)?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Some(name) = path.file_name().and_then(|s| s.to_str()) else {
                warn!(path = %path.display(), "skipping file with non UTF-8 name");
                continue;
            };
            if name.starts_with(TMP_PREFIX) {
                continue;
            }
            if let Some(stem) = name.strip_suffix(ext) {
                if !stem.is_empty() {
                    keys.push(Key::new(stem));
                }
            }
        }
        Ok(keys)
    }
}

impl StorageBackend for FsBackend {
    fn list_keys(&self) -> Result<Vec<Key>> {
        self.list_with_ext(&self.note_ext)
    }

    fn exists(&self, key: &Key) -> Result<bool> {
        Ok(self.note_file(key).is_file())
    }

    fn read(&self, key: &Key) -> Result<String> {
        match fs::read_to_string(self.note_file(key)) {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(NoteError::NotFound(key.to_string())),
            Err(e) => Err(NoteError::Io(e)),
        }
    }

    fn write(&self, key: &Key, content: &str) -> Result<()> {
        debug!(%key, bytes = content.len(), "writing note");
        self.atomic_write(&self.note_file(key), content)
    }

    fn delete(&self, key: &Key) -> Result<()> {
        match fs::remove_file(self.note_file(key)) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(NoteError::NotFound(key.to_string()))
            }
            Err(e) => return Err(NoteError::Io(e)),
        }
        debug!(%key, "deleted note");
        // The note is gone either way; a stuck sidecar is left for doctor to find.
        if let Err(e) = self.delete_metadata(key) {
            warn!(%key, error = %e, "sidecar left behind after delete");
        }
        Ok(())
    }

    fn rename(&self, old: &Key, new: &Key) -> Result<()> {
        let source = self.note_file(old);
        let target = self.note_file(new);

        if !source.is_file() {
            return Err(NoteError::NotFound(old.to_string()));
        }
        if target.exists() {
            return Err(NoteError::NameConflict(new.to_string()));
        }

        // NotFound also covers a missing target parent; only blame the source if it vanished.
        fs::rename(&source, &target).map_err(|e| match e.kind() {
            ErrorKind::NotFound if !source.is_file() => NoteError::NotFound(old.to_string()),
            _ => NoteError::Io(e),
        })?;
        debug!(%old, %new, "renamed note");

        let meta_source = self.meta_file(old);
        if meta_source.is_file() {
            let meta_target = self.meta_file(new);
            if meta_target.exists() {
                warn!(%new, "overwriting orphan sidecar at rename target");
            }
            // The note already moved; a stuck sidecar is left for doctor to find.
            if let Err(e) = fs::rename(&meta_source, &meta_target) {
                warn!(%old, %new, error = %e, "sidecar did not follow its note");
            }
        }
        Ok(())
    }

    fn read_metadata(&self, key: &Key) -> Result<Option<NoteMetadata>> {
        let content = match fs::read_to_string(self.meta_file(key)) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(NoteError::Io(e)),
        };
        let meta = serde_json::from_str(&content).map_err(NoteError::Serialization)?;
        Ok(Some(meta))
    }

    fn write_metadata(&self, key: &Key, metadata: &NoteMetadata) -> Result<()> {
        let content = serde_json::to_string_pretty(metadata).map_err(NoteError::Serialization)?;
        debug!(%key, "writing sidecar");
        self.atomic_write(&self.meta_file(key), &content)
    }

    fn list_metadata_keys(&self) -> Result<Vec<Key>> {
        self.list_with_ext(&self.meta_ext)
    }

    fn delete_metadata(&self, key: &Key) -> Result<()> {
        match fs::remove_file(self.meta_file(key)) {
            Ok(()) => {
                debug!(%key, "deleted sidecar");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(NoteError::Io(e)),
        }
    }

    fn note_path(&self, key: &Key) -> PathBuf {
        self.note_file(key)
    }
}
