use crate::error::{NoteError, Result};
use crate::title::DEFAULT_MAX_TITLE_LEN;
use crate::unique::{DEFAULT_FOLDER_NAME, DEFAULT_NOTE_NAME};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_NOTE_EXT: &str = ".md";
const DEFAULT_META_EXT: &str = ".json";
const DEFAULT_LOG_LEVEL: &str = "warn";

/// Configuration for flatnotes, stored in `<root>/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotesConfig {
    /// Extension of note files (e.g. ".md")
    #[serde(default = "default_note_ext")]
    pub note_ext: String,

    /// Extension of sidecar metadata files
    #[serde(default = "default_meta_ext")]
    pub meta_ext: String,

    /// Longest name, in characters, derived from a heading
    #[serde(default = "default_title_max_len")]
    pub title_max_len: usize,

    #[serde(default = "default_note_name")]
    pub default_note_name: String,

    #[serde(default = "default_folder_name")]
    pub default_folder_name: String,

    /// Extensions to look for when importing directories (e.g. ".md", ".txt")
    #[serde(default = "default_import_ext")]
    pub import_extensions: Vec<String>,

    /// Log filter used when neither the environment nor -v sets one
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_note_ext() -> String {
    DEFAULT_NOTE_EXT.to_string()
}

fn default_meta_ext() -> String {
    DEFAULT_META_EXT.to_string()
}

fn default_title_max_len() -> usize {
    DEFAULT_MAX_TITLE_LEN
}

fn default_note_name() -> String {
    DEFAULT_NOTE_NAME.to_string()
}

fn default_folder_name() -> String {
    DEFAULT_FOLDER_NAME.to_string()
}

fn default_import_ext() -> Vec<String> {
    vec![".md".to_string(), ".txt".to_string()]
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn normalize_ext(ext: &str) -> String {
    let ext = ext.trim();
    if ext.starts_with('.') {
        ext.to_string()
    } else {
        format!(".{}", ext)
    }
}

impl Default for NotesConfig {
    fn default() -> Self {
        Self {
            note_ext: default_note_ext(),
            meta_ext: default_meta_ext(),
            title_max_len: default_title_max_len(),
            default_note_name: default_note_name(),
            default_folder_name: default_folder_name(),
            import_extensions: default_import_ext(),
            log_level: default_log_level(),
        }
    }
}

impl NotesConfig {
    pub const KEYS: [&'static str; 7] = [
        "note_ext",
        "meta_ext",
        "title_max_len",
        "default_note_name",
        "default_folder_name",
        "import_extensions",
        "log_level",
    ];

    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(NoteError::Io)?;
        let mut config: NotesConfig =
            serde_json::from_str(&content).map_err(NoteError::Serialization)?;
        config.note_ext = normalize_ext(&config.note_ext);
        config.meta_ext = normalize_ext(&config.meta_ext);
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(NoteError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(NoteError::Serialization)?;
        fs::write(config_path, content).map_err(NoteError::Io)?;
        Ok(())
    }

    /// Display value of a single setting, `None` for unknown keys.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "note_ext" => Some(self.note_ext.clone()),
            "meta_ext" => Some(self.meta_ext.clone()),
            "title_max_len" => Some(self.title_max_len.to_string()),
            "default_note_name" => Some(self.default_note_name.clone()),
            "default_folder_name" => Some(self.default_folder_name.clone()),
            "import_extensions" => Some(self.import_extensions.join(",")),
            "log_level" => Some(self.log_level.clone()),
            _ => None,
        }
    }

    /// Set a single setting from its string form.
    pub fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), String> {
        let mut next = self.clone();
        match key {
            "note_ext" => next.note_ext = normalize_ext(value),
            "meta_ext" => next.meta_ext = normalize_ext(value),
            "title_max_len" => {
                let len: usize = value
                    .trim()
                    .parse()
                    .map_err(|_| format!("title_max_len must be a number, got '{}'", value))?;
                if len == 0 {
                    return Err("title_max_len must be at least 1".to_string());
                }
                next.title_max_len = len;
            }
            "default_note_name" | "default_folder_name" => {
                crate::codec::validate_name(value).map_err(|e| e.to_string())?;
                if key == "default_note_name" {
                    next.default_note_name = value.trim().to_string();
                } else {
                    next.default_folder_name = value.trim().to_string();
                }
            }
            "import_extensions" => {
                next.import_extensions = value
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(normalize_ext)
                    .collect();
            }
            "log_level" => next.log_level = value.trim().to_string(),
            _ => return Err(format!("Unknown config key: {}", key)),
        }
        if next.note_ext == next.meta_ext {
            return Err("note_ext and meta_ext must differ".to_string());
        }
        *self = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = NotesConfig::default();
        assert_eq!(config.note_ext, ".md");
        assert_eq!(config.meta_ext, ".json");
        assert_eq!(config.title_max_len, 100);
        assert_eq!(config.default_note_name, "New Note");
    }

    #[test]
    fn test_set_ext_without_dot() {
        let mut config = NotesConfig::default();
        config.set("note_ext", "txt").unwrap();
        assert_eq!(config.note_ext, ".txt");
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut config = NotesConfig::default();
        assert!(config.set("title_max_len", "lots").is_err());
        assert!(config.set("default_note_name", "a_b").is_err());
        assert!(config.set("nope", "1").is_err());
    }

    #[test]
    fn test_import_extensions_roundtrip_through_get_set() {
        let mut config = NotesConfig::default();
        config.set("import_extensions", "md, text").unwrap();
        assert_eq!(config.get("import_extensions").unwrap(), ".md,.text");
    }

    #[test]
    fn test_load_missing_config() {
        let dir = TempDir::new().unwrap();
        let config = NotesConfig::load(dir.path()).unwrap();
        assert_eq!(config, NotesConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();

        let mut config = NotesConfig::default();
        config.set("title_max_len", "40").unwrap();
        config.save(dir.path()).unwrap();

        let loaded = NotesConfig::load(dir.path()).unwrap();
        assert_eq!(loaded.title_max_len, 40);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), r#"{"note_ext": "txt"}"#).unwrap();
        let loaded = NotesConfig::load(dir.path()).unwrap();
        assert_eq!(loaded.note_ext, ".txt");
        assert_eq!(loaded.meta_ext, ".json");
    }
}
