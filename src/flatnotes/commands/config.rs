use crate::commands::{CmdMessage, CmdResult};
use crate::config::NotesConfig;
use crate::error::Result;
use std::path::Path;

#[derive(Debug, Clone)]
pub enum ConfigAction {
    ShowAll,
    ShowKey(String),
    Set(String, String),
}

pub fn run(config_dir: &Path, action: ConfigAction) -> Result<CmdResult> {
    match action {
        ConfigAction::ShowAll => {
            let config = NotesConfig::load(config_dir)?;
            Ok(CmdResult::default().with_config(config))
        }
        ConfigAction::ShowKey(key) => {
            let config = NotesConfig::load(config_dir)?;
            let mut result = CmdResult::default();
            match config.get(&key) {
                Some(val) => result.add_message(CmdMessage::info(val)),
                None => {
                    result.add_message(CmdMessage::error(format!("Unknown config key: {}", key)))
                }
            }
            Ok(result)
        }
        ConfigAction::Set(key, value) => {
            let mut config = NotesConfig::load(config_dir)?;
            if let Err(e) = config.set(&key, &value) {
                let mut res = CmdResult::default();
                res.add_message(CmdMessage::error(e));
                return Ok(res);
            }
            config.save(config_dir)?;
            let display_val = config.get(&key).unwrap_or_else(|| value.clone());
            let mut result = CmdResult::default().with_config(config);
            result.add_message(CmdMessage::success(format!(
                "{} set to {}",
                key, display_val
            )));
            Ok(result)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MessageLevel;
    use tempfile::TempDir;

    #[test]
    fn test_set_persists() {
        let dir = TempDir::new().unwrap();
        let res = run(
            dir.path(),
            ConfigAction::Set("default_note_name".into(), "Untitled".into()),
        )
        .unwrap();
        assert_eq!(res.messages[0].level, MessageLevel::Success);

        let shown = run(dir.path(), ConfigAction::ShowKey("default_note_name".into())).unwrap();
        assert_eq!(shown.messages[0].content, "Untitled");
    }

    #[test]
    fn test_unknown_key_is_reported() {
        let dir = TempDir::new().unwrap();
        let res = run(dir.path(), ConfigAction::ShowKey("colour".into())).unwrap();
        assert_eq!(res.messages[0].level, MessageLevel::Error);
        assert!(!dir.path().join("config.json").exists());
    }
}
