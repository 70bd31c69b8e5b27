use crate::codec;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::Key;
use crate::store::StorageBackend;
use std::collections::BTreeSet;
use tracing::info;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DoctorReport {
    /// Sidecars whose note no longer exists; removed.
    pub orphan_sidecars: Vec<Key>,
    /// Keys with an empty segment; the tree cannot show them.
    pub malformed_keys: Vec<Key>,
}

pub fn check<B: StorageBackend>(backend: &B) -> Result<DoctorReport> {
    let notes: BTreeSet<Key> = backend.list_keys()?.into_iter().collect();
    let mut report = DoctorReport::default();

    let mut sidecars = backend.list_metadata_keys()?;
    sidecars.sort();
    for key in sidecars {
        if !notes.contains(&key) {
            backend.delete_metadata(&key)?;
            info!(%key, "removed orphan sidecar");
            report.orphan_sidecars.push(key);
        }
    }

    report.malformed_keys = notes
        .into_iter()
        .filter(|k| !codec::is_well_formed(k))
        .collect();
    Ok(report)
}

pub fn run<B: StorageBackend>(backend: &B) -> Result<CmdResult> {
    let report = check(backend)?;
    let mut result = CmdResult::default();

    if report.orphan_sidecars.is_empty() && report.malformed_keys.is_empty() {
        result.add_message(CmdMessage::success("No inconsistencies found."));
        return Ok(result);
    }

    if !report.orphan_sidecars.is_empty() {
        result.add_message(CmdMessage::warning(format!(
            "Removed {} orphan sidecar(s):",
            report.orphan_sidecars.len()
        )));
        for key in &report.orphan_sidecars {
            result.add_message(CmdMessage::info(format!("  - {}", key)));
        }
    }
    if !report.malformed_keys.is_empty() {
        result.add_message(CmdMessage::warning(format!(
            "{} note(s) have an empty path segment and are hidden from the tree; rename them:",
            report.malformed_keys.len()
        )));
        for key in &report.malformed_keys {
            result.add_message(CmdMessage::info(format!("  - {}", key)));
        }
    }
    result.affected_keys = report.orphan_sidecars;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NoteMetadata;
    use crate::store::mem_backend::MemBackend;

    #[test]
    fn test_finds_orphans_and_malformed_keys() {
        let backend = MemBackend::with_notes([("A_x", ""), ("A__y", "")]);
        backend
            .write_metadata(&Key::from("A_x"), &NoteMetadata::default())
            .unwrap();
        backend
            .write_metadata(&Key::from("Gone"), &NoteMetadata::default())
            .unwrap();

        let report = check(&backend).unwrap();
        assert_eq!(report.orphan_sidecars, vec![Key::from("Gone")]);
        assert_eq!(report.malformed_keys, vec![Key::from("A__y")]);
        assert_eq!(backend.list_metadata_keys().unwrap(), vec![Key::from("A_x")]);
    }

    #[test]
    fn test_clean_store() {
        let backend = MemBackend::with_notes([("A", "")]);
        let res = run(&backend).unwrap();
        assert_eq!(res.messages.len(), 1);
        assert!(res.affected_keys.is_empty());
    }
}
