use crate::commands::{CmdMessage, CmdResult};
use crate::error::{NoteError, Result};
use crate::model::{Key, NoteMetadata};
use crate::store::StorageBackend;
use chrono::{Local, NaiveDate};
use tracing::debug;

/// Sidecar metadata for `key`, defaults when the note has none.
pub fn info<B: StorageBackend>(backend: &B, key: &Key) -> Result<CmdResult> {
    if !backend.exists(key)? {
        return Err(NoteError::NotFound(key.to_string()));
    }
    let meta = backend.read_metadata(key)?.unwrap_or_default();
    let mut result = CmdResult::default();
    if meta.is_due(Local::now().date_naive()) {
        result.add_message(CmdMessage::warning(format!("{} is due for review", key)));
    }
    result.metadata.push((key.clone(), meta));
    Ok(result)
}

pub fn review<B: StorageBackend>(backend: &B, key: &Key) -> Result<CmdResult> {
    review_on(backend, key, Local::now().date_naive())
}

/// Record a review of `key` on `today` and schedule the next one.
pub fn review_on<B: StorageBackend>(backend: &B, key: &Key, today: NaiveDate) -> Result<CmdResult> {
    if !backend.exists(key)? {
        return Err(NoteError::NotFound(key.to_string()));
    }
    let mut meta: NoteMetadata = backend.read_metadata(key)?.unwrap_or_default();
    meta.record_review(today);
    backend.write_metadata(key, &meta)?;
    debug!(%key, count = meta.review_count, "review recorded");

    let mut result = CmdResult::default();
    let next = meta
        .next_review_date
        .map(|d| d.to_string())
        .unwrap_or_else(|| "never".to_string());
    result.add_message(CmdMessage::success(format!(
        "Reviewed {} ({} time(s)); next review {}",
        key, meta.review_count, next
    )));
    result.metadata.push((key.clone(), meta));
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::mem_backend::MemBackend;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_info_defaults_without_sidecar() {
        let backend = MemBackend::with_notes([("A", "")]);
        let res = info(&backend, &Key::from("A")).unwrap();
        assert_eq!(res.metadata[0].1, NoteMetadata::default());
        assert!(info(&backend, &Key::from("B")).is_err());
    }

    #[test]
    fn test_review_walks_the_ladder() {
        let backend = MemBackend::with_notes([("A", "")]);
        let key = Key::from("A");
        review_on(&backend, &key, day(2024, 1, 1)).unwrap();
        let res = review_on(&backend, &key, day(2024, 1, 2)).unwrap();
        let meta = &res.metadata[0].1;
        assert_eq!(meta.review_count, 2);
        assert_eq!(meta.next_review_date, Some(day(2024, 1, 4)));
        assert_eq!(backend.read_metadata(&key).unwrap().as_ref(), Some(meta));
    }
}
