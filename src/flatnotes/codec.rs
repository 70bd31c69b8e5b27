//! # Key Codec
//!
//! Pure conversions between a flat [`Key`] and its structured [`NotePath`].
//!
//! - [`decode`] splits on [`DELIMITER`]: every segment but the last is a category,
//!   the last is the pure name. A key without a delimiter lives at the root.
//! - [`encode`] joins categories and name with the delimiter. Whitespace-only
//!   category segments are dropped rather than producing doubled, leading or
//!   trailing delimiters. An empty pure name is rejected.
//!
//! For every valid path `p`, `decode(encode(p)) == p`, and for every well-formed
//! key `k`, `encode(decode(k)) == k`.

use crate::error::{NoteError, Result};
use crate::model::{Key, NotePath};

/// Separator between path segments inside a key.
pub const DELIMITER: char = '_';

/// Characters that cannot appear in a file name on at least one supported platform.
pub const ILLEGAL_FILE_CHARS: &[char] = &['\\', '/', ':', '*', '?', '"', '<', '>', '|', '\r', '\n'];

pub fn decode(key: &Key) -> NotePath {
    let mut segments: Vec<String> = key.as_str().split(DELIMITER).map(str::to_string).collect();
    // split always yields at least one item
    let name = segments.pop().unwrap_or_default();
    NotePath::new(segments, name)
}

pub fn encode(path: &NotePath) -> Result<Key> {
    validate_name(&path.name)?;
    let mut raw = String::new();
    for category in &path.categories {
        if category.trim().is_empty() {
            continue;
        }
        validate_segment(category)?;
        raw.push_str(category);
        raw.push(DELIMITER);
    }
    raw.push_str(&path.name);
    Ok(Key::new(raw))
}

/// A pure name must be non-empty and a legal file name segment.
pub fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(NoteError::InvalidName("name cannot be empty".to_string()));
    }
    validate_segment(name)
}

/// A segment becomes part of a file name, so it must not contain the delimiter,
/// a path separator or any other illegal file character, nor be `.` or `..`.
pub fn validate_segment(segment: &str) -> Result<()> {
    if segment.contains(DELIMITER) {
        return Err(NoteError::InvalidName(format!(
            "'{}' contains the reserved character '{}'",
            segment, DELIMITER
        )));
    }
    if let Some(c) = segment.chars().find(|c| ILLEGAL_FILE_CHARS.contains(c)) {
        return Err(NoteError::InvalidName(format!(
            "'{}' contains the illegal character {:?}",
            segment, c
        )));
    }
    if matches!(segment.trim(), "." | "..") {
        return Err(NoteError::InvalidName(format!(
            "'{}' is not a usable name",
            segment
        )));
    }
    Ok(())
}

/// Validate every segment of a category path. Empty paths (the root) are valid.
pub fn validate_category_path(categories: &[String]) -> Result<()> {
    for segment in categories {
        if segment.trim().is_empty() {
            return Err(NoteError::InvalidName(
                "category name cannot be empty".to_string(),
            ));
        }
        validate_segment(segment)?;
    }
    Ok(())
}

/// True when no segment of the key is empty, i.e. the tree can display it.
pub fn is_well_formed(key: &Key) -> bool {
    key.as_str().split(DELIMITER).all(|s| !s.is_empty())
}

/// The flat prefix shared by every key inside `categories`, delimiter included.
///
/// `["Study", "Java"]` gives `"Study_Java_"`; the root gives `""`.
pub fn category_prefix(categories: &[String]) -> String {
    let mut prefix = String::new();
    for segment in categories {
        prefix.push_str(segment);
        prefix.push(DELIMITER);
    }
    prefix
}

/// Parse a category path typed by a user, with `/` between segments.
///
/// `"Study/Java"` gives `["Study", "Java"]`; blank input gives the root.
pub fn parse_category_arg(input: &str) -> Vec<String> {
    input
        .split('/')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
