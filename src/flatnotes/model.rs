//! # Domain Model
//!
//! A note has exactly one persistent identifier, its [`Key`]: the flat file name
//! (without extension) under which its content is stored. Folders do not exist on
//! disk. They are encoded inside the key as leading segments joined by
//! [`DELIMITER`](crate::codec::DELIMITER):
//!
//! ```text
//! Study_Java_Generics.md      key = "Study_Java_Generics"
//! └─────┴────┴────────        categories = ["Study", "Java"], name = "Generics"
//! ```
//!
//! [`NotePath`] is the structured form of a key; the [`codec`](crate::codec)
//! module converts between the two.
//!
//! ## Sidecar Metadata
//!
//! A note may carry a JSON sidecar sharing its base name (`Study_Java_Generics.json`)
//! holding [`NoteMetadata`]. The field names match the sidecars written by earlier
//! versions of the application (`lastMood`, `reviewCount`, ...), so existing stores
//! load unchanged. The sidecar follows the note through every rename.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The flat, unique, persistent name of a note.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Key(String);

impl Key {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Key {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Key {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Structured form of a key: the category segments leading to the note, and the
/// note's own ("pure") name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct NotePath {
    pub categories: Vec<String>,
    pub name: String,
}

impl NotePath {
    pub fn new(categories: Vec<String>, name: impl Into<String>) -> Self {
        Self {
            categories,
            name: name.into(),
        }
    }

    pub fn root(name: impl Into<String>) -> Self {
        Self::new(Vec::new(), name)
    }

    /// Same categories, different pure name.
    pub fn with_name(&self, name: impl Into<String>) -> Self {
        Self::new(self.categories.clone(), name)
    }

    /// Same pure name, different categories.
    pub fn with_categories(&self, categories: Vec<String>) -> Self {
        Self::new(categories, self.name.clone())
    }
}

/// Spaced-repetition ladder, in days, indexed by review count.
const REVIEW_INTERVALS: [u64; 6] = [1, 2, 4, 7, 15, 30];

/// Per-note attributes stored in the sidecar file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NoteMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub last_mood: Option<String>,
    pub create_date: Option<NaiveDate>,
    pub next_review_date: Option<NaiveDate>,
    pub review_count: u32,
    pub tags: BTreeMap<String, String>,
}

impl NoteMetadata {
    pub fn created_on(date: NaiveDate) -> Self {
        Self {
            create_date: Some(date),
            ..Default::default()
        }
    }

    /// Record a review on `today` and schedule the next one.
    pub fn record_review(&mut self, today: NaiveDate) {
        self.review_count = self.review_count.saturating_add(1);
        let step = (self.review_count as usize).min(REVIEW_INTERVALS.len()) - 1;
        self.next_review_date = today.checked_add_days(Days::new(REVIEW_INTERVALS[step]));
    }

    pub fn is_due(&self, today: NaiveDate) -> bool {
        self.next_review_date.is_some_and(|d| d <= today)
    }
}

/// A note as handed to callers: its key plus full content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub key: Key,
    pub content: String,
}
