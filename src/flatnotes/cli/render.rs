//! # Rendering
//!
//! Turns command results into terminal text. Layout (tree branches, width,
//! truncation, padding) is computed on plain strings with `unicode-width`; color is
//! applied last so it never affects alignment.

use chrono::NaiveDate;
use colored::Colorize;
use flatnotes::commands::{CmdMessage, MessageLevel};
use flatnotes::model::{Key, Note, NoteMetadata};
use flatnotes::namespace::{CategoryNode, Tree, TreeKind, TreeNode};
use std::collections::BTreeMap;
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub const LINE_WIDTH: usize = 100;
pub const TIME_WIDTH: usize = 16;
const CURRENT_MARKER: &str = "●";

pub fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

/// What the tree shows on the right of a note line.
#[derive(Debug, Default)]
pub struct TreeAnnotations<'a> {
    pub metadata: BTreeMap<Key, NoteMetadata>,
    pub current: Option<&'a Key>,
}

pub fn render_tree(tree: &Tree, notes: &TreeAnnotations<'_>, today: NaiveDate) -> String {
    let mut out = String::new();
    if let TreeKind::Search(query) = &tree.kind {
        out.push_str(&format!("{}\n", format!("Search: {}", query).dimmed()));
    }
    if tree.root.is_empty() {
        out.push_str("No notes found.\n");
        return out;
    }
    render_children(&tree.root, "", notes, today, &mut out);
    out
}

fn render_children(
    node: &CategoryNode,
    prefix: &str,
    notes: &TreeAnnotations<'_>,
    today: NaiveDate,
    out: &mut String,
) {
    let children = node.children();
    let count = children.len();
    for (i, child) in children.into_iter().enumerate() {
        let last = i + 1 == count;
        let branch = if last { "└── " } else { "├── " };
        match child {
            TreeNode::Category(category) => {
                let label = format!("{}/", category.name);
                out.push_str(&format!("{}{}{}\n", prefix, branch, label.blue().bold()));
                let nested = format!("{}{}", prefix, if last { "    " } else { "│   " });
                render_children(category, &nested, notes, today, out);
            }
            TreeNode::Note(leaf) => {
                let is_current = notes.current == Some(&leaf.key);
                let marker = if is_current { CURRENT_MARKER } else { " " };
                let left = format!("{}{}", prefix, branch);
                let meta = notes.metadata.get(&leaf.key);
                let right = annotation(meta, today);

                let available = LINE_WIDTH.saturating_sub(left.width() + 2 + TIME_WIDTH);
                let name = truncate_to_width(&leaf.name, available);
                let padding = available.saturating_sub(name.width());

                let name = if is_current {
                    name.bold().to_string()
                } else {
                    name
                };
                let right = if meta.is_some_and(|m| m.is_due(today)) {
                    right.yellow()
                } else {
                    right.dimmed()
                };
                out.push_str(&format!(
                    "{}{} {}{}{}\n",
                    left,
                    marker.green(),
                    name,
                    " ".repeat(padding),
                    right
                ));
            }
        }
    }
}

fn annotation(meta: Option<&NoteMetadata>, today: NaiveDate) -> String {
    let text = match meta {
        Some(m) if m.is_due(today) => "review due".to_string(),
        Some(NoteMetadata {
            create_date: Some(created),
            ..
        }) => format_days_ago(*created, today),
        _ => String::new(),
    };
    format!("{:>width$}", text, width = TIME_WIDTH)
}

fn format_days_ago(date: NaiveDate, today: NaiveDate) -> String {
    let days = today.signed_duration_since(date).num_days();
    if days <= 0 {
        return "today".to_string();
    }
    let formatter = Formatter::new();
    let elapsed = std::time::Duration::from_secs(days as u64 * 24 * 60 * 60);
    formatter.convert(elapsed)
}

pub fn truncate_to_width(s: &str, max_width: usize) -> String {
    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }

    result
}

pub fn render_note(note: &Note) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", note.key.to_string().yellow()));
    out.push_str("--------------------------------\n");
    out.push_str(&note.content);
    if !note.content.ends_with('\n') {
        out.push('\n');
    }
    out
}

pub fn render_metadata(key: &Key, meta: &NoteMetadata) -> String {
    let none = || "-".to_string();
    let mut lines = vec![
        format!("{}", key.to_string().yellow()),
        format!(
            "  created      {}",
            meta.create_date.map(|d| d.to_string()).unwrap_or_else(none)
        ),
        format!("  mood         {}", meta.last_mood.clone().unwrap_or_else(none)),
        format!("  reviews      {}", meta.review_count),
        format!(
            "  next review  {}",
            meta.next_review_date
                .map(|d| d.to_string())
                .unwrap_or_else(none)
        ),
    ];
    for (tag, value) in &meta.tags {
        lines.push(format!("  {:<12} {}", tag, value));
    }
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

pub fn render_text_list(lines: &[String], empty_message: &str) -> String {
    if lines.is_empty() {
        return format!("{}\n", empty_message);
    }
    let mut out = lines.join("\n");
    out.push('\n');
    out
}
