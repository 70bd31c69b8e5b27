//! # Titles
//!
//! A note's display title lives in two places: the pure-name segment of its key,
//! and the first level-1 heading of its markdown content. This module holds the
//! content-side helpers; keeping the two in step is the job of
//! [`commands::save`](crate::commands::save).
//!
//! Headings are located with `pulldown-cmark`, so a `# line` inside a fenced code
//! block is not mistaken for a title, and setext headings (`Title\n=====`) count.
//!
//! ## Sanitizing
//!
//! Heading text is arbitrary user text, a key segment is not. [`sanitize_file_name`]
//! replaces characters that are illegal in file names on common platforms, the key
//! delimiter and line breaks with spaces, trims, and caps the length in characters.

use crate::codec::{DELIMITER, ILLEGAL_FILE_CHARS};
use pulldown_cmark::{Event, HeadingLevel, Parser, Tag, TagEnd};
use std::ops::Range;

/// Default cap for names derived from headings.
pub const DEFAULT_MAX_TITLE_LEN: usize = 100;

/// A level-1 heading found in note content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    /// Plain text of the heading (inline markup removed).
    pub text: String,
    /// Byte range of the heading block in the source, without its trailing line break.
    pub span: Range<usize>,
}

/// Locate the first level-1 heading in `content`.
pub fn find_h1(content: &str) -> Option<Heading> {
    let mut parser = Parser::new(content).into_offset_iter();

    while let Some((event, range)) = parser.next() {
        let Event::Start(Tag::Heading {
            level: HeadingLevel::H1,
            ..
        }) = event
        else {
            continue;
        };

        let mut text = String::new();
        for (inner, _) in parser.by_ref() {
            match inner {
                Event::Text(t) | Event::Code(t) => text.push_str(&t),
                Event::SoftBreak | Event::HardBreak => text.push(' '),
                Event::End(TagEnd::Heading(_)) => break,
                _ => {}
            }
        }

        let block = &content[range.clone()];
        let end = range.start + block.trim_end_matches(['\n', '\r']).len();
        return Some(Heading {
            text: text.trim().to_string(),
            span: range.start..end,
        });
    }
    None
}

/// Text of the first level-1 heading, if any.
pub fn extract_title(content: &str) -> Option<String> {
    find_h1(content).map(|h| h.text)
}

/// Turn arbitrary text into something usable as a key segment.
pub fn sanitize_file_name(name: &str, max_len: usize) -> String {
    let replaced: String = name
        .chars()
        .map(|c| {
            if ILLEGAL_FILE_CHARS.contains(&c) || c == DELIMITER {
                ' '
            } else {
                c
            }
        })
        .collect();
    let trimmed = replaced.trim();
    if trimmed.chars().count() > max_len {
        trimmed.chars().take(max_len).collect::<String>().trim_end().to_string()
    } else {
        trimmed.to_string()
    }
}

/// The name a note would get from its content, if the content has a usable heading.
pub fn derive_name(content: &str, max_len: usize) -> Option<String> {
    extract_title(content)
        .map(|t| sanitize_file_name(&t, max_len))
        .filter(|t| !t.is_empty() && t != "." && t != "..")
}

/// Inline markdown that would be consumed by the parser instead of read as text.
const MARKDOWN_SPECIAL: &[char] = &['\\', '`', '*', '_', '[', ']', '<', '>', '#', '&', '~', '!'];

/// A level-1 heading line whose text reads back as exactly `title`.
pub fn heading_line(title: &str) -> String {
    let mut line = String::with_capacity(title.len() + 2);
    line.push_str("# ");
    for c in title.chars() {
        if MARKDOWN_SPECIAL.contains(&c) {
            line.push('\\');
        }
        line.push(c);
    }
    line
}

/// Replace the first level-1 heading with [`heading_line`], or insert one at the top.
pub fn rewrite_h1(content: &str, title: &str) -> String {
    let line = heading_line(title);
    match find_h1(content) {
        Some(heading) => {
            let mut out = String::with_capacity(content.len() + line.len());
            out.push_str(&content[..heading.span.start]);
            out.push_str(&line);
            out.push_str(&content[heading.span.end..]);
            out
        }
        None if content.is_empty() => format!("{}\n", line),
        None => format!("{}\n\n{}", line, content),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_simple() {
        assert_eq!(extract_title("# Hello\nbody"), Some("Hello".to_string()));
    }

    #[test]
    fn test_extract_skips_leading_text_and_h2() {
        let content = "intro line\n\n## Section\n\n# Real Title\n";
        assert_eq!(extract_title(content), Some("Real Title".to_string()));
    }

    #[test]
    fn test_extract_ignores_code_fence() {
        let content = "```\n# not a title\n```\n\n# Title\n";
        assert_eq!(extract_title(content), Some("Title".to_string()));
    }

    #[test]
    fn test_extract_strips_inline_markup() {
        assert_eq!(
            extract_title("# Hello *big* `world`"),
            Some("Hello big world".to_string())
        );
    }

    #[test]
    fn test_extract_setext() {
        assert_eq!(extract_title("Title\n=====\n\nbody"), Some("Title".to_string()));
    }

    #[test]
    fn test_extract_none() {
        assert_eq!(extract_title("just text\n## sub"), None);
        assert_eq!(extract_title(""), None);
    }

    #[test]
    fn test_sanitize_replaces_illegal_and_delimiter() {
        assert_eq!(sanitize_file_name("a/b:c", 100), "a b c");
        assert_eq!(sanitize_file_name("snake_case", 100), "snake case");
        assert_eq!(sanitize_file_name("  what?  ", 100), "what");
    }

    #[test]
    fn test_sanitize_caps_length_in_chars() {
        let long = "é".repeat(150);
        assert_eq!(sanitize_file_name(&long, 100).chars().count(), 100);
    }

    #[test]
    fn test_derive_name_empty_heading() {
        assert_eq!(derive_name("# \nbody", 100), None);
        assert_eq!(derive_name("# ???", 100), None);
    }

    #[test]
    fn test_rewrite_replaces_first_h1_only() {
        let content = "# Old\nbody\n# Second\n";
        assert_eq!(rewrite_h1(content, "New"), "# New\nbody\n# Second\n");
    }

    #[test]
    fn test_rewrite_keeps_text_before_heading() {
        let content = "preface\n\n# Old\n\nbody";
        assert_eq!(rewrite_h1(content, "New"), "preface\n\n# New\n\nbody");
    }

    #[test]
    fn test_rewrite_inserts_when_missing() {
        assert_eq!(rewrite_h1("body only", "New"), "# New\n\nbody only");
        assert_eq!(rewrite_h1("", "New"), "# New\n");
    }

    #[test]
    fn test_rewrite_then_extract_agree() {
        let rewritten = rewrite_h1("# Hello\nbody", "World");
        assert_eq!(rewritten, "# World\nbody");
        assert_eq!(extract_title(&rewritten), Some("World".to_string()));
    }

    #[test]
    fn test_heading_line_escapes_inline_markup() {
        assert_eq!(heading_line("Plain Title"), "# Plain Title");
        assert_eq!(heading_line("a `b` [c]"), "# a \\`b\\` \\[c\\]");
    }

    #[test]
    fn test_marked_up_title_reads_back_verbatim() {
        for title in ["a `b` c", "[link](x)", "C# & F#", "~~old~~ !new", "&amp; entity"] {
            let rewritten = rewrite_h1("# Old\nbody", title);
            assert_eq!(extract_title(&rewritten), Some(title.to_string()), "{}", rewritten);
            assert_eq!(derive_name(&rewritten, 100), Some(title.to_string()));
        }
    }

    #[test]
    fn test_derive_name_rejects_dot_segments() {
        assert_eq!(derive_name("# ..\n", 100), None);
        assert_eq!(derive_name("# .\n", 100), None);
    }
}
