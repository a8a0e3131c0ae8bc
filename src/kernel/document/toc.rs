//! Table of contents extraction.

use super::markdown::parse_fence_marker;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocItem {
    pub id: String,
    pub text: String,
    pub level: u8,
}

/// ATX headings (`#` to `######`) in document order. Lines inside fenced code
/// blocks are ignored.
pub fn generate(src: &str) -> Vec<TocItem> {
    let mut items = Vec::new();
    let mut fence: Option<(u8, usize)> = None;

    for line in src.lines() {
        let trimmed = line.trim_start();
        if let Some((marker, run_len, rest)) = parse_fence_marker(trimmed) {
            match fence {
                None => fence = Some((marker, run_len)),
                Some((open, open_len))
                    if open == marker && run_len >= open_len && rest.trim().is_empty() =>
                {
                    fence = None
                }
                Some(_) => {}
            }
            continue;
        }
        if fence.is_some() {
            continue;
        }

        if let Some((level, text)) = parse_heading(line) {
            items.push(TocItem {
                id: slugify(text),
                text: text.to_string(),
                level,
            });
        }
    }

    items
}

/// Returns the level and trimmed text of an ATX heading line.
fn parse_heading(line: &str) -> Option<(u8, &str)> {
    let hashes = line.len() - line.trim_start_matches('#').len();
    if !(1..=6).contains(&hashes) {
        return None;
    }
    let rest = &line[hashes..];
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let text = strip_closing_hashes(rest.trim());
    if text.is_empty() {
        return None;
    }
    Some((hashes as u8, text))
}

/// Drops an optional closing `#` sequence (`## Title ##` → `Title`). The run
/// must be separated from the text by a space, so `C#` keeps its hash.
pub(crate) fn strip_closing_hashes(content: &str) -> &str {
    let stripped = content.trim_end_matches('#');
    if stripped.len() == content.len() {
        content
    } else if stripped.is_empty() {
        ""
    } else if stripped.ends_with(' ') {
        stripped.trim_end()
    } else {
        content
    }
}

/// Anchor id for a heading: lowercased, whitespace runs become `-`, and only
/// ASCII word characters, `-`, Hiragana, Katakana and CJK ideographs are kept.
pub fn slugify(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;

    for ch in text.trim().chars().flat_map(char::to_lowercase) {
        if ch.is_whitespace() {
            if !in_space {
                out.push('-');
                in_space = true;
            }
            continue;
        }
        in_space = false;
        if is_anchor_char(ch) {
            out.push(ch);
        }
    }

    out
}

fn is_anchor_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric()
        || ch == '_'
        || ch == '-'
        || ('\u{3040}'..='\u{309f}').contains(&ch)
        || ('\u{30a0}'..='\u{30ff}').contains(&ch)
        || ('\u{4e00}'..='\u{9faf}').contains(&ch)
}

#[cfg(test)]
#[path = "../../../tests/unit/kernel/document/toc.rs"]
mod tests;
