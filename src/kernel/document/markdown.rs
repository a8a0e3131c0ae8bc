//! Markdown source to `DocumentTree`.
//!
//! Line-oriented block classification followed by a byte scanner for inline
//! spans. Covers the subset a documentation viewer needs; anything unknown
//! falls back to paragraph text.

use super::toc::{slugify, strip_closing_hashes};
use super::tree::{DocumentTree, NodeId, NodeKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockKind {
    Blank,
    Heading(u8),
    HorizontalRule,
    BlockQuote,
    UnorderedList,
    OrderedList,
    Paragraph,
}

pub fn parse(src: &str) -> DocumentTree {
    let mut tree = DocumentTree::new();
    let root = tree.root();
    let lines: Vec<&str> = src.lines().collect();
    let mut paragraph: Vec<&str> = Vec::new();
    let mut i = 0usize;

    while i < lines.len() {
        let line = lines[i];
        let trimmed = line.trim_start();

        if let Some((marker, run_len, info)) = parse_fence_marker(trimmed) {
            flush_paragraph(&mut tree, root, &mut paragraph);
            i = push_fenced_code(&mut tree, root, &lines, i + 1, marker, run_len, info);
            continue;
        }

        if paragraph.is_empty() && is_indented_code(line) {
            i = push_indented_code(&mut tree, root, &lines, i);
            continue;
        }

        if let Some(end) = detect_table(&lines, i) {
            flush_paragraph(&mut tree, root, &mut paragraph);
            push_table(&mut tree, root, &lines[i..end]);
            i = end;
            continue;
        }

        match classify_line(trimmed) {
            BlockKind::Blank => {
                flush_paragraph(&mut tree, root, &mut paragraph);
                i += 1;
            }
            BlockKind::Heading(level) => {
                flush_paragraph(&mut tree, root, &mut paragraph);
                push_heading(&mut tree, root, trimmed, level);
                i += 1;
            }
            BlockKind::HorizontalRule => {
                flush_paragraph(&mut tree, root, &mut paragraph);
                tree.append(root, NodeKind::ThematicBreak);
                i += 1;
            }
            BlockKind::BlockQuote => {
                flush_paragraph(&mut tree, root, &mut paragraph);
                i = push_blockquote(&mut tree, root, &lines, i);
            }
            BlockKind::UnorderedList => {
                flush_paragraph(&mut tree, root, &mut paragraph);
                push_list_item(&mut tree, root, &trimmed[2..], false);
                i += 1;
            }
            BlockKind::OrderedList => {
                flush_paragraph(&mut tree, root, &mut paragraph);
                let dot = trimmed.find(". ").unwrap_or(0);
                push_list_item(&mut tree, root, &trimmed[dot + 2..], true);
                i += 1;
            }
            BlockKind::Paragraph => {
                paragraph.push(line.trim());
                i += 1;
            }
        }
    }

    flush_paragraph(&mut tree, root, &mut paragraph);
    tree
}

fn classify_line(trimmed: &str) -> BlockKind {
    if trimmed.is_empty() {
        return BlockKind::Blank;
    }

    if let Some(rest) = trimmed.strip_prefix('#') {
        let hashes = 1 + rest.len() - rest.trim_start_matches('#').len();
        let after_hashes = &trimmed[hashes..];
        if hashes <= 6 && (after_hashes.is_empty() || after_hashes.starts_with([' ', '\t'])) {
            return BlockKind::Heading(hashes as u8);
        }
    }

    // Checked before lists so `* * *` is a rule, not an item.
    if is_horizontal_rule(trimmed) {
        return BlockKind::HorizontalRule;
    }

    if trimmed.starts_with('>') {
        return BlockKind::BlockQuote;
    }

    if trimmed.starts_with("- ") || trimmed.starts_with("* ") || trimmed.starts_with("+ ") {
        return BlockKind::UnorderedList;
    }

    if let Some(dot_pos) = trimmed.find(". ") {
        if dot_pos > 0 && dot_pos <= 9 && trimmed[..dot_pos].chars().all(|c| c.is_ascii_digit())
        {
            return BlockKind::OrderedList;
        }
    }

    BlockKind::Paragraph
}

fn is_horizontal_rule(trimmed: &str) -> bool {
    let Some(marker) = trimmed.chars().next() else {
        return false;
    };
    if !matches!(marker, '-' | '*' | '_') {
        return false;
    }
    let count = trimmed.chars().filter(|c| *c == marker).count();
    count >= 3 && trimmed.chars().all(|c| c == marker || c == ' ')
}

fn is_indented_code(line: &str) -> bool {
    (line.starts_with("    ") || line.starts_with('\t')) && !line.trim().is_empty()
}

pub(crate) fn parse_fence_marker(trimmed: &str) -> Option<(u8, usize, &str)> {
    let bytes = trimmed.as_bytes();
    let marker = *bytes.first()?;
    if marker != b'`' && marker != b'~' {
        return None;
    }

    let mut run_len = 0;
    while run_len < bytes.len() && bytes[run_len] == marker {
        run_len += 1;
    }
    if run_len < 3 {
        return None;
    }

    Some((marker, run_len, &trimmed[run_len..]))
}

fn is_closing_fence(trimmed: &str, marker: u8, min_len: usize) -> bool {
    match parse_fence_marker(trimmed) {
        Some((m, len, rest)) => m == marker && len >= min_len && rest.trim().is_empty(),
        None => false,
    }
}

/// Consumes lines from `start` up to the closing fence. An unclosed fence runs
/// to the end of the document. Returns the index of the first unconsumed line.
fn push_fenced_code(
    tree: &mut DocumentTree,
    parent: NodeId,
    lines: &[&str],
    start: usize,
    marker: u8,
    run_len: usize,
    info: &str,
) -> usize {
    let lang = info
        .split_whitespace()
        .next()
        .map(str::to_string)
        .filter(|s| !s.is_empty());

    let mut end = start;
    while end < lines.len() && !is_closing_fence(lines[end].trim_start(), marker, run_len) {
        end += 1;
    }

    let code = lines[start..end].join("\n");
    if let Some(block) = tree.append(parent, NodeKind::CodeBlock { lang }) {
        tree.append_text(block, &code);
    }

    // Skip the closing fence when there is one.
    (end + 1).min(lines.len())
}

fn push_indented_code(
    tree: &mut DocumentTree,
    parent: NodeId,
    lines: &[&str],
    start: usize,
) -> usize {
    let mut end = start;
    let mut body = Vec::new();
    while end < lines.len() {
        let line = lines[end];
        if let Some(rest) = line.strip_prefix("    ").or_else(|| line.strip_prefix('\t')) {
            body.push(rest);
        } else if line.trim().is_empty() {
            body.push("");
        } else {
            break;
        }
        end += 1;
    }
    while body.last().is_some_and(|l| l.is_empty()) {
        body.pop();
    }

    if let Some(block) = tree.append(parent, NodeKind::CodeBlock { lang: None }) {
        tree.append_text(block, &body.join("\n"));
    }
    end
}

fn push_heading(tree: &mut DocumentTree, parent: NodeId, trimmed: &str, level: u8) {
    let content = strip_closing_hashes(trimmed[level as usize..].trim());
    let id = slugify(content);
    if let Some(heading) = tree.append(parent, NodeKind::Heading { level, id }) {
        parse_inline(tree, heading, content);
    }
}

fn push_blockquote(tree: &mut DocumentTree, parent: NodeId, lines: &[&str], start: usize) -> usize {
    let Some(quote) = tree.append(parent, NodeKind::BlockQuote) else {
        return start + 1;
    };

    let mut end = start;
    let mut paragraph: Vec<&str> = Vec::new();
    while end < lines.len() {
        let Some(rest) = lines[end].trim_start().strip_prefix('>') else {
            break;
        };
        let rest = rest.trim();
        if rest.is_empty() {
            flush_paragraph(tree, quote, &mut paragraph);
        } else {
            paragraph.push(rest);
        }
        end += 1;
    }
    flush_paragraph(tree, quote, &mut paragraph);
    end
}

fn push_list_item(tree: &mut DocumentTree, parent: NodeId, content: &str, ordered: bool) {
    if let Some(item) = tree.append(parent, NodeKind::ListItem { ordered }) {
        parse_inline(tree, item, content.trim());
    }
}

fn flush_paragraph(tree: &mut DocumentTree, parent: NodeId, lines: &mut Vec<&str>) {
    if lines.is_empty() {
        return;
    }
    let joined = lines.join(" ");
    lines.clear();
    if let Some(paragraph) = tree.append(parent, NodeKind::Paragraph) {
        parse_inline(tree, paragraph, &joined);
    }
}

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

/// A table is a row line followed by an alignment row. Returns the index one
/// past the last body row.
fn detect_table(lines: &[&str], start: usize) -> Option<usize> {
    let header = parse_table_cells(lines.get(start)?)?;
    let separator = parse_table_cells(lines.get(start + 1)?)?;
    if separator.len() != header.len() || !separator.iter().all(|c| is_alignment_cell(c)) {
        return None;
    }

    let mut end = start + 2;
    while end < lines.len() && !lines[end].trim().is_empty() && lines[end].contains('|') {
        end += 1;
    }
    Some(end)
}

fn is_alignment_cell(cell: &str) -> bool {
    let core = cell.trim().trim_matches(':');
    core.len() >= 3 && core.chars().all(|ch| ch == '-')
}

fn parse_table_cells(src: &str) -> Option<Vec<&str>> {
    let src = src.trim();
    if !src.contains('|') {
        return None;
    }

    let bytes = src.as_bytes();
    let mut separators = Vec::new();
    let mut i = 0usize;
    while i < bytes.len() {
        if bytes[i] == b'\\' {
            i = i.saturating_add(2);
            continue;
        }
        if bytes[i] == b'|' {
            separators.push(i);
        }
        i += 1;
    }
    if separators.is_empty() {
        return None;
    }

    let mut segments = Vec::with_capacity(separators.len() + 1);
    let mut start = 0usize;
    for sep in separators {
        segments.push(&src[start..sep]);
        start = sep + 1;
    }
    segments.push(&src[start..]);

    if src.starts_with('|') && !segments.is_empty() {
        segments.remove(0);
    }
    if src.ends_with('|') && !segments.is_empty() {
        segments.pop();
    }
    if segments.is_empty() {
        return None;
    }

    Some(segments.into_iter().map(str::trim).collect())
}

fn push_table(tree: &mut DocumentTree, parent: NodeId, lines: &[&str]) {
    let Some(table) = tree.append(parent, NodeKind::Table) else {
        return;
    };
    // lines[1] is the alignment row.
    for (idx, line) in lines.iter().enumerate() {
        if idx == 1 {
            continue;
        }
        let Some(cells) = parse_table_cells(line) else {
            continue;
        };
        let Some(row) = tree.append(table, NodeKind::TableRow) else {
            continue;
        };
        for cell in cells {
            if let Some(cell_node) = tree.append(row, NodeKind::TableCell) {
                parse_inline(tree, cell_node, cell);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Inline spans
// ---------------------------------------------------------------------------

fn parse_inline(tree: &mut DocumentTree, parent: NodeId, src: &str) {
    let bytes = src.as_bytes();
    let len = bytes.len();
    let mut plain_start = 0usize;
    let mut i = 0usize;

    while i < len {
        let b = bytes[i];

        if b == b'\\' && i + 1 < len && bytes[i + 1].is_ascii_punctuation() {
            tree.append_text(parent, &src[plain_start..i]);
            plain_start = i + 1;
            i += 2;
            continue;
        }

        if b == b'*' && i + 1 < len && bytes[i + 1] == b'*' {
            if let Some((content, end)) = find_closing(src, i + 2, "**") {
                tree.append_text(parent, &src[plain_start..i]);
                if let Some(node) = tree.append(parent, NodeKind::Strong) {
                    parse_inline(tree, node, content);
                }
                i = end;
                plain_start = i;
                continue;
            }
        }

        if b == b'*' && (i + 1 >= len || bytes[i + 1] != b'*') {
            if let Some((content, end)) = find_closing_single(src, i + 1, b'*') {
                tree.append_text(parent, &src[plain_start..i]);
                if let Some(node) = tree.append(parent, NodeKind::Emphasis) {
                    parse_inline(tree, node, content);
                }
                i = end;
                plain_start = i;
                continue;
            }
        }

        if b == b'~' && i + 1 < len && bytes[i + 1] == b'~' {
            if let Some((content, end)) = find_closing(src, i + 2, "~~") {
                tree.append_text(parent, &src[plain_start..i]);
                if let Some(node) = tree.append(parent, NodeKind::Strikethrough) {
                    parse_inline(tree, node, content);
                }
                i = end;
                plain_start = i;
                continue;
            }
        }

        if b == b'`' {
            if let Some((content, end)) = parse_code_span(src, i) {
                tree.append_text(parent, &src[plain_start..i]);
                if let Some(node) = tree.append(parent, NodeKind::InlineCode) {
                    tree.append_text(node, content);
                }
                i = end;
                plain_start = i;
                continue;
            }
        }

        if b == b'[' {
            if let Some((text, href, end)) = parse_link(src, i) {
                tree.append_text(parent, &src[plain_start..i]);
                let href = href.trim().to_string();
                if let Some(node) = tree.append(parent, NodeKind::Link { href }) {
                    parse_inline(tree, node, text);
                }
                i = end;
                plain_start = i;
                continue;
            }
        }

        i += 1;
    }

    tree.append_text(parent, &src[plain_start..]);
}

fn find_closing<'a>(src: &'a str, start: usize, marker: &str) -> Option<(&'a str, usize)> {
    let rest = src.get(start..)?;
    let pos = rest.find(marker)?;
    if pos == 0 {
        return None;
    }
    Some((&rest[..pos], start + pos + marker.len()))
}

fn find_closing_single(src: &str, start: usize, marker: u8) -> Option<(&str, usize)> {
    let bytes = src.as_bytes();
    let rel = memchr::memchr(marker, bytes.get(start..)?)?;
    if rel == 0 {
        return None;
    }
    Some((&src[start..start + rel], start + rel + 1))
}

/// Returns the span content and the index just past the closing backticks.
fn parse_code_span(src: &str, start: usize) -> Option<(&str, usize)> {
    let bytes = src.as_bytes();
    if bytes.get(start).copied() != Some(b'`') {
        return None;
    }

    let mut marker_len = 0;
    while start + marker_len < bytes.len() && bytes[start + marker_len] == b'`' {
        marker_len += 1;
    }

    let content_start = start + marker_len;
    let mut i = content_start;
    while i < bytes.len() {
        if bytes[i] != b'`' {
            i += 1;
            continue;
        }

        let mut run_len = 0;
        while i + run_len < bytes.len() && bytes[i + run_len] == b'`' {
            run_len += 1;
        }
        if run_len == marker_len {
            if i == content_start {
                return None;
            }
            return Some((&src[content_start..i], i + marker_len));
        }
        i += run_len;
    }

    None
}

/// `[text](href)` → (text, href, index past `)`).
fn parse_link(src: &str, start: usize) -> Option<(&str, &str, usize)> {
    let bytes = src.as_bytes();
    if bytes.get(start).copied() != Some(b'[') {
        return None;
    }

    let mut text_end = None;
    let mut depth = 0usize;
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'[' => {
                depth += 1;
                i += 1;
            }
            b']' => {
                if depth == 0 {
                    text_end = Some(i);
                    break;
                }
                depth -= 1;
                i += 1;
            }
            _ => i += 1,
        }
    }

    let text_end = text_end?;
    let text = &src[start + 1..text_end];
    if text.is_empty() || bytes.get(text_end + 1).copied() != Some(b'(') {
        return None;
    }

    let href_start = text_end + 2;
    let mut paren_depth = 0usize;
    let mut j = href_start;
    while j < bytes.len() {
        match bytes[j] {
            b'\\' => j += 2,
            b'(' => {
                paren_depth += 1;
                j += 1;
            }
            b')' => {
                if paren_depth == 0 {
                    return Some((text, &src[href_start..j], j + 1));
                }
                paren_depth -= 1;
                j += 1;
            }
            _ => j += 1,
        }
    }

    None
}

#[cfg(test)]
#[path = "../../../tests/unit/kernel/document/markdown.rs"]
mod tests;
