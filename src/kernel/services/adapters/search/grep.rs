//! Directory content search over Markdown files.
//!
//! Walks sequentially with entries sorted by file name, so results come back
//! in a stable order: directory by directory, file by file, line by line.

use crate::core::Service;
use crate::kernel::page_search::LiteralPattern;
use crate::kernel::services::ports::search::{ContentSearch, GrepResult, Result, SearchError};
use crate::kernel::services::ports::settings::SearchSettings;
use ignore::WalkBuilder;
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct GrepService {
    settings: SearchSettings,
}

impl GrepService {
    pub fn new(settings: SearchSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &SearchSettings {
        &self.settings
    }

    fn is_searchable(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.settings.matches_extension(ext))
    }
}

impl Service for GrepService {
    fn name(&self) -> &'static str {
        "GrepService"
    }
}

impl ContentSearch for GrepService {
    fn search(&self, root: &Path, query: &str) -> Result<Vec<GrepResult>> {
        if !root.exists() {
            return Err(SearchError::NotFound(root.to_path_buf()));
        }
        if !root.is_dir() {
            return Err(SearchError::NotADirectory(root.to_path_buf()));
        }
        let Some(pattern) = LiteralPattern::new(query) else {
            return Ok(Vec::new());
        };

        let settings = self.settings.clone();
        let mut builder = WalkBuilder::new(root);
        builder
            .standard_filters(false)
            .follow_links(false)
            .max_depth(Some(self.settings.max_depth))
            .sort_by_file_name(|a, b| a.cmp(b))
            .filter_entry(move |entry| {
                if entry.depth() == 0 {
                    return true;
                }
                let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
                !(is_dir
                    && entry
                        .file_name()
                        .to_str()
                        .is_some_and(|name| settings.is_ignored_dir(name)))
            });

        let mut results = Vec::new();
        let mut files_searched = 0usize;
        for entry in builder.build() {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    tracing::debug!(error = %e, "skipping unreadable entry");
                    continue;
                }
            };
            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }
            let path = entry.path();
            if !self.is_searchable(path) {
                continue;
            }

            files_searched += 1;
            search_file(path, &pattern, &mut results);
        }

        tracing::debug!(
            root = %root.display(),
            query,
            files_searched,
            matches = results.len(),
            "grep finished"
        );
        Ok(results)
    }
}

fn is_likely_binary(content: &[u8]) -> bool {
    memchr::memchr(0, &content[..content.len().min(8192)]).is_some()
}

/// Appends one result per matching line. Files that cannot be read or are not
/// UTF-8 text are skipped.
fn search_file(path: &Path, pattern: &LiteralPattern, out: &mut Vec<GrepResult>) {
    let bytes = match std::fs::read(path) {
        Ok(b) => b,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "skipping unreadable file");
            return;
        }
    };
    if is_likely_binary(&bytes) {
        return;
    }
    let Ok(content) = std::str::from_utf8(&bytes) else {
        tracing::debug!(path = %path.display(), "skipping non-UTF-8 file");
        return;
    };

    let file_path = path.to_string_lossy().to_string();
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    for (line_idx, line) in content.lines().enumerate() {
        if let Some((match_start, match_end)) = pattern.find(line) {
            out.push(GrepResult {
                file_path: file_path.clone(),
                file_name: file_name.clone(),
                line_number: line_idx + 1,
                line_content: line.to_string(),
                match_start,
                match_end,
            });
        }
    }
}

#[cfg(test)]
#[path = "../../../../../tests/unit/kernel/services/adapters/search/grep.rs"]
mod tests;
