use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};

pub type Result<T> = std::result::Result<T, SearchError>;

#[derive(Debug)]
pub enum SearchError {
    Io(io::Error),
    NotFound(PathBuf),
    NotADirectory(PathBuf),
    /// The search task died before reporting (panicked or was cancelled).
    Task(String),
}

impl std::fmt::Display for SearchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchError::Io(e) => write!(f, "IO error: {}", e),
            SearchError::NotFound(path) => write!(f, "Path not found: {}", path.display()),
            SearchError::NotADirectory(path) => {
                write!(f, "Path is not a directory: {}", path.display())
            }
            SearchError::Task(msg) => write!(f, "Search task failed: {}", msg),
        }
    }
}

impl std::error::Error for SearchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SearchError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for SearchError {
    fn from(e: io::Error) -> Self {
        SearchError::Io(e)
    }
}

/// One matching line in one file. Offsets are byte offsets into
/// `line_content`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrepResult {
    pub file_path: String,
    pub file_name: String,
    /// 1-based.
    pub line_number: usize,
    pub line_content: String,
    pub match_start: usize,
    pub match_end: usize,
}

impl GrepResult {
    /// Splits the line into (before, matched, after) for display. Offsets that
    /// do not fit the line yield the whole line as `before`.
    pub fn split_match(&self) -> (&str, &str, &str) {
        let line = self.line_content.as_str();
        let (start, end) = (self.match_start, self.match_end);
        if start > end
            || end > line.len()
            || !line.is_char_boundary(start)
            || !line.is_char_boundary(end)
        {
            return (line, "", "");
        }
        (&line[..start], &line[start..end], &line[end..])
    }
}

/// Directory-wide content search.
pub trait ContentSearch: Send + Sync {
    /// One result per matching line per file under `root`.
    fn search(&self, root: &Path, query: &str) -> Result<Vec<GrepResult>>;
}

/// A debounced query ready to run, stamped with the session generation it
/// was issued under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub generation: u64,
    pub root: PathBuf,
    pub query: String,
}

#[derive(Debug)]
pub struct SearchResponse {
    pub generation: u64,
    pub outcome: Result<Vec<GrepResult>>,
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/ports/search.rs"]
mod tests;
