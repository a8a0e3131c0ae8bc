use crate::kernel::services::ports::search::GrepResult;
use rustc_hash::FxHashMap;

/// All results from one file, in line order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileGroup {
    pub file_path: String,
    pub file_name: String,
    pub results: Vec<GrepResult>,
}

/// Results grouped by file. Groups keep the order in which their file was
/// first seen.
#[derive(Debug, Clone, Default)]
pub struct GroupedResults {
    groups: Vec<FileGroup>,
    index: FxHashMap<String, usize>,
}

impl GroupedResults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, result: GrepResult) {
        if let Some(&idx) = self.index.get(&result.file_path) {
            self.groups[idx].results.push(result);
            return;
        }
        self.index
            .insert(result.file_path.clone(), self.groups.len());
        self.groups.push(FileGroup {
            file_path: result.file_path.clone(),
            file_name: result.file_name.clone(),
            results: vec![result],
        });
    }

    pub fn groups(&self) -> &[FileGroup] {
        &self.groups
    }

    pub fn get(&self, file_path: &str) -> Option<&FileGroup> {
        self.index.get(file_path).map(|&idx| &self.groups[idx])
    }

    /// Number of files.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn total_results(&self) -> usize {
        self.groups.iter().map(|g| g.results.len()).sum()
    }

    pub fn clear(&mut self) {
        self.groups.clear();
        self.index.clear();
    }
}

/// Groups results by `file_path` in a single pass.
pub fn group<I>(results: I) -> GroupedResults
where
    I: IntoIterator<Item = GrepResult>,
{
    let mut grouped = GroupedResults::new();
    for result in results {
        grouped.push(result);
    }
    grouped
}

#[cfg(test)]
#[path = "../../../tests/unit/kernel/search/aggregate.rs"]
mod tests;
