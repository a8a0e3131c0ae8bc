//! In-document incremental search.
//!
//! `PageSearch` owns the live state of an open search bar and drives the
//! pipeline on each change: clear old markers, segment the document, index
//! the query, wrap matches, reset the cursor and reveal the first match.

pub mod highlight;
pub mod matcher;
pub mod navigator;
pub mod segment;

pub use highlight::HighlightRenderer;
pub use matcher::{index, LiteralPattern, Match, MatchSet};
pub use navigator::{MatchNavigator, NavigatorState};
pub use segment::{segment, TextSegment};

use crate::core::Command;
use crate::kernel::document::DocumentTextView;

#[derive(Debug, Clone)]
pub struct PageSearch<L> {
    visible: bool,
    query: String,
    matches: MatchSet<L>,
    navigator: MatchNavigator,
    renderer: HighlightRenderer<L>,
}

impl<L> Default for PageSearch<L> {
    fn default() -> Self {
        Self {
            visible: false,
            query: String::new(),
            matches: MatchSet::default(),
            navigator: MatchNavigator::default(),
            renderer: HighlightRenderer::default(),
        }
    }
}

impl<L: Copy + Eq + std::fmt::Debug> PageSearch<L> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn matches(&self) -> &MatchSet<L> {
        &self.matches
    }

    pub fn navigator(&self) -> NavigatorState {
        self.navigator.state()
    }

    /// Shows the search bar. A query kept from a previous session is
    /// searched again.
    pub fn open<V>(&mut self, view: &mut V)
    where
        V: DocumentTextView<Leaf = L> + ?Sized,
    {
        if self.visible {
            return;
        }
        self.visible = true;
        if !self.query.trim().is_empty() {
            self.refresh(view);
        }
    }

    /// Hides the search bar and removes every highlight. The query text is
    /// kept for the next `open`.
    pub fn close<V>(&mut self, view: &mut V)
    where
        V: DocumentTextView<Leaf = L> + ?Sized,
    {
        self.renderer.clear_highlights(view);
        self.matches = MatchSet::default();
        self.navigator.reset(0);
        self.visible = false;
    }

    /// Replaces the query and re-runs the search. Returns the match count.
    /// While the bar is hidden the query is only stored; `open` runs it.
    pub fn set_query<V>(&mut self, view: &mut V, query: &str) -> usize
    where
        V: DocumentTextView<Leaf = L> + ?Sized,
    {
        self.query = query.to_string();
        if !self.visible {
            return 0;
        }
        self.refresh(view)
    }

    /// Re-runs the current query against the current document.
    pub fn refresh<V>(&mut self, view: &mut V) -> usize
    where
        V: DocumentTextView<Leaf = L> + ?Sized,
    {
        // Markers split text leaves, so they must go before segmenting.
        self.renderer.clear_highlights(view);

        let segments = segment(&*view);
        self.matches = index(&segments, &self.query);
        self.renderer.apply_highlights(view, &self.matches);
        self.navigator.reset(self.matches.len());
        if !self.matches.is_empty() {
            self.renderer.mark_current(view, 0);
        }

        tracing::debug!(
            query = %self.query,
            segments = segments.len(),
            matches = self.matches.len(),
            "page search refreshed"
        );
        self.matches.len()
    }

    pub fn next<V>(&mut self, view: &mut V) -> Option<usize>
    where
        V: DocumentTextView<Leaf = L> + ?Sized,
    {
        let index = self.navigator.next()?;
        self.renderer.mark_current(view, index);
        Some(index)
    }

    pub fn previous<V>(&mut self, view: &mut V) -> Option<usize>
    where
        V: DocumentTextView<Leaf = L> + ?Sized,
    {
        let index = self.navigator.previous()?;
        self.renderer.mark_current(view, index);
        Some(index)
    }

    pub fn select<V>(&mut self, view: &mut V, index: usize) -> Option<usize>
    where
        V: DocumentTextView<Leaf = L> + ?Sized,
    {
        let index = self.navigator.select(index)?;
        self.renderer.mark_current(view, index);
        Some(index)
    }

    /// The document was replaced or re-rendered. Old markers belong to the
    /// previous tree and are dropped without touching `view`; an open search
    /// is re-run against the new content.
    pub fn document_changed<V>(&mut self, view: &mut V)
    where
        V: DocumentTextView<Leaf = L> + ?Sized,
    {
        self.renderer.forget();
        self.matches = MatchSet::default();
        self.navigator.reset(0);
        if self.visible && !self.query.trim().is_empty() {
            self.refresh(view);
        }
    }

    /// `(current, total)` for the "n / total" counter, 1-based. `None` while
    /// the bar is hidden or the query is blank.
    pub fn counter(&self) -> Option<(usize, usize)> {
        if !self.visible || self.query.trim().is_empty() {
            return None;
        }
        let state = self.navigator.state();
        if state.total == 0 {
            return Some((0, 0));
        }
        Some((state.current + 1, state.total))
    }

    /// Applies a page-search command. Returns true when it was consumed.
    pub fn handle_command<V>(&mut self, view: &mut V, command: &Command) -> bool
    where
        V: DocumentTextView<Leaf = L> + ?Sized,
    {
        if command.is_page_search_command() && !self.visible {
            return false;
        }
        match command {
            Command::PageSearch => self.open(view),
            Command::ClosePageSearch => self.close(view),
            Command::NextSearchResult => {
                self.next(view);
            }
            Command::PrevSearchResult => {
                self.previous(view);
            }
            _ => return false,
        }
        true
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/kernel/page_search/mod.rs"]
mod tests;
