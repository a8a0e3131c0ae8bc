//! Marker wrappers for matches on a `DocumentTextView`.

use super::matcher::{Match, MatchSet};
use crate::kernel::document::{DocumentTextView, Run};

/// Tracks the markers created for one applied `MatchSet`.
///
/// `markers[i]` is the marker for the match with `global_index == i`, or
/// `None` when its leaf could not be highlighted (stale or out-of-range).
#[derive(Debug, Clone)]
pub struct HighlightRenderer<L> {
    markers: Vec<Option<L>>,
    current: Option<usize>,
}

impl<L> Default for HighlightRenderer<L> {
    fn default() -> Self {
        Self {
            markers: Vec::new(),
            current: None,
        }
    }
}

impl<L: Copy + Eq + std::fmt::Debug> HighlightRenderer<L> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn current(&self) -> Option<usize> {
        self.current
    }

    pub fn marker(&self, index: usize) -> Option<L> {
        self.markers.get(index).copied().flatten()
    }

    /// Wraps every match of `set` in a marker. Any previous highlights are
    /// removed first.
    pub fn apply_highlights<V>(&mut self, view: &mut V, set: &MatchSet<L>)
    where
        V: DocumentTextView<Leaf = L> + ?Sized,
    {
        self.clear_highlights(view);
        self.markers = vec![None; set.len()];

        let matches = set.as_slice();
        let mut start = 0;
        while start < matches.len() {
            let leaf = matches[start].segment;
            let mut end = start + 1;
            while end < matches.len() && matches[end].segment == leaf {
                end += 1;
            }
            self.wrap_leaf(view, leaf, &matches[start..end]);
            start = end;
        }
    }

    fn wrap_leaf<V>(&mut self, view: &mut V, leaf: L, group: &[Match<L>])
    where
        V: DocumentTextView<Leaf = L> + ?Sized,
    {
        let Some(text) = view.text(leaf).map(str::to_string) else {
            tracing::debug!(?leaf, "skipping highlight for stale leaf");
            return;
        };

        let mut runs = Vec::with_capacity(group.len() * 2 + 1);
        let mut cursor = 0;
        for m in group {
            let valid = m.start >= cursor
                && m.start < m.end
                && m.end <= text.len()
                && text.is_char_boundary(m.start)
                && text.is_char_boundary(m.end);
            if !valid {
                tracing::debug!(?leaf, start = m.start, end = m.end, "match outside leaf text");
                return;
            }
            runs.push(Run::Text(&text[cursor..m.start]));
            runs.push(Run::Mark(&text[m.start..m.end]));
            cursor = m.end;
        }
        runs.push(Run::Text(&text[cursor..]));

        let Some(created) = view.replace(leaf, &runs) else {
            return;
        };
        for (m, marker) in group.iter().zip(created) {
            if let Some(slot) = self.markers.get_mut(m.global_index) {
                *slot = Some(marker);
            }
        }
    }

    /// Unwraps every marker this renderer created. Markers that no longer
    /// exist are ignored.
    pub fn clear_highlights<V>(&mut self, view: &mut V)
    where
        V: DocumentTextView<Leaf = L> + ?Sized,
    {
        for marker in self.markers.drain(..).flatten() {
            view.unwrap_marker(marker);
        }
        self.current = None;
    }

    /// Makes `index` the single current match and scrolls it into view.
    pub fn mark_current<V>(&mut self, view: &mut V, index: usize)
    where
        V: DocumentTextView<Leaf = L> + ?Sized,
    {
        if let Some(prev) = self.current.take().and_then(|i| self.marker(i)) {
            view.set_current(prev, false);
        }

        let Some(marker) = self.marker(index) else {
            return;
        };
        if view.set_current(marker, true) {
            view.scroll_into_view(marker);
            self.current = Some(index);
        }
    }

    /// Forgets markers without touching the view. Used when the document was
    /// replaced and the old handles are meaningless.
    pub fn forget(&mut self) {
        self.markers.clear();
        self.current = None;
    }
}
