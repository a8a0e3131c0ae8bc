//! Narrow text-walking interface the search engines work against.
//!
//! The in-page search never touches a concrete renderer: it enumerates text
//! leaves, asks whether a leaf sits inside a verbatim region, and swaps a leaf
//! for marker-wrapped runs. Any tree that can answer these questions can be
//! searched and highlighted.

use std::fmt::Debug;
use std::hash::Hash;

/// One piece of replacement content for a text leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Run<'a> {
    Text(&'a str),
    Mark(&'a str),
}

pub trait DocumentTextView {
    /// Opaque handle to a node. Handles may go stale when the tree changes;
    /// every method must tolerate that.
    type Leaf: Copy + Eq + Hash + Debug;

    /// Text-bearing leaves in depth-first pre-order.
    fn leaves(&self) -> Vec<Self::Leaf>;

    fn text(&self, leaf: Self::Leaf) -> Option<&str>;

    /// True when the leaf or any of its ancestors is a code block or inline code.
    fn is_verbatim(&self, leaf: Self::Leaf) -> bool;

    /// Replaces `leaf` in place with `runs`, leaving siblings untouched.
    ///
    /// Returns the marker handles created for the `Run::Mark` entries, in
    /// order, or `None` if `leaf` no longer exists.
    fn replace(&mut self, leaf: Self::Leaf, runs: &[Run<'_>]) -> Option<Vec<Self::Leaf>>;

    /// Removes a marker wrapper, putting its text back in place and merging it
    /// with neighbouring text. Returns false for stale or non-marker handles.
    fn unwrap_marker(&mut self, marker: Self::Leaf) -> bool;

    fn set_current(&mut self, marker: Self::Leaf, current: bool) -> bool;

    /// Asks the presentation layer to bring `marker` into view (smooth, centered).
    fn scroll_into_view(&mut self, _marker: Self::Leaf) {}
}
