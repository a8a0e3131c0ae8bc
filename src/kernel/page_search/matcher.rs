//! Case-insensitive literal matching over text segments.

use super::segment::TextSegment;
use regex::{Regex, RegexBuilder};

/// A query compiled for case-insensitive literal search. Regex metacharacters
/// in the query are escaped, so `a.b` only matches `a.b`.
#[derive(Debug, Clone)]
pub struct LiteralPattern {
    query: String,
    regex: Regex,
}

impl LiteralPattern {
    /// `None` for an empty query.
    pub fn new(query: &str) -> Option<Self> {
        if query.is_empty() {
            return None;
        }
        match RegexBuilder::new(&regex::escape(query))
            .case_insensitive(true)
            .build()
        {
            Ok(regex) => Some(Self {
                query: query.to_string(),
                regex,
            }),
            Err(e) => {
                tracing::warn!(error = %e, "failed to compile search pattern");
                None
            }
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// First match in `haystack` as byte offsets.
    pub fn find(&self, haystack: &str) -> Option<(usize, usize)> {
        self.regex.find(haystack).map(|m| (m.start(), m.end()))
    }

    /// Non-overlapping matches, left to right.
    pub fn find_iter<'a>(&'a self, haystack: &'a str) -> impl Iterator<Item = (usize, usize)> + 'a {
        self.regex.find_iter(haystack).map(|m| (m.start(), m.end()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match<L> {
    pub segment: L,
    pub start: usize,
    pub end: usize,
    pub global_index: usize,
}

/// Matches for one (document, query) pair, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchSet<L> {
    query: String,
    matches: Vec<Match<L>>,
}

impl<L> Default for MatchSet<L> {
    fn default() -> Self {
        Self {
            query: String::new(),
            matches: Vec::new(),
        }
    }
}

impl<L: Copy> MatchSet<L> {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Match<L>> {
        self.matches.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Match<L>> {
        self.matches.iter()
    }

    pub fn as_slice(&self) -> &[Match<L>] {
        &self.matches
    }
}

/// Indexes every occurrence of `query` across `segments`. A blank query
/// yields an empty set.
pub fn index<L: Copy>(segments: &[TextSegment<L>], query: &str) -> MatchSet<L> {
    if query.trim().is_empty() {
        return MatchSet::empty();
    }
    let Some(pattern) = LiteralPattern::new(query) else {
        return MatchSet::empty();
    };

    let mut matches = Vec::new();
    for segment in segments {
        for (start, end) in pattern.find_iter(&segment.content) {
            matches.push(Match {
                segment: segment.source,
                start,
                end,
                global_index: matches.len(),
            });
        }
    }

    MatchSet {
        query: query.to_string(),
        matches,
    }
}
