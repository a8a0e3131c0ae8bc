//! Debounced cross-file search state.
//!
//! The session is a plain state machine driven by the caller's clock: a
//! keystroke schedules a deadline, `poll` turns an expired deadline into a
//! request, and `apply_response` accepts results only for the generation
//! that is still current. Nothing here blocks or spawns.

use super::aggregate::{group, GroupedResults};
use crate::kernel::services::ports::search::{GrepResult, SearchRequest, SearchResponse};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// A scheduled query, valid only while `generation` is current.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingSearch {
    pub generation: u64,
    pub deadline: Instant,
}

#[derive(Debug, Clone)]
pub struct SearchSession {
    query: String,
    scope: Option<PathBuf>,
    generation: u64,
    pending: Option<PendingSearch>,
    grouped: GroupedResults,
    searching: bool,
    debounce: Duration,
    disposed: bool,
    last_error: Option<String>,
}

impl Default for SearchSession {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl SearchSession {
    pub fn new(debounce: Duration) -> Self {
        Self {
            query: String::new(),
            scope: None,
            generation: 0,
            pending: None,
            grouped: GroupedResults::new(),
            searching: false,
            debounce,
            disposed: false,
            last_error: None,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn scope(&self) -> Option<&Path> {
        self.scope.as_deref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn pending(&self) -> Option<PendingSearch> {
        self.pending
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.map(|p| p.deadline)
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    pub fn grouped(&self) -> &GroupedResults {
        &self.grouped
    }

    /// Flat results in display order.
    pub fn results(&self) -> impl Iterator<Item = &GrepResult> {
        self.grouped.groups().iter().flat_map(|g| g.results.iter())
    }

    pub fn result_count(&self) -> usize {
        self.grouped.total_results()
    }

    pub fn is_searching(&self) -> bool {
        self.searching
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Records a keystroke. The raw query is stored immediately; a blank
    /// query or a missing scope clears the results on the spot, anything
    /// else is scheduled `debounce` after `now`. Results already on display
    /// stay until a newer response replaces them.
    pub fn submit_query(&mut self, query: &str, now: Instant) {
        if self.disposed {
            return;
        }
        self.generation += 1;
        self.pending = None;
        self.query = query.to_string();

        if self.query.trim().is_empty() || self.scope.is_none() {
            self.clear_results();
            self.searching = false;
            return;
        }

        self.pending = Some(PendingSearch {
            generation: self.generation,
            deadline: now + self.debounce,
        });
        self.searching = true;
    }

    /// Fires the pending query once its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<SearchRequest> {
        if self.disposed {
            return None;
        }
        let pending = self.pending?;
        if now < pending.deadline {
            return None;
        }
        self.pending = None;

        if pending.generation != self.generation {
            return None;
        }
        let root = self.scope.clone()?;

        tracing::debug!(
            generation = pending.generation,
            query = %self.query,
            root = %root.display(),
            "debounced search fired"
        );
        Some(SearchRequest {
            generation: pending.generation,
            root,
            query: self.query.clone(),
        })
    }

    /// Applies a finished search. Returns false when the response belongs to
    /// a superseded generation and was dropped.
    pub fn apply_response(&mut self, response: SearchResponse) -> bool {
        if self.disposed {
            return false;
        }
        if response.generation != self.generation {
            tracing::debug!(
                stale = response.generation,
                current = self.generation,
                "discarding stale search response"
            );
            return false;
        }

        match response.outcome {
            Ok(results) => {
                self.grouped = group(results);
                self.last_error = None;
            }
            Err(e) => {
                tracing::warn!(error = %e, query = %self.query, "search failed");
                self.grouped.clear();
                self.last_error = Some(e.to_string());
            }
        }
        self.searching = false;
        true
    }

    /// Changes the directory searched. Behaves like submitting an empty
    /// query: the query, results and pending work are dropped at once.
    pub fn set_scope(&mut self, scope: Option<PathBuf>) -> bool {
        if self.disposed || self.scope == scope {
            return false;
        }
        tracing::info!(
            from = ?self.scope,
            to = ?scope,
            "search scope changed"
        );
        self.scope = scope;
        self.generation += 1;
        self.pending = None;
        self.query.clear();
        self.clear_results();
        self.searching = false;
        true
    }

    /// Empties the query and results and invalidates anything in flight.
    pub fn clear(&mut self) {
        self.generation += 1;
        self.pending = None;
        self.query.clear();
        self.clear_results();
        self.searching = false;
    }

    /// Cancels pending work. A disposed session ignores later polls and
    /// responses.
    pub fn dispose(&mut self) {
        self.generation += 1;
        self.pending = None;
        self.searching = false;
        self.disposed = true;
    }

    fn clear_results(&mut self) {
        self.grouped.clear();
        self.last_error = None;
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/kernel/search/session.rs"]
mod tests;
