//! Runs a `SearchSession` against a `ContentSearch` on a tokio runtime.
//!
//! The session only ever changes on the caller's thread inside `tick`. Work
//! goes to the blocking pool and comes back over a bounded channel stamped
//! with the generation it was issued for.

use crate::kernel::search::SearchSession;
use crate::kernel::services::ports::search::{
    ContentSearch, SearchError, SearchRequest, SearchResponse,
};
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, SyncSender};
use std::sync::Arc;
use std::time::{Duration, Instant};

const RESPONSE_CHANNEL_CAPACITY: usize = 16;
const MAX_RESPONSE_DRAIN_PER_TICK: usize = 8;

pub struct SearchSessionDriver {
    session: SearchSession,
    service: Arc<dyn ContentSearch>,
    runtime: tokio::runtime::Handle,
    tx: SyncSender<SearchResponse>,
    rx: Receiver<SearchResponse>,
    in_flight: usize,
}

impl SearchSessionDriver {
    pub fn new(
        service: Arc<dyn ContentSearch>,
        runtime: tokio::runtime::Handle,
        debounce: Duration,
    ) -> Self {
        let (tx, rx) = mpsc::sync_channel(RESPONSE_CHANNEL_CAPACITY);
        Self {
            session: SearchSession::new(debounce),
            service,
            runtime,
            tx,
            rx,
            in_flight: 0,
        }
    }

    pub fn session(&self) -> &SearchSession {
        &self.session
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// No deadline pending and nothing running.
    pub fn is_idle(&self) -> bool {
        self.session.pending().is_none() && self.in_flight == 0
    }

    pub fn set_scope(&mut self, scope: Option<PathBuf>) -> bool {
        self.session.set_scope(scope)
    }

    pub fn submit_query(&mut self, query: &str) {
        self.submit_query_at(query, Instant::now());
    }

    pub fn submit_query_at(&mut self, query: &str, now: Instant) {
        self.session.submit_query(query, now);
    }

    pub fn clear(&mut self) {
        self.session.clear();
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.session.next_deadline()
    }

    pub fn tick(&mut self) -> bool {
        self.tick_at(Instant::now())
    }

    /// Applies finished searches, then fires the debounced query if its
    /// deadline has passed. Returns true when visible state changed.
    pub fn tick_at(&mut self, now: Instant) -> bool {
        let mut changed = self.drain_responses();
        if let Some(request) = self.session.poll(now) {
            self.spawn_search(request);
            changed = true;
        }
        changed
    }

    fn drain_responses(&mut self) -> bool {
        let mut changed = false;
        let mut drained = 0usize;
        while drained < MAX_RESPONSE_DRAIN_PER_TICK {
            match self.rx.try_recv() {
                Ok(response) => {
                    drained += 1;
                    self.in_flight = self.in_flight.saturating_sub(1);
                    changed |= self.session.apply_response(response);
                }
                Err(mpsc::TryRecvError::Empty) => break,
                // We hold a sender ourselves, so this cannot happen.
                Err(mpsc::TryRecvError::Disconnected) => break,
            }
        }
        changed
    }

    fn spawn_search(&mut self, request: SearchRequest) {
        let service = Arc::clone(&self.service);
        let tx = self.tx.clone();
        self.in_flight += 1;

        self.runtime.spawn(async move {
            let SearchRequest {
                generation,
                root,
                query,
            } = request;
            let result =
                tokio::task::spawn_blocking(move || service.search(&root, &query)).await;

            let outcome = match result {
                Ok(outcome) => outcome,
                Err(e) => Err(SearchError::Task(e.to_string())),
            };
            let _ = tx.send(SearchResponse {
                generation,
                outcome,
            });
        });
    }
}

impl Drop for SearchSessionDriver {
    fn drop(&mut self) {
        self.session.dispose();
    }
}

#[cfg(test)]
#[path = "../../../../../tests/unit/kernel/services/adapters/search/driver.rs"]
mod tests;
