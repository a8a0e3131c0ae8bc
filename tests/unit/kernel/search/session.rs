use super::*;
use crate::kernel::services::ports::search::SearchError;
use std::time::Duration;

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn scoped() -> SearchSession {
    let mut session = SearchSession::default();
    session.set_scope(Some(PathBuf::from("/docs")));
    session
}

fn hit(path: &str) -> GrepResult {
    GrepResult {
        file_path: path.to_string(),
        file_name: path.to_string(),
        line_number: 1,
        line_content: "todo".to_string(),
        match_start: 0,
        match_end: 4,
    }
}

#[test]
fn typing_quickly_fires_one_request() {
    let t0 = Instant::now();
    let mut session = scoped();

    session.submit_query("a", t0);
    session.submit_query("ab", t0 + ms(100));
    session.submit_query("abc", t0 + ms(200));
    assert!(session.is_searching());
    assert_eq!(session.query(), "abc");

    assert_eq!(session.poll(t0 + ms(250)), None);
    assert_eq!(session.poll(t0 + ms(499)), None);

    let request = session.poll(t0 + ms(500)).unwrap();
    assert_eq!(request.query, "abc");
    assert_eq!(request.root, PathBuf::from("/docs"));
    assert_eq!(request.generation, session.generation());

    assert_eq!(session.poll(t0 + ms(900)), None);
}

#[test]
fn blank_query_clears_without_request() {
    let t0 = Instant::now();
    let mut session = scoped();
    session.submit_query("todo", t0);
    let request = session.poll(t0 + ms(300)).unwrap();
    session.apply_response(SearchResponse {
        generation: request.generation,
        outcome: Ok(vec![hit("/docs/a.md")]),
    });
    assert_eq!(session.result_count(), 1);

    session.submit_query("   ", t0 + ms(400));
    assert_eq!(session.result_count(), 0);
    assert!(!session.is_searching());
    assert_eq!(session.query(), "   ");
    assert_eq!(session.poll(t0 + ms(2000)), None);
}

#[test]
fn no_scope_means_no_request() {
    let t0 = Instant::now();
    let mut session = SearchSession::default();
    session.submit_query("todo", t0);
    assert!(!session.is_searching());
    assert_eq!(session.poll(t0 + ms(1000)), None);
}

#[test]
fn stale_response_is_discarded() {
    let t0 = Instant::now();
    let mut session = scoped();

    session.submit_query("one", t0);
    let first = session.poll(t0 + ms(300)).unwrap();
    session.submit_query("two", t0 + ms(400));
    let second = session.poll(t0 + ms(700)).unwrap();
    assert!(second.generation > first.generation);

    assert!(session.apply_response(SearchResponse {
        generation: second.generation,
        outcome: Ok(vec![hit("/docs/two.md")]),
    }));
    assert!(!session.apply_response(SearchResponse {
        generation: first.generation,
        outcome: Ok(vec![hit("/docs/one.md"), hit("/docs/one-b.md")]),
    }));

    let paths: Vec<_> = session.results().map(|r| r.file_path.as_str()).collect();
    assert_eq!(paths, vec!["/docs/two.md"]);
    assert!(!session.is_searching());
}

#[test]
fn results_stay_until_replaced() {
    let t0 = Instant::now();
    let mut session = scoped();
    session.submit_query("to", t0);
    let request = session.poll(t0 + ms(300)).unwrap();
    session.apply_response(SearchResponse {
        generation: request.generation,
        outcome: Ok(vec![hit("/docs/a.md")]),
    });

    session.submit_query("tod", t0 + ms(400));
    assert!(session.is_searching());
    assert_eq!(session.result_count(), 1);
}

#[test]
fn failure_becomes_empty_results() {
    let t0 = Instant::now();
    let mut session = scoped();
    session.submit_query("todo", t0);
    let request = session.poll(t0 + ms(300)).unwrap();

    assert!(session.apply_response(SearchResponse {
        generation: request.generation,
        outcome: Err(SearchError::NotFound(PathBuf::from("/docs"))),
    }));
    assert_eq!(session.result_count(), 0);
    assert!(!session.is_searching());
    assert!(session.last_error().unwrap().contains("/docs"));
}

#[test]
fn scope_change_clears_and_invalidates() {
    let t0 = Instant::now();
    let mut session = scoped();
    session.submit_query("todo", t0);
    let request = session.poll(t0 + ms(300)).unwrap();
    session.apply_response(SearchResponse {
        generation: request.generation,
        outcome: Ok(vec![hit("/docs/a.md")]),
    });

    session.submit_query("todos", t0 + ms(400));
    let in_flight = session.poll(t0 + ms(700)).unwrap();

    assert!(session.set_scope(Some(PathBuf::from("/notes"))));
    assert_eq!(session.result_count(), 0);
    assert!(!session.is_searching());
    assert_eq!(session.query(), "");
    assert_eq!(session.pending(), None);

    assert!(!session.apply_response(SearchResponse {
        generation: in_flight.generation,
        outcome: Ok(vec![hit("/docs/a.md")]),
    }));
    assert_eq!(session.result_count(), 0);

    // Same scope again is a no-op.
    assert!(!session.set_scope(Some(PathBuf::from("/notes"))));
}

#[test]
fn scope_change_cancels_pending_deadline() {
    let t0 = Instant::now();
    let mut session = scoped();
    session.submit_query("todo", t0);
    session.set_scope(Some(PathBuf::from("/other")));
    assert_eq!(session.poll(t0 + ms(1000)), None);
}

#[test]
fn clear_empties_everything() {
    let t0 = Instant::now();
    let mut session = scoped();
    session.submit_query("todo", t0);
    let request = session.poll(t0 + ms(300)).unwrap();
    session.clear();

    assert_eq!(session.query(), "");
    assert!(!session.is_searching());
    assert!(!session.apply_response(SearchResponse {
        generation: request.generation,
        outcome: Ok(vec![hit("/docs/a.md")]),
    }));
    assert_eq!(session.scope(), Some(std::path::Path::new("/docs")));
}

#[test]
fn disposed_session_ignores_everything() {
    let t0 = Instant::now();
    let mut session = scoped();
    session.submit_query("todo", t0);
    let generation = session.generation();
    session.dispose();

    assert!(session.is_disposed());
    assert_eq!(session.poll(t0 + ms(1000)), None);
    session.submit_query("again", t0 + ms(1100));
    assert_eq!(session.poll(t0 + ms(2000)), None);
    assert!(!session.apply_response(SearchResponse {
        generation,
        outcome: Ok(vec![hit("/docs/a.md")]),
    }));
}

#[test]
fn debounce_is_configurable() {
    let t0 = Instant::now();
    let mut session = SearchSession::new(ms(50));
    session.set_scope(Some(PathBuf::from("/docs")));
    session.submit_query("x", t0);
    assert_eq!(session.next_deadline(), Some(t0 + ms(50)));
    assert!(session.poll(t0 + ms(50)).is_some());
}
