use super::*;
use crate::kernel::services::ports::search::{GrepResult, Result as SearchResult};
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

fn create_runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .unwrap()
}

/// Records every query it receives and answers with one hit per query.
#[derive(Default)]
struct RecordingSearch {
    queries: Mutex<Vec<String>>,
}

impl RecordingSearch {
    fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

impl ContentSearch for RecordingSearch {
    fn search(&self, root: &Path, query: &str) -> SearchResult<Vec<GrepResult>> {
        self.queries.lock().unwrap().push(query.to_string());
        let path = root.join(format!("{query}.md"));
        Ok(vec![GrepResult {
            file_path: path.to_string_lossy().to_string(),
            file_name: format!("{query}.md"),
            line_number: 1,
            line_content: query.to_string(),
            match_start: 0,
            match_end: query.len(),
        }])
    }
}

struct FailingSearch;

impl ContentSearch for FailingSearch {
    fn search(&self, root: &Path, _query: &str) -> SearchResult<Vec<GrepResult>> {
        Err(SearchError::NotFound(root.to_path_buf()))
    }
}

struct PanickingSearch;

impl ContentSearch for PanickingSearch {
    fn search(&self, _root: &Path, _query: &str) -> SearchResult<Vec<GrepResult>> {
        panic!("search blew up");
    }
}

fn wait_until_idle(driver: &mut SearchSessionDriver, now: Instant) {
    let deadline = std::time::Instant::now() + Duration::from_secs(5);
    while !driver.is_idle() {
        assert!(std::time::Instant::now() < deadline, "driver never went idle");
        driver.tick_at(now);
        std::thread::sleep(Duration::from_millis(5));
    }
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

#[test]
fn debounced_keystrokes_run_one_search() {
    let rt = create_runtime();
    let service = Arc::new(RecordingSearch::default());
    let mut driver = SearchSessionDriver::new(service.clone(), rt.handle().clone(), ms(300));
    driver.set_scope(Some(PathBuf::from("/docs")));

    let t0 = Instant::now();
    driver.submit_query_at("a", t0);
    driver.submit_query_at("ab", t0 + ms(100));
    driver.submit_query_at("abc", t0 + ms(200));

    assert!(!driver.tick_at(t0 + ms(250)));
    assert_eq!(driver.in_flight(), 0);

    assert!(driver.tick_at(t0 + ms(500)));
    assert_eq!(driver.in_flight(), 1);
    wait_until_idle(&mut driver, t0 + ms(500));

    assert_eq!(service.queries(), vec!["abc".to_string()]);
    assert_eq!(driver.session().result_count(), 1);
    assert!(!driver.session().is_searching());
}

#[test]
fn stale_response_does_not_replace_newer_query() {
    let rt = create_runtime();
    let service = Arc::new(RecordingSearch::default());
    let mut driver = SearchSessionDriver::new(service.clone(), rt.handle().clone(), ms(10));
    driver.set_scope(Some(PathBuf::from("/docs")));

    let t0 = Instant::now();
    driver.submit_query_at("old", t0);
    driver.tick_at(t0 + ms(10));
    assert_eq!(driver.in_flight(), 1);

    // A newer keystroke lands before the first response is drained.
    driver.submit_query_at("new", t0 + ms(20));
    wait_until_idle(&mut driver, t0 + ms(30));

    let files: Vec<_> = driver
        .session()
        .results()
        .map(|r| r.file_name.clone())
        .collect();
    assert_eq!(files, vec!["new.md".to_string()]);

    let mut queries = service.queries();
    queries.sort();
    assert_eq!(queries, vec!["new".to_string(), "old".to_string()]);
}

#[test]
fn errors_clear_results() {
    let rt = create_runtime();
    let mut driver =
        SearchSessionDriver::new(Arc::new(FailingSearch), rt.handle().clone(), ms(10));
    driver.set_scope(Some(PathBuf::from("/nowhere")));

    let t0 = Instant::now();
    driver.submit_query_at("x", t0);
    driver.tick_at(t0 + ms(10));
    wait_until_idle(&mut driver, t0 + ms(10));

    assert_eq!(driver.session().result_count(), 0);
    assert!(driver.session().last_error().is_some());
    assert!(!driver.session().is_searching());
}

#[test]
fn panicking_search_reports_task_error() {
    let rt = create_runtime();
    let mut driver =
        SearchSessionDriver::new(Arc::new(PanickingSearch), rt.handle().clone(), ms(10));
    driver.set_scope(Some(PathBuf::from("/docs")));

    let t0 = Instant::now();
    driver.submit_query_at("x", t0);
    driver.tick_at(t0 + ms(10));
    wait_until_idle(&mut driver, t0 + ms(10));

    let err = driver.session().last_error().unwrap();
    assert!(err.starts_with("Search task failed"), "{err}");
}

#[test]
fn clear_discards_in_flight_results() {
    let rt = create_runtime();
    let service = Arc::new(RecordingSearch::default());
    let mut driver = SearchSessionDriver::new(service, rt.handle().clone(), ms(10));
    driver.set_scope(Some(PathBuf::from("/docs")));

    let t0 = Instant::now();
    driver.submit_query_at("x", t0);
    driver.tick_at(t0 + ms(10));
    driver.clear();
    wait_until_idle(&mut driver, t0 + ms(20));

    assert_eq!(driver.session().result_count(), 0);
    assert_eq!(driver.session().query(), "");
}

#[test]
fn blank_query_never_reaches_the_service() {
    let rt = create_runtime();
    let service = Arc::new(RecordingSearch::default());
    let mut driver = SearchSessionDriver::new(service.clone(), rt.handle().clone(), ms(10));
    driver.set_scope(Some(PathBuf::from("/docs")));

    let t0 = Instant::now();
    driver.submit_query_at("  ", t0);
    assert!(driver.is_idle());
    driver.tick_at(t0 + ms(100));
    assert!(service.queries().is_empty());
}
