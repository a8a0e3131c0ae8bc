use mdview::core::Service;
use mdview::kernel::document::{markdown, toc};
use mdview::kernel::page_search::PageSearch;
use mdview::kernel::services::adapters::{
    ensure_settings_file, load_settings, GrepService, SearchSessionDriver, ShortcutRegistry,
};
use mdview::kernel::services::ports::Settings;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

mod logging;

const SEARCH_TIMEOUT: Duration = Duration::from_secs(30);
const TICK_INTERVAL: Duration = Duration::from_millis(10);

const USAGE: &str = "usage: mdview <dir> <query> [file.md]\n       mdview --shortcuts";

fn main() -> io::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let _logging = logging::init();
    if let Err(e) = ensure_settings_file() {
        tracing::warn!(error = %e, "could not create settings file");
    }
    let settings = load_settings().unwrap_or_default();

    match args.as_slice() {
        [flag] if flag == "--shortcuts" => print_shortcuts(&settings),
        [dir, query] => run(&settings, Path::new(dir), query, None),
        [dir, query, file] => run(&settings, Path::new(dir), query, Some(Path::new(file))),
        _ => {
            eprintln!("{USAGE}");
            std::process::exit(2);
        }
    }
}

fn run(settings: &Settings, dir: &Path, query: &str, file: Option<&Path>) -> io::Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()?;

    let service = Arc::new(GrepService::new(settings.search.clone()));
    tracing::info!(service = service.name(), root = %dir.display(), query, "starting search");
    let mut driver = SearchSessionDriver::new(
        service,
        runtime.handle().clone(),
        settings.search.debounce(),
    );
    driver.set_scope(Some(PathBuf::from(dir)));
    driver.submit_query(query);

    let started = Instant::now();
    loop {
        driver.tick();
        if driver.is_idle() {
            break;
        }
        if started.elapsed() > SEARCH_TIMEOUT {
            tracing::warn!(query, "search timed out");
            break;
        }
        std::thread::sleep(TICK_INTERVAL);
    }

    let mut out = io::stdout().lock();
    let session = driver.session();
    if let Some(err) = session.last_error() {
        eprintln!("search failed: {err}");
    }
    for group in session.grouped().groups() {
        writeln!(out, "{} ({})", group.file_path, group.results.len())?;
        for result in &group.results {
            let (before, hit, after) = result.split_match();
            writeln!(out, "  {:>5}: {before}[{hit}]{after}", result.line_number)?;
        }
    }
    writeln!(
        out,
        "{} results in {} files",
        session.result_count(),
        session.grouped().len()
    )?;

    if let Some(file) = file {
        print_document(&mut out, file, query)?;
    }
    Ok(())
}

fn print_document(out: &mut impl Write, file: &Path, query: &str) -> io::Result<()> {
    let source = std::fs::read_to_string(file)?;
    let mut tree = markdown::parse(&source);
    let mut page = PageSearch::new();
    page.open(&mut tree);
    page.set_query(&mut tree, query);

    writeln!(out)?;
    match page.counter() {
        Some((current, total)) => writeln!(out, "{}: {current} / {total}", file.display())?,
        None => writeln!(out, "{}: no query", file.display())?,
    }

    let items = toc::generate(&source);
    if !items.is_empty() {
        writeln!(out, "contents:")?;
        for item in items {
            let indent = "  ".repeat(usize::from(item.level.saturating_sub(1)));
            writeln!(out, "  {indent}{} (#{})", item.text, item.id)?;
        }
    }
    Ok(())
}

fn print_shortcuts(settings: &Settings) -> io::Result<()> {
    let mut registry = ShortcutRegistry::with_defaults();
    registry.apply_rules(&settings.keybindings);

    let mut out = io::stdout().lock();
    for binding in registry.bindings() {
        let shortcut = &binding.shortcut;
        let mut chord = String::new();
        if shortcut.meta {
            chord.push_str("meta+");
        }
        if shortcut.shift {
            chord.push_str("shift+");
        }
        chord.push_str(&format!("{:?}", shortcut.code));
        writeln!(
            out,
            "{chord:<24} {:<18} {:?} {}",
            binding.command.name(),
            binding.scope,
            shortcut.description
        )?;
    }
    Ok(())
}
