//! Cross-file search adapters.
//!
//! - GrepService: walks a directory and greps Markdown files
//! - SearchSessionDriver: debounces queries and runs them on the blocking pool

mod driver;
mod grep;

pub use driver::SearchSessionDriver;
pub use grep::GrepService;
