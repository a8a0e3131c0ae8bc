//! mdview - Markdown viewer core
//!
//! Module layout:
//! - core: shared vocabulary (Command, Key, Service)
//! - kernel::document: rendered document tree, Markdown builder, table of contents
//! - kernel::page_search: in-document search (segment, match, highlight, navigate)
//! - kernel::search: debounced cross-file search session, result grouping
//! - kernel::services: ports (contracts) and adapters (grep, driver, settings, shortcuts)

pub mod core;
pub mod kernel;
