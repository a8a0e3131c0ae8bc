//! Viewer kernel: document model, in-page search, cross-file search and the
//! services they run on.

pub mod document;
pub mod page_search;
pub mod search;
pub mod services;

pub use document::{DocumentTextView, DocumentTree, NodeId, NodeKind, TocItem};
pub use page_search::{MatchNavigator, MatchSet, PageSearch};
pub use search::{GroupedResults, SearchSession};
