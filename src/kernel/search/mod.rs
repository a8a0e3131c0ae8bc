//! Cross-file search: the debounced session and result grouping.

pub mod aggregate;
pub mod session;

pub use aggregate::{group, FileGroup, GroupedResults};
pub use session::{PendingSearch, SearchSession, DEFAULT_DEBOUNCE};
