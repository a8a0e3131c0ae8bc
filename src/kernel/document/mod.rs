//! Rendered document model.
//!
//! - `view`: the text-walking interface search works against
//! - `tree`: arena-backed tree implementing it
//! - `markdown`: Markdown source to tree
//! - `toc`: heading outline with anchor ids

pub mod markdown;
pub mod toc;
pub mod tree;
pub mod view;

pub use toc::TocItem;
pub use tree::{DocumentTree, NodeId, NodeKind};
pub use view::{DocumentTextView, Run};
