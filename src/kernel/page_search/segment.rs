use crate::kernel::document::DocumentTextView;

/// Searchable text and the leaf it was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSegment<L> {
    pub content: String,
    pub source: L,
}

/// Text leaves in document order, excluding anything inside code.
pub fn segment<V: DocumentTextView + ?Sized>(view: &V) -> Vec<TextSegment<V::Leaf>> {
    view.leaves()
        .into_iter()
        .filter(|leaf| !view.is_verbatim(*leaf))
        .filter_map(|leaf| {
            let text = view.text(leaf)?;
            if text.is_empty() {
                return None;
            }
            Some(TextSegment {
                content: text.to_string(),
                source: leaf,
            })
        })
        .collect()
}
