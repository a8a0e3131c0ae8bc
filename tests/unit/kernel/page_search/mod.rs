use super::*;
use crate::kernel::document::markdown::parse;
use crate::kernel::document::{DocumentTree, NodeId, NodeKind};

/// Three paragraphs: "Hello world", "`world` ignored", "world again".
fn sample_tree() -> DocumentTree {
    let mut tree = DocumentTree::new();
    let root = tree.root();

    let p1 = tree.append(root, NodeKind::Paragraph).unwrap();
    tree.append_text(p1, "Hello world");

    let p2 = tree.append(root, NodeKind::Paragraph).unwrap();
    let code = tree.append(p2, NodeKind::InlineCode).unwrap();
    tree.append_text(code, "world");
    tree.append_text(p2, " ignored");

    let p3 = tree.append(root, NodeKind::Paragraph).unwrap();
    tree.append_text(p3, "world again");
    tree
}

fn segments_of(contents: &[&str]) -> Vec<TextSegment<usize>> {
    contents
        .iter()
        .enumerate()
        .map(|(i, c)| TextSegment {
            content: c.to_string(),
            source: i,
        })
        .collect()
}

// --- segmenter ---

#[test]
fn segment_skips_verbatim_leaves() {
    let tree = sample_tree();
    let contents: Vec<_> = segment(&tree).into_iter().map(|s| s.content).collect();
    assert_eq!(contents, vec!["Hello world", " ignored", "world again"]);
}

#[test]
fn segment_skips_code_blocks() {
    let tree = parse("intro\n\n```\nworld\n```\n");
    let contents: Vec<_> = segment(&tree).into_iter().map(|s| s.content).collect();
    assert_eq!(contents, vec!["intro"]);
}

#[test]
fn segment_is_idempotent() {
    let tree = sample_tree();
    assert_eq!(segment(&tree), segment(&tree));
}

// --- matcher ---

#[test]
fn blank_query_matches_nothing() {
    let segments = segments_of(&["anything"]);
    assert!(index(&segments, "").is_empty());
    assert!(index(&segments, "   ").is_empty());
}

#[test]
fn matching_is_case_insensitive() {
    let segments = segments_of(&["Hello HELLO hello"]);
    let set = index(&segments, "hElLo");
    assert_eq!(set.len(), 3);
    assert_eq!(set.query(), "hElLo");
}

#[test]
fn special_characters_are_literal() {
    let segments = segments_of(&["a.b axb a.b"]);
    let set = index(&segments, "a.b");
    let spans: Vec<_> = set.iter().map(|m| (m.start, m.end)).collect();
    assert_eq!(spans, vec![(0, 3), (8, 11)]);

    let set = index(&segments_of(&["(x) [y] *z*"]), "[y]");
    assert_eq!(set.len(), 1);
}

#[test]
fn matches_do_not_overlap() {
    let set = index(&segments_of(&["aaaa"]), "aa");
    let spans: Vec<_> = set.iter().map(|m| (m.start, m.end)).collect();
    assert_eq!(spans, vec![(0, 2), (2, 4)]);
}

#[test]
fn global_indices_are_contiguous() {
    let segments = segments_of(&["x foo foo", "none", "foo"]);
    let set = index(&segments, "foo");
    let indices: Vec<_> = set.iter().map(|m| m.global_index).collect();
    assert_eq!(indices, vec![0, 1, 2]);
    let sources: Vec<_> = set.iter().map(|m| m.segment).collect();
    assert_eq!(sources, vec![0, 0, 2]);
}

#[test]
fn no_segments_means_no_matches() {
    assert!(index::<usize>(&[], "foo").is_empty());
}

#[test]
fn literal_pattern_find() {
    assert!(LiteralPattern::new("").is_none());
    let pattern = LiteralPattern::new("Todo").unwrap();
    assert_eq!(pattern.find("- [ ] TODO: write"), Some((6, 10)));
    assert_eq!(pattern.find("nothing"), None);
}

// --- navigator ---

#[test]
fn navigator_wraps_both_ways() {
    let mut nav = MatchNavigator::new();
    assert_eq!(nav.state(), NavigatorState { current: 0, total: 0 });
    assert_eq!(nav.next(), None);
    assert_eq!(nav.previous(), None);

    nav.reset(3);
    assert_eq!(nav.next(), Some(1));
    assert_eq!(nav.next(), Some(2));
    assert_eq!(nav.next(), Some(0));
    assert_eq!(nav.previous(), Some(2));
}

#[test]
fn navigator_select_ignores_out_of_range() {
    let mut nav = MatchNavigator::new();
    nav.reset(2);
    assert_eq!(nav.select(1), Some(1));
    assert_eq!(nav.select(5), None);
    assert_eq!(nav.current(), 1);
}

// --- highlight renderer ---

#[test]
fn highlight_round_trip_restores_text() {
    let mut tree = parse("# Foo title\n\nsome foo and FOO\n\n- foo `foo` item");
    let before = tree.text_content();
    let leaves_before = tree.leaves().len();

    let set = index(&segment(&tree), "foo");
    assert_eq!(set.len(), 4);

    let mut renderer = HighlightRenderer::new();
    renderer.apply_highlights(&mut tree, &set);
    assert_eq!(tree.marks().len(), 4);
    assert_eq!(tree.text_content(), before);

    renderer.clear_highlights(&mut tree);
    assert!(tree.marks().is_empty());
    assert_eq!(tree.text_content(), before);
    assert_eq!(tree.leaves().len(), leaves_before);
}

#[test]
fn exactly_one_match_is_current() {
    let mut tree = sample_tree();
    let set = index(&segment(&tree), "world");
    let mut renderer = HighlightRenderer::new();
    renderer.apply_highlights(&mut tree, &set);

    renderer.mark_current(&mut tree, 0);
    renderer.mark_current(&mut tree, 1);
    let current = tree.current_marks();
    assert_eq!(current.len(), 1);
    assert_eq!(Some(current[0]), renderer.marker(1));
    assert_eq!(tree.take_reveal(), renderer.marker(1));
}

#[test]
fn stale_leaves_are_skipped() {
    let mut tree = sample_tree();
    let set = index(&segment(&tree), "world");
    let doomed: NodeId = set.get(0).unwrap().segment;
    let parent = tree.parent(doomed).unwrap();
    tree.remove(parent);

    let mut renderer = HighlightRenderer::new();
    renderer.apply_highlights(&mut tree, &set);
    assert_eq!(renderer.len(), 2);
    assert_eq!(renderer.marker(0), None);
    assert!(renderer.marker(1).is_some());

    // Marking a stale match does nothing and does not panic.
    renderer.mark_current(&mut tree, 0);
    assert!(tree.current_marks().is_empty());
    assert_eq!(renderer.current(), None);
}

// --- coordinator ---

#[test]
fn end_to_end_skips_code_and_wraps() {
    let mut tree = sample_tree();
    let mut search = PageSearch::new();
    search.open(&mut tree);

    assert_eq!(search.set_query(&mut tree, "world"), 2);
    assert_eq!(search.navigator().current, 0);
    assert_eq!(search.counter(), Some((1, 2)));

    assert_eq!(search.next(&mut tree), Some(1));
    assert_eq!(search.counter(), Some((2, 2)));
    assert_eq!(search.next(&mut tree), Some(0));
    assert_eq!(tree.current_marks().len(), 1);
}

#[test]
fn changing_query_replaces_highlights() {
    let mut tree = sample_tree();
    let original = tree.text_content();
    let mut search = PageSearch::new();
    search.open(&mut tree);

    search.set_query(&mut tree, "world");
    search.set_query(&mut tree, "again");
    assert_eq!(tree.marks().len(), 1);
    assert_eq!(tree.text_content(), original);

    search.set_query(&mut tree, "");
    assert!(tree.marks().is_empty());
    assert_eq!(search.counter(), None);
}

#[test]
fn no_matches_shows_zero_counter() {
    let mut tree = sample_tree();
    let mut search = PageSearch::new();
    search.open(&mut tree);
    assert_eq!(search.set_query(&mut tree, "absent"), 0);
    assert_eq!(search.counter(), Some((0, 0)));
    assert_eq!(search.next(&mut tree), None);
}

#[test]
fn close_clears_highlights_and_keeps_query() {
    let mut tree = sample_tree();
    let mut search = PageSearch::new();
    search.open(&mut tree);
    search.set_query(&mut tree, "world");

    search.close(&mut tree);
    assert!(tree.marks().is_empty());
    assert!(!search.is_visible());
    assert_eq!(search.counter(), None);
    assert_eq!(search.query(), "world");

    search.open(&mut tree);
    assert_eq!(tree.marks().len(), 2);
    assert_eq!(search.counter(), Some((1, 2)));
}

#[test]
fn document_change_reruns_query() {
    let mut tree = sample_tree();
    let mut search = PageSearch::new();
    search.open(&mut tree);
    search.set_query(&mut tree, "world");

    let mut replacement = parse("world world world");
    search.document_changed(&mut replacement);
    assert_eq!(search.matches().len(), 3);
    assert_eq!(replacement.marks().len(), 3);
    assert_eq!(search.counter(), Some((1, 3)));
}

#[test]
fn commands_route_only_while_open() {
    let mut tree = sample_tree();
    let mut search = PageSearch::new();

    assert!(!search.handle_command(&mut tree, &Command::NextSearchResult));
    assert!(search.handle_command(&mut tree, &Command::PageSearch));
    search.set_query(&mut tree, "world");

    assert!(search.handle_command(&mut tree, &Command::NextSearchResult));
    assert_eq!(search.navigator().current, 1);
    assert!(search.handle_command(&mut tree, &Command::PrevSearchResult));
    assert_eq!(search.navigator().current, 0);
    assert!(search.handle_command(&mut tree, &Command::ClosePageSearch));
    assert!(!search.is_visible());
    assert!(!search.handle_command(&mut tree, &Command::ToggleSidebar));
}

#[test]
fn hidden_bar_stores_query_without_highlighting() {
    let mut tree = sample_tree();
    let mut search = PageSearch::new();

    assert_eq!(search.set_query(&mut tree, "world"), 0);
    assert!(tree.marks().is_empty());
    assert_eq!(search.counter(), None);
    assert_eq!(search.query(), "world");

    search.open(&mut tree);
    assert_eq!(tree.marks().len(), 2);
    assert_eq!(search.counter(), Some((1, 2)));
}
