//! Arena-backed rendered document.
//!
//! Nodes live in a `SlotMap`, so a `NodeId` that outlives its node simply stops
//! resolving instead of aliasing a new node.

use super::view::{DocumentTextView, Run};
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    pub struct NodeId;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Root,
    Heading { level: u8, id: String },
    Paragraph,
    ListItem { ordered: bool },
    BlockQuote,
    Table,
    TableRow,
    TableCell,
    ThematicBreak,
    CodeBlock { lang: Option<String> },
    InlineCode,
    Emphasis,
    Strong,
    Strikethrough,
    Link { href: String },
    Mark { current: bool },
    Text(String),
}

impl NodeKind {
    pub fn is_verbatim(&self) -> bool {
        matches!(self, NodeKind::CodeBlock { .. } | NodeKind::InlineCode)
    }

    pub fn is_text(&self) -> bool {
        matches!(self, NodeKind::Text(_))
    }

    pub fn is_mark(&self) -> bool {
        matches!(self, NodeKind::Mark { .. })
    }
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Debug, Clone)]
pub struct DocumentTree {
    nodes: SlotMap<NodeId, Node>,
    root: NodeId,
    reveal: Option<NodeId>,
}

impl Default for DocumentTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentTree {
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(Node {
            kind: NodeKind::Root,
            parent: None,
            children: Vec::new(),
        });
        Self {
            nodes,
            root,
            reveal: None,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.nodes.get(id).map(|n| &n.kind)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(id)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children(self.root).is_empty()
    }

    /// Appends a new child under `parent`. Returns `None` for a stale parent.
    pub fn append(&mut self, parent: NodeId, kind: NodeKind) -> Option<NodeId> {
        if !self.nodes.contains_key(parent) {
            return None;
        }
        let id = self.nodes.insert(Node {
            kind,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent].children.push(id);
        Some(id)
    }

    /// Appends text under `parent`, extending the last child when it is
    /// already a text node so text siblings never sit next to each other.
    pub fn append_text(&mut self, parent: NodeId, text: &str) -> Option<NodeId> {
        if text.is_empty() {
            return None;
        }
        let last = self.nodes.get(parent)?.children.last().copied();
        if let Some(last) = last {
            if let Some(NodeKind::Text(existing)) = self.nodes.get_mut(last).map(|n| &mut n.kind)
            {
                existing.push_str(text);
                return Some(last);
            }
        }
        self.append(parent, NodeKind::Text(text.to_string()))
    }

    /// Detaches and drops `id` with its whole subtree.
    pub fn remove(&mut self, id: NodeId) -> bool {
        if id == self.root || !self.nodes.contains_key(id) {
            return false;
        }
        if let Some(parent) = self.parent(id) {
            if let Some(p) = self.nodes.get_mut(parent) {
                p.children.retain(|c| *c != id);
            }
        }
        self.drop_subtree(id);
        true
    }

    fn drop_subtree(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(node) = self.nodes.remove(next) {
                stack.extend(node.children);
            }
        }
    }

    /// All nodes in depth-first pre-order, root first.
    pub fn preorder(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get(id) else {
                continue;
            };
            out.push(id);
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }

    pub fn text_content(&self) -> String {
        self.subtree_text(self.root)
    }

    pub fn subtree_text(&self, id: NodeId) -> String {
        let mut out = String::new();
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            let Some(node) = self.nodes.get(next) else {
                continue;
            };
            if let NodeKind::Text(text) = &node.kind {
                out.push_str(text);
            }
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }

    pub fn marks(&self) -> Vec<NodeId> {
        self.preorder()
            .into_iter()
            .filter(|id| self.kind(*id).is_some_and(NodeKind::is_mark))
            .collect()
    }

    pub fn current_marks(&self) -> Vec<NodeId> {
        self.preorder()
            .into_iter()
            .filter(|id| matches!(self.kind(*id), Some(NodeKind::Mark { current: true })))
            .collect()
    }

    /// The marker most recently asked to be scrolled into view.
    pub fn take_reveal(&mut self) -> Option<NodeId> {
        self.reveal.take()
    }

    fn child_index(&self, parent: NodeId, child: NodeId) -> Option<usize> {
        self.nodes
            .get(parent)?
            .children
            .iter()
            .position(|c| *c == child)
    }

    fn new_node(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        self.nodes.insert(Node {
            kind,
            parent: Some(parent),
            children: Vec::new(),
        })
    }
}

impl DocumentTextView for DocumentTree {
    type Leaf = NodeId;

    fn leaves(&self) -> Vec<NodeId> {
        self.preorder()
            .into_iter()
            .filter(|id| self.kind(*id).is_some_and(NodeKind::is_text))
            .collect()
    }

    fn text(&self, leaf: NodeId) -> Option<&str> {
        match self.kind(leaf)? {
            NodeKind::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }

    fn is_verbatim(&self, leaf: NodeId) -> bool {
        let mut cursor = Some(leaf);
        while let Some(id) = cursor {
            let Some(node) = self.nodes.get(id) else {
                return false;
            };
            if node.kind.is_verbatim() {
                return true;
            }
            cursor = node.parent;
        }
        false
    }

    fn replace(&mut self, leaf: NodeId, runs: &[Run<'_>]) -> Option<Vec<NodeId>> {
        if !self.kind(leaf)?.is_text() {
            return None;
        }
        let parent = self.parent(leaf)?;
        let index = self.child_index(parent, leaf)?;

        let mut replacement = Vec::with_capacity(runs.len());
        let mut markers = Vec::new();
        for run in runs {
            match *run {
                Run::Text(text) => {
                    if text.is_empty() {
                        continue;
                    }
                    replacement.push(self.new_node(parent, NodeKind::Text(text.to_string())));
                }
                Run::Mark(text) => {
                    let mark = self.new_node(parent, NodeKind::Mark { current: false });
                    let inner = self.new_node(mark, NodeKind::Text(text.to_string()));
                    self.nodes[mark].children.push(inner);
                    replacement.push(mark);
                    markers.push(mark);
                }
            }
        }

        self.nodes[parent]
            .children
            .splice(index..=index, replacement);
        self.nodes.remove(leaf);
        Some(markers)
    }

    fn unwrap_marker(&mut self, marker: NodeId) -> bool {
        if !self.kind(marker).is_some_and(NodeKind::is_mark) {
            return false;
        }
        let Some(parent) = self.parent(marker) else {
            return false;
        };
        let Some(index) = self.child_index(parent, marker) else {
            return false;
        };

        let text = self.subtree_text(marker);
        self.nodes[parent].children.remove(index);
        self.drop_subtree(marker);

        let siblings = &self.nodes[parent].children;
        let prev = index
            .checked_sub(1)
            .and_then(|i| siblings.get(i).copied())
            .filter(|id| self.kind(*id).is_some_and(NodeKind::is_text));
        let next = siblings
            .get(index)
            .copied()
            .filter(|id| self.kind(*id).is_some_and(NodeKind::is_text));

        match (prev, next) {
            (Some(prev), Some(next)) => {
                let tail = match self.nodes.remove(next).map(|n| n.kind) {
                    Some(NodeKind::Text(tail)) => tail,
                    _ => String::new(),
                };
                self.nodes[parent].children.remove(index);
                if let NodeKind::Text(head) = &mut self.nodes[prev].kind {
                    head.push_str(&text);
                    head.push_str(&tail);
                }
            }
            (Some(prev), None) => {
                if let NodeKind::Text(head) = &mut self.nodes[prev].kind {
                    head.push_str(&text);
                }
            }
            (None, Some(next)) => {
                if let NodeKind::Text(tail) = &mut self.nodes[next].kind {
                    tail.insert_str(0, &text);
                }
            }
            (None, None) => {
                if !text.is_empty() {
                    let id = self.new_node(parent, NodeKind::Text(text));
                    self.nodes[parent].children.insert(index, id);
                }
            }
        }

        if self.reveal == Some(marker) {
            self.reveal = None;
        }
        true
    }

    fn set_current(&mut self, marker: NodeId, current: bool) -> bool {
        match self.nodes.get_mut(marker).map(|n| &mut n.kind) {
            Some(NodeKind::Mark { current: flag }) => {
                *flag = current;
                true
            }
            _ => false,
        }
    }

    fn scroll_into_view(&mut self, marker: NodeId) {
        if self.contains(marker) {
            self.reveal = Some(marker);
        }
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/kernel/document/tree.rs"]
mod tests;
