//! Arena storage for the container tree.
//!
//! Nodes live in a `Vec<Option<Node>>` and refer to each other by `NodeId`
//! index. Removing a subtree frees its slots for reuse. There are no parent
//! pointers; everything that needs ancestry walks down from the root.

use crate::error::ContainerError;
use core_model::area::{self, AreaError};
use core_model::{Color, HAlign, LineStyle, Orientation, Padding, Rect, VAlign};
use core_widget::Widget;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How a split divides its area between the two children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitPolicy {
    /// Percentage of the area given to the first child, `1..=99`.
    Percent(i32),
    /// Cells reserved for the first child.
    Fixed(i32),
    /// Cells reserved for the second child.
    FixedFromEnd(i32),
}

impl SplitPolicy {
    pub(crate) fn validate(&self) -> Result<(), ContainerError> {
        match *self {
            SplitPolicy::Percent(p) if !(1..=99).contains(&p) => Err(ContainerError::InvalidSplit(
                format!("percentage {p} must be within 1..=99"),
            )),
            SplitPolicy::Fixed(k) | SplitPolicy::FixedFromEnd(k) if k < 1 => Err(
                ContainerError::InvalidSplit(format!("fixed size {k} must be at least one cell")),
            ),
            _ => Ok(()),
        }
    }

    pub(crate) fn split(&self, r: &Rect, o: Orientation) -> Result<(Rect, Rect), AreaError> {
        match *self {
            SplitPolicy::Percent(p) => area::split_percent(r, o, p),
            SplitPolicy::Fixed(k) => area::split_fixed(r, o, k),
            SplitPolicy::FixedFromEnd(k) => area::split_fixed_from_end(r, o, k),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Decoration {
    pub border: Option<LineStyle>,
    pub title: Option<String>,
    pub title_align: HAlign,
    pub border_color: Color,
    pub focused_color: Color,
}

impl Default for Decoration {
    fn default() -> Self {
        Self {
            border: None,
            title: None,
            title_align: HAlign::Left,
            border_color: Color::Default,
            focused_color: Color::Yellow,
        }
    }
}

#[derive(Clone)]
pub(crate) enum NodeKind {
    Leaf(Option<Arc<dyn Widget>>),
    Split {
        orientation: Orientation,
        policy: SplitPolicy,
        first: NodeId,
        second: NodeId,
    },
}

#[derive(Clone, Default)]
pub(crate) struct Node {
    pub id: Option<String>,
    pub deco: Decoration,
    pub padding: Padding,
    pub halign: HAlign,
    pub valign: VAlign,
    /// Explicit focus groups (never 0).
    pub groups: Vec<u32>,
    /// Excluded from the default (group 0) cycle.
    pub skip: bool,
    pub kind: NodeKind,
}

impl Default for NodeKind {
    fn default() -> Self {
        NodeKind::Leaf(None)
    }
}

impl Node {
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf(_))
    }

    pub fn widget(&self) -> Option<&Arc<dyn Widget>> {
        match &self.kind {
            NodeKind::Leaf(w) => w.as_ref(),
            NodeKind::Split { .. } => None,
        }
    }

    pub fn in_group(&self, group: u32) -> bool {
        if group == 0 {
            !self.skip
        } else {
            self.groups.contains(&group)
        }
    }
}

#[derive(Clone)]
pub(crate) struct Tree {
    nodes: Vec<Option<Node>>,
    root: NodeId,
}

impl Tree {
    pub fn new() -> Self {
        Self {
            nodes: vec![Some(Node::default())],
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of slots, live or free. Layout tables are sized by this.
    pub fn capacity(&self) -> usize {
        self.nodes.len()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0).and_then(Option::as_mut)
    }

    pub fn alloc(&mut self, node: Node) -> NodeId {
        if let Some(free) = self.nodes.iter().position(Option::is_none) {
            self.nodes[free] = Some(node);
            NodeId(free)
        } else {
            self.nodes.push(Some(node));
            NodeId(self.nodes.len() - 1)
        }
    }

    /// Free every descendant of `id`, turning it into an empty leaf.
    pub fn clear_children(&mut self, id: NodeId) {
        let children = match self.get(id).map(|n| &n.kind) {
            Some(NodeKind::Split { first, second, .. }) => vec![*first, *second],
            _ => Vec::new(),
        };
        for child in children {
            self.clear_children(child);
            if let Some(slot) = self.nodes.get_mut(child.0) {
                *slot = None;
            }
        }
        if let Some(node) = self.get_mut(id) {
            node.kind = NodeKind::Leaf(None);
        }
    }

    /// All live nodes, parents before children, first child before second.
    pub fn preorder(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let Some(node) = self.get(id) else {
                continue;
            };
            out.push(id);
            if let NodeKind::Split { first, second, .. } = node.kind {
                stack.push(second);
                stack.push(first);
            }
        }
        out
    }

    pub fn leaves(&self) -> Vec<NodeId> {
        self.preorder()
            .into_iter()
            .filter(|id| self.get(*id).is_some_and(Node::is_leaf))
            .collect()
    }

    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.preorder()
            .into_iter()
            .find(|id| self.get(*id).and_then(|n| n.id.as_deref()) == Some(name))
    }

    /// Human-readable label for errors and logs: the id if set, else `#n`.
    pub fn label(&self, id: NodeId) -> String {
        match self.get(id).and_then(|n| n.id.as_deref()) {
            Some(name) => format!("container `{name}`"),
            None => format!("container {id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(tree: &mut Tree, at: NodeId) -> (NodeId, NodeId) {
        let first = tree.alloc(Node::default());
        let second = tree.alloc(Node::default());
        tree.get_mut(at).unwrap().kind = NodeKind::Split {
            orientation: Orientation::Vertical,
            policy: SplitPolicy::Percent(50),
            first,
            second,
        };
        (first, second)
    }

    #[test]
    fn preorder_visits_first_child_first() {
        let mut tree = Tree::new();
        let root = tree.root();
        let (a, b) = split(&mut tree, root);
        let (c, d) = split(&mut tree, a);
        assert_eq!(tree.preorder(), vec![tree.root(), a, c, d, b]);
        assert_eq!(tree.leaves(), vec![c, d, b]);
    }

    #[test]
    fn clearing_frees_slots_for_reuse() {
        let mut tree = Tree::new();
        let root = tree.root();
        let (a, _) = split(&mut tree, root);
        let (c, _) = split(&mut tree, a);
        tree.clear_children(a);
        assert!(tree.get(c).is_none());
        assert!(tree.get(a).unwrap().is_leaf());
        let reused = tree.alloc(Node::default());
        assert!(reused.0 < tree.capacity());
        assert_eq!(tree.capacity(), 5);
    }

    #[test]
    fn policy_validation() {
        assert!(SplitPolicy::Percent(0).validate().is_err());
        assert!(SplitPolicy::Percent(100).validate().is_err());
        assert!(SplitPolicy::Percent(1).validate().is_ok());
        assert!(SplitPolicy::Fixed(0).validate().is_err());
        assert!(SplitPolicy::FixedFromEnd(-2).validate().is_err());
    }
}
