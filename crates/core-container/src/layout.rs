//! Top-down area assignment.
//!
//! Each node gets an `area`; its border (if any) and padding are removed to
//! form `inner`, which a split divides between its children and a leaf hands
//! to its widget after applying the widget's min/max/ratio and the leaf's
//! alignment. A node whose area cannot satisfy this is marked
//! `ResizeNeeded` together with its whole subtree; siblings are unaffected.

use crate::node::{NodeId, NodeKind, Tree};
use core_model::{Rect, Size, align_rect, area};
use core_widget::WidgetOptions;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutState {
    #[default]
    Ready,
    /// The assigned area is smaller than the node needs.
    ResizeNeeded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NodeLayout {
    /// Full area including the border.
    pub area: Rect,
    /// Area inside the border and padding.
    pub inner: Rect,
    /// Area handed to the widget; equals `inner` for empty leaves and splits.
    pub widget: Rect,
    pub state: LayoutState,
    /// Widget options sampled during this layout.
    pub options: WidgetOptions,
}

impl NodeLayout {
    pub fn is_ready(&self) -> bool {
        self.state == LayoutState::Ready
    }
}

/// Layout of every node slot, indexed by `NodeId`.
#[derive(Debug, Clone, Default)]
pub(crate) struct Layout {
    nodes: Vec<Option<NodeLayout>>,
}

impl Layout {
    pub fn get(&self, id: NodeId) -> Option<&NodeLayout> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }
}

pub(crate) fn compute(tree: &Tree, size: Size) -> Layout {
    let mut layout = Layout {
        nodes: vec![None; tree.capacity()],
    };
    assign(tree, &mut layout, tree.root(), Rect::from_size(size));
    trace!(target: "container.layout", width = size.width, height = size.height, "layout_computed");
    layout
}

fn inner_area(tree: &Tree, id: NodeId, area: &Rect) -> Rect {
    let Some(node) = tree.get(id) else {
        return Rect::ZERO;
    };
    let framed = if node.deco.border.is_some() {
        area::exclude_border(area)
    } else {
        *area
    };
    area::shrink(&framed, node.padding)
}

fn assign(tree: &Tree, layout: &mut Layout, id: NodeId, area: Rect) {
    let Some(node) = tree.get(id) else {
        return;
    };
    let inner = inner_area(tree, id, &area);
    let mut entry = NodeLayout {
        area,
        inner,
        widget: inner,
        state: LayoutState::Ready,
        options: WidgetOptions::default(),
    };

    match &node.kind {
        NodeKind::Split {
            orientation,
            policy,
            first,
            second,
        } => match policy.split(&inner, *orientation) {
            Ok((a, b)) if !inner.is_empty() => {
                layout.nodes[id.0] = Some(entry);
                assign(tree, layout, *first, a);
                assign(tree, layout, *second, b);
            }
            _ => {
                trace!(target: "container.layout", node = %id, "split_resize_needed");
                entry.state = LayoutState::ResizeNeeded;
                layout.nodes[id.0] = Some(entry);
                mark_resize_needed(tree, layout, *first);
                mark_resize_needed(tree, layout, *second);
            }
        },
        NodeKind::Leaf(None) => {
            layout.nodes[id.0] = Some(entry);
        }
        NodeKind::Leaf(Some(widget)) => {
            let opts = widget.options();
            entry.options = opts;
            let capped = area::cap_size(inner.size(), opts.max_size);
            let shaped = area::with_ratio(&Rect::at(inner.min, capped), opts.ratio);
            if shaped.is_empty() || !shaped.size().covers(opts.min_size) {
                trace!(target: "container.layout", node = %id, "leaf_resize_needed");
                entry.state = LayoutState::ResizeNeeded;
                entry.widget = Rect::at(inner.min, Size::ZERO);
            } else {
                entry.widget = align_rect(&inner, shaped.size(), node.halign, node.valign);
            }
            layout.nodes[id.0] = Some(entry);
        }
    }
}

fn mark_resize_needed(tree: &Tree, layout: &mut Layout, id: NodeId) {
    let Some(node) = tree.get(id) else {
        return;
    };
    layout.nodes[id.0] = Some(NodeLayout {
        state: LayoutState::ResizeNeeded,
        options: node.widget().map(|w| w.options()).unwrap_or_default(),
        ..NodeLayout::default()
    });
    if let NodeKind::Split { first, second, .. } = node.kind {
        mark_resize_needed(tree, layout, first);
        mark_resize_needed(tree, layout, second);
    }
}
