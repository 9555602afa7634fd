//! Container split tree: layout, focus and event routing.
//!
//! A `Container` owns a tree of nodes. Each node is either a split dividing
//! its area between two children or a leaf that may hold one widget. Nodes
//! are configured with [`ContainerOption`]s at construction and later through
//! [`Container::update`], addressed by the string id given with
//! `ContainerOption::Id`.
//!
//! Updates are transactional: options are applied to a copy of the tree and
//! the copy replaces the live tree only if every option applied and the
//! result validated. On error the container is unchanged.

mod distribute;
mod error;
mod focus;
mod layout;
mod node;
mod options;

pub use distribute::{Consumer, DispatchReport, WidgetFailure};
pub use error::ContainerError;
pub use layout::{LayoutState, NodeLayout};
pub use node::{NodeId, SplitPolicy};
pub use options::{
    ContainerOption, GlobalKeyHandler, global_key, place_widget, split_horizontal,
    split_vertical,
};

use core_model::{Color, HAlign, LineStyle, Size};
use core_terminal::Display;
use core_widget::Widget;
use focus::FocusTracker;
use layout::Layout;
use node::Tree;
use options::{Apply, Bindings};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

pub struct Container {
    tree: Tree,
    bindings: Bindings,
    size: Size,
    layout: Layout,
    focus: FocusTracker,
}

/// Read-only view of one node, as the renderer needs it.
#[derive(Clone)]
pub struct NodeView<'a> {
    pub node: NodeId,
    pub id: Option<&'a str>,
    pub is_leaf: bool,
    pub widget: Option<&'a Arc<dyn Widget>>,
    pub layout: NodeLayout,
    pub border: Option<LineStyle>,
    pub title: Option<&'a str>,
    pub title_align: HAlign,
    pub border_color: Color,
    pub focused_color: Color,
    pub focused: bool,
}

impl Container {
    /// Build a container covering the whole display.
    pub fn new<D: Display>(display: &D, opts: Vec<ContainerOption>) -> anyhow::Result<Self> {
        let size = display.size()?;
        Ok(Self::with_size(size, opts)?)
    }

    pub fn with_size(size: Size, opts: Vec<ContainerOption>) -> Result<Self, ContainerError> {
        let mut container = Self {
            tree: Tree::new(),
            bindings: Bindings::default(),
            size,
            layout: Layout::default(),
            focus: FocusTracker::default(),
        };
        let root = container.tree.root();
        container.apply(root, opts)?;
        Ok(container)
    }

    /// Apply `opts` to the container with the given id.
    pub fn update(&mut self, id: &str, opts: Vec<ContainerOption>) -> Result<(), ContainerError> {
        let Some(target) = self.tree.find(id) else {
            return Err(ContainerError::NotFound(id.to_string()));
        };
        let count = opts.len();
        self.apply(target, opts)?;
        info!(target: "container.update", id, options = count, "container_updated");
        Ok(())
    }

    fn apply(&mut self, at: NodeId, opts: Vec<ContainerOption>) -> Result<(), ContainerError> {
        let mut tree = self.tree.clone();
        let mut bindings = self.bindings.clone();
        let mut apply = Apply {
            tree: &mut tree,
            bindings: &mut bindings,
            focus_request: None,
        };
        apply.apply(at, opts)?;
        apply.validate()?;
        let focus_request = apply.focus_request;

        self.tree = tree;
        self.bindings = bindings;
        self.relayout();
        if let Some(target) = focus_request {
            self.focus.set(&self.tree, target);
        }
        Ok(())
    }

    /// Recompute every node's area and re-validate focus. Widget options are
    /// sampled again, so this also picks up changed size constraints.
    pub fn relayout(&mut self) {
        self.layout = layout::compute(&self.tree, self.size);
        self.focus.reconcile(&self.tree);
    }

    pub fn resize(&mut self, size: Size) {
        if size != self.size {
            debug!(target: "container.layout", width = size.width, height = size.height, "resize");
        }
        self.size = size;
        self.relayout();
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn node_id(&self, id: &str) -> Option<NodeId> {
        self.tree.find(id)
    }

    pub fn layout_of(&self, id: &str) -> Option<NodeLayout> {
        self.tree.find(id).and_then(|n| self.layout.get(n)).copied()
    }

    pub fn focused_node(&self) -> Option<NodeId> {
        self.focus.focused()
    }

    pub fn focused_id(&self) -> Option<&str> {
        self.focus
            .focused()
            .and_then(|f| self.tree.get(f))
            .and_then(|n| n.id.as_deref())
    }

    /// Focus the leaf with the given id.
    pub fn focus(&mut self, id: &str) -> Result<(), ContainerError> {
        let target = self
            .tree
            .find(id)
            .ok_or_else(|| ContainerError::NotFound(id.to_string()))?;
        if !self.tree.get(target).is_some_and(|n| n.is_leaf()) {
            return Err(ContainerError::InvalidOption(format!(
                "{} cannot take focus: only leaves are focusable",
                self.tree.label(target)
            )));
        }
        self.focus.set(&self.tree, target);
        Ok(())
    }

    pub fn focus_next(&mut self) -> bool {
        self.focus.step(&self.tree, 0, true)
    }

    pub fn focus_previous(&mut self) -> bool {
        self.focus.step(&self.tree, 0, false)
    }

    /// Every live node in pre-order.
    pub fn nodes(&self) -> Vec<NodeView<'_>> {
        let focused = self.focus.focused();
        self.tree
            .preorder()
            .into_iter()
            .filter_map(|id| {
                let node = self.tree.get(id)?;
                let layout = self.layout.get(id).copied().unwrap_or_default();
                Some(NodeView {
                    node: id,
                    id: node.id.as_deref(),
                    is_leaf: node.is_leaf(),
                    widget: node.widget(),
                    layout,
                    border: node.deco.border,
                    title: node.deco.title.as_deref(),
                    title_align: node.deco.title_align,
                    border_color: node.deco.border_color,
                    focused_color: node.deco.focused_color,
                    focused: focused == Some(id),
                })
            })
            .collect()
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("size", &self.size)
            .field("nodes", &self.tree.preorder().len())
            .field("focused", &self.focus.focused())
            .finish()
    }
}
