//! Container options and their application to the tree.

use crate::Container;
use crate::error::ContainerError;
use crate::node::{NodeId, NodeKind, SplitPolicy, Tree};
use core_events::Key;
use core_model::{Color, HAlign, LineStyle, Orientation, Padding, VAlign};
use core_widget::Widget;
use std::fmt;
use std::sync::Arc;

/// Handler run when a global key is pressed. It receives the container so it
/// can change focus or the layout.
pub type GlobalKeyHandler = Arc<dyn Fn(&mut Container) + Send + Sync>;

#[derive(Clone)]
pub enum ContainerOption {
    /// Identifier used to address this container in `update`.
    Id(String),
    Border(LineStyle),
    BorderTitle(String),
    BorderTitleAlign(HAlign),
    BorderColor(Color),
    /// Border color while the container holds focus.
    FocusedColor(Color),
    Padding(Padding),
    AlignHorizontal(HAlign),
    AlignVertical(VAlign),
    PlaceWidget(Arc<dyn Widget>),
    Split {
        orientation: Orientation,
        policy: SplitPolicy,
        first: Vec<ContainerOption>,
        second: Vec<ContainerOption>,
    },
    /// Remove the widget or the children, leaving an empty leaf.
    Clear,
    /// Give this container keyboard focus.
    Focused,
    /// Explicit focus groups this container belongs to; 0 is reserved.
    KeyFocusGroups(Vec<u32>),
    /// Leave this container out of the default focus cycle.
    KeyFocusSkip,
    KeyFocusNext(Key),
    KeyFocusPrevious(Key),
    /// Move to the next member of `group`, when the focused container is in it.
    KeyFocusGroupsNext(Key, u32),
    KeyFocusGroupsPrevious(Key, u32),
    GlobalKey(Key, GlobalKeyHandler),
}

impl fmt::Debug for ContainerOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContainerOption::Id(id) => write!(f, "Id({id:?})"),
            ContainerOption::Border(s) => write!(f, "Border({s:?})"),
            ContainerOption::BorderTitle(t) => write!(f, "BorderTitle({t:?})"),
            ContainerOption::BorderTitleAlign(a) => write!(f, "BorderTitleAlign({a:?})"),
            ContainerOption::BorderColor(c) => write!(f, "BorderColor({c:?})"),
            ContainerOption::FocusedColor(c) => write!(f, "FocusedColor({c:?})"),
            ContainerOption::Padding(p) => write!(f, "Padding({p:?})"),
            ContainerOption::AlignHorizontal(a) => write!(f, "AlignHorizontal({a:?})"),
            ContainerOption::AlignVertical(a) => write!(f, "AlignVertical({a:?})"),
            ContainerOption::PlaceWidget(_) => f.write_str("PlaceWidget(..)"),
            ContainerOption::Split {
                orientation,
                policy,
                first,
                second,
            } => f
                .debug_struct("Split")
                .field("orientation", orientation)
                .field("policy", policy)
                .field("first", first)
                .field("second", second)
                .finish(),
            ContainerOption::Clear => f.write_str("Clear"),
            ContainerOption::Focused => f.write_str("Focused"),
            ContainerOption::KeyFocusGroups(g) => write!(f, "KeyFocusGroups({g:?})"),
            ContainerOption::KeyFocusSkip => f.write_str("KeyFocusSkip"),
            ContainerOption::KeyFocusNext(k) => write!(f, "KeyFocusNext({k})"),
            ContainerOption::KeyFocusPrevious(k) => write!(f, "KeyFocusPrevious({k})"),
            ContainerOption::KeyFocusGroupsNext(k, g) => write!(f, "KeyFocusGroupsNext({k}, {g})"),
            ContainerOption::KeyFocusGroupsPrevious(k, g) => {
                write!(f, "KeyFocusGroupsPrevious({k}, {g})")
            }
            ContainerOption::GlobalKey(k, _) => write!(f, "GlobalKey({k}, ..)"),
        }
    }
}

/// Left / right split.
pub fn split_vertical(
    left: Vec<ContainerOption>,
    right: Vec<ContainerOption>,
    policy: SplitPolicy,
) -> ContainerOption {
    ContainerOption::Split {
        orientation: Orientation::Vertical,
        policy,
        first: left,
        second: right,
    }
}

/// Top / bottom split.
pub fn split_horizontal(
    top: Vec<ContainerOption>,
    bottom: Vec<ContainerOption>,
    policy: SplitPolicy,
) -> ContainerOption {
    ContainerOption::Split {
        orientation: Orientation::Horizontal,
        policy,
        first: top,
        second: bottom,
    }
}

pub fn place_widget<W: Widget + 'static>(widget: Arc<W>) -> ContainerOption {
    ContainerOption::PlaceWidget(widget)
}

pub fn global_key<F>(key: Key, handler: F) -> ContainerOption
where
    F: Fn(&mut Container) + Send + Sync + 'static,
{
    ContainerOption::GlobalKey(key, Arc::new(handler))
}

/// Container-wide key bindings.
#[derive(Clone)]
pub(crate) struct Bindings {
    pub focus_next: Option<Key>,
    pub focus_previous: Option<Key>,
    pub group_next: Vec<(Key, u32)>,
    pub group_previous: Vec<(Key, u32)>,
    pub global: Vec<(Key, GlobalKeyHandler)>,
}

impl Default for Bindings {
    fn default() -> Self {
        Self {
            focus_next: Some(Key::Tab),
            focus_previous: Some(Key::Backtab),
            group_next: Vec::new(),
            group_previous: Vec::new(),
            global: Vec::new(),
        }
    }
}

impl Bindings {
    fn validate(&self) -> Result<(), ContainerError> {
        if self.focus_next.is_some() && self.focus_next == self.focus_previous {
            return Err(ContainerError::Conflict(format!(
                "key {} moves focus both forward and backward",
                self.focus_next.map(|k| k.to_string()).unwrap_or_default()
            )));
        }
        let focus_keys = self
            .focus_next
            .iter()
            .chain(self.focus_previous.iter())
            .chain(self.group_next.iter().map(|(k, _)| k))
            .chain(self.group_previous.iter().map(|(k, _)| k));
        for key in focus_keys {
            if self.global.iter().any(|(g, _)| g == key) {
                return Err(ContainerError::Conflict(format!(
                    "key {key} is bound both as a global key and a focus key"
                )));
            }
        }
        Ok(())
    }
}

/// Applies option lists to a scratch copy of the tree. The caller swaps the
/// copy in only when everything, including validation, succeeded.
pub(crate) struct Apply<'a> {
    pub tree: &'a mut Tree,
    pub bindings: &'a mut Bindings,
    pub focus_request: Option<NodeId>,
}

impl Apply<'_> {
    pub fn apply(&mut self, at: NodeId, opts: Vec<ContainerOption>) -> Result<(), ContainerError> {
        for opt in opts {
            self.apply_one(at, opt)?;
        }
        Ok(())
    }

    fn node(&mut self, at: NodeId) -> Result<&mut crate::node::Node, ContainerError> {
        let label = self.tree.label(at);
        self.tree
            .get_mut(at)
            .ok_or(ContainerError::NotFound(label))
    }

    fn apply_one(&mut self, at: NodeId, opt: ContainerOption) -> Result<(), ContainerError> {
        match opt {
            ContainerOption::Id(id) => {
                if id.is_empty() {
                    return Err(ContainerError::InvalidOption(
                        "container id must not be empty".into(),
                    ));
                }
                self.node(at)?.id = Some(id);
            }
            ContainerOption::Border(style) => {
                self.node(at)?.deco.border = style.runes().map(|_| style);
            }
            ContainerOption::BorderTitle(title) => self.node(at)?.deco.title = Some(title),
            ContainerOption::BorderTitleAlign(a) => self.node(at)?.deco.title_align = a,
            ContainerOption::BorderColor(c) => self.node(at)?.deco.border_color = c,
            ContainerOption::FocusedColor(c) => self.node(at)?.deco.focused_color = c,
            ContainerOption::Padding(p) => {
                if p.top < 0 || p.right < 0 || p.bottom < 0 || p.left < 0 {
                    return Err(ContainerError::InvalidOption(format!(
                        "padding must not be negative, got {p:?}"
                    )));
                }
                self.node(at)?.padding = p;
            }
            ContainerOption::AlignHorizontal(a) => self.node(at)?.halign = a,
            ContainerOption::AlignVertical(a) => self.node(at)?.valign = a,
            ContainerOption::PlaceWidget(widget) => {
                let label = self.tree.label(at);
                let node = self.node(at)?;
                if !node.is_leaf() {
                    return Err(ContainerError::WidgetOnSplit(label));
                }
                node.kind = NodeKind::Leaf(Some(widget));
            }
            ContainerOption::Split {
                orientation,
                policy,
                first,
                second,
            } => {
                policy.validate()?;
                let label = self.tree.label(at);
                if self.node(at)?.widget().is_some() {
                    return Err(ContainerError::SplitOnWidget(label));
                }
                self.tree.clear_children(at);
                let a = self.tree.alloc(Default::default());
                let b = self.tree.alloc(Default::default());
                self.node(at)?.kind = NodeKind::Split {
                    orientation,
                    policy,
                    first: a,
                    second: b,
                };
                self.apply(a, first)?;
                self.apply(b, second)?;
            }
            ContainerOption::Clear => self.tree.clear_children(at),
            ContainerOption::Focused => self.focus_request = Some(at),
            ContainerOption::KeyFocusGroups(mut groups) => {
                if groups.contains(&0) {
                    return Err(ContainerError::InvalidOption(
                        "focus group 0 is reserved for the default cycle".into(),
                    ));
                }
                groups.sort_unstable();
                groups.dedup();
                self.node(at)?.groups = groups;
            }
            ContainerOption::KeyFocusSkip => self.node(at)?.skip = true,
            ContainerOption::KeyFocusNext(k) => self.bindings.focus_next = Some(k),
            ContainerOption::KeyFocusPrevious(k) => self.bindings.focus_previous = Some(k),
            ContainerOption::KeyFocusGroupsNext(k, g) => {
                check_group(g)?;
                self.bindings.group_next.retain(|b| *b != (k, g));
                self.bindings.group_next.push((k, g));
            }
            ContainerOption::KeyFocusGroupsPrevious(k, g) => {
                check_group(g)?;
                self.bindings.group_previous.retain(|b| *b != (k, g));
                self.bindings.group_previous.push((k, g));
            }
            ContainerOption::GlobalKey(k, handler) => {
                self.bindings.global.retain(|(g, _)| *g != k);
                self.bindings.global.push((k, handler));
            }
        }
        Ok(())
    }

    /// Whole-tree checks run after all options are applied.
    pub fn validate(&self) -> Result<(), ContainerError> {
        let mut seen = std::collections::HashSet::new();
        for id in self.tree.preorder() {
            if let Some(name) = self.tree.get(id).and_then(|n| n.id.as_deref())
                && !seen.insert(name)
            {
                return Err(ContainerError::DuplicateId(name.to_string()));
            }
        }
        if let Some(target) = self.focus_request
            && !self.tree.get(target).is_some_and(|n| n.is_leaf())
        {
            return Err(ContainerError::InvalidOption(format!(
                "{} cannot take focus: only leaves are focusable",
                self.tree.label(target)
            )));
        }
        self.bindings.validate()
    }
}

fn check_group(group: u32) -> Result<(), ContainerError> {
    if group == 0 {
        return Err(ContainerError::InvalidOption(
            "group navigation keys need an explicit group, 0 is the default cycle".into(),
        ));
    }
    Ok(())
}
