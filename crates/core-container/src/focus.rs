//! Keyboard focus tracking.
//!
//! The focused leaf is held as a `NodeId` into the arena and re-validated
//! whenever the tree changes. Traversal order is tree pre-order; a group is
//! the subset of leaves that are members of it (see `Node::in_group`).

use crate::node::{NodeId, Tree};
use tracing::debug;

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct FocusTracker {
    focused: Option<NodeId>,
}

impl FocusTracker {
    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    /// Focus `id` if it is a live leaf. Returns whether focus changed.
    pub fn set(&mut self, tree: &Tree, id: NodeId) -> bool {
        if !tree.get(id).is_some_and(|n| n.is_leaf()) || self.focused == Some(id) {
            return false;
        }
        debug!(target: "container.focus", from = ?self.focused, to = %id, "focus_changed");
        self.focused = Some(id);
        true
    }

    /// Re-establish a valid focus after the tree changed: keep the current
    /// leaf if it still exists, else fall back to the first leaf of the
    /// default cycle (or the first leaf at all).
    pub fn reconcile(&mut self, tree: &Tree) {
        if self
            .focused
            .is_some_and(|id| tree.get(id).is_some_and(|n| n.is_leaf()))
        {
            return;
        }
        let leaves = tree.leaves();
        let fallback = leaves
            .iter()
            .copied()
            .find(|id| tree.get(*id).is_some_and(|n| n.in_group(0)))
            // Every leaf is skipped: focus still needs a home, and skipped
            // leaves stay reachable through their explicit groups.
            .or_else(|| leaves.first().copied());
        if fallback != self.focused {
            debug!(target: "container.focus", from = ?self.focused, to = ?fallback, "focus_fallback");
        }
        self.focused = fallback;
    }

    /// Move to the next (or previous) member of `group` in pre-order,
    /// wrapping around. For explicit groups the move only happens when the
    /// focused leaf is itself a member. Returns whether focus changed.
    pub fn step(&mut self, tree: &Tree, group: u32, forward: bool) -> bool {
        let leaves = tree.leaves();
        let n = leaves.len();
        if n == 0 {
            return false;
        }
        let current = self
            .focused
            .and_then(|f| leaves.iter().position(|id| *id == f));
        if group != 0 {
            let member = current
                .and_then(|i| tree.get(leaves[i]))
                .is_some_and(|node| node.in_group(group));
            if !member {
                return false;
            }
        }
        for step in 1..=n {
            let idx = match (current, forward) {
                (Some(i), true) => (i + step) % n,
                (Some(i), false) => (i + n - step) % n,
                (None, true) => step - 1,
                (None, false) => n - step,
            };
            let candidate = leaves[idx];
            if tree.get(candidate).is_some_and(|node| node.in_group(group)) {
                return self.set(tree, candidate);
            }
        }
        false
    }
}
