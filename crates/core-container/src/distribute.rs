//! Keyboard and mouse routing.
//!
//! Keyboard precedence, first match wins:
//! 1. a focused widget holding the keyboard exclusively gets the key;
//! 2. global keys run their handler;
//! 3. focus keys move focus;
//! 4. widgets get the key by scope (`Focused` only while focused, `Global`
//!    always).
//!
//! Mouse events are hit-tested against leaf areas in pre-order; leaf areas
//! are half-open and tile the screen, so a point belongs to at most one leaf.

use crate::Container;
use crate::node::NodeId;
use core_events::{Key, KeyboardEvent, MouseButton, MouseEvent};
use core_model::Point;
use core_widget::{EventMeta, KeyScope, MouseScope, WidgetError};
use tracing::{debug, trace};

/// What consumed a keyboard event before it reached any widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Consumer {
    GlobalKey,
    FocusKey,
}

/// A widget handler that failed with something other than `Unsupported`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetFailure {
    pub node: NodeId,
    pub id: Option<String>,
    pub error: WidgetError,
}

/// Outcome of routing one event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Widgets whose handler returned `Ok`.
    pub delivered: usize,
    /// Widgets that declined the event.
    pub unsupported: usize,
    pub consumed: Option<Consumer>,
    pub focus_changed: bool,
    pub errors: Vec<WidgetFailure>,
}

impl Container {
    pub fn handle_keyboard(&mut self, event: &KeyboardEvent) -> DispatchReport {
        let mut report = DispatchReport::default();
        let focused = self.focus.focused();

        if let Some(f) = focused
            && let Some(layout) = self.layout.get(f)
            && layout.is_ready()
            && layout.options.exclusive_keyboard_on_focus
        {
            trace!(target: "container.dispatch", node = %f, "exclusive_keyboard");
            self.deliver_key(f, event, true, &mut report);
            return report;
        }

        let handler = self
            .bindings
            .global
            .iter()
            .find(|(k, _)| *k == event.key)
            .map(|(_, h)| h.clone());
        if let Some(handler) = handler {
            debug!(target: "container.dispatch", key = %event.key, "global_key");
            handler(self);
            report.consumed = Some(Consumer::GlobalKey);
            report.focus_changed = self.focus.focused() != focused;
            return report;
        }

        if let Some((group, forward)) = self.focus_move_for(event.key) {
            report.consumed = Some(Consumer::FocusKey);
            report.focus_changed = self.focus.step(&self.tree, group, forward);
            return report;
        }

        for id in self.tree.leaves() {
            let Some(layout) = self.layout.get(id) else {
                continue;
            };
            if !layout.is_ready() {
                continue;
            }
            let is_focused = focused == Some(id);
            let wanted = match layout.options.keyboard {
                KeyScope::None => false,
                KeyScope::Focused => is_focused,
                KeyScope::Global => true,
            };
            if wanted {
                self.deliver_key(id, event, is_focused, &mut report);
            }
        }
        report
    }

    /// Resolve a focus key into `(group, forward)`. Group keys only apply
    /// when the focused leaf belongs to the bound group.
    fn focus_move_for(&self, key: Key) -> Option<(u32, bool)> {
        if self.bindings.focus_next == Some(key) {
            return Some((0, true));
        }
        if self.bindings.focus_previous == Some(key) {
            return Some((0, false));
        }
        let focused = self.focus.focused().and_then(|f| self.tree.get(f))?;
        let in_bound_group = |bindings: &[(Key, u32)]| {
            bindings
                .iter()
                .find(|(k, g)| *k == key && focused.in_group(*g))
                .map(|(_, g)| *g)
        };
        in_bound_group(&self.bindings.group_next)
            .map(|g| (g, true))
            .or_else(|| in_bound_group(&self.bindings.group_previous).map(|g| (g, false)))
    }

    fn deliver_key(
        &self,
        id: NodeId,
        event: &KeyboardEvent,
        focused: bool,
        report: &mut DispatchReport,
    ) {
        let Some(widget) = self.tree.get(id).and_then(|n| n.widget()) else {
            return;
        };
        let result = widget.keyboard(event, &EventMeta { focused });
        self.record(id, result, report);
    }

    pub fn handle_mouse(&mut self, event: &MouseEvent) -> DispatchReport {
        let mut report = DispatchReport::default();
        let p = event.position;
        let hit = self.hit_test(p);
        if event.button == MouseButton::Left
            && let Some(leaf) = hit
        {
            report.focus_changed = self.focus.set(&self.tree, leaf);
        }

        let focused = self.focus.focused();
        for id in self.tree.leaves() {
            let Some(layout) = self.layout.get(id) else {
                continue;
            };
            if !layout.is_ready() {
                continue;
            }
            let Some(widget) = self.tree.get(id).and_then(|n| n.widget()) else {
                continue;
            };
            let in_widget = layout.widget.contains(p);
            let wanted = match layout.options.mouse {
                MouseScope::None => false,
                MouseScope::Widget => in_widget,
                MouseScope::Container => layout.area.contains(p),
                MouseScope::Global => true,
            };
            if !wanted {
                continue;
            }
            let position = if in_widget {
                p.relative_to(layout.widget.min)
            } else {
                MouseEvent::OUTSIDE
            };
            let local = MouseEvent::new(position, event.button);
            let meta = EventMeta {
                focused: focused == Some(id),
            };
            let result = widget.mouse(&local, &meta);
            self.record(id, result, &mut report);
        }
        report
    }

    /// First leaf in pre-order whose area contains `p`.
    pub fn hit_test(&self, p: Point) -> Option<NodeId> {
        self.tree
            .leaves()
            .into_iter()
            .find(|id| self.layout.get(*id).is_some_and(|l| l.area.contains(p)))
    }

    fn record(&self, id: NodeId, result: Result<(), WidgetError>, report: &mut DispatchReport) {
        match result {
            Ok(()) => report.delivered += 1,
            Err(err) if err.is_unsupported() => {
                debug!(target: "container.dispatch", node = %id, error = %err, "widget_unsupported");
                report.unsupported += 1;
            }
            Err(error) => report.errors.push(WidgetFailure {
                node: id,
                id: self.tree.get(id).and_then(|n| n.id.clone()),
                error,
            }),
        }
    }
}
