//! Frame assembly: walk the container tree, let every ready widget draw into
//! its own sub-canvas, compose the result into the root canvas, diff it
//! against the last flushed frame and flush the changed cells.
//!
//! A pass either flushes a complete frame or nothing at all. Any widget or
//! canvas error aborts before the display is touched, so the terminal keeps
//! showing the previous frame.

use crate::diff::diff_canvas;
use crate::draw;
use crate::metrics::{RenderMetrics, RenderMetricsSnapshot};
use core_container::{Container, LayoutState, NodeId, NodeView};
use core_model::{Canvas, CanvasError, Style};
use core_terminal::Display;
use core_widget::{Meta, WidgetError};
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, trace, warn};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("widget in container {node} (id {}) failed to draw: {source}", .id.as_deref().unwrap_or("-"))]
    Widget {
        node: NodeId,
        id: Option<String>,
        #[source]
        source: WidgetError,
    },
    #[error(transparent)]
    Canvas(#[from] CanvasError),
    #[error("display failure: {0:#}")]
    Display(anyhow::Error),
}

/// Outcome of one successful pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderStats {
    /// Cells sent to the display.
    pub changed: usize,
    /// The display was cleared and repainted from scratch.
    pub full: bool,
}

/// Owns the last flushed frame. One engine per display.
#[derive(Debug, Default)]
pub struct RenderEngine {
    prev: Option<Canvas>,
    metrics: RenderMetrics,
}

impl RenderEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn metrics(&self) -> RenderMetricsSnapshot {
        self.metrics.snapshot()
    }

    /// The frame currently believed to be on screen.
    pub fn last_frame(&self) -> Option<&Canvas> {
        self.prev.as_ref()
    }

    /// Forget the last frame; the next pass clears and repaints everything.
    pub fn invalidate(&mut self) {
        self.prev = None;
    }

    pub fn render<D: Display>(
        &mut self,
        container: &mut Container,
        display: &mut D,
    ) -> Result<RenderStats, RenderError> {
        let started = Instant::now();
        container.relayout();
        let frame = match compose(container) {
            Ok(frame) => frame,
            Err(e) => {
                self.metrics.record_failure();
                warn!(target: "render.engine", error = %e, "render_aborted");
                return Err(e);
            }
        };

        let full = self.prev.as_ref().map(Canvas::size) != Some(frame.size());
        let changes = diff_canvas(if full { None } else { self.prev.as_ref() }, &frame);
        if full {
            display.clear().map_err(RenderError::Display)?;
        }
        if !changes.is_empty() {
            display.flush(&changes).map_err(RenderError::Display)?;
        }
        self.prev = Some(frame);

        let ns = started.elapsed().as_nanos() as u64;
        self.metrics.record_frame(changes.len(), full, ns);
        debug!(target: "render.engine", changed = changes.len(), full, ns, "frame_flushed");
        Ok(RenderStats {
            changed: changes.len(),
            full,
        })
    }
}

/// Build a complete frame for the container's current layout.
pub fn compose(container: &Container) -> Result<Canvas, RenderError> {
    let mut root = Canvas::new(container.size());
    for view in container.nodes() {
        draw_node(&mut root, &view)?;
    }
    Ok(root)
}

fn draw_node(root: &mut Canvas, view: &NodeView<'_>) -> Result<(), RenderError> {
    let layout = &view.layout;
    if layout.area.is_empty() {
        return Ok(());
    }
    if let Some(line) = view.border {
        let color = if view.focused {
            view.focused_color
        } else {
            view.border_color
        };
        let style = Style::new().fg(color);
        draw::border(root, layout.area, line, style)?;
        if let Some(title) = view.title {
            draw::border_title(root, layout.area, title, view.title_align, style)?;
        }
    }

    if layout.state == LayoutState::ResizeNeeded {
        let target = if layout.inner.is_empty() {
            layout.area
        } else {
            layout.inner
        };
        trace!(target: "render.engine", node = %view.node, "resize_needed_placeholder");
        draw::resize_needed(root, target)?;
        return Ok(());
    }

    let Some(widget) = view.widget else {
        return Ok(());
    };
    if layout.widget.is_empty() {
        return Ok(());
    }
    let mut canvas = root.sub_canvas(layout.widget)?;
    let meta = Meta {
        focused: view.focused,
        id: view.id,
    };
    widget
        .draw(&mut canvas, &meta)
        .map_err(|source| RenderError::Widget {
            node: view.node,
            id: view.id.map(str::to_string),
            source,
        })?;
    canvas.copy_to(root, layout.widget.min)?;
    Ok(())
}
