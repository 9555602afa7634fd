use crate::config::RunConfig;
use crate::session::Session;
use anyhow::{Result, anyhow};
use core_container::Container;
use core_render::{RenderMetricsSnapshot, RenderStats};
use core_terminal::Display;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Renders only when asked to, without a periodic timer.
///
/// Events are pulled explicitly with `next_event` and routed exactly as in
/// `run`; `redraw` applies any pending resize and renders one frame. The
/// redraw interval of the config is ignored.
pub struct Controller<D: Display> {
    display: D,
    session: Session,
}

impl<D: Display> Controller<D> {
    /// Take over `display` and paint the first frame.
    pub fn new(display: D, container: Arc<Mutex<Container>>, config: RunConfig) -> Result<Self> {
        let mut controller = Self {
            display,
            session: Session::new(container, config),
        };
        controller.session.resize(controller.display.size()?);
        controller.redraw()?;
        Ok(controller)
    }

    pub fn redraw(&mut self) -> Result<RenderStats> {
        let stats = self.session.render(&mut self.display)?;
        debug!(target: "runtime", changed = stats.changed, "manual_redraw");
        Ok(stats)
    }

    /// Wait for the next display event and route it. Fails when the event
    /// stream is closed or the display reports an error.
    pub async fn next_event(&mut self) -> Result<()> {
        let event = self
            .display
            .poll_event()
            .await
            .ok_or_else(|| anyhow!("display event stream closed"))?;
        self.session.handle(event)
    }

    pub fn container(&self) -> &Arc<Mutex<Container>> {
        &self.session.container
    }

    pub fn metrics(&self) -> RenderMetricsSnapshot {
        self.session.metrics()
    }

    /// Close the display and hand it back.
    pub fn close(mut self) -> Result<D> {
        self.display.close()?;
        Ok(self.display)
    }
}
