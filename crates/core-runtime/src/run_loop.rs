use crate::config::RunConfig;
use crate::session::Session;
use crate::shutdown::Shutdown;
use anyhow::{Result, anyhow};
use core_container::Container;
use core_terminal::Display;
use std::fmt;
use std::sync::{Arc, Mutex};
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{Instrument, error, info, trace};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum StopReason {
    Cancelled,
    StreamClosed,
    DisplayError,
    RenderFailed,
}

impl StopReason {
    fn as_str(&self) -> &'static str {
        match self {
            StopReason::Cancelled => "cancelled",
            StopReason::StreamClosed => "stream_closed",
            StopReason::DisplayError => "display_error",
            StopReason::RenderFailed => "render_failed",
        }
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Drive `container` on `display` until `shutdown` is cancelled.
///
/// One task does all the work: it waits on whichever of cancellation, a
/// display event and the redraw tick is ready first, with no fixed priority
/// between them. Cancellation is also checked before every wait. When events
/// keep arriving and a redraw falls due while one is handled, the frame is
/// rendered right after that event and the tick restarts, so a steady input
/// stream cannot hold back rendering.
///
/// Resizes are recorded and applied once, right before the next render;
/// keyboard and mouse events are routed through the container, then handed
/// to the subscribers. The first tick fires immediately, so the screen is
/// painted as soon as the loop starts.
///
/// Returns `Ok` after cancellation. A display error, a closed event stream
/// or a failed render pass ends the loop with an error; render failures
/// downcast to `core_render::RenderError`.
pub async fn run<D: Display>(
    display: &mut D,
    container: Arc<Mutex<Container>>,
    config: RunConfig,
    shutdown: Shutdown,
) -> Result<()> {
    let span = tracing::debug_span!(target: "runtime", "run_loop");
    run_inner(display, container, config, shutdown)
        .instrument(span)
        .await
}

async fn run_inner<D: Display>(
    display: &mut D,
    container: Arc<Mutex<Container>>,
    config: RunConfig,
    shutdown: Shutdown,
) -> Result<()> {
    let mut session = Session::new(container, config);
    session.resize(display.size()?);

    let interval = session.config.interval();
    let mut tick = time::interval(interval);
    tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
    info!(target: "runtime", interval_ms = interval.as_millis() as u64, "run_start");

    let mut last_render = Instant::now();
    let outcome = loop {
        if shutdown.is_cancelled() {
            break Ok(StopReason::Cancelled);
        }
        tokio::select! {
            _ = shutdown.cancelled() => break Ok(StopReason::Cancelled),
            event = display.poll_event() => {
                let Some(event) = event else {
                    break Err((StopReason::StreamClosed, anyhow!("display event stream closed")));
                };
                trace!(target: "runtime", ?event, "event");
                if let Err(e) = session.handle(event) {
                    break Err((StopReason::DisplayError, e));
                }
                if last_render.elapsed() >= interval {
                    trace!(target: "runtime", "redraw_overdue");
                    if let Err(e) = session.render(display) {
                        break Err((StopReason::RenderFailed, e));
                    }
                    last_render = Instant::now();
                    tick.reset();
                }
            }
            _ = tick.tick() => {
                if let Err(e) = session.render(display) {
                    break Err((StopReason::RenderFailed, e));
                }
                last_render = Instant::now();
            }
        }
    };

    let metrics = session.metrics();
    match outcome {
        Ok(reason) => {
            info!(
                target: "runtime.shutdown",
                reason = reason.as_str(),
                frames = metrics.frames,
                cells = metrics.cells_flushed,
                "run_stop"
            );
            Ok(())
        }
        Err((reason, err)) => {
            error!(target: "runtime.shutdown", reason = reason.as_str(), error = %err, "run_stop");
            Err(err)
        }
    }
}
