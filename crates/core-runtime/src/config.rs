use core_container::WidgetFailure;
use core_events::{KeyboardEvent, MouseEvent};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

pub const DEFAULT_REDRAW_INTERVAL: Duration = Duration::from_millis(250);

/// Timers need a non-zero period.
const MIN_REDRAW_INTERVAL: Duration = Duration::from_millis(1);

pub type KeyboardSubscriber = Arc<dyn Fn(&KeyboardEvent) + Send + Sync>;
pub type MouseSubscriber = Arc<dyn Fn(&MouseEvent) + Send + Sync>;
pub type WidgetErrorHandler = Arc<dyn Fn(&WidgetFailure) + Send + Sync>;

/// Options for `run` and `Controller`.
///
/// Subscribers observe every keyboard or mouse event after the container has
/// routed it, outside the container lock, so they may lock it themselves.
#[derive(Clone)]
pub struct RunConfig {
    pub(crate) redraw_interval: Duration,
    pub(crate) keyboard_subscriber: Option<KeyboardSubscriber>,
    pub(crate) mouse_subscriber: Option<MouseSubscriber>,
    pub(crate) widget_error_handler: WidgetErrorHandler,
}

fn log_widget_failure(failure: &WidgetFailure) {
    warn!(
        target: "runtime",
        node = %failure.node,
        id = failure.id.as_deref(),
        error = %failure.error,
        "widget_event_failed"
    );
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            redraw_interval: DEFAULT_REDRAW_INTERVAL,
            keyboard_subscriber: None,
            mouse_subscriber: None,
            widget_error_handler: Arc::new(log_widget_failure),
        }
    }
}

impl RunConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn redraw_interval(mut self, interval: Duration) -> Self {
        self.redraw_interval = interval.max(MIN_REDRAW_INTERVAL);
        self
    }

    pub fn keyboard_subscriber<F>(mut self, f: F) -> Self
    where
        F: Fn(&KeyboardEvent) + Send + Sync + 'static,
    {
        self.keyboard_subscriber = Some(Arc::new(f));
        self
    }

    pub fn mouse_subscriber<F>(mut self, f: F) -> Self
    where
        F: Fn(&MouseEvent) + Send + Sync + 'static,
    {
        self.mouse_subscriber = Some(Arc::new(f));
        self
    }

    /// Called for keyboard and mouse handler failures other than
    /// `Unsupported`. Defaults to a `warn` log.
    pub fn widget_error_handler<F>(mut self, f: F) -> Self
    where
        F: Fn(&WidgetFailure) + Send + Sync + 'static,
    {
        self.widget_error_handler = Arc::new(f);
        self
    }

    pub fn interval(&self) -> Duration {
        self.redraw_interval
    }
}

impl fmt::Debug for RunConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunConfig")
            .field("redraw_interval", &self.redraw_interval)
            .field("keyboard_subscriber", &self.keyboard_subscriber.is_some())
            .field("mouse_subscriber", &self.mouse_subscriber.is_some())
            .finish_non_exhaustive()
    }
}
