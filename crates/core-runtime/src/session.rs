//! State shared by the run loop and the manual-redraw controller: the render
//! engine, the coalesced pending size and the event handling rules.

use crate::config::RunConfig;
use anyhow::{Result, anyhow, bail};
use core_container::{Container, DispatchReport};
use core_events::Event;
use core_model::Size;
use core_render::{RenderEngine, RenderMetricsSnapshot, RenderStats};
use core_terminal::Display;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, trace};

pub(crate) fn lock(container: &Mutex<Container>) -> Result<MutexGuard<'_, Container>> {
    container
        .lock()
        .map_err(|_| anyhow!("container lock poisoned"))
}

pub(crate) struct Session {
    pub container: Arc<Mutex<Container>>,
    pub config: RunConfig,
    engine: RenderEngine,
    pending_size: Option<Size>,
}

impl Session {
    pub fn new(container: Arc<Mutex<Container>>, config: RunConfig) -> Self {
        Self {
            container,
            config,
            engine: RenderEngine::new(),
            pending_size: None,
        }
    }

    pub fn metrics(&self) -> RenderMetricsSnapshot {
        self.engine.metrics()
    }

    /// Record a size to apply before the next render. Later sizes replace
    /// earlier ones.
    pub fn resize(&mut self, size: Size) {
        if let Some(previous) = self.pending_size.replace(size) {
            trace!(
                target: "runtime",
                dropped_width = previous.width,
                dropped_height = previous.height,
                "resize_coalesced"
            );
        }
    }

    /// Handle one display event. Fails only for backend errors.
    pub fn handle(&mut self, event: Event) -> Result<()> {
        match event {
            Event::Resize(size) => {
                debug!(target: "runtime", width = size.width, height = size.height, "resize_event");
                self.resize(size);
            }
            Event::Keyboard(key) => {
                let report = lock(&self.container)?.handle_keyboard(&key);
                self.report_failures(&report);
                if let Some(subscriber) = &self.config.keyboard_subscriber {
                    subscriber(&key);
                }
            }
            Event::Mouse(mouse) => {
                let report = lock(&self.container)?.handle_mouse(&mouse);
                self.report_failures(&report);
                if let Some(subscriber) = &self.config.mouse_subscriber {
                    subscriber(&mouse);
                }
            }
            Event::Error(message) => bail!("display error: {message}"),
        }
        Ok(())
    }

    fn report_failures(&self, report: &DispatchReport) {
        for failure in &report.errors {
            (self.config.widget_error_handler)(failure);
        }
    }

    /// Apply any pending size and render one frame.
    pub fn render<D: Display>(&mut self, display: &mut D) -> Result<RenderStats> {
        let mut container = lock(&self.container)?;
        if let Some(size) = self.pending_size.take() {
            container.resize(size);
        }
        Ok(self.engine.render(&mut container, display)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_container::ContainerOption;
    use core_events::{Key, KeyboardEvent};
    use core_model::Canvas;
    use core_widget::{EventMeta, KeyScope, Meta, Widget, WidgetError, WidgetOptions};
    use std::sync::Mutex as StdMutex;
    use tracing::field::{Field, Visit};
    use tracing::subscriber::Interest;
    use tracing::{Metadata, Subscriber};
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
    use tracing_subscriber::registry::Registry;

    struct Grumpy;

    impl Widget for Grumpy {
        fn draw(&self, _c: &mut Canvas, _m: &Meta<'_>) -> Result<(), WidgetError> {
            Ok(())
        }
        fn keyboard(&self, _e: &KeyboardEvent, _m: &EventMeta) -> Result<(), WidgetError> {
            Err(WidgetError::Failed("grumpy".into()))
        }
        fn options(&self) -> WidgetOptions {
            WidgetOptions {
                keyboard: KeyScope::Focused,
                ..WidgetOptions::default()
            }
        }
    }

    #[derive(Clone, Default)]
    struct Capture {
        messages: Arc<StdMutex<Vec<String>>>,
    }

    #[derive(Default)]
    struct MessageVisitor(Option<String>);

    impl Visit for MessageVisitor {
        fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
            if field.name() == "message" {
                self.0 = Some(format!("{value:?}"));
            }
        }
    }

    impl<S: Subscriber> Layer<S> for Capture {
        fn register_callsite(&self, _metadata: &'static Metadata<'static>) -> Interest {
            Interest::always()
        }

        fn enabled(&self, metadata: &Metadata<'_>, _ctx: Context<'_, S>) -> bool {
            metadata.target() == "runtime"
        }

        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            let mut visitor = MessageVisitor::default();
            event.record(&mut visitor);
            if let Some(m) = visitor.0 {
                self.messages.lock().unwrap().push(m);
            }
        }
    }

    fn session(widget: Arc<dyn Widget>) -> Session {
        let c = Container::with_size(Size::new(5, 1), vec![ContainerOption::PlaceWidget(widget)]).unwrap();
        Session::new(Arc::new(Mutex::new(c)), RunConfig::default())
    }

    #[test]
    fn default_handler_logs_widget_failures() {
        let capture = Capture::default();
        let messages = capture.messages.clone();
        let dispatch = tracing::Dispatch::new(Registry::default().with(capture));
        let _guard = tracing::dispatcher::set_default(&dispatch);

        let mut s = session(Arc::new(Grumpy));
        s.handle(Event::Keyboard(KeyboardEvent::new(Key::Enter)))
            .unwrap();
        assert!(
            messages
                .lock()
                .unwrap()
                .iter()
                .any(|m| m == "widget_event_failed")
        );
    }

    #[test]
    fn latest_pending_size_wins() {
        let mut s = session(Arc::new(Grumpy));
        s.resize(Size::new(8, 2));
        s.resize(Size::new(9, 3));
        assert_eq!(s.pending_size, Some(Size::new(9, 3)));
    }

    #[test]
    fn error_event_fails() {
        let mut s = session(Arc::new(Grumpy));
        let err = s.handle(Event::Error("broken pipe".into())).unwrap_err();
        assert!(err.to_string().contains("broken pipe"));
    }
}
