//! The run loop and the controller driven through the in-memory display.

use core_container::{
    Container, ContainerOption, SplitPolicy, WidgetFailure, place_widget, split_vertical,
};
use core_events::{Key, KeyboardEvent, MouseButton};
use core_model::{Canvas, Point, Size, Style};
use core_render::RenderError;
use core_render::draw::{self, Overrun};
use core_runtime::{Controller, RunConfig, Shutdown, run};
use core_terminal::fake::{FakeDisplay, ScreenProbe};
use core_widget::{EventMeta, KeyScope, Meta, Widget, WidgetError, WidgetOptions};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Shows the last key it received, prefixed with `F:` when it was focused.
#[derive(Default)]
struct KeyMirror {
    last: Mutex<String>,
    fail_on: Option<Key>,
}

impl Widget for KeyMirror {
    fn draw(&self, canvas: &mut Canvas, _meta: &Meta<'_>) -> Result<(), WidgetError> {
        let text = self.last.lock().unwrap().clone();
        draw::rectangle(canvas, canvas.area(), ' ', Style::new())?;
        draw::text(canvas, Point::ORIGIN, &text, Style::new(), None, Overrun::Trim)?;
        Ok(())
    }

    fn keyboard(&self, event: &KeyboardEvent, meta: &EventMeta) -> Result<(), WidgetError> {
        if self.fail_on == Some(event.key) {
            return Err(WidgetError::Failed(format!("refused {}", event.key)));
        }
        let prefix = if meta.focused { "F:" } else { "" };
        *self.last.lock().unwrap() = format!("{prefix}{}", event.key);
        Ok(())
    }

    fn options(&self) -> WidgetOptions {
        WidgetOptions {
            keyboard: KeyScope::Global,
            ..WidgetOptions::default()
        }
    }
}

struct Broken;

impl Widget for Broken {
    fn draw(&self, _canvas: &mut Canvas, _meta: &Meta<'_>) -> Result<(), WidgetError> {
        Err(WidgetError::Failed("no data".into()))
    }
}

/// Prints how often it was drawn, so every frame changes at least one cell.
#[derive(Default)]
struct DrawCount(AtomicUsize);

impl Widget for DrawCount {
    fn draw(&self, canvas: &mut Canvas, _meta: &Meta<'_>) -> Result<(), WidgetError> {
        let n = self.0.fetch_add(1, Ordering::Relaxed) + 1;
        draw::text(canvas, Point::ORIGIN, &format!("{n:>6}"), Style::new(), None, Overrun::Trim)?;
        Ok(())
    }
}

/// Records the canvas size of every draw.
#[derive(Default)]
struct SizeLog(Mutex<Vec<Size>>);

impl Widget for SizeLog {
    fn draw(&self, canvas: &mut Canvas, _meta: &Meta<'_>) -> Result<(), WidgetError> {
        self.0.lock().unwrap().push(canvas.size());
        Ok(())
    }
}

fn shared(c: Container) -> Arc<Mutex<Container>> {
    Arc::new(Mutex::new(c))
}

fn fast() -> RunConfig {
    RunConfig::new().redraw_interval(Duration::from_millis(5))
}

async fn wait_for(probe: &ScreenProbe, y: i32, want: &str) -> bool {
    for _ in 0..400 {
        if probe.row(y).trim_end() == want {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    false
}

async fn eventually(mut check: impl FnMut() -> bool) -> bool {
    for _ in 0..400 {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    false
}

type Finished = tokio::task::JoinHandle<(anyhow::Result<()>, FakeDisplay)>;

fn spawn_run(
    mut display: FakeDisplay,
    container: Arc<Mutex<Container>>,
    config: RunConfig,
    shutdown: Shutdown,
) -> Finished {
    tokio::spawn(async move {
        let result = run(&mut display, container, config, shutdown).await;
        (result, display)
    })
}

#[tokio::test]
async fn focused_mirror_shows_prefixed_last_key() {
    let (display, inject) = FakeDisplay::new(Size::new(20, 2));
    let probe = display.probe();
    let container = shared(
        Container::with_size(
            Size::new(20, 2),
            vec![place_widget(Arc::new(KeyMirror::default()))],
        )
        .unwrap(),
    );
    let shutdown = Shutdown::new();
    let task = spawn_run(display, container, fast(), shutdown.clone());

    inject.key(Key::Enter).await.unwrap();
    inject.key(Key::End).await.unwrap();
    assert!(wait_for(&probe, 0, "F:KeyEnd").await, "row was {:?}", probe.row(0));

    shutdown.cancel();
    let (result, _display) = task.await.unwrap();
    result.unwrap();
}

#[tokio::test]
async fn unfocused_mirror_shows_plain_last_key() {
    let (display, inject) = FakeDisplay::new(Size::new(20, 2));
    let probe = display.probe();
    let container = shared(
        Container::with_size(
            Size::new(20, 2),
            vec![split_vertical(
                vec![ContainerOption::Focused],
                vec![place_widget(Arc::new(KeyMirror::default()))],
                SplitPolicy::Percent(50),
            )],
        )
        .unwrap(),
    );
    let shutdown = Shutdown::new();
    let task = spawn_run(display, container, fast(), shutdown.clone());

    inject.key(Key::Enter).await.unwrap();
    inject.key(Key::End).await.unwrap();
    assert!(wait_for(&probe, 0, "          KeyEnd").await, "row was {:?}", probe.row(0));

    shutdown.cancel();
    task.await.unwrap().0.unwrap();
}

#[tokio::test]
async fn cancelled_before_start_returns_ok() {
    let (mut display, _inject) = FakeDisplay::new(Size::new(4, 1));
    let container = shared(Container::with_size(Size::new(4, 1), vec![]).unwrap());
    let shutdown = Shutdown::new();
    shutdown.cancel();
    run(&mut display, container, fast(), shutdown).await.unwrap();
}

#[tokio::test]
async fn subscriber_can_stop_the_loop() {
    let (display, inject) = FakeDisplay::new(Size::new(10, 1));
    let container = shared(
        Container::with_size(
            Size::new(10, 1),
            vec![place_widget(Arc::new(KeyMirror::default()))],
        )
        .unwrap(),
    );
    let shutdown = Shutdown::new();
    let quit = shutdown.clone();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = seen.clone();
    let config = fast().keyboard_subscriber(move |k| {
        log.lock().unwrap().push(k.to_string());
        if k.key == Key::Char('q') {
            quit.cancel();
        }
    });
    let task = spawn_run(display, container, config, shutdown);

    inject.key(Key::Char('x')).await.unwrap();
    inject.key(Key::Char('q')).await.unwrap();
    let (result, _) = tokio::time::timeout(Duration::from_secs(2), task)
        .await
        .unwrap()
        .unwrap();
    result.unwrap();
    assert_eq!(*seen.lock().unwrap(), vec!["x".to_string(), "q".to_string()]);
}

#[tokio::test]
async fn display_error_event_is_fatal() {
    let (display, inject) = FakeDisplay::new(Size::new(4, 1));
    let container = shared(Container::with_size(Size::new(4, 1), vec![]).unwrap());
    let task = spawn_run(display, container, fast(), Shutdown::new());
    inject
        .send(core_events::Event::Error("tty gone".into()))
        .await
        .unwrap();
    let (result, _) = task.await.unwrap();
    assert!(result.unwrap_err().to_string().contains("tty gone"));
}

#[tokio::test]
async fn closed_event_stream_is_fatal() {
    let (display, inject) = FakeDisplay::new(Size::new(4, 1));
    let container = shared(Container::with_size(Size::new(4, 1), vec![]).unwrap());
    drop(inject);
    let task = spawn_run(display, container, fast(), Shutdown::new());
    let (result, _) = task.await.unwrap();
    assert!(result.unwrap_err().to_string().contains("closed"));
}

#[tokio::test]
async fn render_failure_surfaces_as_render_error() {
    let (display, _inject) = FakeDisplay::new(Size::new(6, 2));
    let probe = display.probe();
    let container = shared(
        Container::with_size(
            Size::new(6, 2),
            vec![ContainerOption::Id("bad".into()), place_widget(Arc::new(Broken))],
        )
        .unwrap(),
    );
    let task = spawn_run(display, container, fast(), Shutdown::new());
    let (result, _) = task.await.unwrap();
    let err = result.unwrap_err();
    match err.downcast_ref::<RenderError>() {
        Some(RenderError::Widget { id, .. }) => assert_eq!(id.as_deref(), Some("bad")),
        other => panic!("unexpected error {other:?}"),
    }
    assert!(probe.flushes().is_empty());
}

#[tokio::test]
async fn resizes_are_applied_before_render() {
    let (display, inject) = FakeDisplay::new(Size::new(10, 2));
    let probe = display.probe();
    let container = shared(
        Container::with_size(
            Size::new(10, 2),
            vec![place_widget(Arc::new(KeyMirror::default()))],
        )
        .unwrap(),
    );
    let shutdown = Shutdown::new();
    let task = spawn_run(display, container.clone(), fast(), shutdown.clone());

    inject.resize(Size::new(12, 3)).await.unwrap();
    inject.resize(Size::new(30, 4)).await.unwrap();
    inject.key(Key::Home).await.unwrap();
    assert!(wait_for(&probe, 0, "F:KeyHome").await);
    for _ in 0..400 {
        if container.lock().unwrap().size() == Size::new(30, 4) {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert_eq!(container.lock().unwrap().size(), Size::new(30, 4));

    shutdown.cancel();
    task.await.unwrap().0.unwrap();
    assert_eq!(probe.screen().size(), Size::new(30, 4));
}

#[tokio::test]
async fn resizes_between_ticks_render_only_the_latest_size() {
    let (display, inject) = FakeDisplay::new(Size::new(10, 2));
    let probe = display.probe();
    let log = Arc::new(SizeLog::default());
    let container = shared(
        Container::with_size(Size::new(10, 2), vec![place_widget(log.clone())]).unwrap(),
    );
    let shutdown = Shutdown::new();
    let config = RunConfig::new().redraw_interval(Duration::from_millis(150));
    let task = spawn_run(display, container, config, shutdown.clone());

    assert!(eventually(|| !log.0.lock().unwrap().is_empty()).await);
    inject.resize(Size::new(12, 3)).await.unwrap();
    inject.resize(Size::new(14, 3)).await.unwrap();
    inject.resize(Size::new(30, 4)).await.unwrap();
    assert!(eventually(|| log.0.lock().unwrap().last() == Some(&Size::new(30, 4))).await);

    shutdown.cancel();
    task.await.unwrap().0.unwrap();
    let sizes = log.0.lock().unwrap().clone();
    assert_eq!(sizes.first(), Some(&Size::new(10, 2)));
    assert!(!sizes.contains(&Size::new(12, 3)), "{sizes:?}");
    assert!(!sizes.contains(&Size::new(14, 3)), "{sizes:?}");
    assert_eq!(probe.screen().size(), Size::new(30, 4));
}

#[tokio::test]
async fn frames_keep_flushing_under_an_input_flood() {
    let (display, inject) = FakeDisplay::new(Size::new(8, 1));
    let probe = display.probe();
    let container = shared(
        Container::with_size(
            Size::new(8, 1),
            vec![place_widget(Arc::new(DrawCount::default()))],
        )
        .unwrap(),
    );
    let shutdown = Shutdown::new();
    let flood = {
        let inject = inject.clone();
        let stop = shutdown.clone();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = stop.cancelled() => break,
                    sent = inject.click(3, 0, MouseButton::Left) => {
                        if sent.is_err() {
                            break;
                        }
                    }
                }
            }
        })
    };
    let task = spawn_run(display, container, fast(), shutdown.clone());

    tokio::time::sleep(Duration::from_millis(300)).await;
    let frames = probe.flushes().len();
    shutdown.cancel();
    flood.await.unwrap();
    task.await.unwrap().0.unwrap();
    assert!(frames >= 10, "only {frames} frames flushed in 300ms");
}

#[tokio::test]
async fn widget_event_errors_reach_the_handler_and_loop_continues() {
    let (display, inject) = FakeDisplay::new(Size::new(20, 1));
    let probe = display.probe();
    let mirror = KeyMirror {
        fail_on: Some(Key::Delete),
        ..KeyMirror::default()
    };
    let container = shared(
        Container::with_size(
            Size::new(20, 1),
            vec![ContainerOption::Id("m".into()), place_widget(Arc::new(mirror))],
        )
        .unwrap(),
    );
    let failures: Arc<Mutex<Vec<WidgetFailure>>> = Arc::default();
    let sink = failures.clone();
    let config = fast().widget_error_handler(move |f| sink.lock().unwrap().push(f.clone()));
    let shutdown = Shutdown::new();
    let task = spawn_run(display, container, config, shutdown.clone());

    inject.key(Key::Delete).await.unwrap();
    inject.key(Key::Insert).await.unwrap();
    assert!(wait_for(&probe, 0, "F:KeyInsert").await);
    shutdown.cancel();
    task.await.unwrap().0.unwrap();

    let failures = failures.lock().unwrap();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].id.as_deref(), Some("m"));
}

#[tokio::test]
async fn controller_renders_only_on_request() {
    let (display, inject) = FakeDisplay::new(Size::new(12, 1));
    let probe = display.probe();
    let container = shared(
        Container::with_size(
            Size::new(12, 1),
            vec![place_widget(Arc::new(KeyMirror::default()))],
        )
        .unwrap(),
    );
    let mut ctrl = Controller::new(display, container, RunConfig::new()).unwrap();
    assert_eq!(probe.flushes().len(), 1);

    inject.key(Key::PageDown).await.unwrap();
    ctrl.next_event().await.unwrap();
    assert_eq!(probe.row(0).trim_end(), "");

    ctrl.redraw().unwrap();
    assert_eq!(probe.row(0).trim_end(), "F:KeyPgDn");

    inject.click(0, 0, MouseButton::Left).await.unwrap();
    ctrl.next_event().await.unwrap();
    assert_eq!(ctrl.redraw().unwrap().changed, 0);
    assert_eq!(ctrl.metrics().frames, 3);

    let display = ctrl.close().unwrap();
    drop(display);
    assert!(probe.closed());
}
