//! In-memory `Display` for tests and headless runs.
//!
//! The fake keeps a `Canvas` standing in for the physical screen, applies
//! every flushed change to it and records each flush. Events are injected
//! through an [`EventInjector`]; a `Resize` event resizes the fake screen at
//! the moment it is polled, like a real terminal would.

use crate::Display;
use anyhow::{Result, anyhow};
use core_events::{Event, Key, KeyboardEvent, MouseButton, MouseEvent};
use core_model::{Canvas, CellChange, Point, Size};
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::mpsc::{Receiver, Sender, error::SendError};

#[derive(Debug, Default)]
struct FakeState {
    screen: Canvas,
    flushes: Vec<usize>,
    clears: usize,
    closed: bool,
}

/// Shared read access to a `FakeDisplay`'s screen, usable while the display
/// itself is borrowed by the run loop.
#[derive(Clone, Debug)]
pub struct ScreenProbe {
    state: Arc<Mutex<FakeState>>,
}

fn lock(state: &Mutex<FakeState>) -> Result<MutexGuard<'_, FakeState>> {
    state.lock().map_err(|_| anyhow!("fake display state poisoned"))
}

impl ScreenProbe {
    /// Snapshot of the screen contents.
    pub fn screen(&self) -> Canvas {
        lock(&self.state)
            .map(|s| s.screen.clone())
            .unwrap_or_default()
    }

    /// Leader runes of screen row `y`.
    pub fn row(&self, y: i32) -> String {
        self.screen().row_text(y)
    }

    /// Number of changes in each flush, oldest first.
    pub fn flushes(&self) -> Vec<usize> {
        lock(&self.state)
            .map(|s| s.flushes.clone())
            .unwrap_or_default()
    }

    pub fn clears(&self) -> usize {
        lock(&self.state).map(|s| s.clears).unwrap_or_default()
    }

    pub fn closed(&self) -> bool {
        lock(&self.state).map(|s| s.closed).unwrap_or_default()
    }
}

/// Sending half paired with a `FakeDisplay`. Dropping every injector closes
/// the display's event stream.
#[derive(Clone, Debug)]
pub struct EventInjector {
    tx: Sender<Event>,
}

impl EventInjector {
    pub async fn send(&self, event: Event) -> Result<(), SendError<Event>> {
        self.tx.send(event).await
    }

    pub async fn key(&self, key: Key) -> Result<(), SendError<Event>> {
        self.send(Event::Keyboard(KeyboardEvent::new(key))).await
    }

    pub async fn click(&self, x: i32, y: i32, button: MouseButton) -> Result<(), SendError<Event>> {
        self.send(Event::Mouse(MouseEvent::new(Point::new(x, y), button)))
            .await
    }

    pub async fn resize(&self, size: Size) -> Result<(), SendError<Event>> {
        self.send(Event::Resize(size)).await
    }
}

pub struct FakeDisplay {
    size: Size,
    state: Arc<Mutex<FakeState>>,
    events: Receiver<Event>,
}

impl FakeDisplay {
    pub fn new(size: Size) -> (Self, EventInjector) {
        let (tx, rx) = core_events::channel();
        let state = FakeState {
            screen: Canvas::new(size),
            ..FakeState::default()
        };
        (
            Self {
                size,
                state: Arc::new(Mutex::new(state)),
                events: rx,
            },
            EventInjector { tx },
        )
    }

    pub fn probe(&self) -> ScreenProbe {
        ScreenProbe {
            state: self.state.clone(),
        }
    }

    fn apply_resize(&mut self, size: Size) -> Result<()> {
        self.size = size;
        lock(&self.state)?.screen = Canvas::new(size);
        Ok(())
    }
}

impl Display for FakeDisplay {
    fn size(&self) -> Result<Size> {
        Ok(self.size)
    }

    fn clear(&mut self) -> Result<()> {
        let mut state = lock(&self.state)?;
        state.screen.clear();
        state.clears += 1;
        Ok(())
    }

    fn flush(&mut self, changes: &[CellChange]) -> Result<()> {
        let mut state = lock(&self.state)?;
        for change in changes {
            state.screen.put(change.point, change.cell)?;
        }
        state.flushes.push(changes.len());
        Ok(())
    }

    fn poll_event(&mut self) -> impl Future<Output = Option<Event>> + Send {
        async move {
            let event = self.events.recv().await?;
            if let Event::Resize(size) = event
                && let Err(err) = self.apply_resize(size)
            {
                return Some(Event::Error(err.to_string()));
            }
            Some(event)
        }
    }

    fn close(&mut self) -> Result<()> {
        lock(&self.state)?.closed = true;
        self.events.close();
        Ok(())
    }
}
