//! The `Display` capability and its implementations.
//!
//! The engine never talks to a terminal directly. Everything it needs from
//! one is expressed by [`Display`]: report the size, clear, flush changed
//! cells, deliver input events and shut down. [`CrosstermDisplay`] drives a
//! real terminal; [`fake::FakeDisplay`] keeps the screen in memory.

use anyhow::Result;
use core_events::Event;
use core_model::{CellChange, Size};
use std::future::Future;

pub mod batch_writer;
pub mod color;
mod crossterm_display;
pub mod fake;

pub use color::ColorMode;
pub use crossterm_display::{CrosstermDisplay, TerminalOptions};

pub trait Display: Send {
    /// Current screen size in cells.
    fn size(&self) -> Result<Size>;

    /// Blank the whole screen using the configured clear style. The next
    /// flush must repaint everything that should be visible.
    fn clear(&mut self) -> Result<()>;

    /// Write the given cells to the screen. Positions are screen-absolute.
    fn flush(&mut self, changes: &[CellChange]) -> Result<()>;

    /// Wait for the next event. `None` means the event source is gone.
    ///
    /// The returned future must be cancel safe: dropping it before
    /// completion must not lose an event.
    fn poll_event(&mut self) -> impl Future<Output = Option<Event>> + Send;

    /// Restore the terminal and stop producing events.
    fn close(&mut self) -> Result<()>;
}
