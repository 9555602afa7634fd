//! Terminal input for tiledash.
//!
//! A single Tokio task (the pump) reads crossterm's `EventStream`, translates
//! each report into a `core_events::Event` and pushes it into the bounded
//! channel owned by the display. It stops when asked to, when the receiver
//! is dropped, or right after forwarding a stream error as `Event::Error`.

mod mapping;
mod pump;

pub use pump::InputStop;

use core_events::Event;
use tokio::sync::mpsc::Sender;
use tokio::task::JoinHandle;

/// Start reading the terminal into `sender`.
pub fn spawn_input(sender: Sender<Event>) -> (JoinHandle<()>, InputStop) {
    pump::spawn_pump(sender)
}
