//! The input pump: crossterm's `EventStream` into the display's channel.

use crate::mapping::map_event;
use core_events::Event;
use crossterm::event::{Event as CEvent, EventStream};
use std::io;
use std::sync::Arc;
use tokio::sync::{Notify, mpsc::Sender};
use tokio::task::JoinHandle;
use tokio_stream::{Stream, StreamExt};
use tracing::{Instrument, info, trace, warn};

/// Asks a running pump to stop. A stop requested before the pump first
/// waits is not lost.
#[derive(Clone, Debug, Default)]
pub struct InputStop {
    notify: Arc<Notify>,
}

impl InputStop {
    pub fn signal(&self) {
        self.notify.notify_one();
    }

    async fn requested(&self) {
        self.notify.notified().await;
    }
}

/// Spawn a pump reading the process terminal. Must be called from within a
/// Tokio runtime.
pub(crate) fn spawn_pump(sender: Sender<Event>) -> (JoinHandle<()>, InputStop) {
    let stop = InputStop::default();
    let pump = Pump {
        sender,
        stream: EventStream::new(),
        stop: stop.clone(),
    };
    let span = tracing::debug_span!(target: "input.thread", "input_pump");
    (tokio::spawn(pump.run().instrument(span)), stop)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PumpExit {
    Stopped,
    ConsumerGone,
    StreamEnded,
    StreamFailed,
}

impl PumpExit {
    fn as_str(&self) -> &'static str {
        match self {
            PumpExit::Stopped => "stopped",
            PumpExit::ConsumerGone => "consumer_gone",
            PumpExit::StreamEnded => "stream_ended",
            PumpExit::StreamFailed => "stream_failed",
        }
    }
}

fn kind(event: &Event) -> &'static str {
    match event {
        Event::Keyboard(_) => "keyboard",
        Event::Mouse(_) => "mouse",
        Event::Resize(_) => "resize",
        Event::Error(_) => "error",
    }
}

struct Pump<S> {
    sender: Sender<Event>,
    stream: S,
    stop: InputStop,
}

impl<S> Pump<S>
where
    S: Stream<Item = io::Result<CEvent>> + Unpin,
{
    async fn run(mut self) {
        info!(target: "input.thread", "input_pump_started");
        let exit = loop {
            let next = tokio::select! {
                biased;
                _ = self.stop.requested() => break PumpExit::Stopped,
                next = self.stream.next() => next,
            };
            match next {
                None => break PumpExit::StreamEnded,
                Some(Ok(raw)) => {
                    if !self.forward(map_event(raw)).await {
                        break PumpExit::ConsumerGone;
                    }
                }
                Some(Err(err)) => {
                    warn!(target: "input.thread", error_kind = ?err.kind(), error = %err, "input_stream_failed");
                    // The run loop treats this as fatal.
                    let _ = self.sender.send(Event::Error(err.to_string())).await;
                    break PumpExit::StreamFailed;
                }
            }
        };
        info!(target: "input.thread", reason = exit.as_str(), "input_pump_stopped");
    }

    /// Returns false once the receiving side is gone.
    async fn forward(&self, events: Vec<Event>) -> bool {
        for event in events {
            trace!(target: "input.event", kind = kind(&event), "forward");
            if self.sender.send(event).await.is_err() {
                return false;
            }
        }
        !self.sender.is_closed()
    }
}
