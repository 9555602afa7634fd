//! The coordinating loop of a dashboard.
//!
//! `run` merges display events with a periodic redraw tick until its
//! `Shutdown` handle is cancelled. `Controller` offers the same routing and
//! rendering without the timer, for programs that decide themselves when to
//! redraw.
//!
//! The container is shared as `Arc<Mutex<Container>>` so application code
//! (global key handlers, subscribers, background tasks) can `update` it while
//! the loop runs. The loop never holds the lock across an await point.

mod config;
mod controller;
mod run_loop;
mod session;
mod shutdown;

pub use config::{
    DEFAULT_REDRAW_INTERVAL, KeyboardSubscriber, MouseSubscriber, RunConfig, WidgetErrorHandler,
};
pub use controller::Controller;
pub use run_loop::run;
pub use shutdown::Shutdown;
