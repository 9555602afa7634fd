//! Reference widgets built on the widget capability.
//!
//! * [`Gauge`]: percent or absolute progress bar.
//! * [`Mirror`]: echoes its size, events and focus state; handy in demos
//!   and routing tests.

pub mod gauge;
pub mod mirror;

pub use gauge::{Gauge, GaugeOptions};
pub use mirror::Mirror;
