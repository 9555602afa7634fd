//! Render execution counters.
//!
//! Updated by `RenderEngine` on every pass and read through `snapshot()`,
//! so tests and the binary can observe what a frame actually cost without
//! holding a reference into the engine.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct RenderMetrics {
    /// Render passes that reached the display flush.
    pub frames: AtomicU64,
    /// Passes aborted by a widget or canvas error (nothing flushed).
    pub failed_frames: AtomicU64,
    /// Passes that cleared the display and flushed every cell.
    pub full_frames: AtomicU64,
    /// Total cells handed to `Display::flush`.
    pub cells_flushed: AtomicU64,
    /// Passes whose diff was empty.
    pub idle_frames: AtomicU64,
    /// Duration (ns) of the most recent successful pass.
    pub last_render_ns: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderMetricsSnapshot {
    pub frames: u64,
    pub failed_frames: u64,
    pub full_frames: u64,
    pub cells_flushed: u64,
    pub idle_frames: u64,
    pub last_render_ns: u64,
}

impl RenderMetrics {
    pub fn snapshot(&self) -> RenderMetricsSnapshot {
        use Ordering::Relaxed;
        RenderMetricsSnapshot {
            frames: self.frames.load(Relaxed),
            failed_frames: self.failed_frames.load(Relaxed),
            full_frames: self.full_frames.load(Relaxed),
            cells_flushed: self.cells_flushed.load(Relaxed),
            idle_frames: self.idle_frames.load(Relaxed),
            last_render_ns: self.last_render_ns.load(Relaxed),
        }
    }

    pub(crate) fn record_frame(&self, cells: usize, full: bool, ns: u64) {
        use Ordering::Relaxed;
        self.frames.fetch_add(1, Relaxed);
        self.cells_flushed.fetch_add(cells as u64, Relaxed);
        if full {
            self.full_frames.fetch_add(1, Relaxed);
        }
        if cells == 0 {
            self.idle_frames.fetch_add(1, Relaxed);
        }
        self.last_render_ns.store(ns, Relaxed);
    }

    pub(crate) fn record_failure(&self) {
        self.failed_frames.fetch_add(1, Ordering::Relaxed);
    }
}
