//! Crossterm-backed `Display`.

use crate::batch_writer::BatchWriter;
use crate::color::ColorMode;
use crate::Display;
use anyhow::Result;
use core_events::Event;
use core_input::{InputStop, spawn_input};
use core_model::{CellChange, Size, Style};
use crossterm::{
    cursor::{Hide, Show},
    event::{DisableMouseCapture, EnableMouseCapture},
    execute, queue,
    style::{Attribute, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal::{
        Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode,
        enable_raw_mode,
    },
};
use std::future::Future;
use std::io::{Stdout, Write, stdout};
use tokio::sync::mpsc::Receiver;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

/// Terminal setup options.
#[derive(Debug, Clone, Copy)]
pub struct TerminalOptions {
    pub color_mode: ColorMode,
    /// Style used by `clear` for every cell of the screen.
    pub clear_style: Style,
    pub mouse_capture: bool,
}

impl Default for TerminalOptions {
    fn default() -> Self {
        Self {
            color_mode: ColorMode::default(),
            clear_style: Style::new(),
            mouse_capture: true,
        }
    }
}

impl TerminalOptions {
    pub fn color_mode(mut self, mode: ColorMode) -> Self {
        self.color_mode = mode;
        self
    }

    pub fn clear_style(mut self, style: Style) -> Self {
        self.clear_style = style;
        self
    }
}

pub struct CrosstermDisplay {
    opts: TerminalOptions,
    out: Stdout,
    entered: bool,
    events: Receiver<Event>,
    input: Option<(JoinHandle<()>, InputStop)>,
}

impl CrosstermDisplay {
    /// Switch the terminal into raw mode on the alternate screen and start
    /// the input task. Must be called from within a Tokio runtime.
    pub fn open(opts: TerminalOptions) -> Result<Self> {
        let (tx, rx) = core_events::channel();
        let mut display = Self {
            opts,
            out: stdout(),
            entered: false,
            events: rx,
            input: None,
        };
        display.enter()?;
        display.input = Some(spawn_input(tx));
        debug!(target: "terminal", mode = ?opts.color_mode, "display_opened");
        Ok(display)
    }

    fn enter(&mut self) -> Result<()> {
        if !self.entered {
            enable_raw_mode()?;
            execute!(self.out, EnterAlternateScreen, Hide)?;
            if self.opts.mouse_capture {
                execute!(self.out, EnableMouseCapture)?;
            }
            self.entered = true;
        }
        Ok(())
    }

    fn leave(&mut self) -> Result<()> {
        if self.entered {
            if self.opts.mouse_capture {
                execute!(self.out, DisableMouseCapture)?;
            }
            execute!(self.out, LeaveAlternateScreen, Show)?;
            disable_raw_mode()?;
            self.entered = false;
        }
        Ok(())
    }

    fn stop_input(&mut self) {
        if let Some((handle, stop)) = self.input.take() {
            stop.signal();
            handle.abort();
        }
    }
}

impl Display for CrosstermDisplay {
    fn size(&self) -> Result<Size> {
        let (w, h) = crossterm::terminal::size()?;
        Ok(Size::new(i32::from(w), i32::from(h)))
    }

    fn clear(&mut self) -> Result<()> {
        let mode = self.opts.color_mode;
        let style = self.opts.clear_style;
        queue!(
            self.out,
            SetForegroundColor(mode.to_crossterm(style.fg)),
            SetBackgroundColor(mode.to_crossterm(style.bg)),
            Clear(ClearType::All),
            SetAttribute(Attribute::Reset),
        )?;
        self.out.flush()?;
        Ok(())
    }

    fn flush(&mut self, changes: &[CellChange]) -> Result<()> {
        if changes.is_empty() {
            return Ok(());
        }
        let mut writer = BatchWriter::new(&mut self.out, self.opts.color_mode);
        for change in changes {
            writer.put(change.point, change.cell)?;
        }
        let (_, stats) = writer.finish()?;
        trace!(
            target: "terminal",
            changes = changes.len(),
            prints = stats.print_commands,
            moves = stats.moves,
            "flush"
        );
        Ok(())
    }

    fn poll_event(&mut self) -> impl Future<Output = Option<Event>> + Send {
        self.events.recv()
    }

    fn close(&mut self) -> Result<()> {
        self.stop_input();
        self.leave()?;
        debug!(target: "terminal", "display_closed");
        Ok(())
    }
}

impl Drop for CrosstermDisplay {
    fn drop(&mut self) {
        self.stop_input();
        let _ = self.leave();
    }
}
