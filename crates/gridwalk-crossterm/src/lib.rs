//! Crossterm renderer for gridwalk.
//!
//! Provides a [`TerminalSink`] that implements [`gridwalk_paths::EventSink`],
//! painting each grid cell as a two-column block and pausing after every
//! visited cell so the exploration can be watched. [`TerminalGuard`] puts the
//! terminal into raw/alternate-screen mode for the duration of a session.

use std::io::{self, Write};
use std::time::Duration;

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, queue,
    style::{Color as CtColor, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, ClearType},
};

use gridwalk_core::{Bounds, Cell, CellState, Grid};
use gridwalk_paths::{CancelToken, EventSink, SearchEvent};

/// How a cell is currently shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paint {
    Empty,
    Obstacle,
    Start,
    End,
    Visited,
    Path,
}

impl Paint {
    fn from_state(st: CellState) -> Self {
        match st {
            CellState::Empty => Paint::Empty,
            CellState::Obstacle => Paint::Obstacle,
            CellState::Start => Paint::Start,
            CellState::End => Paint::End,
        }
    }

    /// Background color of the block.
    pub fn color(self) -> CtColor {
        match self {
            Paint::Empty => CtColor::White,
            Paint::Obstacle => CtColor::Black,
            Paint::Start => CtColor::Green,
            Paint::End => CtColor::Red,
            Paint::Visited => CtColor::Yellow,
            Paint::Path => CtColor::Blue,
        }
    }

    /// Glyph used when colors are off.
    pub fn glyph(self) -> char {
        match self {
            Paint::Empty => '.',
            Paint::Obstacle => '#',
            Paint::Start => 'S',
            Paint::End => 'E',
            Paint::Visited => 'o',
            Paint::Path => '*',
        }
    }
}

/// Settings for a [`TerminalSink`].
#[derive(Debug, Clone)]
pub struct TerminalSinkConfig {
    /// Pause after each visited cell.
    pub delay: Duration,
    /// Paint colored blocks; otherwise print [`Paint::glyph`]s.
    pub color: bool,
    /// Screen position of the grid's top-left corner (column, row).
    pub origin: (u16, u16),
    /// Poll the keyboard between steps and cancel on `q`, Esc or Ctrl-C.
    /// Needs a real terminal in raw mode.
    pub listen_keys: bool,
}

impl Default for TerminalSinkConfig {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(50),
            color: true,
            origin: (0, 0),
            listen_keys: false,
        }
    }
}

/// Draws search events onto a terminal (or any writer).
///
/// Write errors can't travel through [`EventSink::on_event`]; the first one
/// is kept, drawing stops, and it can be collected with
/// [`take_error`](Self::take_error).
pub struct TerminalSink<W: Write> {
    out: W,
    config: TerminalSinkConfig,
    bounds: Bounds,
    paints: Vec<Paint>,
    cancel: Option<CancelToken>,
    error: Option<io::Error>,
}

impl<W: Write> TerminalSink<W> {
    /// Snapshot `grid` for drawing. The grid must not change while this sink
    /// is in use; build a new sink after editing.
    pub fn new(out: W, grid: &Grid, config: TerminalSinkConfig) -> Self {
        Self {
            out,
            config,
            bounds: grid.bounds(),
            paints: grid.iter().map(|(_, st)| Paint::from_state(st)).collect(),
            cancel: None,
            error: None,
        }
    }

    /// Cancel `token` when the user presses a quit key.
    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Current paint of `cell`, or `None` outside the grid.
    pub fn paint_at(&self, cell: Cell) -> Option<Paint> {
        self.bounds.index(cell).map(|i| self.paints[i])
    }

    /// The first write error hit while drawing, if any.
    pub fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Draw every cell and flush.
    pub fn draw_grid(&mut self) -> io::Result<()> {
        queue!(self.out, terminal::Clear(ClearType::All))?;
        for i in 0..self.paints.len() {
            self.draw_cell(self.bounds.cell_at(i), self.paints[i])?;
        }
        self.draw_footer("")?;
        self.out.flush()
    }

    fn draw_cell(&mut self, c: Cell, paint: Paint) -> io::Result<()> {
        let (ox, oy) = self.config.origin;
        let x = ox.saturating_add((c.col as u16).saturating_mul(2));
        let y = oy.saturating_add(c.row as u16);
        queue!(self.out, cursor::MoveTo(x, y))?;
        if self.config.color {
            queue!(
                self.out,
                SetBackgroundColor(paint.color()),
                Print("  "),
                ResetColor
            )
        } else {
            queue!(self.out, Print(paint.glyph()), Print(' '))
        }
    }

    fn draw_footer(&mut self, text: &str) -> io::Result<()> {
        let (ox, oy) = self.config.origin;
        let y = oy
            .saturating_add(self.bounds.rows() as u16)
            .saturating_add(1);
        queue!(
            self.out,
            cursor::MoveTo(ox, y),
            terminal::Clear(ClearType::CurrentLine),
            SetForegroundColor(CtColor::Reset),
            Print(text)
        )
    }

    /// Repaint `c`. Start and end keep their own paint.
    fn repaint(&mut self, c: Cell, paint: Paint) -> io::Result<()> {
        let Some(i) = self.bounds.index(c) else {
            log::warn!(
                "event for {c} outside the {}x{} grid",
                self.bounds.rows(),
                self.bounds.cols()
            );
            return Ok(());
        };
        if matches!(self.paints[i], Paint::Start | Paint::End) {
            return Ok(());
        }
        self.paints[i] = paint;
        self.draw_cell(c, paint)
    }

    fn handle(&mut self, event: &SearchEvent) -> io::Result<()> {
        match event {
            SearchEvent::Visited(c) => {
                self.repaint(*c, Paint::Visited)?;
                self.out.flush()?;
                self.poll_keys()?;
                if !self.config.delay.is_zero() {
                    std::thread::sleep(self.config.delay);
                }
            }
            SearchEvent::PathFound(path) => {
                for &c in path {
                    self.repaint(c, Paint::Path)?;
                }
                self.draw_footer(&format!("path found: {} cells", path.len()))?;
                self.out.flush()?;
            }
            SearchEvent::NoPath => {
                self.draw_footer("no path")?;
                self.out.flush()?;
            }
            SearchEvent::Cancelled => {
                self.draw_footer("cancelled")?;
                self.out.flush()?;
            }
        }
        Ok(())
    }

    fn poll_keys(&mut self) -> io::Result<()> {
        if !self.config.listen_keys {
            return Ok(());
        }
        let Some(token) = &self.cancel else {
            return Ok(());
        };
        while event::poll(Duration::ZERO)? {
            if let Event::Key(KeyEvent {
                code,
                modifiers,
                kind: KeyEventKind::Press,
                ..
            }) = event::read()?
            {
                let quit = matches!(code, KeyCode::Char('q') | KeyCode::Esc)
                    || (code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL));
                if quit {
                    log::debug!("quit key pressed, cancelling search");
                    token.cancel();
                }
            }
        }
        Ok(())
    }
}

impl<W: Write> EventSink for TerminalSink<W> {
    fn on_event(&mut self, event: &SearchEvent) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = self.handle(event) {
            log::warn!("terminal draw failed: {e}");
            self.error = Some(e);
        }
    }
}

/// Raw mode plus alternate screen, restored on drop.
pub struct TerminalGuard {
    _private: (),
}

impl TerminalGuard {
    pub fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(
            stdout,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::Clear(ClearType::All)
        ) {
            let _ = terminal::disable_raw_mode();
            return Err(e);
        }
        Ok(Self { _private: () })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let mut stdout = io::stdout();
        let _ = execute!(stdout, ResetColor, cursor::Show, terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}
