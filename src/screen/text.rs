use std::{
    io::{self, Stdout, Write},
    time::{Duration, Instant},
};

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, queue,
    terminal::{
        self, disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
        LeaveAlternateScreen, SetTitle,
    },
};
use tracing::{debug, warn};

use super::{Flow, Screen};
use crate::{
    error::{Error, Result},
    grid::{Grid, ALIVE},
};

pub const LIVE: &str = "⬜";
pub const DEAD: &str = "  ";

/// How often a frozen screen wakes up to look for input.
const FROZEN_POLL: Duration = Duration::from_millis(150);

/// Terminal size in character cells.
#[derive(Debug, PartialEq, PartialOrd, Clone, Copy)]
pub struct Rect {
    w: u16,
    h: u16,
}

impl Rect {
    #[inline]
    pub fn new(width: u16, height: u16) -> Self {
        Rect { w: width, h: height }
    }

    /// Asks the kernel first (`TIOCGWINSZ` on stdout), then crossterm.
    pub fn term_size() -> Result<Self> {
        #[cfg(unix)]
        {
            // SAFETY: winsize is plain data and ioctl only writes into it.
            let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
            let rc = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &mut ws) };
            if rc == 0 && ws.ws_row > 0 && ws.ws_col > 0 {
                return Ok(Rect::new(ws.ws_col, ws.ws_row));
            }
            debug!("TIOCGWINSZ failed, asking crossterm");
        }
        let (w, h) = terminal::size().map_err(|_| Error::TerminalSize)?;
        if w == 0 || h == 0 {
            return Err(Error::TerminalSize);
        }
        Ok(Rect::new(w, h))
    }

    #[inline]
    pub fn w(&self) -> u16 {
        self.w
    }

    #[inline]
    pub fn h(&self) -> u16 {
        self.h
    }

    /// Grid `(rows, cols)` that fits: two columns per cell, and one spare row
    /// so the last newline does not scroll.
    #[inline]
    pub fn grid_fit(&self) -> (usize, usize) {
        ((self.h as usize).saturating_sub(1), self.w as usize / 2)
    }
}

/// Builds one frame; rows end with `\r\n` since the terminal is in raw mode.
pub fn frame_text(grid: &Grid) -> String {
    let mut s = String::with_capacity(grid.rows() * (grid.cols() * LIVE.len() + 2));
    for (i, row) in grid.rows_iter().enumerate() {
        if i > 0 {
            s.push_str("\r\n");
        }
        for &c in row {
            s.push_str(if c == ALIVE { LIVE } else { DEAD });
        }
    }
    s
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Quit,
    Freeze,
}

pub fn key_action(key: &KeyEvent) -> Option<KeyAction> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(KeyAction::Quit),
            _ => None,
        };
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Some(KeyAction::Quit),
        KeyCode::Char('p') => Some(KeyAction::Freeze),
        _ => None,
    }
}

/// Draws the grid in the terminal's alternate screen. The terminal is put
/// back the way it was when the screen is dropped, including when setting it
/// up fails halfway.
pub struct TextScreen<W: Write = Stdout> {
    out: W,
    frozen: bool,
}

impl TextScreen {
    pub fn new() -> Result<Self> {
        Self::with_writer(io::stdout())
    }
}

impl<W: Write> TextScreen<W> {
    pub fn with_writer(out: W) -> Result<Self> {
        let mut screen = TextScreen { out, frozen: false };
        screen.enter()?;
        Ok(screen)
    }

    fn enter(&mut self) -> Result<()> {
        execute!(self.out, EnterAlternateScreen, SetTitle("Conway's Game of Life"), Hide)?;
        enable_raw_mode()?;
        execute!(self.out, Clear(ClearType::All))?;
        Ok(())
    }

    #[inline]
    pub fn frozen(&self) -> bool {
        self.frozen
    }
}

impl<W: Write> Screen for TextScreen<W> {
    fn render(&mut self, grid: &Grid) -> Result<()> {
        queue!(self.out, MoveTo(0, 0), Clear(ClearType::All))?;
        self.out.write_all(frame_text(grid).as_bytes())?;
        self.out.flush()?;
        Ok(())
    }

    fn pause(&mut self, delay: Duration) -> Result<Flow> {
        let deadline = Instant::now() + delay;
        loop {
            let now = Instant::now();
            if !self.frozen && now >= deadline {
                return Ok(Flow::Continue);
            }
            let wait = if self.frozen {
                FROZEN_POLL
            } else {
                deadline - now
            };
            if !event::poll(wait)? {
                continue;
            }
            if let Event::Key(key) = event::read()? {
                match key_action(&key) {
                    Some(KeyAction::Quit) => return Ok(Flow::Quit),
                    Some(KeyAction::Freeze) => {
                        self.frozen = !self.frozen;
                        debug!(frozen = self.frozen, "freeze toggled");
                    }
                    None => {}
                }
            }
        }
    }
}

impl<W: Write> Drop for TextScreen<W> {
    fn drop(&mut self) {
        if let Err(e) = disable_raw_mode() {
            warn!("could not leave raw mode: {e}");
        }
        if let Err(e) = execute!(self.out, LeaveAlternateScreen, Show) {
            warn!("could not leave the alternate screen: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{cell::RefCell, rc::Rc};

    #[derive(Clone, Default)]
    struct Shared(Rc<RefCell<Vec<u8>>>);

    impl Write for Shared {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Writer whose first write fails; later writes go through.
    struct FailsOnce {
        inner: Shared,
        failed: bool,
    }

    impl Write for FailsOnce {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if !self.failed {
                self.failed = true;
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"));
            }
            self.inner.write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[cfg(unix)]
    #[test]
    fn terminal_is_restored_when_setup_fails() {
        let buf = Shared::default();
        let out = FailsOnce {
            inner: buf.clone(),
            failed: false,
        };
        assert!(matches!(TextScreen::with_writer(out), Err(Error::Terminal(_))));
        let written = String::from_utf8_lossy(&buf.0.borrow()).into_owned();
        assert_eq!(written, "\x1b[?1049l\x1b[?25h");
    }

    #[cfg(unix)]
    #[test]
    fn drop_leaves_the_alternate_screen() {
        let buf = Shared::default();
        // Whether or not raw mode can be enabled here, the screen is
        // restored once it goes away.
        drop(TextScreen::with_writer(buf.clone()));
        let written = String::from_utf8_lossy(&buf.0.borrow()).into_owned();
        assert!(written.contains("\x1b[?1049h"), "{written:?}");
        assert!(written.ends_with("\x1b[?1049l\x1b[?25h"), "{written:?}");
    }

    #[test]
    fn frame_uses_two_columns_per_cell() {
        let g = Grid::from_pattern("#.\n.#\n").unwrap();
        assert_eq!(frame_text(&g), format!("{LIVE}{DEAD}\r\n{DEAD}{LIVE}"));
    }

    #[test]
    fn grid_fit_halves_columns_and_spares_a_row() {
        assert_eq!(Rect::new(81, 25).grid_fit(), (24, 40));
        assert_eq!(Rect::new(1, 1).grid_fit(), (0, 0));
    }

    #[test]
    fn keys() {
        let press = |code, m| KeyEvent::new(code, m);
        assert_eq!(key_action(&press(KeyCode::Char('q'), KeyModifiers::NONE)), Some(KeyAction::Quit));
        assert_eq!(key_action(&press(KeyCode::Esc, KeyModifiers::NONE)), Some(KeyAction::Quit));
        assert_eq!(key_action(&press(KeyCode::Char('c'), KeyModifiers::CONTROL)), Some(KeyAction::Quit));
        assert_eq!(key_action(&press(KeyCode::Char('c'), KeyModifiers::NONE)), None);
        assert_eq!(key_action(&press(KeyCode::Char('p'), KeyModifiers::NONE)), Some(KeyAction::Freeze));

        let mut release = press(KeyCode::Char('q'), KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        assert_eq!(key_action(&release), None);
    }
}
