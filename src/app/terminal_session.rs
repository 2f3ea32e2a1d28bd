use std::io::{self, Stdout};

use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Frame;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Size;

use crate::error::{AppError, AppResult};

/// What the event loop needs from a terminal. Tests draw into a
/// `TestBackend` through the same seam.
pub(crate) trait TerminalSurface {
    fn size(&self) -> io::Result<Size>;

    fn clear(&mut self) -> io::Result<()>;

    fn draw<F>(&mut self, render: F) -> io::Result<()>
    where
        F: FnOnce(&mut Frame<'_>);
}

/// Raw mode plus the alternate screen for as long as the value lives.
pub(crate) struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    active: bool,
}

impl TerminalSession {
    pub(crate) fn enter() -> AppResult<Self> {
        enable_raw_mode()
            .map_err(|source| AppError::io_with_context(source, "failed to enable raw mode"))?;
        let mut stdout = io::stdout();
        if let Err(source) = execute!(stdout, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::io_with_context(
                source,
                "failed to enter alternate screen",
            ));
        }

        let mut terminal = match Terminal::new(CrosstermBackend::new(stdout)) {
            Ok(terminal) => terminal,
            Err(source) => {
                leave_after_failed_enter(None);
                return Err(AppError::io_with_context(source, "failed to open terminal"));
            }
        };
        if let Err(source) = terminal.clear().and_then(|()| terminal.hide_cursor()) {
            leave_after_failed_enter(Some(&mut terminal));
            return Err(AppError::io_with_context(source, "failed to prepare terminal"));
        }

        Ok(Self {
            terminal,
            active: true,
        })
    }

    pub(crate) fn restore(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;

        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()
    }
}

impl TerminalSurface for TerminalSession {
    fn size(&self) -> io::Result<Size> {
        self.terminal.size()
    }

    fn clear(&mut self) -> io::Result<()> {
        self.terminal.clear()
    }

    fn draw<F>(&mut self, render: F) -> io::Result<()>
    where
        F: FnOnce(&mut Frame<'_>),
    {
        self.terminal.draw(render).map(|_| ())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        if let Err(err) = self.restore() {
            tracing::warn!(error = %err, "failed to restore terminal");
        }
    }
}

fn leave_after_failed_enter(terminal: Option<&mut Terminal<CrosstermBackend<Stdout>>>) {
    let _ = match terminal {
        Some(terminal) => execute!(terminal.backend_mut(), LeaveAlternateScreen),
        None => execute!(io::stdout(), LeaveAlternateScreen),
    };
    let _ = disable_raw_mode();
}
