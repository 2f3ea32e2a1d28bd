use crossterm::event::Event;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::error::{AppError, AppResult};
use crate::event::DomainEvent;

use super::state::Browser;
use super::terminal_session::TerminalSurface;

enum WaitEvent {
    Event(DomainEvent),
    Closed,
}

enum LoopControl {
    Continue { redraw: bool },
    Break,
}

/// Draws, waits for the next event, applies it, and repeats until the user
/// quits or every sender is gone. Events that queued up while a frame was
/// drawn are applied together before the next one.
pub(crate) async fn run_loop<S: TerminalSurface>(
    browser: &mut Browser,
    surface: &mut S,
    rx: &mut UnboundedReceiver<DomainEvent>,
) -> AppResult<()> {
    let mut needs_redraw = true;
    loop {
        if needs_redraw {
            surface
                .draw(|frame| browser.render(frame))
                .map_err(|source| AppError::io_with_context(source, "failed to draw frame"))?;
            needs_redraw = false;
        }

        let mut waited = wait_next_event(rx).await;
        loop {
            let event = match waited {
                WaitEvent::Event(event) => event,
                WaitEvent::Closed => return Ok(()),
            };
            match handle_event(browser, surface, event)? {
                LoopControl::Continue { redraw } => needs_redraw |= redraw,
                LoopControl::Break => return Ok(()),
            }
            match rx.try_recv() {
                Ok(event) => waited = WaitEvent::Event(event),
                Err(_) => break,
            }
        }
    }
}

async fn wait_next_event(rx: &mut UnboundedReceiver<DomainEvent>) -> WaitEvent {
    match rx.recv().await {
        Some(event) => WaitEvent::Event(event),
        None => WaitEvent::Closed,
    }
}

fn handle_event<S: TerminalSurface>(
    browser: &mut Browser,
    surface: &mut S,
    event: DomainEvent,
) -> AppResult<LoopControl> {
    let redraw = match event {
        DomainEvent::Input(Event::Key(key)) => {
            let outcome = browser.handle_key(key);
            if outcome.quit {
                tracing::info!("quit requested");
                return Ok(LoopControl::Break);
            }
            outcome.redraw
        }
        DomainEvent::Input(Event::Resize(..)) => {
            surface
                .clear()
                .map_err(|source| AppError::io_with_context(source, "failed to clear terminal"))?;
            true
        }
        DomainEvent::Input(_) => false,
        DomainEvent::InputError(message) => {
            tracing::warn!(%message, "terminal input error");
            browser.set_status(format!("input error: {message}"));
            true
        }
        DomainEvent::Wake => true,
        event => browser.handle_domain(event),
    };
    Ok(LoopControl::Continue { redraw })
}
