use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::event::Key;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeymapPreset {
    Default,
    Emacs,
}

impl KeymapPreset {
    pub fn parse(value: &str) -> Self {
        match value {
            "default" => Self::Default,
            "emacs" => Self::Emacs,
            _ => Self::Default,
        }
    }
}

/// Whether key presses drive the page or edit the focused text control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Browse,
    Edit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    FocusNext,
    FocusPrev,
    /// Enter on the focused element.
    Activate,
    /// A key delivered to the page as-is.
    Press(Key),
    ScrollLines(i32),
    ScrollPages(i32),
    Quit,
}

pub fn map_key(key: KeyEvent, mode: Mode, preset: KeymapPreset) -> Option<Command> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Command::Quit);
    }
    match key.code {
        KeyCode::Tab => return Some(Command::FocusNext),
        KeyCode::BackTab => return Some(Command::FocusPrev),
        _ => {}
    }
    match (mode, preset) {
        (Mode::Edit, KeymapPreset::Default) => map_edit_key(key),
        (Mode::Edit, KeymapPreset::Emacs) => map_edit_key_emacs(key),
        (Mode::Browse, KeymapPreset::Default) => map_browse_key_default(key),
        (Mode::Browse, KeymapPreset::Emacs) => map_browse_key_emacs(key),
    }
}

/// Keys a text control does not consume. Everything else is edited text.
fn map_edit_key(key: KeyEvent) -> Option<Command> {
    match key.code {
        KeyCode::Enter => Some(Command::Activate),
        KeyCode::Esc => Some(Command::Press(Key::Escape)),
        KeyCode::Up => Some(Command::FocusPrev),
        KeyCode::Down => Some(Command::FocusNext),
        _ => None,
    }
}

fn map_edit_key_emacs(key: KeyEvent) -> Option<Command> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('g') => Some(Command::Press(Key::Escape)),
            KeyCode::Char('n') => Some(Command::FocusNext),
            KeyCode::Char('p') => Some(Command::FocusPrev),
            _ => None,
        };
    }
    map_edit_key(key)
}

fn map_browse_key_default(key: KeyEvent) -> Option<Command> {
    match key.code {
        KeyCode::Enter => Some(Command::Activate),
        KeyCode::Char(' ') => Some(Command::Press(Key::Space)),
        KeyCode::Esc => Some(Command::Press(Key::Escape)),
        KeyCode::Left => Some(Command::Press(Key::ArrowLeft)),
        KeyCode::Right => Some(Command::Press(Key::ArrowRight)),
        KeyCode::Char('j') | KeyCode::Down => Some(Command::ScrollLines(1)),
        KeyCode::Char('k') | KeyCode::Up => Some(Command::ScrollLines(-1)),
        KeyCode::PageDown => Some(Command::ScrollPages(1)),
        KeyCode::PageUp => Some(Command::ScrollPages(-1)),
        KeyCode::Char('q') => Some(Command::Quit),
        _ => None,
    }
}

fn map_browse_key_emacs(key: KeyEvent) -> Option<Command> {
    if key.modifiers.contains(KeyModifiers::ALT) {
        return match key.code {
            KeyCode::Char('v') => Some(Command::ScrollPages(-1)),
            _ => None,
        };
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('n') => Some(Command::FocusNext),
            KeyCode::Char('p') => Some(Command::FocusPrev),
            KeyCode::Char('v') => Some(Command::ScrollPages(1)),
            KeyCode::Char('g') => Some(Command::Press(Key::Escape)),
            KeyCode::Char('f') => Some(Command::Press(Key::ArrowRight)),
            KeyCode::Char('b') => Some(Command::Press(Key::ArrowLeft)),
            KeyCode::Char('q') => Some(Command::Quit),
            _ => None,
        };
    }

    map_browse_key_default(key)
}
