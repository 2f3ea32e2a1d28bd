use crossterm::event::{Event, KeyEvent, KeyEventKind};
use tui_input::backend::crossterm::EventHandler;

use crate::dom::{Document, ElementId, Selector};
use crate::event::{Key, UiEvent};
use crate::input::{Command, Mode, map_key};

use super::state::Browser;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct KeyOutcome {
    pub redraw: bool,
    pub quit: bool,
}

impl KeyOutcome {
    fn redraw(redraw: bool) -> Self {
        Self {
            redraw,
            quit: false,
        }
    }
}

impl Browser {
    pub(crate) fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome {
        if key.kind == KeyEventKind::Release {
            return KeyOutcome::default();
        }

        let before = self.focused();
        let mode = self.mode();
        let outcome = match map_key(key, mode, self.preset) {
            Some(Command::Quit) => {
                return KeyOutcome {
                    redraw: false,
                    quit: true,
                };
            }
            Some(Command::FocusNext) => KeyOutcome::redraw(self.move_focus(1)),
            Some(Command::FocusPrev) => KeyOutcome::redraw(self.move_focus(-1)),
            Some(Command::Activate) => {
                self.activate();
                KeyOutcome::redraw(true)
            }
            Some(Command::Press(key)) => {
                self.press(key, mode);
                KeyOutcome::redraw(true)
            }
            Some(Command::ScrollLines(lines)) => KeyOutcome::redraw(self.scroll_by(lines as isize)),
            Some(Command::ScrollPages(pages)) => {
                let page = self.viewport_height.saturating_sub(1).max(1) as isize;
                KeyOutcome::redraw(self.scroll_by(pages as isize * page))
            }
            None if mode == Mode::Edit => KeyOutcome::redraw(self.edit(key)),
            None => KeyOutcome::default(),
        };

        if self.focused() != before {
            self.follow_focus = true;
        }
        self.sync_editor();
        if let Err(err) = self.follow_navigation() {
            tracing::error!(error = %err, "navigation failed");
            self.set_status(format!("navigation failed: {err}"));
        }
        outcome
    }

    /// Moves focus `step` places along the tab order, wrapping at the ends.
    pub(super) fn move_focus(&mut self, step: isize) -> bool {
        let order = self.site.focus_order();
        if order.is_empty() {
            return false;
        }
        let current = self.focused();
        let position = current.and_then(|id| order.iter().position(|candidate| *candidate == id));
        let len = order.len() as isize;
        let next = match position {
            Some(idx) => (idx as isize + step).rem_euclid(len) as usize,
            None if step >= 0 => 0,
            None => order.len() - 1,
        };
        let target = order[next];
        if current == Some(target) {
            return false;
        }

        if let Some(previous) = current {
            self.site.dispatch(UiEvent::Blur { target: previous });
        }
        self.site.focus(target);
        self.follow_focus = true;
        true
    }

    /// Enter on the focused element. Buttons are clicked, everything else
    /// receives the key.
    fn activate(&mut self) {
        let target = self.focused();
        let event = match target {
            Some(id) if self.site.document().tag(id) == Some("button") => {
                UiEvent::Click { target: id }
            }
            _ => UiEvent::KeyDown {
                target,
                key: Key::Enter,
            },
        };
        self.site.dispatch(event);
    }

    fn press(&mut self, key: Key, mode: Mode) {
        let target = self.focused();
        match (key, target) {
            (Key::Space, Some(id)) if self.site.document().tag(id) == Some("button") => {
                self.site.dispatch(UiEvent::Click { target: id });
            }
            (Key::ArrowLeft | Key::ArrowRight, Some(id))
                if self.site.overlays().active().is_none()
                    && self.site.document().tag(id) == Some("select") =>
            {
                let step = if key == Key::ArrowLeft { -1 } else { 1 };
                self.cycle_option(id, step);
            }
            (Key::Escape, Some(id)) if mode == Mode::Edit => {
                self.site.dispatch(UiEvent::KeyDown { target, key });
                if self.site.overlays().active().is_none() {
                    self.site.dispatch(UiEvent::Blur { target: id });
                    let body = self.site.document().body();
                    self.site.focus(body);
                }
            }
            _ => {
                self.site.dispatch(UiEvent::KeyDown { target, key });
            }
        }
    }

    /// Steps a select to the neighbouring option and reports it as input.
    fn cycle_option(&mut self, select: ElementId, step: isize) {
        let doc = self.site.document();
        let options: Vec<String> = doc
            .query_within(select, &Selector::tag("option"))
            .into_iter()
            .map(|option| {
                doc.attr(option, "value")
                    .unwrap_or_else(|| doc.text_content(option))
            })
            .collect();
        if options.is_empty() {
            return;
        }
        let current = doc.value(select).unwrap_or_default();
        let position = options.iter().position(|value| *value == current);
        let next = match position {
            Some(idx) => (idx as isize + step).clamp(0, options.len() as isize - 1) as usize,
            None => 0,
        };
        let value = options[next].clone();
        if value == current {
            return;
        }
        self.site.dispatch(UiEvent::Input {
            target: select,
            value,
        });
    }

    /// Feeds a key to the text editor. Returns whether anything changed.
    fn edit(&mut self, key: KeyEvent) -> bool {
        self.sync_editor();
        let Some(editor) = self.editor.as_mut() else {
            return false;
        };
        let Some(changed) = editor.input.handle_event(&Event::Key(key)) else {
            return false;
        };
        if changed.value {
            let event = UiEvent::Input {
                target: editor.element,
                value: editor.input.value().to_string(),
            };
            self.site.dispatch(event);
        }
        changed.value || changed.cursor
    }

    pub(super) fn scroll_by(&mut self, delta: isize) -> bool {
        if self.site.document().scroll_locked() {
            return false;
        }
        let max = self.total_lines.saturating_sub(self.viewport_height);
        let next = self.scroll.saturating_add_signed(delta).min(max);
        if next == self.scroll {
            return false;
        }
        self.scroll = next;
        true
    }
}
