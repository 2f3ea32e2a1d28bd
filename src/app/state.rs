use std::collections::HashSet;

use tui_input::Input;

use crate::content::SiteContent;
use crate::dom::{Document, ElementId};
use crate::error::{AppError, AppResult};
use crate::event::DomainEvent;
use crate::input::{KeymapPreset, Mode};
use crate::interaction::InteractionTracker;
use crate::site::{Scheduler, Site};

/// Text control currently being edited, with its caret.
#[derive(Debug)]
pub(crate) struct Editor {
    pub element: ElementId,
    pub input: Input,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct StatusState {
    pub message: String,
}

/// The page being browsed plus everything the terminal adds on top of it:
/// scroll position, focus bookkeeping and the active text editor.
pub(crate) struct Browser {
    pub(super) site: Site,
    pub(super) content: SiteContent,
    pub(super) page_title: String,
    pub(super) preset: KeymapPreset,
    pub(super) debug_status_visible: bool,
    /// Page width at or below which the nav collapses. Never when unset.
    pub(super) mobile_breakpoint: Option<u16>,
    pub(super) scroll: usize,
    pub(super) viewport_height: usize,
    pub(super) total_lines: usize,
    /// Elements that already received `Revealed`.
    pub(super) revealed: HashSet<ElementId>,
    pub(super) editor: Option<Editor>,
    /// Set when focus moved and the next frame should scroll to it.
    pub(super) follow_focus: bool,
    pub(super) status: StatusState,
}

impl Browser {
    pub(crate) fn open(
        content: SiteContent,
        page: Option<&str>,
        tracker: InteractionTracker,
        scheduler: Scheduler,
        preset: KeymapPreset,
    ) -> AppResult<Self> {
        let start = match page {
            Some(name) => content
                .page(name)
                .ok_or_else(|| AppError::invalid_argument(format!("unknown page: {name}")))?,
            None => content
                .first_page()
                .ok_or_else(|| AppError::invalid_argument("site has no pages"))?,
        };
        let doc = content.build_document(start)?;
        let page_title = start.title.clone();
        let status = StatusState {
            message: format!("Opened {}", start.file),
        };
        let site = Site::load(Box::new(doc), tracker, scheduler);

        Ok(Self {
            site,
            content,
            page_title,
            preset,
            debug_status_visible: false,
            mobile_breakpoint: None,
            scroll: 0,
            viewport_height: 0,
            total_lines: 0,
            revealed: HashSet::new(),
            editor: None,
            follow_focus: false,
            status,
        })
    }

    pub(crate) fn with_debug_status(mut self, visible: bool) -> Self {
        self.debug_status_visible = visible;
        self
    }

    pub(crate) fn with_mobile_breakpoint(mut self, columns: u16) -> Self {
        self.mobile_breakpoint = Some(columns);
        self
    }

    pub(crate) fn site(&self) -> &Site {
        &self.site
    }

    pub(crate) fn scroll(&self) -> usize {
        self.scroll
    }

    pub(crate) fn status(&self) -> &StatusState {
        &self.status
    }

    pub(crate) fn set_status(&mut self, message: impl Into<String>) {
        self.status.message = message.into();
    }

    pub(crate) fn focused(&self) -> Option<ElementId> {
        self.site.document().active_element()
    }

    pub(crate) fn mode(&self) -> Mode {
        match self.focused() {
            Some(id) if is_text_control(self.site.document(), id) => Mode::Edit,
            _ => Mode::Browse,
        }
    }

    /// Routes a timer or submission result to the page.
    pub(crate) fn handle_domain(&mut self, event: DomainEvent) -> bool {
        let before = self.focused();
        let changed = self.site.handle_domain(event);
        if changed {
            self.follow_focus |= self.focused() != before;
            self.sync_editor();
        }
        changed
    }

    /// Keeps the editor attached to the focused text control and in step with
    /// values the page changed on its own, e.g. a form reset.
    pub(super) fn sync_editor(&mut self) {
        let doc = self.site.document();
        let Some(focused) = self.focused().filter(|id| is_text_control(doc, *id)) else {
            self.editor = None;
            return;
        };
        let value = doc.value(focused).unwrap_or_default();
        match &mut self.editor {
            Some(editor) if editor.element == focused => {
                if editor.input.value() != value {
                    editor.input = Input::new(value);
                }
            }
            _ => {
                self.editor = Some(Editor {
                    element: focused,
                    input: Input::new(value),
                });
            }
        }
    }
}

pub(crate) fn is_text_control(doc: &dyn Document, id: ElementId) -> bool {
    match doc.tag(id) {
        Some("textarea") => true,
        Some("input") => !matches!(
            doc.attr(id, "type").as_deref(),
            Some("submit" | "button" | "checkbox" | "radio" | "hidden")
        ),
        _ => false,
    }
}
