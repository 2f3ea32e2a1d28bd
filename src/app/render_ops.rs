use ratatui::Frame;

use crate::dom::{Document, ElementId};
use crate::event::UiEvent;
use crate::overlay::OverlayKind;
use crate::ui::{
    PageLayout, RenderHints, StatusInfo, draw_chrome, draw_lightbox_overlay, draw_modal_overlay,
    draw_page, layout_page, split_layout,
};

use super::state::Browser;

/// Reveal passes per frame. Each pass can only show more of the page.
const MAX_REVEAL_PASSES: usize = 3;

impl Browser {
    pub(crate) fn render(&mut self, frame: &mut Frame<'_>) {
        let layout = split_layout(frame.area(), self.debug_status_visible);
        let page = self.prepare_page(layout.page.width, layout.page.height);
        draw_page(frame, layout.page, &page, self.scroll);

        let focused = self.focused();
        let overlays = self.site.overlays();
        match overlays.active() {
            Some(OverlayKind::Modal) => {
                if let Some(modal) = overlays.modal() {
                    draw_modal_overlay(frame, layout.page, modal, focused);
                }
            }
            Some(OverlayKind::Lightbox) => {
                if let Some(root) = overlays.active_root() {
                    draw_lightbox_overlay(
                        frame,
                        layout.page,
                        self.site.document(),
                        root,
                        overlays.lightbox(),
                        focused,
                    );
                }
            }
            None => {}
        }

        let last_interaction = self
            .site
            .tracker()
            .events()
            .ok()
            .and_then(|mut events| events.pop());
        let info = StatusInfo {
            page_title: &self.page_title,
            location: self.site.document().location_path(),
            mode: self.mode(),
            overlay_open: overlays.active().is_some(),
            message: &self.status.message,
            scroll: self.scroll,
            total_lines: self.total_lines,
            last_interaction: last_interaction.as_ref(),
        };
        draw_chrome(frame, layout, &info, self.debug_status_visible);
    }

    /// Lays the page out for a `width` x `height` viewport, scrolls to the
    /// focused element if focus just moved, and reveals what came into view.
    pub(crate) fn prepare_page(&mut self, width: u16, height: u16) -> PageLayout {
        self.viewport_height = usize::from(height);
        let compact = self.mobile_breakpoint.is_some_and(|columns| width <= columns);
        self.site.set_compact(compact);
        let mut layout = self.layout(width);
        for _ in 0..MAX_REVEAL_PASSES {
            self.total_lines = layout.len();
            if self.follow_focus {
                self.scroll_to_focus(&layout);
            }
            self.clamp_scroll();
            if !self.reveal_visible(&layout) {
                break;
            }
            layout = self.layout(width);
        }
        self.follow_focus = false;
        layout
    }

    fn layout(&self, width: u16) -> PageLayout {
        let hints = RenderHints {
            focused: self.focused(),
            caret: self.editor.as_ref().map(|editor| editor.input.cursor()),
        };
        layout_page(self.site.document(), width, hints)
    }

    fn scroll_to_focus(&mut self, layout: &PageLayout) {
        let Some(extent) = self.focused().and_then(|id| layout.extent(id)) else {
            return;
        };
        let height = self.viewport_height.max(1);
        if extent.first < self.scroll {
            self.scroll = extent.first;
        } else if extent.last >= self.scroll + height {
            self.scroll = (extent.last + 1).saturating_sub(height).min(extent.first);
        }
    }

    fn clamp_scroll(&mut self) {
        let max = self.total_lines.saturating_sub(self.viewport_height);
        self.scroll = self.scroll.min(max);
    }

    /// Sends `Revealed` to elements seen for the first time, and `ImageError`
    /// to visible images that have nothing to load. Returns whether any event
    /// went out.
    fn reveal_visible(&mut self, layout: &PageLayout) -> bool {
        let visible = layout.visible(self.scroll, self.viewport_height);
        let fresh: Vec<ElementId> = visible
            .into_iter()
            .filter(|id| self.revealed.insert(*id))
            .collect();
        if fresh.is_empty() {
            return false;
        }

        for target in &fresh {
            self.site.dispatch(UiEvent::Revealed { target: *target });
        }
        for target in fresh {
            let doc = self.site.document();
            let broken = doc.tag(target) == Some("img")
                && doc.attr(target, "src").is_none_or(|src| src.trim().is_empty());
            if broken {
                self.site.dispatch(UiEvent::ImageError { target });
            }
        }
        true
    }
}
