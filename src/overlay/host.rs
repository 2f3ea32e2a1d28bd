use crate::dom::{Document, ElementId};
use crate::event::Key;

use super::lightbox::{LightboxImage, LightboxState, LightboxView};
use super::modal::{self, ModalContent, ModalState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayKind {
    Modal,
    Lightbox,
}

/// Sole owner of the page's overlay surface.
///
/// At most one of the modal and the lightbox is active; opening one closes
/// the other first, so overlays never stack.
#[derive(Debug, Default)]
pub struct OverlayHost {
    modal: Option<ModalState>,
    lightbox: LightboxState,
    lightbox_view: Option<LightboxView>,
}

impl OverlayHost {
    pub fn active(&self) -> Option<OverlayKind> {
        if self.modal.is_some() {
            Some(OverlayKind::Modal)
        } else if self.lightbox.is_open() {
            Some(OverlayKind::Lightbox)
        } else {
            None
        }
    }

    pub fn modal(&self) -> Option<&ModalState> {
        self.modal.as_ref()
    }

    pub fn lightbox(&self) -> &LightboxState {
        &self.lightbox
    }

    /// Root element of the active overlay; focus stays inside it.
    pub fn active_root(&self) -> Option<ElementId> {
        match self.active()? {
            OverlayKind::Modal => self.modal.as_ref().map(|state| state.overlay),
            OverlayKind::Lightbox => self.lightbox_view.map(|view| view.root),
        }
    }

    /// Shows `content`. An open modal is replaced in place; the focus target
    /// captured by the first open is kept.
    pub fn open_modal(&mut self, doc: &mut dyn Document, content: impl Into<ModalContent>) {
        if self.lightbox.is_open() {
            self.close_lightbox(doc);
        }

        let previously_focused = match self.modal.take() {
            Some(existing) => {
                modal::unmount(doc, &existing, false);
                existing.previously_focused
            }
            None => doc.active_element(),
        };

        self.modal = modal::mount(doc, content.into(), previously_focused);
        if self.modal.is_none() {
            tracing::warn!("modal could not be mounted");
        }
    }

    /// Returns `false` when no modal was open.
    pub fn close_modal(&mut self, doc: &mut dyn Document) -> bool {
        let Some(state) = self.modal.take() else {
            return false;
        };
        modal::unmount(doc, &state, true);
        true
    }

    /// Creates the page's lightbox surface ahead of first use.
    pub fn prepare_lightbox(&mut self, doc: &mut dyn Document) -> bool {
        self.ensure_lightbox_view(doc).is_some()
    }

    /// Opens the lightbox at `index` (wrapped into range). Empty collections
    /// are ignored and reported as `false`.
    pub fn open_lightbox(
        &mut self,
        doc: &mut dyn Document,
        images: Vec<LightboxImage>,
        index: isize,
    ) -> bool {
        if images.is_empty() {
            return false;
        }
        let Some(view) = self.ensure_lightbox_view(doc) else {
            tracing::warn!("lightbox surface could not be created");
            return false;
        };
        self.close_modal(doc);

        if !self.lightbox.open_at(images, index) {
            return false;
        }
        if let Some(image) = self.lightbox.current() {
            view.show(doc, image);
        }
        doc.add_class(view.root, "active");
        doc.set_scroll_locked(true);
        true
    }

    pub fn close_lightbox(&mut self, doc: &mut dyn Document) -> bool {
        if !self.lightbox.is_open() {
            return false;
        }
        self.lightbox.close();
        if let Some(view) = self.lightbox_view {
            doc.remove_class(view.root, "active");
            doc.set_attr(view.image, "src", "");
            doc.set_attr(view.image, "alt", "");
        }
        doc.set_scroll_locked(false);
        true
    }

    pub fn next_image(&mut self, doc: &mut dyn Document) -> bool {
        self.step_lightbox(doc, true)
    }

    pub fn previous_image(&mut self, doc: &mut dyn Document) -> bool {
        self.step_lightbox(doc, false)
    }

    /// Cancel/arrow keys for whichever overlay is active. Returns `true` when
    /// the key was consumed.
    pub fn handle_key(&mut self, doc: &mut dyn Document, key: Key) -> bool {
        match (self.active(), key) {
            (Some(OverlayKind::Modal), Key::Escape) => self.close_modal(doc),
            (Some(OverlayKind::Lightbox), Key::Escape) => self.close_lightbox(doc),
            (Some(OverlayKind::Lightbox), Key::ArrowLeft) => self.previous_image(doc),
            (Some(OverlayKind::Lightbox), Key::ArrowRight) => self.next_image(doc),
            _ => false,
        }
    }

    /// Clicks on overlay chrome. Returns `true` when the click landed inside
    /// an active overlay, whether or not it changed anything.
    pub fn handle_click(&mut self, doc: &mut dyn Document, target: ElementId) -> bool {
        if let Some(state) = &self.modal {
            let (overlay, close_button) = (state.overlay, state.close_button);
            if target == overlay || doc.is_inside(target, close_button) {
                self.close_modal(doc);
                return true;
            }
            return doc.is_inside(target, overlay);
        }

        if self.lightbox.is_open()
            && let Some(view) = self.lightbox_view
        {
            if target == view.root || doc.is_inside(target, view.close) {
                self.close_lightbox(doc);
            } else if doc.is_inside(target, view.prev) {
                self.previous_image(doc);
            } else if doc.is_inside(target, view.next) {
                self.next_image(doc);
            }
            return doc.is_inside(target, view.root);
        }

        false
    }

    fn step_lightbox(&mut self, doc: &mut dyn Document, forward: bool) -> bool {
        let image = if forward {
            self.lightbox.next()
        } else {
            self.lightbox.previous()
        };
        let (Some(image), Some(view)) = (image.cloned(), self.lightbox_view) else {
            return false;
        };
        view.show(doc, &image);
        true
    }

    fn ensure_lightbox_view(&mut self, doc: &mut dyn Document) -> Option<LightboxView> {
        if let Some(view) = self.lightbox_view
            && doc.exists(view.root)
        {
            return Some(view);
        }
        self.lightbox_view = LightboxView::ensure(doc);
        self.lightbox_view
    }
}

#[cfg(test)]
mod tests {
    use super::{OverlayHost, OverlayKind};
    use crate::dom::{Document, ElementSpec, MemoryDocument, Selector};
    use crate::event::Key;
    use crate::overlay::{LightboxImage, ModalContent};

    fn images() -> Vec<LightboxImage> {
        vec![
            LightboxImage::new("joe.jpg", "Joe"),
            LightboxImage::new("grace.jpg", "Grace"),
            LightboxImage::new("asher.jpg", "Asher"),
        ]
    }

    fn overlay_count(doc: &MemoryDocument) -> usize {
        doc.query_all(&Selector::class("modal-overlay")).len()
    }

    #[test]
    fn opening_twice_never_stacks_overlays() {
        let mut doc = MemoryDocument::new("/index.html");
        let body = doc.body();
        let card = doc
            .append_child(body, ElementSpec::new("article").class("pet-card"))
            .expect("body exists");
        doc.focus(card);

        let mut host = OverlayHost::default();
        host.open_modal(&mut doc, "first");
        host.open_modal(&mut doc, ModalContent::notice("second"));
        assert_eq!(overlay_count(&doc), 1);
        let panel = host.modal().expect("modal open").panel;
        assert!(doc.text_content(panel).contains("second"));

        assert!(host.close_modal(&mut doc));
        assert_eq!(overlay_count(&doc), 0);
        assert_eq!(doc.active_element(), Some(card));
        assert!(!doc.scroll_locked());
    }

    #[test]
    fn closing_without_an_open_modal_is_a_noop() {
        let mut doc = MemoryDocument::new("/index.html");
        let mut host = OverlayHost::default();
        assert!(!host.close_modal(&mut doc));
        assert!(!host.close_lightbox(&mut doc));
        assert!(!host.handle_key(&mut doc, Key::Escape));
        assert_eq!(host.active(), None);
    }

    #[test]
    fn modal_dismisses_on_backdrop_close_button_and_escape() {
        let mut doc = MemoryDocument::new("/index.html");
        let mut host = OverlayHost::default();

        host.open_modal(&mut doc, "a");
        let overlay = host.modal().expect("open").overlay;
        assert!(host.handle_click(&mut doc, overlay));
        assert_eq!(host.active(), None);

        host.open_modal(&mut doc, "b");
        let panel = host.modal().expect("open").panel;
        assert!(host.handle_click(&mut doc, panel));
        assert_eq!(host.active(), Some(OverlayKind::Modal));
        let close = host.modal().expect("open").close_button;
        assert!(host.handle_click(&mut doc, close));
        assert_eq!(host.active(), None);

        host.open_modal(&mut doc, "c");
        assert!(host.handle_key(&mut doc, Key::Escape));
        assert_eq!(overlay_count(&doc), 0);
    }

    #[test]
    fn lightbox_keys_navigate_and_close() {
        let mut doc = MemoryDocument::new("/pets.html");
        let mut host = OverlayHost::default();
        assert!(host.open_lightbox(&mut doc, images(), 0));
        assert!(doc.scroll_locked());

        let img = doc.query(&Selector::class("lightbox-img")).expect("image");
        assert!(host.handle_key(&mut doc, Key::ArrowLeft));
        assert_eq!(doc.attr(img, "alt").as_deref(), Some("Asher"));
        assert!(host.handle_key(&mut doc, Key::ArrowRight));
        assert_eq!(doc.attr(img, "src").as_deref(), Some("joe.jpg"));

        assert!(host.handle_key(&mut doc, Key::Escape));
        assert!(!host.lightbox().is_open());
        assert!(!doc.scroll_locked());
        let root = doc.query(&Selector::id("lightbox")).expect("root kept");
        assert!(!doc.has_class(root, "active"));
    }

    #[test]
    fn lightbox_closes_on_click_outside_image_only() {
        let mut doc = MemoryDocument::new("/pets.html");
        let mut host = OverlayHost::default();
        host.open_lightbox(&mut doc, images(), 1);

        let img = doc.query(&Selector::class("lightbox-img")).expect("image");
        assert!(host.handle_click(&mut doc, img));
        assert!(host.lightbox().is_open());

        let next = doc.query(&Selector::class("lightbox-next")).expect("next");
        host.handle_click(&mut doc, next);
        assert_eq!(host.lightbox().current_index(), 2);

        let root = doc.query(&Selector::id("lightbox")).expect("root");
        assert!(host.handle_click(&mut doc, root));
        assert!(!host.lightbox().is_open());
    }

    #[test]
    fn opening_one_overlay_closes_the_other() {
        let mut doc = MemoryDocument::new("/pets.html");
        let mut host = OverlayHost::default();

        host.open_lightbox(&mut doc, images(), 0);
        host.open_modal(&mut doc, "notice");
        assert_eq!(host.active(), Some(OverlayKind::Modal));
        assert!(!host.lightbox().is_open());

        assert!(host.open_lightbox(&mut doc, images(), -1));
        assert_eq!(host.active(), Some(OverlayKind::Lightbox));
        assert_eq!(overlay_count(&doc), 0);
        assert_eq!(host.lightbox().current_index(), 2);
        assert!(doc.scroll_locked());
    }

    #[test]
    fn empty_lightbox_request_changes_nothing() {
        let mut doc = MemoryDocument::new("/pets.html");
        let mut host = OverlayHost::default();
        host.open_modal(&mut doc, "keep me");
        assert!(!host.open_lightbox(&mut doc, Vec::new(), 0));
        assert_eq!(host.active(), Some(OverlayKind::Modal));
    }
}
