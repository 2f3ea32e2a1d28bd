use crate::dom::{Document, ElementId, Selector};
use crate::event::{DomainEvent, UiEvent};
use crate::form::FormsState;
use crate::interaction::InteractionTracker;
use crate::nav::MobileMenuState;
use crate::overlay::OverlayHost;
use crate::search::SearchBars;
use crate::selection::{FaqState, TabsState};

use super::context::{PageContext, Scheduler};
use super::feature::Handled;
use super::host::FeatureHost;

/// One loaded page: its document, the overlay slot and every mounted feature.
///
/// All page state is mutated here, on the event loop. Timers and submissions
/// report back through [`Site::handle_domain`].
pub(crate) struct Site {
    doc: Box<dyn Document>,
    overlays: OverlayHost,
    tracker: InteractionTracker,
    scheduler: Scheduler,
    features: FeatureHost,
    /// Viewport is at or below the mobile breakpoint.
    compact: bool,
}

impl Site {
    pub(crate) fn load(
        doc: Box<dyn Document>,
        tracker: InteractionTracker,
        scheduler: Scheduler,
    ) -> Self {
        let mut site = Self {
            doc,
            overlays: OverlayHost::default(),
            tracker,
            scheduler,
            features: FeatureHost::default(),
            compact: false,
        };
        let (_, mut ctx) = site.parts();
        let features = FeatureHost::mount(&mut ctx);
        site.features = features;
        tracing::info!(page = site.doc.location_path(), "page loaded");
        site
    }

    /// Swaps in another page. Pending timers and submissions of the old page
    /// are cancelled; the interaction log carries over.
    pub(crate) fn replace_page(&mut self, doc: Box<dyn Document>) {
        self.unmount();
        self.doc = doc;
        self.overlays = OverlayHost::default();
        let (_, mut ctx) = self.parts();
        let features = FeatureHost::mount(&mut ctx);
        self.features = features;
        let compact = self.compact;
        self.set_compact(compact);
        tracing::info!(page = self.doc.location_path(), "page loaded");
    }

    /// Tells the page whether the viewport is narrow. Returns whether the page
    /// changed; the setting carries over to later pages.
    pub(crate) fn set_compact(&mut self, compact: bool) -> bool {
        self.compact = compact;
        let (features, mut ctx) = self.parts();
        features.set_compact(&mut ctx, compact)
    }

    pub(crate) fn document(&self) -> &dyn Document {
        &*self.doc
    }

    pub(crate) fn overlays(&self) -> &OverlayHost {
        &self.overlays
    }

    pub(crate) fn tracker(&self) -> &InteractionTracker {
        &self.tracker
    }

    pub(crate) fn forms(&self) -> &FormsState {
        &self.features.forms
    }

    pub(crate) fn search(&self) -> &SearchBars {
        &self.features.search
    }

    pub(crate) fn faq(&self) -> &FaqState {
        &self.features.faq
    }

    pub(crate) fn tabs(&self) -> &TabsState {
        &self.features.tabs
    }

    pub(crate) fn mobile_menu(&self) -> &MobileMenuState {
        &self.features.mobile_menu
    }

    /// Page the user navigated to, if a link was followed since the last call.
    pub(crate) fn take_navigation(&mut self) -> Option<String> {
        self.features.navigation.take_request()
    }

    /// Delivers a UI event.
    ///
    /// Input events update the control's value before any feature sees them.
    /// While an overlay is open, clicks and keys only reach the overlay.
    pub(crate) fn dispatch(&mut self, event: UiEvent) -> Handled {
        if let UiEvent::Input { target, value } = &event {
            self.doc.set_value(*target, value);
        }

        if self.overlays.active().is_some() {
            match &event {
                UiEvent::Click { target } => {
                    self.overlays.handle_click(&mut *self.doc, *target);
                    return Handled::Consumed;
                }
                UiEvent::KeyDown { key, .. } => {
                    self.overlays.handle_key(&mut *self.doc, *key);
                    return Handled::Consumed;
                }
                _ => {}
            }
        }

        let (features, mut ctx) = self.parts();
        features.dispatch(&event, &mut ctx)
    }

    /// Handles a loop event addressed to the page. Returns whether the page
    /// changed.
    pub(crate) fn handle_domain(&mut self, event: DomainEvent) -> bool {
        match event {
            DomainEvent::Ui(event) => {
                self.dispatch(event);
                true
            }
            DomainEvent::SearchDue { search, generation } => {
                let (features, mut ctx) = self.parts();
                features.search_due(&mut ctx, search, generation)
            }
            DomainEvent::SubmissionFinished {
                form,
                generation,
                result,
            } => {
                let (features, mut ctx) = self.parts();
                features.submission_finished(&mut ctx, form, generation, result)
            }
            DomainEvent::StatsTick => {
                let (features, mut ctx) = self.parts();
                features.stats_tick(&mut ctx)
            }
            DomainEvent::Input(_) | DomainEvent::InputError(_) | DomainEvent::Wake => false,
        }
    }

    /// Focusable elements in tab order. Inside an open overlay only its own
    /// controls are reachable.
    pub(crate) fn focus_order(&self) -> Vec<ElementId> {
        let focusable = Selector::any([
            Selector::tag("a").and(Selector::has_attr("href")),
            Selector::tag("button"),
            Selector::tag("input"),
            Selector::tag("select"),
            Selector::tag("textarea"),
            Selector::has_attr("tabindex"),
        ]);
        let scope = self.overlays.active_root().unwrap_or(self.doc.body());
        self.doc
            .query_within(scope, &focusable)
            .into_iter()
            .filter(|id| self.doc.is_displayed(*id))
            .filter(|id| self.doc.attr(*id, "disabled").is_none())
            .filter(|id| self.doc.attr(*id, "tabindex").as_deref() != Some("-1"))
            .filter(|id| self.overlays.active_root().is_some() || !self.in_overlay(*id))
            .collect()
    }

    pub(crate) fn focus(&mut self, id: ElementId) -> bool {
        self.doc.focus(id)
    }

    fn in_overlay(&self, id: ElementId) -> bool {
        self.doc.closest(id, &overlay_surface()).is_some()
    }

    fn unmount(&mut self) {
        let (features, mut ctx) = self.parts();
        features.unmount(&mut ctx);
    }

    fn parts(&mut self) -> (&mut FeatureHost, PageContext<'_>) {
        (
            &mut self.features,
            PageContext {
                doc: &mut *self.doc,
                overlays: &mut self.overlays,
                tracker: &mut self.tracker,
                scheduler: &self.scheduler,
            },
        )
    }
}

impl Drop for Site {
    fn drop(&mut self) {
        self.unmount();
    }
}

/// Modal and lightbox roots; never part of the page flow.
pub(crate) fn overlay_surface() -> Selector {
    Selector::any([Selector::class("modal-overlay"), Selector::id("lightbox")])
}
