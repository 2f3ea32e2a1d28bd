use crate::animate::{Reveal, RevealState};
use crate::cards::{Cards, CardsState};
use crate::dom::ElementId;
use crate::error::AppResult;
use crate::event::UiEvent;
use crate::form::{Forms, FormsState, SubmissionReceipt};
use crate::map::MapTracking;
use crate::media::{Media, MediaState};
use crate::nav::{MobileMenu, MobileMenuState, Navigation, NavigationState};
use crate::overlay::Gallery;
use crate::search::{Search, SearchBars, SearchId};
use crate::selection::{EnquiryTabs, Faq, FaqState, TabsState};
use crate::structured_data::StructuredData;

use super::context::PageContext;
use super::feature::{Feature, Handled};

/// Mounted state of every page feature, in dispatch order.
#[derive(Debug, Default)]
pub(crate) struct FeatureHost {
    pub media: MediaState,
    pub reveal: RevealState,
    pub gallery: (),
    pub search: SearchBars,
    pub forms: FormsState,
    pub faq: FaqState,
    pub tabs: TabsState,
    pub cards: CardsState,
    pub mobile_menu: MobileMenuState,
    pub navigation: NavigationState,
}

impl FeatureHost {
    /// Wires every feature against the loaded page. A feature that fails to
    /// mount is logged and left inert; the others still mount.
    pub(crate) fn mount(ctx: &mut PageContext<'_>) -> Self {
        mount_or_default::<StructuredData>(ctx);
        mount_or_default::<MapTracking>(ctx);
        Self {
            media: mount_or_default::<Media>(ctx),
            reveal: mount_or_default::<Reveal>(ctx),
            gallery: mount_or_default::<Gallery>(ctx),
            search: mount_or_default::<Search>(ctx),
            forms: mount_or_default::<Forms>(ctx),
            faq: mount_or_default::<Faq>(ctx),
            tabs: mount_or_default::<EnquiryTabs>(ctx),
            cards: mount_or_default::<Cards>(ctx),
            mobile_menu: mount_or_default::<MobileMenu>(ctx),
            navigation: mount_or_default::<Navigation>(ctx),
        }
    }

    /// Offers `event` to each feature until one consumes it.
    pub(crate) fn dispatch(&mut self, event: &UiEvent, ctx: &mut PageContext<'_>) -> Handled {
        let handled = dispatch_to::<Media>(&mut self.media, event, ctx)
            .or_else(|| dispatch_to::<Reveal>(&mut self.reveal, event, ctx))
            .or_else(|| dispatch_to::<Gallery>(&mut self.gallery, event, ctx))
            .or_else(|| dispatch_to::<Search>(&mut self.search, event, ctx))
            .or_else(|| dispatch_to::<Forms>(&mut self.forms, event, ctx))
            .or_else(|| dispatch_to::<Faq>(&mut self.faq, event, ctx))
            .or_else(|| dispatch_to::<EnquiryTabs>(&mut self.tabs, event, ctx))
            .or_else(|| dispatch_to::<Cards>(&mut self.cards, event, ctx))
            .or_else(|| dispatch_to::<MobileMenu>(&mut self.mobile_menu, event, ctx))
            .or_else(|| dispatch_to::<Navigation>(&mut self.navigation, event, ctx));
        handled.unwrap_or(Handled::Ignored)
    }

    pub(crate) fn search_due(
        &mut self,
        ctx: &mut PageContext<'_>,
        search: SearchId,
        generation: u64,
    ) -> bool {
        report(Search::NAME, self.search.due(ctx, search, generation)).unwrap_or(false)
    }

    pub(crate) fn submission_finished(
        &mut self,
        ctx: &mut PageContext<'_>,
        form: ElementId,
        generation: u64,
        result: AppResult<SubmissionReceipt>,
    ) -> bool {
        report(
            Forms::NAME,
            self.forms.complete(ctx, form, generation, result),
        )
        .unwrap_or(false)
    }

    /// Collapses or restores the main navigation for the viewport width.
    pub(crate) fn set_compact(&mut self, ctx: &mut PageContext<'_>, compact: bool) -> bool {
        self.mobile_menu.fit(ctx.doc, compact)
    }

    pub(crate) fn stats_tick(&mut self, ctx: &mut PageContext<'_>) -> bool {
        self.reveal.tick(ctx)
    }

    /// Drops every pending timer and in-flight submission of the page.
    pub(crate) fn unmount(&mut self, ctx: &mut PageContext<'_>) {
        self.search.cancel_all();
        self.forms.cancel_all(ctx.doc);
        self.reveal.stop();
    }
}

fn mount_or_default<F>(ctx: &mut PageContext<'_>) -> F::State
where
    F: Feature,
    F::State: Default,
{
    report(F::NAME, F::mount(ctx)).unwrap_or_default()
}

/// `Some` when the feature consumed the event, so later features are
/// skipped. A failed handler also ends the dispatch: it may have acted
/// before failing and the event must not reach a second feature.
fn dispatch_to<F: Feature>(
    state: &mut F::State,
    event: &UiEvent,
    ctx: &mut PageContext<'_>,
) -> Option<Handled> {
    match F::handle_ui(state, event, ctx) {
        Ok(Handled::Consumed) => {
            tracing::trace!(feature = F::NAME, ?event, "event consumed");
            Some(Handled::Consumed)
        }
        Ok(Handled::Ignored) => None,
        Err(err) => {
            tracing::error!(feature = F::NAME, error = %err, "feature handler failed");
            Some(Handled::Consumed)
        }
    }
}

fn report<T>(feature: &str, result: AppResult<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::error!(feature, error = %err, "feature handler failed");
            None
        }
    }
}
