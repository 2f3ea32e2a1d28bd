mod debounce;
mod filter;

use crate::dom::{Document, ElementId, ElementSpec, Selector};
use crate::error::AppResult;
use crate::event::{DomainEvent, Key, UiEvent};
use crate::site::{Feature, Handled, PageContext};

pub use debounce::Debouncer;
pub use filter::{NO_RESULTS_CLASS, SearchState, apply_filter, filter, normalize_query, text_matches};

/// Identifies one search bar on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SearchId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GalleryProfile {
    pub gallery_class: &'static str,
    pub card_class: &'static str,
    pub placeholder: &'static str,
    pub label: &'static str,
    pub no_results: &'static str,
    pub track_kind: &'static str,
}

pub const PET_GALLERY: GalleryProfile = GalleryProfile {
    gallery_class: "pet-gallery",
    card_class: "pet-card",
    placeholder: "Search pets by name, breed, or description...",
    label: "Search pets",
    no_results: "No pets found matching your search. Try different keywords.",
    track_kind: "search",
};

pub const BLOG_GALLERY: GalleryProfile = GalleryProfile {
    gallery_class: "blog-gallery",
    card_class: "blog-card",
    placeholder: "Search blog posts by title or content...",
    label: "Search blog posts",
    no_results: "No blog posts found matching your search.",
    track_kind: "blog_search",
};

/// Search box wired to one card gallery.
#[derive(Debug)]
pub struct SearchBar {
    id: SearchId,
    profile: GalleryProfile,
    input: ElementId,
    button: ElementId,
    results: ElementId,
    cards: Vec<ElementId>,
    debouncer: Debouncer,
    last: SearchState,
}

impl SearchBar {
    /// Inserts the search controls right before `gallery`.
    fn mount(
        doc: &mut dyn Document,
        id: SearchId,
        profile: GalleryProfile,
        gallery: ElementId,
    ) -> Option<Self> {
        let container =
            doc.insert_before(gallery, ElementSpec::new("div").class("search-container"))?;
        let input = doc.append_child(
            container,
            ElementSpec::new("input")
                .class("search-input")
                .attr("type", "text")
                .attr("placeholder", profile.placeholder)
                .attr("aria-label", profile.label),
        )?;
        let button = doc.append_child(
            container,
            ElementSpec::new("button")
                .class("search-btn")
                .attr("aria-label", "Search")
                .text("🔍"),
        )?;
        let results = doc.insert_before(gallery, ElementSpec::new("div").class("search-results"))?;
        let cards = doc.query_all(&Selector::class(profile.card_class));

        Some(Self {
            id,
            profile,
            input,
            button,
            results,
            cards,
            debouncer: Debouncer::default(),
            last: SearchState::default(),
        })
    }

    pub fn id(&self) -> SearchId {
        self.id
    }

    pub fn profile(&self) -> &GalleryProfile {
        &self.profile
    }

    pub fn input(&self) -> ElementId {
        self.input
    }

    pub fn button(&self) -> ElementId {
        self.button
    }

    pub fn results(&self) -> ElementId {
        self.results
    }

    pub fn last(&self) -> &SearchState {
        &self.last
    }

    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    fn schedule(&mut self, ctx: &PageContext<'_>) {
        let search = self.id;
        let delay = ctx.scheduler.timing().search_debounce();
        self.debouncer
            .trigger(ctx.scheduler, delay, |generation| DomainEvent::SearchDue {
                search,
                generation,
            });
    }

    /// Filters right away, superseding any pending debounced run.
    fn run_now(&mut self, ctx: &mut PageContext<'_>) -> AppResult<()> {
        self.debouncer.cancel();
        self.run(ctx)
    }

    fn run(&mut self, ctx: &mut PageContext<'_>) -> AppResult<()> {
        let query = ctx.doc.value(self.input).unwrap_or_default();
        self.last = apply_filter(
            ctx.doc,
            &query,
            &self.cards,
            Some(self.results),
            self.profile.no_results,
        );
        tracing::debug!(
            query = %self.last.query,
            matched = self.last.matched.len(),
            "search filtered"
        );
        if !self.last.query.is_empty() {
            let query = self.last.query.clone();
            ctx.track(self.profile.track_kind, &query)?;
        }
        Ok(())
    }
}

pub struct Search;

#[derive(Debug, Default)]
pub struct SearchBars {
    bars: Vec<SearchBar>,
}

impl SearchBars {
    pub fn bars(&self) -> &[SearchBar] {
        &self.bars
    }

    pub fn bar(&self, id: SearchId) -> Option<&SearchBar> {
        self.bars.iter().find(|bar| bar.id == id)
    }

    /// Runs a debounced search whose quiet period elapsed. Stale generations
    /// are ignored.
    pub(crate) fn due(
        &mut self,
        ctx: &mut PageContext<'_>,
        search: SearchId,
        generation: u64,
    ) -> AppResult<bool> {
        let Some(bar) = self.bars.iter_mut().find(|bar| bar.id == search) else {
            return Ok(false);
        };
        if !bar.debouncer.take_due(generation) {
            tracing::trace!(?search, generation, "dropping stale search timer");
            return Ok(false);
        }
        bar.run(ctx)?;
        Ok(true)
    }

    pub fn cancel_all(&mut self) {
        for bar in &mut self.bars {
            bar.debouncer.cancel();
        }
    }
}

impl Feature for Search {
    type State = SearchBars;

    const NAME: &'static str = "search";

    fn mount(ctx: &mut PageContext<'_>) -> AppResult<Self::State> {
        let mut bars = Vec::new();
        for profile in [PET_GALLERY, BLOG_GALLERY] {
            let Some(gallery) = ctx.doc.query(&Selector::class(profile.gallery_class)) else {
                continue;
            };
            let id = SearchId(bars.len());
            if let Some(bar) = SearchBar::mount(ctx.doc, id, profile, gallery) {
                bars.push(bar);
            }
        }
        Ok(SearchBars { bars })
    }

    fn handle_ui(
        state: &mut Self::State,
        event: &UiEvent,
        ctx: &mut PageContext<'_>,
    ) -> AppResult<Handled> {
        for bar in &mut state.bars {
            match event {
                UiEvent::Input { target, .. } if *target == bar.input => {
                    bar.schedule(ctx);
                    return Ok(Handled::Consumed);
                }
                UiEvent::Click { target } if ctx.doc.is_inside(*target, bar.button) => {
                    bar.run_now(ctx)?;
                    return Ok(Handled::Consumed);
                }
                UiEvent::KeyDown {
                    target: Some(target),
                    key: Key::Enter,
                } if *target == bar.input => {
                    bar.run_now(ctx)?;
                    return Ok(Handled::Consumed);
                }
                _ => {}
            }
        }
        Ok(Handled::Ignored)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{BLOG_GALLERY, NO_RESULTS_CLASS, PET_GALLERY, Search, SearchBars};
    use crate::dom::{Document, ElementId, ElementSpec, MemoryDocument, Selector};
    use crate::event::{DomainEvent, Key, UiEvent};
    use crate::site::test_support::Harness;
    use crate::site::{Feature, Handled};

    fn pets_page(doc: &mut MemoryDocument) -> (ElementId, Vec<ElementId>) {
        let body = doc.body();
        let main = doc
            .append_child(body, ElementSpec::new("main"))
            .expect("body exists");
        let gallery = doc
            .append_child(main, ElementSpec::new("div").class("pet-gallery"))
            .expect("main exists");
        let cards = ["Joe the Labrador", "Grace the tabby", "Asher the beagle"]
            .into_iter()
            .map(|text| {
                doc.append_child(gallery, ElementSpec::new("div").class("pet-card").text(text))
                    .expect("gallery exists")
            })
            .collect();
        (gallery, cards)
    }

    fn mount(harness: &mut Harness) -> SearchBars {
        Search::mount(&mut harness.ctx()).expect("search mounts")
    }

    fn type_query(harness: &mut Harness, bars: &mut SearchBars, value: &str) -> Handled {
        let input = bars.bars()[0].input();
        harness.doc.set_value(input, value);
        let event = UiEvent::Input {
            target: input,
            value: value.to_string(),
        };
        Search::handle_ui(bars, &event, &mut harness.ctx()).expect("input handled")
    }

    async fn deliver_due(harness: &mut Harness, bars: &mut SearchBars) -> bool {
        let Some(DomainEvent::SearchDue { search, generation }) = harness.rx.recv().await else {
            panic!("expected a debounced search");
        };
        bars.due(&mut harness.ctx(), search, generation)
            .expect("due search runs")
    }

    #[test]
    fn controls_are_inserted_before_the_gallery() {
        let mut harness = Harness::new("/pets.html");
        let (gallery, _) = pets_page(&mut harness.doc);
        let bars = mount(&mut harness);

        assert_eq!(bars.bars().len(), 1);
        assert_eq!(bars.bars()[0].profile(), &PET_GALLERY);
        let main = harness.doc.parent(gallery).expect("main");
        let classes: Vec<String> = harness
            .doc
            .children(main)
            .into_iter()
            .map(|child| harness.doc.classes(child).join(" "))
            .collect();
        assert_eq!(classes, vec!["search-container", "search-results", "pet-gallery"]);
    }

    #[test]
    fn pages_without_galleries_get_no_search() {
        let mut harness = Harness::new("/index.html");
        let bars = mount(&mut harness);
        assert!(bars.bars().is_empty());
        assert!(harness.doc.query(&Selector::class("search-input")).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn typing_filters_once_after_the_quiet_period() {
        let mut harness = Harness::new("/pets.html");
        let (_, cards) = pets_page(&mut harness.doc);
        let mut bars = mount(&mut harness);

        type_query(&mut harness, &mut bars, "l");
        tokio::time::sleep(Duration::from_millis(100)).await;
        type_query(&mut harness, &mut bars, "lab");
        assert!(!harness.doc.is_hidden(cards[1]));

        assert!(deliver_due(&mut harness, &mut bars).await);
        assert!(!harness.doc.is_hidden(cards[0]));
        assert!(harness.doc.is_hidden(cards[1]));
        assert!(harness.doc.is_hidden(cards[2]));
        assert_eq!(
            harness.tracked(),
            vec![("search".to_string(), "lab".to_string())]
        );
        assert!(harness.rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn enter_bypasses_debounce_and_makes_pending_timer_stale() {
        let mut harness = Harness::new("/pets.html");
        pets_page(&mut harness.doc);
        let mut bars = mount(&mut harness);
        let input = bars.bars()[0].input();

        type_query(&mut harness, &mut bars, "parrot");
        let enter = UiEvent::KeyDown {
            target: Some(input),
            key: Key::Enter,
        };
        let handled = Search::handle_ui(&mut bars, &enter, &mut harness.ctx()).expect("enter");
        assert_eq!(handled, Handled::Consumed);
        assert!(!bars.bars()[0].is_pending());

        let results = harness
            .doc
            .query_all(&Selector::class(NO_RESULTS_CLASS));
        assert_eq!(results.len(), 1);
        assert_eq!(harness.doc.text_content(results[0]), PET_GALLERY.no_results);

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(harness.rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn button_click_with_empty_query_restores_everything() {
        let mut harness = Harness::new("/pets.html");
        let (_, cards) = pets_page(&mut harness.doc);
        let mut bars = mount(&mut harness);
        let button = bars.bars()[0].button();

        harness.doc.set_hidden(cards[0], true);
        let click = UiEvent::Click { target: button };
        Search::handle_ui(&mut bars, &click, &mut harness.ctx()).expect("click");

        assert!(cards.iter().all(|card| !harness.doc.is_hidden(*card)));
        assert!(harness.tracked().is_empty());
    }

    #[test]
    fn blog_gallery_uses_its_own_wording() {
        let mut harness = Harness::new("/blog.html");
        let body = harness.doc.body();
        harness
            .doc
            .append_child(body, ElementSpec::new("div").class("blog-gallery"))
            .expect("body exists");
        let bars = mount(&mut harness);
        assert_eq!(bars.bars()[0].profile(), &BLOG_GALLERY);
        let input = bars.bars()[0].input();
        assert_eq!(
            harness.doc.attr(input, "placeholder").as_deref(),
            Some(BLOG_GALLERY.placeholder)
        );
    }
}
