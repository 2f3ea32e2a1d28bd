use crate::dom::{Document, ElementId, ElementSpec, Selector};
use crate::error::AppResult;
use crate::event::{Key, UiEvent};
use crate::site::{Feature, Handled, PageContext};

pub const SKIP_LINK_CLASS: &str = "skip-link";
pub const MAIN_CONTENT_ID: &str = "main-content";
const DEFAULT_PAGE: &str = "index.html";

/// Last path segment, `index.html` for the site root.
pub fn current_page(location_path: &str) -> &str {
    match location_path.rsplit('/').next() {
        Some(page) if !page.is_empty() => page,
        _ => DEFAULT_PAGE,
    }
}

/// Marks the `nav a` whose `href` names the current page; clears the rest.
pub fn highlight_active_link(doc: &mut dyn Document) -> Option<ElementId> {
    let page = current_page(doc.location_path()).to_string();
    let mut active = None;
    for link in doc.query_all(&Selector::tag("a").within(Selector::tag("nav"))) {
        let is_current = doc.attr(link, "href").as_deref() == Some(page.as_str());
        doc.toggle_class(link, "active", is_current);
        if is_current {
            doc.set_attr(link, "aria-current", "page");
            active.get_or_insert(link);
        } else {
            doc.remove_attr(link, "aria-current");
        }
    }
    active
}

/// Inserts the "Skip to main content" link as the body's first child.
pub fn insert_skip_link(doc: &mut dyn Document) -> Option<ElementId> {
    if let Some(existing) = doc.query(&Selector::class(SKIP_LINK_CLASS)) {
        return Some(existing);
    }
    let body = doc.body();
    doc.prepend_child(
        body,
        ElementSpec::new("a")
            .class(SKIP_LINK_CLASS)
            .attr("href", format!("#{MAIN_CONTENT_ID}"))
            .text("Skip to main content"),
    )
}

/// Local page a link points at, e.g. `pets.html` for `pets.html#joe`.
pub fn link_target(href: &str) -> Option<&str> {
    let page = href.split(['#', '?']).next()?;
    let is_local = !page.contains("://") && !page.starts_with("mailto:") && !page.starts_with("tel:");
    (is_local && page.ends_with(".html")).then_some(page)
}

/// Active link highlighting, the skip link and page-to-page navigation.
pub struct Navigation;

#[derive(Debug, Default)]
pub struct NavigationState {
    active_link: Option<ElementId>,
    skip_link: Option<ElementId>,
    requested: Option<String>,
}

impl NavigationState {
    pub fn active_link(&self) -> Option<ElementId> {
        self.active_link
    }

    /// Page a followed link asked for, if any. Cleared on read.
    pub fn take_request(&mut self) -> Option<String> {
        self.requested.take()
    }
}

impl Feature for Navigation {
    type State = NavigationState;

    const NAME: &'static str = "navigation";

    fn mount(ctx: &mut PageContext<'_>) -> AppResult<Self::State> {
        let active_link = highlight_active_link(ctx.doc);
        let skip_link = insert_skip_link(ctx.doc);
        Ok(NavigationState {
            active_link,
            skip_link,
            requested: None,
        })
    }

    fn handle_ui(
        state: &mut Self::State,
        event: &UiEvent,
        ctx: &mut PageContext<'_>,
    ) -> AppResult<Handled> {
        let target = match event {
            UiEvent::Click { target } => *target,
            UiEvent::KeyDown {
                target: Some(target),
                key: Key::Enter,
            } => *target,
            _ => return Ok(Handled::Ignored),
        };
        let Some(link) = ctx.doc.closest(target, &Selector::has_attr("href")) else {
            return Ok(Handled::Ignored);
        };

        if Some(link) == state.skip_link {
            if let Some(main) = ctx.doc.query(&Selector::id(MAIN_CONTENT_ID)) {
                ctx.doc.focus(main);
            }
            return Ok(Handled::Consumed);
        }

        let href = ctx.doc.attr(link, "href").unwrap_or_default();
        let Some(page) = link_target(&href) else {
            return Ok(Handled::Ignored);
        };
        tracing::debug!(page, "navigation requested");
        state.requested = Some(page.to_string());
        Ok(Handled::Consumed)
    }
}

pub const MOBILE_MENU_CLASS: &str = "mobile-menu-btn";
pub const MOBILE_OPEN_CLASS: &str = "mobile-open";

/// Collapsible main navigation for narrow viewports.
pub struct MobileMenu;

#[derive(Debug, Default)]
pub struct MobileMenuState {
    nav: Option<ElementId>,
    button: Option<ElementId>,
}

impl MobileMenuState {
    pub fn button(&self) -> Option<ElementId> {
        self.button
    }

    pub fn is_open(&self, doc: &dyn Document) -> bool {
        self.nav.is_some_and(|nav| doc.has_class(nav, MOBILE_OPEN_CLASS))
    }

    /// Inserts the menu button in front of the nav on compact viewports and
    /// takes it out again on wide ones. Returns whether the page changed.
    pub fn fit(&mut self, doc: &mut dyn Document, compact: bool) -> bool {
        let Some(nav) = self.nav else {
            return false;
        };
        match (compact, self.button) {
            (true, None) => {
                self.button = doc.insert_before(
                    nav,
                    ElementSpec::new("button")
                        .class(MOBILE_MENU_CLASS)
                        .attr("type", "button")
                        .attr("aria-label", "Toggle navigation menu")
                        .attr("aria-expanded", "false")
                        .text("☰"),
                );
                self.set_open(doc, false);
                self.button.is_some()
            }
            (false, Some(button)) => {
                doc.remove(button);
                self.button = None;
                doc.remove_class(nav, MOBILE_OPEN_CLASS);
                doc.set_hidden(nav, false);
                true
            }
            _ => false,
        }
    }

    fn set_open(&self, doc: &mut dyn Document, open: bool) {
        let Some(nav) = self.nav else {
            return;
        };
        doc.toggle_class(nav, MOBILE_OPEN_CLASS, open);
        doc.set_hidden(nav, !open);
        if let Some(button) = self.button {
            doc.set_attr(button, "aria-expanded", if open { "true" } else { "false" });
        }
    }
}

impl Feature for MobileMenu {
    type State = MobileMenuState;

    const NAME: &'static str = "mobile-menu";

    fn mount(ctx: &mut PageContext<'_>) -> AppResult<Self::State> {
        Ok(MobileMenuState {
            nav: ctx.doc.query(&Selector::tag("nav")),
            button: None,
        })
    }

    fn handle_ui(
        state: &mut Self::State,
        event: &UiEvent,
        ctx: &mut PageContext<'_>,
    ) -> AppResult<Handled> {
        let UiEvent::Click { target } = event else {
            return Ok(Handled::Ignored);
        };
        if state.button != Some(*target) {
            return Ok(Handled::Ignored);
        }
        let open = !state.is_open(ctx.doc);
        state.set_open(ctx.doc, open);
        tracing::debug!(open, "mobile menu toggled");
        Ok(Handled::Consumed)
    }
}

#[cfg(test)]
mod tests {
    use super::{
        MOBILE_MENU_CLASS, MOBILE_OPEN_CLASS, MobileMenu, Navigation, current_page, link_target,
    };
    use crate::dom::{Document, ElementId, ElementSpec, MemoryDocument};
    use crate::event::UiEvent;
    use crate::site::Feature;
    use crate::site::test_support::Harness;

    fn nav(doc: &mut MemoryDocument) -> Vec<ElementId> {
        let body = doc.body();
        let nav = doc
            .append_child(body, ElementSpec::new("nav"))
            .expect("body exists");
        ["index.html", "pets.html", "contact.html"]
            .into_iter()
            .map(|href| {
                doc.append_child(nav, ElementSpec::new("a").attr("href", href).text(href))
                    .expect("nav exists")
            })
            .collect()
    }

    #[test]
    fn current_page_defaults_to_index() {
        assert_eq!(current_page("/"), "index.html");
        assert_eq!(current_page(""), "index.html");
        assert_eq!(current_page("/site/pets.html"), "pets.html");
    }

    #[test]
    fn link_targets_are_local_pages_only() {
        assert_eq!(link_target("pets.html#joe"), Some("pets.html"));
        assert_eq!(link_target("https://ncpr.org.za/pets.html"), None);
        assert_eq!(link_target("mailto:info@ncpr.org.za"), None);
        assert_eq!(link_target("#main-content"), None);
    }

    #[test]
    fn only_the_current_page_link_is_active() {
        let mut harness = Harness::new("/pets.html");
        let links = nav(&mut harness.doc);
        harness.doc.add_class(links[0], "active");

        let state = Navigation::mount(&mut harness.ctx()).expect("nav mounts");
        assert_eq!(state.active_link(), Some(links[1]));
        assert!(!harness.doc.has_class(links[0], "active"));
        assert!(harness.doc.has_class(links[1], "active"));
        assert_eq!(
            harness.doc.attr(links[1], "aria-current").as_deref(),
            Some("page")
        );
    }

    #[test]
    fn skip_link_comes_first_and_focuses_main() {
        let mut harness = Harness::new("/index.html");
        let body = harness.doc.body();
        let main = harness
            .doc
            .append_child(body, ElementSpec::new("main").id("main-content"))
            .expect("body exists");
        let mut state = Navigation::mount(&mut harness.ctx()).expect("nav mounts");

        let skip = harness.doc.children(body)[0];
        assert_eq!(harness.doc.text_content(skip), "Skip to main content");
        Navigation::handle_ui(&mut state, &UiEvent::Click { target: skip }, &mut harness.ctx())
            .expect("click");
        assert_eq!(harness.doc.active_element(), Some(main));
        assert_eq!(state.take_request(), None);
    }

    #[test]
    fn following_a_link_records_the_page() {
        let mut harness = Harness::new("/index.html");
        let links = nav(&mut harness.doc);
        let mut state = Navigation::mount(&mut harness.ctx()).expect("nav mounts");

        let click = UiEvent::Click { target: links[2] };
        Navigation::handle_ui(&mut state, &click, &mut harness.ctx()).expect("click");
        assert_eq!(state.take_request().as_deref(), Some("contact.html"));
        assert_eq!(state.take_request(), None);
    }

    #[test]
    fn compact_viewports_collapse_the_nav_behind_a_button() {
        let mut harness = Harness::new("/index.html");
        let links = nav(&mut harness.doc);
        let nav = harness.doc.parent(links[0]).expect("links sit in the nav");
        let mut state = MobileMenu::mount(&mut harness.ctx()).expect("menu mounts");
        assert!(!state.fit(&mut harness.doc, false));
        assert!(state.button().is_none());

        assert!(state.fit(&mut harness.doc, true));
        assert!(!state.fit(&mut harness.doc, true));
        let button = state.button().expect("menu button inserted");
        let body = harness.doc.body();
        assert_eq!(harness.doc.children(body), vec![button, nav]);
        assert!(harness.doc.has_class(button, MOBILE_MENU_CLASS));
        assert!(!harness.doc.is_displayed(links[0]));

        let click = UiEvent::Click { target: button };
        MobileMenu::handle_ui(&mut state, &click, &mut harness.ctx()).expect("click");
        assert!(harness.doc.has_class(nav, MOBILE_OPEN_CLASS));
        assert!(harness.doc.is_displayed(links[0]));
        assert_eq!(
            harness.doc.attr(button, "aria-expanded").as_deref(),
            Some("true")
        );

        MobileMenu::handle_ui(&mut state, &click, &mut harness.ctx()).expect("click");
        assert!(!state.is_open(&harness.doc));
        assert_eq!(
            harness.doc.attr(button, "aria-expanded").as_deref(),
            Some("false")
        );

        assert!(state.fit(&mut harness.doc, false));
        assert!(!harness.doc.exists(button));
        assert!(harness.doc.is_displayed(links[0]));
    }

    #[test]
    fn pages_without_a_nav_never_get_a_menu_button() {
        let mut harness = Harness::new("/index.html");
        let mut state = MobileMenu::mount(&mut harness.ctx()).expect("menu mounts");
        assert!(!state.fit(&mut harness.doc, true));
        assert!(state.button().is_none());
    }
}
