use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::super::state::Browser;
use super::{key, open_browser};
use crate::dom::{Document, ElementId, Selector};
use crate::event::{DomainEvent, UiEvent};
use crate::input::Mode;
use crate::media::PLACEHOLDER_SRC;
use crate::nav::SKIP_LINK_CLASS;
use crate::overlay::OverlayKind;

fn by_id(browser: &Browser, id: &str) -> ElementId {
    browser
        .site
        .document()
        .query(&Selector::id(id))
        .unwrap_or_else(|| panic!("#{id} should exist"))
}

fn type_text(browser: &mut Browser, text: &str) {
    for ch in text.chars() {
        browser.handle_key(key(KeyCode::Char(ch)));
    }
}

fn fill(browser: &mut Browser, id: &str, value: &str) {
    let target = by_id(browser, id);
    browser.site.dispatch(UiEvent::Input {
        target,
        value: value.to_string(),
    });
}

#[tokio::test(start_paused = true)]
async fn tab_walks_the_focus_order_and_wraps() {
    let (mut browser, _tx, _rx) = open_browser("index");
    let order = browser.site.focus_order();
    assert!(order.len() > 3);
    assert!(browser.site.document().has_class(order[0], SKIP_LINK_CLASS));

    assert!(browser.handle_key(key(KeyCode::Tab)).redraw);
    assert_eq!(browser.focused(), Some(order[0]));
    browser.handle_key(key(KeyCode::Tab));
    assert_eq!(browser.focused(), Some(order[1]));

    browser.handle_key(key(KeyCode::BackTab));
    browser.handle_key(key(KeyCode::BackTab));
    assert_eq!(browser.focused(), order.last().copied());
}

#[tokio::test(start_paused = true)]
async fn typing_edits_the_focused_text_control() {
    let (mut browser, _tx, _rx) = open_browser("contact");
    let name = by_id(&browser, "contact-name");
    browser.site.focus(name);
    browser.sync_editor();
    assert_eq!(browser.mode(), Mode::Edit);

    type_text(&mut browser, "Ada q");
    assert_eq!(
        browser.site.document().value(name).as_deref(),
        Some("Ada q")
    );

    browser.handle_key(key(KeyCode::Backspace));
    browser.handle_key(key(KeyCode::Backspace));
    assert_eq!(browser.site.document().value(name).as_deref(), Some("Ada"));
    let editor = browser.editor.as_ref().expect("editor attached");
    assert_eq!(editor.element, name);
    assert_eq!(editor.input.cursor(), 3);
}

#[tokio::test(start_paused = true)]
async fn quit_only_applies_outside_text_controls() {
    let (mut browser, _tx, _rx) = open_browser("contact");
    assert!(browser.handle_key(key(KeyCode::Char('q'))).quit);

    let name = by_id(&browser, "contact-name");
    browser.site.focus(name);
    assert!(!browser.handle_key(key(KeyCode::Char('q'))).quit);

    let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
    assert!(browser.handle_key(ctrl_c).quit);
}

#[tokio::test(start_paused = true)]
async fn enter_on_an_empty_contact_form_shows_inline_errors() {
    let (mut browser, _tx, _rx) = open_browser("contact");
    let email = by_id(&browser, "contact-email");
    browser.site.focus(email);

    browser.handle_key(key(KeyCode::Enter));

    let doc = browser.site.document();
    let body = doc.text_content(doc.body());
    assert!(body.contains("Please enter your name"));
    assert!(browser.site.overlays().active().is_none());
    assert_eq!(browser.focused(), Some(by_id(&browser, "contact-name")));
    assert!(browser.follow_focus);
}

#[tokio::test(start_paused = true)]
async fn submitted_form_opens_the_success_modal_when_the_result_arrives() {
    let (mut browser, _tx, mut rx) = open_browser("contact");
    fill(&mut browser, "contact-name", "Ada Lovelace");
    fill(&mut browser, "contact-email", "ada@example.com");
    fill(&mut browser, "contact-subject", "Adoption");
    fill(&mut browser, "contact-message", "Is Grace still available?");

    let form = by_id(&browser, "contact-form");
    let submit = browser
        .site
        .document()
        .query_within(form, &Selector::attr_eq("type", "submit"))[0];
    browser.site.focus(submit);
    browser.handle_key(key(KeyCode::Enter));
    assert!(browser.site.overlays().active().is_none());

    let finished = rx.recv().await.expect("submission should report back");
    assert!(matches!(finished, DomainEvent::SubmissionFinished { .. }));
    assert!(browser.handle_domain(finished));

    assert_eq!(browser.site.overlays().active(), Some(OverlayKind::Modal));
    let modal = browser.site.overlays().modal().expect("modal open");
    assert_eq!(modal.content.title, "Message Sent Successfully!");
    assert_eq!(browser.focused(), Some(modal.close_button));
    assert!(!browser.scroll_by(1));

    browser.handle_key(key(KeyCode::Esc));
    assert!(browser.site.overlays().active().is_none());
    assert_eq!(browser.focused(), Some(submit));
}

#[tokio::test(start_paused = true)]
async fn arrows_step_through_select_options() {
    let (mut browser, _tx, _rx) = open_browser("contact");
    let subject = by_id(&browser, "contact-subject");
    browser.site.focus(subject);
    assert_eq!(browser.mode(), Mode::Browse);

    browser.handle_key(key(KeyCode::Right));
    browser.handle_key(key(KeyCode::Right));
    assert_eq!(
        browser.site.document().value(subject).as_deref(),
        Some("Fostering")
    );

    for _ in 0..5 {
        browser.handle_key(key(KeyCode::Left));
    }
    assert_eq!(browser.site.document().value(subject).as_deref(), Some(""));
}

#[tokio::test(start_paused = true)]
async fn following_a_nav_link_loads_the_page() {
    let (mut browser, _tx, _rx) = open_browser("index");
    let link = browser
        .site
        .document()
        .query(&Selector::attr_eq("href", "pets.html").within(Selector::tag("nav")))
        .expect("nav link to pets");
    browser.site.focus(link);
    browser.scroll = 4;

    browser.handle_key(key(KeyCode::Enter));

    assert_eq!(browser.site.document().location_path(), "/pets.html");
    assert_eq!(browser.page_title, "Adopt");
    assert_eq!(browser.status().message, "Opened pets.html");
    assert_eq!(browser.scroll(), 0);
    assert!(browser.revealed.is_empty());
}

#[tokio::test(start_paused = true)]
async fn revealing_the_gallery_loads_lazy_images_and_replaces_broken_ones() {
    let (mut browser, _tx, _rx) = open_browser("pets");
    browser.prepare_page(100, 400);

    let doc = browser.site.document();
    let src_of = |alt_prefix: &str| {
        doc.query_all(&Selector::tag("img"))
            .into_iter()
            .find(|img| {
                doc.attr(*img, "alt")
                    .is_some_and(|alt| alt.starts_with(alt_prefix))
            })
            .and_then(|img| doc.attr(img, "src"))
    };
    assert_eq!(src_of("Smeagol").as_deref(), Some("images/smeagol.jpg"));
    assert_eq!(src_of("Joe").as_deref(), Some("images/joe.jpg"));
    let images = doc.query_all(&Selector::tag("img").within(Selector::class("pet-card")));
    let placeholders = images
        .iter()
        .filter(|img| doc.attr(**img, "src").as_deref() == Some(PLACEHOLDER_SRC))
        .count();
    assert_eq!(placeholders, 1);
}

#[tokio::test(start_paused = true)]
async fn lightbox_blocks_scrolling_until_closed() {
    let (mut browser, _tx, _rx) = open_browser("pets");
    browser.prepare_page(60, 6);
    assert!(browser.scroll_by(1));

    let image = browser
        .site
        .document()
        .query(&Selector::tag("img").within(Selector::class("pet-card")))
        .expect("pet image");
    browser.site.focus(image);
    browser.handle_key(key(KeyCode::Enter));
    assert_eq!(browser.site.overlays().active(), Some(OverlayKind::Lightbox));

    let scroll = browser.scroll();
    browser.handle_key(key(KeyCode::Char('j')));
    assert_eq!(browser.scroll(), scroll);

    browser.handle_key(key(KeyCode::Esc));
    assert!(browser.site.overlays().active().is_none());
    assert!(browser.scroll_by(1));
}

#[tokio::test(start_paused = true)]
async fn focus_moves_bring_the_element_into_view() {
    let (mut browser, _tx, _rx) = open_browser("contact");
    browser.prepare_page(80, 6);
    assert_eq!(browser.scroll(), 0);

    let message = by_id(&browser, "contact-message");
    while browser.focused() != Some(message) {
        browser.handle_key(key(KeyCode::Tab));
    }
    let layout = browser.prepare_page(80, 6);

    let extent = layout.extent(message).expect("message field laid out");
    assert!(extent.first >= browser.scroll());
    assert!(extent.last < browser.scroll() + 6);
    assert!(!browser.follow_focus);
}

#[tokio::test(start_paused = true)]
async fn narrow_pages_collapse_the_nav_until_widened() {
    let (browser, _tx, _rx) = open_browser("index");
    let mut browser = browser.with_mobile_breakpoint(80);
    let nav = browser
        .site
        .document()
        .query(&Selector::tag("nav"))
        .expect("nav exists");

    browser.prepare_page(60, 20);
    let button = browser.site.mobile_menu().button().expect("menu button shown");
    assert!(!browser.site.document().is_displayed(nav));
    assert!(browser.site.focus_order().contains(&button));

    browser.prepare_page(120, 20);
    assert!(browser.site.mobile_menu().button().is_none());
    assert!(browser.site.document().is_displayed(nav));
}
