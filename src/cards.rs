use crate::dom::{Document, ElementId, Selector};
use crate::error::AppResult;
use crate::event::{Key, UiEvent};
use crate::site::{Feature, Handled, PageContext};

const UNKNOWN_TITLE: &str = "Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardKind {
    Pet,
    Help,
    Blog,
    Action,
}

impl CardKind {
    pub const ALL: [CardKind; 4] = [Self::Pet, Self::Help, Self::Blog, Self::Action];

    pub fn class(self) -> &'static str {
        match self {
            Self::Pet => "pet-card",
            Self::Help => "help-card",
            Self::Blog => "blog-card",
            Self::Action => "action-card",
        }
    }

    /// Interaction type recorded when the card is activated.
    pub fn track_kind(self) -> &'static str {
        match self {
            Self::Pet => "pet",
            Self::Help => "help",
            Self::Blog => "blog",
            Self::Action => "action",
        }
    }

    pub fn of(doc: &dyn Document, card: ElementId) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| doc.has_class(card, kind.class()))
    }

    pub fn message(self, title: &str) -> String {
        match self {
            Self::Pet => format!(
                "You selected {title}! In a real application, this would show detailed \
                 information about this pet."
            ),
            Self::Help => format!(
                "You're interested in {title}! This would open a detailed information page \
                 about how to {}.",
                title.to_lowercase()
            ),
            Self::Blog => format!("Loading article: \"{title}\". This would open the full blog post."),
            Self::Action => {
                format!("Taking action: {title}. This would guide you through the process.")
            }
        }
    }
}

pub fn any_card() -> Selector {
    Selector::any(CardKind::ALL.map(|kind| Selector::class(kind.class())))
}

/// Text of the card's first heading.
pub fn card_title(doc: &dyn Document, card: ElementId) -> String {
    doc.query_within(card, &Selector::tag("h3"))
        .first()
        .map(|heading| doc.text_content(*heading))
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| UNKNOWN_TITLE.to_string())
}

/// Message for a generic `.btn`; `context` is the enclosing card's title.
pub fn button_message(label: &str, context: &str) -> String {
    let normalized = label.trim().to_lowercase();
    match normalized.as_str() {
        "adopt" => adoption_message(context),
        other if other.starts_with("adopt ") => adoption_message(context),
        "foster" => "Thank you for your interest in fostering! This would open a fostering \
                     application form."
            .to_string(),
        "donate" => {
            "Thank you for your interest in donating! This would open a donation form.".to_string()
        }
        "volunteer" => "Thank you for your interest in volunteering! This would open a \
                        volunteer application form."
            .to_string(),
        "read more" => format!(
            "Loading full article: \"{context}\". This would open the complete blog post."
        ),
        _ => format!(
            "Action: {}. This would perform the requested action.",
            label.trim()
        ),
    }
}

fn adoption_message(context: &str) -> String {
    format!(
        "Thank you for your interest in adoption! This would open an adoption application \
         form for {context}."
    )
}

/// Pet/help/blog/action cards and the `.btn` controls on the page.
pub struct Cards;

#[derive(Debug, Default)]
pub struct CardsState {
    cards: Vec<ElementId>,
}

impl CardsState {
    pub fn cards(&self) -> &[ElementId] {
        &self.cards
    }
}

/// Buttons with their own behaviour (form submits, overlay chrome, search).
fn is_plain_button(doc: &dyn Document, button: ElementId) -> bool {
    let owned_elsewhere = Selector::any([
        Selector::tag("form"),
        Selector::class("modal-overlay"),
        Selector::class("lightbox"),
        Selector::class("search-container"),
    ]);
    doc.attr(button, "type").as_deref() != Some("submit")
        && doc.closest(button, &owned_elsewhere).is_none()
}

fn activate_card(ctx: &mut PageContext<'_>, card: ElementId) -> AppResult<Handled> {
    let Some(kind) = CardKind::of(ctx.doc, card) else {
        return Ok(Handled::Ignored);
    };
    let title = card_title(ctx.doc, card);
    ctx.overlays.open_modal(ctx.doc, kind.message(&title));
    ctx.track(kind.track_kind(), &title)?;
    Ok(Handled::Consumed)
}

impl Feature for Cards {
    type State = CardsState;

    const NAME: &'static str = "cards";

    fn mount(ctx: &mut PageContext<'_>) -> AppResult<Self::State> {
        let cards = ctx.doc.query_all(&any_card());
        for card in &cards {
            ctx.doc.set_attr(*card, "tabindex", "0");
        }
        Ok(CardsState { cards })
    }

    fn handle_ui(
        state: &mut Self::State,
        event: &UiEvent,
        ctx: &mut PageContext<'_>,
    ) -> AppResult<Handled> {
        let _ = state;
        match event {
            UiEvent::Click { target } => {
                if let Some(button) = ctx.doc.closest(*target, &Selector::class("btn")) {
                    if !is_plain_button(ctx.doc, button) {
                        return Ok(Handled::Ignored);
                    }
                    let context = ctx
                        .doc
                        .closest(button, &any_card())
                        .map(|card| card_title(ctx.doc, card))
                        .unwrap_or_else(|| UNKNOWN_TITLE.to_string());
                    let label = ctx.doc.text_content(button);
                    ctx.overlays
                        .open_modal(ctx.doc, button_message(&label, &context));
                    return Ok(Handled::Consumed);
                }
                match ctx.doc.closest(*target, &any_card()) {
                    Some(card) => activate_card(ctx, card),
                    None => Ok(Handled::Ignored),
                }
            }
            UiEvent::KeyDown {
                target: Some(target),
                key: Key::Enter | Key::Space,
            } if ctx.doc.matches(*target, &any_card()) => activate_card(ctx, *target),
            _ => Ok(Handled::Ignored),
        }
    }
}
