use crate::dom::{Document, ElementId, Selector};
use crate::error::AppResult;
use crate::event::{Key, UiEvent};
use crate::site::{Feature, Handled, PageContext};

use super::{ExclusiveSelection, SelectionMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaqItem {
    pub item: ElementId,
    pub question: ElementId,
    pub answer: ElementId,
}

/// `.faq-item` accordion: opening one question closes the others.
pub struct Faq;

#[derive(Debug)]
pub struct FaqState {
    items: Vec<FaqItem>,
    selection: ExclusiveSelection<ElementId>,
}

impl Default for FaqState {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            selection: ExclusiveSelection::new(Vec::new(), SelectionMode::AtMostOne),
        }
    }
}

impl FaqState {
    pub fn items(&self) -> &[FaqItem] {
        &self.items
    }

    pub fn open_item(&self) -> Option<ElementId> {
        self.selection.active().copied()
    }

    fn question_of(&self, doc: &dyn Document, target: ElementId) -> Option<ElementId> {
        self.items
            .iter()
            .find(|entry| doc.is_inside(target, entry.question))
            .map(|entry| entry.item)
    }

    fn render(&self, doc: &mut dyn Document) {
        for entry in &self.items {
            let open = self.selection.is_active(&entry.item);
            doc.set_attr(
                entry.question,
                "aria-expanded",
                if open { "true" } else { "false" },
            );
            doc.toggle_class(entry.answer, "open", open);
        }
    }
}

impl Feature for Faq {
    type State = FaqState;

    const NAME: &'static str = "faq";

    fn mount(ctx: &mut PageContext<'_>) -> AppResult<Self::State> {
        let doc = &*ctx.doc;
        let mut items = Vec::new();
        let mut initially_open = None;
        for item in doc.query_all(&Selector::class("faq-item")) {
            let question = doc.query_within(item, &Selector::class("faq-question"));
            let answer = doc.query_within(item, &Selector::class("faq-answer"));
            let (Some(question), Some(answer)) = (question.first(), answer.first()) else {
                continue;
            };
            if initially_open.is_none() && doc.has_class(*answer, "open") {
                initially_open = Some(item);
            }
            items.push(FaqItem {
                item,
                question: *question,
                answer: *answer,
            });
        }

        let mut selection = ExclusiveSelection::new(
            items.iter().map(|entry| entry.item).collect(),
            SelectionMode::AtMostOne,
        );
        selection.select(initially_open.as_ref());
        let state = FaqState { items, selection };
        for entry in &state.items {
            ctx.doc.set_attr(entry.question, "tabindex", "0");
            ctx.doc.set_attr(entry.question, "role", "button");
        }
        state.render(ctx.doc);
        Ok(state)
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
                key: Key::Enter | Key::Space,
            } => *target,
            _ => return Ok(Handled::Ignored),
        };
        let Some(item) = state.question_of(ctx.doc, target) else {
            return Ok(Handled::Ignored);
        };
        state.selection.toggle(&item);
        state.render(ctx.doc);
        Ok(Handled::Consumed)
    }
}
