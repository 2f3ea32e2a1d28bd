use crate::dom::{Document, ElementId, Selector};
use crate::error::AppResult;
use crate::event::{Key, UiEvent};
use crate::site::{Feature, Handled, PageContext};

use super::{ExclusiveSelection, SelectionMode};

#[derive(Debug, Clone, PartialEq, Eq)]
struct Tab {
    key: String,
    tab: ElementId,
    panel: Option<ElementId>,
}

/// `.enquiry-tab[data-tab]` buttons switching between `#{key}-form` panels.
pub struct EnquiryTabs;

#[derive(Debug)]
pub struct TabsState {
    tabs: Vec<Tab>,
    selection: ExclusiveSelection<String>,
}

impl Default for TabsState {
    fn default() -> Self {
        Self {
            tabs: Vec::new(),
            selection: ExclusiveSelection::new(Vec::new(), SelectionMode::ExactlyOne),
        }
    }
}

impl TabsState {
    pub fn active(&self) -> Option<&str> {
        self.selection.active().map(String::as_str)
    }

    pub fn keys(&self) -> &[String] {
        self.selection.keys()
    }

    fn render(&self, doc: &mut dyn Document) {
        for tab in &self.tabs {
            let active = self.selection.is_active(&tab.key);
            doc.toggle_class(tab.tab, "active", active);
            doc.set_attr(tab.tab, "aria-selected", if active { "true" } else { "false" });
            if let Some(panel) = tab.panel {
                doc.toggle_class(panel, "active", active);
                doc.set_hidden(panel, !active);
            }
        }
    }
}

impl Feature for EnquiryTabs {
    type State = TabsState;

    const NAME: &'static str = "enquiry-tabs";

    fn mount(ctx: &mut PageContext<'_>) -> AppResult<Self::State> {
        let doc = &*ctx.doc;
        let mut tabs: Vec<Tab> = Vec::new();
        let mut initial = None;
        for tab in doc.query_all(&Selector::class("enquiry-tab").and(Selector::has_attr("data-tab"))) {
            let Some(key) = doc.attr(tab, "data-tab") else {
                continue;
            };
            if tabs.iter().any(|known| known.key == key) {
                continue;
            }
            if initial.is_none() && doc.has_class(tab, "active") {
                initial = Some(key.clone());
            }
            let panel = doc.query(&Selector::class("enquiry-form").and(Selector::id(format!("{key}-form"))));
            tabs.push(Tab { key, tab, panel });
        }

        let mut selection = ExclusiveSelection::new(
            tabs.iter().map(|tab| tab.key.clone()).collect(),
            SelectionMode::ExactlyOne,
        );
        selection.select(initial.as_ref());
        let state = TabsState { tabs, selection };
        for tab in &state.tabs {
            ctx.doc.set_attr(tab.tab, "role", "tab");
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
        let Some(key) = state
            .tabs
            .iter()
            .find(|tab| ctx.doc.is_inside(target, tab.tab))
            .map(|tab| tab.key.clone())
        else {
            return Ok(Handled::Ignored);
        };

        state.selection.select(Some(&key));
        state.render(ctx.doc);
        ctx.track("enquiry_tab", &key)?;
        Ok(Handled::Consumed)
    }
}
