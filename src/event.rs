use crossterm::event::Event;

use crate::dom::ElementId;
use crate::error::AppResult;
use crate::form::SubmissionReceipt;
use crate::search::SearchId;

/// Keys the interaction layer reacts to. Everything else arrives as text
/// through [`UiEvent::Input`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Enter,
    Space,
    ArrowLeft,
    ArrowRight,
    Char(char),
}

/// Browser-style events delivered to the page features.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    Click { target: ElementId },
    KeyDown { target: Option<ElementId>, key: Key },
    Input { target: ElementId, value: String },
    Blur { target: ElementId },
    Submit { form: ElementId },
    ImageError { target: ElementId },
    /// The element scrolled into view for the first time.
    Revealed { target: ElementId },
}

#[derive(Debug)]
pub(crate) enum DomainEvent {
    Input(Event),
    InputError(String),
    Ui(UiEvent),
    SearchDue {
        search: SearchId,
        generation: u64,
    },
    SubmissionFinished {
        form: ElementId,
        generation: u64,
        result: AppResult<SubmissionReceipt>,
    },
    StatsTick,
    Wake,
}
