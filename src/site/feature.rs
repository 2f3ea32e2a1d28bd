use crate::error::AppResult;
use crate::event::UiEvent;

use super::context::PageContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Handled {
    Ignored,
    /// Later features do not see the event.
    Consumed,
}

/// One independently wired piece of page behaviour.
///
/// Features tolerate pages that lack their markers: `mount` then returns an
/// inert state and `handle_ui` ignores everything.
pub(crate) trait Feature {
    type State;

    const NAME: &'static str;

    fn mount(ctx: &mut PageContext<'_>) -> AppResult<Self::State>;

    fn handle_ui(
        state: &mut Self::State,
        event: &UiEvent,
        ctx: &mut PageContext<'_>,
    ) -> AppResult<Handled> {
        let _ = (state, event, ctx);
        Ok(Handled::Ignored)
    }
}
