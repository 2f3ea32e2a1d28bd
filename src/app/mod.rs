mod core;
mod event_bus;
mod event_loop;
mod input_ops;
mod nav;
mod render_ops;
mod state;
pub(crate) mod terminal_session;

#[cfg(test)]
mod tests;

pub use core::App;
pub(crate) use input_ops::KeyOutcome;
pub(crate) use state::{Browser, StatusState};
