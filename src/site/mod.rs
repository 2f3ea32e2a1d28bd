mod context;
mod core;
mod feature;
mod host;

#[cfg(test)]
pub(crate) mod test_support;
#[cfg(test)]
mod tests;

pub(crate) use context::{PageContext, Scheduler};
pub(crate) use core::{Site, overlay_surface};
pub(crate) use feature::{Feature, Handled};
