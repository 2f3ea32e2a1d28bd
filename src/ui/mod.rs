mod chrome;
mod layout;
mod overlay;
mod page;
mod text;

pub use chrome::{StatusInfo, draw_chrome};
pub use layout::{UiLayout, split_layout};
pub(crate) use overlay::{draw_lightbox_overlay, draw_modal_overlay};
pub(crate) use page::{PageLayout, RenderHints, draw_page, layout_page};
