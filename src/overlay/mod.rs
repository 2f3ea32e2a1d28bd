mod gallery;
mod host;
mod lightbox;
mod modal;

pub use gallery::{Gallery, collect_images, gallery_images};
pub use host::{OverlayHost, OverlayKind};
pub use lightbox::{LightboxImage, LightboxState, wrap_index};
pub use modal::{DEFAULT_TITLE, ModalBlock, ModalContent, ModalState};
