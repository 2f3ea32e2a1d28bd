mod document;
mod memory;
mod selector;

pub use document::{Document, ElementId, ElementSpec};
pub use memory::MemoryDocument;
pub use selector::Selector;
