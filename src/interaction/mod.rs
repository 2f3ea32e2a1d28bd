mod store;
mod tracker;

pub use store::{JsonFileStore, KeyValueStore, MemoryStore};
pub use tracker::{INTERACTIONS_KEY, InteractionEvent, InteractionTracker};
