pub mod keymap;

pub use keymap::{Command, KeymapPreset, Mode, map_key};
