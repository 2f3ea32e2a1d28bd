mod faq;
mod tabs;

pub use faq::{Faq, FaqItem, FaqState};
pub use tabs::{EnquiryTabs, TabsState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    /// Accordion: zero or one entry open.
    AtMostOne,
    /// Tabs: exactly one entry active whenever there is any entry.
    ExactlyOne,
}

/// Which single entry of a fixed set is active.
///
/// All changes go through [`ExclusiveSelection::select`], so exclusivity
/// cannot be broken by toggling entries independently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusiveSelection<K> {
    keys: Vec<K>,
    active: Option<usize>,
    mode: SelectionMode,
}

impl<K: PartialEq> ExclusiveSelection<K> {
    pub fn new(keys: Vec<K>, mode: SelectionMode) -> Self {
        let active = match mode {
            SelectionMode::ExactlyOne if !keys.is_empty() => Some(0),
            _ => None,
        };
        Self { keys, active, mode }
    }

    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    pub fn active(&self) -> Option<&K> {
        self.active.and_then(|index| self.keys.get(index))
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn is_active(&self, key: &K) -> bool {
        self.active() == Some(key)
    }

    /// Makes `key` the active entry, or clears the selection for `None`.
    /// Unknown keys, and clearing in [`SelectionMode::ExactlyOne`], are
    /// refused. Returns whether anything changed.
    pub fn select(&mut self, key: Option<&K>) -> bool {
        let next = match key {
            Some(key) => match self.keys.iter().position(|candidate| candidate == key) {
                Some(index) => Some(index),
                None => return false,
            },
            None if self.mode == SelectionMode::ExactlyOne && !self.keys.is_empty() => {
                return false;
            }
            None => None,
        };
        if next == self.active {
            return false;
        }
        self.active = next;
        true
    }

    /// Opens `key`, or closes it when it is already the open entry.
    pub fn toggle(&mut self, key: &K) -> bool {
        if self.is_active(key) {
            self.select(None)
        } else {
            self.select(Some(key))
        }
    }
}
