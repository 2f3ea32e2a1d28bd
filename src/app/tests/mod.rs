mod browser;

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

use crate::config::TimingConfig;
use crate::content::SiteContent;
use crate::event::DomainEvent;
use crate::form::InstantSubmitter;
use crate::input::KeymapPreset;
use crate::interaction::{InteractionTracker, MemoryStore};
use crate::site::Scheduler;

use super::state::Browser;

/// A browser on one of the bundled pages, with instant submissions.
pub(super) fn open_browser(
    page: &str,
) -> (
    Browser,
    UnboundedSender<DomainEvent>,
    UnboundedReceiver<DomainEvent>,
) {
    let content = SiteContent::bundled().expect("bundled content should parse");
    let (tx, rx) = unbounded_channel();
    let scheduler = Scheduler::new(
        tx.clone(),
        TimingConfig::default(),
        Arc::new(InstantSubmitter::accepting()),
    );
    let tracker = InteractionTracker::new(Box::new(MemoryStore::default()), 50);
    let browser = Browser::open(content, Some(page), tracker, scheduler, KeymapPreset::Default)
        .expect("bundled page should open");
    (browser, tx, rx)
}

pub(super) fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}
