
use std::sync::Arc;

use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};

use super::{Scheduler, Site};
use crate::config::TimingConfig;
use crate::content::SiteContent;
use crate::dom::{Document, ElementId, Selector};
use crate::event::{DomainEvent, Key, UiEvent};
use crate::form::{InstantSubmitter, Submitter};
use crate::interaction::{InteractionTracker, MemoryStore};

fn bundled_page(name: &str) -> Box<dyn Document> {
    let content = SiteContent::bundled().expect("bundled content should parse");
    let page = content
        .page(name)
        .unwrap_or_else(|| panic!("bundled page {name} should exist"));
    Box::new(content.build_document(page).expect("bundled page should build"))
}

fn load(name: &str) -> (Site, UnboundedReceiver<DomainEvent>) {
    load_with(
        name,
        InteractionTracker::new(Box::new(MemoryStore::default()), 50),
        Arc::new(InstantSubmitter::accepting()),
    )
}

fn load_with(
    name: &str,
    tracker: InteractionTracker,
    submitter: Arc<dyn Submitter>,
) -> (Site, UnboundedReceiver<DomainEvent>) {
    let (tx, rx) = unbounded_channel();
    let scheduler = Scheduler::new(tx, TimingConfig::default(), submitter);
    (Site::load(bundled_page(name), tracker, scheduler), rx)
}

fn by_id(site: &Site, id: &str) -> ElementId {
    site.document()
        .query(&Selector::id(id))
        .unwrap_or_else(|| panic!("#{id} should exist"))
}

fn click(site: &mut Site, target: ElementId) {
    site.dispatch(UiEvent::Click { target });
}

fn press(site: &mut Site, key: Key) {
    let target = site.document().active_element();
    site.dispatch(UiEvent::KeyDown { target, key });
}

fn fill(site: &mut Site, id: &str, value: &str) {
    let target = by_id(site, id);
    site.dispatch(UiEvent::Input {
        target,
        value: value.to_string(),
    });
}

/// Feeds every queued loop event back to the page. Returns how many changed it.
fn drain(site: &mut Site, rx: &mut UnboundedReceiver<DomainEvent>) -> usize {
    let mut changed = 0;
    while let Ok(event) = rx.try_recv() {
        if site.handle_domain(event) {
            changed += 1;
        }
    }
    changed
}
