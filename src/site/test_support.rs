use std::sync::Arc;

use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};

use crate::config::TimingConfig;
use crate::dom::MemoryDocument;
use crate::event::DomainEvent;
use crate::form::{InstantSubmitter, Submitter};
use crate::interaction::{InteractionTracker, MemoryStore};
use crate::overlay::OverlayHost;

use super::context::{PageContext, Scheduler};

/// Loose page pieces for driving a single feature without a full [`Site`].
///
/// [`Site`]: super::Site
pub(crate) struct Harness {
    pub doc: MemoryDocument,
    pub overlays: OverlayHost,
    pub tracker: InteractionTracker,
    pub scheduler: Scheduler,
    pub rx: UnboundedReceiver<DomainEvent>,
}

impl Harness {
    pub(crate) fn new(path: &str) -> Self {
        Self::with_submitter(path, Arc::new(InstantSubmitter::accepting()))
    }

    pub(crate) fn with_submitter(path: &str, submitter: Arc<dyn Submitter>) -> Self {
        Self::with_timing(path, TimingConfig::default(), submitter)
    }

    pub(crate) fn with_timing(
        path: &str,
        timing: TimingConfig,
        submitter: Arc<dyn Submitter>,
    ) -> Self {
        let (tx, rx) = unbounded_channel();
        Self {
            doc: MemoryDocument::new(path),
            overlays: OverlayHost::default(),
            tracker: InteractionTracker::new(Box::new(MemoryStore::default()), 50),
            scheduler: Scheduler::new(tx, timing, submitter),
            rx,
        }
    }

    pub(crate) fn ctx(&mut self) -> PageContext<'_> {
        PageContext {
            doc: &mut self.doc,
            overlays: &mut self.overlays,
            tracker: &mut self.tracker,
            scheduler: &self.scheduler,
        }
    }

    /// `(type, details)` of every tracked interaction, oldest first.
    pub(crate) fn tracked(&self) -> Vec<(String, String)> {
        self.tracker
            .events()
            .expect("tracker store should be readable")
            .into_iter()
            .map(|event| (event.kind, event.details))
            .collect()
    }
}
