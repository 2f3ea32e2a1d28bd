use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::TimingConfig;
use crate::dom::{Document, ElementId};
use crate::error::AppResult;
use crate::event::DomainEvent;
use crate::form::{SubmissionRequest, Submitter};
use crate::interaction::InteractionTracker;
use crate::overlay::OverlayHost;

/// Posts delayed work back onto the event loop.
///
/// Spawned tasks only ever send a [`DomainEvent`]; the state they refer to is
/// mutated when the loop handles that event.
#[derive(Clone)]
pub(crate) struct Scheduler {
    tx: UnboundedSender<DomainEvent>,
    timing: TimingConfig,
    submitter: Arc<dyn Submitter>,
}

impl Scheduler {
    pub(crate) fn new(
        tx: UnboundedSender<DomainEvent>,
        timing: TimingConfig,
        submitter: Arc<dyn Submitter>,
    ) -> Self {
        Self {
            tx,
            timing,
            submitter,
        }
    }

    pub(crate) fn timing(&self) -> &TimingConfig {
        &self.timing
    }

    pub(crate) fn send_after(&self, delay: Duration, event: DomainEvent) -> JoinHandle<()> {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(event);
        })
    }

    /// Runs the submission strategy and reports back unless `cancel` fired
    /// first.
    pub(crate) fn submit(
        &self,
        form: ElementId,
        generation: u64,
        request: SubmissionRequest,
        cancel: CancellationToken,
    ) -> JoinHandle<()> {
        let tx = self.tx.clone();
        let pending = self.submitter.submit(request, cancel.clone());
        tokio::spawn(async move {
            let result = pending.await;
            if cancel.is_cancelled() {
                return;
            }
            let _ = tx.send(DomainEvent::SubmissionFinished {
                form,
                generation,
                result,
            });
        })
    }
}

/// Everything a feature handler may touch while reacting to one event.
pub(crate) struct PageContext<'a> {
    pub doc: &'a mut dyn Document,
    pub overlays: &'a mut OverlayHost,
    pub tracker: &'a mut InteractionTracker,
    pub scheduler: &'a Scheduler,
}

impl PageContext<'_> {
    pub(crate) fn track(&mut self, kind: &str, details: &str) -> AppResult<()> {
        let page = self.doc.location_path().to_string();
        self.tracker.record(kind, details, &page)?;
        Ok(())
    }
}
