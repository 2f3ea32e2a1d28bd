use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

use super::store::KeyValueStore;

pub const INTERACTIONS_KEY: &str = "userInteractions";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionEvent {
    #[serde(rename = "type")]
    pub kind: String,
    pub details: String,
    /// ISO-8601 UTC with millisecond precision, e.g. `2026-10-19T09:30:00.000Z`.
    pub timestamp: String,
    pub page: String,
}

/// Appends interaction events to a capped log kept under [`INTERACTIONS_KEY`].
pub struct InteractionTracker {
    store: Box<dyn KeyValueStore>,
    capacity: usize,
}

impl InteractionTracker {
    pub fn new(store: Box<dyn KeyValueStore>, capacity: usize) -> Self {
        Self {
            store,
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn record(&mut self, kind: &str, details: &str, page: &str) -> AppResult<InteractionEvent> {
        self.record_at(kind, details, page, Utc::now())
    }

    pub fn record_at(
        &mut self,
        kind: &str,
        details: &str,
        page: &str,
        at: DateTime<Utc>,
    ) -> AppResult<InteractionEvent> {
        tracing::info!(kind, details, page, "user interaction");

        let event = InteractionEvent {
            kind: kind.to_string(),
            details: details.to_string(),
            timestamp: at.to_rfc3339_opts(SecondsFormat::Millis, true),
            page: page.to_string(),
        };

        let mut events = self.load_or_reset();
        events.push(event.clone());
        if events.len() > self.capacity {
            let overflow = events.len() - self.capacity;
            events.drain(..overflow);
        }

        let encoded = serde_json::to_string(&events)
            .map_err(|source| AppError::serialize(INTERACTIONS_KEY, source))?;
        self.store.set(INTERACTIONS_KEY, encoded)?;
        Ok(event)
    }

    pub fn events(&self) -> AppResult<Vec<InteractionEvent>> {
        let Some(raw) = self.store.get(INTERACTIONS_KEY)? else {
            return Ok(Vec::new());
        };
        serde_json::from_str(&raw).map_err(|source| AppError::store(INTERACTIONS_KEY, source))
    }

    pub fn clear(&mut self) -> AppResult<()> {
        self.store.remove(INTERACTIONS_KEY)
    }

    fn load_or_reset(&self) -> Vec<InteractionEvent> {
        match self.events() {
            Ok(events) => events,
            Err(err) => {
                tracing::warn!(error = %err, "discarding unreadable interaction log");
                Vec::new()
            }
        }
    }
}
