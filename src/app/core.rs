use std::sync::Arc;

use crate::config::{Config, TrackerConfig};
use crate::content::SiteContent;
use crate::error::AppResult;
use crate::form::SimulatedSubmitter;
use crate::input::KeymapPreset;
use crate::interaction::{InteractionTracker, JsonFileStore, KeyValueStore, MemoryStore};
use crate::site::Scheduler;

use super::event_bus::EventBusRuntime;
use super::event_loop::run_loop;
use super::state::Browser;
use super::terminal_session::TerminalSession;

pub struct App {
    pub config: Config,
    pub content: SiteContent,
    start_page: Option<String>,
}

impl App {
    pub fn new(config: Config, content: SiteContent) -> Self {
        Self {
            config,
            content,
            start_page: None,
        }
    }

    /// Page to open first instead of the first one in the content file.
    pub fn with_start_page(mut self, page: Option<String>) -> Self {
        self.start_page = page;
        self
    }

    pub async fn run(self) -> AppResult<()> {
        let Self {
            config,
            content,
            start_page,
        } = self;

        let (tx, mut rx, mut bus) = EventBusRuntime::spawn();
        let submitter = Arc::new(SimulatedSubmitter::from_timing(&config.timing));
        let scheduler = Scheduler::new(tx, config.timing.clone(), submitter);
        let tracker = open_tracker(&config.tracker);
        let preset = KeymapPreset::parse(&config.keymap.preset);

        let mut browser = Browser::open(content, start_page.as_deref(), tracker, scheduler, preset)?
            .with_debug_status(config.ui.debug_status)
            .with_mobile_breakpoint(config.ui.mobile_breakpoint);
        let mut session = TerminalSession::enter()?;

        let result = run_loop(&mut browser, &mut session, &mut rx).await;
        bus.shutdown();
        drop(browser);
        session.restore()?;
        result
    }
}

pub(crate) fn open_tracker(config: &TrackerConfig) -> InteractionTracker {
    let store: Box<dyn KeyValueStore> = match &config.store_path {
        Some(path) => Box::new(JsonFileStore::new(path)),
        None => Box::new(MemoryStore::default()),
    };
    InteractionTracker::new(store, config.capacity)
}
