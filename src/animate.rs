use std::time::Duration;

use tokio::task::JoinHandle;

use crate::dom::{Document, ElementId, Selector};
use crate::error::AppResult;
use crate::event::{DomainEvent, UiEvent};
use crate::site::{Feature, Handled, PageContext};

pub const ANIMATE_CLASS: &str = "animate";
pub const STATS_SECTION_CLASS: &str = "stats-section";
pub const STAT_NUMBER_CLASS: &str = "stat-number";

/// `1234567` → `"1,234,567"`.
pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Splits `"1,500+"` into `(1500, "+")`. `None` when the text does not start
/// with a number.
pub fn parse_count(text: &str) -> Option<(u64, &str)> {
    let text = text.trim();
    let end = text
        .char_indices()
        .find(|(_, ch)| !(ch.is_ascii_digit() || *ch == ','))
        .map_or(text.len(), |(index, _)| index);
    let digits: String = text[..end].chars().filter(char::is_ascii_digit).collect();
    let value = digits.parse().ok()?;
    Some((value, &text[end..]))
}

/// Count-up animation of one `.stat-number`.
#[derive(Debug, Clone, PartialEq)]
pub struct StatCounter {
    element: ElementId,
    target: u64,
    suffix: String,
    current: f64,
    increment: f64,
}

impl StatCounter {
    pub fn new(
        element: ElementId,
        target: u64,
        suffix: impl Into<String>,
        duration: Duration,
        tick: Duration,
    ) -> Self {
        let steps = (duration.as_secs_f64() / tick.as_secs_f64().max(f64::EPSILON)).max(1.0);
        Self {
            element,
            target,
            suffix: suffix.into(),
            current: 0.0,
            increment: target as f64 / steps,
        }
    }

    pub fn element(&self) -> ElementId {
        self.element
    }

    pub fn is_done(&self) -> bool {
        self.current >= self.target as f64
    }

    pub fn value(&self) -> u64 {
        (self.current.floor() as u64).min(self.target)
    }

    pub fn label(&self) -> String {
        format!("{}{}", format_thousands(self.value()), self.suffix)
    }

    /// Advances one tick; the last step lands exactly on the target.
    pub fn step(&mut self) -> bool {
        if self.is_done() {
            return false;
        }
        self.current += self.increment;
        if self.current >= self.target as f64 || self.increment <= 0.0 {
            self.current = self.target as f64;
        }
        true
    }
}

/// `[data-animate]` reveal classes and the stats count-up.
pub struct Reveal;

#[derive(Debug, Default)]
pub struct RevealState {
    counters: Vec<StatCounter>,
    stats_started: bool,
    ticker: Option<JoinHandle<()>>,
}

impl RevealState {
    pub fn counters(&self) -> &[StatCounter] {
        &self.counters
    }

    pub fn is_counting(&self) -> bool {
        self.counters.iter().any(|counter| !counter.is_done())
    }

    fn start_stats(&mut self, ctx: &mut PageContext<'_>) {
        if self.stats_started {
            return;
        }
        self.stats_started = true;
        let timing = ctx.scheduler.timing().clone();
        for element in ctx.doc.query_all(&Selector::class(STAT_NUMBER_CLASS)) {
            let text = ctx.doc.text_content(element);
            let Some((target, suffix)) = parse_count(&text) else {
                continue;
            };
            let counter = StatCounter::new(
                element,
                target,
                suffix,
                timing.stats_duration(),
                timing.stats_tick(),
            );
            ctx.doc.set_text(element, &counter.label());
            self.counters.push(counter);
        }
        self.schedule_tick(ctx);
    }

    fn schedule_tick(&mut self, ctx: &PageContext<'_>) {
        if !self.is_counting() {
            self.ticker = None;
            return;
        }
        let tick = ctx.scheduler.timing().stats_tick();
        self.ticker = Some(ctx.scheduler.send_after(tick, DomainEvent::StatsTick));
    }

    /// Advances every running counter by one tick.
    pub(crate) fn tick(&mut self, ctx: &mut PageContext<'_>) -> bool {
        let mut changed = false;
        for counter in &mut self.counters {
            if counter.step() {
                ctx.doc.set_text(counter.element(), &counter.label());
                changed = true;
            }
        }
        self.schedule_tick(ctx);
        changed
    }

    pub fn stop(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }
}

impl Drop for RevealState {
    fn drop(&mut self) {
        self.stop();
    }
}

impl Feature for Reveal {
    type State = RevealState;

    const NAME: &'static str = "reveal";

    fn mount(ctx: &mut PageContext<'_>) -> AppResult<Self::State> {
        let _ = ctx;
        Ok(RevealState::default())
    }

    fn handle_ui(
        state: &mut Self::State,
        event: &UiEvent,
        ctx: &mut PageContext<'_>,
    ) -> AppResult<Handled> {
        let UiEvent::Revealed { target } = event else {
            return Ok(Handled::Ignored);
        };
        if ctx.doc.attr(*target, "data-animate").is_none()
            || ctx.doc.has_class(*target, ANIMATE_CLASS)
        {
            return Ok(Handled::Ignored);
        }
        ctx.doc.add_class(*target, ANIMATE_CLASS);
        if ctx.doc.has_class(*target, STATS_SECTION_CLASS) {
            state.start_stats(ctx);
        }
        Ok(Handled::Ignored)
    }
}
