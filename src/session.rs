use std::time::{Duration, Instant};

use crate::keys::AllowedKeys;
use crate::metrics::{compute_metrics, Metrics, MetricsInput};
use crate::quote::Quote;
use crate::scoring::{KeyResult, Scoring};
use crate::store::{self, ScoreStore};

/// More accumulated errors than this ends the test.
pub const ERROR_CEILING: u64 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum SessionPhase {
    NotStarted,
    Running,
    Ended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum EndReason {
    Timeout,
    Completed,
    ErrorCeiling,
}

/// Whole-second countdown towards a deadline.
///
/// Armed exactly while the session is running; ticks that arrive while it
/// is disarmed are dropped.
#[derive(Debug, Clone)]
pub struct Countdown {
    total_secs: u64,
    remaining_secs: u64,
    deadline: Option<Instant>,
}

impl Countdown {
    pub fn new(total_secs: u64) -> Self {
        Self {
            total_secs,
            remaining_secs: total_secs,
            deadline: None,
        }
    }

    pub fn arm(&mut self, now: Instant) {
        self.remaining_secs = self.total_secs;
        self.deadline = Some(now + Duration::from_secs(self.total_secs));
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Recompute the seconds left. Returns `Some(remaining)` when armed.
    pub fn tick(&mut self, now: Instant) -> Option<u64> {
        let deadline = self.deadline?;
        let left = deadline.saturating_duration_since(now);
        self.remaining_secs = left.as_secs_f64().round() as u64;
        Some(self.remaining_secs)
    }

    pub fn total_secs(&self) -> u64 {
        self.total_secs
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }
}

/// One typing test: a quote, its scoring state and the countdown, plus the
/// store the final score goes to.
pub struct Session {
    quote: Quote,
    target: Vec<char>,
    allowed: AllowedKeys,
    phase: SessionPhase,
    end_reason: Option<EndReason>,
    countdown: Countdown,
    scoring: Scoring,
    metrics: Metrics,
    last_score: u64,
    store: Box<dyn ScoreStore>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("quote", &self.quote)
            .field("phase", &self.phase)
            .field("end_reason", &self.end_reason)
            .field("countdown", &self.countdown)
            .field("scoring", &self.scoring)
            .field("metrics", &self.metrics)
            .field("last_score", &self.last_score)
            .finish_non_exhaustive()
    }
}

impl Session {
    pub fn new(quote: Quote, duration_secs: u64, store: Box<dyn ScoreStore>) -> Self {
        let last_score = store::last_score(store.as_ref());
        let target: Vec<char> = quote.text.chars().collect();
        // typographic characters in the quote must be scoreable too
        let allowed = AllowedKeys::with_extra(target.iter().copied().filter(|c| !c.is_ascii()));

        Self {
            quote,
            target,
            allowed,
            phase: SessionPhase::NotStarted,
            end_reason: None,
            countdown: Countdown::new(duration_secs),
            scoring: Scoring::new(),
            metrics: Metrics::default(),
            last_score,
            store,
        }
    }

    /// Throw this session away and set up a fresh one for `quote`, keeping
    /// the store and duration.
    pub fn reload(&mut self, quote: Quote) {
        let duration = self.countdown.total_secs();
        let store = std::mem::replace(
            &mut self.store,
            Box::new(crate::store::MemoryScoreStore::new()),
        );
        *self = Session::new(quote, duration, store);
        log::debug!("Session reloaded, last score {}", self.last_score);
    }

    /// NotStarted -> Running. Returns false if the session was not waiting to
    /// start.
    pub fn start(&mut self, now: Instant) -> bool {
        if self.phase != SessionPhase::NotStarted {
            return false;
        }
        self.phase = SessionPhase::Running;
        self.countdown.arm(now);
        log::info!(
            "Session started: {} chars, {}s",
            self.target.len(),
            self.countdown.total_secs()
        );
        true
    }

    pub fn on_tick(&mut self, now: Instant) {
        if self.phase != SessionPhase::Running {
            return;
        }
        if let Some(0) = self.countdown.tick(now) {
            self.end(EndReason::Timeout);
        }
    }

    /// Score one keystroke. Keystrokes outside a running session are ignored.
    pub fn write(&mut self, key: char) -> KeyResult {
        if self.phase != SessionPhase::Running {
            return KeyResult::Ignored;
        }

        let last_position = self.scoring.index + 1 == self.target.len();
        let result = self.scoring.apply_key(&self.target, key, &self.allowed);

        if let Some(metrics) = compute_metrics(&self.metrics_input()) {
            self.metrics = metrics;
        }
        if result == KeyResult::Ignored {
            return result;
        }

        // any scored keystroke on the final character finishes the quote
        if last_position {
            self.end(EndReason::Completed);
        } else if self.scoring.error_count > ERROR_CEILING {
            self.end(EndReason::ErrorCeiling);
        }
        result
    }

    /// Running -> Ended, persisting the current WPM. Further calls do nothing.
    pub fn end(&mut self, reason: EndReason) -> bool {
        if self.phase != SessionPhase::Running {
            return false;
        }
        self.phase = SessionPhase::Ended;
        self.end_reason = Some(reason);
        self.countdown.cancel();

        log::info!(
            "Session ended ({reason}): {} wpm, {} cpm, {} errors, {}% accuracy",
            self.metrics.wpm,
            self.metrics.cpm,
            self.scoring.error_count,
            self.metrics.accuracy
        );
        if let Err(e) = store::save_score(self.store.as_mut(), self.metrics.wpm) {
            log::warn!("Could not save score: {e}");
        }
        true
    }

    fn metrics_input(&self) -> MetricsInput {
        MetricsInput {
            index: self.scoring.index,
            correct_count: self.scoring.correct_count,
            error_count: self.scoring.error_count,
            total_secs: self.countdown.total_secs(),
            remaining_secs: self.countdown.remaining_secs(),
        }
    }

    pub fn quote(&self) -> &Quote {
        &self.quote
    }

    pub fn target(&self) -> &[char] {
        &self.target
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn end_reason(&self) -> Option<EndReason> {
        self.end_reason
    }

    pub fn scoring(&self) -> &Scoring {
        &self.scoring
    }

    pub fn metrics(&self) -> Metrics {
        self.metrics
    }

    pub fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    pub fn last_score(&self) -> u64 {
        self.last_score
    }

    pub fn store(&self) -> &dyn ScoreStore {
        self.store.as_ref()
    }
}
