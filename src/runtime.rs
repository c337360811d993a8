use std::cell::Cell;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind};

/// Redraw/countdown cadence of the main loop
pub const TICK_RATE_MS: u64 = 100;

/// Unified event type consumed by the app runner
#[derive(Clone, Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize,
    Tick,
}

/// Source of terminal events (keyboard, resize, etc.)
pub trait AppEventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    /// Returns Ok(event) if an event arrives before the timeout, or Err(Timeout) if it expires.
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError>;
}

/// Production event source using crossterm
pub struct CrosstermEventSource {
    rx: Receiver<AppEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let evt = match event::read() {
                // key release/repeat reports would double-count keystrokes
                Ok(CtEvent::Key(key)) if key.kind == KeyEventKind::Press => AppEvent::Key(key),
                Ok(CtEvent::Resize(_, _)) => AppEvent::Resize,
                Ok(_) => continue,
                Err(e) => {
                    log::error!("Terminal event reader stopped: {e}");
                    break;
                }
            };
            if tx.send(evt).is_err() {
                break;
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl AppEventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Configurable ticker interface
pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

/// Fixed interval ticker
#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Default for FixedTicker {
    fn default() -> Self {
        Self::new(Duration::from_millis(TICK_RATE_MS))
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Test event source for unit tests
pub struct TestEventSource {
    rx: Receiver<AppEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<AppEvent>) -> Self {
        Self { rx }
    }
}

impl AppEventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Runner that advances the application one event/tick at a time.
///
/// Ticks are scheduled against a fixed deadline, so a steady stream of key
/// events cannot postpone them.
pub struct Runner<E: AppEventSource, T: Ticker> {
    event_source: E,
    ticker: T,
    next_tick: Cell<Instant>,
}

impl<E: AppEventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        let next_tick = Cell::new(Instant::now() + ticker.interval());
        Self {
            event_source,
            ticker,
            next_tick,
        }
    }

    /// Blocks until the next event or the next tick deadline, whichever comes first
    pub fn step(&self) -> AppEvent {
        let now = Instant::now();
        let due = self.next_tick.get();
        if now >= due {
            return self.tick(now);
        }

        match self.event_source.recv_timeout(due - now) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) => self.tick(Instant::now()),
            Err(RecvTimeoutError::Disconnected) => {
                // nothing more will arrive; keep ticking at the configured pace
                std::thread::sleep(due.saturating_duration_since(Instant::now()));
                self.tick(Instant::now())
            }
        }
    }

    fn tick(&self, now: Instant) -> AppEvent {
        let mut next = self.next_tick.get() + self.ticker.interval();
        if next <= now {
            // fell behind, don't burst-fire the missed ticks
            next = now + self.ticker.interval();
        }
        self.next_tick.set(next);
        AppEvent::Tick
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};
    use std::sync::mpsc;

    #[test]
    fn step_returns_tick_on_timeout() {
        let (_tx, rx) = mpsc::channel();
        let es = TestEventSource::new(rx);
        let ticker = FixedTicker::new(Duration::from_millis(1));
        let runner = Runner::new(es, ticker);

        // With no events available, step should yield Tick
        let ev = runner.step();
        match ev {
            AppEvent::Tick => {}
            _ => panic!("expected Tick on timeout"),
        }
    }

    #[test]
    fn step_passes_through_events() {
        let (tx, rx) = mpsc::channel();
        tx.send(AppEvent::Resize).unwrap();
        let es = TestEventSource::new(rx);
        let ticker = FixedTicker::new(Duration::from_millis(50));
        let runner = Runner::new(es, ticker);

        match runner.step() {
            AppEvent::Resize => {}
            _ => panic!("expected Resize event"),
        }
    }

    #[test]
    fn tick_is_not_starved_by_a_key_flood() {
        let (tx, rx) = mpsc::channel();
        for _ in 0..10_000 {
            tx.send(AppEvent::Key(KeyEvent::new(
                KeyCode::Char('a'),
                KeyModifiers::NONE,
            )))
            .unwrap();
        }
        let es = TestEventSource::new(rx);
        let runner = Runner::new(es, FixedTicker::new(Duration::from_millis(5)));

        let started = Instant::now();
        let mut saw_tick = false;
        while started.elapsed() < Duration::from_secs(2) {
            if let AppEvent::Tick = runner.step() {
                saw_tick = true;
                break;
            }
            std::thread::sleep(Duration::from_micros(50));
        }
        assert!(saw_tick, "expected a tick while keys were still queued");
    }

    #[test]
    fn disconnected_source_keeps_ticking() {
        let (tx, rx) = mpsc::channel::<AppEvent>();
        drop(tx);
        let runner = Runner::new(
            TestEventSource::new(rx),
            FixedTicker::new(Duration::from_millis(1)),
        );

        for _ in 0..3 {
            assert!(matches!(runner.step(), AppEvent::Tick));
        }
    }
}
