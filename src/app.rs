use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::Instant;

use crate::quote::QuoteSource;
use crate::session::{Session, SessionPhase};
use crate::store::ScoreStore;

/// What the main loop should do after an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Continue,
    Quit,
}

pub struct App {
    quotes: Box<dyn QuoteSource>,
    pub session: Session,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl App {
    pub fn new(
        quotes: Box<dyn QuoteSource>,
        duration_secs: u64,
        store: Box<dyn ScoreStore>,
    ) -> Self {
        let session = Session::new(quotes.random(), duration_secs, store);
        Self { quotes, session }
    }

    pub fn on_tick(&mut self, now: Instant) {
        self.session.on_tick(now);
    }

    pub fn on_key(&mut self, key: KeyEvent, now: Instant) -> Action {
        if key.code == KeyCode::Esc
            || (key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c'))
        {
            return Action::Quit;
        }

        match self.session.phase() {
            SessionPhase::NotStarted => {
                if key.code == KeyCode::Enter {
                    self.session.start(now);
                }
            }
            SessionPhase::Running => {
                // keep the countdown current before scoring against it
                self.session.on_tick(now);
                if let Some(c) = typed_char(&key) {
                    self.session.write(c);
                }
            }
            SessionPhase::Ended => {
                if matches!(key.code, KeyCode::Char('r') | KeyCode::Char('R')) {
                    self.session.reload(self.quotes.random());
                }
            }
        }
        Action::Continue
    }
}

/// The character a key event types, if any. Chords with Ctrl/Alt type nothing.
fn typed_char(key: &KeyEvent) -> Option<char> {
    if key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
    {
        return None;
    }
    match key.code {
        KeyCode::Char(c) => Some(c),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quote::Quote;
    use crate::store::MemoryScoreStore;
    use std::time::Duration;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app(text: &str) -> App {
        App::new(
            Box::new(Quote::new(text, "author").unwrap()),
            300,
            Box::new(MemoryScoreStore::new()),
        )
    }

    #[test]
    fn enter_starts_the_test() {
        let mut app = app("abc");
        let now = Instant::now();

        app.on_key(key(KeyCode::Char('a')), now);
        assert_eq!(app.session.phase(), SessionPhase::NotStarted);

        app.on_key(key(KeyCode::Enter), now);
        assert_eq!(app.session.phase(), SessionPhase::Running);
    }

    #[test]
    fn typing_completes_and_r_reloads() {
        let mut app = app("hi");
        let now = Instant::now();
        app.on_key(key(KeyCode::Enter), now);
        app.on_key(key(KeyCode::Char('h')), now);
        app.on_key(key(KeyCode::Char('i')), now);
        assert_eq!(app.session.phase(), SessionPhase::Ended);

        app.on_key(key(KeyCode::Char('r')), now);
        assert_eq!(app.session.phase(), SessionPhase::NotStarted);
        assert_eq!(app.session.quote().text, "hi");
    }

    #[test]
    fn backspace_and_other_non_char_keys_are_ignored() {
        let mut app = app("abc");
        let now = Instant::now();
        app.on_key(key(KeyCode::Enter), now);
        app.on_key(key(KeyCode::Char('x')), now);

        for code in [KeyCode::Backspace, KeyCode::Tab, KeyCode::Left, KeyCode::Enter] {
            app.on_key(key(code), now);
        }
        assert_eq!(app.session.scoring().error_count, 1);
        assert_eq!(app.session.scoring().transcript.len(), 1);
    }

    #[test]
    fn ctrl_chords_are_not_typed() {
        let mut app = app("abc");
        let now = Instant::now();
        app.on_key(key(KeyCode::Enter), now);
        let action = app.on_key(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::ALT), now);
        assert_eq!(action, Action::Continue);
        assert_eq!(app.session.scoring().index, 0);
    }

    #[test]
    fn shifted_chars_are_typed() {
        let mut app = app("Ab");
        let now = Instant::now();
        app.on_key(key(KeyCode::Enter), now);
        app.on_key(KeyEvent::new(KeyCode::Char('A'), KeyModifiers::SHIFT), now);
        assert_eq!(app.session.scoring().index, 1);
    }

    #[test]
    fn esc_and_ctrl_c_quit_without_ending() {
        let mut app = app("abc");
        let now = Instant::now();
        app.on_key(key(KeyCode::Enter), now);

        assert_eq!(app.on_key(key(KeyCode::Esc), now), Action::Quit);
        assert_eq!(
            app.on_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL), now),
            Action::Quit
        );
        assert_eq!(app.session.phase(), SessionPhase::Running);
    }

    #[test]
    fn late_keystroke_catches_up_with_the_timer() {
        let mut app = app("abcdefgh");
        let t0 = Instant::now();
        app.on_key(key(KeyCode::Enter), t0);

        app.on_key(key(KeyCode::Char('a')), t0 + Duration::from_secs(301));
        assert_eq!(app.session.phase(), SessionPhase::Ended);
        assert_eq!(app.session.scoring().index, 0);
    }
}
