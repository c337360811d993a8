use crate::keys::AllowedKeys;

#[derive(Clone, Debug, Copy, PartialEq, Eq)]
pub enum Outcome {
    Correct,
    Incorrect,
}

/// One consumed keystroke as it appears in the transcript
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TranscriptEntry {
    pub ch: char,
    pub outcome: Outcome,
}

/// What a single keystroke did to the scoring state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyResult {
    Correct,
    Incorrect,
    Ignored,
}

/// Keystroke-by-keystroke matching state against a target quote.
///
/// `index` only moves on an exact match, so mistakes never skip a character:
/// the user has to supply the expected one to make progress.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scoring {
    pub index: usize,
    pub correct_count: u64,
    pub error_count: u64,
    pub is_error: bool,
    pub transcript: Vec<TranscriptEntry>,
}

impl Scoring {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expected_char(&self, target: &[char]) -> Option<char> {
        target.get(self.index).copied()
    }

    pub fn remaining<'a>(&self, target: &'a [char]) -> &'a [char] {
        &target[self.index.min(target.len())..]
    }

    pub fn apply_key(&mut self, target: &[char], key: char, allowed: &AllowedKeys) -> KeyResult {
        if self.expected_char(target) == Some(key) {
            self.index += 1;
            self.correct_count += 1;
            self.is_error = false;
            self.transcript.push(TranscriptEntry {
                ch: key,
                outcome: Outcome::Correct,
            });
            KeyResult::Correct
        } else if allowed.contains(key) {
            self.error_count += 1;
            self.is_error = true;
            self.transcript.push(TranscriptEntry {
                ch: key,
                outcome: Outcome::Incorrect,
            });
            KeyResult::Incorrect
        } else {
            KeyResult::Ignored
        }
    }
}
