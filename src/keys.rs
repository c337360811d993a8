/// Set of keys whose mismatches count as scoreable errors.
///
/// Anything outside the set (control characters, non-ASCII input) is
/// silently ignored by the scoring engine. There is no correction key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowedKeys {
    extra: Vec<char>,
}

impl AllowedKeys {
    /// Allowed set extended with additional characters, e.g. for quotes
    /// containing typographic punctuation.
    pub fn with_extra<I: IntoIterator<Item = char>>(extra: I) -> Self {
        let mut extra: Vec<char> = extra.into_iter().filter(|c| !c.is_control()).collect();
        extra.sort_unstable();
        extra.dedup();
        Self { extra }
    }

    pub fn contains(&self, c: char) -> bool {
        c.is_ascii_alphanumeric()
            || c.is_ascii_punctuation()
            || c == ' '
            || self.extra.binary_search(&c).is_ok()
    }
}
