/// Metrics stay at their previous values until the cursor has moved past this
/// many characters.
pub const METRICS_MIN_INDEX: usize = 5;

/// Divisor turning correct characters into words over the default 300 second
/// baseline.
pub const WPM_DIVISOR: f64 = 36.0;

/// Everything `compute_metrics` needs, captured after a keystroke was scored
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricsInput {
    pub index: usize,
    pub correct_count: u64,
    pub error_count: u64,
    pub total_secs: u64,
    pub remaining_secs: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Metrics {
    /// Percentage; negative once errors outnumber typed characters.
    pub accuracy: i64,
    pub cpm: u64,
    pub wpm: u64,
}

/// Fraction of the configured duration already spent, in `[0, 1]`.
pub fn time_fraction(total_secs: u64, remaining_secs: u64) -> f64 {
    if total_secs == 0 {
        return 0.0;
    }
    total_secs.saturating_sub(remaining_secs) as f64 / total_secs as f64
}

/// Returns `None` while `index <= METRICS_MIN_INDEX`; callers keep the
/// previous metrics in that case.
pub fn compute_metrics(input: &MetricsInput) -> Option<Metrics> {
    if input.index <= METRICS_MIN_INDEX {
        return None;
    }

    let index = input.index as f64;
    let accuracy = (((index - input.error_count as f64) / index) * 100.0).floor() as i64;

    let fraction = time_fraction(input.total_secs, input.remaining_secs);
    let wpm = if fraction > 0.0 {
        (input.correct_count as f64 / WPM_DIVISOR / fraction).round() as u64
    } else {
        0
    };

    Some(Metrics {
        accuracy,
        cpm: input.correct_count,
        wpm,
    })
}

/// Colour band of a WPM score
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum WpmBand {
    Unscored,
    Slow,
    Steady,
    Good,
    Fast,
    Blazing,
}

impl WpmBand {
    pub fn of(wpm: u64) -> Self {
        match wpm {
            0 => WpmBand::Unscored,
            1..=19 => WpmBand::Slow,
            20..=39 => WpmBand::Steady,
            40..=59 => WpmBand::Good,
            60..=79 => WpmBand::Fast,
            _ => WpmBand::Blazing,
        }
    }
}
