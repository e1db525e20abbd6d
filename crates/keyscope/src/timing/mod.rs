//! Inter-byte timing.
//!
//! [`TimingTracker`] remembers the instant of the previous byte and turns the
//! gap into an [`Elapsed`] measurement. Gaps of a second or more are shown as
//! a blank field: they are idle time, not part of a key sequence.

use std::fmt;
use std::time::{Duration, Instant};

/// Gap after which a blank line separates bursts of input.
pub const PAUSE_THRESHOLD: Duration = Duration::from_millis(200);

/// Gap at or above which the delay is not printed.
pub const IDLE_THRESHOLD: Duration = Duration::from_secs(1);

/// Width of the delay column, shared by the numeric and blank renderings.
pub const DELAY_FIELD_WIDTH: usize = 14;

/// Delay measured for one byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Elapsed {
    /// Microseconds since the previous byte, `None` for the first byte.
    pub delay_us: Option<u64>,
    /// A long pause followed at least one earlier byte.
    pub pause: bool,
}

impl Elapsed {
    /// The measurement for the first byte of a session.
    pub fn first() -> Self {
        Self {
            delay_us: None,
            pause: false,
        }
    }

    /// Measurement for a byte that follows another one by `delay_us`.
    pub fn after(delay_us: u64) -> Self {
        Self {
            delay_us: Some(delay_us),
            pause: delay_us >= micros(PAUSE_THRESHOLD),
        }
    }

    /// Delay column for this measurement.
    pub fn field(&self) -> DelayField {
        match self.delay_us {
            Some(us) if us < micros(IDLE_THRESHOLD) => DelayField::Micros(us),
            _ => DelayField::Blank,
        }
    }
}

/// Rendered delay column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DelayField {
    /// `( 12.345 ms)  `
    Micros(u64),
    /// Fixed-width run of spaces.
    Blank,
}

impl fmt::Display for DelayField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Micros(us) => write!(f, "({:3}.{:03} ms)  ", us / 1000, us % 1000),
            Self::Blank => write!(f, "{:width$}", "", width = DELAY_FIELD_WIDTH),
        }
    }
}

/// Tracks the timestamp of the previous input byte.
#[derive(Debug, Default)]
pub struct TimingTracker {
    last: Option<Instant>,
}

impl TimingTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Measure the gap since the previous byte and remember `now`.
    pub fn observe(&mut self, now: Instant) -> Elapsed {
        let elapsed = match self.last {
            Some(prev) => Elapsed::after(micros(now.saturating_duration_since(prev))),
            None => Elapsed::first(),
        };
        self.last = Some(now);
        elapsed
    }
}

fn micros(duration: Duration) -> u64 {
    u64::try_from(duration.as_micros()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::indexing_slicing)]

    use super::*;

    #[test]
    fn first_byte_has_blank_field_and_no_pause() {
        let mut tracker = TimingTracker::new();
        let elapsed = tracker.observe(Instant::now());
        assert_eq!(elapsed, Elapsed::first());
        assert_eq!(elapsed.field(), DelayField::Blank);
    }

    #[test]
    fn second_byte_measures_gap() {
        let mut tracker = TimingTracker::new();
        let start = Instant::now();
        tracker.observe(start);
        let elapsed = tracker.observe(start + Duration::from_micros(12_345));
        assert_eq!(elapsed.delay_us, Some(12_345));
        assert!(!elapsed.pause);
        assert_eq!(elapsed.field().to_string(), "( 12.345 ms)  ");
    }

    #[test]
    fn idle_boundary_is_one_second() {
        assert_eq!(Elapsed::after(999_999).field(), DelayField::Micros(999_999));
        assert_eq!(
            Elapsed::after(999_999).field().to_string(),
            "(999.999 ms)  "
        );
        assert_eq!(Elapsed::after(1_000_000).field(), DelayField::Blank);
        assert_eq!(Elapsed::after(5_000_000).field(), DelayField::Blank);
    }

    #[test]
    fn blank_field_matches_numeric_width() {
        let blank = DelayField::Blank.to_string();
        assert_eq!(blank.len(), DELAY_FIELD_WIDTH);
        assert!(blank.chars().all(|c| c == ' '));
        assert_eq!(DelayField::Micros(7).to_string().len(), DELAY_FIELD_WIDTH);
    }

    #[test]
    fn pause_threshold_is_inclusive() {
        assert!(!Elapsed::after(199_999).pause);
        assert!(Elapsed::after(200_000).pause);
        assert!(Elapsed::after(2_000_000).pause);
    }

    #[test]
    fn tracker_updates_timestamp_every_call() {
        let mut tracker = TimingTracker::new();
        let start = Instant::now();
        tracker.observe(start);
        tracker.observe(start + Duration::from_millis(500));
        let elapsed = tracker.observe(start + Duration::from_millis(510));
        assert_eq!(elapsed.delay_us, Some(10_000));
        assert!(!elapsed.pause);
    }
}
