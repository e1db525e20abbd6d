//! The input event loop.
//!
//! [`KeyReader`] pulls units from an [`InputSource`] and, for each byte, runs
//! the timing tracker, the classifier and both matchers, then hands one
//! [`Report`] to a [`ReportSink`]. The loop ends on the exit phrase, end of
//! input, an out-of-range unit, or cancellation.
//!
//! ```
//! use keyscope::input::ScriptedInput;
//! use keyscope::keymap::KeyMap;
//! use keyscope::model::{Report, SessionMode, SessionOutcome};
//! use keyscope::reader::KeyReader;
//! use keyscope::session::CancellationToken;
//!
//! # fn example() -> keyscope::error::KeyscopeResult<()> {
//! let mut reader = KeyReader::new(
//!     SessionMode::Continuous,
//!     KeyMap::builtin(),
//!     CancellationToken::new(),
//! );
//! let mut input = ScriptedInput::new().bytes(b"\x1b[Aquit");
//! let mut reports: Vec<Report> = Vec::new();
//! let outcome = reader.run(&mut input, &mut reports)?;
//! assert_eq!(outcome, SessionOutcome::ExitPhrase);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

mod render;

pub use render::{render_text, Reporter};

use crate::classify::classify;
use crate::error::KeyscopeResult;
use crate::input::{InputSource, InputUnit};
use crate::keymap::SequenceTable;
use crate::matcher::{ExitPhraseMatcher, NamedSequenceMatcher};
use crate::model::{Report, SessionMode, SessionOutcome};
use crate::session::CancellationToken;
use crate::timing::TimingTracker;
use std::time::Instant;

/// Source of timestamps for the timing tracker.
pub trait Clock {
    fn now(&mut self) -> Instant;
}

/// [`Instant::now`].
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&mut self) -> Instant {
        Instant::now()
    }
}

/// Destination for session reports.
pub trait ReportSink {
    fn report(&mut self, report: &Report) -> KeyscopeResult<()>;
}

impl ReportSink for Vec<Report> {
    fn report(&mut self, report: &Report) -> KeyscopeResult<()> {
        self.push(report.clone());
        Ok(())
    }
}

impl<R: ReportSink + ?Sized> ReportSink for &mut R {
    fn report(&mut self, report: &Report) -> KeyscopeResult<()> {
        (**self).report(report)
    }
}

/// Per-session decoding state.
#[derive(Debug)]
pub struct KeyReader<T, C = SystemClock> {
    mode: SessionMode,
    timing: TimingTracker,
    exit: ExitPhraseMatcher,
    named: NamedSequenceMatcher<T>,
    clock: C,
    cancel: CancellationToken,
    first_char_seen: bool,
    bytes_read: u64,
}

impl<T: SequenceTable> KeyReader<T, SystemClock> {
    pub fn new(mode: SessionMode, table: T, cancel: CancellationToken) -> Self {
        Self::with_clock(mode, table, cancel, SystemClock)
    }
}

impl<T: SequenceTable, C: Clock> KeyReader<T, C> {
    pub fn with_clock(mode: SessionMode, table: T, cancel: CancellationToken, clock: C) -> Self {
        Self {
            mode,
            timing: TimingTracker::new(),
            exit: ExitPhraseMatcher::new(),
            named: NamedSequenceMatcher::new(table),
            clock,
            cancel,
            first_char_seen: false,
            bytes_read: 0,
        }
    }

    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    /// Bytes processed so far.
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    /// Read and report until the session ends.
    pub fn run<S, R>(&mut self, source: &mut S, sink: &mut R) -> KeyscopeResult<SessionOutcome>
    where
        S: InputSource + ?Sized,
        R: ReportSink + ?Sized,
    {
        tracing::debug!(mode = ?self.mode, "reading keys");
        loop {
            if self.cancel.is_cancelled() {
                return Ok(SessionOutcome::Cancelled);
            }
            // Only the first key of a single-shot session waits indefinitely.
            let timed = self.first_char_seen && !self.mode.is_continuous();
            let value = match source.next_unit(timed)? {
                InputUnit::Unit(value) => value,
                InputUnit::EndOfInput if self.cancel.is_cancelled() => {
                    return Ok(SessionOutcome::Cancelled)
                }
                InputUnit::EndOfInput => return Ok(SessionOutcome::EndOfInput),
            };
            let Ok(byte) = u8::try_from(value) else {
                tracing::warn!(value, "input unit outside the byte range");
                sink.report(&Report::Anomaly { value })?;
                return Ok(SessionOutcome::Anomaly { value });
            };
            if self.process_byte(byte, sink)? {
                return Ok(SessionOutcome::ExitPhrase);
            }
        }
    }

    /// Report one byte; returns true when it completes the exit phrase.
    pub fn process_byte<R>(&mut self, byte: u8, sink: &mut R) -> KeyscopeResult<bool>
    where
        R: ReportSink + ?Sized,
    {
        let elapsed = self.timing.observe(self.clock.now());
        let info = classify(byte);
        let exit = self.exit.observe(byte);
        let sequence = self.named.observe(byte);
        tracing::trace!(byte, kind = ?info.kind, sequence = ?sequence, exit, "classified byte");
        let record = info.into_record(elapsed, sequence);
        sink.report(&Report::Key(record))?;
        self.first_char_seen = true;
        self.bytes_read += 1;
        if exit {
            sink.report(&Report::ExitRequested)?;
        }
        Ok(exit)
    }
}
