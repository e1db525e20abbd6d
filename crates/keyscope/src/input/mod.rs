//! Input sources for the event loop.
//!
//! A source yields one [`InputUnit`] per call: a value (normally a byte) or
//! end of input. Values above 255 are not filtered here; the event loop
//! treats them as an anomaly.
//!
//! - [`TerminalInput`] reads stdin one byte at a time.
//! - [`ScriptedInput`] replays a fixed script, for tests and tooling.

mod tty;

pub use tty::{TerminalInput, DEFAULT_ESCAPE_TIMEOUT, POLL_SLICE};

use crate::error::KeyscopeResult;
use std::collections::VecDeque;

/// One read from an input source.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputUnit {
    /// A value from the source; bytes are `0..=255`.
    Unit(u32),
    /// The source is exhausted, timed out, or was cancelled.
    EndOfInput,
}

/// Something the event loop can pull input units from.
pub trait InputSource {
    /// Read the next unit.
    ///
    /// With `timed` set the source waits at most its escape timeout and
    /// reports [`InputUnit::EndOfInput`] when nothing arrives; otherwise it
    /// blocks until input, end of input, or cancellation.
    fn next_unit(&mut self, timed: bool) -> KeyscopeResult<InputUnit>;
}

impl<S: InputSource + ?Sized> InputSource for &mut S {
    fn next_unit(&mut self, timed: bool) -> KeyscopeResult<InputUnit> {
        (**self).next_unit(timed)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ScriptStep {
    Unit(u32),
    Gap,
}

/// Replays a scripted sequence of units.
///
/// A gap stands for a pause longer than the escape timeout: a timed read
/// stops there with end of input, an untimed read skips over it.
#[derive(Clone, Debug, Default)]
pub struct ScriptedInput {
    steps: VecDeque<ScriptStep>,
    reads: usize,
    timed_reads: usize,
}

impl ScriptedInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append raw bytes.
    #[must_use]
    pub fn bytes(mut self, bytes: &[u8]) -> Self {
        self.steps
            .extend(bytes.iter().map(|byte| ScriptStep::Unit(u32::from(*byte))));
        self
    }

    /// Append an arbitrary unit, including out-of-range values.
    #[must_use]
    pub fn unit(mut self, value: u32) -> Self {
        self.steps.push_back(ScriptStep::Unit(value));
        self
    }

    /// Append a pause longer than any escape timeout.
    #[must_use]
    pub fn gap(mut self) -> Self {
        self.steps.push_back(ScriptStep::Gap);
        self
    }

    /// Units not yet consumed.
    pub fn remaining(&self) -> usize {
        self.steps
            .iter()
            .filter(|step| matches!(step, ScriptStep::Unit(_)))
            .count()
    }

    /// Total calls to [`InputSource::next_unit`].
    pub fn reads(&self) -> usize {
        self.reads
    }

    /// Calls made with `timed` set.
    pub fn timed_reads(&self) -> usize {
        self.timed_reads
    }
}

impl InputSource for ScriptedInput {
    fn next_unit(&mut self, timed: bool) -> KeyscopeResult<InputUnit> {
        self.reads += 1;
        if timed {
            self.timed_reads += 1;
        }
        while let Some(step) = self.steps.pop_front() {
            match step {
                ScriptStep::Unit(value) => return Ok(InputUnit::Unit(value)),
                ScriptStep::Gap if timed => return Ok(InputUnit::EndOfInput),
                ScriptStep::Gap => {}
            }
        }
        Ok(InputUnit::EndOfInput)
    }
}
