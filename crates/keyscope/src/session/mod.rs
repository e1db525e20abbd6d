//! Session lifecycle.
//!
//! A session installs the signal watcher, switches the terminal to raw mode,
//! prints the header, runs the [`KeyReader`] and then restores the terminal,
//! on every exit path: exit phrase, end of input, anomaly, signal or error.
//!
//! # Key Operations
//!
//! - [`run`] - Run a session on the process's own terminal
//! - [`run_session`] - Same lifecycle over injected parts (used by tests)

mod cancel;
pub mod raw_mode;
pub mod signals;

pub use cancel::CancellationToken;
pub use raw_mode::{RawModeGuard, TerminalModes, TtyModes, TtyState};
pub use signals::SignalWatcher;

use crate::diagnostics;
use crate::error::KeyscopeResult;
use crate::input::{InputSource, TerminalInput, DEFAULT_ESCAPE_TIMEOUT};
use crate::keymap::{KeyMap, SequenceTable};
use crate::model::{OutputFormat, Report, SessionMode, SessionOutcome};
use crate::reader::{Clock, KeyReader, ReportSink, Reporter};
use std::io::{self, IsTerminal};
use std::time::Duration;

/// Settings for one session, fixed at startup.
#[derive(Clone, Debug)]
pub struct SessionConfig {
    pub mode: SessionMode,
    pub format: OutputFormat,
    /// How long single mode waits for the rest of a key sequence.
    pub escape_timeout: Duration,
    pub keymap: KeyMap,
    /// Backtrace frames logged with anomalies and errors at trace level.
    pub backtrace_frames: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            mode: SessionMode::Single,
            format: OutputFormat::Text,
            escape_timeout: DEFAULT_ESCAPE_TIMEOUT,
            keymap: KeyMap::builtin(),
            backtrace_frames: 0,
        }
    }
}

/// Run a session on stdin/stdout.
///
/// When stdin is not a terminal the bytes are still read and reported, just
/// without touching terminal modes.
pub fn run(config: SessionConfig) -> KeyscopeResult<SessionOutcome> {
    let SessionConfig {
        mode,
        format,
        escape_timeout,
        keymap,
        backtrace_frames,
    } = config;

    let cancel = CancellationToken::new();
    let watcher = SignalWatcher::spawn(cancel.clone(), format)?;
    let modes = if io::stdin().is_terminal() {
        Some(TtyModes::stdin()?)
    } else {
        tracing::warn!("stdin is not a terminal; reading without raw mode");
        None
    };
    let mut source = TerminalInput::stdin(escape_timeout, cancel.clone())?;
    let mut reporter = Reporter::new(io::stdout(), format);
    let reader = KeyReader::new(mode, keymap, cancel);

    let result = run_session(modes, reader, &mut source, &mut reporter);
    watcher.close();

    match &result {
        Ok(SessionOutcome::Anomaly { value }) => {
            tracing::debug!(value, "session ended on input anomaly");
            diagnostics::trace_backtrace(backtrace_frames);
        }
        Err(err) => {
            tracing::error!(code = err.code(), error = %err, "session failed");
            diagnostics::trace_backtrace(backtrace_frames);
        }
        Ok(_) => {}
    }
    result
}

/// Raw mode, header, event loop, restore.
///
/// The terminal is restored before any loop error is returned; a restore
/// failure is reported only when the loop itself succeeded.
pub fn run_session<M, T, C, S, R>(
    modes: Option<M>,
    mut reader: KeyReader<T, C>,
    source: &mut S,
    sink: &mut R,
) -> KeyscopeResult<SessionOutcome>
where
    M: TerminalModes,
    T: SequenceTable,
    C: Clock,
    S: InputSource + ?Sized,
    R: ReportSink + ?Sized,
{
    let guard = modes.map(RawModeGuard::enter).transpose()?;
    let outcome = announce_and_read(&mut reader, source, sink);
    let restored = guard.map_or(Ok(()), RawModeGuard::restore);
    let outcome = outcome?;
    restored?;
    tracing::info!(?outcome, bytes = reader.bytes_read(), "session finished");
    Ok(outcome)
}

fn announce_and_read<T, C, S, R>(
    reader: &mut KeyReader<T, C>,
    source: &mut S,
    sink: &mut R,
) -> KeyscopeResult<SessionOutcome>
where
    T: SequenceTable,
    C: Clock,
    S: InputSource + ?Sized,
    R: ReportSink + ?Sized,
{
    sink.report(&Report::Ready {
        mode: reader.mode(),
        pid: std::process::id(),
    })?;
    reader.run(source, sink)
}
