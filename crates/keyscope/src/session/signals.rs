//! Out-of-band signal reporting.

use super::CancellationToken;
use crate::error::{KeyscopeError, KeyscopeResult};
use crate::model::{OutputFormat, Report};
use crate::reader::{ReportSink, Reporter};
use nix::sys::signal::Signal;
use signal_hook::consts::signal::{
    SIGABRT, SIGALRM, SIGCHLD, SIGCONT, SIGHUP, SIGINT, SIGPROF, SIGQUIT, SIGSEGV, SIGTERM, SIGTSTP,
    SIGTTIN, SIGTTOU, SIGURG, SIGUSR1, SIGUSR2, SIGVTALRM, SIGWINCH, SIGXCPU, SIGXFSZ,
};
use signal_hook::iterator::{Handle, Signals};
use std::io;
use std::thread::{self, JoinHandle};

/// Signals that end the session.
pub const TERMINATING_SIGNALS: [i32; 4] = [SIGINT, SIGTERM, SIGABRT, SIGSEGV];

/// Signals the watcher reports. Synchronous faults (SIGSEGV, SIGILL, SIGFPE,
/// SIGBUS) and SIGKILL/SIGSTOP cannot be observed from a watcher thread.
/// SIGPIPE is left alone: the watcher's own wake-up write can raise it.
pub const WATCHED_SIGNALS: [i32; 19] = [
    SIGHUP, SIGINT, SIGQUIT, SIGABRT, SIGUSR1, SIGUSR2, SIGALRM, SIGTERM, SIGCHLD, SIGCONT,
    SIGTSTP, SIGTTIN, SIGTTOU, SIGURG, SIGXCPU, SIGXFSZ, SIGVTALRM, SIGPROF, SIGWINCH,
];

pub fn is_terminating(number: i32) -> bool {
    TERMINATING_SIGNALS.contains(&number)
}

/// Conventional name of a signal (`SIGINT`), or its number when unknown.
pub fn signal_name(number: i32) -> String {
    Signal::try_from(number)
        .map(|signal| signal.as_str().to_string())
        .unwrap_or_else(|_| format!("signal {number}"))
}

pub fn signal_report(number: i32) -> Report {
    Report::Signal {
        number,
        name: signal_name(number),
        terminating: is_terminating(number),
    }
}

/// Reports delivered signals on a background thread.
///
/// Terminating signals cancel the session token after the notice is printed.
/// The handlers stay installed until [`SignalWatcher::close`] or drop.
pub struct SignalWatcher {
    handle: Handle,
    thread: Option<JoinHandle<()>>,
}

impl SignalWatcher {
    pub fn spawn(cancel: CancellationToken, format: OutputFormat) -> KeyscopeResult<Self> {
        let mut signals = Signals::new(WATCHED_SIGNALS).map_err(KeyscopeError::Signals)?;
        let handle = signals.handle();
        let thread = thread::Builder::new()
            .name("keyscope-signals".to_string())
            .spawn(move || {
                let mut reporter = Reporter::new(io::stdout(), format);
                for number in signals.forever() {
                    tracing::debug!(signal = number, "signal received");
                    if let Err(err) = reporter.report(&signal_report(number)) {
                        tracing::warn!(error = %err, "failed to report signal");
                    }
                    if is_terminating(number) {
                        cancel.cancel();
                    }
                }
            })
            .map_err(KeyscopeError::Signals)?;
        Ok(Self {
            handle,
            thread: Some(thread),
        })
    }

    /// Stop watching and wait for the watcher thread to finish.
    pub fn close(mut self) {
        self.shutdown();
    }

    /// Runs once; the handle must not be closed after the thread is gone.
    fn shutdown(&mut self) {
        if let Some(thread) = self.thread.take() {
            self.handle.close();
            if thread.join().is_err() {
                tracing::warn!("signal watcher thread panicked");
            }
        }
    }
}

impl Drop for SignalWatcher {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::indexing_slicing)]

    use super::*;
    use std::sync::mpsc;
    use std::time::Duration;

    #[test]
    fn termination_class() {
        assert!(is_terminating(SIGINT));
        assert!(is_terminating(SIGTERM));
        assert!(is_terminating(SIGABRT));
        assert!(is_terminating(SIGSEGV));
        assert!(!is_terminating(SIGWINCH));
        assert!(!is_terminating(SIGHUP));
    }

    #[test]
    fn names_known_and_unknown_signals() {
        assert_eq!(signal_name(SIGINT), "SIGINT");
        assert_eq!(signal_name(SIGWINCH), "SIGWINCH");
        assert_eq!(signal_name(9999), "signal 9999");
    }

    #[test]
    fn report_carries_termination_flag() {
        assert_eq!(
            signal_report(SIGTERM),
            Report::Signal {
                number: SIGTERM,
                name: "SIGTERM".to_string(),
                terminating: true,
            }
        );
    }

    #[test]
    fn watched_signals_exclude_uncatchable_ones() {
        use signal_hook::consts::FORBIDDEN;
        assert!(WATCHED_SIGNALS.iter().all(|sig| !FORBIDDEN.contains(sig)));
        assert!(!WATCHED_SIGNALS.contains(&signal_hook::consts::SIGPIPE));
    }

    fn finishes_within(limit: Duration, work: impl FnOnce() + Send + 'static) -> bool {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            work();
            let _ = tx.send(());
        });
        rx.recv_timeout(limit).is_ok()
    }

    // Signal dispositions are process-wide, so the watcher lifecycle runs
    // as one test.
    #[test]
    fn watcher_close_and_drop_return() {
        let closed = finishes_within(Duration::from_secs(10), || {
            let watcher = SignalWatcher::spawn(CancellationToken::new(), OutputFormat::Json).unwrap();
            watcher.close();
        });
        assert!(closed, "close() did not return");

        let dropped = finishes_within(Duration::from_secs(10), || {
            let watcher = SignalWatcher::spawn(CancellationToken::new(), OutputFormat::Json).unwrap();
            drop(watcher);
        });
        assert!(dropped, "drop did not return");
    }
}
