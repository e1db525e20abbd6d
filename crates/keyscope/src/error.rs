//! Error types shared by the library and the CLI.
//!
//! Every variant carries a stable diagnostic code so the CLI can render it
//! through miette and map it to a process exit status.

use miette::Diagnostic;
use nix::errno::Errno;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Convenience alias for library results.
pub type KeyscopeResult<T> = Result<T, KeyscopeError>;

/// Failures that end a session abnormally.
///
/// Input anomalies and signals are not errors: they end the session with a
/// [`SessionOutcome`](crate::model::SessionOutcome) instead.
#[derive(Debug, Error, Diagnostic)]
pub enum KeyscopeError {
    #[error("failed to read terminal attributes")]
    #[diagnostic(
        code(E_TERMINAL),
        help("stdin must be attached to a terminal to enter raw mode")
    )]
    TerminalQuery(#[source] Errno),

    #[error("failed to switch the terminal to raw mode")]
    #[diagnostic(code(E_TERMINAL))]
    TerminalRaw(#[source] Errno),

    #[error("failed to restore the terminal mode")]
    #[diagnostic(code(E_TERMINAL), help("run `stty sane` to recover the terminal"))]
    TerminalRestore(#[source] Errno),

    #[error("failed to duplicate the stdin descriptor")]
    #[diagnostic(code(E_IO))]
    Descriptor(#[source] io::Error),

    #[error("failed to wait for input")]
    #[diagnostic(code(E_IO))]
    Poll(#[source] Errno),

    #[error("failed to read input")]
    #[diagnostic(code(E_IO))]
    Read(#[source] io::Error),

    #[error("failed to write report")]
    #[diagnostic(code(E_IO))]
    Write(#[source] io::Error),

    #[error("failed to install signal handlers")]
    #[diagnostic(code(E_SIGNAL))]
    Signals(#[source] io::Error),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Keymap(#[from] KeymapError),
}

impl KeyscopeError {
    /// Stable error code, matching the diagnostic code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::TerminalQuery(_) | Self::TerminalRaw(_) | Self::TerminalRestore(_) => {
                "E_TERMINAL"
            }
            Self::Descriptor(_) | Self::Poll(_) | Self::Read(_) | Self::Write(_) => "E_IO",
            Self::Signals(_) => "E_SIGNAL",
            Self::Keymap(_) => "E_KEYMAP",
        }
    }
}

/// Failures while loading a named sequence table from disk.
#[derive(Debug, Error, Diagnostic)]
pub enum KeymapError {
    #[error("failed to read key map {}", .path.display())]
    #[diagnostic(code(E_KEYMAP))]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse key map {}: {message}", .path.display())]
    #[diagnostic(code(E_KEYMAP))]
    Parse { path: PathBuf, message: String },

    #[error("unsupported key map format {}", .path.display())]
    #[diagnostic(code(E_KEYMAP), help("use a .json, .yaml or .yml file"))]
    UnsupportedFormat { path: PathBuf },

    #[error("key {name:?} has an invalid sequence: {reason}")]
    #[diagnostic(code(E_KEYMAP))]
    InvalidSequence { name: String, reason: String },
}
