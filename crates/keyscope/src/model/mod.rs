pub mod report;

pub use report::*;

use serde::{Deserialize, Serialize};

/// Whether the session ends after one key or keeps reading.
///
/// Fixed for the lifetime of a session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionMode {
    /// Read one key (and any bytes that follow it within the escape timeout).
    #[default]
    Single,
    /// Keep reading until the exit phrase, end of input, or a terminating signal.
    Continuous,
}

impl SessionMode {
    pub fn is_continuous(self) -> bool {
        matches!(self, Self::Continuous)
    }
}

/// How reports are written to stdout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

/// Display category of a single byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ByteKind {
    /// 0..=31.
    Control,
    /// 32.
    Space,
    /// 127.
    Delete,
    /// 128..=255.
    NonAscii,
    /// 33..=126.
    Printable,
}

/// Why a session stopped reading.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SessionOutcome {
    /// `exit` or `quit` was typed.
    ExitPhrase,
    /// The source ended (EOF, or the escape timeout in single mode).
    EndOfInput,
    /// The source produced a value outside the byte range.
    Anomaly { value: u32 },
    /// A terminating signal cancelled the session.
    Cancelled,
}
