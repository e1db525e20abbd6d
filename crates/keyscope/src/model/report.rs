use crate::model::{ByteKind, SessionMode};
use serde::{Deserialize, Serialize};

/// One unit of session output.
///
/// Text mode renders each variant as the classic key-reader lines; JSON mode
/// serializes it as a single object tagged by `event`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Report {
    /// Session started and is waiting for the first key.
    Ready { mode: SessionMode, pid: u32 },
    /// One byte was read and classified.
    Key(KeyRecord),
    /// The exit phrase was typed.
    ExitRequested,
    /// The input source produced a unit outside the byte range.
    Anomaly { value: u32 },
    /// A signal was delivered to the process.
    Signal {
        number: i32,
        name: String,
        terminating: bool,
    },
}

/// Everything reported about a single input byte.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyRecord {
    /// Decimal value.
    pub dec: u8,
    /// Octal digits, zero padded to three.
    pub oct: String,
    /// Upper-case hex digits, zero padded to two.
    pub hex: String,
    /// Rendering of the byte (`\cJ`, `\040`, `A`, ...).
    #[serde(rename = "char")]
    pub rendered: String,
    pub kind: ByteKind,
    /// Alternate spelling (`\n`, `space`, `del`, `non-ASCII`).
    pub alias: Option<String>,
    /// Microseconds since the previous byte; `None` for the first byte.
    pub delay_us: Option<u64>,
    /// A long pause preceded this byte.
    pub pause: bool,
    /// Name of the longest key sequence ending with this byte.
    pub sequence: Option<String>,
}
