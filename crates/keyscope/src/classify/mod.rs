//! Byte classification.
//!
//! [`classify`] is total over `0..=255`: every byte lands in exactly one
//! [`ByteKind`] and carries its decimal, octal and hex forms. Control bytes
//! render in caret-like `\cX` notation so carriage return (`\cM`) and newline
//! (`\cJ`) stay distinguishable.

use crate::model::{ByteKind, KeyRecord};
use crate::timing::Elapsed;
use std::fmt;

/// Classification of one input byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ByteInfo {
    pub value: u8,
    pub kind: ByteKind,
}

/// Classify a single byte.
pub fn classify(value: u8) -> ByteInfo {
    let kind = match value {
        0..=31 => ByteKind::Control,
        32 => ByteKind::Space,
        127 => ByteKind::Delete,
        128..=255 => ByteKind::NonAscii,
        _ => ByteKind::Printable,
    };
    ByteInfo { value, kind }
}

/// Backslash escape for the control bytes that have one.
fn control_alias(value: u8) -> Option<&'static str> {
    match value {
        7 => Some("\\a"),
        8 => Some("\\b"),
        9 => Some("\\t"),
        10 => Some("\\n"),
        11 => Some("\\v"),
        12 => Some("\\f"),
        13 => Some("\\r"),
        27 => Some("\\e"),
        _ => None,
    }
}

impl ByteInfo {
    pub fn dec(&self) -> u8 {
        self.value
    }

    pub fn oct(&self) -> String {
        format!("{:03o}", self.value)
    }

    pub fn hex(&self) -> String {
        format!("{:02X}", self.value)
    }

    /// Primary rendering: `\cJ`, `\040`, `\177`, `\351` or the literal character.
    pub fn rendered(&self) -> String {
        match self.kind {
            ByteKind::Control => format!("\\c{}", char::from(self.value + 64)),
            ByteKind::Space | ByteKind::Delete | ByteKind::NonAscii => {
                format!("\\{:03o}", self.value)
            }
            ByteKind::Printable => char::from(self.value).to_string(),
        }
    }

    /// Secondary name, if the byte has one.
    pub fn alias(&self) -> Option<&'static str> {
        match self.kind {
            ByteKind::Control => control_alias(self.value),
            ByteKind::Space => Some("space"),
            ByteKind::Delete => Some("del"),
            ByteKind::NonAscii => Some("non-ASCII"),
            ByteKind::Printable => None,
        }
    }

    /// The `char:` column of a text report.
    pub fn description(&self) -> String {
        let rendered = self.rendered();
        match (self.kind, self.alias()) {
            (ByteKind::Control, Some(alias)) => format!("{rendered}   (or {alias})"),
            (ByteKind::Space | ByteKind::Delete, Some(alias)) => {
                format!("{rendered}  (aka \"{alias}\")")
            }
            (ByteKind::NonAscii, Some(alias)) => format!("{rendered}  (aka {alias})"),
            _ => rendered,
        }
    }

    /// Combine with timing and sequence results into a report record.
    pub fn into_record(self, elapsed: Elapsed, sequence: Option<&str>) -> KeyRecord {
        KeyRecord {
            dec: self.dec(),
            oct: self.oct(),
            hex: self.hex(),
            rendered: self.rendered(),
            kind: self.kind,
            alias: self.alias().map(str::to_string),
            delay_us: elapsed.delay_us,
            pause: elapsed.pause,
            sequence: sequence.map(str::to_string),
        }
    }
}

impl fmt::Display for ByteInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "dec: {:3}  oct: {:03o}  hex: {:02X}  char: {}",
            self.value,
            self.value,
            self.value,
            self.description()
        )
    }
}
