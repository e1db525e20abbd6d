//! Named key sequence tables.
//!
//! The matcher only needs [`SequenceTable::name_for`]; how a table is built is
//! up to the caller. [`KeyMap`] is the stock implementation: a builtin set of
//! xterm sequences, optionally extended from a JSON or YAML file.
//!
//! # File format
//!
//! ```yaml
//! keys:
//!   up: "\e[A"
//!   f1: ["\eOP", "\e[11~"]
//! ```
//!
//! Every character of a sequence is taken as one byte (its code point), so it
//! must be at most U+00FF. Sequences are 1 to 8 bytes long.

mod builtin;

use crate::error::KeymapError;
use crate::matcher::SEQUENCE_WINDOW;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

/// Lookup from an exact byte sequence to its key name.
pub trait SequenceTable {
    fn name_for(&self, sequence: &[u8]) -> Option<&str>;
}

impl<T: SequenceTable + ?Sized> SequenceTable for &T {
    fn name_for(&self, sequence: &[u8]) -> Option<&str> {
        (**self).name_for(sequence)
    }
}

impl<T: SequenceTable + ?Sized> SequenceTable for Box<T> {
    fn name_for(&self, sequence: &[u8]) -> Option<&str> {
        (**self).name_for(sequence)
    }
}

/// Byte sequence to name mapping.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyMap {
    entries: HashMap<Vec<u8>, String>,
}

impl SequenceTable for KeyMap {
    fn name_for(&self, sequence: &[u8]) -> Option<&str> {
        self.entries.get(sequence).map(String::as_str)
    }
}

impl KeyMap {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Sequences sent by xterm-compatible terminals.
    pub fn builtin() -> Self {
        let mut map = Self::empty();
        for (name, sequence) in builtin::BUILTIN_KEYS {
            map.insert(sequence.to_vec(), (*name).to_string());
        }
        map
    }

    /// Register `sequence`, returning the name it replaced.
    pub fn insert(&mut self, sequence: Vec<u8>, name: String) -> Option<String> {
        self.entries.insert(sequence, name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Add every entry of `other`, overriding existing sequences.
    pub fn merge(&mut self, other: KeyMap) {
        self.entries.extend(other.entries);
    }

    /// Load a key map file; the extension selects JSON or YAML.
    pub fn load(path: &Path) -> Result<Self, KeymapError> {
        let text = fs::read_to_string(path).map_err(|source| KeymapError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        let document: KeymapDocument = match extension.as_deref() {
            Some("json") => serde_json::from_str(&text).map_err(|err| KeymapError::Parse {
                path: path.to_path_buf(),
                message: err.to_string(),
            })?,
            Some("yaml" | "yml") => {
                serde_yml::from_str(&text).map_err(|err| KeymapError::Parse {
                    path: path.to_path_buf(),
                    message: err.to_string(),
                })?
            }
            _ => {
                return Err(KeymapError::UnsupportedFormat {
                    path: path.to_path_buf(),
                })
            }
        };
        let map = Self::from_document(document)?;
        tracing::debug!(path = %path.display(), entries = map.len(), "loaded key map");
        Ok(map)
    }

    /// Build a map from a parsed document, validating every sequence.
    pub fn from_document(document: KeymapDocument) -> Result<Self, KeymapError> {
        let mut map = Self::empty();
        for (name, spec) in document.keys {
            for text in spec.into_vec() {
                let sequence = sequence_bytes(&name, &text)?;
                map.insert(sequence, name.clone());
            }
        }
        Ok(map)
    }
}

/// On-disk key map.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KeymapDocument {
    pub keys: BTreeMap<String, SequenceSpec>,
}

/// One sequence or several alternatives for the same key.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum SequenceSpec {
    One(String),
    Many(Vec<String>),
}

impl SequenceSpec {
    fn into_vec(self) -> Vec<String> {
        match self {
            Self::One(text) => vec![text],
            Self::Many(texts) => texts,
        }
    }
}

/// Convert a sequence string to bytes, one byte per code point.
fn sequence_bytes(name: &str, text: &str) -> Result<Vec<u8>, KeymapError> {
    let invalid = |reason: String| KeymapError::InvalidSequence {
        name: name.to_string(),
        reason,
    };
    let bytes = text
        .chars()
        .map(|ch| {
            u8::try_from(u32::from(ch)).map_err(|_| {
                invalid(format!(
                    "character U+{:04X} is outside the single-byte range",
                    u32::from(ch)
                ))
            })
        })
        .collect::<Result<Vec<u8>, KeymapError>>()?;
    if bytes.is_empty() {
        return Err(invalid("sequence is empty".to_string()));
    }
    if bytes.len() > SEQUENCE_WINDOW {
        return Err(invalid(format!(
            "sequence is {} bytes; at most {SEQUENCE_WINDOW} are supported",
            bytes.len()
        )));
    }
    Ok(bytes)
}
