//! keyscope: report what a keyboard actually sends.
//!
//! This crate reads raw terminal input one byte at a time and, for each byte,
//! reports its numeric encodings, its control-character spelling, the delay
//! since the previous byte and the name of any key sequence it completes.
//! Typing `exit` or `quit` ends a continuous session.
//!
//! The engine ([`timing`], [`classify`], [`matcher`], [`reader`]) is pure and
//! driven through the [`input::InputSource`] and [`keymap::SequenceTable`]
//! traits; [`session`] wires it to the real terminal.

#![forbid(unsafe_code)]
// Library documentation is in progress. Public API types have docs;
// internal types will be documented in future releases.
#![allow(missing_docs)]

pub mod classify;
pub mod diagnostics;
pub mod error;
pub mod input;
pub mod keymap;
pub mod matcher;
pub mod model;
pub mod reader;
pub mod session;
pub mod timing;

pub use crate::error::{KeyscopeError, KeyscopeResult, KeymapError};
pub use crate::model::*;
