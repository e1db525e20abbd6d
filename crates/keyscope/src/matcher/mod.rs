//! Sliding-window matchers.
//!
//! Both matchers shift every input byte into their own fixed-size window
//! (oldest byte discarded) and then test the window:
//!
//! - [`ExitPhraseMatcher`] compares the last 4 bytes against `exit` / `quit`.
//! - [`NamedSequenceMatcher`] looks up the last 8 bytes, longest suffix first,
//!   in a [`SequenceTable`](crate::keymap::SequenceTable).
//!
//! The windows are independent and never reset during a session.

mod exit;
mod named;

pub use exit::{ExitPhraseMatcher, EXIT_PHRASES};
pub use named::{NamedSequenceMatcher, SEQUENCE_WINDOW};

/// Fixed-capacity window over the most recent bytes, zero-filled at start.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlidingWindow<const N: usize> {
    bytes: [u8; N],
}

impl<const N: usize> Default for SlidingWindow<N> {
    fn default() -> Self {
        Self { bytes: [0; N] }
    }
}

impl<const N: usize> SlidingWindow<N> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shift `byte` in at the end, dropping the oldest byte.
    pub fn push(&mut self, byte: u8) {
        if N == 0 {
            return;
        }
        self.bytes.rotate_left(1);
        if let Some(last) = self.bytes.last_mut() {
            *last = byte;
        }
    }

    /// Window contents, oldest first.
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    /// Trailing slices of the window from length `N` down to 1.
    pub fn suffixes(&self) -> impl Iterator<Item = &[u8]> + '_ {
        (0..N).filter_map(move |start| self.bytes.get(start..))
    }
}
