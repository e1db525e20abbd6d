use super::SlidingWindow;

/// Byte strings that end a session when typed.
pub const EXIT_PHRASES: [&[u8; 4]; 2] = [b"exit", b"quit"];

/// Detects `exit` or `quit` in the last four bytes.
///
/// There is no line editing in raw mode, so the test runs on every byte and
/// ignores word boundaries: `xquit` and `\e[Aexit` both match.
#[derive(Debug, Default)]
pub struct ExitPhraseMatcher {
    window: SlidingWindow<4>,
}

impl ExitPhraseMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shift in `byte`; true when the window now spells an exit phrase.
    pub fn observe(&mut self, byte: u8) -> bool {
        self.window.push(byte);
        EXIT_PHRASES
            .iter()
            .any(|phrase| self.window.as_slice() == phrase.as_slice())
    }
}
