use super::SlidingWindow;
use crate::keymap::SequenceTable;

/// Longest sequence the matcher can recognize.
pub const SEQUENCE_WINDOW: usize = 8;

/// Reports the name of the longest registered sequence ending at the current byte.
///
/// The table is injected; the matcher only ever asks it about suffixes of its
/// own window, from the full eight bytes down to one. A shorter entry that is
/// also the prefix of a longer sequence (a lone escape, say) therefore never
/// shadows the full sequence.
#[derive(Debug)]
pub struct NamedSequenceMatcher<T> {
    window: SlidingWindow<SEQUENCE_WINDOW>,
    table: T,
}

impl<T: SequenceTable> NamedSequenceMatcher<T> {
    pub fn new(table: T) -> Self {
        Self {
            window: SlidingWindow::new(),
            table,
        }
    }

    /// Shift in `byte` and return the longest suffix match, if any.
    pub fn observe(&mut self, byte: u8) -> Option<&str> {
        self.window.push(byte);
        let table = &self.table;
        self.window.suffixes().find_map(|suffix| table.name_for(suffix))
    }
}
