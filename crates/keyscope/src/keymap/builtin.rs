//! Sequences emitted by xterm-compatible terminals, named after their
//! terminfo capabilities.

pub(super) const BUILTIN_KEYS: &[(&str, &[u8])] = &[
    // Cursor keys, normal and application mode.
    ("up", b"\x1b[A"),
    ("down", b"\x1b[B"),
    ("right", b"\x1b[C"),
    ("left", b"\x1b[D"),
    ("up", b"\x1bOA"),
    ("down", b"\x1bOB"),
    ("right", b"\x1bOC"),
    ("left", b"\x1bOD"),
    ("sup", b"\x1b[1;2A"),
    ("sdown", b"\x1b[1;2B"),
    ("sright", b"\x1b[1;2C"),
    ("sleft", b"\x1b[1;2D"),
    // Editing keypad.
    ("home", b"\x1b[H"),
    ("home", b"\x1bOH"),
    ("home", b"\x1b[1~"),
    ("end", b"\x1b[F"),
    ("end", b"\x1bOF"),
    ("end", b"\x1b[4~"),
    ("ic", b"\x1b[2~"),
    ("dc", b"\x1b[3~"),
    ("ppage", b"\x1b[5~"),
    ("npage", b"\x1b[6~"),
    ("btab", b"\x1b[Z"),
    ("backspace", b"\x7f"),
    // Function keys.
    ("f1", b"\x1bOP"),
    ("f2", b"\x1bOQ"),
    ("f3", b"\x1bOR"),
    ("f4", b"\x1bOS"),
    ("f1", b"\x1b[11~"),
    ("f2", b"\x1b[12~"),
    ("f3", b"\x1b[13~"),
    ("f4", b"\x1b[14~"),
    ("f5", b"\x1b[15~"),
    ("f6", b"\x1b[17~"),
    ("f7", b"\x1b[18~"),
    ("f8", b"\x1b[19~"),
    ("f9", b"\x1b[20~"),
    ("f10", b"\x1b[21~"),
    ("f11", b"\x1b[23~"),
    ("f12", b"\x1b[24~"),
];
