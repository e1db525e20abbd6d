// Test module - relaxed lint rules
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::indexing_slicing)]
#![allow(clippy::panic)]
#![allow(missing_docs)]

use keyscope::error::{KeyscopeError, KeyscopeResult};
use keyscope::input::{InputSource, InputUnit, ScriptedInput};
use keyscope::keymap::KeyMap;
use keyscope::model::{Report, SessionMode, SessionOutcome};
use keyscope::reader::KeyReader;
use keyscope::session::{run_session, CancellationToken, TerminalModes};
use std::cell::RefCell;
use std::io;

/// Terminal whose "mode" is a bag of flag bits.
struct FakeTerminal {
    flags: RefCell<u64>,
    history: RefCell<Vec<&'static str>>,
}

const ORIGINAL: u64 = 0x8000_0000_0000_8a3b;

impl FakeTerminal {
    fn new() -> Self {
        Self {
            flags: RefCell::new(ORIGINAL),
            history: RefCell::new(Vec::new()),
        }
    }

    fn flags(&self) -> u64 {
        *self.flags.borrow()
    }
}

impl TerminalModes for &FakeTerminal {
    type State = u64;

    fn save(&self) -> KeyscopeResult<u64> {
        self.history.borrow_mut().push("save");
        Ok(self.flags())
    }

    fn enter_raw(&self, saved: &u64) -> KeyscopeResult<()> {
        self.history.borrow_mut().push("raw");
        *self.flags.borrow_mut() = saved & !0xff;
        Ok(())
    }

    fn restore(&self, saved: &u64) -> KeyscopeResult<()> {
        self.history.borrow_mut().push("restore");
        *self.flags.borrow_mut() = *saved;
        Ok(())
    }
}

/// Source that checks raw mode is active on every read.
struct AssertRaw<'a> {
    terminal: &'a FakeTerminal,
    inner: ScriptedInput,
}

impl InputSource for AssertRaw<'_> {
    fn next_unit(&mut self, timed: bool) -> KeyscopeResult<InputUnit> {
        assert_ne!(self.terminal.flags(), ORIGINAL, "read outside raw mode");
        self.inner.next_unit(timed)
    }
}

struct FailingSource;

impl InputSource for FailingSource {
    fn next_unit(&mut self, _timed: bool) -> KeyscopeResult<InputUnit> {
        Err(KeyscopeError::Read(io::Error::other("device gone")))
    }
}

fn reader(mode: SessionMode, cancel: CancellationToken) -> KeyReader<KeyMap> {
    KeyReader::new(mode, KeyMap::builtin(), cancel)
}

fn run_script(script: ScriptedInput, cancel: CancellationToken) -> (FakeTerminal, SessionOutcome, Vec<Report>) {
    let terminal = FakeTerminal::new();
    let mut reports = Vec::new();
    let outcome = {
        let mut source = AssertRaw {
            terminal: &terminal,
            inner: script,
        };
        run_session(
            Some(&terminal),
            reader(SessionMode::Continuous, cancel),
            &mut source,
            &mut reports,
        )
        .unwrap()
    };
    (terminal, outcome, reports)
}

#[test]
fn exit_phrase_restores_terminal() {
    let (terminal, outcome, reports) =
        run_script(ScriptedInput::new().bytes(b"hello exit"), CancellationToken::new());
    assert_eq!(outcome, SessionOutcome::ExitPhrase);
    assert_eq!(terminal.flags(), ORIGINAL);
    assert_eq!(*terminal.history.borrow(), vec!["save", "raw", "restore"]);
    assert!(matches!(reports.first(), Some(Report::Ready { .. })));
}

#[test]
fn end_of_input_restores_terminal() {
    let (terminal, outcome, _) =
        run_script(ScriptedInput::new().bytes(b"abc"), CancellationToken::new());
    assert_eq!(outcome, SessionOutcome::EndOfInput);
    assert_eq!(terminal.flags(), ORIGINAL);
}

#[test]
fn anomaly_restores_terminal() {
    let (terminal, outcome, reports) = run_script(
        ScriptedInput::new().bytes(b"a").unit(300).bytes(b"b"),
        CancellationToken::new(),
    );
    assert_eq!(outcome, SessionOutcome::Anomaly { value: 300 });
    assert_eq!(terminal.flags(), ORIGINAL);
    assert_eq!(reports.last(), Some(&Report::Anomaly { value: 300 }));
}

#[test]
fn cancellation_restores_terminal() {
    let cancel = CancellationToken::new();
    cancel.cancel();
    let (terminal, outcome, reports) = run_script(ScriptedInput::new().bytes(b"abc"), cancel);
    assert_eq!(outcome, SessionOutcome::Cancelled);
    assert_eq!(terminal.flags(), ORIGINAL);
    assert_eq!(reports.len(), 1, "only the header is printed");
}

#[test]
fn source_error_still_restores_terminal() {
    let terminal = FakeTerminal::new();
    let mut reports = Vec::new();
    let result = run_session(
        Some(&terminal),
        reader(SessionMode::Single, CancellationToken::new()),
        &mut FailingSource,
        &mut reports,
    );
    assert!(matches!(result, Err(KeyscopeError::Read(_))));
    assert_eq!(terminal.flags(), ORIGINAL);
    assert_eq!(*terminal.history.borrow(), vec!["save", "raw", "restore"]);
}

#[test]
fn without_terminal_modes_the_session_still_runs() {
    let mut reports = Vec::new();
    let outcome = run_session(
        None::<&FakeTerminal>,
        reader(SessionMode::Continuous, CancellationToken::new()),
        &mut ScriptedInput::new().bytes(b"quit"),
        &mut reports,
    )
    .unwrap();
    assert_eq!(outcome, SessionOutcome::ExitPhrase);
    assert_eq!(reports.len(), 1 + 4 + 1);
}
