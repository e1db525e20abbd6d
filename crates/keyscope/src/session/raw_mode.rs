//! Scoped raw terminal mode.

use crate::error::{KeyscopeError, KeyscopeResult};
use nix::sys::termios::{
    tcgetattr, tcsetattr, InputFlags, LocalFlags, SetArg, SpecialCharacterIndices, Termios,
};
use nix::unistd::{tcgetpgrp, tcsetpgrp, Pid};
use std::io;
use std::os::fd::{AsFd, OwnedFd};

/// Save, switch and restore a terminal's mode.
pub trait TerminalModes {
    /// Everything needed to put the terminal back exactly as it was.
    type State;

    fn save(&self) -> KeyscopeResult<Self::State>;
    fn enter_raw(&self, saved: &Self::State) -> KeyscopeResult<()>;
    fn restore(&self, saved: &Self::State) -> KeyscopeResult<()>;
}

/// Keeps a terminal in raw mode until restored or dropped.
///
/// [`RawModeGuard::restore`] reports failures; `Drop` is the best-effort
/// fallback for early returns and unwinding.
pub struct RawModeGuard<M: TerminalModes> {
    modes: M,
    saved: Option<M::State>,
}

impl<M: TerminalModes> RawModeGuard<M> {
    /// Save the current mode and switch to raw mode.
    pub fn enter(modes: M) -> KeyscopeResult<Self> {
        let saved = modes.save()?;
        if let Err(err) = modes.enter_raw(&saved) {
            // The switch may have been partially applied.
            if let Err(rollback) = modes.restore(&saved) {
                tracing::warn!(error = %rollback, "failed to roll back terminal mode");
            }
            return Err(err);
        }
        tracing::debug!("terminal switched to raw mode");
        Ok(Self {
            modes,
            saved: Some(saved),
        })
    }

    /// Put the terminal back into the saved mode.
    pub fn restore(mut self) -> KeyscopeResult<()> {
        match self.saved.take() {
            Some(saved) => {
                self.modes.restore(&saved)?;
                tracing::debug!("terminal mode restored");
                Ok(())
            }
            None => Ok(()),
        }
    }
}

impl<M: TerminalModes> Drop for RawModeGuard<M> {
    fn drop(&mut self) {
        if let Some(saved) = self.saved.take() {
            if let Err(err) = self.modes.restore(&saved) {
                tracing::warn!(error = %err, "failed to restore terminal mode");
            }
        }
    }
}

/// Saved attributes and foreground process group of a tty.
#[derive(Clone, Debug)]
pub struct TtyState {
    pub termios: Termios,
    pub foreground: Option<Pid>,
}

/// termios-backed [`TerminalModes`] for a tty descriptor.
#[derive(Debug)]
pub struct TtyModes {
    fd: OwnedFd,
}

impl TtyModes {
    /// Control the terminal attached to stdin.
    pub fn stdin() -> KeyscopeResult<Self> {
        let fd = io::stdin()
            .as_fd()
            .try_clone_to_owned()
            .map_err(KeyscopeError::Descriptor)?;
        Ok(Self { fd })
    }

    /// Control the terminal behind `fd`.
    pub fn from_fd(fd: OwnedFd) -> Self {
        Self { fd }
    }

    /// Attributes for byte-at-a-time reading.
    ///
    /// No line buffering, echo, signal keys or input translation, so `^C`
    /// arrives as byte 3 and carriage return stays distinct from newline.
    /// Output processing is left alone so reports still end lines correctly.
    pub fn raw_termios(original: &Termios) -> Termios {
        let mut raw = original.clone();
        raw.input_flags.remove(
            InputFlags::ICRNL
                | InputFlags::INLCR
                | InputFlags::IGNCR
                | InputFlags::IXON
                | InputFlags::ISTRIP
                | InputFlags::BRKINT,
        );
        raw.local_flags.remove(
            LocalFlags::ICANON | LocalFlags::ECHO | LocalFlags::ISIG | LocalFlags::IEXTEN,
        );
        if let Some(vmin) = raw
            .control_chars
            .get_mut(SpecialCharacterIndices::VMIN as usize)
        {
            *vmin = 1;
        }
        if let Some(vtime) = raw
            .control_chars
            .get_mut(SpecialCharacterIndices::VTIME as usize)
        {
            *vtime = 0;
        }
        raw
    }
}

impl TerminalModes for TtyModes {
    type State = TtyState;

    fn save(&self) -> KeyscopeResult<TtyState> {
        let termios = tcgetattr(&self.fd).map_err(KeyscopeError::TerminalQuery)?;
        let foreground = tcgetpgrp(&self.fd).ok();
        Ok(TtyState {
            termios,
            foreground,
        })
    }

    fn enter_raw(&self, saved: &TtyState) -> KeyscopeResult<()> {
        let raw = Self::raw_termios(&saved.termios);
        tcsetattr(&self.fd, SetArg::TCSANOW, &raw).map_err(KeyscopeError::TerminalRaw)
    }

    fn restore(&self, saved: &TtyState) -> KeyscopeResult<()> {
        tcsetattr(&self.fd, SetArg::TCSADRAIN, &saved.termios)
            .map_err(KeyscopeError::TerminalRestore)?;
        if let Some(pgrp) = saved.foreground {
            if tcgetpgrp(&self.fd).ok() != Some(pgrp) {
                tcsetpgrp(&self.fd, pgrp).map_err(KeyscopeError::TerminalRestore)?;
            }
        }
        Ok(())
    }
}
