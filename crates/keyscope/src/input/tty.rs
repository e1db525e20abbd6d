use super::{InputSource, InputUnit};
use crate::error::{KeyscopeError, KeyscopeResult};
use crate::session::CancellationToken;
use nix::errno::Errno;
use nix::poll::{poll, PollFd, PollFlags, PollTimeout};
use std::fs::File;
use std::io::{self, ErrorKind, Read};
use std::os::fd::{AsFd, OwnedFd};
use std::time::{Duration, Instant};

/// How long a timed read waits for the rest of a key sequence.
pub const DEFAULT_ESCAPE_TIMEOUT: Duration = Duration::from_millis(300);

/// Longest single wait before the cancellation token is checked again.
pub const POLL_SLICE: Duration = Duration::from_millis(50);

/// Unbuffered byte reader over a duplicate of stdin.
///
/// Reads never consume more than one byte, so nothing is left sitting in a
/// userspace buffer between calls. Waiting happens in [`POLL_SLICE`] steps so
/// a cancelled session stops even while no key is pressed.
#[derive(Debug)]
pub struct TerminalInput {
    file: File,
    escape_timeout: Duration,
    cancel: CancellationToken,
}

impl TerminalInput {
    /// Read from the process's stdin.
    pub fn stdin(escape_timeout: Duration, cancel: CancellationToken) -> KeyscopeResult<Self> {
        let fd = io::stdin()
            .as_fd()
            .try_clone_to_owned()
            .map_err(KeyscopeError::Descriptor)?;
        Ok(Self::from_fd(fd, escape_timeout, cancel))
    }

    /// Read from an arbitrary descriptor (a pipe or pty end).
    pub fn from_fd(fd: OwnedFd, escape_timeout: Duration, cancel: CancellationToken) -> Self {
        Self {
            file: File::from(fd),
            escape_timeout,
            cancel,
        }
    }

    fn wait_readable(&self, wait: Duration) -> KeyscopeResult<bool> {
        let millis = u16::try_from(wait.as_millis()).unwrap_or(u16::MAX);
        let mut fds = [PollFd::new(self.file.as_fd(), PollFlags::POLLIN)];
        match poll(&mut fds, PollTimeout::from(millis)) {
            Ok(0) | Err(Errno::EINTR) => Ok(false),
            Ok(_) => Ok(true),
            Err(err) => Err(KeyscopeError::Poll(err)),
        }
    }
}

impl InputSource for TerminalInput {
    fn next_unit(&mut self, timed: bool) -> KeyscopeResult<InputUnit> {
        let deadline = timed.then(|| Instant::now() + self.escape_timeout);
        loop {
            if self.cancel.is_cancelled() {
                return Ok(InputUnit::EndOfInput);
            }
            let wait = match deadline {
                Some(deadline) => {
                    let left = deadline.saturating_duration_since(Instant::now());
                    if left.is_zero() {
                        return Ok(InputUnit::EndOfInput);
                    }
                    left.min(POLL_SLICE)
                }
                None => POLL_SLICE,
            };
            if !self.wait_readable(wait)? {
                continue;
            }
            let mut buf = [0u8; 1];
            match self.file.read(&mut buf) {
                Ok(0) => return Ok(InputUnit::EndOfInput),
                Ok(_) => {
                    let [byte] = buf;
                    return Ok(InputUnit::Unit(u32::from(byte)));
                }
                Err(err) if matches!(err.kind(), ErrorKind::Interrupted | ErrorKind::WouldBlock) => {}
                Err(err) => return Err(KeyscopeError::Read(err)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::indexing_slicing)]

    use super::*;
    use std::io::Write;
    use std::os::unix::net::UnixStream;

    fn pair() -> (UnixStream, TerminalInput, CancellationToken) {
        let (writer, reader) = UnixStream::pair().unwrap();
        let cancel = CancellationToken::new();
        let input = TerminalInput::from_fd(
            OwnedFd::from(reader),
            Duration::from_millis(20),
            cancel.clone(),
        );
        (writer, input, cancel)
    }

    #[test]
    fn reads_one_byte_per_call() {
        let (mut writer, mut input, _cancel) = pair();
        writer.write_all(b"\x1b[A").unwrap();
        assert_eq!(input.next_unit(false).ok(), Some(InputUnit::Unit(0x1b)));
        assert_eq!(input.next_unit(true).ok(), Some(InputUnit::Unit(u32::from(b'['))));
        assert_eq!(input.next_unit(true).ok(), Some(InputUnit::Unit(u32::from(b'A'))));
    }

    #[test]
    fn timed_read_gives_up_after_escape_timeout() {
        let (_writer, mut input, _cancel) = pair();
        let started = Instant::now();
        assert_eq!(input.next_unit(true).ok(), Some(InputUnit::EndOfInput));
        assert!(started.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn closed_writer_is_end_of_input() {
        let (writer, mut input, _cancel) = pair();
        drop(writer);
        assert_eq!(input.next_unit(false).ok(), Some(InputUnit::EndOfInput));
    }

    #[test]
    fn cancellation_interrupts_untimed_wait() {
        let (_writer, mut input, cancel) = pair();
        let trigger = cancel.clone();
        let handle = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(30));
            trigger.cancel();
        });
        assert_eq!(input.next_unit(false).ok(), Some(InputUnit::EndOfInput));
        handle.join().unwrap();
        assert!(cancel.is_cancelled());
    }
}
