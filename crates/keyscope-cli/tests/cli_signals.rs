//! Signals delivered to a running session.
// Test module - relaxed lint rules
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::indexing_slicing)]
#![allow(missing_docs)]

use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use std::io::{Read, Write};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

const TIMEOUT: Duration = Duration::from_secs(10);

fn read_until(rx: &mpsc::Receiver<Vec<u8>>, buffer: &mut Vec<u8>, needle: &str) -> bool {
    let deadline = Instant::now() + TIMEOUT;
    while !String::from_utf8_lossy(buffer).contains(needle) {
        let Some(left) = deadline.checked_duration_since(Instant::now()) else {
            return false;
        };
        match rx.recv_timeout(left) {
            Ok(chunk) => buffer.extend_from_slice(&chunk),
            Err(_) => return false,
        }
    }
    true
}

fn wait_with_timeout(child: &mut Child) -> Option<ExitStatus> {
    let deadline = Instant::now() + TIMEOUT;
    while Instant::now() < deadline {
        if let Some(status) = child.try_wait().unwrap() {
            return Some(status);
        }
        thread::sleep(Duration::from_millis(20));
    }
    let _ = child.kill();
    None
}

fn send(child: &Child, signal: Signal) {
    let pid = Pid::from_raw(i32::try_from(child.id()).unwrap());
    kill(pid, signal).expect("failed to signal keyscope");
}

#[test]
fn signals_are_reported_and_terminate_gracefully() {
    let mut child = Command::new(env!("CARGO_BIN_EXE_keyscope"))
        .arg("--continuous")
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("failed to spawn keyscope");
    let mut stdin = child.stdin.take().expect("stdin should be piped");
    let mut stdout = child.stdout.take().expect("stdout should be piped");
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut chunk = [0u8; 1024];
        while let Ok(n) = stdout.read(&mut chunk) {
            if n == 0 || tx.send(chunk[..n].to_vec()).is_err() {
                break;
            }
        }
    });

    let mut output = Vec::new();
    assert!(read_until(&rx, &mut output, "Press a key"), "no header");

    send(&child, Signal::SIGUSR1);
    assert!(
        read_until(&rx, &mut output, "(SIGUSR1) received"),
        "SIGUSR1 not reported"
    );

    // Non-terminating signals leave the session reading.
    stdin.write_all(b"a").unwrap();
    stdin.flush().unwrap();
    assert!(read_until(&rx, &mut output, "char: a"), "reading stopped");

    send(&child, Signal::SIGTERM);
    let status = wait_with_timeout(&mut child).expect("keyscope did not exit");
    assert!(status.success(), "unexpected status {status:?}");

    while let Ok(chunk) = rx.recv_timeout(Duration::from_millis(500)) {
        output.extend_from_slice(&chunk);
    }
    let text = String::from_utf8_lossy(&output);
    assert!(text.contains("(SIGTERM) received"), "output: {text}");
    assert!(!text.contains("Exiting at your request."));
    drop(stdin);
}
