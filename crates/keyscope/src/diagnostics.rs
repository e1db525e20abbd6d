//! Backtrace capture for trace-level logging.

use std::backtrace::Backtrace;

/// The first `limit` frames of the current backtrace, one string per frame
/// (symbol line plus its `at file:line` line when present).
pub fn backtrace_frames(limit: usize) -> Vec<String> {
    if limit == 0 {
        return Vec::new();
    }
    let rendered = Backtrace::force_capture().to_string();
    let mut frames: Vec<String> = Vec::new();
    for line in rendered.lines() {
        let trimmed = line.trim_start();
        if starts_frame(trimmed) {
            if frames.len() == limit {
                break;
            }
            frames.push(trimmed.to_string());
        } else if let Some(current) = frames.last_mut() {
            current.push(' ');
            current.push_str(trimmed);
        }
    }
    frames
}

/// Frame headers look like `12: symbol::path`.
fn starts_frame(line: &str) -> bool {
    let digits = line.chars().take_while(char::is_ascii_digit).count();
    digits > 0 && line.get(digits..).is_some_and(|rest| rest.starts_with(':'))
}

/// Log up to `limit` frames at trace level, if trace logging is enabled.
pub fn trace_backtrace(limit: usize) {
    if limit == 0 || !tracing::enabled!(tracing::Level::TRACE) {
        return;
    }
    for (index, frame) in backtrace_frames(limit).iter().enumerate() {
        tracing::trace!(index, "{frame}");
    }
}
