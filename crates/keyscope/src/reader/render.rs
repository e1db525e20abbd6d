use super::ReportSink;
use crate::classify::classify;
use crate::error::{KeyscopeError, KeyscopeResult};
use crate::model::{KeyRecord, OutputFormat, Report};
use crate::timing::Elapsed;
use std::fmt::Write as _;
use std::io::{self, Write};

/// Writes reports to an output stream in the configured format.
///
/// Each report is rendered in full and written with a single `write_all`, so
/// reports from the signal watcher never split a key line.
#[derive(Debug)]
pub struct Reporter<W> {
    out: W,
    format: OutputFormat,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W, format: OutputFormat) -> Self {
        Self { out, format }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn render(&self, report: &Report) -> KeyscopeResult<String> {
        match self.format {
            OutputFormat::Text => Ok(render_text(report)),
            OutputFormat::Json => {
                let mut line = serde_json::to_string(report)
                    .map_err(|err| KeyscopeError::Write(io::Error::from(err)))?;
                line.push('\n');
                Ok(line)
            }
        }
    }
}

impl<W: Write> ReportSink for Reporter<W> {
    fn report(&mut self, report: &Report) -> KeyscopeResult<()> {
        let rendered = self.render(report)?;
        self.out
            .write_all(rendered.as_bytes())
            .map_err(KeyscopeError::Write)?;
        self.out.flush().map_err(KeyscopeError::Write)
    }
}

/// Render a report as the human-readable lines.
pub fn render_text(report: &Report) -> String {
    match report {
        Report::Ready { mode, pid } => {
            let mut text = String::new();
            if mode.is_continuous() {
                text.push('\n');
                text.push_str(
                    "To terminate this program type \"exit\" or \"quit\" in this window\n",
                );
                let _ = writeln!(text, "or \"kill {pid}\" in another window");
                text.push('\n');
            }
            text.push_str("Press a key\n\n");
            text
        }
        Report::Key(record) => render_key(record),
        Report::ExitRequested => "\nExiting at your request.\n".to_string(),
        Report::Anomaly { value } => {
            format!("\nUnexpected wide character from input source: {value} / 0x{value:x}\n")
        }
        Report::Signal { number, name, .. } => {
            format!("\nSignal #{number} ({name}) received\n\n")
        }
    }
}

fn render_key(record: &KeyRecord) -> String {
    let elapsed = Elapsed {
        delay_us: record.delay_us,
        pause: record.pause,
    };
    let mut text = String::new();
    if elapsed.pause {
        text.push('\n');
    }
    let _ = writeln!(text, "{}{}", elapsed.field(), classify(record.dec));
    if let Some(name) = &record.sequence {
        let _ = writeln!(text, "Sequence matches bind key name \"{name}\"");
    }
    text
}
