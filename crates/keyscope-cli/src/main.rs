//! keyscope CLI: show the raw bytes a terminal sends for each key press.
//!
//! Reads stdin in raw mode and reports every byte with its numeric forms,
//! control-character name, inter-byte delay and any named key sequence it
//! completes.

// CLI-specific lint allowances (CLI binary, not library)
#![allow(missing_docs)]
#![allow(clippy::print_stdout)] // CLI must print to stdout
#![allow(clippy::print_stderr)] // CLI must print to stderr
#![allow(clippy::exit)] // CLI uses exit codes

use clap::{CommandFactory, Parser, ValueEnum};
use clap_complete::{generate, Shell};
use keyscope::keymap::KeyMap;
use keyscope::model::{OutputFormat, SessionMode};
use keyscope::session::{self, SessionConfig};
use keyscope::KeyscopeError;
use miette::Result;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Color output mode
#[derive(Copy, Clone, Debug, Default, ValueEnum)]
enum ColorMode {
    /// Auto-detect based on terminal and `NO_COLOR` env
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

#[derive(Debug, Parser)]
#[command(
    name = "keyscope",
    version,
    about = "Show the raw bytes, timings and key names a terminal sends"
)]
struct Cli {
    /// Keep reading until "exit" or "quit" is typed
    #[arg(short = 'c', long)]
    continuous: bool,

    /// Log verbosity: 0 off, 1 error, 2 warn, 3 info, 4 debug, 5 and up trace
    #[arg(
        short = 'd',
        long,
        value_name = "LEVEL",
        default_value_t = 1,
        value_parser = clap::value_parser!(u8).range(0..=10)
    )]
    debug_level: u8,

    /// Backtrace frames to log with anomalies and errors (trace level only)
    #[arg(
        short = 'D',
        long,
        value_name = "FRAMES",
        value_parser = clap::value_parser!(u8).range(1..=128)
    )]
    debug_stack_frames: Option<u8>,

    /// Extra named key sequences (JSON or YAML)
    #[arg(long, value_name = "FILE")]
    keymap: Option<PathBuf>,

    /// Emit one JSON object per report instead of text
    #[arg(long)]
    json: bool,

    /// How long a single-key session waits for the rest of a sequence
    #[arg(
        long,
        value_name = "MS",
        default_value_t = 300,
        value_parser = clap::value_parser!(u64).range(1..=10_000)
    )]
    escape_timeout: u64,

    /// Print shell completions and exit
    #[arg(long, value_name = "SHELL", value_enum)]
    completions: Option<Shell>,

    /// Control color output
    #[arg(long, value_enum, default_value = "auto")]
    color: ColorMode,

    #[arg(hide = true)]
    extra: Vec<String>,
}

fn configure_colors(mode: ColorMode) {
    let use_color = match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => {
            if std::env::var_os("NO_COLOR").is_some() {
                false
            } else {
                // Diagnostics go to stderr.
                supports_color::on(supports_color::Stream::Stderr).is_some()
            }
        }
    };

    miette::set_hook(Box::new(move |_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .color(use_color)
                .unicode(use_color)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set
}

/// Map `--debug-level` onto a tracing level filter.
fn level_filter(debug_level: u8) -> LevelFilter {
    match debug_level {
        0 => LevelFilter::OFF,
        1 => LevelFilter::ERROR,
        2 => LevelFilter::WARN,
        3 => LevelFilter::INFO,
        4 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

fn init_logging(debug_level: u8) {
    let filter = EnvFilter::builder()
        .with_default_directive(level_filter(debug_level).into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .compact()
        .init();
}

fn cmd_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}

fn session_config(cli: &Cli) -> Result<SessionConfig, KeyscopeError> {
    let mut keymap = KeyMap::builtin();
    if let Some(path) = &cli.keymap {
        keymap.merge(KeyMap::load(path)?);
    }
    Ok(SessionConfig {
        mode: if cli.continuous {
            SessionMode::Continuous
        } else {
            SessionMode::Single
        },
        format: if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        },
        escape_timeout: Duration::from_millis(cli.escape_timeout),
        keymap,
        backtrace_frames: cli.debug_stack_frames.map_or(0, usize::from),
    })
}

fn main() -> Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // --help and --version land here too.
            let _ = err.print();
            std::process::exit(i32::from(err.use_stderr()));
        }
    };
    configure_colors(cli.color);

    if let Some(shell) = cli.completions {
        cmd_completions(shell);
        return Ok(());
    }
    if !cli.extra.is_empty() {
        eprintln!("Expected no arguments, got {}", cli.extra.len());
        std::process::exit(1);
    }

    init_logging(cli.debug_level);
    let config = session_config(&cli)?;
    tracing::debug!(
        mode = ?config.mode,
        format = ?config.format,
        sequences = config.keymap.len(),
        "starting session"
    );
    let outcome = session::run(config)?;
    tracing::debug!(?outcome, "session ended");
    Ok(())
}
