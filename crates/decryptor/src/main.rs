//! `kots-decryptor` — CLI entry point.
//!
//! Startup sequence:
//! 1. Load and validate [`config::Config`] from environment variables.
//! 2. Initialise structured JSON logging on stderr.
//! 3. Parse arguments, run the command, and map failures to exit codes.

mod cli;
mod commands;
mod config;
mod error;
mod telemetry;

use std::io::Write;
use std::process::ExitCode;

/// Exit code for startup failures (configuration, telemetry, stdout).
const EXIT_FAILURE: u8 = 2;

fn main() -> ExitCode {
    // -----------------------------------------------------------------------
    // 1. Configuration
    // -----------------------------------------------------------------------
    let cfg = match config::Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            // Telemetry is not yet up; write to stderr directly.
            eprintln!("ERROR: kots-decryptor configuration invalid: {e:#}");
            return ExitCode::from(EXIT_FAILURE);
        }
    };

    // -----------------------------------------------------------------------
    // 2. Telemetry
    // -----------------------------------------------------------------------
    if let Err(e) = telemetry::init(&cfg) {
        eprintln!("ERROR: {e:#}");
        return ExitCode::from(EXIT_FAILURE);
    }

    // -----------------------------------------------------------------------
    // 3. Command
    // -----------------------------------------------------------------------
    let result = cli::parse(std::env::args_os()).and_then(|cmd| commands::execute(&cmd));

    let (output, code) = match result {
        Ok(bytes) => (bytes, 0),
        Err(e) => (e.to_string().into_bytes(), e.exit_code()),
    };

    if let Err(e) = write_line(&output) {
        tracing::error!(error = %e, "failed to write to stdout");
        return ExitCode::from(EXIT_FAILURE);
    }

    ExitCode::from(code)
}

/// Write `bytes` plus a trailing newline to stdout. Plaintext is written as-is,
/// even when it is not valid UTF-8.
fn write_line(bytes: &[u8]) -> std::io::Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(bytes)?;
    stdout.write_all(b"\n")?;
    stdout.flush()
}
