//! Command-line entry point.
//!
//! # Startup
//!
//! 1. **Parse** flags with `clap`
//! 2. **Configure**: load the rc file, initialize logging, resolve filters
//!    and theme (any failure exits before the terminal is touched)
//! 3. **Run** the interactive session
//! 4. **Emit** the picked lines on standard output, one per line
//!
//! # Exit Status
//!
//! - `0`: lines were picked (possibly none)
//! - `1`: canceled, bad configuration, or an I/O failure
//! - `128 + N`: terminated by signal `N`

#![allow(clippy::multiple_crate_versions)]

use clap::Parser;
use linesift::cli::Cli;
use linesift::observability::init_tracing;
use linesift::{Config, LinesiftError, Result};
use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(lines) => match emit(&lines) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => report(&LinesiftError::Io(e)),
        },
        Err(e) => report(&e),
    }
}

fn run(cli: &Cli) -> Result<Vec<String>> {
    let config = Config::load(cli.rcfile.as_deref())?;
    init_tracing(config.trace_level.as_deref());
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "linesift starting");

    let source = cli.input_source()?;
    let session = config.session(cli.overrides(), source)?;
    linesift::run(session)
}

fn emit(lines: &[String]) -> io::Result<()> {
    let mut out = BufWriter::new(io::stdout().lock());
    for line in lines {
        out.write_all(line.as_bytes())?;
        if !line.ends_with('\n') {
            out.write_all(b"\n")?;
        }
    }
    out.flush()
}

fn report(err: &LinesiftError) -> ExitCode {
    let code = err.exit_code();
    match err {
        LinesiftError::Canceled => tracing::debug!("canceled by user"),
        _ => {
            tracing::error!(error = %err, "linesift failed");
            eprintln!("linesift: {err}");
        }
    }
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}
