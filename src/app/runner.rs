//! Session wiring: starts every loop, owns the terminal and collects the
//! outcome.
//!
//! # Startup order
//!
//! 1. Open the input source (fails before anything else is started).
//! 2. Start the signal, reader, watcher and filter loops.
//! 3. Wait for the first line (or end of input).
//! 4. Apply the initial query.
//! 5. Take over the terminal and start the input and view loops.
//!
//! The terminal is restored before [`run`] returns, so callers can print
//! results and errors normally.

use super::ctx::{Ctx, CtxOptions};
use crate::domain::{LinesiftError, Result};
use crate::filter::FilterSet;
use crate::ui::{open_tty, view_loop, Layout, TerminalGuard, Theme, ViewStyle};
use crate::worker::{filter_loop, input_loop, reader_loop, signal_loop, watcher_loop, Keymap};
use crossbeam_channel::select;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use std::sync::Arc;

/// Where lines are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// A file on disk.
    File(PathBuf),
    /// Standard input.
    Stdin,
}

impl InputSource {
    /// Opens the source for line reading.
    ///
    /// # Errors
    ///
    /// Returns [`LinesiftError::Io`] if the file cannot be opened.
    pub fn open(&self) -> Result<Box<dyn BufRead + Send>> {
        match self {
            Self::File(path) => {
                let file = File::open(path).map_err(|e| {
                    LinesiftError::Io(io::Error::new(e.kind(), format!("{}: {e}", path.display())))
                })?;
                Ok(Box::new(BufReader::new(file)))
            }
            Self::Stdin => Ok(Box::new(BufReader::new(io::stdin()))),
        }
    }
}

/// Everything needed to run one interactive session.
#[derive(Debug)]
pub struct Session {
    pub options: CtxOptions,
    pub filters: FilterSet,
    pub source: InputSource,
    /// Query typed in before the first frame.
    pub initial_query: Option<String>,
    pub theme: Theme,
    pub layout: Layout,
    pub keymap: Keymap,
}

/// Runs a session to completion and returns the lines to emit.
///
/// # Errors
///
/// Returns the session's terminal error: [`LinesiftError::Canceled`] when the
/// user quits without picking, [`LinesiftError::Signal`] on SIGINT/SIGTERM,
/// or the I/O error that ended it.
pub fn run(session: Session) -> Result<Vec<String>> {
    let Session {
        options,
        filters,
        source,
        initial_query,
        theme,
        layout,
        keymap,
    } = session;

    let reader = source.open()?;
    let ctx = Ctx::new(options, filters);
    tracing::info!(source = ?source, layout = %layout, "session starting");

    if let Err(e) = start_background(&ctx, reader) {
        ctx.exit_with(e);
        return finish(&ctx);
    }

    select! {
        recv(ctx.input_ready_rx()) -> _ => {}
        recv(ctx.hub().stop_rx()) -> _ => return finish(&ctx),
    }

    if let Some(query) = initial_query.filter(|q| !q.is_empty()) {
        ctx.set_query(&query);
        ctx.exec_query();
    }

    let guard = match TerminalGuard::enter() {
        Ok(guard) => guard,
        Err(e) => {
            ctx.exit_with(LinesiftError::Io(e));
            return finish(&ctx);
        }
    };

    let style = ViewStyle { theme, layout };
    let started = ctx
        .spawn_loop("input", move |ctx| input_loop(ctx, &keymap))
        .and_then(|()| ctx.spawn_loop("view", move |ctx| view_loop(ctx, open_tty(), style)));
    if let Err(e) = started {
        ctx.exit_with(e);
    }

    ctx.wait_done();
    drop(guard);
    finish(&ctx)
}

fn start_background(ctx: &Arc<Ctx>, reader: Box<dyn BufRead + Send>) -> Result<()> {
    ctx.spawn_loop("signal", signal_loop)?;
    ctx.spawn_loop("reader", move |ctx| reader_loop(ctx, reader))?;
    ctx.spawn_loop("watcher", watcher_loop)?;
    ctx.spawn_loop("filter", filter_loop)
}

fn finish(ctx: &Ctx) -> Result<Vec<String>> {
    ctx.wait_done();
    match ctx.take_error() {
        Some(err) => {
            tracing::info!(error = %err, "session ended with error");
            Err(err)
        }
        None => {
            let lines = ctx.take_result().unwrap_or_default();
            tracing::info!(count = lines.len(), "session finished");
            Ok(lines)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};

    #[test]
    fn opens_files_and_reports_missing_ones() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "alpha\nbeta").unwrap();

        let mut text = String::new();
        InputSource::File(file.path().to_path_buf())
            .open()
            .unwrap()
            .read_to_string(&mut text)
            .unwrap();
        assert_eq!(text, "alpha\nbeta\n");

        let missing = InputSource::File("/nonexistent/linesift-input".into()).open();
        assert!(matches!(missing, Err(LinesiftError::Io(_))));
    }
}
