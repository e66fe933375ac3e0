//! Command-line interface.

use crate::app::InputSource;
use crate::config::Overrides;
use crate::domain::{LinesiftError, Result};
use crate::ui::Layout;
use clap::Parser;
use std::io::{self, IsTerminal};
use std::path::PathBuf;

/// Interactively filter lines from a file or standard input.
///
/// Selected lines are printed to standard output.
#[derive(Debug, Clone, Parser)]
#[command(name = "linesift", version)]
pub struct Cli {
    /// Keep at most NUM input lines (0 keeps everything)
    #[arg(short = 'b', long, value_name = "NUM")]
    pub buffer_size: Option<usize>,

    /// Filter to start with (IgnoreCase, CaseSensitive, SmartCase, Regexp, Fuzzy or a custom filter)
    #[arg(long, value_name = "NAME")]
    pub initial_filter: Option<String>,

    /// Deprecated alias of --initial-filter
    #[arg(long, value_name = "NAME", hide = true)]
    pub initial_matcher: Option<String>,

    /// Prompt shown before the query
    #[arg(long, value_name = "TEXT")]
    pub prompt: Option<String>,

    /// Initial query
    #[arg(long, value_name = "QUERY")]
    pub query: Option<String>,

    /// Split each line on NUL: show the part before it, print the part after it
    #[arg(long)]
    pub null: bool,

    /// Screen layout: top-down or bottom-up
    #[arg(long, value_name = "LAYOUT")]
    pub layout: Option<Layout>,

    /// Row the cursor starts on
    #[arg(long, value_name = "ROW", default_value_t = 0)]
    pub initial_index: usize,

    /// Path to the rc file
    #[arg(long, value_name = "PATH")]
    pub rcfile: Option<PathBuf>,

    /// File to read; standard input when omitted
    pub file: Option<PathBuf>,
}

impl Cli {
    /// The initial filter, falling back to the deprecated alias.
    #[must_use]
    pub fn initial_filter(&self) -> Option<&str> {
        self.initial_filter
            .as_deref()
            .or(self.initial_matcher.as_deref())
    }

    #[must_use]
    pub fn overrides(&self) -> Overrides {
        Overrides {
            buffer_size: self.buffer_size,
            initial_filter: self.initial_filter().map(str::to_string),
            prompt: self.prompt.clone(),
            query: self.query.clone(),
            null: self.null,
            initial_index: self.initial_index,
            layout: self.layout,
        }
    }

    /// The file argument, else standard input when it is piped.
    ///
    /// # Errors
    ///
    /// Returns [`LinesiftError::NoInput`] when no file is given and standard
    /// input is a terminal.
    pub fn input_source(&self) -> Result<InputSource> {
        self.input_source_with(io::stdin().is_terminal())
    }

    fn input_source_with(&self, stdin_is_tty: bool) -> Result<InputSource> {
        match &self.file {
            Some(path) => Ok(InputSource::File(path.clone())),
            None if !stdin_is_tty => Ok(InputSource::Stdin),
            None => Err(LinesiftError::NoInput),
        }
    }
}
