//! Strategy that delegates matching to an external process.
//!
//! Candidate display texts are piped to the command's stdin, one per line,
//! and every line it prints is resolved back to the first unused candidate
//! with the same text. Lines the command invents are ignored, so identity
//! (and therefore selection) always refers to ingested lines.
//!
//! With `buffer_threshold > 0` candidates are fed in batches of at most that
//! many lines, one process per batch, and a batch is only started when the
//! previous one's matches have been consumed. `buffer_threshold == 0` hands
//! every candidate to a single process. Output order is the command's order
//! within a batch and batch order across batches.

use super::{MatchIter, QueryFilterer};
use crate::domain::{LinesiftError, MatchedLine, RawLine, Result};
use std::collections::{HashMap, VecDeque};
use std::io::{BufRead, BufReader, Write};
use std::process::{Command, Stdio};
use std::sync::Arc;
use std::thread;

/// Argument placeholder replaced by the query text.
pub const QUERY_PLACEHOLDER: &str = "$QUERY";

/// A user-defined filter backed by a command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalCmdFilter {
    name: String,
    cmd: String,
    args: Vec<String>,
    buffer_threshold: usize,
}

impl ExternalCmdFilter {
    /// Creates a filter running `cmd args...`.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        cmd: impl Into<String>,
        args: Vec<String>,
        buffer_threshold: usize,
    ) -> Self {
        Self {
            name: name.into(),
            cmd: cmd.into(),
            args,
            buffer_threshold,
        }
    }

    fn args_for(&self, query: &str) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| arg.replace(QUERY_PLACEHOLDER, query))
            .collect()
    }
}

impl QueryFilterer for ExternalCmdFilter {
    fn name(&self) -> &str {
        &self.name
    }

    fn filter(&self, query: &str, lines: Vec<Arc<RawLine>>) -> Result<MatchIter> {
        let batch_size = if self.buffer_threshold == 0 {
            lines.len().max(1)
        } else {
            self.buffer_threshold
        };

        let mut batches = VecDeque::new();
        let mut rest = lines.into_iter().peekable();
        while rest.peek().is_some() {
            batches.push_back(rest.by_ref().take(batch_size).collect::<Vec<_>>());
        }

        tracing::debug!(
            filter = %self.name,
            batches = batches.len(),
            batch_size,
            "external filter planned"
        );

        Ok(Box::new(ExternalMatches {
            cmd: self.cmd.clone(),
            args: self.args_for(query),
            batches,
            pending: VecDeque::new(),
            failed: false,
        }))
    }
}

/// Lazily runs one process per batch as matches are consumed.
struct ExternalMatches {
    cmd: String,
    args: Vec<String>,
    batches: VecDeque<Vec<Arc<RawLine>>>,
    pending: VecDeque<MatchedLine>,
    failed: bool,
}

impl Iterator for ExternalMatches {
    type Item = Result<MatchedLine>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(line) = self.pending.pop_front() {
                return Some(Ok(line));
            }
            if self.failed {
                return None;
            }
            let batch = self.batches.pop_front()?;
            match run_batch(&self.cmd, &self.args, batch) {
                Ok(matched) => self.pending.extend(matched),
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

fn run_batch(cmd: &str, args: &[String], batch: Vec<Arc<RawLine>>) -> Result<Vec<MatchedLine>> {
    let _span = tracing::debug_span!("external_batch", cmd = %cmd, candidates = batch.len()).entered();

    let mut child = Command::new(cmd)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| LinesiftError::ExternalFilter(format!("{cmd}: {e}")))?;

    let mut stdin = child
        .stdin
        .take()
        .ok_or_else(|| LinesiftError::ExternalFilter(format!("{cmd}: stdin unavailable")))?;
    let input: String = batch.iter().fold(String::new(), |mut acc, line| {
        acc.push_str(line.display());
        acc.push('\n');
        acc
    });
    // Commands may fill stdout before draining stdin.
    let feeder = thread::spawn(move || {
        // A command may exit without reading everything (e.g. `head`).
        let _ = stdin.write_all(input.as_bytes());
    });

    // The child is always reaped, even when its output cannot be read.
    let output = match child.stdout.take() {
        Some(stdout) => BufReader::new(stdout)
            .lines()
            .collect::<std::io::Result<Vec<String>>>()
            .map_err(|e| format!("{cmd}: {e}")),
        None => Err(format!("{cmd}: stdout unavailable")),
    };
    if output.is_err() {
        let _ = child.kill();
    }
    let status = child.wait();
    let _ = feeder.join();

    let output = output.map_err(LinesiftError::ExternalFilter)?;
    let status = status.map_err(|e| LinesiftError::ExternalFilter(format!("{cmd}: {e}")))?;

    // Exit status 1 is the grep convention for "nothing matched".
    match status.code() {
        Some(0 | 1) => {}
        Some(code) if !output.is_empty() => {
            tracing::warn!(cmd = %cmd, code, "external filter exited non-zero with output");
        }
        _ => {
            return Err(LinesiftError::ExternalFilter(format!("{cmd}: {status}")));
        }
    }

    Ok(resolve(batch, &output))
}

/// Maps printed lines back to candidates, first unused candidate wins.
fn resolve(batch: Vec<Arc<RawLine>>, output: &[String]) -> Vec<MatchedLine> {
    let mut by_text: HashMap<&str, VecDeque<usize>> = HashMap::new();
    for (i, line) in batch.iter().enumerate() {
        by_text.entry(line.display()).or_default().push_back(i);
    }

    let mut picked = Vec::with_capacity(output.len());
    for printed in output {
        if let Some(i) = by_text.get_mut(printed.as_str()).and_then(VecDeque::pop_front) {
            picked.push(i);
        }
    }

    picked
        .into_iter()
        .map(|i| MatchedLine::new(Arc::clone(&batch[i]), Vec::new()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn raws(texts: &[&str]) -> Vec<Arc<RawLine>> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| Arc::new(RawLine::new(i as u64, *t, false)))
            .collect()
    }

    #[test]
    fn resolves_duplicates_to_distinct_candidates() {
        let batch = raws(&["dup", "other", "dup"]);
        let matched = resolve(batch, &["dup".into(), "dup".into(), "dup".into(), "ghost".into()]);
        let ids: Vec<u64> = matched.iter().map(|m| m.raw().id()).collect();
        assert_eq!(ids, vec![0, 2]);
    }

    #[test]
    fn query_placeholder_is_substituted() {
        let filter = ExternalCmdFilter::new("grep", "grep", vec!["-e".into(), "$QUERY".into()], 0);
        assert_eq!(filter.args_for("foo"), vec!["-e", "foo"]);
    }

    #[cfg(unix)]
    #[test]
    fn batches_through_a_real_process() {
        let filter = ExternalCmdFilter::new("grep", "grep", vec!["--".into(), "$QUERY".into()], 2);
        let got: Vec<String> = filter
            .filter("a", raws(&["apple", "kiwi", "banana", "fig", "grape"]))
            .unwrap()
            .map(|m| m.unwrap().raw().display().to_string())
            .collect();
        assert_eq!(got, vec!["apple", "banana", "grape"]);
    }

    #[cfg(unix)]
    #[test]
    fn exit_status_one_means_no_match_and_others_fail() {
        let candidates = raws(&["x"]);
        let quiet = ExternalCmdFilter::new("none", "sh", vec!["-c".into(), "cat >/dev/null; exit 1".into()], 0);
        assert!(quiet.filter("q", candidates.clone()).unwrap().next().is_none());

        let broken = ExternalCmdFilter::new("broken", "sh", vec!["-c".into(), "cat >/dev/null; exit 2".into()], 0);
        let first = broken.filter("q", candidates).unwrap().next();
        assert!(matches!(first, Some(Err(LinesiftError::ExternalFilter(_)))));
    }

    #[test]
    fn spawn_failure_is_an_external_filter_error() {
        let filter = ExternalCmdFilter::new("nope", "/nonexistent/linesift-filter", vec![], 0);
        let first = filter.filter("x", raws(&["x"])).unwrap().next();
        assert!(matches!(first, Some(Err(LinesiftError::ExternalFilter(_)))));
    }
}
