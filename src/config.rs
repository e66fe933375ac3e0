//! Startup configuration.
//!
//! A [`Config`] comes from an rc file (TOML, or JSON when the file ends in
//! `.json`). Command-line [`Overrides`] are layered on top, and the result is
//! turned into a ready-to-run [`Session`]. Every failure here happens before
//! the terminal is touched.
//!
//! # Example
//!
//! ```toml
//! query_execution_delay_ms = 80
//! initial_filter = "SmartCase"
//! buffer_size = 10000
//! prompt = "FILTER>"
//! trace_level = "debug"
//! theme = "linesift-light"
//! layout = "bottom-up"
//!
//! [keymap]
//! "C-j" = "Finish"
//!
//! [custom_filter.grep]
//! cmd = "grep"
//! args = ["--line-buffered", "$QUERY"]
//! buffer_threshold = 100
//! ```

use crate::app::{CtxOptions, InputSource, Session, DEFAULT_PROMPT};
use crate::domain::{LinesiftError, Result};
use crate::filter::{ExternalCmdFilter, FilterSet};
use crate::infrastructure::paths;
use crate::ui::{Layout, Theme};
use crate::worker::Keymap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Default debounce window in milliseconds.
pub const DEFAULT_QUERY_EXECUTION_DELAY_MS: u64 = 50;

/// Settings read from the rc file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Debounce window between the last edit and the filter run. `0` runs
    /// every edit immediately.
    pub query_execution_delay_ms: u64,

    /// Filter selected at startup. Default: `IgnoreCase`
    pub initial_filter: Option<String>,

    /// Line store capacity; `0` keeps every line.
    pub buffer_size: usize,

    /// Prompt shown before the query.
    pub prompt: String,

    /// Log level used when `RUST_LOG` is unset.
    ///
    /// Options: `trace`, `debug`, `info`, `warn`, `error`. Default: `"info"`
    pub trace_level: Option<String>,

    /// Built-in theme name or path to a TOML theme file.
    pub theme: Option<String>,

    /// `top-down` or `bottom-up`. Default: `top-down`
    pub layout: Option<Layout>,

    /// Key name to action name; see [`Keymap`].
    pub keymap: BTreeMap<String, String>,

    /// User-defined filters backed by external commands, by name.
    pub custom_filter: BTreeMap<String, CustomFilterConfig>,
}

/// One `[custom_filter.<name>]` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CustomFilterConfig {
    /// Program to run.
    pub cmd: String,
    /// Arguments; `$QUERY` is replaced by the query.
    #[serde(default)]
    pub args: Vec<String>,
    /// Lines per process; `0` sends every line to one process.
    #[serde(default)]
    pub buffer_threshold: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            query_execution_delay_ms: DEFAULT_QUERY_EXECUTION_DELAY_MS,
            initial_filter: None,
            buffer_size: 0,
            prompt: DEFAULT_PROMPT.to_string(),
            trace_level: None,
            theme: None,
            layout: None,
            keymap: BTreeMap::new(),
            custom_filter: BTreeMap::new(),
        }
    }
}

/// Values given on the command line; each one beats the rc file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub buffer_size: Option<usize>,
    pub initial_filter: Option<String>,
    pub prompt: Option<String>,
    pub query: Option<String>,
    pub null: bool,
    pub initial_index: usize,
    pub layout: Option<Layout>,
}

impl Config {
    /// Parses an rc file, picking the format from its extension.
    ///
    /// # Errors
    ///
    /// Returns [`LinesiftError::Config`] if the file cannot be read or parsed,
    /// including when it contains unknown keys.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|e| LinesiftError::Config(format!("{}: {e}", path.display())))?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let parsed = if is_json {
            serde_json::from_str(&contents).map_err(|e| e.to_string())
        } else {
            toml::from_str(&contents).map_err(|e| e.to_string())
        };

        parsed.map_err(|e| LinesiftError::Config(format!("{}: {e}", path.display())))
    }

    /// Loads `explicit` if given, else the default rc file if one exists,
    /// else the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`LinesiftError::Config`] if the chosen file is unreadable or
    /// malformed.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit.map(Path::to_path_buf).or_else(paths::find_rc_file) {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading rc file");
                Self::from_file(path)
            }
            None => Ok(Self::default()),
        }
    }

    /// Builds the filter registry: built-ins, then custom filters in name
    /// order, with the current filter picked by config then `cli_initial`.
    ///
    /// # Errors
    ///
    /// Returns [`LinesiftError::DuplicateFilter`] if a custom filter reuses a
    /// registered name, or [`LinesiftError::UnknownFilter`] for an unknown
    /// initial filter.
    pub fn build_filters(&self, cli_initial: Option<&str>) -> Result<FilterSet> {
        let mut filters = FilterSet::with_builtins();
        for (name, custom) in &self.custom_filter {
            filters.add(Arc::new(ExternalCmdFilter::new(
                name.clone(),
                custom.cmd.clone(),
                custom.args.clone(),
                custom.buffer_threshold,
            )))?;
        }
        if let Some(name) = self.initial_filter.as_deref() {
            filters.set_current_by_name(name)?;
        }
        if let Some(name) = cli_initial {
            filters.set_current_by_name(name)?;
        }
        Ok(filters)
    }

    /// Coordinator options with `overrides` applied.
    #[must_use]
    pub fn ctx_options(&self, overrides: &Overrides) -> CtxOptions {
        CtxOptions {
            query_execution_delay: Duration::from_millis(self.query_execution_delay_ms),
            buffer_size: overrides.buffer_size.unwrap_or(self.buffer_size),
            enable_sep: overrides.null,
            initial_index: overrides.initial_index,
            prompt: overrides.prompt.clone().unwrap_or_else(|| self.prompt.clone()),
            ..CtxOptions::default()
        }
    }

    /// Resolves everything a session needs.
    ///
    /// # Errors
    ///
    /// Fails on filter registry errors (see [`Config::build_filters`]), an
    /// unloadable theme or a bad `[keymap]` entry.
    pub fn session(&self, overrides: Overrides, source: InputSource) -> Result<Session> {
        let filters = self.build_filters(overrides.initial_filter.as_deref())?;
        let theme = Theme::resolve(self.theme.as_deref())?;
        let keymap = Keymap::new(&self.keymap)?;

        Ok(Session {
            options: self.ctx_options(&overrides),
            filters,
            source,
            layout: overrides.layout.or(self.layout).unwrap_or_default(),
            initial_query: overrides.query,
            theme,
            keymap,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn write_rc(suffix: &str, body: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        write!(file, "{body}").unwrap();
        file
    }

    #[test]
    fn toml_rc_file() {
        let rc = write_rc(
            ".toml",
            r#"
            query_execution_delay_ms = 100
            initial_filter = "Regexp"

            [custom_filter.grep]
            cmd = "grep"
            args = ["$QUERY"]
            "#,
        );
        let config = Config::from_file(rc.path()).unwrap();
        assert_eq!(config.query_execution_delay_ms, 100);
        assert_eq!(config.prompt, DEFAULT_PROMPT);
        assert_eq!(config.custom_filter["grep"].buffer_threshold, 0);

        let filters = config.build_filters(None).unwrap();
        assert_eq!(filters.current().name(), "Regexp");
        assert_eq!(filters.names().last().map(String::as_str), Some("grep"));
    }

    #[test]
    fn json_rc_file() {
        let rc = write_rc(".json", r#"{ "buffer_size": 3, "prompt": "P>" }"#);
        let config = Config::from_file(rc.path()).unwrap();
        assert_eq!(config.buffer_size, 3);
        assert_eq!(config.prompt, "P>");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let rc = write_rc(".toml", "colour = \"red\"\n");
        assert!(matches!(Config::from_file(rc.path()), Err(LinesiftError::Config(_))));
    }

    #[test]
    fn cli_beats_config() {
        let config = Config {
            initial_filter: Some("Fuzzy".into()),
            buffer_size: 10,
            ..Config::default()
        };
        let overrides = Overrides {
            buffer_size: Some(20),
            prompt: Some(">>".into()),
            null: true,
            ..Overrides::default()
        };

        let options = config.ctx_options(&overrides);
        assert_eq!(options.buffer_size, 20);
        assert_eq!(options.prompt, ">>");
        assert!(options.enable_sep);

        let filters = config.build_filters(Some("SmartCase")).unwrap();
        assert_eq!(filters.current().name(), "SmartCase");
    }

    #[test]
    fn layout_comes_from_cli_then_config() {
        let rc = write_rc(".toml", "layout = \"bottom-up\"\n");
        let config = Config::from_file(rc.path()).unwrap();
        assert_eq!(config.layout, Some(Layout::BottomUp));

        let session = config.session(Overrides::default(), InputSource::Stdin).unwrap();
        assert_eq!(session.layout, Layout::BottomUp);

        let overrides = Overrides {
            layout: Some(Layout::TopDown),
            ..Overrides::default()
        };
        let session = config.session(overrides, InputSource::Stdin).unwrap();
        assert_eq!(session.layout, Layout::TopDown);

        let default = Config::default().session(Overrides::default(), InputSource::Stdin);
        assert_eq!(default.unwrap().layout, Layout::TopDown);
    }

    #[test]
    fn unknown_layout_in_rc_file_fails() {
        let rc = write_rc(".toml", "layout = \"sideways\"\n");
        assert!(matches!(Config::from_file(rc.path()), Err(LinesiftError::Config(_))));
    }

    #[test]
    fn keymap_table_is_validated() {
        let rc = write_rc(
            ".toml",
            r#"
            [keymap]
            "C-j" = "Finish"
            "#,
        );
        let config = Config::from_file(rc.path()).unwrap();
        assert_eq!(config.keymap["C-j"], "Finish");
        assert!(config.session(Overrides::default(), InputSource::Stdin).is_ok());

        let mut bad = config;
        bad.keymap.insert("C-k".into(), "Explode".into());
        assert!(matches!(
            bad.session(Overrides::default(), InputSource::Stdin),
            Err(LinesiftError::Config(_))
        ));
    }

    #[test]
    fn unknown_initial_filter_fails() {
        let config = Config::default();
        let err = config.build_filters(Some("Foo")).unwrap_err();
        assert_eq!(err.to_string(), "unknown filter: 'Foo'");
    }

    #[test]
    fn custom_filter_cannot_shadow_builtin() {
        let mut config = Config::default();
        config.custom_filter.insert(
            "Fuzzy".into(),
            CustomFilterConfig {
                cmd: "fzf".into(),
                args: vec![],
                buffer_threshold: 0,
            },
        );
        assert!(matches!(
            config.build_filters(None),
            Err(LinesiftError::DuplicateFilter(_))
        ));
    }
}
