//! Where the prompt, result rows and status line sit on the screen.
//!
//! | Layout      | Prompt             | Result rows                 | Status    |
//! |-------------|--------------------|-----------------------------|-----------|
//! | `top-down`  | first line         | below the prompt, downwards | last line |
//! | `bottom-up` | next-to-last line  | above the prompt, upwards   | last line |
//!
//! In both layouts the first row of the page is the one next to the prompt.

use crate::domain::LinesiftError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Screen arrangement, picked with `--layout` or the rc file's `layout`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Layout {
    #[default]
    TopDown,
    BottomUp,
}

impl Layout {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::TopDown => "top-down",
            Self::BottomUp => "bottom-up",
        }
    }

    /// Screen line of the prompt on a terminal `height` lines tall.
    #[must_use]
    pub const fn prompt_line(self, height: usize) -> usize {
        match self {
            Self::TopDown => 0,
            Self::BottomUp => height.saturating_sub(2),
        }
    }

    /// Screen line of the `index`-th row of the page.
    #[must_use]
    pub const fn result_line(self, index: usize, height: usize) -> usize {
        match self {
            Self::TopDown => index + 1,
            Self::BottomUp => height.saturating_sub(3 + index),
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Layout {
    type Err = LinesiftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "top-down" => Ok(Self::TopDown),
            "bottom-up" => Ok(Self::BottomUp),
            other => Err(LinesiftError::Config(format!(
                "unknown layout: '{other}' (expected top-down or bottom-up)"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn names_round_trip_and_unknown_fails() {
        for layout in [Layout::TopDown, Layout::BottomUp] {
            assert_eq!(layout.name().parse::<Layout>().unwrap(), layout);
        }
        assert!(matches!("sideways".parse::<Layout>(), Err(LinesiftError::Config(_))));
    }

    #[test]
    fn bottom_up_stacks_rows_above_the_prompt() {
        let height = 6;
        assert_eq!(Layout::BottomUp.prompt_line(height), 4);
        let lines: Vec<usize> = (0..4).map(|i| Layout::BottomUp.result_line(i, height)).collect();
        assert_eq!(lines, vec![3, 2, 1, 0]);

        assert_eq!(Layout::TopDown.prompt_line(height), 0);
        let lines: Vec<usize> = (0..4).map(|i| Layout::TopDown.result_line(i, height)).collect();
        assert_eq!(lines, vec![1, 2, 3, 4]);
    }
}
