//! Shared rendering utilities.
//!
//! Match ranges are byte offsets into the display text; the screen is
//! addressed in characters. [`visible_segments`] bridges the two: it applies
//! the horizontal scroll and width clip, then splits what is left into
//! highlighted and plain runs.

use crate::domain::MatchRange;

/// A run of text and whether it lies inside a match range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Text to print.
    pub text: String,
    /// `true` inside a match range.
    pub highlighted: bool,
}

/// Splits the part of `text` visible after skipping `col` characters and
/// keeping at most `width` into highlighted and plain runs.
///
/// Control characters are shown as spaces so they cannot move the cursor.
#[must_use]
pub fn visible_segments(text: &str, ranges: &[MatchRange], col: usize, width: usize) -> Vec<Segment> {
    let mut segments: Vec<Segment> = Vec::new();
    for (at, ch) in text.char_indices().skip(col).take(width) {
        let highlighted = ranges.iter().any(|&(start, end)| start <= at && at < end);
        let ch = if ch.is_control() { ' ' } else { ch };
        match segments.last_mut() {
            Some(last) if last.highlighted == highlighted => last.text.push(ch),
            _ => segments.push(Segment {
                text: ch.to_string(),
                highlighted,
            }),
        }
    }
    segments
}

/// Clips `text` to `width` characters.
#[must_use]
pub fn clip(text: &str, width: usize) -> String {
    text.chars().take(width).collect()
}
