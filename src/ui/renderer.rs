//! Paints a [`ScreenModel`] with `crossterm` commands.
//!
//! Every function queues commands on the writer; [`render`] and
//! [`render_prompt_only`] flush once at the end so a frame reaches the
//! terminal in one write. The prompt is painted last so the hardware cursor
//! ends up on the caret. Screen lines come from the [`Layout`].

use super::helpers::{clip, visible_segments};
use super::layout::Layout;
use super::theme::Theme;
use super::viewmodel::{PromptLine, RowModel, ScreenModel, CHROME_ROWS};
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::queue;
use crossterm::style::{
    Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
};
use crossterm::terminal::{Clear, ClearType};
use std::io::{self, Write};

/// Terminal size in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub width: usize,
    pub height: usize,
}

fn cell(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

/// Paints a full frame.
///
/// # Errors
///
/// Returns any error from writing to `out`.
pub fn render<W: Write>(
    out: &mut W,
    vm: &ScreenModel,
    status: Option<&str>,
    theme: &Theme,
    size: Size,
    layout: Layout,
) -> io::Result<()> {
    queue!(out, Hide)?;
    let per_page = size.height.saturating_sub(CHROME_ROWS);
    for i in 0..per_page {
        queue!(
            out,
            MoveTo(0, cell(layout.result_line(i, size.height))),
            Clear(ClearType::CurrentLine)
        )?;
        if let Some(row) = vm.rows.get(i) {
            render_row(out, row, vm.col, theme, size.width)?;
        }
    }
    render_status(out, status, theme, size)?;
    render_prompt(out, &vm.prompt, theme, size.width, layout.prompt_line(size.height))?;
    out.flush()
}

/// Repaints only the prompt line.
///
/// # Errors
///
/// Returns any error from writing to `out`.
pub fn render_prompt_only<W: Write>(
    out: &mut W,
    prompt: &PromptLine,
    theme: &Theme,
    size: Size,
    layout: Layout,
) -> io::Result<()> {
    queue!(out, Hide)?;
    render_prompt(out, prompt, theme, size.width, layout.prompt_line(size.height))?;
    out.flush()
}

/// Repaints only the status line.
///
/// # Errors
///
/// Returns any error from writing to `out`.
pub fn render_status_only<W: Write>(
    out: &mut W,
    status: Option<&str>,
    theme: &Theme,
    size: Size,
) -> io::Result<()> {
    render_status(out, status, theme, size)?;
    out.flush()
}

fn render_prompt<W: Write>(
    out: &mut W,
    prompt: &PromptLine,
    theme: &Theme,
    width: usize,
    line: usize,
) -> io::Result<()> {
    let y = cell(line);
    let colors = &theme.colors;
    let head = format!("{} ", prompt.prompt);
    let head_len = head.chars().count();
    let indicator = prompt.indicator();
    let indicator_len = indicator.chars().count();

    queue!(
        out,
        MoveTo(0, y),
        Clear(ClearType::CurrentLine),
        SetForegroundColor(Theme::color(&colors.prompt_fg)),
        Print(clip(&head, width)),
        SetForegroundColor(Theme::color(&colors.query_fg)),
        Print(clip(&prompt.query, width.saturating_sub(head_len))),
    )?;

    let query_len = prompt.query.chars().count();
    if head_len + query_len + 1 + indicator_len <= width {
        queue!(
            out,
            MoveTo(cell(width - indicator_len), y),
            SetForegroundColor(Theme::color(&colors.text_dim)),
            Print(&indicator),
        )?;
    }

    let caret = (head_len + prompt.caret).min(width.saturating_sub(1));
    queue!(out, ResetColor, MoveTo(cell(caret), y), Show)
}

fn render_row<W: Write>(out: &mut W, row: &RowModel, col: usize, theme: &Theme, width: usize) -> io::Result<()> {
    let colors = &theme.colors;
    let (fg, bg) = if row.is_cursor {
        (Theme::color(&colors.cursor_fg), Theme::color(&colors.cursor_bg))
    } else if row.is_selected {
        (Theme::color(&colors.selection_fg), Theme::color(&colors.selection_bg))
    } else {
        (Theme::color(&colors.text_normal), Color::Reset)
    };

    if theme.is_monochrome() {
        if row.is_cursor {
            queue!(out, SetAttribute(Attribute::Reverse))?;
        } else if row.is_selected {
            queue!(out, SetAttribute(Attribute::Underlined))?;
        }
    }

    queue!(out, SetForegroundColor(fg), SetBackgroundColor(bg))?;
    let mut painted = 0;
    for segment in visible_segments(&row.text, &row.ranges, col, width) {
        painted += segment.text.chars().count();
        if segment.highlighted {
            queue!(
                out,
                SetAttribute(Attribute::Bold),
                SetForegroundColor(Theme::color(&colors.match_highlight_fg)),
            )?;
            if let Some(hl_bg) = colors.match_highlight_bg.as_ref() {
                queue!(out, SetBackgroundColor(Theme::color(hl_bg)))?;
            }
            queue!(
                out,
                Print(segment.text),
                SetAttribute(Attribute::NormalIntensity),
                SetForegroundColor(fg),
                SetBackgroundColor(bg),
            )?;
        } else {
            queue!(out, Print(segment.text))?;
        }
    }

    // Cursor and selection colors span the whole row.
    if row.is_cursor || row.is_selected {
        queue!(out, Print(" ".repeat(width.saturating_sub(painted))))?;
    }
    queue!(out, SetAttribute(Attribute::Reset), ResetColor)
}

fn render_status<W: Write>(out: &mut W, status: Option<&str>, theme: &Theme, size: Size) -> io::Result<()> {
    if size.height < CHROME_ROWS {
        return Ok(());
    }
    queue!(out, MoveTo(0, cell(size.height - 1)), Clear(ClearType::CurrentLine))?;
    if let Some(text) = status {
        queue!(
            out,
            SetForegroundColor(Theme::color(&theme.colors.status_fg)),
            Print(clip(text, size.width)),
            ResetColor,
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::PageInfo;

    fn model() -> ScreenModel {
        ScreenModel {
            prompt: PromptLine {
                prompt: "QUERY>".into(),
                query: "app".into(),
                caret: 3,
                filter: "IgnoreCase".into(),
                page: PageInfo {
                    page: 1,
                    offset: 0,
                    per_page: 3,
                    total: 2,
                    max_page: 1,
                },
                range_mode: false,
            },
            rows: vec![
                RowModel {
                    text: "apple".into(),
                    ranges: vec![(0, 3)],
                    is_cursor: true,
                    is_selected: false,
                },
                RowModel {
                    text: "Apple Pie".into(),
                    ranges: vec![(0, 3)],
                    is_cursor: false,
                    is_selected: true,
                },
            ],
            col: 0,
        }
    }

    #[test]
    fn frame_contains_prompt_rows_and_status() {
        let mut out = Vec::new();
        let size = Size { width: 40, height: 5 };
        render(&mut out, &model(), Some("hello"), &Theme::default(), size, Layout::TopDown).unwrap();
        let text = String::from_utf8_lossy(&out);
        for needle in ["QUERY> ", "app", "le", " Pie", "hello", "IgnoreCase [1/1]"] {
            assert!(text.contains(needle), "missing {needle:?}");
        }
    }

    #[test]
    fn narrow_terminal_drops_indicator() {
        let mut out = Vec::new();
        let vm = model();
        let size = Size { width: 12, height: 5 };
        render_prompt_only(&mut out, &vm.prompt, &Theme::monochrome(), size, Layout::TopDown).unwrap();
        let text = String::from_utf8_lossy(&out);
        assert!(text.contains("QUERY> "));
        assert!(!text.contains("IgnoreCase"));
    }

    #[test]
    fn bottom_up_puts_prompt_above_status_and_first_row_above_prompt() {
        let mut out = Vec::new();
        let size = Size { width: 40, height: 5 };
        render(&mut out, &model(), None, &Theme::monochrome(), size, Layout::BottomUp).unwrap();
        let text = String::from_utf8_lossy(&out);

        // CSI row;col H, one-based.
        let at = |line: usize| text.find(&format!("\x1b[{};1H", line + 1)).unwrap();
        assert!(text[at(3)..].contains("QUERY> "));
        let (first_row, second_row) = (at(2), at(1));
        assert!(first_row < second_row);
        assert!(text[first_row..second_row].contains("le"));
        assert!(text[second_row..].contains(" Pie"));
    }
}
