//! Key bindings.
//!
//! [`Keymap::default`] is the table below. The rc file's `[keymap]` table
//! rebinds keys on top of it, mapping a key name to an action name:
//!
//! ```toml
//! [keymap]
//! "C-j" = "Finish"
//! "M-n" = "PageDown"
//! "C-r" = "Unbind"
//! ```
//!
//! Key names are a single character or one of `Enter`, `Esc`, `Tab`,
//! `Backspace`, `Delete`, `Left`, `Right`, `Up`, `Down`, `Home`, `End`,
//! `PageUp`, `PageDown`, `Space`, each optionally prefixed by `C-` (control)
//! and/or `M-` (alt). Action names are the [`Event`] variant names; `Unbind`
//! removes the binding.
//!
//! | Key                          | Event                           |
//! |------------------------------|---------------------------------|
//! | printable                    | `Char`                          |
//! | `Enter`                      | `Finish`                        |
//! | `Esc`, `C-c`                 | `Cancel`                        |
//! | `Backspace`, `C-h`           | `Backspace`                     |
//! | `Delete`, `C-d`              | `Delete`                        |
//! | `C-w`                        | `DeleteBackwardWord`            |
//! | `Left`/`Right`, `C-b`/`C-f`  | `CaretLeft` / `CaretRight`      |
//! | `Home`/`End`, `C-a`/`C-e`    | `CaretStart` / `CaretEnd`       |
//! | `C-k` / `C-u`                | `KillEndOfLine` / `KillBeginningOfLine` |
//! | `Up`/`Down`, `C-p`/`C-n`     | `SelectUp` / `SelectDown`       |
//! | `PageUp`/`PageDown`          | `PageUp` / `PageDown`           |
//! | `M-Left`/`M-Right`           | `ScrollLeft` / `ScrollRight`    |
//! | `C-r`                        | `RotateFilter`                  |
//! | `C-Space`                    | `ToggleSelectionAndSelectNext`  |
//! | `Tab`                        | `ToggleSelection`               |
//! | `C-v`                        | `ToggleRangeMode`               |
//! | `C-g`                        | `CancelRangeMode`               |
//! | `M-a` / `M-u` / `M-i`        | `SelectAll` / `SelectNone` / `InvertSelection` |
//! | `C-t`                        | `ToggleQuery`                   |
//! | `C-l`                        | `Refresh`                       |

use crate::app::Event;
use crate::domain::{LinesiftError, Result};
use crossterm::event::{Event as TermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::collections::{BTreeMap, HashMap};

/// Action name that removes a binding.
pub const UNBIND: &str = "Unbind";

const ACTIONS: &[(&str, Event)] = &[
    ("Finish", Event::Finish),
    ("Cancel", Event::Cancel),
    ("Backspace", Event::Backspace),
    ("Delete", Event::Delete),
    ("DeleteBackwardWord", Event::DeleteBackwardWord),
    ("CaretLeft", Event::CaretLeft),
    ("CaretRight", Event::CaretRight),
    ("CaretStart", Event::CaretStart),
    ("CaretEnd", Event::CaretEnd),
    ("KillEndOfLine", Event::KillEndOfLine),
    ("KillBeginningOfLine", Event::KillBeginningOfLine),
    ("SelectUp", Event::SelectUp),
    ("SelectDown", Event::SelectDown),
    ("PageUp", Event::PageUp),
    ("PageDown", Event::PageDown),
    ("ScrollLeft", Event::ScrollLeft),
    ("ScrollRight", Event::ScrollRight),
    ("RotateFilter", Event::RotateFilter),
    ("ToggleSelection", Event::ToggleSelection),
    ("ToggleSelectionAndSelectNext", Event::ToggleSelectionAndSelectNext),
    ("ToggleRangeMode", Event::ToggleRangeMode),
    ("CancelRangeMode", Event::CancelRangeMode),
    ("SelectAll", Event::SelectAll),
    ("SelectNone", Event::SelectNone),
    ("InvertSelection", Event::InvertSelection),
    ("ToggleQuery", Event::ToggleQuery),
    ("Refresh", Event::Refresh),
];

/// A key plus the modifiers bindings care about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct Chord {
    code: KeyCode,
    ctrl: bool,
    alt: bool,
}

impl Chord {
    fn of(key: &KeyEvent) -> Self {
        Self {
            code: key.code,
            ctrl: key.modifiers.contains(KeyModifiers::CONTROL),
            alt: key.modifiers.contains(KeyModifiers::ALT),
        }
    }

    fn parse(name: &str) -> Option<Self> {
        let (mut ctrl, mut alt, mut rest) = (false, false, name);
        loop {
            if let Some(r) = rest.strip_prefix("C-").filter(|r| !r.is_empty()) {
                ctrl = true;
                rest = r;
            } else if let Some(r) = rest.strip_prefix("M-").filter(|r| !r.is_empty()) {
                alt = true;
                rest = r;
            } else {
                break;
            }
        }

        let code = match rest {
            "Enter" => KeyCode::Enter,
            "Esc" => KeyCode::Esc,
            "Tab" => KeyCode::Tab,
            "Backspace" => KeyCode::Backspace,
            "Delete" => KeyCode::Delete,
            "Left" => KeyCode::Left,
            "Right" => KeyCode::Right,
            "Up" => KeyCode::Up,
            "Down" => KeyCode::Down,
            "Home" => KeyCode::Home,
            "End" => KeyCode::End,
            "PageUp" => KeyCode::PageUp,
            "PageDown" => KeyCode::PageDown,
            "Space" => KeyCode::Char(' '),
            _ => {
                let mut chars = rest.chars();
                let ch = chars.next()?;
                if chars.next().is_some() {
                    return None;
                }
                KeyCode::Char(ch)
            }
        };
        Some(Self { code, ctrl, alt })
    }
}

/// Default bindings plus user overrides. `None` marks an unbound key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keymap {
    overrides: HashMap<Chord, Option<Event>>,
}

impl Keymap {
    /// Builds a keymap from `key name -> action name` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`LinesiftError::Config`] for an unknown key or action name.
    pub fn new(bindings: &BTreeMap<String, String>) -> Result<Self> {
        let mut overrides = HashMap::with_capacity(bindings.len());
        for (key, action) in bindings {
            let chord = Chord::parse(key)
                .ok_or_else(|| LinesiftError::Config(format!("keymap: unknown key '{key}'")))?;
            let event = if action == UNBIND {
                None
            } else {
                let event = ACTIONS
                    .iter()
                    .find(|(name, _)| *name == action.as_str())
                    .map(|&(_, event)| event)
                    .ok_or_else(|| {
                        LinesiftError::Config(format!("keymap: unknown action '{action}' for '{key}'"))
                    })?;
                Some(event)
            };
            tracing::debug!(key = %key, action = %action, "custom key binding");
            overrides.insert(chord, event);
        }
        Ok(Self { overrides })
    }

    /// Maps a terminal event to an input event, `None` when unbound.
    #[must_use]
    pub fn map_event(&self, event: &TermEvent) -> Option<Event> {
        match event {
            TermEvent::Key(key) if key.kind != KeyEventKind::Release => self
                .overrides
                .get(&Chord::of(key))
                .copied()
                .unwrap_or_else(|| map_key(key)),
            TermEvent::Resize(..) => Some(Event::Resize),
            _ => None,
        }
    }
}

fn map_key(key: &KeyEvent) -> Option<Event> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);

    let event = match key.code {
        KeyCode::Char(ch) if ctrl => match ch {
            'c' => Event::Cancel,
            'h' => Event::Backspace,
            'd' => Event::Delete,
            'w' => Event::DeleteBackwardWord,
            'b' => Event::CaretLeft,
            'f' => Event::CaretRight,
            'a' => Event::CaretStart,
            'e' => Event::CaretEnd,
            'k' => Event::KillEndOfLine,
            'u' => Event::KillBeginningOfLine,
            'p' => Event::SelectUp,
            'n' => Event::SelectDown,
            'r' => Event::RotateFilter,
            ' ' => Event::ToggleSelectionAndSelectNext,
            'v' => Event::ToggleRangeMode,
            'g' => Event::CancelRangeMode,
            't' => Event::ToggleQuery,
            'l' => Event::Refresh,
            _ => return None,
        },
        KeyCode::Char(ch) if alt => match ch {
            'a' => Event::SelectAll,
            'u' => Event::SelectNone,
            'i' => Event::InvertSelection,
            _ => return None,
        },
        KeyCode::Char(ch) => Event::Char(ch),
        KeyCode::Enter => Event::Finish,
        KeyCode::Esc => Event::Cancel,
        KeyCode::Backspace => Event::Backspace,
        KeyCode::Delete => Event::Delete,
        KeyCode::Left if alt => Event::ScrollLeft,
        KeyCode::Right if alt => Event::ScrollRight,
        KeyCode::Left => Event::CaretLeft,
        KeyCode::Right => Event::CaretRight,
        KeyCode::Home => Event::CaretStart,
        KeyCode::End => Event::CaretEnd,
        KeyCode::Up => Event::SelectUp,
        KeyCode::Down => Event::SelectDown,
        KeyCode::PageUp => Event::PageUp,
        KeyCode::PageDown => Event::PageDown,
        KeyCode::Tab => Event::ToggleSelection,
        _ => return None,
    };
    Some(event)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> TermEvent {
        TermEvent::Key(KeyEvent::new(code, modifiers))
    }

    fn keymap(pairs: &[(&str, &str)]) -> Result<Keymap> {
        let bindings = pairs
            .iter()
            .map(|(k, a)| ((*k).to_string(), (*a).to_string()))
            .collect();
        Keymap::new(&bindings)
    }

    #[test]
    fn printable_and_control_keys() {
        let keys = Keymap::default();
        assert_eq!(
            keys.map_event(&key(KeyCode::Char('x'), KeyModifiers::NONE)),
            Some(Event::Char('x'))
        );
        assert_eq!(
            keys.map_event(&key(KeyCode::Char('X'), KeyModifiers::SHIFT)),
            Some(Event::Char('X'))
        );
        assert_eq!(
            keys.map_event(&key(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Event::Cancel)
        );
        assert_eq!(
            keys.map_event(&key(KeyCode::Char('z'), KeyModifiers::CONTROL)),
            None
        );
    }

    #[test]
    fn alt_arrows_scroll() {
        let keys = Keymap::default();
        assert_eq!(
            keys.map_event(&key(KeyCode::Left, KeyModifiers::ALT)),
            Some(Event::ScrollLeft)
        );
        assert_eq!(
            keys.map_event(&key(KeyCode::Left, KeyModifiers::NONE)),
            Some(Event::CaretLeft)
        );
    }

    #[test]
    fn resize_is_forwarded() {
        assert_eq!(
            Keymap::default().map_event(&TermEvent::Resize(80, 24)),
            Some(Event::Resize)
        );
    }

    #[test]
    fn rc_bindings_override_and_unbind_defaults() {
        let keys = keymap(&[("C-j", "Finish"), ("M-n", "PageDown"), ("C-r", UNBIND)]).unwrap();
        assert_eq!(
            keys.map_event(&key(KeyCode::Char('j'), KeyModifiers::CONTROL)),
            Some(Event::Finish)
        );
        assert_eq!(
            keys.map_event(&key(KeyCode::Char('n'), KeyModifiers::ALT)),
            Some(Event::PageDown)
        );
        assert_eq!(
            keys.map_event(&key(KeyCode::Char('r'), KeyModifiers::CONTROL)),
            None
        );
        // Untouched keys keep their defaults.
        assert_eq!(
            keys.map_event(&key(KeyCode::Char('n'), KeyModifiers::CONTROL)),
            Some(Event::SelectDown)
        );
    }

    #[test]
    fn named_and_combined_keys_parse() {
        let keys = keymap(&[("C-M-Up", "SelectAll"), ("Space", "ToggleSelection")]).unwrap();
        assert_eq!(
            keys.map_event(&key(KeyCode::Up, KeyModifiers::CONTROL | KeyModifiers::ALT)),
            Some(Event::SelectAll)
        );
        assert_eq!(
            keys.map_event(&key(KeyCode::Char(' '), KeyModifiers::NONE)),
            Some(Event::ToggleSelection)
        );
    }

    #[test]
    fn unknown_names_are_config_errors() {
        assert!(matches!(keymap(&[("C-Nope", "Finish")]), Err(LinesiftError::Config(_))));
        assert!(matches!(keymap(&[("C-j", "Explode")]), Err(LinesiftError::Config(_))));
    }
}
