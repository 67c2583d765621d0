//! Brace-notation key sequence parser.
//!
//! | Input       | Meaning                                   |
//! |-------------|-------------------------------------------|
//! | `a`, `2`    | the character itself                      |
//! | `{ENTER}`   | a named key (see [`KeyCode::from_name`])  |
//! | `{TAB 3}`   | a named key repeated                      |
//! | `~`         | Enter                                     |
//! | `%x`        | Alt + x                                   |
//! | `^x`        | Ctrl + x                                  |
//! | `+x`        | Shift + x                                 |
//! | `{%}` `{{}` | a literal modifier or brace character     |
//!
//! `{ESC}21*2{ENTER}` clears a calculator and computes 21 × 2;
//! `%{F4}` is Alt+F4.

use super::errors::InputError;
use super::types::{KeyCode, KeyStroke, Modifiers};

/// Upper bound for `{KEY n}` repeat counts
const MAX_REPEAT: usize = 100;

/// Parse a key sequence into individual keystrokes
pub fn parse_key_sequence(sequence: &str) -> Result<Vec<KeyStroke>, InputError> {
    let chars: Vec<char> = sequence.chars().collect();
    let invalid = |position: usize, reason: String| InputError::InvalidKeySequence {
        sequence: sequence.to_string(),
        position,
        reason,
    };

    let mut strokes = Vec::new();
    let mut pending = Modifiers::default();
    let mut pending_at = 0;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            '%' | '^' | '+' => {
                if pending.is_empty() {
                    pending_at = i;
                }
                match c {
                    '%' => pending.alt = true,
                    '^' => pending.ctrl = true,
                    _ => pending.shift = true,
                }
                i += 1;
                continue;
            }
            '{' => {
                // `{}}` is a literal closing brace
                let close = if chars.get(i + 1) == Some(&'}') && chars.get(i + 2) == Some(&'}') {
                    i + 2
                } else {
                    chars[i + 1..]
                        .iter()
                        .position(|&ch| ch == '}')
                        .map(|offset| i + 1 + offset)
                        .ok_or_else(|| invalid(i, "unclosed '{'".to_string()))?
                };

                let body: String = chars[i + 1..close].iter().collect();
                let (key, repeat) = parse_braced(&body).map_err(|reason| invalid(i, reason))?;
                for _ in 0..repeat {
                    strokes.push(KeyStroke {
                        key,
                        modifiers: pending,
                    });
                }
                i = close + 1;
            }
            '~' => {
                strokes.push(KeyStroke {
                    key: KeyCode::Enter,
                    modifiers: pending,
                });
                i += 1;
            }
            '}' => return Err(invalid(i, "unmatched '}'".to_string())),
            ' ' => {
                strokes.push(KeyStroke {
                    key: KeyCode::Space,
                    modifiers: pending,
                });
                i += 1;
            }
            other => {
                strokes.push(KeyStroke {
                    key: KeyCode::Char(other),
                    modifiers: pending,
                });
                i += 1;
            }
        }
        pending = Modifiers::default();
    }

    if !pending.is_empty() {
        return Err(invalid(
            pending_at,
            "modifier is not followed by a key".to_string(),
        ));
    }

    Ok(strokes)
}

/// Parse the inside of `{...}`: a key name or single character, optionally
/// followed by a repeat count.
fn parse_braced(body: &str) -> Result<(KeyCode, usize), String> {
    let (name, count) = match body.rsplit_once(' ') {
        Some((name, count)) if !name.is_empty() => {
            let count: usize = count
                .parse()
                .map_err(|_| format!("invalid repeat count '{}'", count))?;
            if count == 0 || count > MAX_REPEAT {
                return Err(format!(
                    "repeat count must be between 1 and {}, got {}",
                    MAX_REPEAT, count
                ));
            }
            (name, count)
        }
        _ => (body, 1),
    };

    if name.is_empty() {
        return Err("empty key name".to_string());
    }

    let mut name_chars = name.chars();
    if let (Some(single), None) = (name_chars.next(), name_chars.next()) {
        return Ok((KeyCode::Char(single), count));
    }

    KeyCode::from_name(name)
        .map(|key| (key, count))
        .ok_or_else(|| format!("unknown key '{}'", name))
}
