use serde::{Deserialize, Serialize};

/// A single key, independent of the input backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyCode {
    Char(char),
    Enter,
    Escape,
    Tab,
    Backspace,
    Delete,
    Space,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    F(u8),
}

impl KeyCode {
    /// Look up a brace-notation key name such as `ENTER` or `F4`
    pub fn from_name(name: &str) -> Option<Self> {
        let upper = name.to_ascii_uppercase();
        let key = match upper.as_str() {
            "ENTER" | "RETURN" => KeyCode::Enter,
            "ESC" | "ESCAPE" => KeyCode::Escape,
            "TAB" => KeyCode::Tab,
            "BACKSPACE" | "BS" | "BKSP" => KeyCode::Backspace,
            "DELETE" | "DEL" => KeyCode::Delete,
            "SPACE" => KeyCode::Space,
            "UP" => KeyCode::Up,
            "DOWN" => KeyCode::Down,
            "LEFT" => KeyCode::Left,
            "RIGHT" => KeyCode::Right,
            "HOME" => KeyCode::Home,
            "END" => KeyCode::End,
            "PGUP" | "PAGEUP" => KeyCode::PageUp,
            "PGDN" | "PAGEDOWN" => KeyCode::PageDown,
            _ => {
                let n: u8 = upper.strip_prefix('F')?.parse().ok()?;
                if !(1..=12).contains(&n) {
                    return None;
                }
                KeyCode::F(n)
            }
        };
        Some(key)
    }
}

/// Modifier keys held while a key is pressed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub alt: bool,
    pub ctrl: bool,
    pub shift: bool,
}

impl Modifiers {
    pub fn is_empty(&self) -> bool {
        !(self.alt || self.ctrl || self.shift)
    }
}

/// One key press, with modifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyStroke {
    pub key: KeyCode,
    pub modifiers: Modifiers,
}

impl KeyStroke {
    pub fn plain(key: KeyCode) -> Self {
        Self {
            key,
            modifiers: Modifiers::default(),
        }
    }

    pub fn with_alt(key: KeyCode) -> Self {
        Self {
            key,
            modifiers: Modifiers {
                alt: true,
                ..Default::default()
            },
        }
    }
}
