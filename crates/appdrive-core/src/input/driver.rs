use enigo::{Button, Coordinate, Direction, Enigo, Key, Keyboard, Mouse, Settings};
use tracing::debug;

use super::errors::InputError;
use super::types::{KeyCode, KeyStroke};

/// Synthetic mouse and keyboard input.
///
/// Events go to whichever window has focus; callers focus the target first.
pub trait InputDriver: Send + Sync {
    /// Backend name for logs
    fn name(&self) -> &'static str;

    /// Left-click at absolute screen coordinates
    fn click_at(&self, x: i32, y: i32) -> Result<(), InputError>;

    /// Type the keystrokes in order
    fn send_keys(&self, strokes: &[KeyStroke]) -> Result<(), InputError>;
}

/// Input driver backed by `enigo`.
///
/// A fresh connection is opened per call; the X11 and macOS backends are not
/// `Send`, so the connection cannot live in the struct.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnigoInputDriver;

impl EnigoInputDriver {
    pub fn new() -> Self {
        Self
    }

    fn connect() -> Result<Enigo, InputError> {
        Enigo::new(&Settings::default()).map_err(|e| InputError::ConnectionFailed {
            message: e.to_string(),
        })
    }
}

impl InputDriver for EnigoInputDriver {
    fn name(&self) -> &'static str {
        "enigo"
    }

    fn click_at(&self, x: i32, y: i32) -> Result<(), InputError> {
        let mut enigo = Self::connect()?;
        let mouse_err = |e: enigo::InputError| InputError::MouseEventFailed {
            x,
            y,
            message: e.to_string(),
        };

        enigo.move_mouse(x, y, Coordinate::Abs).map_err(mouse_err)?;
        enigo
            .button(Button::Left, Direction::Click)
            .map_err(mouse_err)?;

        debug!(event = "core.input.click_sent", x = x, y = y);
        Ok(())
    }

    fn send_keys(&self, strokes: &[KeyStroke]) -> Result<(), InputError> {
        let mut enigo = Self::connect()?;

        for stroke in strokes {
            let modifiers = modifier_keys(stroke);
            for key in &modifiers {
                press(&mut enigo, *key, Direction::Press)?;
            }
            let result = press(&mut enigo, to_enigo_key(stroke.key), Direction::Click);
            // Release modifiers even if the key itself failed, or they stay stuck
            for key in modifiers.iter().rev() {
                press(&mut enigo, *key, Direction::Release)?;
            }
            result?;
        }

        debug!(event = "core.input.keys_sent", count = strokes.len());
        Ok(())
    }
}

fn press(enigo: &mut Enigo, key: Key, direction: Direction) -> Result<(), InputError> {
    enigo
        .key(key, direction)
        .map_err(|e| InputError::KeyEventFailed {
            message: format!("{:?}: {}", key, e),
        })
}

fn modifier_keys(stroke: &KeyStroke) -> Vec<Key> {
    let mut keys = Vec::new();
    if stroke.modifiers.ctrl {
        keys.push(Key::Control);
    }
    if stroke.modifiers.alt {
        keys.push(Key::Alt);
    }
    if stroke.modifiers.shift {
        keys.push(Key::Shift);
    }
    keys
}

fn to_enigo_key(key: KeyCode) -> Key {
    match key {
        KeyCode::Char(c) => Key::Unicode(c),
        KeyCode::Enter => Key::Return,
        KeyCode::Escape => Key::Escape,
        KeyCode::Tab => Key::Tab,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        KeyCode::Space => Key::Space,
        KeyCode::Up => Key::UpArrow,
        KeyCode::Down => Key::DownArrow,
        KeyCode::Left => Key::LeftArrow,
        KeyCode::Right => Key::RightArrow,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        KeyCode::F(n) => match n {
            1 => Key::F1,
            2 => Key::F2,
            3 => Key::F3,
            4 => Key::F4,
            5 => Key::F5,
            6 => Key::F6,
            7 => Key::F7,
            8 => Key::F8,
            9 => Key::F9,
            10 => Key::F10,
            11 => Key::F11,
            _ => Key::F12,
        },
    }
}
