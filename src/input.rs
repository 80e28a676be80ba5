//! Input simulation module for mouse and keyboard control

use serde::{Deserialize, Serialize};

#[cfg(windows)]
use enigo::{Button, Coordinate, Direction, Enigo, Key, Keyboard, Mouse, Settings};

/// Mouse buttons the bot can click
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    Left,
    Right,
}

/// Sink for synthesized keyboard and pointer events.
///
/// Calls are fire-and-forget: implementations log failures instead of
/// returning them.
pub trait InputBackend {
    fn move_cursor(&mut self, x: i32, y: i32);
    fn key_down(&mut self, key: &str);
    fn key_up(&mut self, key: &str);
    fn click(&mut self, button: MouseButton);
    fn tap_key(&mut self, key: &str);
}

impl<T: InputBackend + ?Sized> InputBackend for &mut T {
    fn move_cursor(&mut self, x: i32, y: i32) {
        (**self).move_cursor(x, y)
    }

    fn key_down(&mut self, key: &str) {
        (**self).key_down(key)
    }

    fn key_up(&mut self, key: &str) {
        (**self).key_up(key)
    }

    fn click(&mut self, button: MouseButton) {
        (**self).click(button)
    }

    fn tap_key(&mut self, key: &str) {
        (**self).tap_key(key)
    }
}

/// Real input through `enigo`
#[cfg(windows)]
pub struct EnigoInput {
    enigo: Enigo,
}

#[cfg(windows)]
impl EnigoInput {
    pub fn new() -> anyhow::Result<Self> {
        let enigo = Enigo::new(&Settings::default())
            .map_err(|e| anyhow::anyhow!("Failed to create Enigo: {:?}", e))?;
        Ok(Self { enigo })
    }

    fn key(&mut self, key: &str, direction: Direction) {
        match string_to_enigo_key(key) {
            Some(enigo_key) => {
                if let Err(e) = self.enigo.key(enigo_key, direction) {
                    tracing::warn!("Failed to send key '{}' ({:?}): {:?}", key, direction, e);
                }
            }
            None => tracing::warn!("Unknown key name '{}'", key),
        }
    }
}

#[cfg(windows)]
impl InputBackend for EnigoInput {
    fn move_cursor(&mut self, x: i32, y: i32) {
        if let Err(e) = self.enigo.move_mouse(x, y, Coordinate::Abs) {
            tracing::warn!("Failed to move mouse to ({}, {}): {:?}", x, y, e);
        }
    }

    fn key_down(&mut self, key: &str) {
        self.key(key, Direction::Press);
    }

    fn key_up(&mut self, key: &str) {
        self.key(key, Direction::Release);
    }

    fn click(&mut self, button: MouseButton) {
        let button = match button {
            MouseButton::Left => Button::Left,
            MouseButton::Right => Button::Right,
        };
        if let Err(e) = self.enigo.button(button, Direction::Click) {
            tracing::warn!("Failed to click mouse: {:?}", e);
        }
    }

    fn tap_key(&mut self, key: &str) {
        self.key(key, Direction::Click);
    }
}

/// Placeholder that only logs; input injection needs Windows
#[cfg(not(windows))]
#[derive(Debug, Default)]
pub struct EnigoInput;

#[cfg(not(windows))]
impl EnigoInput {
    pub fn new() -> anyhow::Result<Self> {
        tracing::warn!("Input simulation not implemented on this platform; events will only be logged");
        Ok(Self)
    }
}

#[cfg(not(windows))]
impl InputBackend for EnigoInput {
    fn move_cursor(&mut self, x: i32, y: i32) {
        tracing::warn!("move_cursor({}, {}) not implemented on this platform", x, y);
    }

    fn key_down(&mut self, key: &str) {
        tracing::warn!("key_down('{}') not implemented on this platform", key);
    }

    fn key_up(&mut self, key: &str) {
        tracing::warn!("key_up('{}') not implemented on this platform", key);
    }

    fn click(&mut self, button: MouseButton) {
        tracing::warn!("click({:?}) not implemented on this platform", button);
    }

    fn tap_key(&mut self, key: &str) {
        tracing::warn!("tap_key('{}') not implemented on this platform", key);
    }
}

/// Check whether a configured key name can be sent
pub fn is_known_key(key: &str) -> bool {
    let key = key.trim();
    if key.chars().count() == 1 {
        return key.chars().all(|c| !c.is_control());
    }
    matches!(
        key.to_uppercase().as_str(),
        "F1" | "F2" | "F3" | "F4" | "F5" | "F6" | "F7" | "F8" | "F9" | "F10" | "F11" | "F12"
            | "ESC" | "ESCAPE" | "ENTER" | "RETURN" | "SPACE" | "TAB" | "BACKSPACE"
            | "UP" | "DOWN" | "LEFT" | "RIGHT" | "HOME" | "END" | "PAGEUP" | "PAGEDOWN"
            | "DELETE" | "SHIFT" | "CTRL" | "CONTROL" | "ALT" | "CAPSLOCK"
    )
}

/// Convert string key name to enigo Key
#[cfg(windows)]
fn string_to_enigo_key(key: &str) -> Option<Key> {
    let key = key.trim();
    // Single characters go out lowercase to avoid keyboard layout mapping issues
    if key.chars().count() == 1 {
        let c = key.chars().next()?.to_ascii_lowercase();
        return Some(Key::Unicode(c));
    }

    match key.to_uppercase().as_str() {
        "F1" => Some(Key::F1),
        "F2" => Some(Key::F2),
        "F3" => Some(Key::F3),
        "F4" => Some(Key::F4),
        "F5" => Some(Key::F5),
        "F6" => Some(Key::F6),
        "F7" => Some(Key::F7),
        "F8" => Some(Key::F8),
        "F9" => Some(Key::F9),
        "F10" => Some(Key::F10),
        "F11" => Some(Key::F11),
        "F12" => Some(Key::F12),
        "ESC" | "ESCAPE" => Some(Key::Escape),
        "ENTER" | "RETURN" => Some(Key::Return),
        "SPACE" => Some(Key::Space),
        "TAB" => Some(Key::Tab),
        "BACKSPACE" => Some(Key::Backspace),
        "UP" => Some(Key::UpArrow),
        "DOWN" => Some(Key::DownArrow),
        "LEFT" => Some(Key::LeftArrow),
        "RIGHT" => Some(Key::RightArrow),
        "HOME" => Some(Key::Home),
        "END" => Some(Key::End),
        "PAGEUP" => Some(Key::PageUp),
        "PAGEDOWN" => Some(Key::PageDown),
        "DELETE" => Some(Key::Delete),
        "SHIFT" => Some(Key::Shift),
        "CTRL" | "CONTROL" => Some(Key::Control),
        "ALT" => Some(Key::Alt),
        "CAPSLOCK" => Some(Key::CapsLock),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_known_key() {
        assert!(is_known_key("0"));
        assert!(is_known_key("shift"));
        assert!(is_known_key("F10"));
        assert!(!is_known_key(""));
        assert!(!is_known_key("HYPER"));
    }

    #[test]
    fn test_mouse_button_serde() {
        assert_eq!(serde_json::to_string(&MouseButton::Right).unwrap(), "\"right\"");
        let left: MouseButton = serde_json::from_str("\"left\"").unwrap();
        assert_eq!(left, MouseButton::Left);
    }

    #[test]
    #[cfg(windows)]
    fn test_string_to_enigo_key() {
        assert!(string_to_enigo_key("0").is_some());
        assert!(string_to_enigo_key("SHIFT").is_some());
        assert!(string_to_enigo_key("ESC").is_some());
        assert!(string_to_enigo_key("INVALID_KEY_NAME_THAT_DOES_NOT_EXIST").is_none());
    }
}
