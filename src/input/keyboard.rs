//! Keyboard device
//!
//! Indexed by virtual key code. Event handlers call `handle_key_down` and
//! `handle_key_up`; commands poll through [`InputDevice::get`].

use std::fmt;

use super::device::{DeviceState, InputDevice};

/// Size of the key code space
pub const MAX_CHARS: usize = 0x10000;

/// Keyboard backend
#[derive(Debug)]
pub struct Keyboard {
    state: DeviceState,
}

impl Default for Keyboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Keyboard {
    pub fn new() -> Self {
        Self::named("Keyboard")
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            state: DeviceState::new(name, MAX_CHARS),
        }
    }

    /// Key pressed. Returns `false` for repeats of an already held key.
    pub fn handle_key_down(&self, keycode: u16) -> bool {
        self.state.set(keycode as i32, true)
    }

    /// Key released
    pub fn handle_key_up(&self, keycode: u16) -> bool {
        self.state.set(keycode as i32, false)
    }

    pub fn is_down(&self, keycode: u16) -> bool {
        self.state.get(keycode as i32)
    }

    /// Held key codes in ascending order
    pub fn held_keys(&self) -> Vec<u16> {
        self.state.active().into_iter().map(|k| k as u16).collect()
    }

    /// Drop every held key, e.g. when the window loses focus
    pub fn release_all(&self) {
        self.state.release_all();
    }

    pub fn reset_alerts(&self) {
        self.state.reset_alerts();
    }
}

impl InputDevice for Keyboard {
    fn name(&self) -> &str {
        self.state.name()
    }

    fn capacity(&self) -> usize {
        MAX_CHARS
    }

    fn get(&self, index: i32) -> bool {
        self.state.get(index)
    }

    fn alerts(&self) -> u16 {
        self.state.alerts()
    }
}

impl fmt::Display for Keyboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.state, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::keynames::{KEY_A, KEY_SPACE};

    #[test]
    fn test_keyboard_new() {
        let kb = Keyboard::new();
        assert_eq!(kb.name(), "Keyboard");
        assert_eq!(kb.capacity(), 0x10000);
        assert!(!kb.alerted());
        assert!(kb.held_keys().is_empty());
    }

    #[test]
    fn test_key_down_up() {
        let kb = Keyboard::new();

        assert!(kb.handle_key_down(KEY_A));
        assert!(kb.is_down(KEY_A));
        assert!(kb.get(KEY_A as i32));
        assert!(!kb.is_down(KEY_SPACE));

        // Auto-repeat is ignored
        assert!(!kb.handle_key_down(KEY_A));
        assert_eq!(kb.alerts(), 1);

        assert!(kb.handle_key_up(KEY_A));
        assert!(!kb.is_down(KEY_A));
        assert_eq!(kb.alerts(), 0);
    }

    #[test]
    fn test_highest_code() {
        let kb = Keyboard::new();
        assert!(kb.handle_key_down(u16::MAX));
        assert!(kb.get(0xffff));
        assert!(!kb.get(0x10000));
    }

    #[test]
    fn test_release_all() {
        let kb = Keyboard::new();
        kb.handle_key_down(KEY_SPACE);
        kb.handle_key_down(KEY_A);
        assert_eq!(kb.held_keys(), vec![KEY_SPACE, KEY_A]);

        kb.release_all();
        assert!(kb.held_keys().is_empty());
        assert!(!kb.alerted());
    }

    #[test]
    fn test_display() {
        let kb = Keyboard::named("Left hand");
        assert_eq!(kb.to_string(), "InputDevice: Left hand");
    }
}
