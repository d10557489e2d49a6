//! Key name mappings
//!
//! Maps virtual key codes to display names and back, plus naming helpers for
//! mouse buttons and joystick inputs.

use std::collections::HashMap;
use std::sync::LazyLock;

use super::mouse::MouseButton;

pub const KEY_BACKSPACE: u16 = 8;
pub const KEY_TAB: u16 = 9;
pub const KEY_ENTER: u16 = 10;
pub const KEY_SHIFT: u16 = 16;
pub const KEY_CONTROL: u16 = 17;
pub const KEY_ALT: u16 = 18;
pub const KEY_PAUSE: u16 = 19;
pub const KEY_CAPS_LOCK: u16 = 20;
pub const KEY_ESCAPE: u16 = 27;
pub const KEY_SPACE: u16 = 32;
pub const KEY_PAGE_UP: u16 = 33;
pub const KEY_PAGE_DOWN: u16 = 34;
pub const KEY_END: u16 = 35;
pub const KEY_HOME: u16 = 36;
pub const KEY_LEFT: u16 = 37;
pub const KEY_UP: u16 = 38;
pub const KEY_RIGHT: u16 = 39;
pub const KEY_DOWN: u16 = 40;
pub const KEY_0: u16 = 48;
pub const KEY_A: u16 = 65;
pub const KEY_D: u16 = 68;
pub const KEY_S: u16 = 83;
pub const KEY_W: u16 = 87;
pub const KEY_NUMPAD_0: u16 = 96;
pub const KEY_F1: u16 = 112;
pub const KEY_DELETE: u16 = 127;
pub const KEY_INSERT: u16 = 155;

/// Named keys outside the letter, digit, numpad and function key runs
const NAMED_KEYS: &[(u16, &str)] = &[
    (KEY_BACKSPACE, "Backspace"),
    (KEY_TAB, "Tab"),
    (KEY_ENTER, "Enter"),
    (KEY_SHIFT, "Shift"),
    (KEY_CONTROL, "Ctrl"),
    (KEY_ALT, "Alt"),
    (KEY_PAUSE, "Pause"),
    (KEY_CAPS_LOCK, "CapsLock"),
    (KEY_ESCAPE, "Escape"),
    (KEY_SPACE, "Space"),
    (KEY_PAGE_UP, "PageUp"),
    (KEY_PAGE_DOWN, "PageDown"),
    (KEY_END, "End"),
    (KEY_HOME, "Home"),
    (KEY_LEFT, "Left"),
    (KEY_UP, "Up"),
    (KEY_RIGHT, "Right"),
    (KEY_DOWN, "Down"),
    (44, ","),
    (45, "-"),
    (46, "."),
    (47, "/"),
    (59, ";"),
    (61, "="),
    (91, "["),
    (92, "\\"),
    (93, "]"),
    (106, "Keypad*"),
    (107, "Keypad+"),
    (109, "Keypad-"),
    (110, "Keypad."),
    (111, "Keypad/"),
    (KEY_DELETE, "Delete"),
    (144, "NumLock"),
    (145, "ScrollLock"),
    (KEY_INSERT, "Insert"),
    (192, "`"),
    (222, "'"),
];

/// Key code to name mapping
static KEY_NAMES: LazyLock<HashMap<u16, String>> = LazyLock::new(|| {
    let mut m: HashMap<u16, String> = NAMED_KEYS
        .iter()
        .map(|&(code, name)| (code, name.to_string()))
        .collect();

    for (i, digit) in ('0'..='9').enumerate() {
        m.insert(KEY_0 + i as u16, digit.to_string());
        m.insert(KEY_NUMPAD_0 + i as u16, format!("Keypad{}", digit));
    }
    for (i, letter) in ('A'..='Z').enumerate() {
        m.insert(KEY_A + i as u16, letter.to_string());
    }
    for i in 0..12u16 {
        m.insert(KEY_F1 + i, format!("F{}", i + 1));
    }
    m
});

/// Upper-cased name to key code mapping (reverse lookup)
static NAME_TO_KEY: LazyLock<HashMap<String, u16>> = LazyLock::new(|| {
    KEY_NAMES
        .iter()
        .map(|(&code, name)| (name.to_uppercase(), code))
        .collect()
});

/// Display name for a key code
pub fn key_name(keycode: u16) -> &'static str {
    KEY_NAMES
        .get(&keycode)
        .map(String::as_str)
        .unwrap_or("Unknown")
}

/// Key code for a name (case-insensitive)
pub fn key_from_name(name: &str) -> Option<u16> {
    NAME_TO_KEY.get(&name.trim().to_uppercase()).copied()
}

pub fn mouse_button_name(button: MouseButton) -> &'static str {
    match button {
        MouseButton::None => "MouseNone",
        MouseButton::Primary => "MousePrimary",
        MouseButton::Middle => "MouseMiddle",
        MouseButton::Secondary => "MouseSecondary",
        MouseButton::Back => "MouseBack",
        MouseButton::Forward => "MouseForward",
    }
}

pub fn mouse_button_from_name(name: &str) -> Option<MouseButton> {
    MouseButton::ALL
        .into_iter()
        .find(|b| mouse_button_name(*b).eq_ignore_ascii_case(name.trim()))
}

/// Get joystick button name
pub fn joy_button_name(joy_index: u32, button: u32) -> String {
    format!("Joy{}Button{}", joy_index, button)
}

/// Get joystick axis name
pub fn joy_axis_name(joy_index: u32, axis: u32, positive: bool) -> String {
    let dir = if positive { "+" } else { "-" };
    format!("Joy{}Axis{}{}", joy_index, axis, dir)
}

/// Get joystick hat name
pub fn joy_hat_name(joy_index: u32, hat: u32, direction: u8) -> String {
    let dir = match direction {
        1 => "Up",
        2 => "Right",
        4 => "Down",
        8 => "Left",
        _ => "?",
    };
    format!("Joy{}Hat{}{}", joy_index, hat, dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(KEY_A, "A")]
    #[case(90, "Z")]
    #[case(KEY_SPACE, "Space")]
    #[case(KEY_LEFT, "Left")]
    #[case(50, "2")]
    #[case(99, "Keypad3")]
    #[case(KEY_F1, "F1")]
    #[case(123, "F12")]
    #[case(KEY_ESCAPE, "Escape")]
    fn test_key_name_known(#[case] code: u16, #[case] name: &str) {
        assert_eq!(key_name(code), name);
        assert_eq!(key_from_name(name), Some(code));
    }

    #[test]
    fn test_key_name_unknown() {
        assert_eq!(key_name(0), "Unknown");
        assert_eq!(key_name(0xffff), "Unknown");
    }

    #[test]
    fn test_key_from_name_case_insensitive() {
        assert_eq!(key_from_name("space"), Some(KEY_SPACE));
        assert_eq!(key_from_name("ESCAPE"), Some(KEY_ESCAPE));
        assert_eq!(key_from_name(" pageup "), Some(KEY_PAGE_UP));
        assert_eq!(key_from_name("f10"), Some(121));
    }

    #[test]
    fn test_key_from_name_not_found() {
        assert!(key_from_name("NotAKey").is_none());
        assert!(key_from_name("").is_none());
    }

    #[test]
    fn test_names_are_unique() {
        assert_eq!(KEY_NAMES.len(), NAME_TO_KEY.len());
    }

    #[test]
    fn test_mouse_button_names() {
        assert_eq!(mouse_button_name(MouseButton::Primary), "MousePrimary");
        assert_eq!(mouse_button_from_name("mouseback"), Some(MouseButton::Back));
        assert!(mouse_button_from_name("Mouse9").is_none());
    }

    #[test]
    fn test_joy_names() {
        assert_eq!(joy_button_name(0, 5), "Joy0Button5");
        assert_eq!(joy_axis_name(0, 1, true), "Joy0Axis1+");
        assert_eq!(joy_axis_name(2, 0, false), "Joy2Axis0-");
        assert_eq!(joy_hat_name(0, 0, 1), "Joy0Hat0Up");
        assert_eq!(joy_hat_name(0, 1, 8), "Joy0Hat1Left");
        assert_eq!(joy_hat_name(0, 0, 3), "Joy0Hat0?");
    }
}
