//! Joystick device
//!
//! Buttons, axes and hats share one flat index space:
//!
//! ```text
//! [ buttons | axis0-, axis0+, axis1-, ... | hat0 up, right, down, left, ... ]
//! ```
//!
//! An axis activates the index matching its polarity once it leaves the dead
//! zone. Hat values are direction bitmasks.

use std::fmt;
use std::sync::atomic::{AtomicI32, Ordering};

use super::device::{DeviceState, InputDevice};
use super::keynames::{joy_axis_name, joy_button_name, joy_hat_name};

/// Hat direction constants (matching SDL)
pub mod hat {
    pub const CENTERED: u8 = 0;
    pub const UP: u8 = 1;
    pub const RIGHT: u8 = 2;
    pub const DOWN: u8 = 4;
    pub const LEFT: u8 = 8;
    pub const RIGHTUP: u8 = RIGHT | UP;
    pub const RIGHTDOWN: u8 = RIGHT | DOWN;
    pub const LEFTUP: u8 = LEFT | UP;
    pub const LEFTDOWN: u8 = LEFT | DOWN;

    /// Directions in index order
    pub const DIRECTIONS: [u8; 4] = [UP, RIGHT, DOWN, LEFT];
}

/// Largest flat index space; bindings store 16-bit keys
pub const MAX_INPUTS: u32 = 0x10000;

/// Axis dead zone used until `set_threshold` is called
pub const DEFAULT_THRESHOLD: i32 = 10000;
const MAX_THRESHOLD: i32 = 32767;

/// Decoded meaning of a flat joystick index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoyInput {
    Button(u32),
    Axis { axis: u32, positive: bool },
    Hat { hat: u32, direction: u8 },
}

/// Joystick backend
#[derive(Debug)]
pub struct Joystick {
    index: u32,
    num_buttons: u32,
    num_axes: u32,
    num_hats: u32,
    threshold: AtomicI32,
    state: DeviceState,
}

impl Joystick {
    /// Create a joystick with the given layout, everything released.
    ///
    /// Returns `None` when the layout does not fit in [`MAX_INPUTS`] indices.
    pub fn new(
        index: u32,
        name: impl Into<String>,
        num_axes: u32,
        num_buttons: u32,
        num_hats: u32,
    ) -> Option<Self> {
        let size = num_axes
            .checked_mul(2)?
            .checked_add(num_hats.checked_mul(4)?)?
            .checked_add(num_buttons)?;
        if size > MAX_INPUTS {
            return None;
        }
        Some(Self {
            index,
            num_buttons,
            num_axes,
            num_hats,
            threshold: AtomicI32::new(DEFAULT_THRESHOLD),
            state: DeviceState::new(name, size as usize),
        })
    }

    /// Port number used in input names
    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn num_buttons(&self) -> u32 {
        self.num_buttons
    }

    pub fn num_axes(&self) -> u32 {
        self.num_axes
    }

    pub fn num_hats(&self) -> u32 {
        self.num_hats
    }

    pub fn threshold(&self) -> i32 {
        self.threshold.load(Ordering::Relaxed)
    }

    /// Set axis threshold, clamped to `0..=32767`
    pub fn set_threshold(&self, threshold: i32) {
        self.threshold
            .store(threshold.clamp(0, MAX_THRESHOLD), Ordering::Relaxed);
    }

    // === Index layout ===

    pub fn button_index(&self, button: u32) -> Option<u16> {
        if button >= self.num_buttons {
            return None;
        }
        u16::try_from(button).ok()
    }

    pub fn axis_index(&self, axis: u32, positive: bool) -> Option<u16> {
        if axis >= self.num_axes {
            return None;
        }
        let index = axis
            .checked_mul(2)?
            .checked_add(positive as u32)?
            .checked_add(self.num_buttons)?;
        u16::try_from(index).ok()
    }

    /// Index of one hat direction; `direction` must be a single bit
    pub fn hat_index(&self, hat: u32, direction: u8) -> Option<u16> {
        let offset = hat::DIRECTIONS.iter().position(|&d| d == direction)? as u32;
        if hat >= self.num_hats {
            return None;
        }
        let index = hat
            .checked_mul(4)?
            .checked_add(offset)?
            .checked_add(self.num_axes.checked_mul(2)?)?
            .checked_add(self.num_buttons)?;
        u16::try_from(index).ok()
    }

    /// Decode a flat index
    pub fn input_at(&self, index: u16) -> Option<JoyInput> {
        let mut i = index as u32;
        if i < self.num_buttons {
            return Some(JoyInput::Button(i));
        }
        i -= self.num_buttons;
        if i < 2 * self.num_axes {
            return Some(JoyInput::Axis {
                axis: i / 2,
                positive: i % 2 == 1,
            });
        }
        i -= 2 * self.num_axes;
        if i < 4 * self.num_hats {
            return Some(JoyInput::Hat {
                hat: i / 4,
                direction: hat::DIRECTIONS[(i % 4) as usize],
            });
        }
        None
    }

    /// Display name of a flat index, e.g. `Joy0Axis1+`
    pub fn input_name(&self, index: u16) -> Option<String> {
        Some(match self.input_at(index)? {
            JoyInput::Button(b) => joy_button_name(self.index, b),
            JoyInput::Axis { axis, positive } => joy_axis_name(self.index, axis, positive),
            JoyInput::Hat { hat, direction } => joy_hat_name(self.index, hat, direction),
        })
    }

    // === Events ===

    /// Handle button press/release
    pub fn handle_button(&self, button: u32, pressed: bool) {
        if let Some(i) = self.button_index(button) {
            self.state.set(i as i32, pressed);
        }
    }

    /// Handle axis movement
    pub fn handle_axis(&self, axis: u32, value: i16) {
        let (Some(neg), Some(pos)) = (self.axis_index(axis, false), self.axis_index(axis, true))
        else {
            return;
        };
        let value = value as i32;
        let threshold = self.threshold();
        self.state.set(neg as i32, value < -threshold);
        self.state.set(pos as i32, value > threshold);
    }

    /// Handle hat movement
    pub fn handle_hat(&self, hat: u32, value: u8) {
        for direction in hat::DIRECTIONS {
            if let Some(i) = self.hat_index(hat, direction) {
                self.state.set(i as i32, value & direction != 0);
            }
        }
    }

    /// Release every button, axis and hat
    pub fn reset_all(&self) {
        self.state.release_all();
    }

    pub fn reset_alerts(&self) {
        self.state.reset_alerts();
    }
}

impl InputDevice for Joystick {
    fn name(&self) -> &str {
        self.state.name()
    }

    fn capacity(&self) -> usize {
        self.state.size()
    }

    fn get(&self, index: i32) -> bool {
        self.state.get(index)
    }

    fn alerts(&self) -> u16 {
        self.state.alerts()
    }
}

impl fmt::Display for Joystick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Joystick {} '{}': {} buttons, {} axes, {} hats",
            self.index,
            self.state.name(),
            self.num_buttons,
            self.num_axes,
            self.num_hats
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn pad() -> Joystick {
        // 6 buttons, 2 axes (indices 6..10), 1 hat (10..14)
        Joystick::new(0, "Test Pad", 2, 6, 1).unwrap()
    }

    #[test]
    fn test_joystick_new() {
        let joy = pad();
        assert_eq!(joy.index(), 0);
        assert_eq!(joy.name(), "Test Pad");
        assert_eq!(joy.capacity(), 14);
        assert_eq!(joy.threshold(), 10000);
    }

    #[test]
    fn test_index_layout() {
        let joy = pad();
        assert_eq!(joy.button_index(5), Some(5));
        assert_eq!(joy.button_index(6), None);
        assert_eq!(joy.axis_index(0, false), Some(6));
        assert_eq!(joy.axis_index(1, true), Some(9));
        assert_eq!(joy.axis_index(2, true), None);
        assert_eq!(joy.hat_index(0, hat::UP), Some(10));
        assert_eq!(joy.hat_index(0, hat::LEFT), Some(13));
        assert_eq!(joy.hat_index(0, hat::LEFTUP), None);
        assert_eq!(joy.hat_index(1, hat::UP), None);
    }

    #[rstest]
    #[case(3, JoyInput::Button(3), "Joy0Button3")]
    #[case(7, JoyInput::Axis { axis: 0, positive: true }, "Joy0Axis0+")]
    #[case(8, JoyInput::Axis { axis: 1, positive: false }, "Joy0Axis1-")]
    #[case(12, JoyInput::Hat { hat: 0, direction: hat::DOWN }, "Joy0Hat0Down")]
    fn test_decode(#[case] index: u16, #[case] input: JoyInput, #[case] name: &str) {
        let joy = pad();
        assert_eq!(joy.input_at(index), Some(input));
        assert_eq!(joy.input_name(index).as_deref(), Some(name));
    }

    #[test]
    fn test_decode_out_of_range() {
        let joy = pad();
        assert!(joy.input_at(14).is_none());
        assert!(joy.input_name(100).is_none());
    }

    #[rstest]
    #[case(0, 70000, 0)]
    #[case(0x8000, 1, 0)]
    #[case(0, 0, 0x4001)]
    #[case(u32::MAX, 0, 0)]
    #[case(0, u32::MAX, 1)]
    #[case(0, 0, u32::MAX)]
    fn test_oversized_layout_rejected(
        #[case] axes: u32,
        #[case] buttons: u32,
        #[case] hats: u32,
    ) {
        assert!(Joystick::new(0, "big", axes, buttons, hats).is_none());
    }

    #[test]
    fn test_largest_layout() {
        let joy = Joystick::new(0, "max", 0, MAX_INPUTS, 0).unwrap();
        assert_eq!(joy.capacity(), 0x10000);
        assert_eq!(joy.button_index(0xffff), Some(0xffff));
        assert_eq!(joy.button_index(0x10000), None);

        // Nothing wraps onto the low indices
        joy.handle_button(0x10000, true);
        assert!(!joy.get(0));
        joy.handle_button(0xffff, true);
        assert!(joy.get(0xffff));
    }

    #[test]
    fn test_last_hat_index_fits() {
        let joy = Joystick::new(0, "hats", 1, 2, 0x3fff).unwrap();
        assert_eq!(joy.capacity(), 0x10000);
        assert_eq!(joy.hat_index(0x3ffe, hat::LEFT), Some(0xffff));
        assert_eq!(joy.hat_index(0x3fff, hat::UP), None);
        assert_eq!(joy.axis_index(0, true), Some(3));
    }

    #[test]
    fn test_handle_button() {
        let joy = pad();
        joy.handle_button(2, true);
        assert!(joy.get(2));
        joy.handle_button(2, false);
        assert!(!joy.get(2));

        // Out of range buttons are ignored
        joy.handle_button(40, true);
        assert!(!joy.alerted());
    }

    #[test]
    fn test_axis_polarity() {
        let joy = pad();

        joy.handle_axis(0, -20000);
        assert!(joy.get(6));
        assert!(!joy.get(7));

        joy.handle_axis(0, 20000);
        assert!(!joy.get(6));
        assert!(joy.get(7));
    }

    #[test]
    fn test_axis_dead_zone() {
        let joy = pad();
        joy.handle_axis(1, 30000);
        assert!(joy.get(9));

        joy.handle_axis(1, 10000);
        assert!(!joy.get(8));
        assert!(!joy.get(9));

        joy.handle_axis(1, i16::MIN);
        assert!(joy.get(8));
    }

    #[test]
    fn test_set_threshold() {
        let joy = pad();
        joy.set_threshold(500);
        assert_eq!(joy.threshold(), 500);
        joy.handle_axis(0, 600);
        assert!(joy.get(7));

        joy.set_threshold(-5);
        assert_eq!(joy.threshold(), 0);
        joy.set_threshold(50000);
        assert_eq!(joy.threshold(), 32767);

        // Full deflection no longer leaves the dead zone
        joy.handle_axis(0, i16::MAX);
        assert!(!joy.get(7));
    }

    #[test]
    fn test_hat_values() {
        let joy = pad();
        joy.handle_hat(0, hat::RIGHTUP);
        assert!(joy.get(10));
        assert!(joy.get(11));
        assert!(!joy.get(12));

        joy.handle_hat(0, hat::DOWN);
        assert!(!joy.get(10));
        assert!(!joy.get(11));
        assert!(joy.get(12));

        joy.handle_hat(0, hat::CENTERED);
        assert!((10..14).all(|i| !joy.get(i)));
    }

    #[test]
    fn test_reset_all() {
        let joy = pad();
        joy.handle_button(0, true);
        joy.handle_hat(0, hat::LEFTDOWN);
        joy.reset_all();
        assert!((0..14).all(|i| !joy.get(i)));
        assert_eq!(joy.alerts(), 0);
    }
}
