//! Mouse device
//!
//! Button bits are indexed by [`MouseButton`] ordinal. The cursor position is
//! tracked twice, relative to the scene and in absolute screen coordinates.

use parking_lot::Mutex;
use std::fmt;

use super::device::{DeviceState, InputDevice};

/// Size of the button index space
pub const MAX_BUTTONS: usize = 0x10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MouseButton {
    None = 0,
    Primary = 1,
    Middle = 2,
    Secondary = 3,
    Back = 4,
    Forward = 5,
}

impl MouseButton {
    pub const ALL: [MouseButton; 6] = [
        MouseButton::None,
        MouseButton::Primary,
        MouseButton::Middle,
        MouseButton::Secondary,
        MouseButton::Back,
        MouseButton::Forward,
    ];

    /// Device index of this button
    pub fn index(self) -> u16 {
        self as u16
    }

    pub fn from_index(index: u16) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }
}

/// Cursor coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Position before any event has been seen
    pub const UNKNOWN: Point = Point { x: -1.0, y: -1.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MouseEventKind {
    Pressed(MouseButton),
    Released(MouseButton),
    Moved,
    Dragged,
    Entered,
    Exited,
}

/// One event from the windowing layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseEvent {
    pub kind: MouseEventKind,
    /// Position relative to the scene
    pub scene: Point,
    /// Absolute screen position
    pub screen: Point,
}

#[derive(Debug)]
struct Cursor {
    scene: Point,
    screen: Point,
}

/// Mouse backend
#[derive(Debug)]
pub struct Mouse {
    state: DeviceState,
    cursor: Mutex<Cursor>,
}

impl Default for Mouse {
    fn default() -> Self {
        Self::new()
    }
}

impl Mouse {
    pub fn new() -> Self {
        Self {
            state: DeviceState::new("Mouse", MAX_BUTTONS),
            cursor: Mutex::new(Cursor {
                scene: Point::UNKNOWN,
                screen: Point::UNKNOWN,
            }),
        }
    }

    /// Apply an event. Every kind updates the cursor; press and release also
    /// flip the button bit.
    pub fn handle_event(&self, event: &MouseEvent) {
        {
            let mut cursor = self.cursor.lock();
            cursor.scene = event.scene;
            cursor.screen = event.screen;
        }
        match event.kind {
            MouseEventKind::Pressed(button) => {
                self.state.set(button.index() as i32, true);
            }
            MouseEventKind::Released(button) => {
                self.state.set(button.index() as i32, false);
            }
            _ => {}
        }
    }

    pub fn handle_button(&self, button: MouseButton, pressed: bool, scene: Point, screen: Point) {
        let kind = if pressed {
            MouseEventKind::Pressed(button)
        } else {
            MouseEventKind::Released(button)
        };
        self.handle_event(&MouseEvent { kind, scene, screen });
    }

    pub fn handle_move(&self, scene: Point, screen: Point) {
        self.handle_event(&MouseEvent {
            kind: MouseEventKind::Moved,
            scene,
            screen,
        });
    }

    pub fn is_down(&self, button: MouseButton) -> bool {
        self.state.get(button.index() as i32)
    }

    /// Cursor position relative to the scene
    pub fn scene_position(&self) -> Point {
        self.cursor.lock().scene
    }

    /// Absolute cursor position
    pub fn screen_position(&self) -> Point {
        self.cursor.lock().screen
    }

    pub fn release_all(&self) {
        self.state.release_all();
    }

    pub fn reset_alerts(&self) {
        self.state.reset_alerts();
    }
}

impl InputDevice for Mouse {
    fn name(&self) -> &str {
        self.state.name()
    }

    fn capacity(&self) -> usize {
        MAX_BUTTONS
    }

    fn get(&self, index: i32) -> bool {
        self.state.get(index)
    }

    fn alerts(&self) -> u16 {
        self.state.alerts()
    }
}

impl fmt::Display for Mouse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pos = self.scene_position();
        write!(f, "{} at ({}, {})", self.state, pos.x, pos.y)
    }
}
