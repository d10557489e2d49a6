//! Command binding and polling engine
//!
//! Devices expose boolean inputs; commands bind up to three of them and are
//! polled once per tick to produce edge events.
//!
//! # Architecture
//!
//! - [`InputSystem`] owns the device table (8 slots), every command and the
//!   focus mask
//! - Each [`Command`] packs its bindings, focus group and enabled flag into a
//!   64-bit [`BindingWord`] and keeps a 64-tick history register
//! - Backends ([`Keyboard`], [`Mouse`], [`Joystick`]) wrap a [`DeviceState`]
//!
//! # Thread Safety
//!
//! Ticking is single-threaded. Device state is behind a mutex so event
//! handlers on other threads can feed devices while the tick loop polls.

pub mod binding;
pub mod bit_array;
pub mod command;
pub mod device;
pub mod focus;
pub mod joystick;
pub mod keyboard;
pub mod keynames;
pub mod mouse;
pub mod registry;
pub mod system;

pub use binding::{flags, Binding, BindingWord};
pub use bit_array::BitArray;
pub use command::{Command, CommandHandler, Gesture, GestureLog, OnGesture};
pub use device::{DeviceState, InputDevice};
pub use focus::{FocusGroup, FocusMask};
pub use joystick::{hat, JoyInput, Joystick};
pub use keyboard::Keyboard;
pub use keynames::{key_from_name, key_name};
pub use mouse::{Mouse, MouseButton, MouseEvent, MouseEventKind, Point};
pub use registry::{DeviceHandle, DeviceRegistry, MAX_DEVICES};
pub use system::{CommandId, InputError, InputSystem};
