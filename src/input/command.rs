//! Command state machine
//!
//! A command polls up to three bound inputs once per tick, ORs them into a
//! single bit, and shifts that bit into a 64-tick history register. The two
//! newest history bits select the lifecycle event:
//!
//! | `states & 0b11` | event                                   |
//! |-----------------|-----------------------------------------|
//! | `01`            | pressed                                 |
//! | `11`            | down (held)                             |
//! | `10`            | released, or double-tapped if detected  |
//! | `00`            | up (idle)                               |
//!
//! Double-tap detection does not look at timestamps. It walks the history
//! register inside a power-of-two window counting alternations.

use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

use super::binding::{Binding, BindingWord};
use super::focus::{FocusGroup, FocusMask};
use super::registry::DeviceRegistry;

/// Double-tap detection enabled
pub const TAP_ENABLED: u64 = 0x1;
/// Low nibble of `interval` reserved for flags
pub const TAP_FLAG_MASK: u64 = 0xf;
/// Largest accepted tap interval exponent
pub const MAX_TAP_TICKS: u32 = 63;

/// Lifecycle event produced by one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gesture {
    Pressed,
    Down,
    Released,
    Up,
    DoubleTapped,
}

impl Gesture {
    /// Event for the two newest history bits, without tap detection
    pub fn from_edge(states: u64) -> Self {
        match states & 0b11 {
            0b01 => Gesture::Pressed,
            0b11 => Gesture::Down,
            0b10 => Gesture::Released,
            _ => Gesture::Up,
        }
    }
}

/// Receiver for a command's events. Every hook defaults to a no-op.
pub trait CommandHandler: Send {
    fn pressed(&mut self, _delta: f32) {}
    fn down(&mut self, _delta: f32) {}
    fn released(&mut self, _delta: f32) {}
    fn up(&mut self, _delta: f32) {}
    fn double_tapped(&mut self, _delta: f32) {}
    /// Runs after the edge event on every dispatched tick
    fn tick(&mut self, _delta: f32) {}
}

/// Handler that ignores everything.
impl CommandHandler for () {}

/// Adapts a closure into a handler; the tick hook is not forwarded.
pub struct OnGesture<F>(pub F);

impl<F> CommandHandler for OnGesture<F>
where
    F: FnMut(Gesture, f32) + Send,
{
    fn pressed(&mut self, delta: f32) {
        (self.0)(Gesture::Pressed, delta)
    }

    fn down(&mut self, delta: f32) {
        (self.0)(Gesture::Down, delta)
    }

    fn released(&mut self, delta: f32) {
        (self.0)(Gesture::Released, delta)
    }

    fn up(&mut self, delta: f32) {
        (self.0)(Gesture::Up, delta)
    }

    fn double_tapped(&mut self, delta: f32) {
        (self.0)(Gesture::DoubleTapped, delta)
    }
}

#[derive(Debug, Default)]
struct LogInner {
    gestures: Vec<Gesture>,
    ticks: usize,
}

/// Handler that queues every event for later inspection.
///
/// Clones share the same queue, so one copy can be handed to a command while
/// another is drained by the game loop.
#[derive(Debug, Clone, Default)]
pub struct GestureLog {
    inner: Arc<Mutex<LogInner>>,
}

impl GestureLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, gesture: Gesture) {
        self.inner.lock().gestures.push(gesture);
    }

    /// Drain queued events
    pub fn take(&self) -> Vec<Gesture> {
        std::mem::take(&mut self.inner.lock().gestures)
    }

    /// Copy of the queued events
    pub fn snapshot(&self) -> Vec<Gesture> {
        self.inner.lock().gestures.clone()
    }

    pub fn last(&self) -> Option<Gesture> {
        self.inner.lock().gestures.last().copied()
    }

    /// Number of tick hooks seen
    pub fn ticks(&self) -> usize {
        self.inner.lock().ticks
    }
}

impl CommandHandler for GestureLog {
    fn pressed(&mut self, _delta: f32) {
        self.push(Gesture::Pressed)
    }

    fn down(&mut self, _delta: f32) {
        self.push(Gesture::Down)
    }

    fn released(&mut self, _delta: f32) {
        self.push(Gesture::Released)
    }

    fn up(&mut self, _delta: f32) {
        self.push(Gesture::Up)
    }

    fn double_tapped(&mut self, _delta: f32) {
        self.push(Gesture::DoubleTapped)
    }

    fn tick(&mut self, _delta: f32) {
        self.inner.lock().ticks += 1;
    }
}

/// Walk the history for a press-release-press ending in the current release.
///
/// Starts at history bit 2 (mask `4`), just past the `10` edge, and moves to
/// older ticks. A mask beyond the window, or running off the register, means
/// no double tap.
pub fn scan_double_tap(states: u64, interval: u64) -> bool {
    let window = interval & !TAP_FLAG_MASK;
    let mut looking_for = false;
    let mut gestures = 0;
    let mut mask: u64 = 4;
    while mask != 0 {
        if mask > window {
            return false;
        }
        let press = states & mask != 0;
        if looking_for == press {
            looking_for = !looking_for;
            gestures += 1;
            if gestures == 3 {
                return true;
            }
        }
        mask <<= 1;
    }
    false
}

/// A bindable action tracked across ticks.
pub struct Command {
    name: String,
    keys: BindingWord,
    states: u64,
    bits: i8,
    interval: u64,
    listed: bool,
    handler: Box<dyn CommandHandler>,
}

impl Command {
    pub fn new(name: impl Into<String>, handler: impl CommandHandler + 'static) -> Self {
        Self {
            name: name.into(),
            keys: BindingWord::default(),
            states: 0,
            bits: 0,
            interval: 0,
            listed: false,
            handler: Box::new(handler),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Packed binding word
    pub fn keys(&self) -> BindingWord {
        self.keys
    }

    pub(crate) fn keys_mut(&mut self) -> &mut BindingWord {
        &mut self.keys
    }

    /// History register, newest tick in bit 0
    pub fn states(&self) -> u64 {
        self.states
    }

    /// Active ticks within the 64-tick history window
    pub fn bits(&self) -> i8 {
        self.bits
    }

    pub fn bindings(&self) -> Vec<Binding> {
        self.keys.bindings().collect()
    }

    /// Input was active on the latest tick
    pub fn is_active(&self) -> bool {
        self.states & 1 != 0
    }

    pub(crate) fn is_listed(&self) -> bool {
        self.listed
    }

    pub(crate) fn set_listed(&mut self, listed: bool) {
        self.listed = listed;
    }

    pub fn focus_group(&self) -> FocusGroup {
        self.keys.focus_group()
    }

    pub fn set_focus_group(&mut self, group: FocusGroup) {
        self.keys.set_focus_group(group);
    }

    /// Command dispatches events when focused
    pub fn is_enabled(&self) -> bool {
        self.keys.is_enabled()
    }

    /// Stop dispatching; history keeps recording
    pub fn pause(&mut self) {
        self.keys.set_enabled(false);
    }

    pub fn unpause(&mut self) {
        self.keys.set_enabled(true);
    }

    /// Raw tap interval word
    pub fn interval(&self) -> u64 {
        self.interval
    }

    pub fn double_tap_enabled(&self) -> bool {
        self.interval & TAP_ENABLED != 0
    }

    /// Enable double-tap detection with a window of `8 << ticks`.
    ///
    /// Rejects exponents above 63.
    pub fn set_tap_interval(&mut self, ticks: u32) -> bool {
        if ticks > MAX_TAP_TICKS {
            return false;
        }
        self.interval = (8u64 << ticks) | TAP_ENABLED;
        true
    }

    /// Enable double-tap detection from a time scale in seconds
    pub fn set_tap_time(&mut self, seconds: f32, ticks_per_second: u32) -> bool {
        let ticks = seconds * ticks_per_second as f32;
        if !ticks.is_finite() || ticks < 0.0 {
            return false;
        }
        self.set_tap_interval(ticks as u32)
    }

    pub fn disable_double_tap(&mut self) {
        self.interval &= !TAP_ENABLED;
    }

    /// Reset history and drop all bindings. The command stays listed.
    pub fn clear(&mut self) {
        self.states = 0;
        self.bits = 0;
        self.keys.unbind_all();
    }

    /// Poll bound inputs and advance one tick.
    ///
    /// Returns the event dispatched to the handler, or `None` when the command
    /// is paused or its focus group is suspended. History is recorded either
    /// way.
    pub(crate) fn execute(
        &mut self,
        devices: &DeviceRegistry,
        focus: FocusMask,
        delta: f32,
    ) -> Option<Gesture> {
        let key = self.keys.bindings().any(|binding| {
            devices
                .get(binding.device)
                .is_some_and(|device| device.get(binding.key as i32))
        });
        self.record(key);

        if !self.is_enabled() || !focus.contains(self.focus_group()) {
            return None;
        }

        let gesture = match Gesture::from_edge(self.states) {
            Gesture::Released
                if self.double_tap_enabled() && scan_double_tap(self.states, self.interval) =>
            {
                Gesture::DoubleTapped
            }
            edge => edge,
        };
        log::trace!("{}: {:?}", self.name, gesture);

        match gesture {
            Gesture::Pressed => self.handler.pressed(delta),
            Gesture::Down => self.handler.down(delta),
            Gesture::Released => self.handler.released(delta),
            Gesture::Up => self.handler.up(delta),
            Gesture::DoubleTapped => self.handler.double_tapped(delta),
        }
        self.handler.tick(delta);
        Some(gesture)
    }

    /// Shift one input bit into the history and keep `bits` in step
    fn record(&mut self, key: bool) {
        let key = key as u64;
        self.bits = self
            .bits
            .wrapping_sub((self.states >> 63) as i8)
            .wrapping_add(key as i8);
        self.states = (self.states << 1) | key;
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("keys", &self.keys)
            .field("states", &format_args!("{:#018x}", self.states))
            .field("bits", &self.bits)
            .field("interval", &self.interval)
            .field("listed", &self.listed)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let binds: Vec<String> = self.keys.bindings().map(|b| b.to_string()).collect();
        write!(
            f,
            "{}: Binds <{}> Group {}; {} ({:b})",
            self.name,
            binds.join(", "),
            self.focus_group().index(),
            self.is_enabled(),
            self.keys.bits()
        )
    }
}
