//! Input device capability
//!
//! Every backend (keyboard, mouse, joystick, scripted test input) answers one
//! question for the polling engine: is logical input `index` held right now?
//!
//! [`DeviceState`] is the shared building block behind the concrete backends.
//! It keeps the per-index bits plus an alert counter behind a mutex, so event
//! callbacks may flip bits from another thread while the tick loop polls.

use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

use super::bit_array::BitArray;

/// Polled view of an input device.
pub trait InputDevice: Send + Sync {
    /// Display name of the device
    fn name(&self) -> &str;

    /// Size of the device's index space
    fn capacity(&self) -> usize;

    /// Is input `index` currently active? Out-of-range indices read `false`.
    fn get(&self, index: i32) -> bool;

    /// Net number of activations minus releases since the last reset.
    ///
    /// The counter wraps at 16 bits, so a net release reads as `0xffff`.
    fn alerts(&self) -> u16;

    /// Did anything change since the last reset?
    fn alerted(&self) -> bool {
        self.alerts() != 0
    }
}

impl fmt::Debug for dyn InputDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InputDevice({:?}, {} inputs)", self.name(), self.capacity())
    }
}

/// Identity comparison for shared devices, ignoring vtable metadata.
pub(crate) fn same_device(a: &Arc<dyn InputDevice>, b: &Arc<dyn InputDevice>) -> bool {
    std::ptr::eq(
        Arc::as_ptr(a) as *const (),
        Arc::as_ptr(b) as *const (),
    )
}

#[derive(Debug)]
struct Inner {
    keys: BitArray,
    alert: i16,
}

/// Bit state plus alert counter for one device.
///
/// Usable directly as a virtual device: wrap it in an `Arc`, register it, and
/// drive it with [`DeviceState::set`].
#[derive(Debug)]
pub struct DeviceState {
    name: String,
    size: usize,
    inner: Mutex<Inner>,
}

impl DeviceState {
    /// Create a device with `size` inputs, all released
    pub fn new(name: impl Into<String>, size: usize) -> Self {
        Self {
            name: name.into(),
            size,
            inner: Mutex::new(Inner {
                keys: BitArray::new(size),
                alert: 0,
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> usize {
        self.size
    }

    fn in_range(&self, index: i32) -> bool {
        index >= 0 && (index as usize) < self.size
    }

    /// Read input `index`
    pub fn get(&self, index: i32) -> bool {
        if !self.in_range(index) {
            return false;
        }
        self.inner.lock().keys.get(index)
    }

    /// Record a raw edge for input `index`.
    ///
    /// Returns `true` if the stored value changed. Each 0→1 transition bumps
    /// the alert counter, each 1→0 transition lowers it.
    pub fn set(&self, index: i32, value: bool) -> bool {
        if !self.in_range(index) {
            return false;
        }
        let mut inner = self.inner.lock();
        if inner.keys.get(index) == value {
            return false;
        }
        inner.alert = if value {
            inner.alert.wrapping_add(1)
        } else {
            inner.alert.wrapping_sub(1)
        };
        inner.keys.set(index, value);
        true
    }

    /// Release every held input, counting each release
    pub fn release_all(&self) {
        let mut inner = self.inner.lock();
        let held = inner.keys.count_ones() as i16;
        inner.alert = inner.alert.wrapping_sub(held);
        inner.keys.clear();
    }

    /// Alert counter as an unsigned 16-bit value
    pub fn alerts(&self) -> u16 {
        self.inner.lock().alert as u16
    }

    pub fn alerted(&self) -> bool {
        self.inner.lock().alert != 0
    }

    /// Zero the alert counter without touching input state
    pub fn reset_alerts(&self) {
        self.inner.lock().alert = 0;
    }

    /// Indices of all currently active inputs
    pub fn active(&self) -> Vec<i32> {
        self.inner.lock().keys.iter_ones().collect()
    }
}

impl InputDevice for DeviceState {
    fn name(&self) -> &str {
        &self.name
    }

    fn capacity(&self) -> usize {
        self.size
    }

    fn get(&self, index: i32) -> bool {
        DeviceState::get(self, index)
    }

    fn alerts(&self) -> u16 {
        DeviceState::alerts(self)
    }
}

impl fmt::Display for DeviceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InputDevice: {}", self.name)
    }
}
