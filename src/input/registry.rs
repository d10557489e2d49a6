//! Device registry
//!
//! Fixed table of eight device slots. A slot index is the device handle that
//! commands store in their 3-bit device fields.

use std::fmt;
use std::sync::Arc;

use super::device::{same_device, InputDevice};

/// Number of device slots; handles are 3 bits wide.
pub const MAX_DEVICES: usize = 8;

/// Slot index of a registered device (0–7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeviceHandle(u8);

impl DeviceHandle {
    /// Handle for slot `index`, if it exists
    pub fn new(index: usize) -> Option<Self> {
        if index < MAX_DEVICES {
            Some(Self(index as u8))
        } else {
            None
        }
    }

    /// Handle from the low 3 bits of a packed field
    pub(crate) fn from_bits(bits: u64) -> Self {
        Self((bits & 0x7) as u8)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub(crate) fn bits(self) -> u64 {
        self.0 as u64
    }
}

impl fmt::Display for DeviceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Table of registered devices.
#[derive(Debug, Default)]
pub struct DeviceRegistry {
    slots: [Option<Arc<dyn InputDevice>>; MAX_DEVICES],
}

impl DeviceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a device, or return its existing handle.
    ///
    /// New devices take the lowest vacant slot. Returns `None` when the table
    /// is full.
    pub fn register(&mut self, device: &Arc<dyn InputDevice>) -> Option<DeviceHandle> {
        if let Some(handle) = self.handle_of(device) {
            return Some(handle);
        }
        let vacant = self.slots.iter().position(|slot| slot.is_none())?;
        self.slots[vacant] = Some(Arc::clone(device));
        DeviceHandle::new(vacant)
    }

    /// Empty slot `handle`, returning the device that was there
    pub fn deregister(&mut self, handle: DeviceHandle) -> Option<Arc<dyn InputDevice>> {
        self.slots[handle.index()].take()
    }

    /// Handle of an already registered device
    pub fn handle_of(&self, device: &Arc<dyn InputDevice>) -> Option<DeviceHandle> {
        self.slots
            .iter()
            .position(|slot| slot.as_ref().is_some_and(|d| same_device(d, device)))
            .and_then(DeviceHandle::new)
    }

    /// Device registered under `handle`
    pub fn get(&self, handle: DeviceHandle) -> Option<&Arc<dyn InputDevice>> {
        self.slots[handle.index()].as_ref()
    }

    /// Number of occupied slots
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_full(&self) -> bool {
        self.slots.iter().all(|s| s.is_some())
    }

    /// Occupied slots in handle order
    pub fn iter(&self) -> impl Iterator<Item = (DeviceHandle, &Arc<dyn InputDevice>)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| Some((DeviceHandle(i as u8), slot.as_ref()?)))
    }

    /// Empty every slot
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = None;
        }
    }
}
