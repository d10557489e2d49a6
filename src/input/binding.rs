//! Packed binding word
//!
//! A command's bindings, focus tag and enabled flag share one `u64`:
//!
//! ```text
//!  63   62..60  59 58 57  56  55..54..51..48   47..32  31..16  15..0
//! [EN] [FOCUS] [ON2 ON1 ON0] -  [DEV2 DEV1 DEV0] [KEY2]  [KEY1]  [KEY0]
//! ```
//!
//! Occupied slots always form a prefix: `ON` reads `000`, `001`, `011` or `111`.

use std::fmt;

use super::focus::FocusGroup;
use super::registry::DeviceHandle;

pub const KEY_MASK: u64 = 0xffff;
pub const DEVICE_MASK: u64 = 0x7;
pub const FOCUS_MASK: u64 = 0x7;

pub const KEY_0_OFF: u32 = 0;
pub const KEY_1_OFF: u32 = 16;
pub const KEY_2_OFF: u32 = 32;
pub const DID_0_OFF: u32 = 48;
pub const DID_1_OFF: u32 = 51;
pub const DID_2_OFF: u32 = 54;
pub const ON_0_OFF: u32 = 57;
pub const ON_1_OFF: u32 = 58;
pub const ON_2_OFF: u32 = 59;
pub const FOCUS_OFF: u32 = 60;
pub const ENABLED_OFF: u32 = 63;

/// Number of binding slots per command
pub const SLOTS: usize = 3;

const KEY_OFFS: [u32; SLOTS] = [KEY_0_OFF, KEY_1_OFF, KEY_2_OFF];
const DID_OFFS: [u32; SLOTS] = [DID_0_OFF, DID_1_OFF, DID_2_OFF];
const ON_OFFS: [u32; SLOTS] = [ON_0_OFF, ON_1_OFF, ON_2_OFF];

/// Flag words accepted by `bind_with_flags`; they are OR-ed into the word.
pub mod flags {
    use super::{ENABLED_OFF, FOCUS_MASK, FOCUS_OFF};
    use crate::input::focus::FocusGroup;

    pub const NONE: u64 = 0;
    /// Command dispatches events (set by a plain `bind`)
    pub const ENABLED: u64 = 1 << ENABLED_OFF;
    pub const DEFAULT: u64 = ENABLED;

    /// Focus group tag
    pub fn focus(group: FocusGroup) -> u64 {
        (group.index() as u64 & FOCUS_MASK) << FOCUS_OFF
    }
}

/// One (device, key) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Binding {
    pub device: DeviceHandle,
    pub key: u16,
}

impl Binding {
    pub fn new(device: DeviceHandle, key: u16) -> Self {
        Self { device, key }
    }
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.device, self.key)
    }
}

/// Bindings, focus tag and enabled flag packed into one word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BindingWord(u64);

impl BindingWord {
    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u64 {
        self.0
    }

    fn field(self, offset: u32, mask: u64) -> u64 {
        (self.0 >> offset) & mask
    }

    fn set_field(&mut self, value: u64, offset: u32, mask: u64) {
        self.0 = (self.0 & !(mask << offset)) | ((value & mask) << offset);
    }

    /// The three slot flags as `ON2 ON1 ON0`
    pub fn occupancy(self) -> u8 {
        self.field(ON_0_OFF, 0b111) as u8
    }

    pub fn is_bound(self, slot: usize) -> bool {
        slot < SLOTS && self.field(ON_OFFS[slot], 1) == 1
    }

    /// Binding stored in `slot`, if the slot is occupied
    pub fn slot(self, slot: usize) -> Option<Binding> {
        if !self.is_bound(slot) {
            return None;
        }
        Some(Binding {
            device: DeviceHandle::from_bits(self.field(DID_OFFS[slot], DEVICE_MASK)),
            key: self.field(KEY_OFFS[slot], KEY_MASK) as u16,
        })
    }

    /// Occupied slots in slot order
    pub fn bindings(self) -> impl Iterator<Item = Binding> {
        (0..SLOTS).filter_map(move |slot| self.slot(slot))
    }

    pub fn len(self) -> usize {
        self.occupancy().count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.occupancy() == 0
    }

    fn write_slot(&mut self, slot: usize, binding: Binding) {
        self.set_field(binding.key as u64, KEY_OFFS[slot], KEY_MASK);
        self.set_field(binding.device.bits(), DID_OFFS[slot], DEVICE_MASK);
        self.set_field(1, ON_OFFS[slot], 1);
    }

    fn erase_slot(&mut self, slot: usize) {
        self.set_field(0, KEY_OFFS[slot], KEY_MASK);
        self.set_field(0, DID_OFFS[slot], DEVICE_MASK);
        self.set_field(0, ON_OFFS[slot], 1);
    }

    /// Rewrite the slots from a list, leftmost first
    fn fill(&mut self, bindings: &[Binding]) {
        for slot in 0..SLOTS {
            match bindings.get(slot) {
                Some(binding) => self.write_slot(slot, *binding),
                None => self.erase_slot(slot),
            }
        }
    }

    /// Append a binding, evicting slot 0 when all three are taken.
    ///
    /// Returns `false` and leaves the word untouched if the slot flags are not
    /// a contiguous prefix.
    pub fn push(&mut self, binding: Binding) -> bool {
        match self.occupancy() {
            0b000 => self.write_slot(0, binding),
            0b001 => self.write_slot(1, binding),
            0b011 => self.write_slot(2, binding),
            0b111 => {
                let survivors: Vec<Binding> = self.bindings().skip(1).collect();
                self.fill(&[survivors[0], survivors[1], binding]);
            }
            _ => return false,
        }
        true
    }

    /// Drop every slot bound to `device` and close the gaps.
    ///
    /// Returns `true` if anything was released.
    pub fn release_device(&mut self, device: DeviceHandle) -> bool {
        let before: Vec<Binding> = self.bindings().collect();
        let kept: Vec<Binding> = before
            .iter()
            .copied()
            .filter(|b| b.device != device)
            .collect();
        if kept.len() == before.len() {
            return false;
        }
        self.fill(&kept);
        true
    }

    /// Clear the slot flags, leaving keys, devices, focus and enabled bits
    pub fn unbind_all(&mut self) {
        self.set_field(0, ON_0_OFF, 0b111);
    }

    pub fn focus_group(self) -> FocusGroup {
        FocusGroup::from_bits(self.field(FOCUS_OFF, FOCUS_MASK))
    }

    pub fn set_focus_group(&mut self, group: FocusGroup) {
        self.set_field(group.index() as u64, FOCUS_OFF, FOCUS_MASK);
    }

    pub fn is_enabled(self) -> bool {
        self.field(ENABLED_OFF, 1) == 1
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.set_field(enabled as u64, ENABLED_OFF, 1);
    }

    /// OR raw flag bits into the word
    pub fn insert_flags(&mut self, flags: u64) {
        self.0 |= flags;
    }
}

impl fmt::Display for BindingWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:064b}", self.0)
    }
}
