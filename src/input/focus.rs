//! Focus groups
//!
//! Commands carry a 3-bit group tag; the system keeps one mask of active
//! groups. Suspending a group silences every command tagged with it without
//! touching their bindings.

use std::fmt;

/// One of the eight focus groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct FocusGroup(u8);

impl FocusGroup {
    pub const GROUP_0: FocusGroup = FocusGroup(0);
    pub const GROUP_1: FocusGroup = FocusGroup(1);
    pub const GROUP_2: FocusGroup = FocusGroup(2);
    pub const GROUP_3: FocusGroup = FocusGroup(3);
    pub const GROUP_4: FocusGroup = FocusGroup(4);
    pub const GROUP_5: FocusGroup = FocusGroup(5);
    pub const GROUP_6: FocusGroup = FocusGroup(6);
    pub const GROUP_7: FocusGroup = FocusGroup(7);

    /// Group `index` (0–7)
    pub fn new(index: u8) -> Option<Self> {
        if index < 8 {
            Some(Self(index))
        } else {
            None
        }
    }

    /// Group from the low 3 bits of a packed field
    pub(crate) fn from_bits(bits: u64) -> Self {
        Self((bits & 0x7) as u8)
    }

    pub fn index(self) -> u8 {
        self.0
    }

    /// Single-bit mask selecting this group
    pub fn mask(self) -> u8 {
        1 << self.0
    }
}

/// Set of active focus groups, one bit per group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FocusMask(u8);

impl Default for FocusMask {
    fn default() -> Self {
        Self::ALL
    }
}

impl FocusMask {
    pub const ALL: FocusMask = FocusMask(0xff);
    pub const NONE: FocusMask = FocusMask(0);

    pub fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    /// Deactivate the groups set in `groups`
    pub fn suspend(&mut self, groups: u8) {
        self.0 &= !groups;
    }

    /// Reactivate the groups set in `groups`
    pub fn resume(&mut self, groups: u8) {
        self.0 |= groups;
    }

    /// Replace the active set outright
    pub fn set(&mut self, groups: u8) {
        self.0 = groups;
    }

    pub fn contains(self, group: FocusGroup) -> bool {
        self.0 & group.mask() != 0
    }
}

impl FromIterator<FocusGroup> for FocusMask {
    fn from_iter<I: IntoIterator<Item = FocusGroup>>(iter: I) -> Self {
        Self(iter.into_iter().fold(0, |acc, g| acc | g.mask()))
    }
}

impl fmt::Display for FocusMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08b}", self.0)
    }
}
