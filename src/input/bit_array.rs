//! Packed bit storage
//!
//! A fixed-size boolean vector backed by bytes. Bit `i` lives in byte `i / 8`,
//! most significant bit first.
//!
//! Out-of-range access never panics: reads outside the addressable range
//! return `false` and writes are dropped. The polling loop relies on this.

use std::fmt;

/// Compact array of bits with saturating range semantics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitArray {
    bytes: Box<[u8]>,
    size: usize,
}

/// Bytes needed to hold `bits` bits
fn byte_len(bits: usize) -> usize {
    bits.div_ceil(8)
}

impl BitArray {
    /// Create a zeroed array holding `size` bits
    pub fn new(size: usize) -> Self {
        Self {
            bytes: vec![0u8; byte_len(size)].into_boxed_slice(),
            size,
        }
    }

    /// Number of bits this array was created for
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of backing bytes
    pub fn length(&self) -> usize {
        self.bytes.len()
    }

    /// Padding bits past `size()` in the last byte
    pub fn remainder(&self) -> usize {
        (self.bytes.len() << 3) - self.size
    }

    /// Addressable bits, padding included
    pub fn capacity(&self) -> usize {
        self.bytes.len() << 3
    }

    /// Split a bit index into (byte, mask), or `None` when out of range
    fn locate(&self, bit: i32) -> Option<(usize, u8)> {
        let bit = usize::try_from(bit).ok()?;
        if bit >= self.capacity() {
            return None;
        }
        Some((bit >> 3, 0x80u8 >> (bit & 7)))
    }

    /// Read a bit. Out-of-range indices read as `false`.
    pub fn get(&self, bit: i32) -> bool {
        match self.locate(bit) {
            Some((index, mask)) => self.bytes[index] & mask != 0,
            None => false,
        }
    }

    /// Write a bit. Out-of-range indices are ignored.
    pub fn set(&mut self, bit: i32, value: bool) {
        if let Some((index, mask)) = self.locate(bit) {
            if value {
                self.bytes[index] |= mask;
            } else {
                self.bytes[index] &= !mask;
            }
        }
    }

    /// Clear every bit
    pub fn clear(&mut self) {
        self.bytes.fill(0);
    }

    /// Number of set bits
    pub fn count_ones(&self) -> usize {
        self.bytes.iter().map(|b| b.count_ones() as usize).sum()
    }

    /// Indices of all set bits, ascending
    pub fn iter_ones(&self) -> impl Iterator<Item = i32> + '_ {
        self.bytes
            .iter()
            .enumerate()
            .filter(|(_, byte)| **byte != 0)
            .flat_map(|(index, byte)| {
                (0..8).filter_map(move |offset| {
                    if byte & (0x80u8 >> offset) != 0 {
                        Some(((index << 3) + offset) as i32)
                    } else {
                        None
                    }
                })
            })
    }
}

/// Dump of the array: a size summary followed by one binary row per byte.
impl fmt::Display for BitArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Size: {}b ({}B +{}b)",
            self.size,
            self.length(),
            self.remainder()
        )?;
        for (index, byte) in self.bytes.iter().enumerate() {
            writeln!(f, "[{}]\t[{:08b}]", index, byte)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 0, 0)]
    #[case(1, 1, 7)]
    #[case(8, 1, 0)]
    #[case(50, 7, 6)]
    #[case(256, 32, 0)]
    #[case(0x10000, 0x2000, 0)]
    fn test_dimensions(#[case] size: usize, #[case] length: usize, #[case] remainder: usize) {
        let bits = BitArray::new(size);
        assert_eq!(bits.size(), size);
        assert_eq!(bits.length(), length);
        assert_eq!(bits.remainder(), remainder);
    }

    #[test]
    fn test_set_and_get() {
        let mut bits = BitArray::new(16);
        bits.set(3, true);
        assert!(bits.get(3));
        assert!(!bits.get(2));
        assert!(!bits.get(4));

        bits.set(3, false);
        assert!(!bits.get(3));
    }

    #[test]
    fn test_msb_first_layout() {
        let mut bits = BitArray::new(16);
        bits.set(0, true);
        bits.set(9, true);
        let dump = bits.to_string();
        assert!(dump.contains("[0]\t[10000000]"));
        assert!(dump.contains("[1]\t[01000000]"));
    }

    #[test]
    fn test_padding_bits_are_addressable() {
        // 50 bits → 7 bytes, 6 padding bits
        let mut bits = BitArray::new(50);
        bits.set(55, true);
        assert!(bits.get(55));
        bits.set(56, true);
        assert!(!bits.get(56));
    }

    #[rstest]
    #[case(-1)]
    #[case(-8)]
    #[case(i32::MIN)]
    #[case(16)]
    #[case(17)]
    #[case(i32::MAX)]
    fn test_out_of_range_is_ignored(#[case] bit: i32) {
        let mut bits = BitArray::new(16);
        bits.set(bit, true);
        assert!(!bits.get(bit));
        assert_eq!(bits.count_ones(), 0);
    }

    #[test]
    fn test_empty_array() {
        let mut bits = BitArray::new(0);
        bits.set(0, true);
        assert!(!bits.get(0));
        assert_eq!(bits.length(), 0);
        assert_eq!(bits.remainder(), 0);
    }

    #[test]
    fn test_clear_and_count() {
        let mut bits = BitArray::new(64);
        for i in (0..64).step_by(3) {
            bits.set(i, true);
        }
        assert_eq!(bits.count_ones(), 22);
        assert_eq!(
            bits.iter_ones().take(3).collect::<Vec<_>>(),
            vec![0, 3, 6]
        );

        bits.clear();
        assert_eq!(bits.count_ones(), 0);
        assert_eq!(bits.iter_ones().count(), 0);
    }

    #[test]
    fn test_alternating_patterns() {
        let mut bits = BitArray::new(256);
        let top = (bits.size() + bits.remainder()) as i32;
        for i in 0..top {
            if i % 4 != 0 {
                bits.set(i, true);
            }
        }
        for i in 0..top {
            if i % 2 == 0 {
                bits.set(i, false);
            }
        }
        for i in 0..top {
            assert_eq!(bits.get(i), i % 2 == 1, "bit {}", i);
        }
    }

    proptest! {
        #[test]
        fn prop_last_write_wins(writes in prop::collection::vec((0i32..64, any::<bool>()), 0..200)) {
            let mut bits = BitArray::new(64);
            let mut model = [false; 64];
            for (bit, value) in &writes {
                bits.set(*bit, *value);
                model[*bit as usize] = *value;
            }
            for (i, expected) in model.iter().enumerate() {
                prop_assert_eq!(bits.get(i as i32), *expected);
            }
        }

        #[test]
        fn prop_out_of_range_never_panics(size in 0usize..200, bit in any::<i32>(), value in any::<bool>()) {
            let mut bits = BitArray::new(size);
            let capacity = bits.size() + bits.remainder();
            bits.set(bit, value);
            if bit < 0 || bit as usize >= capacity {
                prop_assert!(!bits.get(bit));
                prop_assert_eq!(bits.count_ones(), 0);
            } else {
                prop_assert_eq!(bits.get(bit), value);
            }
        }
    }
}
