//! Address family and the width constants it implies.

use std::fmt;

/// Maximum prefix length of an IPv4 network (32 bits).
pub const MAX_LENGTH_V4: u8 = 32;

/// Maximum prefix length of an IPv6 network (128 bits).
pub const MAX_LENGTH_V6: u8 = 128;

/// IP address family. Fixes the address width and therefore the
/// maximum prefix length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Family {
    V4,
    V6,
}

impl Family {
    /// Maximum prefix length, equal to the address width in bits.
    pub const fn max_prefix(self) -> u8 {
        match self {
            Family::V4 => MAX_LENGTH_V4,
            Family::V6 => MAX_LENGTH_V6,
        }
    }

    /// Length of the packed big-endian encoding.
    pub const fn byte_len(self) -> usize {
        match self {
            Family::V4 => 4,
            Family::V6 => 16,
        }
    }

    /// IP version number (4 or 6).
    pub const fn version(self) -> u8 {
        match self {
            Family::V4 => 4,
            Family::V6 => 6,
        }
    }

    /// All address bits set.
    pub const fn all_ones(self) -> u128 {
        match self {
            Family::V4 => u32::MAX as u128,
            Family::V6 => u128::MAX,
        }
    }

    /// Mask with the top `prefix_len` bits of the family width set.
    ///
    /// `prefix_len` is clamped to the family maximum.
    ///
    /// # Examples
    /// ```
    /// use cidr_man::Family;
    /// assert_eq!(Family::V4.prefix_mask(24), 0xFFFF_FF00);
    /// assert_eq!(Family::V6.prefix_mask(0), 0);
    /// ```
    pub fn prefix_mask(self, prefix_len: u8) -> u128 {
        let host_bits = u32::from(self.max_prefix() - prefix_len.min(self.max_prefix()));
        // checked_shl covers the 128-bit shift of a /0 IPv6 mask
        let host_mask = 1u128.checked_shl(host_bits).map_or(u128::MAX, |b| b - 1);
        self.all_ones() & !host_mask
    }

    /// Mask with the low `max_prefix - prefix_len` bits set.
    pub fn host_mask(self, prefix_len: u8) -> u128 {
        self.all_ones() & !self.prefix_mask(prefix_len)
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Family::V4 => f.write_str("IPv4"),
            Family::V6 => f.write_str("IPv6"),
        }
    }
}
