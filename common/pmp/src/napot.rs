// Licensed under the Apache-2.0 license

//! NAPOT address encoding.
//!
//! A NAPOT `pmpaddr` value carries the region size in its low bits: the
//! region `yyyy00000..=yyyy11111` is written as `yyyy011`, and the index k of
//! the lowest clear bit gives a size of 2^(k+3) bytes.

use crate::error::{PmpError, PmpResult};
use crate::PMP_ADDRESS_SHIFT;

/// Smallest region a NAPOT entry can describe.
pub const NAPOT_MIN_SIZE: u64 = 8;

/// Byte range described by a NAPOT address value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NapotRange {
    pub base: u64,
    pub size: u64,
}

impl NapotRange {
    /// Exclusive end of the range.
    pub const fn end(&self) -> u64 {
        self.base + self.size
    }
}

/// Builds the address argument of `configure_napot` for `size` bytes at
/// `base`.
///
/// `size` must be a power of two of at least 8 bytes and `base` must be
/// aligned to it.
pub fn napot_address(base: u32, size: u64) -> PmpResult<u32> {
    if size < NAPOT_MIN_SIZE || !size.is_power_of_two() || size > 1u64 << u32::BITS {
        return Err(PmpError::BadArg);
    }
    if u64::from(base) & (size - 1) != 0 {
        return Err(PmpError::AlignmentViolation);
    }
    let raw = (base >> PMP_ADDRESS_SHIFT) | ((size >> 3) - 1) as u32;
    Ok(raw << PMP_ADDRESS_SHIFT)
}

/// Decodes a raw `pmpaddr` value holding a NAPOT encoding.
pub fn napot_range_raw(raw: u32) -> NapotRange {
    let k = raw.trailing_ones();
    let low_ones = if k >= u32::BITS {
        u32::MAX
    } else {
        (1u32 << k) - 1
    };
    NapotRange {
        base: u64::from(raw & !low_ones) << PMP_ADDRESS_SHIFT,
        size: 1u64 << (k + 3),
    }
}

/// Decodes an address in the form `configure_napot` takes.
pub fn napot_range(address: u32) -> NapotRange {
    napot_range_raw(address >> PMP_ADDRESS_SHIFT)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_napot_address() {
        assert_eq!(napot_address(0x8000_0000, 8), Ok(0x8000_0000));
        assert_eq!(napot_address(0x8000_0000, 16), Ok(0x8000_0004));
        assert_eq!(napot_address(0x2000_0000, 0x1000), Ok(0x2000_07fc));
        assert_eq!(napot_address(0, 1 << 32), Ok(0x7fff_fffc));
    }

    #[test]
    fn test_napot_address_invalid() {
        assert_eq!(napot_address(0x1000, 4), Err(PmpError::BadArg));
        assert_eq!(napot_address(0x1000, 24), Err(PmpError::BadArg));
        assert_eq!(napot_address(0, 1 << 33), Err(PmpError::BadArg));
        assert_eq!(
            napot_address(0x1800, 0x1000),
            Err(PmpError::AlignmentViolation)
        );
    }

    #[test]
    fn test_napot_range() {
        assert_eq!(
            napot_range(0x2000_07fc),
            NapotRange {
                base: 0x2000_0000,
                size: 0x1000
            }
        );
        assert_eq!(
            napot_range(0x8000_0000),
            NapotRange {
                base: 0x8000_0000,
                size: 8
            }
        );
        assert_eq!(napot_range(0x4000_0004).end(), 0x4000_0010);
    }

    #[test]
    fn test_napot_range_raw_all_ones() {
        let range = napot_range_raw(u32::MAX);
        assert_eq!(range.base, 0);
        assert_eq!(range.size, 1 << 35);
    }
}
