// Licensed under the Apache-2.0 license

#![cfg_attr(target_arch = "riscv32", no_std)]

/// Build-time parameters of a platform's PMP implementation.
/// Handed to `mcu_pmp::Pmp::new` by platform setup code.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PmpConfig {
    /// Implementation granularity G. The smallest protectable region is
    /// 2^(G+2) bytes, and NA4 matching is only available when G is 0.
    /// Values above [`MAX_PMP_GRANULARITY`] are treated as that maximum.
    pub granularity: u32,
}

/// Largest G a 32-bit address can express: 2^31-byte granules.
pub const MAX_PMP_GRANULARITY: u32 = 29;

/// Ibex-style PMP: 4-byte granularity, all matching modes available.
pub const IBEX_PMP_CONFIG: PmpConfig = PmpConfig { granularity: 0 };

/// PMP with 16-byte granularity. NA4 is not selectable on such a part.
pub const COARSE_PMP_CONFIG: PmpConfig = PmpConfig { granularity: 2 };

impl Default for PmpConfig {
    fn default() -> Self {
        IBEX_PMP_CONFIG
    }
}

impl PmpConfig {
    pub const fn new(granularity: u32) -> Self {
        PmpConfig { granularity }
    }

    /// G, clamped to [`MAX_PMP_GRANULARITY`].
    pub const fn effective_granularity(&self) -> u32 {
        if self.granularity > MAX_PMP_GRANULARITY {
            MAX_PMP_GRANULARITY
        } else {
            self.granularity
        }
    }

    /// Byte alignment every PMP address must satisfy.
    pub const fn alignment(&self) -> u32 {
        4 << self.effective_granularity()
    }

    pub const fn min_region_size(&self) -> u64 {
        1u64 << (self.effective_granularity() + 2)
    }

    pub const fn supports_na4(&self) -> bool {
        self.granularity == 0
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_default_is_finest_granularity() {
        let config = PmpConfig::default();
        assert_eq!(config, IBEX_PMP_CONFIG);
        assert_eq!(config.alignment(), 4);
        assert_eq!(config.min_region_size(), 4);
        assert!(config.supports_na4());
    }

    #[test]
    fn test_coarse_granularity() {
        assert_eq!(COARSE_PMP_CONFIG.alignment(), 16);
        assert_eq!(COARSE_PMP_CONFIG.min_region_size(), 16);
        assert!(!COARSE_PMP_CONFIG.supports_na4());
    }

    #[test]
    fn test_oversized_granularity_is_clamped() {
        let config = PmpConfig::new(40);
        assert_eq!(config.effective_granularity(), MAX_PMP_GRANULARITY);
        assert_eq!(config.alignment(), 0x8000_0000);
        assert_eq!(config.min_region_size(), 0x8000_0000);
        assert_eq!(PmpConfig::new(30).alignment(), 0x8000_0000);
        assert_eq!(PmpConfig::new(29).alignment(), 0x8000_0000);
    }
}
