// Licensed under the Apache-2.0 license

use crate::codec::AddressMatchingMode;
use crate::error::{PmpError, PmpResult};
use crate::PMP_ADDRESS_SHIFT;
use mcu_pmp_config::PmpConfig;

/// Alignment of any `pmpaddr` value, whatever the granularity.
pub const PMP_ADDRESS_MIN_ALIGNMENT: u32 = 4;

/// True if `address` is a multiple of the platform's `4 << G` granularity.
pub const fn check_alignment(address: u32, config: &PmpConfig) -> bool {
    address & (config.alignment() - 1) == 0
}

/// NA4 needs G = 0; the other modes are available at any granularity.
pub const fn check_mode_supported(mode: AddressMatchingMode, config: &PmpConfig) -> bool {
    !matches!(mode, AddressMatchingMode::Na4) || config.supports_na4()
}

/// True if a NAPOT `address` (size encoded in its low bits) is word aligned
/// and describes a region no smaller than one 2^(G+2)-byte granule.
///
/// The size encoding sets low address bits, so NAPOT values are not held to
/// the `4 << G` alignment of the other modes.
pub const fn check_napot_address(address: u32, config: &PmpConfig) -> bool {
    if address & (PMP_ADDRESS_MIN_ALIGNMENT - 1) != 0 {
        return false;
    }
    // Size is 2^(k+3) for k trailing ones; the granule needs k >= G - 1.
    (address >> PMP_ADDRESS_SHIFT).trailing_ones() + 1 >= config.effective_granularity()
}

pub(crate) fn require_alignment(address: u32, config: &PmpConfig) -> PmpResult<()> {
    if check_alignment(address, config) {
        Ok(())
    } else {
        Err(PmpError::AlignmentViolation)
    }
}

pub(crate) fn require_napot_address(address: u32, config: &PmpConfig) -> PmpResult<()> {
    if address & (PMP_ADDRESS_MIN_ALIGNMENT - 1) != 0 {
        Err(PmpError::AlignmentViolation)
    } else if !check_napot_address(address, config) {
        Err(PmpError::BadArg)
    } else {
        Ok(())
    }
}

pub(crate) fn require_mode(mode: AddressMatchingMode, config: &PmpConfig) -> PmpResult<()> {
    if check_mode_supported(mode, config) {
        Ok(())
    } else {
        Err(PmpError::ModeUnsupported)
    }
}
