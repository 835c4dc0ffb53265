// Licensed under the Apache-2.0 license

//! Region configuration with write-then-verify.
//!
//! PMP fields are WARL: a write of an unsupported value is silently replaced
//! by some legal value. Every write here is therefore followed by a read-back,
//! and a difference is reported as [`PmpError::WarlMismatch`].
//!
//! Address registers are always written before the configuration octet.
//! Committing a lock also freezes the address register, so reversing the order
//! could pin an unintended address until reset.

use crate::codec::{encode, AddressMatchingMode, Lock, PackedConfig, Permissions, PmpRegionConfig};
use crate::csr::{CsrId, PmpCsr};
use crate::error::{PmpError, PmpResult};
use crate::locator::RegionIndex;
use crate::validate::{require_alignment, require_mode, require_napot_address};
use crate::PMP_ADDRESS_SHIFT;
use log::{debug, warn};
use mcu_pmp_config::PmpConfig;

/// Handle on the PMP unit of one hart.
///
/// There is no software lock around the registers. If this may be re-entered
/// (interrupts, other contexts on the same hart), each configure call must be
/// made from within a critical section.
pub struct Pmp<C: PmpCsr> {
    csr: C,
    config: PmpConfig,
}

impl<C: PmpCsr> Pmp<C> {
    pub const fn new(csr: C, config: PmpConfig) -> Self {
        Pmp { csr, config }
    }

    pub fn config(&self) -> &PmpConfig {
        &self.config
    }

    pub fn csr(&self) -> &C {
        &self.csr
    }

    /// Disables matching for `region` and sets its address register, which a
    /// following TOR region may still use as its lower bound.
    pub fn configure_off(&self, region: usize, address: u32) -> PmpResult<()> {
        let region = RegionIndex::new(region)?;
        require_alignment(address, &self.config)?;

        let octet = encode(Permissions::None, AddressMatchingMode::Off, Lock::Unlocked);
        self.write_address(region, address)?;
        self.write_octet(region, octet)
    }

    /// Protects the four bytes at `address`.
    pub fn configure_na4(
        &self,
        region: usize,
        config: &PmpRegionConfig,
        address: u32,
    ) -> PmpResult<()> {
        let region = RegionIndex::new(region)?;
        require_mode(AddressMatchingMode::Na4, &self.config)?;
        require_alignment(address, &self.config)?;

        let octet = encode(config.permissions, AddressMatchingMode::Na4, config.lock);
        self.write_address(region, address)?;
        self.write_octet(region, octet)
    }

    /// Protects a naturally aligned power-of-two range. `address` must already
    /// carry the size encoding; see [`crate::napot::napot_address`]. The range
    /// must be at least one granule, otherwise [`PmpError::BadArg`].
    pub fn configure_napot(
        &self,
        region: usize,
        config: &PmpRegionConfig,
        address: u32,
    ) -> PmpResult<()> {
        let region = RegionIndex::new(region)?;
        require_mode(AddressMatchingMode::Napot, &self.config)?;
        require_napot_address(address, &self.config)?;

        let octet = encode(config.permissions, AddressMatchingMode::Napot, config.lock);
        self.write_address(region, address)?;
        self.write_octet(region, octet)
    }

    /// Protects `start..end` using `region` and the address register of the
    /// region below it.
    ///
    /// The lower address register is only written when it does not already
    /// hold `start`. If the lower region is locked and holds a different
    /// value, nothing is written and [`PmpError::RangeConflict`] is returned.
    pub fn configure_tor(
        &self,
        region: usize,
        config: &PmpRegionConfig,
        start: u32,
        end: u32,
    ) -> PmpResult<()> {
        let region = RegionIndex::new(region)?;
        require_mode(AddressMatchingMode::Tor, &self.config)?;
        require_alignment(start, &self.config)?;
        require_alignment(end, &self.config)?;
        if start > end {
            return Err(PmpError::BadArg);
        }
        let lower = self.tor_lower_bound_target(region, start)?;

        let octet = encode(config.permissions, AddressMatchingMode::Tor, config.lock);
        if let Some(lower) = lower {
            self.write_address(lower, start)?;
        }
        self.write_address(region, end)?;
        self.write_octet(region, octet)
    }

    /// Reads the octet of `region` without decoding it.
    pub(crate) fn read_octet(&self, region: RegionIndex) -> PackedConfig {
        region.extract_octet(self.csr.read(region.cfg_csr()))
    }

    /// Decides which register, if any, must be written to place `start` as
    /// the lower bound of a TOR `region`.
    fn tor_lower_bound_target(
        &self,
        region: RegionIndex,
        start: u32,
    ) -> PmpResult<Option<RegionIndex>> {
        let Some(lower) = region.previous() else {
            // Region 0 is bounded below by address 0.
            if start == 0 {
                return Ok(None);
            }
            warn!("pmp: region 0 TOR cannot start at {:#010x}", start);
            return Err(PmpError::RangeConflict);
        };

        let current = self.csr.read(lower.addr_csr());
        if current == raw_address(start) {
            return Ok(None);
        }
        if self.read_octet(lower).is_locked() {
            warn!(
                "pmp: region {} TOR start {:#010x} unreachable, locked region {} holds {:#010x}",
                region,
                start,
                lower,
                current.overflowing_shl(PMP_ADDRESS_SHIFT).0
            );
            return Err(PmpError::RangeConflict);
        }
        Ok(Some(lower))
    }

    fn write_address(&self, region: RegionIndex, address: u32) -> PmpResult<()> {
        let csr = region.addr_csr();
        let value = raw_address(address);
        debug!("pmp: {} <- {:#010x}", csr, value);
        self.csr.write(csr, value);
        self.verify(csr, value, self.csr.read(csr))
    }

    fn write_octet(&self, region: RegionIndex, octet: PackedConfig) -> PmpResult<()> {
        let csr = region.cfg_csr();
        let value = region.insert_octet(self.csr.read(csr), octet);
        debug!("pmp: {} <- {:#010x} (region {})", csr, value, region);
        self.csr.write(csr, value);

        let written = region.extract_octet(self.csr.read(csr));
        self.verify(csr, u32::from(octet.get()), u32::from(written.get()))
    }

    fn verify(&self, csr: CsrId, expected: u32, actual: u32) -> PmpResult<()> {
        if expected != actual {
            warn!(
                "pmp: {} WARL mismatch, wrote {:#010x}, read back {:#010x}",
                csr, expected, actual
            );
            return Err(PmpError::WarlMismatch);
        }
        Ok(())
    }
}

/// `pmpaddr` holds bits 33:2 of the byte address.
pub(crate) const fn raw_address(address: u32) -> u32 {
    address >> PMP_ADDRESS_SHIFT
}
