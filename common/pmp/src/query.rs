// Licensed under the Apache-2.0 license

use crate::codec::{decode, pmpcfg_octet, AddressMatchingMode, Lock, PmpRegionConfig};
use crate::csr::PmpCsr;
use crate::error::PmpResult;
use crate::locator::RegionIndex;
use crate::napot::{napot_range, NapotRange};
use crate::region::Pmp;
use crate::PMP_ADDRESS_SHIFT;
use core::fmt;

/// Address operand(s) of a region, as byte addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionAddress {
    /// OFF, NA4 and NAPOT regions use their own address register only.
    Single(u32),
    /// TOR regions span from the previous region's address to their own.
    Range { start: u32, end: u32 },
}

/// Current hardware configuration of one region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PmpRegionInfo {
    pub region: RegionIndex,
    pub mode: AddressMatchingMode,
    pub config: PmpRegionConfig,
    pub address: RegionAddress,
}

impl PmpRegionInfo {
    /// Range covered by a NAPOT region; `None` for other modes.
    pub fn napot_range(&self) -> Option<NapotRange> {
        match (self.mode, self.address) {
            (AddressMatchingMode::Napot, RegionAddress::Single(address)) => {
                Some(napot_range(address))
            }
            _ => None,
        }
    }
}

impl fmt::Display for PmpRegionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (r, w, x) = self.config.permissions.rwx();
        let flags = [
            if self.config.lock == Lock::Locked { "l" } else { "-" },
            if r { "r" } else { "-" },
            if w { "w" } else { "-" },
            if x { "x" } else { "-" },
        ];
        write!(f, "[{}]: {:<5} ", self.region, self.mode.name())?;
        match self.address {
            RegionAddress::Single(address) => write!(f, "addr={:#010X}", address)?,
            RegionAddress::Range { start, end } => {
                write!(f, "start={:#010X}, end={:#010X}", start, end)?
            }
        }
        write!(f, " ({}{}{}{})", flags[0], flags[1], flags[2], flags[3])
    }
}

impl<C: PmpCsr> Pmp<C> {
    /// Reads back the mode, permissions, lock and address(es) of `region`.
    pub fn get_config(&self, region: usize) -> PmpResult<PmpRegionInfo> {
        let region = RegionIndex::new(region)?;
        let (permissions, mode, lock) = decode(self.read_octet(region))?;

        let end = self.read_address(region);
        let address = match mode {
            AddressMatchingMode::Tor => RegionAddress::Range {
                start: region.previous().map_or(0, |lower| self.read_address(lower)),
                end,
            },
            _ => RegionAddress::Single(end),
        };

        Ok(PmpRegionInfo {
            region,
            mode,
            config: PmpRegionConfig { permissions, lock },
            address,
        })
    }

    /// Whether `region` has its lock bit committed.
    pub fn is_locked(&self, region: usize) -> PmpResult<bool> {
        let region = RegionIndex::new(region)?;
        Ok(self.read_octet(region).is_locked())
    }

    /// Writes a table of all regions to `out`. Octets that do not decode are
    /// shown raw instead of aborting the dump.
    pub fn dump(&self, out: &mut impl fmt::Write) -> fmt::Result {
        write!(out, " PMP entries:\r\n")?;
        for region in RegionIndex::all() {
            match self.get_config(region.get()) {
                Ok(info) => write!(out, "  {}\r\n", info)?,
                Err(err) => {
                    let octet = self.read_octet(region);
                    write!(
                        out,
                        "  [{}]: cfg={:#04X} reserved={} ({})\r\n",
                        region,
                        octet.get(),
                        octet.reg().read(pmpcfg_octet::reserved),
                        err
                    )?
                }
            }
        }
        Ok(())
    }

    fn read_address(&self, region: RegionIndex) -> u32 {
        self.csr()
            .read(region.addr_csr())
            .overflowing_shl(PMP_ADDRESS_SHIFT)
            .0
    }
}
