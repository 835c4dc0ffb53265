// Licensed under the Apache-2.0 license

//! Region index to CSR mapping.
//!
//! Region `i` owns `pmpaddr{i}` and octet `i % 4` of `pmpcfg{i / 4}`.

use crate::codec::PackedConfig;
use crate::csr::CsrId;
use crate::error::{PmpError, PmpResult};
use crate::PMP_REGIONS;
use core::fmt;
use tock_registers::fields::Field;
use tock_registers::{register_bitfields, LocalRegisterCopy};

const OCTETS_PER_CFG: usize = 4;

register_bitfields![u32,
    pub pmpcfg [
        cfg0 OFFSET(0) NUMBITS(8) [],
        cfg1 OFFSET(8) NUMBITS(8) [],
        cfg2 OFFSET(16) NUMBITS(8) [],
        cfg3 OFFSET(24) NUMBITS(8) []
    ]
];

const OCTET_FIELDS: [Field<u32, pmpcfg::Register>; OCTETS_PER_CFG] =
    [pmpcfg::cfg0, pmpcfg::cfg1, pmpcfg::cfg2, pmpcfg::cfg3];

/// Index of one of the [`PMP_REGIONS`] hardware regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RegionIndex(u8);

impl RegionIndex {
    pub const fn new(index: usize) -> PmpResult<Self> {
        if index < PMP_REGIONS {
            Ok(RegionIndex(index as u8))
        } else {
            Err(PmpError::BadRegion)
        }
    }

    pub const fn get(self) -> usize {
        self.0 as usize
    }

    /// The region whose address register forms this region's TOR lower bound.
    pub const fn previous(self) -> Option<RegionIndex> {
        match self.0 {
            0 => None,
            n => Some(RegionIndex(n - 1)),
        }
    }

    pub const fn cfg_group(self) -> usize {
        self.get() / OCTETS_PER_CFG
    }

    /// Bit offset of this region's octet within its `pmpcfg` register.
    pub const fn cfg_shift(self) -> usize {
        (self.get() % OCTETS_PER_CFG) * 8
    }

    pub const fn cfg_csr(self) -> CsrId {
        CsrId::PmpCfg(self.0 / OCTETS_PER_CFG as u8)
    }

    pub const fn addr_csr(self) -> CsrId {
        CsrId::PmpAddr(self.0)
    }

    fn octet_field(self) -> Field<u32, pmpcfg::Register> {
        OCTET_FIELDS[self.get() % OCTETS_PER_CFG]
    }

    /// Extracts this region's octet from a `pmpcfg` register value.
    pub fn extract_octet(self, cfg: u32) -> PackedConfig {
        let reg: LocalRegisterCopy<u32, pmpcfg::Register> = LocalRegisterCopy::new(cfg);
        PackedConfig::from_raw(reg.read(self.octet_field()) as u8)
    }

    /// Replaces this region's octet in a `pmpcfg` register value, leaving the
    /// other three regions' octets untouched.
    pub fn insert_octet(self, cfg: u32, octet: PackedConfig) -> u32 {
        let mut reg: LocalRegisterCopy<u32, pmpcfg::Register> = LocalRegisterCopy::new(cfg);
        reg.modify(self.octet_field().val(u32::from(octet.get())));
        reg.get()
    }

    pub fn all() -> impl Iterator<Item = RegionIndex> {
        (0..PMP_REGIONS as u8).map(RegionIndex)
    }
}

impl TryFrom<usize> for RegionIndex {
    type Error = PmpError;

    fn try_from(index: usize) -> PmpResult<Self> {
        Self::new(index)
    }
}

impl fmt::Display for RegionIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}", self.0)
    }
}
