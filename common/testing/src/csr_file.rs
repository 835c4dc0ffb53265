// Licensed under the Apache-2.0 license

use mcu_pmp::{AddressMatchingMode, CsrId, PackedConfig, PmpCsr, PMP_CFG_REGS, PMP_REGIONS};
use std::cell::{Cell, RefCell};

/// One recorded CSR access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsrAccess {
    Read(CsrId),
    Write(CsrId, u32),
}

/// Emulated PMP register file.
///
/// Behaves like hardware with respect to the things the engine must cope
/// with:
/// - writes are merged through a per-kind write mask, so bits outside the
///   mask keep their old value (WARL truncation);
/// - the reserved R=0,W=1 combination and bits 6:5 of a cfg octet never
///   stick;
/// - octets with L set ignore writes, as do `pmpaddr{i}` when region `i` is
///   locked or region `i + 1` is a locked TOR region.
///
/// Every access is recorded so tests can assert what was, and was not,
/// touched.
pub struct FakePmpCsrFile {
    cfg: RefCell<[u32; PMP_CFG_REGS]>,
    addr: RefCell<[u32; PMP_REGIONS]>,
    cfg_mask: Cell<u32>,
    addr_mask: Cell<u32>,
    accesses: RefCell<Vec<CsrAccess>>,
}

impl Default for FakePmpCsrFile {
    fn default() -> Self {
        Self::new()
    }
}

impl FakePmpCsrFile {
    /// A register file in its reset state: every region OFF, all zero.
    pub fn new() -> Self {
        Self {
            cfg: RefCell::new([0; PMP_CFG_REGS]),
            addr: RefCell::new([0; PMP_REGIONS]),
            cfg_mask: Cell::new(u32::MAX),
            addr_mask: Cell::new(u32::MAX),
            accesses: Default::default(),
        }
    }

    /// Only bits set in `mask` of a `pmpaddr` write take effect.
    pub fn with_address_mask(self, mask: u32) -> Self {
        self.addr_mask.set(mask);
        self
    }

    /// Only bits set in `mask` of a `pmpcfg` write take effect.
    pub fn with_config_mask(self, mask: u32) -> Self {
        self.cfg_mask.set(mask);
        self
    }

    /// Returns to the power-on state. Locks are cleared; the access log and
    /// write masks are kept.
    pub fn reset(&self) {
        *self.cfg.borrow_mut() = [0; PMP_CFG_REGS];
        *self.addr.borrow_mut() = [0; PMP_REGIONS];
    }

    /// Stores `value` directly, bypassing masks and locks, without logging.
    pub fn preload(&self, csr: CsrId, value: u32) {
        match csr {
            CsrId::PmpCfg(n) => self.cfg.borrow_mut()[usize::from(n)] = value,
            CsrId::PmpAddr(n) => self.addr.borrow_mut()[usize::from(n)] = value,
        }
    }

    /// Current value of `csr`, without logging.
    pub fn peek(&self, csr: CsrId) -> u32 {
        match csr {
            CsrId::PmpCfg(n) => self.cfg.borrow()[usize::from(n)],
            CsrId::PmpAddr(n) => self.addr.borrow()[usize::from(n)],
        }
    }

    pub fn accesses(&self) -> Vec<CsrAccess> {
        self.accesses.borrow().clone()
    }

    /// Values written, in order, regardless of whether they stuck.
    pub fn writes(&self) -> Vec<(CsrId, u32)> {
        self.accesses
            .borrow()
            .iter()
            .filter_map(|access| match access {
                CsrAccess::Write(csr, value) => Some((*csr, *value)),
                CsrAccess::Read(_) => None,
            })
            .collect()
    }

    pub fn clear_accesses(&self) {
        self.accesses.borrow_mut().clear();
    }

    fn octet(&self, region: usize) -> PackedConfig {
        let cfg = self.cfg.borrow()[region / 4];
        PackedConfig::from_raw((cfg >> ((region % 4) * 8)) as u8)
    }

    fn address_locked(&self, region: usize) -> bool {
        if self.octet(region).is_locked() {
            return true;
        }
        match region + 1 {
            next if next < PMP_REGIONS => {
                let next = self.octet(next);
                next.is_locked() && next.mode() == AddressMatchingMode::Tor
            }
            _ => false,
        }
    }

    fn write_cfg(&self, group: usize, value: u32) {
        let mask = self.cfg_mask.get();
        let old = self.cfg.borrow()[group];
        let merged = (old & !mask) | (value & mask);

        let mut result = old.to_le_bytes();
        for (slot, byte) in merged.to_le_bytes().into_iter().enumerate() {
            if PackedConfig::from_raw(result[slot]).is_locked() {
                continue;
            }
            result[slot] = legalize_octet(byte);
        }
        self.cfg.borrow_mut()[group] = u32::from_le_bytes(result);
    }

    fn write_addr(&self, region: usize, value: u32) {
        if self.address_locked(region) {
            return;
        }
        let mask = self.addr_mask.get();
        let mut addr = self.addr.borrow_mut();
        addr[region] = (addr[region] & !mask) | (value & mask);
    }
}

/// Clears bits 6:5 and drops W when R is clear.
fn legalize_octet(octet: u8) -> u8 {
    let mut octet = octet & !0x60;
    if octet & 0b11 == 0b10 {
        octet &= !0b10;
    }
    octet
}

impl PmpCsr for FakePmpCsrFile {
    fn read(&self, csr: CsrId) -> u32 {
        self.accesses.borrow_mut().push(CsrAccess::Read(csr));
        self.peek(csr)
    }

    fn write(&self, csr: CsrId, value: u32) {
        self.accesses.borrow_mut().push(CsrAccess::Write(csr, value));
        match csr {
            CsrId::PmpCfg(n) => self.write_cfg(usize::from(n), value),
            CsrId::PmpAddr(n) => self.write_addr(usize::from(n), value),
        }
    }
}
