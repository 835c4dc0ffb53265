// Licensed under the Apache-2.0 license

//! The boundary to the PMP control and status registers.
//!
//! Everything above this module is plain arithmetic on register values; only
//! an implementation of [`PmpCsr`] touches hardware state. On RV32 targets
//! [`RiscvPmpCsr`] goes through `riscv_csr`. Host builds and tests plug in
//! an emulated register file instead.

use core::fmt;

/// Identifies one PMP CSR.
///
/// Values built through [`crate::RegionIndex`] are always in range. A
/// hand-built out-of-range id reads as zero and ignores writes on
/// [`RiscvPmpCsr`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CsrId {
    /// `pmpcfgN`, holding the configuration octets of regions 4N..4N+3.
    PmpCfg(u8),
    /// `pmpaddrN`.
    PmpAddr(u8),
}

impl CsrId {
    pub const PMPCFG_BASE: u16 = 0x3a0;
    pub const PMPADDR_BASE: u16 = 0x3b0;

    /// Architectural CSR number.
    pub const fn number(self) -> u16 {
        match self {
            CsrId::PmpCfg(n) => Self::PMPCFG_BASE + n as u16,
            CsrId::PmpAddr(n) => Self::PMPADDR_BASE + n as u16,
        }
    }
}

impl fmt::Display for CsrId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CsrId::PmpCfg(n) => write!(f, "pmpcfg{}", n),
            CsrId::PmpAddr(n) => write!(f, "pmpaddr{}", n),
        }
    }
}

/// Raw access to the PMP CSRs.
///
/// Each call is a single instruction-level access. Nothing is atomic across
/// calls, so callers that may be re-entered must hold a critical section for
/// the whole configuration sequence.
pub trait PmpCsr {
    fn read(&self, csr: CsrId) -> u32;
    fn write(&self, csr: CsrId, value: u32);
}

impl<T: PmpCsr + ?Sized> PmpCsr for &T {
    fn read(&self, csr: CsrId) -> u32 {
        (**self).read(csr)
    }

    fn write(&self, csr: CsrId, value: u32) {
        (**self).write(csr, value)
    }
}

#[cfg(target_arch = "riscv32")]
pub use riscv::RiscvPmpCsr;

#[cfg(target_arch = "riscv32")]
mod riscv {
    use super::{CsrId, PmpCsr};
    use crate::{PMP_CFG_REGS, PMP_REGIONS};
    use riscv_csr::csr::{self, ReadWriteRiscvCsr};
    use tock_registers::interfaces::{Readable, Writeable};
    use tock_registers::register_bitfields;

    register_bitfields![usize,
        value [
            value OFFSET(0) NUMBITS(32) [],
        ],
    ];

    // The CSR number is part of the instruction encoding, so each register
    // has its own accessor and the index selects from a table.
    fn read_csr<const V: usize>() -> u32 {
        ReadWriteRiscvCsr::<usize, value::Register, V>::new().get() as u32
    }

    fn write_csr<const V: usize>(value: u32) {
        ReadWriteRiscvCsr::<usize, value::Register, V>::new().set(value as usize)
    }

    const PMPCFG_READ: [fn() -> u32; PMP_CFG_REGS] = [
        read_csr::<{ csr::PMPCFG0 }>,
        read_csr::<{ csr::PMPCFG1 }>,
        read_csr::<{ csr::PMPCFG2 }>,
        read_csr::<{ csr::PMPCFG3 }>,
    ];
    const PMPCFG_WRITE: [fn(u32); PMP_CFG_REGS] = [
        write_csr::<{ csr::PMPCFG0 }>,
        write_csr::<{ csr::PMPCFG1 }>,
        write_csr::<{ csr::PMPCFG2 }>,
        write_csr::<{ csr::PMPCFG3 }>,
    ];

    macro_rules! pmpaddr_table {
        ($accessor:ident, $($csr:ident),* $(,)?) => {
            [$($accessor::<{ csr::$csr }>),*]
        };
    }

    const PMPADDR_READ: [fn() -> u32; PMP_REGIONS] = pmpaddr_table!(
        read_csr, PMPADDR0, PMPADDR1, PMPADDR2, PMPADDR3, PMPADDR4, PMPADDR5, PMPADDR6,
        PMPADDR7, PMPADDR8, PMPADDR9, PMPADDR10, PMPADDR11, PMPADDR12, PMPADDR13, PMPADDR14,
        PMPADDR15,
    );
    const PMPADDR_WRITE: [fn(u32); PMP_REGIONS] = pmpaddr_table!(
        write_csr, PMPADDR0, PMPADDR1, PMPADDR2, PMPADDR3, PMPADDR4, PMPADDR5, PMPADDR6,
        PMPADDR7, PMPADDR8, PMPADDR9, PMPADDR10, PMPADDR11, PMPADDR12, PMPADDR13, PMPADDR14,
        PMPADDR15,
    );

    /// Machine-mode PMP CSRs of the executing hart.
    #[derive(Debug, Default, Clone, Copy)]
    pub struct RiscvPmpCsr;

    impl PmpCsr for RiscvPmpCsr {
        fn read(&self, csr: CsrId) -> u32 {
            let accessor = match csr {
                CsrId::PmpCfg(n) => PMPCFG_READ.get(usize::from(n)),
                CsrId::PmpAddr(n) => PMPADDR_READ.get(usize::from(n)),
            };
            accessor.map_or(0, |read| read())
        }

        fn write(&self, csr: CsrId, value: u32) {
            let accessor = match csr {
                CsrId::PmpCfg(n) => PMPCFG_WRITE.get(usize::from(n)),
                CsrId::PmpAddr(n) => PMPADDR_WRITE.get(usize::from(n)),
            };
            if let Some(write) = accessor {
                write(value);
            }
        }
    }
}
