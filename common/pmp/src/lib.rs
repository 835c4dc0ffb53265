// Licensed under the Apache-2.0 license

//! RISC-V Physical Memory Protection (PMP) region configuration.
//!
//! The entry point is [`Pmp`], which configures one of [`PMP_REGIONS`]
//! regions at a time in OFF, TOR, NA4 or NAPOT mode and reads configurations
//! back. Every register write is verified by reading it back, since the PMP
//! fields silently coerce unsupported values.
//!
//! Which regions a firmware image protects is up to the caller.

#![cfg_attr(target_arch = "riscv32", no_std)]

pub mod codec;
pub mod csr;
mod error;
mod locator;
pub mod napot;
mod query;
mod region;
pub mod validate;

pub use codec::{
    decode, encode, AddressMatchingMode, Lock, PackedConfig, Permissions, PmpRegionConfig,
};
#[cfg(target_arch = "riscv32")]
pub use csr::RiscvPmpCsr;
pub use csr::{CsrId, PmpCsr};
pub use error::{PmpError, PmpResult};
pub use locator::RegionIndex;
pub use mcu_pmp_config::PmpConfig;
pub use query::{PmpRegionInfo, RegionAddress};
pub use region::Pmp;

/// Number of PMP regions implemented by the target.
pub const PMP_REGIONS: usize = 16;

/// Number of `pmpcfg` registers; each packs four region octets.
pub const PMP_CFG_REGS: usize = PMP_REGIONS / 4;

/// `pmpaddr` registers hold the byte address shifted right by this amount.
pub const PMP_ADDRESS_SHIFT: u32 = 2;
