// Licensed under the Apache-2.0 license

use thiserror::Error;

/// Failure of a PMP configuration or query operation.
///
/// Validation failures (`BadArg`, `BadRegion`, `ModeUnsupported`,
/// `AlignmentViolation`, `RangeConflict`) are reported before any CSR is
/// written. `WarlMismatch` is reported after a write that cannot be undone:
/// the register now holds whatever legal value the hardware chose.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PmpError {
    #[error("invalid argument")]
    BadArg = 0xf000_0101,
    #[error("PMP region index out of range")]
    BadRegion = 0xf000_0102,
    #[error("address matching mode not supported at this granularity")]
    ModeUnsupported = 0xf000_0103,
    #[error("address is not aligned to the PMP granularity")]
    AlignmentViolation = 0xf000_0104,
    #[error("TOR lower bound is held by a locked region")]
    RangeConflict = 0xf000_0105,
    #[error("CSR read back differs from the value written")]
    WarlMismatch = 0xf000_0106,
    #[error("PMP configuration uses a reserved encoding")]
    ReservedEncoding = 0xf000_0107,
}

impl PmpError {
    /// Stable code suitable for a fatal error handler.
    pub const fn code(self) -> u32 {
        self as u32
    }
}

impl From<PmpError> for u32 {
    fn from(err: PmpError) -> u32 {
        err.code()
    }
}

pub type PmpResult<T> = Result<T, PmpError>;
