// Licensed under the Apache-2.0 license

//! Packing of region permissions, matching mode and lock into the 8-bit
//! `pmpcfg` octet.

use crate::error::{PmpError, PmpResult};
use tock_registers::fields::FieldValue;
use tock_registers::{register_bitfields, LocalRegisterCopy};

register_bitfields![u8,
    pub pmpcfg_octet [
        r OFFSET(0) NUMBITS(1) [],
        w OFFSET(1) NUMBITS(1) [],
        x OFFSET(2) NUMBITS(1) [],
        a OFFSET(3) NUMBITS(2) [
            OFF = 0,
            TOR = 1,
            NA4 = 2,
            NAPOT = 3
        ],
        reserved OFFSET(5) NUMBITS(2) [],
        l OFFSET(7) NUMBITS(1) []
    ]
];

/// How a region forms its protected address range.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressMatchingMode {
    /// Matching disabled. The address register may still serve as the lower
    /// bound of a following TOR region.
    Off = 0,
    /// Range from the previous region's address (inclusive) to this region's
    /// address (exclusive).
    Tor = 1,
    /// Naturally aligned four-byte region.
    Na4 = 2,
    /// Naturally aligned power-of-two region, at least 8 bytes.
    Napot = 3,
}

impl AddressMatchingMode {
    pub const ALL: [AddressMatchingMode; 4] = [Self::Off, Self::Tor, Self::Na4, Self::Napot];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Off => "OFF",
            Self::Tor => "TOR",
            Self::Na4 => "NA4",
            Self::Napot => "NAPOT",
        }
    }

    fn field_value(self) -> FieldValue<u8, pmpcfg_octet::Register> {
        match self {
            Self::Off => pmpcfg_octet::a::OFF,
            Self::Tor => pmpcfg_octet::a::TOR,
            Self::Na4 => pmpcfg_octet::a::NA4,
            Self::Napot => pmpcfg_octet::a::NAPOT,
        }
    }
}

impl TryFrom<u8> for AddressMatchingMode {
    type Error = PmpError;

    fn try_from(value: u8) -> PmpResult<Self> {
        match value {
            0 => Ok(Self::Off),
            1 => Ok(Self::Tor),
            2 => Ok(Self::Na4),
            3 => Ok(Self::Napot),
            _ => Err(PmpError::BadArg),
        }
    }
}

/// Region access permissions.
///
/// Unless the region is locked these only restrict S and U mode; M mode
/// ignores them. There is no write-only variant: R=0,W=1 is reserved.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permissions {
    None = 0,
    ReadOnly,
    ExecuteOnly,
    ReadExecute,
    ReadWrite,
    ReadWriteExecute,
}

impl Permissions {
    pub const ALL: [Permissions; 6] = [
        Self::None,
        Self::ReadOnly,
        Self::ExecuteOnly,
        Self::ReadExecute,
        Self::ReadWrite,
        Self::ReadWriteExecute,
    ];

    /// `(read, write, execute)` bits.
    pub const fn rwx(self) -> (bool, bool, bool) {
        match self {
            Self::None => (false, false, false),
            Self::ReadOnly => (true, false, false),
            Self::ExecuteOnly => (false, false, true),
            Self::ReadExecute => (true, false, true),
            Self::ReadWrite => (true, true, false),
            Self::ReadWriteExecute => (true, true, true),
        }
    }

    fn from_rwx(read: bool, write: bool, execute: bool) -> PmpResult<Self> {
        match (read, write, execute) {
            (false, false, false) => Ok(Self::None),
            (true, false, false) => Ok(Self::ReadOnly),
            (false, false, true) => Ok(Self::ExecuteOnly),
            (true, false, true) => Ok(Self::ReadExecute),
            (true, true, false) => Ok(Self::ReadWrite),
            (true, true, true) => Ok(Self::ReadWriteExecute),
            (false, true, _) => Err(PmpError::ReservedEncoding),
        }
    }
}

impl TryFrom<u8> for Permissions {
    type Error = PmpError;

    fn try_from(value: u8) -> PmpResult<Self> {
        Self::ALL
            .get(usize::from(value))
            .copied()
            .ok_or(PmpError::BadArg)
    }
}

/// Region lock.
///
/// A locked region ignores further writes to its configuration and address
/// registers until reset, and its permissions also apply to M mode.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lock {
    #[default]
    Unlocked = 0,
    Locked = 1,
}

impl TryFrom<u8> for Lock {
    type Error = PmpError;

    fn try_from(value: u8) -> PmpResult<Self> {
        match value {
            0 => Ok(Self::Unlocked),
            1 => Ok(Self::Locked),
            _ => Err(PmpError::BadArg),
        }
    }
}

/// Access rules for one region. The matching mode is chosen by the
/// configure call, since each mode takes differently shaped addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PmpRegionConfig {
    pub permissions: Permissions,
    pub lock: Lock,
}

impl PmpRegionConfig {
    pub const fn new(permissions: Permissions, lock: Lock) -> Self {
        PmpRegionConfig { permissions, lock }
    }

    pub const fn unlocked(permissions: Permissions) -> Self {
        Self::new(permissions, Lock::Unlocked)
    }

    pub const fn locked(permissions: Permissions) -> Self {
        Self::new(permissions, Lock::Locked)
    }
}

/// A `pmpcfg` octet as the hardware stores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackedConfig(u8);

impl PackedConfig {
    pub const OFF: PackedConfig = PackedConfig(0);

    pub const fn from_raw(value: u8) -> Self {
        PackedConfig(value)
    }

    pub const fn get(self) -> u8 {
        self.0
    }

    pub fn reg(self) -> LocalRegisterCopy<u8, pmpcfg_octet::Register> {
        LocalRegisterCopy::new(self.0)
    }

    pub fn is_locked(self) -> bool {
        self.reg().is_set(pmpcfg_octet::l)
    }

    /// Matching mode bits. Every 2-bit pattern is a valid mode, so this
    /// cannot fail even for octets that do not [`decode`].
    pub fn mode(self) -> AddressMatchingMode {
        match self.reg().read_as_enum(pmpcfg_octet::a) {
            Some(pmpcfg_octet::a::Value::TOR) => AddressMatchingMode::Tor,
            Some(pmpcfg_octet::a::Value::NA4) => AddressMatchingMode::Na4,
            Some(pmpcfg_octet::a::Value::NAPOT) => AddressMatchingMode::Napot,
            Some(pmpcfg_octet::a::Value::OFF) | None => AddressMatchingMode::Off,
        }
    }
}

/// Builds the configuration octet for a region.
pub fn encode(permissions: Permissions, mode: AddressMatchingMode, lock: Lock) -> PackedConfig {
    let (read, write, execute) = permissions.rwx();
    let value = pmpcfg_octet::r.val(u8::from(read))
        + pmpcfg_octet::w.val(u8::from(write))
        + pmpcfg_octet::x.val(u8::from(execute))
        + mode.field_value()
        + pmpcfg_octet::l.val(lock as u8);
    PackedConfig(value.into())
}

/// Splits a configuration octet back into its parts.
///
/// Stale or coerced register contents may hold patterns no valid
/// configuration produces; R=0,W=1 and non-zero reserved bits are reported as
/// [`PmpError::ReservedEncoding`] rather than mapped to a guess.
pub fn decode(packed: PackedConfig) -> PmpResult<(Permissions, AddressMatchingMode, Lock)> {
    let reg = packed.reg();
    if reg.read(pmpcfg_octet::reserved) != 0 {
        return Err(PmpError::ReservedEncoding);
    }
    let permissions = Permissions::from_rwx(
        reg.is_set(pmpcfg_octet::r),
        reg.is_set(pmpcfg_octet::w),
        reg.is_set(pmpcfg_octet::x),
    )?;
    let lock = if packed.is_locked() {
        Lock::Locked
    } else {
        Lock::Unlocked
    };
    Ok((permissions, packed.mode(), lock))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_encode_known_octets() {
        assert_eq!(
            encode(Permissions::None, AddressMatchingMode::Off, Lock::Unlocked).get(),
            0x00
        );
        assert_eq!(
            encode(Permissions::ReadExecute, AddressMatchingMode::Tor, Lock::Locked).get(),
            0x8d
        );
        assert_eq!(
            encode(Permissions::ReadWrite, AddressMatchingMode::Napot, Lock::Unlocked).get(),
            0x1b
        );
        assert_eq!(
            encode(Permissions::ExecuteOnly, AddressMatchingMode::Na4, Lock::Unlocked).get(),
            0x14
        );
        assert_eq!(
            encode(
                Permissions::ReadWriteExecute,
                AddressMatchingMode::Napot,
                Lock::Locked
            )
            .get(),
            0x9f
        );
    }

    #[test]
    fn test_round_trip_all_combinations() {
        for permissions in Permissions::ALL {
            for mode in AddressMatchingMode::ALL {
                for lock in [Lock::Unlocked, Lock::Locked] {
                    let packed = encode(permissions, mode, lock);
                    assert_eq!(decode(packed), Ok((permissions, mode, lock)));
                }
            }
        }
    }

    #[test]
    fn test_encode_never_write_without_read() {
        for permissions in Permissions::ALL {
            for mode in AddressMatchingMode::ALL {
                let packed = encode(permissions, mode, Lock::Locked);
                let reg = packed.reg();
                assert!(!(reg.is_set(pmpcfg_octet::w) && !reg.is_set(pmpcfg_octet::r)));
                assert_eq!(reg.read(pmpcfg_octet::reserved), 0);
            }
        }
    }

    #[test]
    fn test_decode_reserved_patterns() {
        // W only, and W+X.
        assert_eq!(
            decode(PackedConfig::from_raw(0x02)),
            Err(PmpError::ReservedEncoding)
        );
        assert_eq!(
            decode(PackedConfig::from_raw(0x8e)),
            Err(PmpError::ReservedEncoding)
        );
        // Reserved bits 6:5.
        assert_eq!(
            decode(PackedConfig::from_raw(0x21)),
            Err(PmpError::ReservedEncoding)
        );
        assert_eq!(
            decode(PackedConfig::from_raw(0x40)),
            Err(PmpError::ReservedEncoding)
        );
    }

    #[test]
    fn test_mode_and_lock_of_undecodable_octet() {
        let packed = PackedConfig::from_raw(0x9a);
        assert!(packed.is_locked());
        assert_eq!(packed.mode(), AddressMatchingMode::Napot);
        assert!(decode(packed).is_err());
    }

    #[test]
    fn test_raw_conversions() {
        assert_eq!(Permissions::try_from(3), Ok(Permissions::ReadExecute));
        assert_eq!(Permissions::try_from(6), Err(PmpError::BadArg));
        assert_eq!(
            AddressMatchingMode::try_from(2),
            Ok(AddressMatchingMode::Na4)
        );
        assert_eq!(AddressMatchingMode::try_from(4), Err(PmpError::BadArg));
        assert_eq!(Lock::try_from(1), Ok(Lock::Locked));
        assert_eq!(Lock::try_from(2), Err(PmpError::BadArg));
    }
}
