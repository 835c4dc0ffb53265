// Licensed under the Apache-2.0 license

#[cfg(test)]
mod common;
use common::{new_pmp, RW, RX};
use mcu_pmp::{AddressMatchingMode, CsrId, PmpError, RegionAddress};
use mcu_pmp_testing::FakePmpCsrFile;

// Address registers that only implement the low 20 bits.
const NARROW_ADDRESS_MASK: u32 = 0x000f_ffff;

fn cfg_written(csrs: &FakePmpCsrFile) -> bool {
    csrs.writes()
        .iter()
        .any(|(csr, _)| matches!(csr, CsrId::PmpCfg(_)))
}

#[test]
fn test_off_detects_truncated_address() {
    let csrs = FakePmpCsrFile::new().with_address_mask(NARROW_ADDRESS_MASK);
    let pmp = new_pmp(&csrs);

    assert_eq!(
        pmp.configure_off(3, 0x8000_0000),
        Err(PmpError::WarlMismatch)
    );
    assert!(!cfg_written(&csrs));
}

#[test]
fn test_na4_detects_truncated_address() {
    let csrs = FakePmpCsrFile::new().with_address_mask(NARROW_ADDRESS_MASK);
    let pmp = new_pmp(&csrs);

    assert_eq!(
        pmp.configure_na4(3, &RX, 0x8000_0000),
        Err(PmpError::WarlMismatch)
    );
    assert!(!cfg_written(&csrs));
}

#[test]
fn test_napot_detects_truncated_address() {
    let csrs = FakePmpCsrFile::new().with_address_mask(NARROW_ADDRESS_MASK);
    let pmp = new_pmp(&csrs);

    assert_eq!(
        pmp.configure_napot(3, &RX, 0x8000_0ffc),
        Err(PmpError::WarlMismatch)
    );
    assert!(!cfg_written(&csrs));
}

#[test]
fn test_tor_detects_truncated_address() {
    let csrs = FakePmpCsrFile::new().with_address_mask(NARROW_ADDRESS_MASK);
    let pmp = new_pmp(&csrs);

    // Lower bound fits, upper bound does not.
    assert_eq!(
        pmp.configure_tor(3, &RX, 0x1000, 0x8000_0000),
        Err(PmpError::WarlMismatch)
    );
    assert!(!cfg_written(&csrs));

    // Lower bound itself is truncated; the upper address is never written.
    csrs.clear_accesses();
    assert_eq!(
        pmp.configure_tor(6, &RX, 0x8000_0000, 0x8000_1000),
        Err(PmpError::WarlMismatch)
    );
    assert_eq!(csrs.writes(), vec![(CsrId::PmpAddr(5), 0x2000_0000)]);
}

#[test]
fn test_config_octet_coercion_detected() {
    // The execute bit is hardwired to zero.
    let csrs = FakePmpCsrFile::new().with_config_mask(!0x0404_0404);
    let pmp = new_pmp(&csrs);

    assert_eq!(
        pmp.configure_na4(1, &RX, 0x1000),
        Err(PmpError::WarlMismatch)
    );

    // A configuration the hardware supports still succeeds.
    pmp.configure_na4(2, &RW, 0x2000).unwrap();
}

#[test]
fn test_coerced_value_visible_through_query() {
    let csrs = FakePmpCsrFile::new().with_address_mask(NARROW_ADDRESS_MASK);
    let pmp = new_pmp(&csrs);

    assert_eq!(
        pmp.configure_off(3, 0x8010_0000),
        Err(PmpError::WarlMismatch)
    );
    let info = pmp.get_config(3).unwrap();
    assert_eq!(info.mode, AddressMatchingMode::Off);
    assert_eq!(info.address, RegionAddress::Single(0x0010_0000));
}
