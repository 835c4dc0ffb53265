// Licensed under the Apache-2.0 license
#![allow(dead_code)]

use log::LevelFilter;
use mcu_pmp::{Lock, Permissions, Pmp, PmpConfig, PmpRegionConfig};
use mcu_pmp_config::IBEX_PMP_CONFIG;
use mcu_pmp_testing::FakePmpCsrFile;
use simple_logger::SimpleLogger;

pub const RX: PmpRegionConfig = PmpRegionConfig::new(Permissions::ReadExecute, Lock::Unlocked);
pub const RW: PmpRegionConfig = PmpRegionConfig::new(Permissions::ReadWrite, Lock::Unlocked);
pub const RX_LOCKED: PmpRegionConfig =
    PmpRegionConfig::new(Permissions::ReadExecute, Lock::Locked);
pub const NONE_LOCKED: PmpRegionConfig = PmpRegionConfig::new(Permissions::None, Lock::Locked);

pub fn init_logger() {
    let _ = SimpleLogger::new().with_level(LevelFilter::Debug).init();
}

pub fn new_pmp(csrs: &FakePmpCsrFile) -> Pmp<&FakePmpCsrFile> {
    new_pmp_with_config(csrs, IBEX_PMP_CONFIG)
}

pub fn new_pmp_with_config(csrs: &FakePmpCsrFile, config: PmpConfig) -> Pmp<&FakePmpCsrFile> {
    init_logger();
    Pmp::new(csrs, config)
}
