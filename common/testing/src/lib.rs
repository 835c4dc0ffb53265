// Licensed under the Apache-2.0 license

//! Host-side stand-ins for the PMP CSRs, used by tests of the PMP engine and
//! of anything built on it.

mod csr_file;

pub use csr_file::{CsrAccess, FakePmpCsrFile};
