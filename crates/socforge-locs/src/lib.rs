#![forbid(unsafe_code)]

//! Bounded integer-slot allocation for SoC assembly: control/status register
//! pages and interrupt lines are both "locations", unique integers in
//! `[0, n_locs)` assigned to names, either auto-assigned first-free or pinned
//! explicitly.

mod csr;
mod error;
mod irq;
mod pool;

pub use csr::{ByteOrdering, CsrConfig, CsrSpace};
pub use error::{LocError, LocResult};
pub use irq::IrqSpace;
pub use pool::LocationPool;
