#![forbid(unsafe_code)]

//! Bus resource management for SoC assembly.
//!
//! A [`BusManager`] owns one bus namespace: its canonical standard, widths
//! and addressing granularity, the region map, and the registered masters
//! and slaves. Interfaces that do not match the canonical bus are passed
//! through a fixed-order adapter chain (data width, addressing, protocol)
//! before registration. `finalize()` fixes the interconnect topology and the
//! per-slave decode windows; the result is a plan consumed by downstream
//! hardware generation, and every mutation after that point fails.

mod adapt;
mod decode;
mod error;
mod fabric;
mod interface;
mod standard;

pub use adapt::{
    AdapterStage, AddressRemap, AddressingBridge, DataWidthConverter, Direction, ProtocolBridge,
};
pub use decode::DecodeWindow;
pub use error::{BusError, BusResult};
pub use fabric::{
    BusConfig, BusManager, InterconnectKind, InterconnectPlan, MasterPort, SlaveBinding, SlavePort,
    Topology,
};
pub use interface::BusInterface;
pub use standard::{Addressing, BusStandard};
