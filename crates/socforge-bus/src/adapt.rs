use crate::standard::{Addressing, BusStandard};

/// Data-flow orientation of an adapted port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// A master feeding the bus.
    MasterToBus,
    /// The bus feeding a slave.
    BusToSlave,
}

/// Width conversion between a requester's data width and the bus's.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataWidthConverter {
    pub standard: BusStandard,
    pub from: u32,
    pub to: u32,
}

/// Word/byte addressing conversion (an address shift by `log2(data_width/8)`).
///
/// Only word-addressed (Wishbone) interfaces need a standalone bridge; the
/// AXI-family protocol bridges already translate addressing as part of the
/// protocol conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressingBridge {
    pub from: Addressing,
    pub to: Addressing,
    pub shift: u32,
}

/// Protocol bridge between two bus standards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolBridge {
    Wishbone2AxiLite,
    AxiLite2Wishbone,
    Wishbone2Axi,
    AxiLite2Axi,
    Axi2AxiLite,
    Axi2Wishbone,
}

impl ProtocolBridge {
    /// Bridge for a `from` → `to` crossing, or `None` when the standards
    /// already match. Exhaustive over the closed standard set.
    pub fn select(from: BusStandard, to: BusStandard) -> Option<ProtocolBridge> {
        use BusStandard::{Axi, AxiLite, Wishbone};
        match (from, to) {
            (Wishbone, Wishbone) | (AxiLite, AxiLite) | (Axi, Axi) => None,
            (Wishbone, AxiLite) => Some(ProtocolBridge::Wishbone2AxiLite),
            (AxiLite, Wishbone) => Some(ProtocolBridge::AxiLite2Wishbone),
            (Wishbone, Axi) => Some(ProtocolBridge::Wishbone2Axi),
            (AxiLite, Axi) => Some(ProtocolBridge::AxiLite2Axi),
            (Axi, AxiLite) => Some(ProtocolBridge::Axi2AxiLite),
            (Axi, Wishbone) => Some(ProtocolBridge::Axi2Wishbone),
        }
    }
}

/// One synthesized stage of the adapter chain.
///
/// Stage order is fixed: data width, then addressing, then protocol. The
/// protocol bridges assume the canonical data width and addressing already
/// match, so width and addressing must be normalized first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdapterStage {
    DataWidth(DataWidthConverter),
    Addressing(AddressingBridge),
    Protocol(ProtocolBridge),
}

/// Address remap applied to a master before the adapter chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressRemap {
    pub origin: u64,
    pub size: u64,
}
