use crate::standard::{Addressing, BusStandard};

/// Descriptor of a bus interface as requested by a master or slave.
///
/// This is the shape peripherals hand to [`BusManager::add_master`] /
/// [`BusManager::add_slave`]; the adapter chain normalizes it to the bus's
/// canonical interface before registration.
///
/// [`BusManager::add_master`]: crate::BusManager::add_master
/// [`BusManager::add_slave`]: crate::BusManager::add_slave
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusInterface {
    pub standard: BusStandard,
    pub data_width: u32,
    pub address_width: u32,
    pub addressing: Addressing,
    /// Transaction identifier width, for standards that carry one.
    pub id_width: Option<u8>,
    pub bursting: bool,
}

impl BusInterface {
    pub fn new(standard: BusStandard, data_width: u32, address_width: u32) -> Self {
        BusInterface {
            standard,
            data_width,
            address_width,
            addressing: standard.addressing(),
            id_width: None,
            bursting: false,
        }
    }

    pub fn with_id_width(mut self, id_width: u8) -> Self {
        self.id_width = Some(id_width);
        self
    }

    pub fn with_bursting(mut self) -> Self {
        self.bursting = true;
        self
    }
}
