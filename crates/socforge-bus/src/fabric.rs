use core::fmt;

use socforge_regions::{NamedTable, Region, RegionMap};

use crate::adapt::{
    AdapterStage, AddressRemap, AddressingBridge, DataWidthConverter, Direction, ProtocolBridge,
};
use crate::decode::DecodeWindow;
use crate::error::{BusError, BusResult};
use crate::interface::BusInterface;
use crate::standard::{Addressing, BusStandard};

/// Multi-master interconnect flavor used when point-to-point does not apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterconnectKind {
    Shared,
    Crossbar,
}

/// Configuration of a bus namespace.
#[derive(Debug, Clone)]
pub struct BusConfig {
    pub standard: BusStandard,
    pub data_width: u32,
    pub address_width: u32,
    /// Bus timeout in cycles; `None` or zero disables the timeout counter.
    pub timeout: Option<u64>,
    pub bursting: bool,
    pub interconnect: InterconnectKind,
    /// Insert register stages on the interconnect for timing.
    pub register: bool,
    /// Regions installed before anything else is added.
    pub reserved_regions: Vec<(String, Region)>,
}

impl Default for BusConfig {
    fn default() -> Self {
        BusConfig {
            standard: BusStandard::Wishbone,
            data_width: 32,
            address_width: 32,
            timeout: Some(1_000_000),
            bursting: false,
            interconnect: InterconnectKind::Shared,
            register: true,
            reserved_regions: Vec::new(),
        }
    }
}

/// A registered bus master: its canonical interface plus the transform
/// stages synthesized to get there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MasterPort {
    pub interface: BusInterface,
    pub remap: Option<AddressRemap>,
    pub adapters: Vec<AdapterStage>,
}

/// A registered bus slave.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlavePort {
    pub interface: BusInterface,
    /// Subtracted from incoming addresses when the slave was added with
    /// `strip_origin` (the slave then sees zero-based addresses).
    pub offset: Option<u64>,
    pub adapters: Vec<AdapterStage>,
}

/// A slave paired with its decode window in the finalized interconnect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlaveBinding {
    pub name: String,
    pub decode: DecodeWindow,
}

/// Interconnect topology chosen at finalize time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Topology {
    /// No masters or no slaves were registered; nothing to wire.
    Unconnected,
    /// Direct wiring, no arbitration or decoding.
    PointToPoint { master: String, slave: String },
    Shared {
        masters: Vec<String>,
        slaves: Vec<SlaveBinding>,
    },
    Crossbar {
        masters: Vec<String>,
        slaves: Vec<SlaveBinding>,
    },
}

/// The immutable output of [`BusManager::finalize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterconnectPlan {
    pub topology: Topology,
    pub register: bool,
    /// Timeout counter attached to the interconnect, in cycles. Only present
    /// on shared/crossbar topologies with a nonzero configured timeout; the
    /// resulting error flag feeds the system controller.
    pub timeout: Option<u64>,
}

/// One bus namespace of a chip (a chip may own several, e.g. a main bus and
/// a coherent DMA bus).
///
/// Masters, slaves and regions accumulate in insertion order; `finalize()`
/// validates the whole namespace once, fixes the topology and freezes every
/// collection.
#[derive(Debug, Clone)]
pub struct BusManager {
    standard: BusStandard,
    data_width: u32,
    address_width: u32,
    addressing: Addressing,
    bursting: bool,
    interconnect: InterconnectKind,
    register: bool,
    timeout: Option<u64>,
    map: RegionMap,
    masters: NamedTable<MasterPort>,
    slaves: NamedTable<SlavePort>,
    plan: Option<InterconnectPlan>,
}

impl BusManager {
    pub const SUPPORTED_DATA_WIDTHS: [u32; 5] = [32, 64, 128, 256, 512];
    pub const SUPPORTED_ADDRESS_WIDTHS: [u32; 2] = [32, 64];

    pub fn new(config: BusConfig) -> BusResult<Self> {
        if !Self::SUPPORTED_DATA_WIDTHS.contains(&config.data_width) {
            return Err(BusError::UnsupportedDataWidth {
                width: config.data_width,
            });
        }
        if !Self::SUPPORTED_ADDRESS_WIDTHS.contains(&config.address_width) {
            return Err(BusError::UnsupportedAddressWidth {
                width: config.address_width,
            });
        }

        let mut manager = BusManager {
            standard: config.standard,
            data_width: config.data_width,
            address_width: config.address_width,
            addressing: config.standard.addressing(),
            bursting: config.bursting,
            interconnect: config.interconnect,
            register: config.register,
            timeout: config.timeout,
            map: RegionMap::new(config.address_width),
            masters: NamedTable::new(),
            slaves: NamedTable::new(),
            plan: None,
        };
        for (name, region) in config.reserved_regions {
            manager.map.add_region(&name, region)?;
        }

        tracing::info!(
            standard = %manager.standard,
            data_width = manager.data_width,
            address_width = manager.address_width,
            "bus created"
        );
        Ok(manager)
    }

    pub fn standard(&self) -> BusStandard {
        self.standard
    }

    pub fn data_width(&self) -> u32 {
        self.data_width
    }

    pub fn address_width(&self) -> u32 {
        self.address_width
    }

    pub fn addressing(&self) -> Addressing {
        self.addressing
    }

    pub fn bursting(&self) -> bool {
        self.bursting
    }

    pub fn map(&self) -> &RegionMap {
        &self.map
    }

    pub fn regions(&self) -> &NamedTable<Region> {
        self.map.regions()
    }

    pub fn io_regions(&self) -> &NamedTable<Region> {
        self.map.io_regions()
    }

    pub fn region(&self, name: &str) -> Option<&Region> {
        self.map.region(name)
    }

    pub fn masters(&self) -> &NamedTable<MasterPort> {
        &self.masters
    }

    pub fn slaves(&self) -> &NamedTable<SlavePort> {
        &self.slaves
    }

    pub fn plan(&self) -> Option<&InterconnectPlan> {
        self.plan.as_ref()
    }

    pub fn is_finalized(&self) -> bool {
        self.plan.is_some()
    }

    /// The canonical interface of this bus, as registered ports see it.
    pub fn canonical_interface(&self) -> BusInterface {
        BusInterface {
            standard: self.standard,
            data_width: self.data_width,
            address_width: self.address_width,
            addressing: self.addressing,
            id_width: None,
            bursting: self.bursting,
        }
    }

    pub fn add_region(&mut self, name: &str, region: Region) -> BusResult<Region> {
        self.ensure_open()?;
        Ok(self.map.add_region(name, region)?)
    }

    pub fn add_io_region(&mut self, name: &str, region: Region) -> BusResult<Region> {
        self.ensure_open()?;
        Ok(self.map.add_io_region(name, region)?)
    }

    pub fn set_io_check(&mut self, enabled: bool) {
        self.map.set_io_check(enabled);
    }

    /// Registers a bus master.
    ///
    /// Without a name, `masterN` is derived from the insertion count. An
    /// optional remap window is applied ahead of the adapter chain.
    pub fn add_master(
        &mut self,
        name: Option<&str>,
        interface: BusInterface,
        remap: Option<AddressRemap>,
    ) -> BusResult<()> {
        self.ensure_open()?;
        let name = match name {
            Some(name) => name.to_string(),
            None => format!("master{}", self.masters.len()),
        };
        if self.masters.contains(&name) {
            return Err(BusError::DuplicateMaster { name });
        }
        let (adapted, adapters) = self.adapt(interface, Direction::MasterToBus);
        tracing::debug!(name = name.as_str(), "bus master added");
        self.masters.insert(
            name,
            MasterPort {
                interface: adapted,
                remap,
                adapters,
            },
        );
        Ok(())
    }

    /// Registers a bus slave.
    ///
    /// The name and/or a region must resolve: an explicit region is placed
    /// under the slave's name first; without one the slave binds to the
    /// already-declared region of the same name. `strip_origin` makes the
    /// slave see zero-based addresses by recording its region origin as an
    /// offset.
    pub fn add_slave(
        &mut self,
        name: Option<&str>,
        interface: BusInterface,
        region: Option<Region>,
        strip_origin: bool,
    ) -> BusResult<()> {
        self.ensure_open()?;
        if name.is_none() && region.is_none() {
            return Err(BusError::SlaveNeedsNameOrRegion);
        }
        let name = match name {
            Some(name) => name.to_string(),
            None => format!("slave{}", self.slaves.len()),
        };
        let placed = match region {
            Some(region) => self.map.add_region(&name, region)?,
            None => self
                .map
                .region(&name)
                .cloned()
                .ok_or_else(|| BusError::RegionNotFound { name: name.clone() })?,
        };
        if self.slaves.contains(&name) {
            return Err(BusError::DuplicateSlave { name });
        }
        let offset = if strip_origin { placed.origin } else { None };
        let (adapted, adapters) = self.adapt(interface, Direction::BusToSlave);
        tracing::debug!(name = name.as_str(), "bus slave added");
        self.slaves.insert(
            name,
            SlavePort {
                interface: adapted,
                offset,
                adapters,
            },
        );
        Ok(())
    }

    /// Equivalent address width when describing this bus from another
    /// standard's point of view: crossing between byte and word addressing
    /// shifts by `log2(data_width/8)`.
    pub fn get_address_width(&self, standard: BusStandard) -> u32 {
        let shift = (self.data_width / 8).trailing_zeros();
        match (self.addressing, standard.addressing()) {
            (Addressing::Byte, Addressing::Word) => self.address_width - shift,
            (Addressing::Word, Addressing::Byte) => self.address_width + shift,
            _ => self.address_width,
        }
    }

    /// Fixed-order interface normalization: data width, addressing, protocol.
    ///
    /// `direction` orients each synthesized stage: a master converts from its
    /// own interface towards the bus, a slave from the bus towards itself.
    /// The registered interface is canonical either way.
    fn adapt(
        &self,
        interface: BusInterface,
        direction: Direction,
    ) -> (BusInterface, Vec<AdapterStage>) {
        let mut stages = Vec::new();
        let mut current = interface;

        if current.data_width != self.data_width {
            let (from, to) = match direction {
                Direction::MasterToBus => (current.data_width, self.data_width),
                Direction::BusToSlave => (self.data_width, current.data_width),
            };
            stages.push(AdapterStage::DataWidth(DataWidthConverter {
                standard: current.standard,
                from,
                to,
            }));
            current.data_width = self.data_width;
            current.address_width = self.address_width;
        }

        if current.addressing != self.addressing {
            match current.standard {
                // AXI-family bridges translate addressing as part of the
                // protocol conversion below.
                BusStandard::AxiLite | BusStandard::Axi => {}
                BusStandard::Wishbone => {
                    let shift = (self.data_width / 8).trailing_zeros();
                    let (from, to) = match direction {
                        Direction::MasterToBus => (current.addressing, self.addressing),
                        Direction::BusToSlave => (self.addressing, current.addressing),
                    };
                    stages.push(AdapterStage::Addressing(AddressingBridge {
                        from,
                        to,
                        shift,
                    }));
                    current.addressing = self.addressing;
                    current.address_width = self.address_width;
                }
            }
        }

        let (from, to) = match direction {
            Direction::MasterToBus => (current.standard, self.standard),
            Direction::BusToSlave => (self.standard, current.standard),
        };
        if let Some(bridge) = ProtocolBridge::select(from, to) {
            stages.push(AdapterStage::Protocol(bridge));
            current.standard = self.standard;
            current.addressing = self.addressing;
            current.address_width = self.address_width;
            current.id_width = None;
        }

        (current, stages)
    }

    /// Chooses the interconnect topology and derives the decode windows.
    ///
    /// Idempotent: the first call computes and caches the plan, later calls
    /// return it untouched. Every mutating operation fails once a plan
    /// exists.
    pub fn finalize(&mut self) -> BusResult<&InterconnectPlan> {
        if self.plan.is_none() {
            let plan = self.build_plan()?;
            tracing::info!(
                masters = self.masters.len(),
                slaves = self.slaves.len(),
                "bus finalized"
            );
            self.plan = Some(plan);
        }
        Ok(self.plan.as_ref().expect("just populated"))
    }

    fn build_plan(&self) -> BusResult<InterconnectPlan> {
        if self.masters.is_empty() || self.slaves.is_empty() {
            return Ok(InterconnectPlan {
                topology: Topology::Unconnected,
                register: self.register,
                timeout: None,
            });
        }

        // One master, one slave, slave mapped at zero: direct wiring needs
        // neither arbitration nor decoding.
        if self.masters.len() == 1 && self.slaves.len() == 1 {
            if let (Some((master, _)), Some((slave, _))) =
                (self.masters.first(), self.slaves.first())
            {
                let region = self
                    .map
                    .region(slave)
                    .ok_or_else(|| BusError::RegionNotFound { name: slave.into() })?;
                if region.origin == Some(0) {
                    return Ok(InterconnectPlan {
                        topology: Topology::PointToPoint {
                            master: master.into(),
                            slave: slave.into(),
                        },
                        register: self.register,
                        timeout: None,
                    });
                }
            }
        }

        // An always-true decoder cannot coexist with any other decoder.
        if self.map.regions().len() > 1 {
            for (name, region) in self.map.regions().iter() {
                if !region.decode {
                    return Err(BusError::DecodeDisableNotExclusive { name: name.into() });
                }
            }
        }

        let mut slaves = Vec::new();
        for (name, _) in self.slaves.iter() {
            let region = self
                .map
                .region(name)
                .ok_or_else(|| BusError::RegionNotFound { name: name.into() })?;
            let decode = DecodeWindow::for_region(name, region, self.address_width, self.data_width)?;
            slaves.push(SlaveBinding {
                name: name.into(),
                decode,
            });
        }
        let masters: Vec<String> = self.masters.names().map(Into::into).collect();

        let topology = match self.interconnect {
            InterconnectKind::Shared => Topology::Shared { masters, slaves },
            InterconnectKind::Crossbar => Topology::Crossbar { masters, slaves },
        };
        Ok(InterconnectPlan {
            topology,
            register: self.register,
            timeout: self.timeout.filter(|cycles| *cycles > 0),
        })
    }

    fn ensure_open(&self) -> BusResult<()> {
        if self.plan.is_some() {
            return Err(BusError::Finalized);
        }
        Ok(())
    }
}

impl fmt::Display for BusManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{}-bit {} bus, {}GiB address space",
            self.data_width,
            self.standard,
            (1u128 << self.address_width) >> 30
        )?;

        for (title, table) in [("IO windows", self.io_regions()), ("regions", self.regions())] {
            if table.is_empty() {
                continue;
            }
            writeln!(f, "{title}: ({})", table.len())?;
            let mut sorted: Vec<(&str, &Region)> = table.iter().collect();
            sorted.sort_by_key(|(_, region)| region.origin);
            for (name, region) in sorted {
                writeln!(f, "- {name:<20}: {region}")?;
            }
        }

        if !self.masters.is_empty() {
            writeln!(f, "masters: ({})", self.masters.len())?;
            for name in self.masters.names() {
                writeln!(f, "- {name}")?;
            }
        }
        if !self.slaves.is_empty() {
            writeln!(f, "slaves: ({})", self.slaves.len())?;
            for name in self.slaves.names() {
                writeln!(f, "- {name}")?;
            }
        }
        Ok(())
    }
}
