#![forbid(unsafe_code)]

//! The shared resource context of one SoC build.
//!
//! [`SocResources`] bundles the bus namespace, the control/status register
//! space and the interrupt space into a single handle that the builder
//! threads through every peripheral-attachment call; there is no global
//! registry. Accumulation is open until `finalize()`, which fixes the
//! interconnect plan and freezes every collection.

mod report;

use socforge_bus::{BusConfig, BusError, BusManager, InterconnectPlan};
use socforge_locs::{CsrConfig, CsrSpace, IrqSpace, LocError};
use thiserror::Error;

pub type SocResult<T> = Result<T, SocError>;

/// Top-level error of the resource context; wraps the per-space errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SocError {
    #[error(transparent)]
    Bus(#[from] BusError),

    #[error(transparent)]
    Loc(#[from] LocError),
}

/// Which location space a reservation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationSpace {
    Registers,
    Interrupts,
}

/// Configuration of a complete resource context.
#[derive(Debug, Clone)]
pub struct SocConfig {
    pub bus: BusConfig,
    pub csr: CsrConfig,
    pub n_irqs: u32,
    /// Interrupt lines pinned before accumulation starts.
    pub reserved_irqs: Vec<(String, u32)>,
}

impl Default for SocConfig {
    fn default() -> Self {
        SocConfig {
            bus: BusConfig::default(),
            csr: CsrConfig::default(),
            n_irqs: 32,
            reserved_irqs: Vec::new(),
        }
    }
}

/// The address-space and resource-allocation state of one SoC build.
pub struct SocResources {
    bus: BusManager,
    csr: CsrSpace,
    irq: IrqSpace,
}

impl SocResources {
    pub fn new(config: SocConfig) -> SocResult<Self> {
        let bus = BusManager::new(config.bus)?;
        let csr = CsrSpace::new(config.csr)?;
        let irq = IrqSpace::new(config.n_irqs, config.reserved_irqs)?;
        tracing::info!("SoC resource context created");
        Ok(SocResources { bus, csr, irq })
    }

    pub fn bus(&self) -> &BusManager {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut BusManager {
        &mut self.bus
    }

    pub fn csr(&self) -> &CsrSpace {
        &self.csr
    }

    pub fn csr_mut(&mut self) -> &mut CsrSpace {
        &mut self.csr
    }

    pub fn irq(&self) -> &IrqSpace {
        &self.irq
    }

    pub fn irq_mut(&mut self) -> &mut IrqSpace {
        &mut self.irq
    }

    /// Reserves a CSR page or an interrupt line for `name`.
    pub fn reserve_location(
        &mut self,
        space: LocationSpace,
        name: &str,
        explicit: Option<u32>,
        reuse_if_exists: bool,
    ) -> SocResult<u32> {
        let slot = match space {
            LocationSpace::Registers => self.csr.add(name, explicit, reuse_if_exists)?,
            LocationSpace::Interrupts => self.irq.add(name, explicit, reuse_if_exists)?,
        };
        Ok(slot)
    }

    /// Finalizes the bus and freezes both location spaces.
    ///
    /// Idempotent: repeated calls return the cached plan.
    pub fn finalize(&mut self) -> SocResult<&InterconnectPlan> {
        self.bus.finalize()?;
        self.csr.freeze();
        self.irq.freeze();
        Ok(self.bus.plan().expect("just finalized"))
    }

    pub fn is_finalized(&self) -> bool {
        self.bus.is_finalized()
    }
}
