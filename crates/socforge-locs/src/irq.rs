use core::fmt;

use crate::error::{LocError, LocResult};
use crate::pool::LocationPool;

/// Interrupt line allocator.
///
/// Lines are numbered `[0, n_irqs)` with a hard ceiling of 32. The space
/// starts disabled: peripherals requesting a line on a chip whose CPU has no
/// interrupt support should fail loudly rather than wire a dangling line.
/// Reservations passed at construction are pinned before the gate applies.
#[derive(Debug, Clone)]
pub struct IrqSpace {
    pool: LocationPool,
    enabled: bool,
}

impl IrqSpace {
    pub const MAX_IRQS: u32 = 32;

    pub fn new(n_irqs: u32, reserved: Vec<(String, u32)>) -> LocResult<Self> {
        if n_irqs > Self::MAX_IRQS {
            return Err(LocError::TooManyIrqs { n_irqs });
        }
        let mut pool = LocationPool::new("IRQ", n_irqs);
        for (name, slot) in &reserved {
            pool.add(name, Some(*slot), false)?;
        }
        tracing::debug!(n_irqs, "IRQ space created");
        Ok(IrqSpace {
            pool,
            enabled: false,
        })
    }

    pub fn enable(&mut self) {
        self.enabled = true;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn n_locs(&self) -> u32 {
        self.pool.n_locs()
    }

    pub fn pool(&self) -> &LocationPool {
        &self.pool
    }

    pub fn add(&mut self, name: &str, slot: Option<u32>, reuse_if_exists: bool) -> LocResult<u32> {
        if !self.enabled {
            return Err(LocError::Disabled);
        }
        self.pool.add(name, slot, reuse_if_exists)
    }

    pub fn freeze(&mut self) {
        self.pool.freeze();
    }
}

impl fmt::Display for IrqSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "IRQ space (up to {} locations)", self.n_locs())?;
        write!(f, "{}", self.pool)
    }
}
