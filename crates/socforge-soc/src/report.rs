//! Textual report of the finished (or in-progress) resource context.
//!
//! Downstream code generation consumes the tables programmatically; this
//! rendering exists for build logs and for humans fixing configuration
//! errors.

use core::fmt;

use socforge_bus::Topology;

use crate::SocResources;

impl fmt::Display for SocResources {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bus())?;
        write!(f, "{}", self.csr())?;
        write!(f, "{}", self.irq())?;
        if let Some(plan) = self.bus().plan() {
            match &plan.topology {
                Topology::Unconnected => writeln!(f, "interconnect: unconnected")?,
                Topology::PointToPoint { master, slave } => {
                    writeln!(f, "interconnect: point-to-point ({master} <-> {slave})")?
                }
                Topology::Shared { masters, slaves } => writeln!(
                    f,
                    "interconnect: shared ({} <-> {})",
                    masters.len(),
                    slaves.len()
                )?,
                Topology::Crossbar { masters, slaves } => writeln!(
                    f,
                    "interconnect: crossbar ({} <-> {})",
                    masters.len(),
                    slaves.len()
                )?,
            }
        }
        Ok(())
    }
}
