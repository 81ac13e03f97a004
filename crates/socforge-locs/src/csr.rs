use core::fmt;

use crate::error::{LocError, LocResult};
use crate::pool::LocationPool;

/// Byte ordering of multi-word control/status registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrdering {
    Big,
    Little,
}

impl fmt::Display for ByteOrdering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ByteOrdering::Big => write!(f, "big"),
            ByteOrdering::Little => write!(f, "little"),
        }
    }
}

/// Configuration of a control/status register space.
#[derive(Debug, Clone)]
pub struct CsrConfig {
    pub data_width: u32,
    pub address_width: u32,
    pub alignment: u32,
    /// Bytes of address space per peripheral register page.
    pub paging: u32,
    pub ordering: ByteOrdering,
    /// Names pinned to fixed pages before anything else is reserved.
    pub reserved: Vec<(String, u32)>,
}

impl Default for CsrConfig {
    fn default() -> Self {
        CsrConfig {
            data_width: 32,
            address_width: 14,
            alignment: 32,
            paging: 0x800,
            ordering: ByteOrdering::Big,
            reserved: Vec::new(),
        }
    }
}

/// Control/status register page allocator.
///
/// The number of available pages follows from the bus geometry:
/// `n_locs = alignment/8 * 2^address_width / paging`. With the defaults
/// (32-bit alignment, 14-bit addresses, 0x800-byte paging) that is 32 pages.
#[derive(Debug, Clone)]
pub struct CsrSpace {
    pool: LocationPool,
    data_width: u32,
    address_width: u32,
    alignment: u32,
    paging: u32,
    ordering: ByteOrdering,
}

impl CsrSpace {
    pub const SUPPORTED_DATA_WIDTHS: [u32; 2] = [8, 32];
    pub const SUPPORTED_ADDRESS_WIDTHS: [u32; 5] = [14, 15, 16, 17, 18];
    pub const SUPPORTED_ALIGNMENTS: [u32; 1] = [32];
    pub const SUPPORTED_PAGINGS: [u32; 5] = [0x400, 0x800, 0x1000, 0x2000, 0x4000];

    pub fn new(config: CsrConfig) -> LocResult<Self> {
        if !Self::SUPPORTED_DATA_WIDTHS.contains(&config.data_width) {
            return Err(LocError::UnsupportedDataWidth {
                width: config.data_width,
            });
        }
        if !Self::SUPPORTED_ADDRESS_WIDTHS.contains(&config.address_width) {
            return Err(LocError::UnsupportedAddressWidth {
                width: config.address_width,
            });
        }
        if !Self::SUPPORTED_ALIGNMENTS.contains(&config.alignment) {
            return Err(LocError::UnsupportedAlignment {
                alignment: config.alignment,
            });
        }
        if config.data_width > config.alignment {
            return Err(LocError::AlignmentTooSmall {
                alignment: config.alignment,
                width: config.data_width,
            });
        }
        if !Self::SUPPORTED_PAGINGS.contains(&config.paging) {
            return Err(LocError::UnsupportedPaging {
                paging: config.paging,
            });
        }

        let n_locs = config.alignment / 8 * (1u32 << config.address_width) / config.paging;
        let mut pool = LocationPool::new("CSR", n_locs);
        for (name, slot) in &config.reserved {
            pool.add(name, Some(*slot), false)?;
        }

        tracing::debug!(
            data_width = config.data_width,
            address_width = config.address_width,
            paging = config.paging,
            n_locs,
            "CSR space created"
        );
        Ok(CsrSpace {
            pool,
            data_width: config.data_width,
            address_width: config.address_width,
            alignment: config.alignment,
            paging: config.paging,
            ordering: config.ordering,
        })
    }

    pub fn data_width(&self) -> u32 {
        self.data_width
    }

    pub fn address_width(&self) -> u32 {
        self.address_width
    }

    pub fn alignment(&self) -> u32 {
        self.alignment
    }

    pub fn paging(&self) -> u32 {
        self.paging
    }

    pub fn ordering(&self) -> ByteOrdering {
        self.ordering
    }

    pub fn n_locs(&self) -> u32 {
        self.pool.n_locs()
    }

    pub fn pool(&self) -> &LocationPool {
        &self.pool
    }

    pub fn add(&mut self, name: &str, slot: Option<u32>, reuse_if_exists: bool) -> LocResult<u32> {
        self.pool.add(name, slot, reuse_if_exists)
    }

    /// Returns the page of `name`, reserving the next free one on first use.
    pub fn resolve(&mut self, name: &str) -> LocResult<u32> {
        self.pool.add(name, None, true)
    }

    pub fn freeze(&mut self) {
        self.pool.freeze();
    }
}

impl fmt::Display for CsrSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{}-bit CSR bus, {}-bit aligned, {}KiB address space, 0x{:x}B paging, {} ordering (up to {} locations)",
            self.data_width,
            self.alignment,
            (1u64 << self.address_width) / 1024,
            self.paging,
            self.ordering,
            self.n_locs()
        )?;
        write!(f, "{}", self.pool)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_geometry_yields_32_pages() {
        let csr = CsrSpace::new(CsrConfig::default()).unwrap();
        assert_eq!(csr.n_locs(), 32);
    }

    #[test]
    fn capacity_is_exhausted_after_n_locs_reservations() {
        let mut csr = CsrSpace::new(CsrConfig::default()).unwrap();
        for i in 0..32 {
            csr.add(&format!("periph{i}"), None, false).unwrap();
        }
        assert_eq!(
            csr.add("one_too_many", None, false).unwrap_err(),
            LocError::Exhausted {
                kind: "CSR",
                n_locs: 32
            }
        );
    }

    #[test]
    fn geometry_scales_with_address_width_and_paging() {
        let csr = CsrSpace::new(CsrConfig {
            address_width: 16,
            paging: 0x400,
            ..CsrConfig::default()
        })
        .unwrap();
        // 4 * 65536 / 1024
        assert_eq!(csr.n_locs(), 256);
    }

    #[test]
    fn unsupported_configurations_fail_fast() {
        assert_eq!(
            CsrSpace::new(CsrConfig {
                data_width: 16,
                ..CsrConfig::default()
            })
            .unwrap_err(),
            LocError::UnsupportedDataWidth { width: 16 }
        );
        assert_eq!(
            CsrSpace::new(CsrConfig {
                address_width: 13,
                ..CsrConfig::default()
            })
            .unwrap_err(),
            LocError::UnsupportedAddressWidth { width: 13 }
        );
        assert_eq!(
            CsrSpace::new(CsrConfig {
                paging: 0x300,
                ..CsrConfig::default()
            })
            .unwrap_err(),
            LocError::UnsupportedPaging { paging: 0x300 }
        );
        assert_eq!(
            CsrSpace::new(CsrConfig {
                alignment: 64,
                ..CsrConfig::default()
            })
            .unwrap_err(),
            LocError::UnsupportedAlignment { alignment: 64 }
        );
    }

    #[test]
    fn reserved_pages_are_pinned_at_construction() {
        let mut csr = CsrSpace::new(CsrConfig {
            reserved: vec![("ctrl".into(), 0), ("uart".into(), 2)],
            ..CsrConfig::default()
        })
        .unwrap();
        assert_eq!(csr.pool().get("ctrl"), Some(0));
        assert_eq!(csr.resolve("timer").unwrap(), 1);
        assert_eq!(csr.resolve("uart").unwrap(), 2);
    }
}
