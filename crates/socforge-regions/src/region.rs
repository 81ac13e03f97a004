use core::fmt;

use bitflags::bitflags;

bitflags! {
    /// Access mode of a region (`r`, `w`, `x` in any combination).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct AccessMode: u8 {
        const R = 1 << 0;
        const W = 1 << 1;
        const X = 1 << 2;

        const RW = Self::R.bits() | Self::W.bits();
        const RX = Self::R.bits() | Self::X.bits();
        const RWX = Self::R.bits() | Self::W.bits() | Self::X.bits();
    }
}

impl fmt::Display for AccessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.contains(AccessMode::R) {
            write!(f, "R")?;
        }
        if self.contains(AccessMode::W) {
            write!(f, "W")?;
        }
        if self.contains(AccessMode::X) {
            write!(f, "X")?;
        }
        Ok(())
    }
}

/// A named address-range reservation.
///
/// `size` is the size the requester asked for; `size_pow2` is the footprint
/// the region occupies for overlap and decode purposes. Bus address decoders
/// test a power-of-two-aligned high-bit field, so the effective footprint is
/// always the next power of two of the requested size, and placed origins
/// must be aligned to `size_pow2`, not `size`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    /// Base address; `None` until the allocator picks one.
    pub origin: Option<u64>,
    /// Requested (unrounded) size in bytes.
    pub size: u64,
    /// Decode footprint: `size` rounded up to a power of two.
    pub size_pow2: u64,
    pub mode: AccessMode,
    /// Cached (CPU-side) region, as opposed to an IO-classified one.
    pub cached: bool,
    /// Reserves address space for layout purposes only; not wired
    /// electrically and exempt from overlap checks by default.
    pub linker_only: bool,
    /// Whether an address decoder is generated for this region. At most one
    /// region per bus may disable decoding ("this slave answers everything").
    pub decode: bool,
}

impl Region {
    /// A region whose origin will be allocated by the [`RegionMap`].
    ///
    /// [`RegionMap`]: crate::RegionMap
    pub fn new(size: u64) -> Self {
        Region {
            origin: None,
            size,
            size_pow2: size.next_power_of_two(),
            mode: AccessMode::RW,
            cached: true,
            linker_only: false,
            decode: true,
        }
    }

    /// A region fixed at `origin`.
    pub fn at(origin: u64, size: u64) -> Self {
        Region {
            origin: Some(origin),
            ..Region::new(size)
        }
    }

    pub fn mode(mut self, mode: AccessMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn uncached(mut self) -> Self {
        self.cached = false;
        self
    }

    pub fn linker_only(mut self) -> Self {
        self.linker_only = true;
        self
    }

    pub fn no_decode(mut self) -> Self {
        self.decode = false;
        self
    }

    /// End of the decode footprint (exclusive), if the region is placed.
    pub fn end_pow2(&self) -> Option<u64> {
        Some(self.origin?.saturating_add(self.size_pow2))
    }

    /// Whether the decode footprints of two *placed* regions intersect.
    ///
    /// Unplaced regions occupy no addresses yet and never overlap.
    pub fn overlaps(&self, other: &Region) -> bool {
        match (self.origin, other.origin) {
            (Some(a), Some(b)) => {
                a < b.saturating_add(other.size_pow2) && b < a.saturating_add(self.size_pow2)
            }
            _ => false,
        }
    }

    /// Whether `inner` lies entirely within this region.
    ///
    /// Containment uses the *requested* sizes: an IO window contains a
    /// peripheral region if the unrounded range fits, even when the
    /// peripheral's rounded decode footprint would poke out.
    pub fn contains(&self, inner: &Region) -> bool {
        match (self.origin, inner.origin) {
            (Some(outer_origin), Some(inner_origin)) => {
                inner_origin >= outer_origin
                    && inner_origin.saturating_add(inner.size)
                        <= outer_origin.saturating_add(self.size)
            }
            _ => false,
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.origin {
            Some(origin) => write!(f, "origin: 0x{origin:08x}, ")?,
            None => write!(f, "origin: auto, ")?,
        }
        write!(
            f,
            "size: 0x{:08x}, mode: {}, cached: {}, linker: {}",
            self.size, self.mode, self.cached, self.linker_only
        )
    }
}
