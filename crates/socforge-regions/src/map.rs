use crate::error::{RegionError, RegionResult};
use crate::region::Region;
use crate::table::NamedTable;

/// The address regions of one bus namespace.
///
/// Two tables are kept: `io_regions` holds the fixed, non-relocatable IO
/// windows (peripheral apertures, declared up front, typically by the CPU
/// core), and `regions` holds every placed region, cached and uncached alike.
/// A region added without an origin is allocated first-fit: cached regions
/// search the whole `[0, 2^address_width)` space, uncached regions search the
/// union of the IO windows.
#[derive(Debug, Clone)]
pub struct RegionMap {
    address_width: u32,
    regions: NamedTable<Region>,
    io_regions: NamedTable<Region>,
    io_check: bool,
}

impl RegionMap {
    pub fn new(address_width: u32) -> Self {
        RegionMap {
            address_width,
            regions: NamedTable::new(),
            io_regions: NamedTable::new(),
            io_check: true,
        }
    }

    pub fn address_width(&self) -> u32 {
        self.address_width
    }

    pub fn regions(&self) -> &NamedTable<Region> {
        &self.regions
    }

    pub fn io_regions(&self) -> &NamedTable<Region> {
        &self.io_regions
    }

    pub fn region(&self, name: &str) -> Option<&Region> {
        self.regions.get(name)
    }

    /// Enables or disables IO-vs-cached classification checking.
    ///
    /// Classification is meaningless when nothing constrains the memory map
    /// (no CPU core declaring IO apertures), so builders may switch it off.
    pub fn set_io_check(&mut self, enabled: bool) {
        self.io_check = enabled;
    }

    /// Declares a fixed IO window.
    ///
    /// Windows constrain where uncached regions may live and where uncached
    /// regions are allocated; they must carry an origin and must not overlap
    /// each other.
    pub fn add_io_region(&mut self, name: &str, region: Region) -> RegionResult<Region> {
        self.check_name_free(name)?;
        if region.size == 0 {
            return Err(RegionError::ZeroSize { name: name.into() });
        }
        if region.origin.is_none() {
            return Err(RegionError::MissingOrigin { name: name.into() });
        }
        if let Some((first, second)) = conflict(&self.io_regions, name, &region, false) {
            return Err(RegionError::Overlap { first, second });
        }
        tracing::debug!(name, %region, "IO window added");
        self.io_regions.insert(name, region.clone());
        Ok(region)
    }

    /// Declares (or allocates) a region.
    ///
    /// With an explicit origin the region is classified against the IO
    /// windows and checked for overlap against every placed region; without
    /// one an origin is allocated first. The placed region is returned.
    pub fn add_region(&mut self, name: &str, region: Region) -> RegionResult<Region> {
        self.check_name_free(name)?;
        if region.size == 0 {
            return Err(RegionError::ZeroSize { name: name.into() });
        }

        let placed = match region.origin {
            None => {
                let origin = self.alloc_origin(name, region.size, region.size_pow2, region.cached)?;
                let placed = Region {
                    origin: Some(origin),
                    ..region
                };
                tracing::debug!(name, origin, size = placed.size, "region allocated");
                placed
            }
            Some(origin) => {
                if self.io_check {
                    if self.is_io(&region) {
                        if region.cached {
                            return Err(RegionError::CachedInsideIo { name: name.into() });
                        }
                    } else if !region.cached {
                        return Err(RegionError::UncachedOutsideIo { name: name.into() });
                    }
                }
                if let Some((first, second)) = conflict(&self.regions, name, &region, false) {
                    return Err(RegionError::Overlap { first, second });
                }
                tracing::debug!(name, origin, size = region.size, "region added");
                region
            }
        };

        self.regions.insert(name, placed.clone());
        Ok(placed)
    }

    /// First-fit origin search.
    ///
    /// Candidates advance in steps of the requested size, realigned up to the
    /// next `size_pow2` multiple whenever misaligned, and each candidate is
    /// tested against every placed region. The scan order depends only on the
    /// regions placed so far, which keeps allocation deterministic across
    /// identical call sequences.
    fn alloc_origin(&self, name: &str, size: u64, size_pow2: u64, cached: bool) -> RegionResult<u64> {
        let search: Vec<(u64, u128)> = if cached {
            vec![(0, 1u128 << self.address_width)]
        } else {
            self.io_regions
                .iter()
                .map(|(_, window)| {
                    let origin = window.origin.unwrap_or(0);
                    (origin, origin as u128 + window.size_pow2 as u128)
                })
                .collect()
        };

        for (base, end) in search {
            let mut origin = base;
            while origin as u128 + size as u128 <= end {
                if origin % size_pow2 != 0 {
                    origin += size_pow2 - origin % size_pow2;
                    continue;
                }
                let candidate = Region {
                    cached,
                    ..Region::at(origin, size)
                };
                let collision = self
                    .regions
                    .iter()
                    .any(|(_, placed)| !placed.linker_only && candidate.overlaps(placed));
                if !collision {
                    return Ok(origin);
                }
                origin = match origin.checked_add(size) {
                    Some(next) => next,
                    None => break,
                };
            }
        }

        Err(RegionError::OutOfSpace {
            name: name.into(),
            size,
        })
    }

    /// Whether `region` falls entirely inside some registered IO window.
    pub fn is_io(&self, region: &Region) -> bool {
        self.io_regions
            .iter()
            .any(|(_, window)| window.contains(region))
    }

    /// Pairwise overlap check over a region table.
    ///
    /// Linker-only regions constrain layout accounting but are not wired, so
    /// they are exempt from overlap checking unless the caller passes
    /// `check_linker = true`. No internal call path opts in; the parameter
    /// exists for builders that want linker-aware validation of a finished
    /// map.
    pub fn check_overlap(
        table: &NamedTable<Region>,
        check_linker: bool,
    ) -> Option<(String, String)> {
        let entries: Vec<(&str, &Region)> = table.iter().collect();
        for (i, &(first_name, first)) in entries.iter().enumerate() {
            for &(second_name, second) in &entries[i + 1..] {
                if (first.linker_only || second.linker_only) && !check_linker {
                    continue;
                }
                if first.overlaps(second) {
                    return Some((first_name.into(), second_name.into()));
                }
            }
        }
        None
    }

    /// Re-validates both tables, optionally including linker-only regions.
    pub fn validate(&self, check_linker: bool) -> RegionResult<()> {
        for table in [&self.io_regions, &self.regions] {
            if let Some((first, second)) = Self::check_overlap(table, check_linker) {
                return Err(RegionError::Overlap { first, second });
            }
        }
        Ok(())
    }

    fn check_name_free(&self, name: &str) -> RegionResult<()> {
        if self.regions.contains(name) || self.io_regions.contains(name) {
            return Err(RegionError::DuplicateName { name: name.into() });
        }
        Ok(())
    }
}

/// Tests `candidate` against every entry already in `table`, honoring the
/// linker-only exemption. Returns the conflicting pair in table order.
fn conflict(
    table: &NamedTable<Region>,
    candidate_name: &str,
    candidate: &Region,
    check_linker: bool,
) -> Option<(String, String)> {
    for (placed_name, placed) in table.iter() {
        if (placed.linker_only || candidate.linker_only) && !check_linker {
            continue;
        }
        if placed.overlaps(candidate) {
            return Some((placed_name.into(), candidate_name.into()));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::AccessMode;

    #[test]
    fn explicit_regions_detect_overlap_on_rounded_footprint() {
        let mut map = RegionMap::new(32);
        map.add_region("rom", Region::at(0x0000, 0x1800)).unwrap();
        // 0x1800 rounds to 0x2000, so 0x1800 is still inside rom's footprint.
        let err = map
            .add_region("sram", Region::at(0x1800, 0x800))
            .unwrap_err();
        assert_eq!(
            err,
            RegionError::Overlap {
                first: "rom".into(),
                second: "sram".into()
            }
        );
    }

    #[test]
    fn duplicate_names_are_rejected_across_both_tables() {
        let mut map = RegionMap::new(32);
        map.set_io_check(false);
        map.add_io_region("io0", Region::at(0x8000_0000, 0x1000_0000).uncached())
            .unwrap();
        assert_eq!(
            map.add_region("io0", Region::at(0, 0x1000)).unwrap_err(),
            RegionError::DuplicateName { name: "io0".into() }
        );
        map.add_region("rom", Region::at(0, 0x1000)).unwrap();
        assert_eq!(
            map.add_io_region("rom", Region::at(0xf000_0000, 0x1000).uncached())
                .unwrap_err(),
            RegionError::DuplicateName { name: "rom".into() }
        );
    }

    #[test]
    fn allocation_skips_occupied_space_and_aligns() {
        let mut map = RegionMap::new(32);
        map.add_region("rom", Region::at(0x0000_0000, 0x2000))
            .unwrap();
        let ram = map.add_region("ram", Region::new(0x1_0000)).unwrap();
        // First 64KiB-aligned slot after rom's rounded footprint.
        assert_eq!(ram.origin, Some(0x0001_0000));
        assert_eq!(ram.origin.unwrap() % ram.size_pow2, 0);
    }

    #[test]
    fn allocation_preserves_requested_flags() {
        let mut map = RegionMap::new(32);
        let sram = map
            .add_region("sram", Region::new(0x1000).mode(AccessMode::RX))
            .unwrap();
        assert_eq!(sram.mode, AccessMode::RX);
        assert!(sram.cached);
    }

    #[test]
    fn uncached_allocation_lands_in_io_windows() {
        let mut map = RegionMap::new(32);
        map.add_io_region("io0", Region::at(0x8000_0000, 0x1_0000).uncached())
            .unwrap();
        map.add_io_region("io1", Region::at(0xc000_0000, 0x1_0000).uncached())
            .unwrap();

        let a = map
            .add_region("uart", Region::new(0x1000).uncached())
            .unwrap();
        assert_eq!(a.origin, Some(0x8000_0000));

        // Fill the rest of io0 and the next allocation must move to io1.
        map.add_region("filler", Region::at(0x8000_1000, 0xf000).uncached())
            .unwrap();
        let b = map
            .add_region("timer", Region::new(0x1_0000).uncached())
            .unwrap();
        assert_eq!(b.origin, Some(0xc000_0000));
    }

    #[test]
    fn exhausted_io_windows_report_out_of_space() {
        let mut map = RegionMap::new(32);
        map.add_io_region("io0", Region::at(0x8000_0000, 0x1000).uncached())
            .unwrap();
        map.add_region("uart", Region::new(0x1000).uncached())
            .unwrap();
        let err = map
            .add_region("timer", Region::new(0x1000).uncached())
            .unwrap_err();
        assert_eq!(
            err,
            RegionError::OutOfSpace {
                name: "timer".into(),
                size: 0x1000
            }
        );
    }

    #[test]
    fn classification_is_enforced_both_ways() {
        let mut map = RegionMap::new(32);
        map.add_io_region("io0", Region::at(0x8000_0000, 0x1000_0000).uncached())
            .unwrap();

        assert_eq!(
            map.add_region("bad_cached", Region::at(0x8000_0000, 0x1000))
                .unwrap_err(),
            RegionError::CachedInsideIo {
                name: "bad_cached".into()
            }
        );
        assert_eq!(
            map.add_region("bad_io", Region::at(0x0000_0000, 0x1000).uncached())
                .unwrap_err(),
            RegionError::UncachedOutsideIo {
                name: "bad_io".into()
            }
        );

        // With checking off, both placements are accepted.
        map.set_io_check(false);
        map.add_region("cached_in_io", Region::at(0x8000_0000, 0x1000))
            .unwrap();
        map.add_region("io_outside", Region::at(0x0000_0000, 0x1000).uncached())
            .unwrap();
    }

    #[test]
    fn io_windows_must_not_overlap() {
        let mut map = RegionMap::new(32);
        map.add_io_region("io0", Region::at(0x8000_0000, 0x2000_0000).uncached())
            .unwrap();
        let err = map
            .add_io_region("io1", Region::at(0x9000_0000, 0x1000_0000).uncached())
            .unwrap_err();
        assert_eq!(
            err,
            RegionError::Overlap {
                first: "io0".into(),
                second: "io1".into()
            }
        );
    }

    #[test]
    fn linker_only_regions_are_exempt_unless_requested() {
        let mut map = RegionMap::new(32);
        map.add_region("ram", Region::at(0x4000_0000, 0x1_0000))
            .unwrap();
        // Overlaps ram, but linker-only reservations do not block placement.
        map.add_region("shadow", Region::at(0x4000_0000, 0x1_0000).linker_only())
            .unwrap();

        assert!(map.validate(false).is_ok());
        assert_eq!(
            map.validate(true).unwrap_err(),
            RegionError::Overlap {
                first: "ram".into(),
                second: "shadow".into()
            }
        );
    }

    #[test]
    fn linker_only_regions_do_not_block_allocation() {
        let mut map = RegionMap::new(32);
        map.add_region("shadow", Region::at(0x0000_0000, 0x1_0000).linker_only())
            .unwrap();
        let ram = map.add_region("ram", Region::new(0x1_0000)).unwrap();
        assert_eq!(ram.origin, Some(0x0000_0000));
    }

    #[test]
    fn zero_size_regions_are_rejected() {
        let mut map = RegionMap::new(32);
        assert_eq!(
            map.add_region("empty", Region::new(0)).unwrap_err(),
            RegionError::ZeroSize {
                name: "empty".into()
            }
        );
    }

    #[test]
    fn io_windows_require_an_origin() {
        let mut map = RegionMap::new(32);
        assert_eq!(
            map.add_io_region("io0", Region::new(0x1000).uncached())
                .unwrap_err(),
            RegionError::MissingOrigin { name: "io0".into() }
        );
    }

    #[test]
    fn allocation_is_deterministic_across_replays() {
        let build = || {
            let mut map = RegionMap::new(32);
            map.add_region("rom", Region::at(0, 0x8000)).unwrap();
            let a = map.add_region("ram", Region::new(0x1_0000)).unwrap();
            let b = map.add_region("scratch", Region::new(0x4000)).unwrap();
            (a.origin, b.origin)
        };
        assert_eq!(build(), build());
    }
}
