use core::fmt;

use crate::error::{LocError, LocResult};

/// A bounded pool of integer locations assigned to names.
///
/// Slots are unique integers in `[0, n_locs)`. Auto-assignment picks the
/// lowest unused slot, which depends only on the *set* of slots currently in
/// use (not on insertion order), so replayed build sequences reproduce the
/// same numbering. Insertion order of names is preserved for reporting.
#[derive(Debug, Clone)]
pub struct LocationPool {
    kind: &'static str,
    n_locs: u32,
    locs: Vec<(String, u32)>,
    frozen: bool,
}

impl LocationPool {
    pub fn new(kind: &'static str, n_locs: u32) -> Self {
        LocationPool {
            kind,
            n_locs,
            locs: Vec::new(),
            frozen: false,
        }
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }

    pub fn n_locs(&self) -> u32 {
        self.n_locs
    }

    pub fn len(&self) -> usize {
        self.locs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locs.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<u32> {
        self.locs.iter().find(|(n, _)| n == name).map(|(_, s)| *s)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.locs.iter().map(|(n, s)| (n.as_str(), *s))
    }

    /// Reserves a location for `name`.
    ///
    /// With `reuse_if_exists`, an already-present name returns its existing
    /// slot unchanged. An explicit `slot` must not be bound to another name
    /// and must satisfy `slot <= n_locs` (the inclusive upper bound is a
    /// compatibility quirk kept from the original allocator; auto-assignment
    /// never hands out `n_locs` itself). Without an explicit slot the lowest
    /// unused one is taken.
    pub fn add(&mut self, name: &str, slot: Option<u32>, reuse_if_exists: bool) -> LocResult<u32> {
        if reuse_if_exists {
            if let Some(existing) = self.get(name) {
                return Ok(existing);
            }
        }
        if self.frozen {
            return Err(LocError::Frozen { kind: self.kind });
        }
        if self.get(name).is_some() {
            return Err(LocError::DuplicateName {
                kind: self.kind,
                name: name.into(),
            });
        }

        let slot = match slot {
            Some(slot) => {
                if let Some((owner, _)) = self.locs.iter().find(|(_, s)| *s == slot) {
                    return Err(LocError::SlotInUse {
                        kind: self.kind,
                        slot,
                        owner: owner.clone(),
                    });
                }
                if slot > self.n_locs {
                    return Err(LocError::SlotOutOfRange {
                        kind: self.kind,
                        slot,
                        n_locs: self.n_locs,
                    });
                }
                slot
            }
            None => self.alloc()?,
        };

        tracing::debug!(kind = self.kind, name, slot, "location reserved");
        self.locs.push((name.into(), slot));
        Ok(slot)
    }

    /// First-free scan over `[0, n_locs)`.
    fn alloc(&self) -> LocResult<u32> {
        (0..self.n_locs)
            .find(|candidate| !self.locs.iter().any(|(_, s)| s == candidate))
            .ok_or(LocError::Exhausted {
                kind: self.kind,
                n_locs: self.n_locs,
            })
    }

    /// Makes the pool read-only; further reservations fail.
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }
}

impl fmt::Display for LocationPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} locations: ({})", self.kind, self.locs.len())?;
        let width = self.locs.iter().map(|(n, _)| n.len()).max().unwrap_or(0);
        let mut sorted: Vec<(&str, u32)> = self.iter().collect();
        sorted.sort_by_key(|(_, slot)| *slot);
        for (name, slot) in sorted {
            writeln!(f, "- {name:<width$} : {slot}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_assignment_takes_lowest_free_slot() {
        let mut pool = LocationPool::new("IRQ", 8);
        assert_eq!(pool.add("timer", Some(0), false).unwrap(), 0);
        assert_eq!(pool.add("dma", Some(2), false).unwrap(), 2);
        // The hole at 1 is filled before anything above 2.
        assert_eq!(pool.add("uart", None, false).unwrap(), 1);
        assert_eq!(pool.add("spi", None, false).unwrap(), 3);
    }

    #[test]
    fn allocation_depends_only_on_used_slot_set() {
        let mut a = LocationPool::new("IRQ", 8);
        a.add("x", Some(1), false).unwrap();
        a.add("y", Some(0), false).unwrap();

        let mut b = LocationPool::new("IRQ", 8);
        b.add("y", Some(0), false).unwrap();
        b.add("x", Some(1), false).unwrap();

        assert_eq!(
            a.add("z", None, false).unwrap(),
            b.add("z", None, false).unwrap()
        );
    }

    #[test]
    fn duplicate_names_and_slots_are_rejected() {
        let mut pool = LocationPool::new("CSR", 4);
        pool.add("uart", Some(1), false).unwrap();
        assert_eq!(
            pool.add("uart", None, false).unwrap_err(),
            LocError::DuplicateName {
                kind: "CSR",
                name: "uart".into()
            }
        );
        assert_eq!(
            pool.add("timer", Some(1), false).unwrap_err(),
            LocError::SlotInUse {
                kind: "CSR",
                slot: 1,
                owner: "uart".into()
            }
        );
    }

    #[test]
    fn reuse_if_exists_returns_the_existing_slot() {
        let mut pool = LocationPool::new("CSR", 4);
        assert_eq!(pool.add("uart", Some(3), false).unwrap(), 3);
        assert_eq!(pool.add("uart", None, true).unwrap(), 3);
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn explicit_slot_upper_bound_is_inclusive() {
        let mut pool = LocationPool::new("CSR", 4);
        // Compatibility quirk: slot == n_locs is accepted when pinned.
        assert_eq!(pool.add("edge", Some(4), false).unwrap(), 4);
        assert_eq!(
            pool.add("beyond", Some(5), false).unwrap_err(),
            LocError::SlotOutOfRange {
                kind: "CSR",
                slot: 5,
                n_locs: 4
            }
        );
    }

    #[test]
    fn exhaustion_is_reported() {
        let mut pool = LocationPool::new("IRQ", 2);
        pool.add("a", None, false).unwrap();
        pool.add("b", None, false).unwrap();
        assert_eq!(
            pool.add("c", None, false).unwrap_err(),
            LocError::Exhausted {
                kind: "IRQ",
                n_locs: 2
            }
        );
    }

    #[test]
    fn frozen_pools_reject_new_reservations_but_serve_reuse() {
        let mut pool = LocationPool::new("CSR", 4);
        pool.add("uart", None, false).unwrap();
        pool.freeze();
        assert_eq!(
            pool.add("timer", None, false).unwrap_err(),
            LocError::Frozen { kind: "CSR" }
        );
        // Reuse of an existing reservation is a lookup, not a mutation.
        assert_eq!(pool.add("uart", None, true).unwrap(), 0);
    }
}
