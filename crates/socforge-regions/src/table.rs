/// An insertion-ordered name → entry table.
///
/// Region, master and slave collections are small (bounded by the peripheral
/// count of a chip), so lookups are linear scans. What matters is that
/// iteration order is exactly insertion order: default names (`master0`,
/// `master1`, ...) and first-fit allocation are pure functions of the call
/// sequence, which keeps repeated builds byte-for-byte identical.
#[derive(Debug, Clone, Default)]
pub struct NamedTable<T> {
    entries: Vec<(String, T)>,
}

impl<T> NamedTable<T> {
    pub fn new() -> Self {
        NamedTable {
            entries: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    pub fn get(&self, name: &str) -> Option<&T> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Appends an entry, refusing duplicates. Returns `false` (and leaves the
    /// table untouched) if `name` is already present.
    pub fn insert(&mut self, name: impl Into<String>, value: T) -> bool {
        let name = name.into();
        if self.contains(&name) {
            return false;
        }
        self.entries.push((name, value));
        true
    }

    pub fn first(&self) -> Option<(&str, &T)> {
        self.entries.first().map(|(n, v)| (n.as_str(), v))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }
}
