use std::collections::HashMap;

/// Name → value map with overwrite-on-insert semantics.
///
/// There is no removal: an entry lives until its name is registered again.
#[derive(Debug, Clone)]
pub struct NamedTable<V> {
    entries: HashMap<String, V>,
}

impl<V> NamedTable<V> {
    #[inline]
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Stores `value` under `name`, returning the superseded value if any.
    pub fn insert(&mut self, name: impl Into<String>, value: V) -> Option<V> {
        self.entries.insert(name.into(), value)
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<&V> {
        self.entries.get(name)
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<V> Default for NamedTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_returns_superseded_value() {
        let mut t = NamedTable::new();
        assert_eq!(t.insert("a", 1), None);
        assert_eq!(t.insert("a", 2), Some(1));
        assert_eq!(t.get("a"), Some(&2));
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn names_are_sorted() {
        let mut t = NamedTable::new();
        t.insert("b", ());
        t.insert("a", ());
        t.insert("c", ());
        assert_eq!(t.names(), vec!["a", "b", "c"]);
    }

    #[test]
    fn empty_table() {
        let t: NamedTable<u32> = NamedTable::default();
        assert!(t.is_empty());
        assert!(!t.contains("x"));
    }
}
