//! Caller-owned name registry.
//!
//! Lets several libraries publish themselves under shared names without a
//! global variable: the caller owns the `Namespace`, `register` remembers
//! whatever occupied the slot before, and `Registration::release` puts it back.

use std::collections::HashMap;

/// Key this crate registers under by default.
pub const NAMESPACE_KEY: &str = "SimpleGL";

/// Name → value slots shared by cooperating libraries.
#[derive(Debug, Clone)]
pub struct Namespace<T> {
    slots: HashMap<String, T>,
}

impl<T> Namespace<T> {
    pub fn new() -> Self {
        Self {
            slots: HashMap::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&T> {
        self.slots.get(name)
    }

    /// Replaces the occupant of `name`, returning the previous one.
    pub fn set(&mut self, name: impl Into<String>, value: T) -> Option<T> {
        self.slots.insert(name.into(), value)
    }

    pub fn remove(&mut self, name: &str) -> Option<T> {
        self.slots.remove(name)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl<T> Default for Namespace<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Publishes `value` under `name` and remembers the previous occupant.
pub fn register<T: Clone>(
    ns: &mut Namespace<T>,
    name: impl Into<String>,
    value: T,
) -> Registration<T> {
    let name = name.into();
    let previous = ns.set(name.clone(), value.clone());
    Registration { name, previous, value }
}

/// Outstanding claim on a namespace slot.
#[derive(Debug, Clone)]
#[must_use = "dropping a Registration leaves the slot claimed with no way to restore it"]
pub struct Registration<T> {
    name: String,
    previous: Option<T>,
    value: T,
}

impl<T: Clone> Registration<T> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn previous(&self) -> Option<&T> {
        self.previous.as_ref()
    }

    /// Restores the previous occupant of the slot (or empties it).
    ///
    /// A non-empty `alt_name` republishes the registered value there.
    /// Returns the registered value.
    pub fn release(self, ns: &mut Namespace<T>, alt_name: Option<&str>) -> T {
        match self.previous {
            Some(previous) => {
                ns.set(self.name, previous);
            }
            None => {
                ns.remove(&self.name);
            }
        }

        if let Some(alt) = alt_name.filter(|n| !n.is_empty()) {
            ns.set(alt, self.value.clone());
        }
        self.value
    }
}
