//! Stable keys for the about "values" list.
//!
//! Keys are issued once per entry and never reused within a session, so a key
//! held by a caller keeps pointing at the same entry after other entries are
//! added or removed.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ValueKey(u32);

impl fmt::Display for ValueKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Keys parallel to a list owned elsewhere: `keys[i]` names entry `i`.
#[derive(Debug, Default)]
pub struct KeyedList {
    keys: Vec<ValueKey>,
    next: u32,
}

impl KeyedList {
    /// Issue fresh keys for a list of `len` entries.
    pub fn populate(&mut self, len: usize) {
        self.keys.clear();
        for _ in 0..len {
            let key = self.issue();
            self.keys.push(key);
        }
    }

    pub fn keys(&self) -> &[ValueKey] {
        &self.keys
    }

    pub fn position(&self, key: ValueKey) -> Option<usize> {
        self.keys.iter().position(|k| *k == key)
    }

    /// Key a newly appended entry.
    pub fn push(&mut self) -> ValueKey {
        let key = self.issue();
        self.keys.push(key);
        key
    }

    /// Drop a key, returning the position its entry had.
    pub fn remove(&mut self, key: ValueKey) -> Option<usize> {
        let index = self.position(key)?;
        self.keys.remove(index);
        Some(index)
    }

    fn issue(&mut self) -> ValueKey {
        let key = ValueKey(self.next);
        self.next += 1;
        key
    }
}
