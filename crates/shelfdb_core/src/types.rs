//! Core type definitions for ShelfDB.

use std::fmt;

/// Backing-store-generated locator for a document's primary-table row.
///
/// Assigned by the backing store on a document's first save and used from
/// then on for direct updates and deletes. Keys are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StorageKey(pub u64);

impl StorageKey {
    /// Creates a storage key.
    #[must_use]
    pub const fn new(key: u64) -> Self {
        Self(key)
    }

    /// Returns the raw key value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "key:{}", self.0)
    }
}

impl From<u64> for StorageKey {
    fn from(key: u64) -> Self {
        Self(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_key_display() {
        assert_eq!(StorageKey::new(42).to_string(), "key:42");
    }

    #[test]
    fn storage_key_ordering() {
        assert!(StorageKey::new(1) < StorageKey::new(2));
        assert_eq!(StorageKey::from(7).as_u64(), 7);
    }
}
