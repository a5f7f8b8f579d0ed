use crate::error::StorageError;

/// Keys of the durable per-client collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    Favorites,
    MealPlan,
    RecentSearches,
    SearchHistory,
}

impl StorageKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKey::Favorites => "favorites",
            StorageKey::MealPlan => "mealPlan",
            StorageKey::RecentSearches => "recentSearches",
            StorageKey::SearchHistory => "searchHistory",
        }
    }
}

/// String keyed store of JSON documents.
///
/// Writes must be visible to the next read on the same store.
pub trait KeyValueStore: Send + Sync {
    /// Get the raw JSON stored under `key`.
    fn get(&self, key: StorageKey) -> Result<Option<String>, StorageError>;

    /// Replace the value stored under `key`.
    fn set(&self, key: StorageKey, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Returns true if a value was present.
    fn remove(&self, key: StorageKey) -> Result<bool, StorageError>;
}

// In-memory implementation for testing
#[cfg(any(test, feature = "test-utils"))]
pub mod memory {
    use super::*;
    use std::collections::HashMap;
    use std::sync::RwLock;

    /// In-memory key-value store for testing.
    #[derive(Default)]
    pub struct InMemoryStore {
        values: RwLock<HashMap<StorageKey, String>>,
    }

    impl InMemoryStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// Store seeded with raw values, e.g. to simulate corrupt payloads.
        pub fn with_values(values: impl IntoIterator<Item = (StorageKey, String)>) -> Self {
            Self {
                values: RwLock::new(values.into_iter().collect()),
            }
        }
    }

    impl KeyValueStore for InMemoryStore {
        fn get(&self, key: StorageKey) -> Result<Option<String>, StorageError> {
            Ok(self.values.read().unwrap().get(&key).cloned())
        }

        fn set(&self, key: StorageKey, value: &str) -> Result<(), StorageError> {
            self.values
                .write()
                .unwrap()
                .insert(key, value.to_string());
            Ok(())
        }

        fn remove(&self, key: StorageKey) -> Result<bool, StorageError> {
            Ok(self.values.write().unwrap().remove(&key).is_some())
        }
    }
}
