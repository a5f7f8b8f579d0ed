use std::sync::Arc;

use redb::Database;

use pantry_core::{KeyValueStore, StorageError, StorageKey};

use crate::tables::CLIENT_STORAGE_TABLE;

/// redb implementation of KeyValueStore.
///
/// Every `set` and `remove` commits its own write transaction, so a read
/// issued after the call returns observes it.
pub struct RedbKeyValueStore {
    db: Arc<Database>,
}

impl RedbKeyValueStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Initialize the database tables.
    pub fn init_tables(db: &Database) -> Result<(), StorageError> {
        let write_txn = db
            .begin_write()
            .map_err(|e| StorageError::Database(e.to_string()))?;
        {
            let _ = write_txn
                .open_table(CLIENT_STORAGE_TABLE)
                .map_err(|e| StorageError::Database(e.to_string()))?;
        }
        write_txn
            .commit()
            .map_err(|e| StorageError::Database(e.to_string()))?;
        Ok(())
    }
}

impl KeyValueStore for RedbKeyValueStore {
    fn get(&self, key: StorageKey) -> Result<Option<String>, StorageError> {
        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| StorageError::Database(e.to_string()))?;

        let table = read_txn
            .open_table(CLIENT_STORAGE_TABLE)
            .map_err(|e| StorageError::Database(e.to_string()))?;

        let value = table
            .get(key.as_str())
            .map_err(|e| StorageError::Database(e.to_string()))?;

        Ok(value.map(|v| v.value().to_string()))
    }

    fn set(&self, key: StorageKey, value: &str) -> Result<(), StorageError> {
        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| StorageError::Database(e.to_string()))?;

        {
            let mut table = write_txn
                .open_table(CLIENT_STORAGE_TABLE)
                .map_err(|e| StorageError::Database(e.to_string()))?;

            table
                .insert(key.as_str(), value)
                .map_err(|e| StorageError::Database(e.to_string()))?;
        }

        write_txn
            .commit()
            .map_err(|e| StorageError::Database(e.to_string()))?;

        Ok(())
    }

    fn remove(&self, key: StorageKey) -> Result<bool, StorageError> {
        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| StorageError::Database(e.to_string()))?;

        let removed;
        {
            let mut table = write_txn
                .open_table(CLIENT_STORAGE_TABLE)
                .map_err(|e| StorageError::Database(e.to_string()))?;

            removed = table
                .remove(key.as_str())
                .map_err(|e| StorageError::Database(e.to_string()))?
                .is_some();
        }

        write_txn
            .commit()
            .map_err(|e| StorageError::Database(e.to_string()))?;

        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_set_and_get() {
        let dir = tempdir().unwrap();
        let db = Database::create(dir.path().join("test.redb")).unwrap();
        RedbKeyValueStore::init_tables(&db).unwrap();
        let store = RedbKeyValueStore::new(Arc::new(db));

        store
            .set(StorageKey::RecentSearches, r#"["egg, flour"]"#)
            .unwrap();

        let value = store.get(StorageKey::RecentSearches).unwrap();
        assert_eq!(value.as_deref(), Some(r#"["egg, flour"]"#));
        assert_eq!(store.get(StorageKey::Favorites).unwrap(), None);
    }

    #[test]
    fn test_overwrite_and_remove() {
        let dir = tempdir().unwrap();
        let db = Database::create(dir.path().join("test.redb")).unwrap();
        RedbKeyValueStore::init_tables(&db).unwrap();
        let store = RedbKeyValueStore::new(Arc::new(db));

        store.set(StorageKey::Favorites, "[1]").unwrap();
        store.set(StorageKey::Favorites, "[2]").unwrap();
        assert_eq!(store.get(StorageKey::Favorites).unwrap().as_deref(), Some("[2]"));

        assert!(store.remove(StorageKey::Favorites).unwrap());
        assert!(!store.remove(StorageKey::Favorites).unwrap());
        assert_eq!(store.get(StorageKey::Favorites).unwrap(), None);
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.redb");
        {
            let db = Database::create(&path).unwrap();
            RedbKeyValueStore::init_tables(&db).unwrap();
            let store = RedbKeyValueStore::new(Arc::new(db));
            store.set(StorageKey::MealPlan, "{}").unwrap();
        }

        let db = Database::create(&path).unwrap();
        let store = RedbKeyValueStore::new(Arc::new(db));
        assert_eq!(store.get(StorageKey::MealPlan).unwrap().as_deref(), Some("{}"));
    }
}
