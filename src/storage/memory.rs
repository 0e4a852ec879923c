//! Implements an in-memory key-value store.

use std::{collections::HashMap, sync::Mutex};

use crate::Error;

use super::KeyValueStore;

/// Keeps values in a [HashMap] for the lifetime of the store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, Error> {
        self.values
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire memory store lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, Error> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        self.lock()?.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), Error> {
        self.lock()?.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::storage::KeyValueStore;

    use super::MemoryStore;

    #[test]
    fn missing_key_is_none() {
        let store = MemoryStore::new();

        assert_eq!(store.get("theme").unwrap(), None);
    }

    #[test]
    fn set_then_get_returns_value() {
        let store = MemoryStore::new();

        store.set("theme", "dark").unwrap();

        assert_eq!(store.get("theme").unwrap(), Some("dark".to_owned()));
    }

    #[test]
    fn set_overwrites_previous_value() {
        let store = MemoryStore::new();

        store.set("admin_tab", "users").unwrap();
        store.set("admin_tab", "wallets").unwrap();

        assert_eq!(store.get("admin_tab").unwrap(), Some("wallets".to_owned()));
    }

    #[test]
    fn remove_deletes_value() {
        let store = MemoryStore::new();
        store.set("jwt", "token").unwrap();

        store.remove("jwt").unwrap();
        store.remove("never-set").unwrap();

        assert_eq!(store.get("jwt").unwrap(), None);
    }
}
