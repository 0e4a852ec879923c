//! Implements a SQLite backed key-value store.

use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::{Connection, OptionalExtension};

use crate::Error;

use super::KeyValueStore;

/// Create the preference table in the database.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn create_preference_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS preference (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )",
        (),
    )?;

    Ok(())
}

/// Stores values in the `preference` table of a SQLite database.
///
/// The table must already exist, see [create_preference_table].
#[derive(Debug, Clone)]
pub struct SqliteStore {
    connection: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, Error> {
        self.lock()?
            .query_row("SELECT value FROM preference WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()
            .map_err(|error| error.into())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        self.lock()?.execute(
            "INSERT INTO preference (key, value) VALUES (?1, ?2)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            [key, value],
        )?;

        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), Error> {
        self.lock()?
            .execute("DELETE FROM preference WHERE key = ?1", [key])?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use rusqlite::Connection;

    use crate::{db::initialize, storage::KeyValueStore};

    use super::SqliteStore;

    fn get_test_store() -> SqliteStore {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        SqliteStore::new(Arc::new(Mutex::new(conn)))
    }

    #[test]
    fn missing_key_is_none() {
        let store = get_test_store();

        assert_eq!(store.get("theme").unwrap(), None);
    }

    #[test]
    fn set_then_get_returns_latest_value() {
        let store = get_test_store();

        store.set("theme", "light").unwrap();
        store.set("theme", "dark").unwrap();

        assert_eq!(store.get("theme").unwrap(), Some("dark".to_owned()));
    }

    #[test]
    fn remove_deletes_value() {
        let store = get_test_store();
        store.set("jwt", "abc.def.ghi").unwrap();

        store.remove("jwt").unwrap();

        assert_eq!(store.get("jwt").unwrap(), None);
    }

    #[test]
    fn clones_share_the_same_table() {
        let store = get_test_store();
        let other = store.clone();

        store.set("dw_tour_done_user", "1").unwrap();

        assert_eq!(
            other.get("dw_tour_done_user").unwrap(),
            Some("1".to_owned())
        );
    }
}
