//! Key-value stores for small pieces of client state, e.g. the theme or
//! whether a user has finished the guided tour.
//!
//! Code that needs persistent state takes a [KeyValueStore] instead of
//! reaching for a global, so tests can swap in a [MemoryStore].

mod memory;
mod preferences;
mod sqlite;

pub use memory::MemoryStore;
pub use preferences::{
    ADMIN_TAB_KEY, AdminTab, THEME_KEY, TOKEN_KEY, Theme, is_tour_done, load_admin_tab,
    load_theme, load_token, mark_tour_done, restart_tour, save_admin_tab, save_theme, save_token,
    toggle_theme, tour_key,
};
pub use sqlite::{SqliteStore, create_preference_table};

use crate::Error;

/// Stores string values by string key.
pub trait KeyValueStore {
    /// Retrieve the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, Error>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), Error>;

    /// Delete the value stored under `key`. Removing a missing key is not an
    /// error.
    fn remove(&self, key: &str) -> Result<(), Error>;
}
