//! Typed accessors over the documented keys of a [KeyValueStore].
//!
//! Stored values that cannot be understood fall back to the defaults rather
//! than failing.

use serde::{Deserialize, Serialize};

use crate::{Error, view_state::Role};

use super::KeyValueStore;

/// The key holding the bearer token of the signed-in user.
pub const TOKEN_KEY: &str = "jwt";
/// The key holding the colour theme.
pub const THEME_KEY: &str = "theme";
/// The key holding the last selected tab on the admin dashboard.
pub const ADMIN_TAB_KEY: &str = "admin_tab";

const TOUR_DONE: &str = "1";

/// The colour theme of the dashboards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Dark text on a light background.
    #[default]
    Light,
    /// Light text on a dark background.
    Dark,
}

impl Theme {
    /// The stored name of the theme.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// The other theme.
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    fn from_stored(value: &str) -> Self {
        match value {
            "dark" => Self::Dark,
            _ => Self::Light,
        }
    }
}

/// The tabs of the admin dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdminTab {
    /// The user list.
    #[default]
    Users,
    /// The wallet list.
    Wallets,
    /// The transaction list.
    Transactions,
}

impl AdminTab {
    /// The stored name of the tab.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Wallets => "wallets",
            Self::Transactions => "transactions",
        }
    }

    fn from_stored(value: &str) -> Self {
        match value {
            "wallets" => Self::Wallets,
            "transactions" => Self::Transactions,
            _ => Self::Users,
        }
    }
}

/// The key of the tour-completion flag for `role`, e.g. "dw_tour_done_agent".
pub fn tour_key(role: Role) -> String {
    format!("dw_tour_done_{}", role.as_str())
}

/// Load the theme, defaulting to [Theme::Light].
///
/// # Errors
/// Returns an error if the store cannot be read.
pub fn load_theme<S: KeyValueStore + ?Sized>(store: &S) -> Result<Theme, Error> {
    Ok(store
        .get(THEME_KEY)?
        .map(|value| Theme::from_stored(&value))
        .unwrap_or_default())
}

/// Save the theme.
///
/// # Errors
/// Returns an error if the store cannot be written.
pub fn save_theme<S: KeyValueStore + ?Sized>(store: &S, theme: Theme) -> Result<(), Error> {
    store.set(THEME_KEY, theme.as_str())
}

/// Switch between the light and dark theme and return the new theme.
///
/// # Errors
/// Returns an error if the store cannot be read or written.
pub fn toggle_theme<S: KeyValueStore + ?Sized>(store: &S) -> Result<Theme, Error> {
    let theme = load_theme(store)?.toggled();
    save_theme(store, theme)?;

    Ok(theme)
}

/// Load the last selected admin tab, defaulting to [AdminTab::Users].
///
/// # Errors
/// Returns an error if the store cannot be read.
pub fn load_admin_tab<S: KeyValueStore + ?Sized>(store: &S) -> Result<AdminTab, Error> {
    Ok(store
        .get(ADMIN_TAB_KEY)?
        .map(|value| AdminTab::from_stored(&value))
        .unwrap_or_default())
}

/// Save the selected admin tab.
///
/// # Errors
/// Returns an error if the store cannot be written.
pub fn save_admin_tab<S: KeyValueStore + ?Sized>(store: &S, tab: AdminTab) -> Result<(), Error> {
    store.set(ADMIN_TAB_KEY, tab.as_str())
}

/// Whether the user has finished the guided tour for `role`.
///
/// # Errors
/// Returns an error if the store cannot be read.
pub fn is_tour_done<S: KeyValueStore + ?Sized>(store: &S, role: Role) -> Result<bool, Error> {
    Ok(store.get(&tour_key(role))?.is_some())
}

/// Record that the guided tour for `role` has been finished or skipped.
///
/// # Errors
/// Returns an error if the store cannot be written.
pub fn mark_tour_done<S: KeyValueStore + ?Sized>(store: &S, role: Role) -> Result<(), Error> {
    store.set(&tour_key(role), TOUR_DONE)
}

/// Clear the tour flag for `role` so the tour starts again.
///
/// # Errors
/// Returns an error if the store cannot be written.
pub fn restart_tour<S: KeyValueStore + ?Sized>(store: &S, role: Role) -> Result<(), Error> {
    store.remove(&tour_key(role))
}

/// Load the bearer token of the signed-in user.
///
/// # Errors
/// Returns an error if the store cannot be read.
pub fn load_token<S: KeyValueStore + ?Sized>(store: &S) -> Result<Option<String>, Error> {
    store.get(TOKEN_KEY)
}

/// Save the bearer token, or remove it when `token` is `None`.
///
/// # Errors
/// Returns an error if the store cannot be written.
pub fn save_token<S: KeyValueStore + ?Sized>(store: &S, token: Option<&str>) -> Result<(), Error> {
    match token {
        Some(token) => store.set(TOKEN_KEY, token),
        None => store.remove(TOKEN_KEY),
    }
}
