//! Wallet dashboard is the data layer behind a role-based digital wallet
//! dashboard.
//!
//! The library turns lists of wallet transactions into the derived views the
//! User, Agent and Admin dashboards chart: a gap-free daily series and
//! per-type totals. It also provides the filter and pagination state used by
//! the dashboard lists, a SQLite transaction ledger and a JSON API that
//! serves all of the above.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod app_state;
mod calendar;
mod dashboard;
mod db;
mod endpoints;
mod error_info;
mod format;
mod logging;
mod pagination;
mod routing;
mod storage;
mod transaction;
mod view_state;

pub use app_state::AppState;
pub use calendar::{DayAlignment, DayKey};
pub use dashboard::{
    DailyBucket, DashboardCharts, TypeTotals, build_daily_series, build_daily_series_now,
    sum_by_type, type_pie_chart, volume_chart,
};
pub use db::initialize as initialize_db;
pub use error_info::{ApiResult, DEFAULT_ERROR_MESSAGE, ErrorInfo};
pub use format::format_currency;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use pagination::{
    Paginated, PaginationConfig, PaginationIndicator, clamp_page, create_pagination_indicators,
    total_pages,
};
pub use routing::build_router;
pub use storage::{
    ADMIN_TAB_KEY, AdminTab, KeyValueStore, MemoryStore, SqliteStore, THEME_KEY, TOKEN_KEY, Theme,
    is_tour_done, load_admin_tab, load_theme, load_token, mark_tour_done, restart_tour,
    save_admin_tab, save_theme, save_token, toggle_theme, tour_key,
};
pub use transaction::{
    NewTransaction, Transaction, TransactionStatus, TransactionType, UserRef, count_transactions,
    create_transaction, query_transactions,
};
pub use view_state::{
    AdminTransactionFilters, FilterSet, ListView, MyTransactionFilters, PageRequest, Role,
    TransactionFilters, UserFilters, WalletFilters, quick_filter,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!("failed to install signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// A day key was not a valid `YYYY-MM-DD` date.
    #[error("invalid date \"{0}\", expected YYYY-MM-DD")]
    InvalidDayKey(String),

    /// A transaction amount was zero, negative or not a number.
    #[error("{0} is not a valid transaction amount")]
    InvalidAmount(f64),

    /// The query string or body of a request could not be parsed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A list request could not be encoded as query parameters.
    #[error("could not encode query parameters: {0}")]
    QueryEncodingError(String),

    /// An error occurred while serializing a struct as JSON
    #[error("could not serialize as JSON: {0}")]
    JSONSerializationError(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<&Error> for ErrorInfo {
    fn from(error: &Error) -> Self {
        match error {
            Error::NotFound => ErrorInfo::new(
                StatusCode::NOT_FOUND,
                "The requested resource could not be found",
            ),
            Error::InvalidAmount(_) => {
                ErrorInfo::new(StatusCode::BAD_REQUEST, "Enter a valid amount")
            }
            Error::InvalidDayKey(_) | Error::InvalidRequest(_) => {
                ErrorInfo::new(StatusCode::BAD_REQUEST, error.to_string())
            }
            Error::InvalidTimezoneError(timezone) => ErrorInfo::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            ),
            // Any errors that are not handled above are not intended to be shown to the client.
            _ => ErrorInfo::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "An unexpected error occurred, check the server logs for more details.",
            ),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let info = ErrorInfo::from(&self);

        if info.status().is_server_error() {
            tracing::error!("An unexpected error occurred: {}", self);
        }

        (info.status(), Json(info)).into_response()
    }
}
