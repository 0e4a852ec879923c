//! Dashboard HTTP handlers.
//!
//! Every handler works on the same trailing window: the transactions since
//! the start of the day `days` days ago are loaded once, then bucketed into
//! the daily series or summed per type.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Query, State, rejection::QueryRejection},
};
use rusqlite::Connection;
use serde::Deserialize;
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    calendar::{DayAlignment, DayKey},
    dashboard::{
        aggregation::{DailyBucket, TypeTotals, build_daily_series, sum_by_type},
        charts::DashboardCharts,
        transaction::get_transactions_in_window,
    },
    transaction::Transaction,
};

/// The window used when a request does not ask for one.
pub const DEFAULT_WINDOW_DAYS: u32 = 30;
/// The longest window a request may ask for.
pub const MAX_WINDOW_DAYS: u32 = 366;

/// The state needed for the dashboard endpoints.
///
/// Contains the database connection and timezone information required
/// by dashboard handlers.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The query parameters shared by the dashboard endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct WindowQuery {
    /// The number of days in the window, ending today.
    pub days: Option<u32>,
}

impl WindowQuery {
    /// The requested window clamped to `1..=MAX_WINDOW_DAYS`.
    fn window_days(&self) -> u32 {
        self.days
            .unwrap_or(DEFAULT_WINDOW_DAYS)
            .clamp(1, MAX_WINDOW_DAYS)
    }
}

/// The transactions of one trailing window and how to bucket them.
struct DashboardWindow {
    transactions: Vec<Transaction>,
    days: u32,
    today: DayKey,
    alignment: DayAlignment,
}

impl DashboardWindow {
    fn series(&self) -> Vec<DailyBucket> {
        build_daily_series(&self.transactions, self.days, self.today, self.alignment)
    }

    fn totals(&self) -> TypeTotals {
        sum_by_type(&self.transactions)
    }
}

fn parse_window_query(
    query: Result<Query<WindowQuery>, QueryRejection>,
) -> Result<WindowQuery, Error> {
    query
        .map(|Query(query)| query)
        .inspect_err(|rejection| tracing::debug!("invalid dashboard query: {rejection}"))
        .map_err(|rejection| Error::InvalidRequest(rejection.body_text()))
}

/// Load the transactions of the window ending today.
///
/// The window is pre-filtered from the start of the day `days` days ago, the
/// same way the dashboards request their chart data, up to the end of today.
fn load_window(state: &DashboardState, query: &WindowQuery) -> Result<DashboardWindow, Error> {
    // Resolved per request so that daylight saving changes are picked up.
    let alignment = DayAlignment::from_timezone(&state.local_timezone)
        .inspect_err(|error| tracing::error!("could not resolve timezone: {error}"))?;

    let now = OffsetDateTime::now_utc();
    let days = query.window_days();
    let today = alignment.today(now);
    let since = alignment.start_of_day(alignment.days_ago(now, days));
    // Future-dated rows have no bucket in the series, so leave them out of the totals too.
    let until = today.next().map(|tomorrow| alignment.start_of_day(tomorrow));

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transactions =
        get_transactions_in_window(since, until, &connection).inspect_err(|error| {
            tracing::error!("could not get transactions for the dashboard: {error}")
        })?;

    Ok(DashboardWindow {
        transactions,
        days,
        today,
        alignment,
    })
}

/// The gap-filled daily series for the requested window.
pub async fn get_dashboard_series(
    State(state): State<DashboardState>,
    query: Result<Query<WindowQuery>, QueryRejection>,
) -> Result<Json<Vec<DailyBucket>>, Error> {
    let query = parse_window_query(query)?;
    let window = load_window(&state, &query)?;

    Ok(Json(window.series()))
}

/// The per-type totals for the requested window.
pub async fn get_dashboard_totals(
    State(state): State<DashboardState>,
    query: Result<Query<WindowQuery>, QueryRejection>,
) -> Result<Json<TypeTotals>, Error> {
    let query = parse_window_query(query)?;
    let window = load_window(&state, &query)?;

    Ok(Json(window.totals()))
}

/// The ECharts options of both dashboard charts for the requested window.
pub async fn get_dashboard_charts(
    State(state): State<DashboardState>,
    query: Result<Query<WindowQuery>, QueryRejection>,
) -> Result<Json<DashboardCharts>, Error> {
    let query = parse_window_query(query)?;
    let window = load_window(&state, &query)?;

    DashboardCharts::new(&window.series(), &window.totals()).map(Json)
}
