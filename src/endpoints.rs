//! The API endpoint URIs.

/// The ledger: `GET` lists a filtered page of transactions, `POST` records one.
pub const TRANSACTIONS_API: &str = "/api/transactions";
/// The gap-filled daily series for a trailing window of `days`.
pub const DASHBOARD_SERIES_API: &str = "/api/dashboard/series";
/// The per-type totals for a trailing window of `days`.
pub const DASHBOARD_TOTALS_API: &str = "/api/dashboard/totals";
/// The ECharts options of the dashboard charts for a trailing window of `days`.
pub const DASHBOARD_CHARTS_API: &str = "/api/dashboard/charts";
