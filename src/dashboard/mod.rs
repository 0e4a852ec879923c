//! Dashboard module
//!
//! Derives the dashboard views from the transaction ledger: the gap-filled
//! daily series, the per-type totals and the chart options built from them.

mod aggregation;
mod charts;
mod handlers;
mod transaction;

pub use aggregation::{
    DailyBucket, TypeTotals, build_daily_series, build_daily_series_now, sum_by_type,
};
pub use charts::{DashboardCharts, type_pie_chart, volume_chart};
pub use handlers::{get_dashboard_charts, get_dashboard_series, get_dashboard_totals};
