//! Chart generation for the dashboard.
//!
//! This module creates ECharts options for the two dashboard charts:
//! - **Transaction volume**: daily amounts per type, stacked as areas
//! - **By type**: a donut chart of the per-type totals
//!
//! The options are returned as JSON for an ECharts instance on the client.

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{
        AreaStyle, AxisPointer, AxisPointerType, AxisType, Emphasis, EmphasisFocus, Tooltip,
        Trigger,
    },
    series::{Line, Pie},
};
use serde::Serialize;

use crate::{
    Error,
    dashboard::aggregation::{DailyBucket, TypeTotals},
    format::format_currency,
};

/// Series colours, in the order deposit, withdraw, send.
const TYPE_COLORS: [&str; 3] = ["#6366F1", "#22C55E", "#F59E0B"];

/// The ECharts options for both dashboard charts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardCharts {
    /// Options for the stacked area chart of daily volume.
    pub volume: serde_json::Value,
    /// Options for the donut chart of per-type totals.
    pub by_type: serde_json::Value,
}

impl DashboardCharts {
    /// Build both charts for one window.
    ///
    /// # Errors
    /// Returns [Error::JSONSerializationError] if a chart cannot be turned
    /// into JSON.
    pub fn new(series: &[DailyBucket], totals: &TypeTotals) -> Result<Self, Error> {
        Ok(Self {
            volume: chart_to_json(&volume_chart(series))?,
            by_type: chart_to_json(&type_pie_chart(totals))?,
        })
    }
}

fn chart_to_json(chart: &Chart) -> Result<serde_json::Value, Error> {
    serde_json::to_value(chart)
        .inspect_err(|error| tracing::error!("could not serialize chart options: {error}"))
        .map_err(|error| Error::JSONSerializationError(error.to_string()))
}

fn type_colors() -> Vec<charming::element::Color> {
    TYPE_COLORS.iter().map(|&color| color.into()).collect()
}

/// A stacked area chart with one series per transaction type and one point
/// per day of `series`.
pub fn volume_chart(series: &[DailyBucket]) -> Chart {
    let labels: Vec<String> = series.iter().map(|bucket| bucket.date.to_string()).collect();
    let window_total: f64 = series.iter().map(|bucket| bucket.total).sum();

    let lines: [(&str, Vec<f64>); 3] = [
        ("Deposit", series.iter().map(|bucket| bucket.deposit).collect()),
        ("Withdraw", series.iter().map(|bucket| bucket.withdraw).collect()),
        ("Send", series.iter().map(|bucket| bucket.send).collect()),
    ];

    let mut chart = Chart::new()
        .title(
            Title::new()
                .text("Transaction volume")
                .subtext(format!(
                    "Last {} days, {} in total",
                    series.len(),
                    format_currency(window_total)
                )),
        )
        .color(type_colors())
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Axis)
                .axis_pointer(AxisPointer::new().type_(AxisPointerType::Cross)),
        )
        .legend(Legend::new().right("4%"))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(
            Axis::new()
                .type_(AxisType::Category)
                .boundary_gap(false)
                .data(labels),
        )
        .y_axis(Axis::new().type_(AxisType::Value));

    for (name, data) in lines {
        chart = chart.series(
            Line::new()
                .name(name)
                .stack("Volume")
                .area_style(AreaStyle::new())
                .emphasis(Emphasis::new().focus(EmphasisFocus::Series))
                .data(data),
        );
    }

    chart
}

/// A donut chart of `totals`.
pub fn type_pie_chart(totals: &TypeTotals) -> Chart {
    let data: Vec<(f64, &str)> = totals
        .slices()
        .into_iter()
        .map(|(name, value)| (value, name))
        .collect();

    Chart::new()
        .title(
            Title::new()
                .text("By type")
                .subtext(format!("{} in total", format_currency(totals.sum()))),
        )
        .color(type_colors())
        .tooltip(Tooltip::new().trigger(Trigger::Item))
        .legend(Legend::new().bottom("0%"))
        .series(
            Pie::new()
                .name("By type")
                .radius(vec!["40%", "70%"])
                .data(data),
        )
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{
        calendar::{DayAlignment, DayKey},
        dashboard::aggregation::{TypeTotals, build_daily_series},
    };

    use super::{DashboardCharts, type_pie_chart, volume_chart};

    fn json(chart: charming::Chart) -> serde_json::Value {
        serde_json::to_value(&chart).unwrap()
    }

    #[test]
    fn volume_chart_has_stacked_series_per_type() {
        let series =
            build_daily_series(&[], 7, DayKey::new(date!(2025 - 03 - 15)), DayAlignment::Utc);

        let options = json(volume_chart(&series));

        let chart_series = options["series"].as_array().unwrap();
        assert_eq!(chart_series.len(), 3);
        let names: Vec<&str> = chart_series
            .iter()
            .map(|series| series["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, ["Deposit", "Withdraw", "Send"]);
        assert!(chart_series
            .iter()
            .all(|series| series["stack"] == "Volume" && series["data"].as_array().unwrap().len() == 7));
    }

    #[test]
    fn volume_chart_labels_are_day_keys() {
        let series =
            build_daily_series(&[], 2, DayKey::new(date!(2025 - 03 - 15)), DayAlignment::Utc);

        let options = json(volume_chart(&series));

        assert_eq!(
            options["xAxis"][0]["data"],
            serde_json::json!(["2025-03-14", "2025-03-15"])
        );
    }

    #[test]
    fn charts_use_type_colours() {
        let options = json(type_pie_chart(&TypeTotals::default()));

        assert_eq!(
            options["color"],
            serde_json::json!(["#6366F1", "#22C55E", "#F59E0B"])
        );
    }

    #[test]
    fn pie_chart_is_a_donut_of_slices() {
        let totals = TypeTotals {
            send: 1.0,
            withdraw: 2.0,
            deposit: 3.0,
        };

        let options = json(type_pie_chart(&totals));

        let pie = &options["series"][0];
        assert_eq!(pie["radius"], serde_json::json!(["40%", "70%"]));
        assert_eq!(pie["data"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn empty_totals_subtitle_shows_zero() {
        let options = json(type_pie_chart(&TypeTotals::default()));

        assert_eq!(options["title"][0]["subtext"], "$0.00 in total");
    }

    #[test]
    fn dashboard_charts_serialize_both_charts() {
        let series =
            build_daily_series(&[], 3, DayKey::new(date!(2025 - 03 - 15)), DayAlignment::Utc);

        let charts = DashboardCharts::new(&series, &TypeTotals::default()).unwrap();

        assert!(charts.volume.get("series").is_some());
        assert!(charts.by_type.get("series").is_some());
    }
}
