// Display toggles applied to a finished report
//
// The engine always computes the full bucket set; these only decide which
// periods are shown.
use crate::application::report_service::PerformanceReport;
use crate::domain::period::{Granularity, TimePeriod};
use chrono::{Datelike, Weekday};
use serde::Deserialize;

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ViewOptions {
    #[serde(default)]
    pub hide_weekends: bool,
    #[serde(default)]
    pub hide_empty: bool,
}

/// Drop hidden periods from every row, the Total row and their heat-map
/// colors, keeping all series aligned.
pub fn apply_view_options(mut report: PerformanceReport, options: ViewOptions) -> PerformanceReport {
    let keep: Vec<bool> = report
        .periods
        .iter()
        .enumerate()
        .map(|(idx, period)| {
            let weekend = options.hide_weekends
                && report.granularity == Granularity::Day
                && is_weekend(period);
            let empty = options.hide_empty
                && report.total.buckets.get(idx).is_some_and(|b| b.count == 0);
            !(weekend || empty)
        })
        .collect();

    if keep.iter().all(|k| *k) {
        return report;
    }

    report.periods = retain_by_mask(report.periods, &keep);
    for series in report.rows.iter_mut().chain(std::iter::once(&mut report.total)) {
        series.buckets = retain_by_mask(std::mem::take(&mut series.buckets), &keep);
        for colors in series.heatmap.values_mut() {
            *colors = retain_by_mask(std::mem::take(colors), &keep);
        }
    }
    report
}

fn is_weekend(period: &TimePeriod) -> bool {
    matches!(period.start.weekday(), Weekday::Sat | Weekday::Sun)
}

fn retain_by_mask<T>(items: Vec<T>, keep: &[bool]) -> Vec<T> {
    items
        .into_iter()
        .zip(keep)
        .filter_map(|(item, &keep)| keep.then_some(item))
        .collect()
}
