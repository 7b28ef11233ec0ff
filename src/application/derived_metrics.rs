// Derived metric calculator - Ratios, averages and on-time rates over buckets
//
// Every function here is total: empty inputs and zero denominators give 0.
use chrono::Days;

use crate::domain::bucket::AggregatedBucket;
use crate::domain::metric::ConversionReference;
use crate::domain::sample::MetricSample;

/// Days of grace after the due date that still count as on time.
pub const ON_TIME_GRACE_DAYS: u64 = 1;

/// Mean of `field` across the buckets that recorded at least one event.
pub fn average_of(buckets: &[AggregatedBucket], field: &str) -> f64 {
    let values: Vec<f64> = buckets
        .iter()
        .filter(|b| b.count > 0)
        .map(|b| b.sum(field))
        .collect();
    mean(&values)
}

/// Fraction (0..=1) of deadline-carrying samples created no later than one
/// day after their due date. Samples without both dates are ignored.
pub fn on_time_ratio<'a>(samples: impl IntoIterator<Item = &'a MetricSample>) -> f64 {
    let mut with_deadline = 0u64;
    let mut on_time = 0u64;

    for sample in samples {
        let (Some(created_at), Some(due_date)) = (sample.created_at, sample.due_date) else {
            continue;
        };
        with_deadline += 1;
        let cutoff = due_date
            .checked_add_days(Days::new(ON_TIME_GRACE_DAYS))
            .unwrap_or(due_date);
        if created_at <= cutoff {
            on_time += 1;
        }
    }

    if with_deadline == 0 {
        return 0.0;
    }
    on_time as f64 / with_deadline as f64
}

/// `count_at_stage / count_at_reference * 100`, or 0 without a reference.
pub fn conversion_rate(count_at_stage: f64, count_at_reference: f64) -> f64 {
    if count_at_reference == 0.0 {
        return 0.0;
    }
    count_at_stage / count_at_reference * 100.0
}

/// Conversion percentage for every funnel stage.
///
/// The first stage is its own reference in both modes.
pub fn funnel_conversion_series(stage_counts: &[f64], reference: ConversionReference) -> Vec<f64> {
    stage_counts
        .iter()
        .enumerate()
        .map(|(idx, &count)| {
            let reference_count = match reference {
                ConversionReference::PhaseToPhase => stage_counts[idx.saturating_sub(1)],
                ConversionReference::FunnelWide => stage_counts[0],
            };
            conversion_rate(count, reference_count)
        })
        .collect()
}

/// Total for a percentage-type metric: the plain mean of each dimension's
/// own ratio, not a traffic-weighted blend.
pub fn roll_up_average_of_ratios(per_dimension_ratios: &[f64]) -> f64 {
    mean(per_dimension_ratios)
}

/// Total for count- and duration-type metrics.
pub fn roll_up_sum(values: &[f64]) -> f64 {
    values.iter().sum()
}

/// Percentage over pooled numerators and denominators.
pub fn ratio_of_sums(numerators: &[f64], denominators: &[f64]) -> f64 {
    conversion_rate(roll_up_sum(numerators), roll_up_sum(denominators))
}

/// Percentage change against the previous period; 0 when there is nothing
/// to compare against.
pub fn period_over_period_change(current: f64, previous: Option<f64>) -> f64 {
    match previous {
        Some(previous) if previous != 0.0 => (current - previous) / previous * 100.0,
        _ => 0.0,
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}
