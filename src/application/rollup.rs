// Roll-up aggregator - Folds per-dimension buckets into a synthetic "Total" row
use std::collections::{BTreeMap, BTreeSet};

use crate::application::derived_metrics::{roll_up_average_of_ratios, roll_up_sum};
use crate::domain::bucket::{AggregatedBucket, TOTAL_DIMENSION};
use crate::domain::metric::RollUpKind;
use crate::domain::period::TimePeriod;

/// Per-measure combination policy for the "Total" row.
///
/// Measures without an entry are summed; only ratio-type values the caller
/// derived itself need `AverageOfRatios`.
#[derive(Debug, Clone, Default)]
pub struct RollUpPlan {
    policies: BTreeMap<String, RollUpKind>,
}

impl RollUpPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, measure: impl Into<String>, kind: RollUpKind) -> Self {
        self.policies.insert(measure.into(), kind);
        self
    }

    pub fn kind_of(&self, measure: &str) -> RollUpKind {
        self.policies
            .get(measure)
            .copied()
            .unwrap_or(RollUpKind::Sum)
    }
}

/// One "Total" bucket per period, in period order.
///
/// Periods with no dimension buckets still get a Total with zero sums.
/// Average-of-ratios measures only average over dimensions that recorded
/// events in that period and carry a value for the measure.
pub fn roll_up(
    buckets: &[AggregatedBucket],
    periods: &[TimePeriod],
    plan: &RollUpPlan,
) -> Vec<AggregatedBucket> {
    periods
        .iter()
        .map(|period| {
            let members: Vec<&AggregatedBucket> = buckets
                .iter()
                .filter(|b| b.period.start == period.start && b.period.end == period.end)
                .collect();
            roll_up_period(period, &members, plan)
        })
        .collect()
}

fn roll_up_period(
    period: &TimePeriod,
    members: &[&AggregatedBucket],
    plan: &RollUpPlan,
) -> AggregatedBucket {
    let mut total = AggregatedBucket::empty(period.clone(), TOTAL_DIMENSION);
    total.count = members.iter().map(|b| b.count).sum();

    let measures: BTreeSet<&String> = members.iter().flat_map(|b| b.sums.keys()).collect();
    for measure in measures {
        let value = match plan.kind_of(measure) {
            RollUpKind::Sum => {
                let values: Vec<f64> = members.iter().map(|b| b.sum(measure)).collect();
                roll_up_sum(&values)
            }
            RollUpKind::AverageOfRatios => {
                let ratios: Vec<f64> = members
                    .iter()
                    .filter(|b| b.count > 0 && b.sums.contains_key(measure.as_str()))
                    .map(|b| b.sum(measure))
                    .collect();
                roll_up_average_of_ratios(&ratios)
            }
        };
        total.sums.insert(measure.clone(), value);
    }

    total
}
