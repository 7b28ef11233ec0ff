// Record bucketizer - Assigns samples to (period x dimension) slots and folds them
use crate::domain::bucket::{AggregatedBucket, ALL_DIMENSIONS, UNSPECIFIED_DIMENSION};
use crate::domain::period::TimePeriod;
use crate::domain::sample::MetricSample;

/// The samples that fell into one (period x dimension) slot.
#[derive(Debug, Clone)]
pub struct SampleGroup<'a> {
    pub period: &'a TimePeriod,
    pub dimension_key: String,
    pub samples: Vec<&'a MetricSample>,
}

impl SampleGroup<'_> {
    /// Fold the group into an `AggregatedBucket`: one sum per named measure
    /// plus the event count.
    pub fn fold(&self) -> AggregatedBucket {
        let mut bucket = AggregatedBucket::empty(self.period.clone(), self.dimension_key.clone());
        for sample in &self.samples {
            bucket.count += 1;
            for (name, value) in &sample.measures {
                *bucket.sums.entry(name.clone()).or_insert(0.0) += value;
            }
        }
        bucket
    }
}

/// Group samples by period and dimension, keeping empty slots.
///
/// Groups are laid out period-major: every period gets one group per
/// dimension key, in the order given. Without `dimension_keys` every sample
/// goes to the single `"*"` dimension. With them, samples whose dimension is
/// missing or not listed are kept in an extra `"unspecified"` dimension, which
/// is only added when at least one in-range sample needs it. Repeated keys are
/// collapsed, and a listed `"unspecified"` key is reused as that slot.
///
/// `periods` must be ascending and non-overlapping, as produced by
/// `generate_periods`. Samples outside every period are skipped.
pub fn group_samples<'a>(
    samples: &'a [MetricSample],
    periods: &'a [TimePeriod],
    dimension_keys: Option<&[String]>,
) -> Vec<SampleGroup<'a>> {
    let mut keys: Vec<String> = Vec::new();
    for key in dimension_keys.unwrap_or_default() {
        if !keys.contains(key) {
            keys.push(key.clone());
        }
    }
    if keys.is_empty() {
        keys.push(ALL_DIMENSIONS.to_string());
    }
    let breakdown = keys[0] != ALL_DIMENSIONS || keys.len() > 1;

    // (period index, dimension index) for each sample that lands in a period
    let mut placements = Vec::with_capacity(samples.len());
    let mut unspecified_slot = keys.iter().position(|k| k == UNSPECIFIED_DIMENSION);
    let mut unlisted = 0usize;
    let mut outside = 0usize;

    for sample in samples {
        let Some(period_idx) = find_period(periods, sample) else {
            outside += 1;
            continue;
        };

        let dim_idx = if breakdown {
            let listed = sample
                .dimension
                .as_deref()
                .and_then(|d| keys.iter().position(|k| k == d));
            match listed {
                Some(idx) => idx,
                None => {
                    unlisted += 1;
                    *unspecified_slot.get_or_insert_with(|| {
                        keys.push(UNSPECIFIED_DIMENSION.to_string());
                        keys.len() - 1
                    })
                }
            }
        } else {
            0
        };

        placements.push((period_idx, dim_idx, sample));
    }

    if outside > 0 {
        tracing::debug!("Skipped {} samples outside every period", outside);
    }
    if unlisted > 0 {
        tracing::debug!("{} samples carry a dimension outside the requested list", unlisted);
    }

    let mut groups: Vec<SampleGroup<'a>> = periods
        .iter()
        .flat_map(|period| {
            keys.iter().map(move |key| SampleGroup {
                period,
                dimension_key: key.clone(),
                samples: Vec::new(),
            })
        })
        .collect();

    let width = keys.len();
    for (period_idx, dim_idx, sample) in placements {
        groups[period_idx * width + dim_idx].samples.push(sample);
    }

    groups
}

/// Aggregate samples into one bucket per (period x dimension), including
/// zero-valued buckets.
pub fn bucketize(
    samples: &[MetricSample],
    periods: &[TimePeriod],
    dimension_keys: Option<&[String]>,
) -> Vec<AggregatedBucket> {
    group_samples(samples, periods, dimension_keys)
        .iter()
        .map(SampleGroup::fold)
        .collect()
}

fn find_period(periods: &[TimePeriod], sample: &MetricSample) -> Option<usize> {
    let idx = periods.partition_point(|p| p.end < sample.timestamp);
    periods
        .get(idx)
        .filter(|p| p.contains(sample.timestamp))
        .map(|_| idx)
}
