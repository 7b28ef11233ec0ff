// Aggregated bucket domain model
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::period::TimePeriod;

/// Dimension key used when the caller asks for no dimension breakdown.
pub const ALL_DIMENSIONS: &str = "*";
/// Dimension key collecting samples outside the requested dimension list.
pub const UNSPECIFIED_DIMENSION: &str = "unspecified";
/// Dimension key of the synthetic roll-up row.
pub const TOTAL_DIMENSION: &str = "Total";

/// Folded result for one (period x dimension) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedBucket {
    pub period: TimePeriod,
    pub dimension_key: String,
    pub sums: BTreeMap<String, f64>,
    pub count: u64,
}

impl AggregatedBucket {
    pub fn empty(period: TimePeriod, dimension_key: impl Into<String>) -> Self {
        Self {
            period,
            dimension_key: dimension_key.into(),
            sums: BTreeMap::new(),
            count: 0,
        }
    }

    /// Accumulated value of `field`, `0` when nothing was recorded for it.
    pub fn sum(&self, field: &str) -> f64 {
        self.sums.get(field).copied().unwrap_or(0.0)
    }

    /// Per-event mean of `field` inside this bucket, `0` for an empty bucket.
    pub fn mean(&self, field: &str) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.sum(field) / self.count as f64
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}
