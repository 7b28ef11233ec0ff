// Raw metric sample domain model
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One raw event (a call, a scored task, a conversion).
///
/// The implicit event count is not stored in `measures`; every sample
/// contributes exactly one to its bucket's `count`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSample {
    pub timestamp: NaiveDate,
    #[serde(default)]
    pub dimension: Option<String>,
    #[serde(default)]
    pub measures: BTreeMap<String, f64>,
    #[serde(default)]
    pub created_at: Option<NaiveDate>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
}

impl MetricSample {
    pub fn new(timestamp: NaiveDate) -> Self {
        Self {
            timestamp,
            dimension: None,
            measures: BTreeMap::new(),
            created_at: None,
            due_date: None,
        }
    }

    pub fn with_dimension(mut self, dimension: impl Into<String>) -> Self {
        self.dimension = Some(dimension.into());
        self
    }

    pub fn with_measure(mut self, name: impl Into<String>, value: f64) -> Self {
        self.measures.insert(name.into(), value);
        self
    }

    pub fn with_deadline(mut self, created_at: NaiveDate, due_date: NaiveDate) -> Self {
        self.created_at = Some(created_at);
        self.due_date = Some(due_date);
        self
    }
}
