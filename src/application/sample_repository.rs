// Repository trait for raw metric samples
use crate::domain::sample::MetricSample;
use async_trait::async_trait;
use chrono::NaiveDate;

/// Date range the caller is about to aggregate. Repositories may return a
/// superset; the engine only keeps what falls inside its periods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleQuery {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[async_trait]
pub trait SampleRepository: Send + Sync {
    /// List the dataset names samples can be fetched for
    async fn list_datasets(&self) -> anyhow::Result<Vec<String>>;

    /// Fetch the samples of one dataset for a date range.
    /// Returns `Ok(None)` when the dataset does not exist.
    async fn fetch_samples(
        &self,
        dataset: &str,
        query: &SampleQuery,
    ) -> anyhow::Result<Option<Vec<MetricSample>>>;
}
