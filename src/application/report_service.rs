// Report service - Use case composing the engine into a performance report
use crate::application::bucketizer::group_samples;
use crate::application::clock::Clock;
use crate::application::derived_metrics::on_time_ratio;
use crate::application::heatmap::{normalize, HeatmapGradient};
use crate::application::period_generator::generate_periods;
use crate::application::rollup::{roll_up, RollUpPlan};
use crate::application::run_rate::project_period;
use crate::application::sample_repository::{SampleQuery, SampleRepository};
use crate::domain::bucket::{AggregatedBucket, TOTAL_DIMENSION};
use crate::domain::error::EngineError;
use crate::domain::metric::{ColorAssignment, HeatmapDirection, RollUpKind, RunRateProjection};
use crate::domain::period::{Granularity, TimePeriod};
use chrono::NaiveDate;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

/// Pseudo-measure addressing a bucket's event count.
pub const COUNT_MEASURE: &str = "count";
/// Derived per-bucket on-time percentage.
pub const ON_TIME_MEASURE: &str = "on_time_pct";

#[derive(Debug, Clone, Deserialize)]
pub struct MeasureSpec {
    pub name: String,
    pub roll_up: RollUpKind,
    #[serde(default)]
    pub heatmap: Option<HeatmapDirection>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportRequest {
    pub dataset: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub granularity: String,
    #[serde(default)]
    pub dimensions: Option<Vec<String>>,
    #[serde(default)]
    pub measures: Vec<MeasureSpec>,
    #[serde(default)]
    pub on_time: bool,
    #[serde(default)]
    pub run_rate_measure: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DimensionSeries {
    pub dimension: String,
    pub buckets: Vec<AggregatedBucket>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub heatmap: BTreeMap<String, Vec<ColorAssignment>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PerformanceReport {
    pub dataset: String,
    pub granularity: Granularity,
    pub periods: Vec<TimePeriod>,
    pub rows: Vec<DimensionSeries>,
    pub total: DimensionSeries,
    pub run_rate: Option<RunRateProjection>,
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("unknown dataset: {0}")]
    UnknownDataset(String),

    #[error("sample repository failed: {0:#}")]
    Repository(anyhow::Error),
}

#[derive(Clone)]
pub struct ReportService {
    repository: Arc<dyn SampleRepository>,
    clock: Arc<dyn Clock>,
    gradient: HeatmapGradient,
}

impl ReportService {
    pub fn new(
        repository: Arc<dyn SampleRepository>,
        clock: Arc<dyn Clock>,
        gradient: HeatmapGradient,
    ) -> Self {
        Self {
            repository,
            clock,
            gradient,
        }
    }

    pub async fn list_datasets(&self) -> anyhow::Result<Vec<String>> {
        self.repository.list_datasets().await
    }

    pub async fn build_report(&self, request: &ReportRequest) -> Result<PerformanceReport, ReportError> {
        // Contract violations surface before any data is fetched
        let granularity: Granularity = request.granularity.parse()?;
        let periods = generate_periods(request.start, request.end, granularity)?;

        let query = SampleQuery {
            start: request.start,
            end: request.end,
        };
        let samples = self
            .repository
            .fetch_samples(&request.dataset, &query)
            .await
            .map_err(ReportError::Repository)?
            .ok_or_else(|| ReportError::UnknownDataset(request.dataset.clone()))?;

        tracing::debug!(
            "Aggregating {} samples of {} into {} periods",
            samples.len(),
            request.dataset,
            periods.len()
        );

        let groups = group_samples(&samples, &periods, request.dimensions.as_deref());
        let buckets: Vec<AggregatedBucket> = groups
            .iter()
            .map(|group| {
                let mut bucket = group.fold();
                if request.on_time && group.samples.iter().any(|s| s.due_date.is_some()) {
                    let ratio = on_time_ratio(group.samples.iter().copied());
                    bucket.sums.insert(ON_TIME_MEASURE.to_string(), ratio * 100.0);
                }
                bucket
            })
            .collect();

        let plan = self.roll_up_plan(request);
        let totals = roll_up(&buckets, &periods, &plan);

        let mut rows = Vec::new();
        for (dimension, series) in split_by_dimension(buckets) {
            rows.push(self.series(dimension, series, &request.measures, &plan)?);
        }
        let total = self.series(TOTAL_DIMENSION.to_string(), totals, &request.measures, &plan)?;

        let run_rate = request.run_rate_measure.as_deref().and_then(|measure| {
            // a ratio so far says nothing about where the period will end
            if plan.kind_of(measure) == RollUpKind::AverageOfRatios {
                tracing::debug!("No run-rate projection for ratio measure {}", measure);
                return None;
            }
            let today = self.clock.today();
            total.buckets.iter().find_map(|bucket| {
                project_period(&bucket.period, granularity, measure_value(bucket, measure), today)
            })
        });

        Ok(PerformanceReport {
            dataset: request.dataset.clone(),
            granularity,
            periods,
            rows,
            total,
            run_rate,
        })
    }

    /// Build independent reports concurrently; one failure does not affect
    /// the others.
    pub async fn build_reports(
        &self,
        requests: &[ReportRequest],
    ) -> Vec<Result<PerformanceReport, ReportError>> {
        join_all(requests.iter().map(|request| self.build_report(request))).await
    }

    fn roll_up_plan(&self, request: &ReportRequest) -> RollUpPlan {
        let mut plan = request
            .measures
            .iter()
            .fold(RollUpPlan::new(), |plan, spec| plan.with(spec.name.clone(), spec.roll_up));
        if request.on_time {
            plan = plan.with(ON_TIME_MEASURE, RollUpKind::AverageOfRatios);
        }
        plan
    }

    fn series(
        &self,
        dimension: String,
        buckets: Vec<AggregatedBucket>,
        measures: &[MeasureSpec],
        plan: &RollUpPlan,
    ) -> Result<DimensionSeries, EngineError> {
        let mut heatmap = BTreeMap::new();
        for spec in measures {
            let Some(direction) = spec.heatmap else {
                continue;
            };
            let ratio = plan.kind_of(&spec.name) == RollUpKind::AverageOfRatios;
            let values: Vec<f64> = buckets
                .iter()
                .map(|b| heatmap_value(b, &spec.name, ratio))
                .collect();
            heatmap.insert(spec.name.clone(), normalize(&values, &self.gradient, direction)?);
        }

        Ok(DimensionSeries {
            dimension,
            buckets,
            heatmap,
        })
    }
}

/// Value of `measure` in a bucket; `count` addresses the event count.
pub fn measure_value(bucket: &AggregatedBucket, measure: &str) -> f64 {
    if measure == COUNT_MEASURE {
        bucket.count as f64
    } else {
        bucket.sum(measure)
    }
}

/// Heat-map input for a bucket. A ratio the bucket never recorded is left
/// blank rather than shown as 0%.
fn heatmap_value(bucket: &AggregatedBucket, measure: &str, ratio: bool) -> f64 {
    if ratio && !bucket.sums.contains_key(measure) {
        f64::NAN
    } else {
        measure_value(bucket, measure)
    }
}

/// Regroup period-major buckets into one series per dimension, keeping the
/// dimension order of the first period.
fn split_by_dimension(buckets: Vec<AggregatedBucket>) -> Vec<(String, Vec<AggregatedBucket>)> {
    let mut series: Vec<(String, Vec<AggregatedBucket>)> = Vec::new();
    for bucket in buckets {
        match series.iter_mut().find(|(key, _)| *key == bucket.dimension_key) {
            Some((_, list)) => list.push(bucket),
            None => series.push((bucket.dimension_key.clone(), vec![bucket])),
        }
    }
    series
}
