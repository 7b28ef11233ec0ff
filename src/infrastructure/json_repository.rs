// JSON file repository implementation
use crate::application::sample_repository::{SampleQuery, SampleRepository};
use crate::domain::sample::MetricSample;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// `{ "datasets": { "<name>": [MetricSample, ...] } }`
#[derive(Debug, Default, Deserialize)]
struct SampleFile {
    #[serde(default)]
    datasets: BTreeMap<String, Vec<MetricSample>>,
}

/// Serves samples loaded once from a JSON file.
#[derive(Debug, Clone, Default)]
pub struct JsonSampleRepository {
    datasets: BTreeMap<String, Vec<MetricSample>>,
}

impl JsonSampleRepository {
    pub async fn load(path: &Path) -> Result<Self> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read samples from {}", path.display()))?;
        let repository = Self::from_json(&raw)
            .with_context(|| format!("Failed to parse samples in {}", path.display()))?;

        tracing::info!(
            "Loaded {} datasets ({} samples) from {}",
            repository.datasets.len(),
            repository.datasets.values().map(Vec::len).sum::<usize>(),
            path.display()
        );
        Ok(repository)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let file: SampleFile = serde_json::from_str(raw)?;
        Ok(Self {
            datasets: file.datasets,
        })
    }
}

#[async_trait]
impl SampleRepository for JsonSampleRepository {
    async fn list_datasets(&self) -> Result<Vec<String>> {
        Ok(self.datasets.keys().cloned().collect())
    }

    async fn fetch_samples(
        &self,
        dataset: &str,
        query: &SampleQuery,
    ) -> Result<Option<Vec<MetricSample>>> {
        let Some(samples) = self.datasets.get(dataset) else {
            tracing::debug!("Dataset {} not found", dataset);
            return Ok(None);
        };

        let selected: Vec<MetricSample> = samples
            .iter()
            .filter(|s| s.timestamp >= query.start && s.timestamp <= query.end)
            .cloned()
            .collect();

        tracing::debug!(
            "Selected {} of {} samples from {} for {}..{}",
            selected.len(),
            samples.len(),
            dataset,
            query.start,
            query.end
        );
        Ok(Some(selected))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const FIXTURE: &str = r#"{
        "datasets": {
            "calls": [
                {"timestamp": "2024-05-31", "dimension": "ana"},
                {"timestamp": "2024-06-10", "dimension": "ana", "measures": {"talk_secs": 40}},
                {"timestamp": "2024-06-20", "dimension": "ben"}
            ],
            "tasks": []
        }
    }"#;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_list_datasets() {
        let repo = JsonSampleRepository::from_json(FIXTURE).unwrap();
        assert_eq!(repo.list_datasets().await.unwrap(), vec!["calls", "tasks"]);
    }

    #[tokio::test]
    async fn test_fetch_filters_by_range() {
        let repo = JsonSampleRepository::from_json(FIXTURE).unwrap();
        let query = SampleQuery {
            start: date(2024, 6, 1),
            end: date(2024, 6, 30),
        };

        let samples = repo.fetch_samples("calls", &query).await.unwrap().unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].measures.get("talk_secs"), Some(&40.0));

        assert!(repo.fetch_samples("missing", &query).await.unwrap().is_none());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        assert!(JsonSampleRepository::from_json(r#"{"datasets": {"calls": [{"dimension": "ana"}]}}"#).is_err());
    }

    #[tokio::test]
    async fn test_load_reports_missing_file() {
        let err = JsonSampleRepository::load(Path::new("data/does-not-exist.json"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Failed to read samples"));
    }
}
