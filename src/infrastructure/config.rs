use crate::application::clock::Clock;
use crate::application::heatmap::{HeatmapGradient, Rgb};
use crate::infrastructure::clock::{FixedClock, SystemClock};
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub data: DataSettings,
    #[serde(default)]
    pub heatmap: HeatmapSettings,
    #[serde(default)]
    pub clock: ClockSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub bind_addr: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DataSettings {
    pub samples_path: PathBuf,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            samples_path: PathBuf::from("data/samples.json"),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct HeatmapSettings {
    pub alpha: f64,
    pub low: [u8; 3],
    pub mid: [u8; 3],
    pub high: [u8; 3],
}

impl Default for HeatmapSettings {
    fn default() -> Self {
        Self {
            alpha: 0.35,
            low: [255, 0, 0],
            mid: [255, 255, 0],
            high: [0, 255, 0],
        }
    }
}

impl HeatmapSettings {
    pub fn gradient(&self) -> HeatmapGradient {
        let rgb = |[r, g, b]: [u8; 3]| Rgb(r, g, b);
        HeatmapGradient {
            low: rgb(self.low),
            mid: rgb(self.mid),
            high: rgb(self.high),
            alpha: self.alpha.clamp(0.0, 1.0),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ClockSettings {
    /// Pin "today" for reproducible run-rate projections.
    #[serde(default)]
    pub fixed_today: Option<NaiveDate>,
}

impl ClockSettings {
    pub fn clock(&self) -> Arc<dyn Clock> {
        match self.fixed_today {
            Some(today) => Arc::new(FixedClock::new(today)),
            None => Arc::new(SystemClock),
        }
    }
}

/// Load `config/app.toml` (optional) overlaid with `KPI__*` environment
/// variables, e.g. `KPI__SERVER__BIND_ADDR`.
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    load_app_config_from("config/app")
}

pub fn load_app_config_from(path: &str) -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name(path).required(false))
        .add_source(config::Environment::with_prefix("KPI").separator("__"))
        .build()?;

    Ok(settings.try_deserialize()?)
}
