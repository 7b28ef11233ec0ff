// Derived metric and presentation value types
use serde::{Deserialize, Serialize};

/// How a measure is folded into the synthetic "Total" row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RollUpKind {
    /// Counts and durations.
    Sum,
    /// Percentage-type metrics: mean of the dimensions' own ratios.
    AverageOfRatios,
}

/// Reference stage for funnel conversion rates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionReference {
    /// Each stage relative to the one immediately before it.
    PhaseToPhase,
    /// Each stage relative to the first stage (leads).
    FunnelWide,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeatmapDirection {
    #[default]
    HigherIsBetter,
    LowerIsBetter,
}

/// Background color for one value of a heat-mapped series.
/// An empty `color` means no highlight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorAssignment {
    pub value: f64,
    pub color: String,
}

/// Actual-so-far and the additional amount expected by period end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRateProjection {
    pub actual: f64,
    pub projected_extension: f64,
}
