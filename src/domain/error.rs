// Engine error taxonomy - caller contract violations only
use chrono::NaiveDate;
use thiserror::Error;

/// Errors raised by the aggregation engine.
///
/// Each variant is a caller bug, not a data condition. Empty periods, zero
/// denominators and missing comparison periods resolve to `0` or `None`
/// instead of surfacing here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("invalid range: start {start} is after end {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("unsupported granularity: {0:?}")]
    UnsupportedGranularity(String),

    #[error("heat-map normalizer called with an empty series")]
    EmptySeries,
}
