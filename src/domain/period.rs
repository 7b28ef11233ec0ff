// Calendar period domain model
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::EngineError;

/// Size of the calendar unit periods are cut into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Day,
    Week,
    Fortnight,
    Month,
}

impl Granularity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Day => "day",
            Granularity::Week => "week",
            Granularity::Fortnight => "fortnight",
            Granularity::Month => "month",
        }
    }
}

impl FromStr for Granularity {
    type Err = EngineError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token.trim().to_ascii_lowercase().as_str() {
            "day" | "daily" => Ok(Granularity::Day),
            "week" | "weekly" => Ok(Granularity::Week),
            "fortnight" | "fortnightly" => Ok(Granularity::Fortnight),
            "month" | "monthly" => Ok(Granularity::Month),
            _ => Err(EngineError::UnsupportedGranularity(token.to_string())),
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A closed calendar interval `[start, end]` with a display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimePeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub label: String,
}

impl TimePeriod {
    pub fn new(start: NaiveDate, end: NaiveDate, label: String) -> Self {
        Self { start, end, label }
    }

    /// Both bounds inclusive.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_granularity_tokens() {
        assert_eq!("day".parse::<Granularity>(), Ok(Granularity::Day));
        assert_eq!("Weekly".parse::<Granularity>(), Ok(Granularity::Week));
        assert_eq!(" fortnight ".parse::<Granularity>(), Ok(Granularity::Fortnight));
        assert_eq!("MONTH".parse::<Granularity>(), Ok(Granularity::Month));
        assert_eq!(
            "quarter".parse::<Granularity>(),
            Err(EngineError::UnsupportedGranularity("quarter".to_string()))
        );
    }

    #[test]
    fn test_contains_is_inclusive() {
        let period = TimePeriod::new(date(2024, 6, 1), date(2024, 6, 15), "Jun 1-15".into());
        assert!(period.contains(date(2024, 6, 1)));
        assert!(period.contains(date(2024, 6, 15)));
        assert!(!period.contains(date(2024, 6, 16)));
        assert!(!period.contains(date(2024, 5, 31)));
        assert_eq!(period.num_days(), 15);
    }
}
