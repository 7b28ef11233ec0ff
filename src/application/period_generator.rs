// Calendar period generator - Tiles a date range into granularity-sized periods
use chrono::{Datelike, Days, Months, NaiveDate};

use crate::domain::error::EngineError;
use crate::domain::period::{Granularity, TimePeriod};

/// Split `[range_start, range_end]` into contiguous, ascending periods.
///
/// Each period runs from the day after the previous one ended up to the
/// natural end of its calendar unit, clipped to `range_end`. The first period
/// is clipped to `range_start` the same way, so the result always tiles the
/// range exactly and is never empty.
pub fn generate_periods(
    range_start: NaiveDate,
    range_end: NaiveDate,
    granularity: Granularity,
) -> Result<Vec<TimePeriod>, EngineError> {
    if range_start > range_end {
        return Err(EngineError::InvalidRange {
            start: range_start,
            end: range_end,
        });
    }

    let mut periods = Vec::new();
    let mut cursor = range_start;

    loop {
        let end = natural_unit_end(cursor, granularity).min(range_end);
        let label = period_label(cursor, end, granularity, periods.len() + 1);
        periods.push(TimePeriod::new(cursor, end, label));

        if end >= range_end {
            break;
        }
        match end.succ_opt() {
            Some(next) => cursor = next,
            None => break,
        }
    }

    tracing::debug!(
        "Generated {} {} periods for {}..{}",
        periods.len(),
        granularity,
        range_start,
        range_end
    );

    Ok(periods)
}

/// Parse the granularity token and generate periods in one step.
pub fn generate_periods_for(
    range_start: NaiveDate,
    range_end: NaiveDate,
    granularity: &str,
) -> Result<Vec<TimePeriod>, EngineError> {
    generate_periods(range_start, range_end, granularity.parse()?)
}

/// Last day of the calendar unit containing `date`, ignoring any range.
pub fn natural_unit_end(date: NaiveDate, granularity: Granularity) -> NaiveDate {
    match granularity {
        Granularity::Day => date,
        Granularity::Week => {
            // Weeks run Sunday..Saturday.
            let days_left = 6 - u64::from(date.weekday().num_days_from_sunday());
            date.checked_add_days(Days::new(days_left))
                .unwrap_or(NaiveDate::MAX)
        }
        Granularity::Fortnight => {
            if date.day() <= 15 {
                date.with_day(15).unwrap_or(date)
            } else {
                last_day_of_month(date)
            }
        }
        Granularity::Month => last_day_of_month(date),
    }
}

pub fn last_day_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1)
        .and_then(|first| first.checked_add_months(Months::new(1)))
        .and_then(|next_first| next_first.pred_opt())
        .unwrap_or(NaiveDate::MAX)
}

fn period_label(start: NaiveDate, end: NaiveDate, granularity: Granularity, index: usize) -> String {
    match granularity {
        Granularity::Day => start.format("%b %-d").to_string(),
        Granularity::Week => format!(
            "Week {} ({} - {})",
            index,
            start.format("%b %-d"),
            end.format("%b %-d")
        ),
        Granularity::Fortnight => format!("{} {}-{}", start.format("%b"), start.day(), end.day()),
        Granularity::Month => start.format("%b %Y").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn bounds(periods: &[TimePeriod]) -> Vec<(NaiveDate, NaiveDate)> {
        periods.iter().map(|p| (p.start, p.end)).collect()
    }

    #[test]
    fn test_invalid_range() {
        let result = generate_periods(date(2024, 6, 2), date(2024, 6, 1), Granularity::Day);
        assert_eq!(
            result,
            Err(EngineError::InvalidRange {
                start: date(2024, 6, 2),
                end: date(2024, 6, 1),
            })
        );
    }

    #[test]
    fn test_unknown_granularity_token() {
        let result = generate_periods_for(date(2024, 6, 1), date(2024, 6, 30), "hourly");
        assert_eq!(
            result,
            Err(EngineError::UnsupportedGranularity("hourly".to_string()))
        );
    }

    #[test]
    fn test_daily_periods() {
        let periods = generate_periods(date(2024, 2, 28), date(2024, 3, 1), Granularity::Day).unwrap();
        assert_eq!(
            bounds(&periods),
            vec![
                (date(2024, 2, 28), date(2024, 2, 28)),
                (date(2024, 2, 29), date(2024, 2, 29)),
                (date(2024, 3, 1), date(2024, 3, 1)),
            ]
        );
        assert_eq!(periods[1].label, "Feb 29");
    }

    #[test]
    fn test_weeks_start_on_sunday_and_clip_both_ends() {
        // 2024-06-05 is a Wednesday, 2024-06-20 a Thursday.
        let periods = generate_periods(date(2024, 6, 5), date(2024, 6, 20), Granularity::Week).unwrap();
        assert_eq!(
            bounds(&periods),
            vec![
                (date(2024, 6, 5), date(2024, 6, 8)),
                (date(2024, 6, 9), date(2024, 6, 15)),
                (date(2024, 6, 16), date(2024, 6, 20)),
            ]
        );
        assert_eq!(periods[0].label, "Week 1 (Jun 5 - Jun 8)");
        assert_eq!(periods[2].label, "Week 3 (Jun 16 - Jun 20)");
    }

    #[test]
    fn test_fortnights_split_on_the_fifteenth() {
        let periods =
            generate_periods(date(2024, 1, 10), date(2024, 2, 20), Granularity::Fortnight).unwrap();
        assert_eq!(
            bounds(&periods),
            vec![
                (date(2024, 1, 10), date(2024, 1, 15)),
                (date(2024, 1, 16), date(2024, 1, 31)),
                (date(2024, 2, 1), date(2024, 2, 15)),
                (date(2024, 2, 16), date(2024, 2, 20)),
            ]
        );
        assert_eq!(periods[1].label, "Jan 16-31");
    }

    #[test]
    fn test_fortnight_outside_range_is_dropped() {
        let periods =
            generate_periods(date(2024, 6, 20), date(2024, 6, 25), Granularity::Fortnight).unwrap();
        assert_eq!(bounds(&periods), vec![(date(2024, 6, 20), date(2024, 6, 25))]);
    }

    #[test]
    fn test_months_follow_variable_lengths() {
        let periods =
            generate_periods(date(2023, 12, 15), date(2024, 3, 3), Granularity::Month).unwrap();
        assert_eq!(
            bounds(&periods),
            vec![
                (date(2023, 12, 15), date(2023, 12, 31)),
                (date(2024, 1, 1), date(2024, 1, 31)),
                (date(2024, 2, 1), date(2024, 2, 29)),
                (date(2024, 3, 1), date(2024, 3, 3)),
            ]
        );
        assert_eq!(periods[2].label, "Feb 2024");
    }

    #[test]
    fn test_single_day_range_yields_one_period() {
        for granularity in [
            Granularity::Day,
            Granularity::Week,
            Granularity::Fortnight,
            Granularity::Month,
        ] {
            let periods = generate_periods(date(2024, 6, 15), date(2024, 6, 15), granularity).unwrap();
            assert_eq!(bounds(&periods), vec![(date(2024, 6, 15), date(2024, 6, 15))]);
        }
    }

    fn granularity_strategy() -> impl Strategy<Value = Granularity> {
        prop_oneof![
            Just(Granularity::Day),
            Just(Granularity::Week),
            Just(Granularity::Fortnight),
            Just(Granularity::Month),
        ]
    }

    proptest! {
        #[test]
        fn prop_periods_tile_the_range(
            start_offset in 0u64..2000,
            len in 0u64..400,
            granularity in granularity_strategy(),
        ) {
            let start = date(2020, 1, 1) + Days::new(start_offset);
            let end = start + Days::new(len);
            let periods = generate_periods(start, end, granularity).unwrap();

            prop_assert!(!periods.is_empty());
            prop_assert_eq!(periods[0].start, start);
            prop_assert_eq!(periods[periods.len() - 1].end, end);
            for period in &periods {
                prop_assert!(period.start <= period.end);
            }
            for pair in periods.windows(2) {
                prop_assert_eq!(pair[0].end.succ_opt(), Some(pair[1].start));
            }
        }
    }
}
