// Run-rate projector - Extends a partial current period to a full-period estimate
use chrono::NaiveDate;

use crate::application::period_generator::natural_unit_end;
use crate::domain::metric::RunRateProjection;
use crate::domain::period::{Granularity, TimePeriod};

/// Additional amount expected between today and period end:
/// `round(value_so_far / days_elapsed * days_in_period) - value_so_far`.
///
/// Both day counts include the first day and today. Returns `None` when there
/// is nothing to project from.
pub fn projected_extension(value_so_far: f64, days_elapsed: u32, days_in_period: u32) -> Option<f64> {
    if !(value_so_far > 0.0) || days_elapsed == 0 || days_in_period < days_elapsed {
        return None;
    }
    let projected_total =
        (value_so_far / f64::from(days_elapsed) * f64::from(days_in_period)).round();
    Some(projected_total - value_so_far)
}

/// Project `value_so_far` for `period` when it contains `today`.
///
/// The period runs to the natural end of its calendar unit for this purpose,
/// so a period clipped at today still projects to the end of its week,
/// fortnight or month.
pub fn project_period(
    period: &TimePeriod,
    granularity: Granularity,
    value_so_far: f64,
    today: NaiveDate,
) -> Option<RunRateProjection> {
    if !period.contains(today) {
        return None;
    }
    let full_end = natural_unit_end(period.start, granularity).max(period.end);
    let days_elapsed = (today - period.start).num_days() + 1;
    let days_in_period = (full_end - period.start).num_days() + 1;

    let extension = projected_extension(
        value_so_far,
        u32::try_from(days_elapsed).ok()?,
        u32::try_from(days_in_period).ok()?,
    )?;

    Some(RunRateProjection {
        actual: value_so_far,
        projected_extension: extension,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_extension_not_total() {
        // 10 in 5 of 30 days -> 60 projected, 50 still to come
        assert_eq!(projected_extension(10.0, 5, 30), Some(50.0));
    }

    #[test]
    fn test_projection_is_rounded() {
        // 7 / 3 * 7 = 16.33 -> 16
        assert_eq!(projected_extension(7.0, 3, 7), Some(9.0));
    }

    #[test]
    fn test_no_projection_without_value() {
        assert_eq!(projected_extension(0.0, 5, 30), None);
        assert_eq!(projected_extension(-3.0, 5, 30), None);
        assert_eq!(projected_extension(10.0, 0, 30), None);
    }

    #[test]
    fn test_last_day_projects_nothing_more() {
        assert_eq!(projected_extension(12.0, 30, 30), Some(0.0));
    }

    #[test]
    fn test_only_current_period_is_projected() {
        let june = TimePeriod::new(date(2024, 6, 1), date(2024, 6, 30), "Jun 2024".into());

        assert_eq!(project_period(&june, Granularity::Month, 10.0, date(2024, 7, 2)), None);

        let projection = project_period(&june, Granularity::Month, 10.0, date(2024, 6, 5)).unwrap();
        assert_eq!(projection.actual, 10.0);
        assert_eq!(projection.projected_extension, 50.0);
    }

    #[test]
    fn test_clipped_period_projects_to_natural_end() {
        // range ended today, the fortnight itself runs to the 15th
        let clipped = TimePeriod::new(date(2024, 6, 1), date(2024, 6, 5), "Jun 1-5".into());
        let projection =
            project_period(&clipped, Granularity::Fortnight, 10.0, date(2024, 6, 5)).unwrap();
        assert_eq!(projection.projected_extension, 20.0);
    }
}
