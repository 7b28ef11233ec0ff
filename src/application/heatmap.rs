// Heat-map normalizer - Maps a numeric series onto a three-stop color gradient
use serde::{Deserialize, Serialize};

use crate::domain::error::EngineError;
use crate::domain::metric::{ColorAssignment, HeatmapDirection};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Low / mid / high color stops plus a fixed alpha, so that row and column
/// striping stays visible underneath.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapGradient {
    pub low: Rgb,
    pub mid: Rgb,
    pub high: Rgb,
    pub alpha: f64,
}

impl Default for HeatmapGradient {
    fn default() -> Self {
        Self {
            low: Rgb(255, 0, 0),
            mid: Rgb(255, 255, 0),
            high: Rgb(0, 255, 0),
            alpha: 0.35,
        }
    }
}

impl HeatmapGradient {
    /// Color for a normalized position `t` in `[0, 1]`.
    pub fn color_at(&self, t: f64) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        if t < 0.5 {
            lerp(self.low, self.mid, 2.0 * t)
        } else {
            lerp(self.mid, self.high, 2.0 * (t - 0.5))
        }
    }

    fn css(&self, color: Rgb) -> String {
        format!("rgba({}, {}, {}, {})", color.0, color.1, color.2, self.alpha)
    }
}

/// Color every value of `series` relative to the series' own min and max.
///
/// An all-equal series carries no signal and gets no highlight, and neither
/// does one whose spread overflows `f64`. Non-finite values are left out of
/// the min/max and are never highlighted.
pub fn normalize(
    series: &[f64],
    gradient: &HeatmapGradient,
    direction: HeatmapDirection,
) -> Result<Vec<ColorAssignment>, EngineError> {
    if series.is_empty() {
        return Err(EngineError::EmptySeries);
    }

    let finite = series.iter().copied().filter(|v| v.is_finite());
    let (min, max) = finite.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });

    if series.iter().any(|v| !v.is_finite()) {
        tracing::debug!("Heat-map series contains non-finite values; leaving them blank");
    }

    let spread = max - min;
    let assignments = series
        .iter()
        .map(|&value| {
            // an overflowing spread would turn every position into NaN
            let color = if !value.is_finite() || !(spread > 0.0 && spread.is_finite()) {
                String::new()
            } else {
                let t = (value - min) / spread;
                let t = match direction {
                    HeatmapDirection::HigherIsBetter => t,
                    HeatmapDirection::LowerIsBetter => 1.0 - t,
                };
                gradient.css(gradient.color_at(t))
            };
            ColorAssignment { value, color }
        })
        .collect();

    Ok(assignments)
}

fn lerp(from: Rgb, to: Rgb, s: f64) -> Rgb {
    let channel = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * s).round() as u8;
    Rgb(
        channel(from.0, to.0),
        channel(from.1, to.1),
        channel(from.2, to.2),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn colors(series: &[f64], direction: HeatmapDirection) -> Vec<String> {
        normalize(series, &HeatmapGradient::default(), direction)
            .unwrap()
            .into_iter()
            .map(|c| c.color)
            .collect()
    }

    #[test]
    fn test_empty_series_is_an_error() {
        let result = normalize(&[], &HeatmapGradient::default(), HeatmapDirection::HigherIsBetter);
        assert_eq!(result, Err(EngineError::EmptySeries));
    }

    #[test]
    fn test_all_equal_series_has_no_highlight() {
        let result = colors(&[4.0, 4.0, 4.0], HeatmapDirection::HigherIsBetter);
        assert_eq!(result, vec!["", "", ""]);
        assert_eq!(colors(&[7.5], HeatmapDirection::HigherIsBetter), vec![""]);
    }

    #[test]
    fn test_red_yellow_green_stops() {
        let result = colors(&[0.0, 25.0, 50.0, 75.0, 100.0], HeatmapDirection::HigherIsBetter);
        assert_eq!(
            result,
            vec![
                "rgba(255, 0, 0, 0.35)",
                "rgba(255, 128, 0, 0.35)",
                "rgba(255, 255, 0, 0.35)",
                "rgba(128, 255, 0, 0.35)",
                "rgba(0, 255, 0, 0.35)",
            ]
        );
    }

    #[test]
    fn test_lower_is_better_inverts_scale() {
        let result = colors(&[10.0, 30.0], HeatmapDirection::LowerIsBetter);
        assert_eq!(result, vec!["rgba(0, 255, 0, 0.35)", "rgba(255, 0, 0, 0.35)"]);
    }

    #[test]
    fn test_colors_depend_on_whole_series() {
        let before = colors(&[1.0, 2.0, 3.0], HeatmapDirection::HigherIsBetter);
        let after = colors(&[1.0, 2.0, 9.0], HeatmapDirection::HigherIsBetter);
        // same value, different neighbours
        assert_ne!(before[1], after[1]);
    }

    #[test]
    fn test_non_finite_values_are_blank() {
        let result = normalize(
            &[0.0, f64::NAN, 10.0],
            &HeatmapGradient::default(),
            HeatmapDirection::HigherIsBetter,
        )
        .unwrap();
        assert_eq!(result[0].color, "rgba(255, 0, 0, 0.35)");
        assert_eq!(result[1].color, "");
        assert_eq!(result[2].color, "rgba(0, 255, 0, 0.35)");
    }

    #[test]
    fn test_overflowing_spread_has_no_highlight() {
        let result = colors(&[-f64::MAX, 0.0, f64::MAX], HeatmapDirection::HigherIsBetter);
        assert_eq!(result, vec!["", "", ""]);
    }

    #[test]
    fn test_custom_gradient() {
        let gradient = HeatmapGradient {
            low: Rgb(0, 0, 255),
            mid: Rgb(255, 255, 255),
            high: Rgb(255, 0, 0),
            alpha: 0.5,
        };
        let result = normalize(&[0.0, 1.0], &gradient, HeatmapDirection::HigherIsBetter).unwrap();
        assert_eq!(result[0].color, "rgba(0, 0, 255, 0.5)");
        assert_eq!(result[1].color, "rgba(255, 0, 0, 0.5)");
    }
}
