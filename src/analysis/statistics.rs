use serde::Serialize;

use crate::error::MarketQueryError;
use crate::models::{FxApplied, PricePoint, RetailQuote};

/// Descriptive statistics over one queried window. Recomputed per query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    pub range: f64,
    pub start_price: f64,
    pub end_price: f64,
    /// First vs last value of the window, percent, rounded to 2 decimals.
    pub percent_change: f64,
    /// Sample standard deviation, rounded to 2 decimals; 0 when only one
    /// value survived coercion.
    pub volatility: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retail: Option<RetailQuote>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fx: Option<FxApplied>,
}

impl SeriesStats {
    pub fn trend(&self) -> Trend {
        Trend::from_percent_change(self.percent_change)
    }
}

/// Qualitative trend bucket for a percent change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    StronglyUpward,
    ModeratelyUpward,
    RelativelyStable,
    ModeratelyDownward,
    StronglyDownward,
}

impl Trend {
    /// Strict inequalities throughout: the boundary values 5, 1, -1 and -5
    /// land in the lesser bucket.
    pub fn from_percent_change(pc: f64) -> Self {
        if pc > 5.0 {
            Trend::StronglyUpward
        } else if pc > 1.0 {
            Trend::ModeratelyUpward
        } else if pc < -5.0 {
            Trend::StronglyDownward
        } else if pc < -1.0 {
            Trend::ModeratelyDownward
        } else {
            Trend::RelativelyStable
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            Trend::StronglyUpward => "strongly upward",
            Trend::ModeratelyUpward => "moderately upward",
            Trend::RelativelyStable => "relatively stable",
            Trend::ModeratelyDownward => "moderately downward",
            Trend::StronglyDownward => "strongly downward",
        }
    }
}

/// Compute descriptive statistics over a price series.
///
/// Needs at least two points. Non-finite values are skipped during
/// coercion; if none survive the series is reported invalid.
pub fn compute(series: &[PricePoint]) -> Result<SeriesStats, MarketQueryError> {
    if series.len() < 2 {
        return Err(MarketQueryError::InsufficientData);
    }

    let values: Vec<f64> = series
        .iter()
        .map(|p| p.value)
        .filter(|v| v.is_finite())
        .collect();
    if values.is_empty() {
        return Err(MarketQueryError::InvalidSeries);
    }

    let first = values[0];
    let last = values[values.len() - 1];
    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let mean = values.iter().sum::<f64>() / values.len() as f64;

    let percent_change = round2((last - first) / first * 100.0);
    let volatility = if values.len() > 1 {
        round2(sample_std_dev(&values, mean))
    } else {
        0.0
    };

    Ok(SeriesStats {
        min,
        max,
        mean,
        median: median(&values),
        range: max - min,
        start_price: first,
        end_price: last,
        percent_change,
        volatility,
        retail: None,
        fx: None,
    })
}

fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}

fn sample_std_dev(values: &[f64], mean: f64) -> f64 {
    let variance = values
        .iter()
        .map(|v| {
            let diff = mean - v;
            diff * diff
        })
        .sum::<f64>()
        / (values.len() - 1) as f64;
    variance.sqrt()
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(values: &[f64]) -> Vec<PricePoint> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| PricePoint {
                date: format!("2024-01-{:02}", i + 1),
                value: *v,
            })
            .collect()
    }

    #[test]
    fn test_basic_statistics() {
        let stats = compute(&series(&[80.0, 82.0, 84.0, 86.0])).unwrap();
        assert_eq!(stats.min, 80.0);
        assert_eq!(stats.max, 86.0);
        assert_eq!(stats.mean, 83.0);
        assert_eq!(stats.median, 83.0);
        assert_eq!(stats.range, 6.0);
        assert_eq!(stats.start_price, 80.0);
        assert_eq!(stats.end_price, 86.0);
        assert_eq!(stats.percent_change, 7.5);
        // sample stddev of 80,82,84,86 = sqrt(20/3) ≈ 2.58
        assert_eq!(stats.volatility, 2.58);
    }

    #[test]
    fn test_median_odd_length() {
        let stats = compute(&series(&[3.0, 1.0, 2.0])).unwrap();
        assert_eq!(stats.median, 2.0);
    }

    #[test]
    fn test_percent_change_sign_matches_direction() {
        let up = compute(&series(&[50.0, 55.0])).unwrap();
        assert!(up.percent_change > 0.0);

        let down = compute(&series(&[55.0, 50.0])).unwrap();
        assert!(down.percent_change < 0.0);
    }

    #[test]
    fn test_bounds_invariants() {
        let stats = compute(&series(&[79.9, 80.4, 80.1, 81.3, 80.8])).unwrap();
        assert!(stats.min <= stats.mean && stats.mean <= stats.max);
        assert!(stats.min <= stats.median && stats.median <= stats.max);
        assert!(stats.volatility >= 0.0);
    }

    #[test]
    fn test_insufficient_data() {
        assert_eq!(
            compute(&series(&[80.0])),
            Err(MarketQueryError::InsufficientData)
        );
        assert_eq!(compute(&[]), Err(MarketQueryError::InsufficientData));
    }

    #[test]
    fn test_non_finite_values_are_skipped() {
        let mut points = series(&[80.0, 81.0, 82.0]);
        points[1].value = f64::NAN;
        let stats = compute(&points).unwrap();
        assert_eq!(stats.mean, 81.0);
        assert_eq!(stats.percent_change, 2.5);
    }

    #[test]
    fn test_all_values_invalid() {
        let mut points = series(&[1.0, 2.0]);
        points[0].value = f64::NAN;
        points[1].value = f64::INFINITY;
        assert_eq!(compute(&points), Err(MarketQueryError::InvalidSeries));
    }

    #[test]
    fn test_trend_boundaries_fall_into_lesser_bucket() {
        assert_eq!(Trend::from_percent_change(5.1), Trend::StronglyUpward);
        assert_eq!(Trend::from_percent_change(5.0), Trend::ModeratelyUpward);
        assert_eq!(Trend::from_percent_change(1.0), Trend::RelativelyStable);
        assert_eq!(Trend::from_percent_change(0.0), Trend::RelativelyStable);
        assert_eq!(Trend::from_percent_change(-1.0), Trend::RelativelyStable);
        assert_eq!(Trend::from_percent_change(-5.0), Trend::ModeratelyDownward);
        assert_eq!(Trend::from_percent_change(-5.1), Trend::StronglyDownward);
    }
}
