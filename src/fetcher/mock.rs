use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate, Utc};
use rand::Rng;

use crate::error::MarketQueryError;
use crate::models::{PricePoint, WeatherObservation};

const BASE_PRICE: f64 = 80.0;

/// Synthetic daily Brent series for `[start, end]` inclusive: a slow
/// repeating drift of 0.1 per day over a 10-day cycle, plus uniform noise
/// within ±0.5. The shape is deterministic, the noise is not.
pub fn oil_series(start: &str, end: &str) -> Result<Vec<PricePoint>, MarketQueryError> {
    let start = parse_iso(start)?;
    let end = parse_iso(end)?;

    let mut rng = rand::thread_rng();
    let mut points = Vec::new();
    let mut day = start;
    let mut index: u64 = 0;

    while day <= end {
        let price = BASE_PRICE + (index % 10) as f64 * 0.1 + rng.gen_range(-0.5..=0.5);
        points.push(PricePoint {
            date: day.format("%Y-%m-%d").to_string(),
            value: (price * 100.0).round() / 100.0,
        });
        day += Duration::days(1);
        index += 1;
    }

    Ok(points)
}

/// Synthetic spot rates: each requested symbol (except the base) gets
/// `1.0 + 0.1 * position` where position is its index in the request list.
pub fn fx_rates(base: &str, symbols: &str) -> BTreeMap<String, f64> {
    symbols
        .split(',')
        .map(str::trim)
        .enumerate()
        .filter(|(_, symbol)| !symbol.is_empty() && *symbol != base)
        .map(|(i, symbol)| (symbol.to_string(), 1.0 + i as f64 * 0.1))
        .collect()
}

/// Canned current-conditions snapshot.
pub fn weather(location: &str) -> WeatherObservation {
    WeatherObservation {
        location: location.to_string(),
        country: Some("US".to_string()),
        temperature: 22.5,
        feels_like: 23.0,
        humidity: 65.0,
        description: "partly cloudy".to_string(),
        timestamp: Utc::now().timestamp(),
    }
}

/// Fixed USD→local approximations used when no live FX source is available.
/// These are documented fallbacks, not live rates.
pub fn fallback_fx_rate(currency: &str) -> f64 {
    match currency {
        "EUR" => 0.92,
        "GBP" => 0.79,
        _ => 1.0,
    }
}

fn parse_iso(raw: &str) -> Result<NaiveDate, MarketQueryError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| MarketQueryError::BadDate(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_length_is_inclusive() {
        let series = oil_series("2024-01-01", "2024-01-31").unwrap();
        assert_eq!(series.len(), 31);
        assert_eq!(series[0].date, "2024-01-01");
        assert_eq!(series[30].date, "2024-01-31");

        let single = oil_series("2024-01-01", "2024-01-01").unwrap();
        assert_eq!(single.len(), 1);
    }

    #[test]
    fn test_series_stays_in_noise_band() {
        // drift contributes at most 0.9, noise at most ±0.5
        let series = oil_series("2024-01-01", "2024-02-29").unwrap();
        for point in &series {
            assert!(point.value >= BASE_PRICE - 0.5, "low outlier: {:?}", point);
            assert!(point.value <= BASE_PRICE + 0.9 + 0.5, "high outlier: {:?}", point);
        }
    }

    #[test]
    fn test_inverted_range_is_empty() {
        let series = oil_series("2024-02-01", "2024-01-01").unwrap();
        assert!(series.is_empty());
    }

    #[test]
    fn test_bad_date_is_an_error() {
        assert!(matches!(
            oil_series("someday", "2024-01-01"),
            Err(MarketQueryError::BadDate(_))
        ));
    }

    #[test]
    fn test_fx_positions_skip_base() {
        let rates = fx_rates("USD", "EUR,USD,GBP,JPY,CAD");
        assert_eq!(rates.get("EUR"), Some(&1.0));
        assert!(!rates.contains_key("USD"));
        assert_eq!(rates.get("GBP"), Some(&1.2));
        assert_eq!(rates.get("JPY"), Some(&1.3));
        assert_eq!(rates.get("CAD"), Some(&1.4));
    }

    #[test]
    fn test_fallback_rates() {
        assert_eq!(fallback_fx_rate("EUR"), 0.92);
        assert_eq!(fallback_fx_rate("GBP"), 0.79);
        assert_eq!(fallback_fx_rate("JPY"), 1.0);
        assert_eq!(fallback_fx_rate("USD"), 1.0);
    }
}
