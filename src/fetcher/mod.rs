use std::collections::BTreeMap;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{PricePoint, WeatherObservation};

pub mod eia;
pub mod mock;
pub mod openexchange;
pub mod openweather;

/// A live source of daily benchmark prices.
#[async_trait]
pub trait PriceSeriesSource: Send + Sync {
    fn name(&self) -> &str;
    /// Prices for `[start, end]` inclusive, ascending by date. An empty
    /// result is an error, never a success.
    async fn fetch_series(&self, start: &str, end: &str) -> Result<Vec<PricePoint>>;
}

/// A live source of spot exchange rates against a base currency.
#[async_trait]
pub trait FxRateSource: Send + Sync {
    fn name(&self) -> &str;
    async fn fetch_rates(&self, base: &str, symbols: &str)
        -> Result<BTreeMap<String, f64>>;
}

/// A live source of current weather conditions.
#[async_trait]
pub trait WeatherSource: Send + Sync {
    fn name(&self) -> &str;
    async fn fetch_weather(&self, location: &str) -> Result<WeatherObservation>;
}
