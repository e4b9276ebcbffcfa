use chrono::{Duration, Local, Utc};
use tracing::{debug, warn};

use crate::analysis::{retail, statistics};
use crate::config::AppConfig;
use crate::error::MarketQueryError;
use crate::fetcher::eia::EiaFetcher;
use crate::fetcher::openexchange::OxrFetcher;
use crate::fetcher::openweather::OpenWeatherFetcher;
use crate::fetcher::{mock, FxRateSource, PriceSeriesSource, WeatherSource};
use crate::models::{
    DataOrigin, FxApplied, FxReport, Intent, MarketData, OilReport, PricePoint, QueryParams,
    RetailQuote, SourceTag, WeatherReport,
};
use crate::profiles;

const DEFAULT_BASE: &str = "USD";
const DEFAULT_FX_SYMBOLS: &str = "EUR,USD,GBP,JPY,CAD";
const DEFAULT_WEATHER_LOCATION: &str = "New York";

const OIL_SOURCE_LABEL: &str = "EIA API";
const FX_SOURCE_LABEL: &str = "Open Exchange Rates";
const WEATHER_SOURCE_LABEL: &str = "OpenWeatherMap";

/// Orchestrates the external fetch collaborators and supplies deterministic
/// synthetic data whenever a collaborator is unconfigured or fails. Every
/// result carries a source tag; a configured-but-failed source additionally
/// records the fallback reason.
pub struct DataAccess {
    oil: Option<Box<dyn PriceSeriesSource>>,
    fx: Option<Box<dyn FxRateSource>>,
    weather: Option<Box<dyn WeatherSource>>,
}

impl DataAccess {
    pub fn new(config: &AppConfig) -> Self {
        let oil = config.eia_api_key.clone().map(|key| {
            Box::new(EiaFetcher::new(key, config.request_timeout)) as Box<dyn PriceSeriesSource>
        });
        let fx = config.oxr_app_id.clone().map(|key| {
            Box::new(OxrFetcher::new(key, config.request_timeout)) as Box<dyn FxRateSource>
        });
        let weather = config.openweather_api_key.clone().map(|key| {
            Box::new(OpenWeatherFetcher::new(key, config.request_timeout))
                as Box<dyn WeatherSource>
        });

        Self { oil, fx, weather }
    }

    /// Wire explicit sources; `None` slots run on synthetic data.
    pub fn with_sources(
        oil: Option<Box<dyn PriceSeriesSource>>,
        fx: Option<Box<dyn FxRateSource>>,
        weather: Option<Box<dyn WeatherSource>>,
    ) -> Self {
        Self { oil, fx, weather }
    }

    /// Fetch whatever the intent calls for. The only errors that escape are
    /// the ones no fallback can absorb: an unknown intent and unusable date
    /// parameters.
    pub async fn fetch(
        &self,
        intent: Intent,
        params: &QueryParams,
    ) -> Result<MarketData, MarketQueryError> {
        debug!(intent = intent.as_str(), "dispatching fetch");
        match intent {
            Intent::OilPrice => Ok(MarketData::Oil(self.oil_report(params).await?)),
            Intent::FxRates => Ok(MarketData::Fx(self.fx_report(params).await)),
            Intent::Weather => Ok(MarketData::Weather(self.weather_report(params).await)),
            Intent::Unknown => Err(MarketQueryError::UnsupportedIntent(intent)),
        }
    }

    async fn oil_report(&self, params: &QueryParams) -> Result<OilReport, MarketQueryError> {
        let (start, end) = window(params);
        let (series, source) = self.series_window(&start, &end).await?;

        let mut stats = match statistics::compute(&series) {
            Ok(stats) => Some(stats),
            Err(err) => {
                debug!(%err, "statistics unavailable for this window");
                None
            }
        };

        // retail enrichment only when the question names a supported country
        if let (Some(stats), Some(location)) = (stats.as_mut(), params.location.as_deref()) {
            if let Some(profile) = profiles::lookup(location) {
                if let Some(latest) = series.last() {
                    let fx = self.usd_rate_for(profile.currency).await;
                    stats.retail = Some(retail::convert(latest.value, profile, fx.rate));
                    stats.fx = Some(fx);
                }
            }
        }

        Ok(OilReport {
            series,
            stats,
            source,
        })
    }

    /// Benchmark series for one window, live when possible.
    async fn series_window(
        &self,
        start: &str,
        end: &str,
    ) -> Result<(Vec<PricePoint>, SourceTag), MarketQueryError> {
        match &self.oil {
            None => Ok((mock::oil_series(start, end)?, SourceTag::synthetic())),
            Some(source) => match source.fetch_series(start, end).await {
                Ok(series) => Ok((series, SourceTag::live(OIL_SOURCE_LABEL))),
                Err(err) => {
                    warn!(
                        source = source.name(),
                        error = %err,
                        "price fetch failed, falling back to synthetic data"
                    );
                    Ok((
                        mock::oil_series(start, end)?,
                        SourceTag::fallback(err.to_string()),
                    ))
                }
            },
        }
    }

    async fn fx_report(&self, params: &QueryParams) -> FxReport {
        let base = params
            .base_currency
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE.to_string());
        let symbols = params
            .currencies
            .clone()
            .unwrap_or_else(|| DEFAULT_FX_SYMBOLS.to_string());

        let (rates, source) = match &self.fx {
            None => (mock::fx_rates(&base, &symbols), SourceTag::synthetic()),
            Some(fx) => match fx.fetch_rates(&base, &symbols).await {
                Ok(rates) => (rates, SourceTag::live(FX_SOURCE_LABEL)),
                Err(err) => {
                    warn!(
                        source = fx.name(),
                        error = %err,
                        "FX fetch failed, falling back to synthetic rates"
                    );
                    (
                        mock::fx_rates(&base, &symbols),
                        SourceTag::fallback(err.to_string()),
                    )
                }
            },
        };

        FxReport {
            base,
            rates,
            timestamp: Utc::now().timestamp(),
            source,
        }
    }

    async fn weather_report(&self, params: &QueryParams) -> WeatherReport {
        let location = params
            .location
            .clone()
            .unwrap_or_else(|| DEFAULT_WEATHER_LOCATION.to_string());

        let (observation, source) = match &self.weather {
            None => (mock::weather(&location), SourceTag::synthetic()),
            Some(weather) => match weather.fetch_weather(&location).await {
                Ok(obs) => (obs, SourceTag::live(WEATHER_SOURCE_LABEL)),
                Err(err) => {
                    warn!(
                        source = weather.name(),
                        error = %err,
                        "weather fetch failed, falling back to canned data"
                    );
                    (
                        mock::weather(&location),
                        SourceTag::fallback(err.to_string()),
                    )
                }
            },
        };

        WeatherReport {
            observation,
            source,
        }
    }

    /// USD→`currency` rate for retail conversion: live when an FX source is
    /// configured and answers, otherwise the fixed approximation.
    async fn usd_rate_for(&self, currency: &str) -> FxApplied {
        if currency == DEFAULT_BASE {
            return FxApplied {
                rate: 1.0,
                origin: DataOrigin::Live,
            };
        }

        if let Some(fx) = &self.fx {
            match fx.fetch_rates(DEFAULT_BASE, currency).await {
                Ok(rates) => {
                    if let Some(rate) = rates.get(currency) {
                        return FxApplied {
                            rate: *rate,
                            origin: DataOrigin::Live,
                        };
                    }
                    warn!(currency, "FX response missing requested symbol");
                }
                Err(err) => {
                    warn!(currency, error = %err, "FX rate fetch failed");
                }
            }
        }

        FxApplied {
            rate: mock::fallback_fx_rate(currency),
            origin: DataOrigin::Synthetic,
        }
    }

    /// Benchmark price for a single date, if the source has one.
    pub async fn price_on(&self, date: &str) -> Result<Option<PricePoint>, MarketQueryError> {
        let (series, _) = self.series_window(date, date).await?;
        Ok(series.into_iter().next())
    }

    /// Spot rate for one currency vs USD; synthetic fallback applies.
    pub async fn rate_for(&self, symbol: &str) -> Option<f64> {
        let params = QueryParams {
            currencies: Some(symbol.to_string()),
            ..Default::default()
        };
        self.fx_report(&params).await.rates.get(symbol).copied()
    }

    /// Tax-and-VAT-inclusive pump-price estimate from the most recent
    /// benchmark price. Here the country is the explicit subject of the
    /// call, so an unknown one is an error rather than a silent omission.
    pub async fn retail_fuel_price(
        &self,
        country: &str,
    ) -> Result<RetailQuote, MarketQueryError> {
        let code = profiles::normalize_country(country)
            .map(str::to_string)
            .unwrap_or_else(|| country.to_lowercase());
        let profile = profiles::lookup(&code)
            .ok_or_else(|| MarketQueryError::UnknownCountry(country.to_string()))?;

        let end = Local::now().date_naive();
        let start = end - Duration::days(1);
        let (series, _) = self
            .series_window(
                &start.format("%Y-%m-%d").to_string(),
                &end.format("%Y-%m-%d").to_string(),
            )
            .await?;
        let latest = series.last().ok_or(MarketQueryError::NoRecentData)?;

        let fx = self.usd_rate_for(profile.currency).await;
        Ok(retail::convert(latest.value, profile, fx.rate))
    }
}

/// Resolve the date window: a single-date question queries just that day,
/// otherwise the extracted (or default 30-day) range applies.
fn window(params: &QueryParams) -> (String, String) {
    if let Some(date) = &params.date {
        return (date.clone(), date.clone());
    }

    let today = Local::now().date_naive();
    let start = params
        .start_date
        .clone()
        .unwrap_or_else(|| (today - Duration::days(30)).format("%Y-%m-%d").to_string());
    let end = params
        .end_date
        .clone()
        .unwrap_or_else(|| today.format("%Y-%m-%d").to_string());
    (start, end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use async_trait::async_trait;
    use std::collections::BTreeMap;

    struct FailingOil;

    #[async_trait]
    impl PriceSeriesSource for FailingOil {
        fn name(&self) -> &str {
            "failing-oil"
        }
        async fn fetch_series(
            &self,
            _start: &str,
            _end: &str,
        ) -> anyhow::Result<Vec<PricePoint>> {
            Err(anyhow!("connection refused"))
        }
    }

    struct FixedFx(f64);

    #[async_trait]
    impl FxRateSource for FixedFx {
        fn name(&self) -> &str {
            "fixed-fx"
        }
        async fn fetch_rates(
            &self,
            _base: &str,
            symbols: &str,
        ) -> anyhow::Result<BTreeMap<String, f64>> {
            Ok(symbols
                .split(',')
                .map(|s| (s.trim().to_string(), self.0))
                .collect())
        }
    }

    fn offline() -> DataAccess {
        DataAccess::with_sources(None, None, None)
    }

    #[tokio::test]
    async fn test_unconfigured_oil_goes_synthetic() {
        let params = QueryParams {
            start_date: Some("2024-01-01".to_string()),
            end_date: Some("2024-01-10".to_string()),
            ..Default::default()
        };
        let data = offline().fetch(Intent::OilPrice, &params).await.unwrap();

        match data {
            MarketData::Oil(report) => {
                assert_eq!(report.series.len(), 10);
                assert_eq!(report.source.origin, DataOrigin::Synthetic);
                assert!(report.source.fallback_reason.is_none());
                assert!(report.stats.is_some());
            }
            other => panic!("expected oil data, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_failing_source_records_fallback_reason() {
        let access = DataAccess::with_sources(Some(Box::new(FailingOil)), None, None);
        let params = QueryParams {
            start_date: Some("2024-01-01".to_string()),
            end_date: Some("2024-01-05".to_string()),
            ..Default::default()
        };

        let data = access.fetch(Intent::OilPrice, &params).await.unwrap();
        match data {
            MarketData::Oil(report) => {
                assert_eq!(report.series.len(), 5);
                assert_eq!(report.source.origin, DataOrigin::Synthetic);
                let reason = report.source.fallback_reason.unwrap();
                assert!(reason.contains("connection refused"));
            }
            other => panic!("expected oil data, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_retail_enrichment_uses_fixed_fx_when_offline() {
        let params = QueryParams {
            start_date: Some("2024-01-01".to_string()),
            end_date: Some("2024-01-10".to_string()),
            location: Some("germany".to_string()),
            ..Default::default()
        };
        let data = offline().fetch(Intent::OilPrice, &params).await.unwrap();

        match data {
            MarketData::Oil(report) => {
                let stats = report.stats.unwrap();
                let retail = stats.retail.unwrap();
                assert_eq!(retail.currency, "EUR");
                let fx = stats.fx.unwrap();
                assert_eq!(fx.rate, 0.92);
                assert_eq!(fx.origin, DataOrigin::Synthetic);
            }
            other => panic!("expected oil data, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_retail_enrichment_prefers_live_fx() {
        let access =
            DataAccess::with_sources(None, Some(Box::new(FixedFx(0.95))), None);
        let params = QueryParams {
            start_date: Some("2024-01-01".to_string()),
            end_date: Some("2024-01-10".to_string()),
            location: Some("germany".to_string()),
            ..Default::default()
        };

        let data = access.fetch(Intent::OilPrice, &params).await.unwrap();
        match data {
            MarketData::Oil(report) => {
                let fx = report.stats.unwrap().fx.unwrap();
                assert_eq!(fx.rate, 0.95);
                assert_eq!(fx.origin, DataOrigin::Live);
            }
            other => panic!("expected oil data, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unknown_location_drops_retail_silently() {
        let params = QueryParams {
            start_date: Some("2024-01-01".to_string()),
            end_date: Some("2024-01-10".to_string()),
            location: Some("atlantis".to_string()),
            ..Default::default()
        };
        let data = offline().fetch(Intent::OilPrice, &params).await.unwrap();

        match data {
            MarketData::Oil(report) => {
                let stats = report.stats.unwrap();
                assert!(stats.retail.is_none());
                assert!(stats.fx.is_none());
            }
            other => panic!("expected oil data, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unknown_intent_is_an_error() {
        let err = offline()
            .fetch(Intent::Unknown, &QueryParams::default())
            .await
            .unwrap_err();
        assert_eq!(err, MarketQueryError::UnsupportedIntent(Intent::Unknown));
    }

    #[tokio::test]
    async fn test_bad_dates_surface_as_error() {
        let params = QueryParams {
            start_date: Some("not-a-date".to_string()),
            end_date: Some("2024-01-10".to_string()),
            ..Default::default()
        };
        let err = offline()
            .fetch(Intent::OilPrice, &params)
            .await
            .unwrap_err();
        assert!(matches!(err, MarketQueryError::BadDate(_)));
    }

    #[tokio::test]
    async fn test_price_on_single_date() {
        let point = offline().price_on("2024-03-05").await.unwrap().unwrap();
        assert_eq!(point.date, "2024-03-05");
        assert!(point.value > 70.0 && point.value < 90.0);
    }

    #[tokio::test]
    async fn test_rate_for_symbol() {
        // single requested symbol at position 0 -> synthetic rate 1.0
        let rate = offline().rate_for("EUR").await.unwrap();
        assert_eq!(rate, 1.0);
    }

    #[tokio::test]
    async fn test_retail_fuel_price_unknown_country() {
        let err = offline().retail_fuel_price("wonderland").await.unwrap_err();
        assert_eq!(
            err,
            MarketQueryError::UnknownCountry("wonderland".to_string())
        );
    }

    #[tokio::test]
    async fn test_retail_fuel_price_alias() {
        let quote = offline().retail_fuel_price("United States").await.unwrap();
        assert_eq!(quote.currency, "USD");
        assert_eq!(quote.unit_label, "$/gallon");
        assert!(quote.price > 0.0);
    }
}
