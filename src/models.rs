use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::analysis::statistics::SeriesStats;

/// The closed set of question categories the pipeline understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    OilPrice,
    FxRates,
    Weather,
    Unknown,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::OilPrice => "oil_price",
            Intent::FxRates => "fx_rates",
            Intent::Weather => "weather",
            Intent::Unknown => "unknown",
        }
    }
}

/// Parameters pulled out of a question. Dates travel as ISO `YYYY-MM-DD`
/// strings; an unparseable date expression is carried through verbatim and
/// rejected only where a real calendar date is finally required.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QueryParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    /// Single-day questions ("on 2024-05-03") set this instead of a range.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Either a normalized country code or free location text (weather).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currencies: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_currency: Option<String>,
}

/// Outcome of query analysis. Immutable once produced.
#[derive(Debug, Clone, Serialize)]
pub struct QueryAnalysis {
    pub intent: Intent,
    pub params: QueryParams,
    pub original_query: String,
}

/// One observation in a price series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: String,
    pub value: f64,
}

/// Whether a result came from a live upstream or a synthetic generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataOrigin {
    Live,
    Synthetic,
}

/// Provenance tag attached to every fetched result. The label feeds response
/// text directly, so it must never be dropped between fetch and render.
#[derive(Debug, Clone, Serialize)]
pub struct SourceTag {
    pub label: String,
    pub origin: DataOrigin,
    /// Set when a configured live source failed and synthetic data was
    /// substituted; absent for a live result or an unconfigured source.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<String>,
}

impl SourceTag {
    pub fn live(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            origin: DataOrigin::Live,
            fallback_reason: None,
        }
    }

    pub fn synthetic() -> Self {
        Self {
            label: "synthetic data".to_string(),
            origin: DataOrigin::Synthetic,
            fallback_reason: None,
        }
    }

    pub fn fallback(reason: impl Into<String>) -> Self {
        Self {
            label: "synthetic data".to_string(),
            origin: DataOrigin::Synthetic,
            fallback_reason: Some(reason.into()),
        }
    }

    pub fn is_synthetic(&self) -> bool {
        self.origin == DataOrigin::Synthetic
    }
}

/// Tax-and-VAT-inclusive retail fuel price in local units.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetailQuote {
    pub price: f64,
    pub unit_label: String,
    pub country: String,
    pub primary_fuel: String,
    pub currency: String,
    pub tax_rate_pct: f64,
    pub vat_pct: f64,
}

/// The USD→local rate actually applied to a retail quote, with provenance.
/// A synthetic origin means the fixed per-currency approximation was used.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FxApplied {
    pub rate: f64,
    pub origin: DataOrigin,
}

/// Current-conditions weather snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct WeatherObservation {
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity: f64,
    pub description: String,
    pub timestamp: i64,
}

/// Oil price series plus derived statistics. `stats` is absent when fewer
/// than two usable points came back.
#[derive(Debug, Clone, Serialize)]
pub struct OilReport {
    pub series: Vec<PricePoint>,
    pub stats: Option<SeriesStats>,
    pub source: SourceTag,
}

/// Spot FX rates against a base currency.
#[derive(Debug, Clone, Serialize)]
pub struct FxReport {
    pub base: String,
    pub rates: BTreeMap<String, f64>,
    pub timestamp: i64,
    pub source: SourceTag,
}

#[derive(Debug, Clone, Serialize)]
pub struct WeatherReport {
    pub observation: WeatherObservation,
    pub source: SourceTag,
}

/// Everything the data-access facade can hand to the synthesizer.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MarketData {
    Oil(OilReport),
    Fx(FxReport),
    Weather(WeatherReport),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    Bar,
}

/// Chart-ready payload: parallel x/y vectors plus presentation hints.
#[derive(Debug, Clone, Serialize)]
pub struct Visualization {
    pub x_axis: Vec<String>,
    pub y_axis: Vec<f64>,
    pub title: String,
    pub kind: ChartKind,
}

/// Structured data attached to an answer when the intent produced any.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponseData {
    OilPrice {
        series: Vec<PricePoint>,
        #[serde(skip_serializing_if = "Option::is_none")]
        stats: Option<SeriesStats>,
        source: SourceTag,
        visualization: Visualization,
    },
    FxRates {
        rates: BTreeMap<String, f64>,
        base: String,
        date: String,
        source: SourceTag,
        visualization: Visualization,
    },
    Weather {
        observation: WeatherObservation,
        source: SourceTag,
    },
}

/// Terminal artifact returned to the caller of the pipeline.
#[derive(Debug, Clone, Serialize)]
pub struct Answer {
    pub text: String,
    pub data: Option<ResponseData>,
}

/// Full trace of one processed question.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineResult {
    pub query: String,
    pub analysis: QueryAnalysis,
    pub response: Answer,
}
