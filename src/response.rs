use chrono::DateTime;
use tracing::warn;

use crate::config::AppConfig;
use crate::error::MarketQueryError;
use crate::llm::openrouter::OpenRouterClient;
use crate::llm::{prompt, ChatModel};
use crate::models::{
    Answer, ChartKind, DataOrigin, FxReport, MarketData, OilReport, QueryAnalysis, ResponseData,
    Visualization, WeatherReport,
};

/// Turns fetched data into the final answer: deterministic phrase templates,
/// or a chat model's text when one is configured (the template path remains
/// the fallback for any model failure).
pub struct ResponseSynthesizer {
    llm: Option<Box<dyn ChatModel>>,
}

impl ResponseSynthesizer {
    pub fn new(config: &AppConfig) -> Self {
        let llm = config.openrouter_api_key.clone().map(|key| {
            Box::new(OpenRouterClient::new(
                key,
                config.llm_model.clone(),
                config.request_timeout,
            )) as Box<dyn ChatModel>
        });

        Self { llm }
    }

    pub fn template_only() -> Self {
        Self { llm: None }
    }

    pub fn with_model(model: Box<dyn ChatModel>) -> Self {
        Self { llm: Some(model) }
    }

    pub async fn render(&self, analysis: &QueryAnalysis, data: &MarketData) -> Answer {
        let templated = self.render_template(data);

        if let Some(model) = &self.llm {
            let user_prompt = prompt::build_user_prompt(analysis, data);
            match model.complete_chat(prompt::SYSTEM_PROMPT, &user_prompt).await {
                Ok(text) if !text.trim().is_empty() => {
                    return Answer {
                        text,
                        data: templated.data,
                    };
                }
                Ok(_) => warn!(model = model.name(), "chat model returned an empty answer"),
                Err(err) => {
                    warn!(model = model.name(), error = %err, "chat model failed, using template")
                }
            }
        }

        templated
    }

    /// Render a pipeline failure. An unknown intent asks the user to
    /// rephrase; everything else gets the apologetic template.
    pub fn render_failure(&self, error: &MarketQueryError) -> Answer {
        let text = match error {
            MarketQueryError::UnsupportedIntent(_) => {
                "I'm not sure how to answer that question. Could you try asking about \
                 oil prices, exchange rates, or weather?"
                    .to_string()
            }
            other => format!("Sorry, I encountered an error: {}", other),
        };

        Answer { text, data: None }
    }

    fn render_template(&self, data: &MarketData) -> Answer {
        match data {
            MarketData::Oil(report) => oil_answer(report),
            MarketData::Fx(report) => fx_answer(report),
            MarketData::Weather(report) => weather_answer(report),
        }
    }
}

fn oil_answer(report: &OilReport) -> Answer {
    let (first, last) = match (report.series.first(), report.series.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => {
            return Answer {
                text: "I couldn't find any oil price data for your query.".to_string(),
                data: None,
            }
        }
    };

    let mut text = format!(
        "Based on {} from {} to {}, ",
        report.source.label, first.date, last.date
    );

    match &report.stats {
        Some(stats) => {
            text.push_str(&format!(
                "Brent crude oil prices have shown a {} trend of {}%. ",
                stats.trend().describe(),
                stats.percent_change
            ));
            text.push_str(&format!(
                "Prices ranged from ${} to ${} USD per barrel. ",
                stats.min, stats.max
            ));
            text.push_str(&format!(
                "The latest price is ${} USD/bbl (as of {}). ",
                last.value, last.date
            ));
            text.push_str(&format!(
                "Price volatility over this period was ${} USD/bbl (standard deviation).",
                stats.volatility
            ));

            if let Some(retail) = &stats.retail {
                text.push_str(&format!(
                    "\n\n**Estimated pump price in {}**: {} {} for {} (including taxes & VAT). ",
                    retail.country, retail.price, retail.unit_label, retail.primary_fuel
                ));
                text.push_str(&format!(
                    "This is based on the current Brent crude price (${}/bbl)",
                    last.value
                ));
                if let Some(fx) = &stats.fx {
                    let rate_phrase = match fx.origin {
                        DataOrigin::Live => {
                            format!("a rate of {} {}/USD", fx.rate, retail.currency)
                        }
                        DataOrigin::Synthetic => {
                            format!("an approximate rate of {} {}/USD", fx.rate, retail.currency)
                        }
                    };
                    text.push_str(&format!(", converted at {}", rate_phrase));
                }
                text.push_str(&format!(
                    ", with {}% fuel duty and {}% VAT applied.",
                    retail.tax_rate_pct, retail.vat_pct
                ));
            }
        }
        None => {
            text.push_str(&format!(
                "the latest Brent crude oil price is ${} USD/bbl (as of {}).",
                last.value, last.date
            ));
        }
    }

    let visualization = Visualization {
        x_axis: report.series.iter().map(|p| p.date.clone()).collect(),
        y_axis: report.series.iter().map(|p| p.value).collect(),
        title: "Brent Crude Oil Prices".to_string(),
        kind: ChartKind::Line,
    };

    Answer {
        text,
        data: Some(ResponseData::OilPrice {
            series: report.series.clone(),
            stats: report.stats.clone(),
            source: report.source.clone(),
            visualization,
        }),
    }
}

fn fx_answer(report: &FxReport) -> Answer {
    if report.rates.is_empty() {
        return Answer {
            text: "I couldn't find any exchange rate data for your query.".to_string(),
            data: None,
        };
    }

    let date = DateTime::from_timestamp(report.timestamp, 0)
        .map(|t| t.format("%Y-%m-%d").to_string())
        .unwrap_or_default();

    let mut text = format!(
        "Based on {} as of {}, here are the exchange rates relative to {}:\n\n",
        report.source.label, date, report.base
    );
    for (code, rate) in &report.rates {
        text.push_str(&format!("• {}: {:.4}\n", code, rate));
    }

    let visualization = Visualization {
        x_axis: report.rates.keys().cloned().collect(),
        y_axis: report.rates.values().copied().collect(),
        title: format!("Exchange Rates vs {}", report.base),
        kind: ChartKind::Bar,
    };

    Answer {
        text,
        data: Some(ResponseData::FxRates {
            rates: report.rates.clone(),
            base: report.base.clone(),
            date,
            source: report.source.clone(),
            visualization,
        }),
    }
}

fn weather_answer(report: &WeatherReport) -> Answer {
    let obs = &report.observation;
    let when = DateTime::from_timestamp(obs.timestamp, 0)
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default();

    let mut text = format!(
        "Based on {} as of {}, the weather in {}",
        report.source.label, when, obs.location
    );
    if let Some(country) = &obs.country {
        text.push_str(&format!(", {}", country));
    }
    text.push_str(&format!(
        " is {} with a temperature of {}°C (feels like {}°C) and {}% humidity.",
        obs.description, obs.temperature, obs.feels_like, obs.humidity
    ));

    Answer {
        text,
        data: Some(ResponseData::Weather {
            observation: obs.clone(),
            source: report.source.clone(),
        }),
    }
}
