use chrono::DateTime;

use crate::models::{MarketData, QueryAnalysis};
use crate::profiles;

pub const SYSTEM_PROMPT: &str = "\
You are an expert market data analyst with access to precise oil price and currency exchange information.
When responding to queries:
1. Provide specific numerical values with proper units
2. Include precise date ranges for any data referenced
3. Offer exact price points and clear trends
4. Never generalize when specific data is available
5. Include quantitative analysis where relevant (e.g., percentage changes, statistical measures)
6. Cite the source and timestamp of your data
7. When providing ranges, define the upper and lower bounds precisely
8. If country-specific fuel data is provided, use it to answer in local units (€/L, $/gal, £/L)

Always prioritize accuracy over generalization.";

/// Build the augmented user prompt: the computed statistics as structured
/// context, followed by the user's original question.
pub fn build_user_prompt(analysis: &QueryAnalysis, data: &MarketData) -> String {
    let mut context = String::new();

    match data {
        MarketData::Oil(report) => {
            let window = match (report.series.first(), report.series.last()) {
                (Some(first), Some(last)) => format!("{} to {}", first.date, last.date),
                _ => "(no data)".to_string(),
            };
            context.push_str(&format!(
                "Brent crude oil prices from {} (source: {}):\n",
                window, report.source.label
            ));

            if let Some(stats) = &report.stats {
                context.push_str(&format!(
                    "- Price range: ${} to ${} USD/bbl\n",
                    stats.min, stats.max
                ));
                context.push_str(&format!(
                    "- Current price: ${} USD/bbl\n",
                    stats.end_price
                ));
                context.push_str(&format!(
                    "- Change over the window: {}% ({} trend)\n",
                    stats.percent_change,
                    stats.trend().describe()
                ));
                context.push_str(&format!("- Average: ${:.2} USD/bbl\n", stats.mean));
                context.push_str(&format!(
                    "- Volatility (std dev): ${} USD/bbl\n",
                    stats.volatility
                ));

                if let Some(retail) = &stats.retail {
                    context.push_str(&format!(
                        "- Estimated pump price in {}: {} {} for {} (incl. {}% fuel duty and {}% VAT)\n",
                        retail.country,
                        retail.price,
                        retail.unit_label,
                        retail.primary_fuel,
                        retail.tax_rate_pct,
                        retail.vat_pct
                    ));
                    if let Some(fx) = &stats.fx {
                        context.push_str(&format!(
                            "- FX rate applied: {} {}/USD\n",
                            fx.rate, retail.currency
                        ));
                    }
                }
            }

            let recent: Vec<_> = report.series.iter().rev().take(5).collect();
            if !recent.is_empty() {
                context.push_str("\nMost recent prices:\n");
                for point in recent.into_iter().rev() {
                    context.push_str(&format!("- {}: ${} USD/bbl\n", point.date, point.value));
                }
            }

            if let Some(profile) = analysis
                .params
                .location
                .as_deref()
                .and_then(profiles::lookup)
            {
                context.push_str(&format!("\nNote: {}\n", profile.notes));
            }
        }
        MarketData::Fx(report) => {
            context.push_str(&format!(
                "Current FX rates vs {} (source: {}):\n",
                report.base, report.source.label
            ));
            for (code, rate) in &report.rates {
                context.push_str(&format!("- {}: {}\n", code, rate));
            }
        }
        MarketData::Weather(report) => {
            let obs = &report.observation;
            let when = DateTime::from_timestamp(obs.timestamp, 0)
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default();
            context.push_str(&format!(
                "Weather in {} as of {} (source: {}): {}, {}°C (feels like {}°C), {}% humidity\n",
                obs.location,
                when,
                report.source.label,
                obs.description,
                obs.temperature,
                obs.feels_like,
                obs.humidity
            ));
        }
    }

    format!(
        "Here is up-to-date market data:\n\n{}\nUser question: {}",
        context, analysis.original_query
    )
}
