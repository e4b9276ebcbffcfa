use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use super::FxRateSource;

const LATEST_URL: &str = "https://openexchangerates.org/api/latest.json";

pub struct OxrFetcher {
    app_id: String,
    client: Client,
}

impl OxrFetcher {
    pub fn new(app_id: String, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { app_id, client }
    }

    fn parse_rates(json: &Value) -> Result<BTreeMap<String, f64>> {
        let rates_obj = json["rates"]
            .as_object()
            .ok_or_else(|| anyhow!("unexpected FX response shape: 'rates' missing"))?;

        let rates: BTreeMap<String, f64> = rates_obj
            .iter()
            .filter_map(|(code, rate)| rate.as_f64().map(|r| (code.clone(), r)))
            .collect();

        if rates.is_empty() {
            return Err(anyhow!("FX response contained no numeric rates"));
        }

        Ok(rates)
    }
}

#[async_trait]
impl FxRateSource for OxrFetcher {
    fn name(&self) -> &str {
        "openexchangerates"
    }

    async fn fetch_rates(
        &self,
        base: &str,
        symbols: &str,
    ) -> Result<BTreeMap<String, f64>> {
        if self.app_id.trim().is_empty() {
            return Err(anyhow!("Open Exchange Rates app id is missing"));
        }

        let params = [
            ("app_id", self.app_id.as_str()),
            ("base", base),
            ("symbols", symbols),
        ];

        let resp = self.client.get(LATEST_URL).query(&params).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(anyhow!("FX API error: {} - {}", status, body));
        }

        let json: Value = resp.json().await?;
        Self::parse_rates(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_valid_rates() {
        let json_data = json!({
            "base": "USD",
            "rates": { "EUR": 0.9234, "JPY": 148.11 }
        });

        let rates = OxrFetcher::parse_rates(&json_data).unwrap();
        assert_eq!(rates.len(), 2);
        assert_eq!(rates["EUR"], 0.9234);
    }

    #[test]
    fn test_parse_missing_rates_key() {
        let json_data = json!({ "error": true, "message": "invalid_app_id" });
        assert!(OxrFetcher::parse_rates(&json_data).is_err());
    }

    #[test]
    fn test_parse_non_numeric_rates_are_dropped() {
        let json_data = json!({ "rates": { "EUR": "oops", "GBP": 0.79 } });
        let rates = OxrFetcher::parse_rates(&json_data).unwrap();
        assert_eq!(rates.len(), 1);
        assert_eq!(rates["GBP"], 0.79);
    }
}
