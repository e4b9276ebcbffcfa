use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use super::PriceSeriesSource;
use crate::models::PricePoint;

const SPOT_PRICE_URL: &str = "https://api.eia.gov/v2/petroleum/pri/spt/data/";
/// Brent crude spot price series id.
const BRENT_SERIES: &str = "RBRTE";

pub struct EiaFetcher {
    api_key: String,
    client: Client,
}

impl EiaFetcher {
    pub fn new(api_key: String, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { api_key, client }
    }

    fn parse_response(json: &Value) -> Result<Vec<PricePoint>> {
        // EIA v2 structure:
        // { "response": { "data": [ { "period": "2024-01-05", "value": "78.21", ... } ] } }
        let data_array = json["response"]["data"]
            .as_array()
            .ok_or_else(|| anyhow!("unexpected EIA response shape: 'response.data' missing"))?;

        let mut points = Vec::new();

        for obs in data_array {
            let date = match obs["period"].as_str() {
                Some(d) => d,
                None => continue,
            };
            // values arrive as strings or numbers depending on the dataset
            let value = obs["value"]
                .as_f64()
                .or_else(|| obs["value"].as_str().and_then(|s| s.parse().ok()));

            if let Some(value) = value {
                points.push(PricePoint {
                    date: date.to_string(),
                    value,
                });
            }
        }

        // Sort by date ASC
        points.sort_by(|a, b| a.date.cmp(&b.date));

        Ok(points)
    }
}

#[async_trait]
impl PriceSeriesSource for EiaFetcher {
    fn name(&self) -> &str {
        "eia"
    }

    async fn fetch_series(&self, start: &str, end: &str) -> Result<Vec<PricePoint>> {
        if self.api_key.trim().is_empty() {
            return Err(anyhow!("EIA API key is missing"));
        }

        let params = [
            ("api_key", self.api_key.as_str()),
            ("frequency", "daily"),
            ("data[0]", "value"),
            ("facets[series][]", BRENT_SERIES),
            ("start", start),
            ("end", end),
            ("sort[0][column]", "period"),
            ("sort[0][direction]", "asc"),
        ];

        let resp = self.client.get(SPOT_PRICE_URL).query(&params).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(anyhow!("EIA API error: {} - {}", status, body));
        }

        let json: Value = resp.json().await?;
        let points = Self::parse_response(&json)?;
        if points.is_empty() {
            return Err(anyhow!(
                "EIA returned no usable data points for {}..{}",
                start,
                end
            ));
        }

        Ok(points)
    }
}
