use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde_json::Value;

use super::WeatherSource;
use crate::models::WeatherObservation;

const CURRENT_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

pub struct OpenWeatherFetcher {
    api_key: String,
    client: Client,
}

impl OpenWeatherFetcher {
    pub fn new(api_key: String, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { api_key, client }
    }

    fn parse_observation(json: &Value, queried: &str) -> Result<WeatherObservation> {
        let temperature = json["main"]["temp"]
            .as_f64()
            .ok_or_else(|| anyhow!("unexpected weather response shape: 'main.temp' missing"))?;

        Ok(WeatherObservation {
            location: json["name"].as_str().unwrap_or(queried).to_string(),
            country: json["sys"]["country"].as_str().map(String::from),
            temperature,
            feels_like: json["main"]["feels_like"].as_f64().unwrap_or(temperature),
            humidity: json["main"]["humidity"].as_f64().unwrap_or(0.0),
            description: json["weather"][0]["description"]
                .as_str()
                .unwrap_or("")
                .to_string(),
            timestamp: json["dt"].as_i64().unwrap_or_else(|| Utc::now().timestamp()),
        })
    }
}

#[async_trait]
impl WeatherSource for OpenWeatherFetcher {
    fn name(&self) -> &str {
        "openweathermap"
    }

    async fn fetch_weather(&self, location: &str) -> Result<WeatherObservation> {
        if self.api_key.trim().is_empty() {
            return Err(anyhow!("OpenWeatherMap API key is missing"));
        }

        let params = [
            ("q", location),
            ("appid", self.api_key.as_str()),
            ("units", "metric"),
        ];

        let resp = self.client.get(CURRENT_URL).query(&params).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(anyhow!("weather API error: {} - {}", status, body));
        }

        let json: Value = resp.json().await?;
        Self::parse_observation(&json, location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_valid_observation() {
        let json_data = json!({
            "name": "London",
            "sys": { "country": "GB" },
            "main": { "temp": 14.2, "feels_like": 13.1, "humidity": 72 },
            "weather": [ { "description": "light rain" } ],
            "dt": 1717500000
        });

        let obs = OpenWeatherFetcher::parse_observation(&json_data, "london").unwrap();
        assert_eq!(obs.location, "London");
        assert_eq!(obs.country.as_deref(), Some("GB"));
        assert_eq!(obs.temperature, 14.2);
        assert_eq!(obs.description, "light rain");
        assert_eq!(obs.timestamp, 1717500000);
    }

    #[test]
    fn test_parse_missing_temperature_is_error() {
        let json_data = json!({ "name": "Nowhere" });
        assert!(OpenWeatherFetcher::parse_observation(&json_data, "Nowhere").is_err());
    }
}
