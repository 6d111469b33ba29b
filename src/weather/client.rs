//! OpenWeatherMap "current weather" client.

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Errors from the weather provider.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("weather request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("weather provider answered {status}: {message}")]
    Provider { status: u16, message: String },

    #[error("weather response has no conditions")]
    MissingConditions,
}

/// Subset of the provider's response the bot uses.
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentWeather {
    #[serde(default)]
    pub name: String,
    pub main: MainReadings,
    #[serde(default)]
    pub weather: Vec<Condition>,
    #[serde(default)]
    pub wind: Wind,
    #[serde(default)]
    pub sys: Sys,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MainReadings {
    pub temp: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub humidity: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Condition {
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Wind {
    #[serde(default)]
    pub speed: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Sys {
    #[serde(default)]
    pub country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    #[serde(default)]
    message: String,
}

impl CurrentWeather {
    /// The first (primary) condition.
    pub fn condition(&self) -> Result<&Condition, WeatherError> {
        self.weather.first().ok_or(WeatherError::MissingConditions)
    }
}

/// HTTP client for the weather endpoint.
#[derive(Clone)]
pub struct WeatherClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl WeatherClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self, WeatherError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.into(),
        })
    }

    /// Current conditions for `city`, metric units, descriptions in `lang`.
    pub async fn current(&self, city: &str, lang: &str) -> Result<CurrentWeather, WeatherError> {
        debug!("Fetching weather for {:?} ({})", city, lang);

        let response = self
            .http
            .get(&self.base_url)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
                ("lang", lang),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ProviderError>()
                .await
                .map(|e| e.message)
                .unwrap_or_default();
            return Err(WeatherError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_provider_response() {
        let raw = r#"{
            "weather": [{"id": 800, "main": "Clear", "description": "céu limpo", "icon": "01d"}],
            "main": {"temp": 27.6, "feels_like": 29.1, "temp_min": 25.2, "temp_max": 30.4, "humidity": 61},
            "wind": {"speed": 3.6},
            "sys": {"country": "BR"},
            "name": "São Paulo"
        }"#;

        let weather: CurrentWeather = serde_json::from_str(raw).unwrap();
        assert_eq!(weather.name, "São Paulo");
        assert_eq!(weather.condition().unwrap().icon, "01d");
        assert_eq!(weather.main.humidity, 61);
        assert_eq!(weather.sys.country.as_deref(), Some("BR"));
    }

    #[test]
    fn test_missing_conditions() {
        let raw = r#"{"main": {"temp": 1.0, "feels_like": 1.0, "temp_min": 0.0, "temp_max": 2.0, "humidity": 90}}"#;
        let weather: CurrentWeather = serde_json::from_str(raw).unwrap();
        assert!(matches!(weather.condition(), Err(WeatherError::MissingConditions)));
        assert_eq!(weather.wind.speed, 0.0);
    }
}
