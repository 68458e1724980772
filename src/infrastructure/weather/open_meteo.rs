//! Open-Meteo forecast provider
//!
//! Fetches daily variables from the Open-Meteo forecast API and reshapes
//! them into [`Forecast`] values.

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::domain::weather::{
    codes, Conditions, Coordinates, Forecast, ForecastDay, ForecastLocation, ForecastSummary,
    Precipitation, Temperature, WeatherProvider, Wind, MAX_FORECAST_DAYS,
};
use crate::domain::DomainError;

use super::http_client::HttpClientTrait;

pub const DEFAULT_BASE_URL: &str = "https://api.open-meteo.com/v1";

const PROVIDER_NAME: &str = "open-meteo";

const DAILY_VARIABLES: [&str; 7] = [
    "temperature_2m_max",
    "temperature_2m_min",
    "precipitation_sum",
    "precipitation_probability_max",
    "weather_code",
    "wind_speed_10m_max",
    "uv_index_max",
];

#[derive(Debug, Deserialize)]
struct OpenMeteoResponse {
    timezone: Option<String>,
    elevation: Option<f64>,
    #[serde(default)]
    daily: OpenMeteoDaily,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OpenMeteoDaily {
    time: Vec<String>,
    temperature_2m_max: Vec<Option<f64>>,
    temperature_2m_min: Vec<Option<f64>>,
    precipitation_sum: Vec<Option<f64>>,
    precipitation_probability_max: Vec<Option<f64>>,
    weather_code: Vec<Option<u16>>,
    wind_speed_10m_max: Vec<Option<f64>>,
    uv_index_max: Vec<Option<f64>>,
}

fn at<T: Copy>(values: &[Option<T>], index: usize) -> Option<T> {
    values.get(index).copied().flatten()
}

impl OpenMeteoDaily {
    fn day(&self, index: usize, date: &str) -> ForecastDay {
        let code = at(&self.weather_code, index).unwrap_or(0);

        ForecastDay {
            date: date.to_string(),
            temperature: Temperature {
                max: at(&self.temperature_2m_max, index),
                min: at(&self.temperature_2m_min, index),
                unit: "°C".to_string(),
            },
            precipitation: Precipitation {
                amount: at(&self.precipitation_sum, index).unwrap_or(0.0),
                probability: at(&self.precipitation_probability_max, index).unwrap_or(0.0),
                unit: "mm".to_string(),
            },
            conditions: Conditions {
                code,
                description: codes::describe(code).to_string(),
                icon: codes::icon(code).to_string(),
            },
            wind: Wind {
                speed: at(&self.wind_speed_10m_max, index),
                unit: "km/h".to_string(),
            },
            uv_index: at(&self.uv_index_max, index),
        }
    }
}

/// Open-Meteo implementation of [`WeatherProvider`]
#[derive(Debug)]
pub struct OpenMeteoProvider<C: HttpClientTrait> {
    client: Arc<C>,
    base_url: String,
}

impl<C: HttpClientTrait> OpenMeteoProvider<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn forecast_url(&self) -> String {
        format!("{}/forecast", self.base_url)
    }

    fn build_query(coordinates: Coordinates, days: u8) -> Vec<(String, String)> {
        vec![
            ("latitude".to_string(), coordinates.latitude.to_string()),
            ("longitude".to_string(), coordinates.longitude.to_string()),
            ("daily".to_string(), DAILY_VARIABLES.join(",")),
            ("timezone".to_string(), "auto".to_string()),
            (
                "forecast_days".to_string(),
                days.min(MAX_FORECAST_DAYS).to_string(),
            ),
        ]
    }

    fn reshape(coordinates: Coordinates, response: OpenMeteoResponse) -> Forecast {
        let days: Vec<ForecastDay> = response
            .daily
            .time
            .iter()
            .enumerate()
            .map(|(i, date)| response.daily.day(i, date))
            .collect();

        Forecast {
            location: ForecastLocation {
                latitude: coordinates.latitude,
                longitude: coordinates.longitude,
                timezone: response.timezone.unwrap_or_else(|| "Unknown".to_string()),
                elevation: response.elevation.unwrap_or(0.0),
                name: None,
            },
            summary: ForecastSummary::from_days(&days),
            forecast: days,
            generated_at: Utc::now(),
        }
    }
}

#[async_trait]
impl<C: HttpClientTrait + 'static> WeatherProvider for OpenMeteoProvider<C> {
    async fn get_forecast(
        &self,
        coordinates: Coordinates,
        days: u8,
    ) -> Result<Forecast, DomainError> {
        debug!(
            latitude = coordinates.latitude,
            longitude = coordinates.longitude,
            days,
            "Fetching forecast"
        );

        let body = self
            .client
            .get_json(&self.forecast_url(), &Self::build_query(coordinates, days))
            .await
            .map_err(|e| {
                warn!(error = %e, "Forecast request failed");
                match e {
                    DomainError::Provider { message, .. } => {
                        DomainError::provider(PROVIDER_NAME, format!("Weather API error: {}", message))
                    }
                    other => other,
                }
            })?;

        let response: OpenMeteoResponse = serde_json::from_value(body).map_err(|e| {
            DomainError::provider(PROVIDER_NAME, format!("Unexpected response shape: {}", e))
        })?;

        Ok(Self::reshape(coordinates, response))
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }
}
