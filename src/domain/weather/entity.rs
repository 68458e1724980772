//! Forecast entities returned to clients

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Maximum number of days the upstream provider can forecast
pub const MAX_FORECAST_DAYS: u8 = 16;

/// Default forecast length when the client does not ask for one
pub const DEFAULT_FORECAST_DAYS: u8 = 15;

/// Days scanned when looking for extreme events
pub const EXTREME_EVENT_DAYS: u8 = 7;

/// Model label reported in summaries and health output
pub const MODEL_LABEL: &str = "NeuralGCM-inspired + Open-Meteo";

/// A validated latitude/longitude pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, DomainError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(DomainError::validation("Latitude must be between -90 and 90"));
        }

        if !(-180.0..=180.0).contains(&longitude) {
            return Err(DomainError::validation(
                "Longitude must be between -180 and 180",
            ));
        }

        Ok(Self {
            latitude,
            longitude,
        })
    }
}

/// Validate a requested number of forecast days
pub fn validate_forecast_days(days: u8) -> Result<u8, DomainError> {
    if days == 0 || days > MAX_FORECAST_DAYS {
        return Err(DomainError::validation(format!(
            "days must be between 1 and {}",
            MAX_FORECAST_DAYS
        )));
    }

    Ok(days)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: String,
    pub elevation: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Temperature {
    pub max: Option<f64>,
    pub min: Option<f64>,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Precipitation {
    pub amount: f64,
    pub probability: f64,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conditions {
    pub code: u16,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    pub speed: Option<f64>,
    pub unit: String,
}

/// One forecast day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    pub date: String,
    pub temperature: Temperature,
    pub precipitation: Precipitation,
    pub conditions: Conditions,
    pub wind: Wind,
    pub uv_index: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSummary {
    pub total_precipitation_mm: f64,
    pub rainy_days: usize,
    pub forecast_days: usize,
    pub ai_enhanced: bool,
    pub model: String,
}

impl ForecastSummary {
    /// Rainfall above this amount counts as a rainy day
    pub const RAINY_DAY_THRESHOLD_MM: f64 = 0.1;

    pub fn from_days(days: &[ForecastDay]) -> Self {
        let total: f64 = days.iter().map(|d| d.precipitation.amount).sum();
        let rainy_days = days
            .iter()
            .filter(|d| d.precipitation.amount > Self::RAINY_DAY_THRESHOLD_MM)
            .count();

        Self {
            total_precipitation_mm: (total * 10.0).round() / 10.0,
            rainy_days,
            forecast_days: days.len(),
            ai_enhanced: true,
            model: MODEL_LABEL.to_string(),
        }
    }
}

/// Reshaped multi-day forecast for a location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub location: ForecastLocation,
    pub forecast: Vec<ForecastDay>,
    pub summary: ForecastSummary,
    pub generated_at: DateTime<Utc>,
}

impl Forecast {
    /// Precipitation-only view of the forecast
    pub fn precipitation_report(&self) -> PrecipitationReport {
        let precipitation = self
            .forecast
            .iter()
            .map(|day| PrecipitationDay {
                date: day.date.clone(),
                precipitation_mm: day.precipitation.amount,
                probability_percent: day.precipitation.probability,
                conditions: day.conditions.description.clone(),
                icon: day.conditions.icon.clone(),
            })
            .collect();

        PrecipitationReport {
            location: self.location.clone(),
            precipitation,
            summary: PrecipitationSummary {
                total_mm: self.summary.total_precipitation_mm,
                rainy_days: self.summary.rainy_days,
            },
        }
    }

    /// Scan every day of the forecast for alert conditions
    pub fn extreme_events(&self) -> ExtremeEvents {
        let alerts: Vec<WeatherAlert> = self.forecast.iter().flat_map(alerts_for_day).collect();

        ExtremeEvents {
            location: self.location.clone(),
            alert_count: alerts.len(),
            alerts,
            checked_days: self.forecast.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrecipitationDay {
    pub date: String,
    pub precipitation_mm: f64,
    pub probability_percent: f64,
    pub conditions: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrecipitationSummary {
    pub total_mm: f64,
    pub rainy_days: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrecipitationReport {
    pub location: ForecastLocation,
    pub precipitation: Vec<PrecipitationDay>,
    pub summary: PrecipitationSummary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertType {
    HeavyPrecipitation,
    ExtremeHeat,
    Thunderstorm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertSeverity {
    Moderate,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherAlert {
    pub date: String,
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    pub severity: AlertSeverity,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtremeEvents {
    pub location: ForecastLocation,
    pub alerts: Vec<WeatherAlert>,
    pub alert_count: usize,
    pub checked_days: usize,
}

const HEAVY_PRECIPITATION_MM: f64 = 20.0;
const SEVERE_PRECIPITATION_MM: f64 = 50.0;
const EXTREME_HEAT_CELSIUS: f64 = 40.0;

fn alerts_for_day(day: &ForecastDay) -> Vec<WeatherAlert> {
    let mut alerts = Vec::new();
    let precip = day.precipitation.amount;

    if precip > HEAVY_PRECIPITATION_MM {
        alerts.push(WeatherAlert {
            date: day.date.clone(),
            alert_type: AlertType::HeavyPrecipitation,
            severity: if precip > SEVERE_PRECIPITATION_MM {
                AlertSeverity::High
            } else {
                AlertSeverity::Moderate
            },
            message: format!("Heavy precipitation expected: {}mm", precip),
        });
    }

    if let Some(max) = day.temperature.max.filter(|t| *t > EXTREME_HEAT_CELSIUS) {
        alerts.push(WeatherAlert {
            date: day.date.clone(),
            alert_type: AlertType::ExtremeHeat,
            severity: AlertSeverity::High,
            message: format!("Extreme heat warning: {}°C", max),
        });
    }

    if matches!(day.conditions.code, 95 | 96 | 99) {
        alerts.push(WeatherAlert {
            date: day.date.clone(),
            alert_type: AlertType::Thunderstorm,
            severity: if day.conditions.code == 99 {
                AlertSeverity::High
            } else {
                AlertSeverity::Moderate
            },
            message: day.conditions.description.clone(),
        });
    }

    alerts
}
