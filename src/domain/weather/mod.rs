//! Weather domain
//!
//! Forecast entities, WMO code tables, preset locations and the provider trait.

pub mod codes;
mod entity;
mod presets;
mod provider;

pub use entity::{
    validate_forecast_days, AlertSeverity, AlertType, Conditions, Coordinates, ExtremeEvents,
    Forecast, ForecastDay, ForecastLocation, ForecastSummary, Precipitation, PrecipitationDay,
    PrecipitationReport, PrecipitationSummary, Temperature, WeatherAlert, Wind,
    DEFAULT_FORECAST_DAYS, EXTREME_EVENT_DAYS, MAX_FORECAST_DAYS, MODEL_LABEL,
};
pub use presets::{find_preset, preset_names, PresetLocation, PRESET_LOCATIONS};
#[cfg(test)]
pub use provider::MockWeatherProvider;
pub use provider::WeatherProvider;
