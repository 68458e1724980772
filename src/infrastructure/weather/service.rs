//! Weather service
//!
//! Route-facing operations on top of a [`WeatherProvider`].

use std::sync::Arc;

use tracing::debug;

use crate::domain::weather::{
    find_preset, preset_names, validate_forecast_days, Coordinates, ExtremeEvents, Forecast,
    PrecipitationReport, WeatherProvider, EXTREME_EVENT_DAYS,
};
use crate::domain::DomainError;

#[derive(Clone)]
pub struct WeatherService {
    provider: Arc<dyn WeatherProvider>,
}

impl std::fmt::Debug for WeatherService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherService")
            .field("provider", &self.provider.provider_name())
            .finish()
    }
}

impl WeatherService {
    pub fn new(provider: Arc<dyn WeatherProvider>) -> Self {
        Self { provider }
    }

    /// Full forecast for a coordinate pair
    pub async fn forecast(&self, coordinates: Coordinates, days: u8) -> Result<Forecast, DomainError> {
        let days = validate_forecast_days(days)?;
        self.provider.get_forecast(coordinates, days).await
    }

    /// Per-day precipitation view
    pub async fn precipitation(
        &self,
        coordinates: Coordinates,
        days: u8,
    ) -> Result<PrecipitationReport, DomainError> {
        let forecast = self.forecast(coordinates, days).await?;
        Ok(forecast.precipitation_report())
    }

    /// Alerts over the short-range forecast
    pub async fn extreme_events(&self, coordinates: Coordinates) -> Result<ExtremeEvents, DomainError> {
        let forecast = self.forecast(coordinates, EXTREME_EVENT_DAYS).await?;
        let events = forecast.extreme_events();

        debug!(alerts = events.alert_count, "Extreme event scan complete");
        Ok(events)
    }

    /// Forecast for a preset city, with the city's display name attached
    pub async fn location(&self, city: &str, days: u8) -> Result<Forecast, DomainError> {
        let preset = find_preset(city).ok_or_else(|| {
            DomainError::not_found(format!(
                "City '{}' not found. Available: {}",
                city,
                preset_names()
            ))
        })?;

        let coordinates = Coordinates::new(preset.lat, preset.lon)?;
        let mut forecast = self.forecast(coordinates, days).await?;
        forecast.location.name = Some(preset.name.to_string());

        Ok(forecast)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::weather::{AlertType, MockWeatherProvider};
    use mockall::predicate::eq;

    fn service_with(provider: MockWeatherProvider) -> WeatherService {
        WeatherService::new(Arc::new(provider))
    }

    #[tokio::test]
    async fn test_forecast_passes_days_through() {
        let mut provider = MockWeatherProvider::new();
        provider
            .expect_get_forecast()
            .with(mockall::predicate::always(), eq(5u8))
            .times(1)
            .returning(|c, _| Ok(fixtures::forecast(c, &[(0.0, 20.0, 0); 5])));

        let service = service_with(provider);
        let forecast = service
            .forecast(Coordinates::new(10.0, 10.0).unwrap(), 5)
            .await
            .unwrap();

        assert_eq!(forecast.forecast.len(), 5);
    }

    #[tokio::test]
    async fn test_forecast_rejects_out_of_range_days() {
        let mut provider = MockWeatherProvider::new();
        provider.expect_get_forecast().never();

        let service = service_with(provider);
        let coordinates = Coordinates::new(10.0, 10.0).unwrap();

        assert!(matches!(
            service.forecast(coordinates, 0).await,
            Err(DomainError::Validation { .. })
        ));
        assert!(matches!(
            service.forecast(coordinates, 17).await,
            Err(DomainError::Validation { .. })
        ));
    }

    #[tokio::test]
    async fn test_extreme_events_scans_seven_days() {
        let mut provider = MockWeatherProvider::new();
        provider
            .expect_get_forecast()
            .with(mockall::predicate::always(), eq(EXTREME_EVENT_DAYS))
            .returning(|c, _| {
                Ok(fixtures::forecast(
                    c,
                    &[
                        (60.0, 25.0, 63),
                        (0.0, 42.0, 0),
                        (5.0, 30.0, 95),
                        (0.0, 20.0, 0),
                        (0.0, 20.0, 0),
                        (0.0, 20.0, 0),
                        (0.0, 20.0, 0),
                    ],
                ))
            });

        let service = service_with(provider);
        let events = service
            .extreme_events(Coordinates::new(10.0, 10.0).unwrap())
            .await
            .unwrap();

        assert_eq!(events.checked_days, 7);
        assert_eq!(events.alert_count, 3);
        assert_eq!(events.alerts[0].alert_type, AlertType::HeavyPrecipitation);
        assert_eq!(events.alerts[1].alert_type, AlertType::ExtremeHeat);
        assert_eq!(events.alerts[2].alert_type, AlertType::Thunderstorm);
    }

    #[tokio::test]
    async fn test_precipitation_report() {
        let mut provider = MockWeatherProvider::new();
        provider
            .expect_get_forecast()
            .returning(|c, _| Ok(fixtures::forecast(c, &[(1.5, 20.0, 61), (0.0, 20.0, 0)])));

        let service = service_with(provider);
        let report = service
            .precipitation(Coordinates::new(10.0, 10.0).unwrap(), 2)
            .await
            .unwrap();

        assert_eq!(report.precipitation.len(), 2);
        assert_eq!(report.precipitation[0].precipitation_mm, 1.5);
        assert_eq!(report.summary.total_mm, 1.5);
        assert_eq!(report.summary.rainy_days, 1);
    }

    #[tokio::test]
    async fn test_location_attaches_name() {
        let mut provider = MockWeatherProvider::new();
        provider
            .expect_get_forecast()
            .returning(|c, _| Ok(fixtures::forecast(c, &[(0.0, 20.0, 0)])));

        let service = service_with(provider);
        let forecast = service.location("Tokyo", 1).await.unwrap();

        assert_eq!(forecast.location.name.as_deref(), Some("Tokyo, Japan"));
        assert_eq!(forecast.location.latitude, 35.6762);
    }

    #[tokio::test]
    async fn test_unknown_location_lists_presets() {
        let mut provider = MockWeatherProvider::new();
        provider.expect_get_forecast().never();

        let service = service_with(provider);
        let result = service.location("atlantis", 15).await;

        match result {
            Err(DomainError::NotFound { message }) => {
                assert!(message.contains("atlantis"));
                assert!(message.contains("delhi, mumbai"));
            }
            other => panic!("expected not found, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_provider_errors_propagate() {
        let mut provider = MockWeatherProvider::new();
        provider
            .expect_get_forecast()
            .returning(|_, _| Err(DomainError::provider("open-meteo", "timeout")));

        let service = service_with(provider);
        let result = service.forecast(Coordinates::new(0.0, 0.0).unwrap(), 3).await;

        assert!(matches!(result, Err(DomainError::Provider { .. })));
    }
}
