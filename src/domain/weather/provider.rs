//! Weather provider trait

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use super::entity::{Coordinates, Forecast};
use crate::domain::DomainError;

/// Upstream source of forecast data
#[cfg_attr(test, automock)]
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Fetch and reshape a forecast of `days` days for the given coordinates
    async fn get_forecast(&self, coordinates: Coordinates, days: u8)
        -> Result<Forecast, DomainError>;

    /// Short name of the provider, used in logs and errors
    fn provider_name(&self) -> &'static str;
}
