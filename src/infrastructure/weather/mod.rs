//! Weather data retrieval
//!
//! HTTP plumbing and the Open-Meteo provider behind the domain
//! [`WeatherProvider`](crate::domain::weather::WeatherProvider) trait.

mod http_client;
mod open_meteo;
mod service;

pub use http_client::{HttpClient, HttpClientTrait};
pub use open_meteo::{OpenMeteoProvider, DEFAULT_BASE_URL};
pub use service::WeatherService;

#[cfg(test)]
pub use http_client::mock::MockHttpClient;
#[cfg(test)]
pub use service::fixtures;
