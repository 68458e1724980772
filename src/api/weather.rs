//! Forecast endpoints

use axum::{extract::State, response::IntoResponse};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::api::middleware::{throttle_address, throttle_caller, ClientAddr, OptionalApiKey};
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, Path, Query};
use crate::domain::weather::{
    Coordinates, ExtremeEvents, Forecast, PrecipitationReport, DEFAULT_FORECAST_DAYS,
    PRESET_LOCATIONS,
};

fn default_days() -> u8 {
    DEFAULT_FORECAST_DAYS
}

#[derive(Debug, Deserialize)]
pub struct DaysParams {
    #[serde(default = "default_days")]
    pub days: u8,
}

#[derive(Debug, Deserialize)]
pub struct PrecipitationParams {
    pub lat: f64,
    pub lon: f64,
    #[serde(default = "default_days")]
    pub days: u8,
}

#[derive(Debug, Deserialize)]
pub struct LocationParams {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Serialize)]
pub struct ForecastResponse {
    pub success: bool,
    #[serde(flatten)]
    pub forecast: Forecast,
    pub authenticated: bool,
    pub tier: &'static str,
}

#[derive(Debug, Serialize)]
pub struct LocationForecastResponse {
    pub success: bool,
    #[serde(flatten)]
    pub forecast: Forecast,
}

#[derive(Debug, Serialize)]
pub struct ExtremeEventsResponse {
    pub success: bool,
    #[serde(flatten)]
    pub events: ExtremeEvents,
}

#[derive(Debug, Serialize)]
pub struct PresetsResponse {
    pub locations: PresetTable,
}

/// Preset cities as an object keyed by slug, in table order
#[derive(Debug)]
pub struct PresetTable;

impl Serialize for PresetTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(PRESET_LOCATIONS.len()))?;
        for (slug, location) in PRESET_LOCATIONS.iter() {
            map.serialize_entry(slug, location)?;
        }
        map.end()
    }
}

/// GET /forecast/{latitude}/{longitude}?days=
///
/// Open to anonymous callers; a presented key is throttled by its tier.
pub async fn forecast(
    State(state): State<AppState>,
    ClientAddr(addr): ClientAddr,
    OptionalApiKey(auth): OptionalApiKey,
    Path((latitude, longitude)): Path<(f64, f64)>,
    Query(params): Query<DaysParams>,
) -> Result<impl IntoResponse, ApiError> {
    let limits = throttle_caller(
        &state,
        "forecast",
        &auth,
        &addr,
        state.route_limits.forecast_per_minute,
    )
    .await?;

    let coordinates = Coordinates::new(latitude, longitude)?;
    let forecast = state.weather_service.forecast(coordinates, params.days).await?;

    Ok((
        limits,
        Json(ForecastResponse {
            success: true,
            forecast,
            authenticated: auth.is_authenticated(),
            tier: auth.tier_label(),
        }),
    ))
}

/// GET /api/precipitation?lat=&lon=&days=
pub async fn precipitation(
    State(state): State<AppState>,
    ClientAddr(addr): ClientAddr,
    Query(params): Query<PrecipitationParams>,
) -> Result<impl IntoResponse, ApiError> {
    let limits = throttle_address(
        &state,
        "precipitation",
        &addr,
        state.route_limits.precipitation_per_minute,
    )
    .await?;

    let coordinates = Coordinates::new(params.lat, params.lon)?;
    let report: PrecipitationReport = state
        .weather_service
        .precipitation(coordinates, params.days)
        .await?;

    Ok((limits, Json(report)))
}

/// GET /api/extreme-events?lat=&lon=
pub async fn extreme_events(
    State(state): State<AppState>,
    ClientAddr(addr): ClientAddr,
    Query(params): Query<LocationParams>,
) -> Result<impl IntoResponse, ApiError> {
    let limits = throttle_address(
        &state,
        "extreme_events",
        &addr,
        state.route_limits.extreme_events_per_minute,
    )
    .await?;

    let coordinates = Coordinates::new(params.lat, params.lon)?;
    let events = state.weather_service.extreme_events(coordinates).await?;

    Ok((
        limits,
        Json(ExtremeEventsResponse {
            success: true,
            events,
        }),
    ))
}

/// GET /api/presets
pub async fn presets() -> Json<PresetsResponse> {
    Json(PresetsResponse {
        locations: PresetTable,
    })
}

/// GET /api/location/{city}?days=
pub async fn location(
    State(state): State<AppState>,
    ClientAddr(addr): ClientAddr,
    Path(city): Path<String>,
    Query(params): Query<DaysParams>,
) -> Result<impl IntoResponse, ApiError> {
    let limits = throttle_address(
        &state,
        "location",
        &addr,
        state.route_limits.location_per_minute,
    )
    .await?;

    let forecast = state.weather_service.location(&city, params.days).await?;

    Ok((
        limits,
        Json(LocationForecastResponse {
            success: true,
            forecast,
        }),
    ))
}
