use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use super::middleware::{logging_middleware, metrics_middleware, security_headers_middleware};
use super::state::AppState;
use super::{frontend, health, keys, weather};

/// Create the full router with application state
pub fn create_router(state: AppState) -> Router {
    let static_files = ServeDir::new(state.static_dir.as_path());

    Router::new()
        // Frontend
        .route("/", get(frontend::index))
        .nest_service("/static", static_files)
        // Health endpoints
        .route("/health", get(health::health_check))
        .route("/live", get(health::live_check))
        // Key management
        .route("/api/register", post(keys::register))
        .route("/api/key-info", get(keys::key_info))
        // Weather
        .route("/forecast/{latitude}/{longitude}", get(weather::forecast))
        .route("/api/precipitation", get(weather::precipitation))
        .route("/api/extreme-events", get(weather::extreme_events))
        .route("/api/presets", get(weather::presets))
        .route("/api/location/{city}", get(weather::location))
        .route_layer(middleware::from_fn(metrics_middleware))
        .with_state(state)
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(middleware::from_fn(logging_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::extract::ConnectInfo;
    use axum::http::{header, HeaderMap, Method, Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::domain::weather::MockWeatherProvider;
    use crate::domain::DomainError;
    use crate::infrastructure::api_key::{
        ApiKeyService, KeyStore, RateLimiter, DEMO_FREE_KEY, DEMO_PRO_KEY,
    };
    use crate::infrastructure::weather::{fixtures, WeatherService};

    fn sunny_provider() -> MockWeatherProvider {
        let mut provider = MockWeatherProvider::new();
        provider
            .expect_get_forecast()
            .returning(|c, days| Ok(fixtures::forecast(c, &vec![(0.0, 20.0, 0); days as usize])));
        provider.expect_provider_name().return_const("mock");
        provider
    }

    fn create_app(provider: MockWeatherProvider) -> Router {
        create_app_with(provider, |state| state)
    }

    fn create_app_with(
        provider: MockWeatherProvider,
        configure: impl FnOnce(AppState) -> AppState,
    ) -> Router {
        let key_store: Arc<dyn KeyStore> = Arc::new(ApiKeyService::initialize());
        let state = AppState::new(
            key_store,
            Arc::new(RateLimiter::new()),
            WeatherService::new(Arc::new(provider)),
        )
        .with_static_dir("static-dir-that-does-not-exist");

        create_router(configure(state))
    }

    fn get_request(uri: &str) -> axum::http::request::Builder {
        Request::builder().method(Method::GET).uri(uri)
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, HeaderMap, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        (status, headers, body)
    }

    async fn register(app: &Router, name: &str) -> Value {
        let request = Request::builder()
            .method(Method::POST)
            .uri(format!("/api/register?name={}", name))
            .body(Body::empty())
            .unwrap();

        let (status, _, body) = send(app, request).await;
        assert_eq!(status, StatusCode::OK);
        body
    }

    #[tokio::test]
    async fn test_health() {
        let app = create_app(sunny_provider());

        let (status, _, body) = send(&app, get_request("/health").body(Body::empty()).unwrap()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["pricing"]["pro"], "300 req/min - $99/mo");
    }

    #[tokio::test]
    async fn test_live() {
        let app = create_app(sunny_provider());

        let (status, _, _) = send(&app, get_request("/live").body(Body::empty()).unwrap()).await;

        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_index_without_frontend() {
        let app = create_app(sunny_provider());

        let (status, headers, body) = send(&app, get_request("/").body(Body::empty()).unwrap()).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Frontend not found");
        assert_eq!(headers[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
    }

    #[tokio::test]
    async fn test_register_issues_free_key() {
        let app = create_app(sunny_provider());

        let body = register(&app, "Acme").await;

        assert_eq!(body["success"], true);
        assert_eq!(body["name"], "Acme");
        assert_eq!(body["tier"], "free");
        assert_eq!(body["rate_limit"], 10);
        assert!(body["api_key"].as_str().unwrap().starts_with("ngcm_"));
    }

    #[tokio::test]
    async fn test_register_requires_name() {
        let app = create_app(sunny_provider());

        for uri in ["/api/register", "/api/register?name=%20%20"] {
            let request = Request::builder()
                .method(Method::POST)
                .uri(uri)
                .body(Body::empty())
                .unwrap();

            let (status, _, body) = send(&app, request).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["error"]["param"], "name");
        }
    }

    fn register_from(peer: [u8; 4], forwarded_for: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method(Method::POST)
            .uri("/api/register?name=bot")
            .extension(ConnectInfo(SocketAddr::from((peer, 40000))));

        if let Some(value) = forwarded_for {
            builder = builder.header("x-forwarded-for", value);
        }

        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_register_is_throttled_per_peer() {
        let app = create_app(sunny_provider());

        for _ in 0..10 {
            let (status, _, _) = send(&app, register_from([198, 51, 100, 1], None)).await;
            assert_eq!(status, StatusCode::OK);
        }

        let (status, headers, _) = send(&app, register_from([198, 51, 100, 1], None)).await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert!(headers.contains_key(header::RETRY_AFTER));

        let (status, _, _) = send(&app, register_from([198, 51, 100, 2], None)).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_rotating_forwarded_for_does_not_reset_register_limit() {
        let app = create_app(sunny_provider());
        let mut admitted = 0;

        for i in 0..50 {
            let forwarded = format!("10.0.0.{}", i);
            let request = register_from([203, 0, 113, 9], Some(&forwarded));
            let (status, _, _) = send(&app, request).await;
            if status == StatusCode::OK {
                admitted += 1;
            } else {
                assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
            }
        }

        assert_eq!(admitted, 10);
    }

    #[tokio::test]
    async fn test_trusted_forwarded_for_identifies_client() {
        let app = create_app_with(sunny_provider(), |state| state.with_trust_forwarded_for(true));

        for _ in 0..10 {
            let request = register_from([10, 0, 0, 1], Some("198.51.100.7"));
            let (status, _, _) = send(&app, request).await;
            assert_eq!(status, StatusCode::OK);
        }

        let (status, _, _) = send(&app, register_from([10, 0, 0, 1], Some("198.51.100.7"))).await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);

        let (status, _, _) = send(&app, register_from([10, 0, 0, 1], Some("198.51.100.8"))).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_key_info_with_issued_key() {
        let app = create_app(sunny_provider());
        let issued = register(&app, "Acme").await;
        let secret = issued["api_key"].as_str().unwrap();

        let request = get_request("/api/key-info")
            .header("x-api-key", secret)
            .body(Body::empty())
            .unwrap();
        let (status, headers, body) = send(&app, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["key_info"]["name"], "Acme");
        assert_eq!(body["key_info"]["tier"], "free");
        assert_eq!(body["key_info"]["rate_limit"], 10);
        assert!(!body.to_string().contains(secret));
        assert_eq!(headers["x-ratelimit-limit"], "10");
        assert_eq!(headers["x-ratelimit-remaining"], "9");
    }

    #[tokio::test]
    async fn test_key_info_requires_key() {
        let app = create_app(sunny_provider());

        let (status, _, body) =
            send(&app, get_request("/api/key-info").body(Body::empty()).unwrap()).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["type"], "authentication_error");
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("demo-free-key-2026"));
    }

    #[tokio::test]
    async fn test_key_info_rejects_unknown_key() {
        let app = create_app(sunny_provider());

        let request = get_request("/api/key-info")
            .header("x-api-key", "ngcm_not-a-real-key")
            .body(Body::empty())
            .unwrap();
        let (status, _, body) = send(&app, request).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "invalid_api_key");
    }

    #[tokio::test]
    async fn test_demo_free_key_is_limited_to_ten_per_minute() {
        let app = create_app(sunny_provider());
        let request = || {
            get_request("/api/key-info")
                .header("x-api-key", DEMO_FREE_KEY)
                .body(Body::empty())
                .unwrap()
        };

        for _ in 0..10 {
            let (status, _, _) = send(&app, request()).await;
            assert_eq!(status, StatusCode::OK);
        }

        let (status, headers, body) = send(&app, request()).await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(body["error"]["type"], "rate_limit_error");
        assert!(headers.contains_key(header::RETRY_AFTER));
    }

    #[tokio::test]
    async fn test_forecast_anonymous() {
        let app = create_app(sunny_provider());

        let (status, headers, body) = send(
            &app,
            get_request("/forecast/28.6139/77.209").body(Body::empty()).unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["authenticated"], false);
        assert_eq!(body["tier"], "public");
        assert_eq!(body["forecast"].as_array().unwrap().len(), 15);
        assert_eq!(body["location"]["latitude"], 28.6139);
        assert_eq!(headers["x-ratelimit-limit"], "30");
    }

    #[tokio::test]
    async fn test_forecast_with_demo_pro_key() {
        let app = create_app(sunny_provider());

        let request = get_request("/forecast/51.5/-0.12?days=3")
            .header("x-api-key", DEMO_PRO_KEY)
            .body(Body::empty())
            .unwrap();
        let (status, headers, body) = send(&app, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["authenticated"], true);
        assert_eq!(body["tier"], "demo-pro");
        assert_eq!(body["forecast"].as_array().unwrap().len(), 3);
        assert_eq!(headers["x-ratelimit-limit"], "100");
    }

    #[tokio::test]
    async fn test_forecast_with_invalid_key() {
        let app = create_app(sunny_provider());

        let request = get_request("/forecast/0/0")
            .header("x-api-key", "wrong")
            .body(Body::empty())
            .unwrap();
        let (status, _, _) = send(&app, request).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_forecast_validates_input() {
        let app = create_app(sunny_provider());

        for uri in [
            "/forecast/95/0",
            "/forecast/0/181",
            "/forecast/north/0",
            "/forecast/0/0?days=0",
            "/forecast/0/0?days=17",
        ] {
            let (status, _, body) = send(&app, get_request(uri).body(Body::empty()).unwrap()).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
            assert_eq!(body["error"]["type"], "invalid_request_error", "{}", uri);
        }
    }

    #[tokio::test]
    async fn test_upstream_failure_is_bad_gateway() {
        let mut provider = MockWeatherProvider::new();
        provider
            .expect_get_forecast()
            .returning(|_, _| Err(DomainError::provider("open-meteo", "HTTP 503")));
        let app = create_app(provider);

        let (status, _, body) = send(
            &app,
            get_request("/forecast/10/10").body(Body::empty()).unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"]["type"], "upstream_error");
    }

    #[tokio::test]
    async fn test_precipitation() {
        let app = create_app(sunny_provider());

        let (status, headers, body) = send(
            &app,
            get_request("/api/precipitation?lat=19.07&lon=72.87&days=5")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["precipitation"].as_array().unwrap().len(), 5);
        assert_eq!(body["summary"]["rainy_days"], 0);
        assert_eq!(headers["x-ratelimit-limit"], "30");
    }

    #[tokio::test]
    async fn test_precipitation_requires_coordinates() {
        let app = create_app(sunny_provider());

        let (status, _, _) = send(
            &app,
            get_request("/api/precipitation?lat=19.07").body(Body::empty()).unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_extreme_events_are_throttled_per_address() {
        let app = create_app(sunny_provider());
        let request = |peer: [u8; 4]| {
            get_request("/api/extreme-events?lat=25.59&lon=85.13")
                .extension(ConnectInfo(SocketAddr::from((peer, 40000))))
                .body(Body::empty())
                .unwrap()
        };

        for _ in 0..20 {
            let (status, _, body) = send(&app, request([203, 0, 113, 9])).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["checked_days"], 7);
        }

        let (status, _, _) = send(&app, request([203, 0, 113, 9])).await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);

        let (status, _, _) = send(&app, request([203, 0, 113, 10])).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_presets() {
        let app = create_app(sunny_provider());

        let (status, _, body) =
            send(&app, get_request("/api/presets").body(Body::empty()).unwrap()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["locations"].as_object().unwrap().len(), 10);
        assert_eq!(body["locations"]["newyork"]["name"], "New York, USA");
    }

    #[tokio::test]
    async fn test_location() {
        let app = create_app(sunny_provider());

        let (status, _, body) = send(
            &app,
            get_request("/api/location/Sydney?days=2").body(Body::empty()).unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["location"]["name"], "Sydney, Australia");
        assert_eq!(body["forecast"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_location() {
        let app = create_app(sunny_provider());

        let (status, _, body) = send(
            &app,
            get_request("/api/location/atlantis").body(Body::empty()).unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("Available: delhi"));
    }

    #[tokio::test]
    async fn test_cors_preflight() {
        let app = create_app(sunny_provider());

        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/presets")
            .header(header::ORIGIN, "https://example.com")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
            .body(Body::empty())
            .unwrap();
        let (status, headers, _) = send(&app, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }
}
