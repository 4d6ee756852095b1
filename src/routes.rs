use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    config::Config,
    error::AppError,
    forecast::{LocationQuery, WeatherProvider},
    models::{EarthquakesResponse, WeatherResponse},
    seismic::{SeismicQuery, UsgsClient},
};

// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// `None` when the selected provider has no API key.
    pub weather_provider: Option<Arc<dyn WeatherProvider>>,
    pub seismic_client: Arc<UsgsClient>,
}

#[derive(Debug, Default, Deserialize)]
pub struct WeatherRequest {
    pub city: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub version: String,
    pub provider: String,
    /// False when the configured provider has no API key.
    pub provider_ready: bool,
}

// Route handlers
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        provider: state.config.weather_provider.to_string(),
        provider_ready: state.weather_provider.is_some(),
    })
}

pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

pub async fn get_weather(
    State(state): State<AppState>,
    payload: Result<Json<WeatherRequest>, JsonRejection>,
) -> Result<Json<WeatherResponse>, AppError> {
    match fetch_weather(&state, payload).await {
        Ok(response) => Ok(Json(response)),
        Err(e) => {
            tracing::error!("Weather request failed: {}", e);
            Err(e)
        }
    }
}

async fn fetch_weather(
    state: &AppState,
    payload: Result<Json<WeatherRequest>, JsonRejection>,
) -> Result<WeatherResponse, AppError> {
    let provider = state
        .weather_provider
        .as_ref()
        .ok_or(AppError::MissingApiKey)?;
    let Json(request) = payload.map_err(|e| AppError::InvalidBody(e.body_text()))?;

    tracing::info!(
        "Weather request received: city={:?} lat={:?} lon={:?}",
        request.city,
        request.lat,
        request.lon
    );

    let location = LocationQuery::from_parts(request.city.as_deref(), request.lat, request.lon)?;
    provider.resolve(&location).await
}

pub async fn get_earthquakes(
    State(state): State<AppState>,
    payload: Result<Json<SeismicQuery>, JsonRejection>,
) -> Result<Json<EarthquakesResponse>, AppError> {
    match fetch_earthquakes(&state, payload).await {
        Ok(response) => Ok(Json(response)),
        Err(e) => {
            tracing::error!("Earthquake request failed: {}", e);
            Err(e)
        }
    }
}

async fn fetch_earthquakes(
    state: &AppState,
    payload: Result<Json<SeismicQuery>, JsonRejection>,
) -> Result<EarthquakesResponse, AppError> {
    let Json(query) = payload.map_err(|e| AppError::InvalidBody(e.body_text()))?;
    tracing::info!(
        "Earthquake request received: lat={:?} lon={:?} radius={:?}",
        query.lat,
        query.lon,
        query.radius
    );

    let earthquakes = state.seismic_client.recent_earthquakes(&query).await?;
    tracing::info!("Found {} earthquakes", earthquakes.len());
    Ok(EarthquakesResponse { earthquakes })
}

// Create the router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/weather", post(get_weather).options(preflight))
        .route("/get-weather", post(get_weather).options(preflight))
        .route("/earthquakes", post(get_earthquakes).options(preflight))
        .route("/get-earthquakes", post(get_earthquakes).options(preflight))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::{provider_from_config, ProviderId};
    use axum::response::IntoResponse;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn state_for(config: Config) -> AppState {
        AppState {
            weather_provider: provider_from_config(&config).ok(),
            seismic_client: Arc::new(UsgsClient::new(&config).unwrap()),
            config: Arc::new(config),
        }
    }

    fn weatherstack_config(server: &MockServer) -> Config {
        let mut config = Config::default();
        config.weather_provider = ProviderId::Weatherstack;
        config.weatherstack_api_key = Some("KEY".to_string());
        config.weatherstack_base_url = server.uri();
        config.open_meteo_geocoding_url = server.uri();
        config.openweather_base_url = server.uri();
        config.usgs_base_url = server.uri();
        config
    }

    fn body(request: serde_json::Value) -> Result<Json<WeatherRequest>, JsonRejection> {
        Ok(Json(serde_json::from_value(request).unwrap()))
    }

    async fn error_message(err: AppError) -> (StatusCode, String) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        (status, json["error"].as_str().unwrap_or_default().to_string())
    }

    #[tokio::test]
    async fn test_weather_by_city_end_to_end() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [{"name": "San Francisco", "latitude": 37.77, "longitude": -122.42}]
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/current"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "location": {"name": "San Francisco", "country": "United States of America", "lat": "37.775", "lon": "-122.418", "utc_offset": "-8.0"},
                "current": {
                    "temperature": 18,
                    "feelslike": 16,
                    "weather_code": 116,
                    "weather_icons": ["https://example.com/partly-cloudy.png"],
                    "weather_descriptions": ["Partly cloudy"],
                    "wind_speed": 15,
                    "pressure": 1013,
                    "humidity": 72,
                    "visibility": 10
                }
            })))
            .mount(&server)
            .await;

        let state = state_for(weatherstack_config(&server));
        let Json(response) = get_weather(State(state), body(json!({"city": "San Francisco"})))
            .await
            .unwrap();

        assert_eq!(response.current.temperature, 18);
        assert_eq!(response.current.humidity, 72);
        assert_eq!(response.hourly.len(), 8);
        assert_eq!(response.weekly.len(), 7);
        assert!(response.alerts.is_empty());
    }

    #[tokio::test]
    async fn test_weather_without_location_fails_before_upstream() {
        let server = MockServer::start().await;

        // Any upstream call would violate the expectation below
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let state = state_for(weatherstack_config(&server));
        let err = get_weather(State(state), body(json!({}))).await.unwrap_err();
        assert!(matches!(err, AppError::MissingLocation));

        let (status, message) = error_message(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(message, "Either coordinates (lat, lon) or city name is required");
    }

    #[tokio::test]
    async fn test_weather_without_api_key() {
        let server = MockServer::start().await;
        let mut config = weatherstack_config(&server);
        config.weatherstack_api_key = None;

        let state = state_for(config);
        let err = get_weather(State(state), body(json!({"city": "Paris"}))).await.unwrap_err();

        let (_, message) = error_message(err).await;
        assert_eq!(message, "Weather API key not configured");
    }

    #[tokio::test]
    async fn test_weather_alert_failure_still_succeeds() {
        let server = MockServer::start().await;
        let mut config = weatherstack_config(&server);
        config.weather_provider = ProviderId::OpenWeather;
        config.openweather_api_key = Some("KEY".to_string());

        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "coord": {"lon": 2.35, "lat": 48.85},
                "weather": [{"description": "clear sky", "icon": "01d"}],
                "main": {"temp": 21.2, "feels_like": 20.8, "pressure": 1020, "humidity": 40},
                "visibility": 10000,
                "wind": {"speed": 3.0},
                "sys": {"country": "FR", "sunrise": 1735196400, "sunset": 1735226400},
                "timezone": 3600,
                "name": "Paris"
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "list": [
                    {"dt": 1735203600, "main": {"temp": 20.0, "feels_like": 19.0}, "weather": [{"description": "clear sky", "icon": "01d"}]},
                    {"dt": 1735214400, "main": {"temp": 22.6, "feels_like": 21.0}, "weather": [{"description": "few clouds", "icon": "02d"}]}
                ],
                "city": {"name": "Paris", "country": "FR", "timezone": 3600}
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/data/3.0/onecall"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
            .mount(&server)
            .await;

        let state = state_for(config);
        let Json(response) = get_weather(State(state), body(json!({"lat": 48.85, "lon": 2.35})))
            .await
            .unwrap();

        assert!(response.alerts.is_empty());
        assert_eq!(response.current.city, "Paris");
        assert_eq!(response.current.condition, "sunny");
        assert_eq!(response.current.wind_speed, 11);
        assert_eq!(response.current.visibility, 10);
        assert_eq!(response.hourly.len(), 2);
        assert_eq!(response.weekly.len(), 1);
        assert_eq!(response.weekly[0].min_temp, 20);
        assert_eq!(response.weekly[0].max_temp, 23);
    }

    #[tokio::test]
    async fn test_earthquakes_end_to_end() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/fdsnws/event/1/query"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "type": "FeatureCollection",
                "features": [{
                    "id": "ci40000001",
                    "geometry": {"coordinates": [-118.25, 34.05, 11.3]},
                    "properties": {"mag": 2.9, "place": "Los Angeles", "time": 1735200000000_i64, "tsunami": 0, "sig": 129}
                }]
            })))
            .mount(&server)
            .await;

        let state = state_for(weatherstack_config(&server));
        let query = SeismicQuery {
            lat: Some(34.0),
            lon: Some(-118.2),
            radius: Some(100.0),
        };

        let Json(response) = get_earthquakes(State(state), Ok(Json(query))).await.unwrap();
        assert_eq!(response.earthquakes.len(), 1);
        assert_eq!(response.earthquakes[0].lat, 34.05);
        assert_eq!(response.earthquakes[0].lon, -118.25);
        assert!(response.earthquakes[0].alert.is_none());

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["earthquakes"][0]["significance"], 129);
    }

    #[tokio::test]
    async fn test_earthquake_upstream_failure_is_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/fdsnws/event/1/query"))
            .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
            .mount(&server)
            .await;

        let state = state_for(weatherstack_config(&server));
        let err = get_earthquakes(State(state), Ok(Json(SeismicQuery::default())))
            .await
            .unwrap_err();

        let (status, message) = error_message(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(message.starts_with("USGS API error"));
    }

    #[tokio::test]
    async fn test_health_reports_configured_provider() {
        let server = MockServer::start().await;

        let Json(ready) = health(State(state_for(weatherstack_config(&server)))).await;
        assert_eq!(ready.status, "healthy");
        assert_eq!(ready.provider, "weatherstack");
        assert!(ready.provider_ready);

        let mut config = weatherstack_config(&server);
        config.weatherstack_api_key = None;
        let Json(unready) = health(State(state_for(config))).await;
        assert_eq!(unready.provider, "weatherstack");
        assert!(!unready.provider_ready);

        let json = serde_json::to_value(&unready).unwrap();
        assert_eq!(json["providerReady"], false);
    }

    #[tokio::test]
    async fn test_preflight_is_empty_ok() {
        assert_eq!(preflight().await, StatusCode::OK);
    }
}
