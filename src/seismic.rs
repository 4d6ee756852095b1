//! USGS earthquake feed client.
//!
//! Queries the FDSN event service for the past day of events at or above
//! magnitude 2.5, optionally restricted to a radius around a point, and maps
//! each GeoJSON feature onto [`SeismicEvent`].

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use reqwest::Client;
use serde::Deserialize;

use crate::config::Config;
use crate::error::AppError;
use crate::forecast::http_client;
use crate::models::{AlertLevel, SeismicEvent};
use crate::utils::validate_coordinates;

const QUERY_PATH: &str = "/fdsnws/event/1/query";
pub const DEFAULT_RADIUS_KM: f64 = 500.0;
pub const MIN_MAGNITUDE: f64 = 2.5;
pub const MAX_RESULTS: u32 = 20;
pub const WINDOW_HOURS: i64 = 24;

/// Request body of the earthquakes endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeismicQuery {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    /// Kilometers.
    pub radius: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    #[serde(default)]
    id: String,
    geometry: Option<Geometry>,
    #[serde(default)]
    properties: Properties,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    /// [longitude, latitude, depth_km]
    #[serde(default)]
    coordinates: Vec<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct Properties {
    mag: Option<f64>,
    place: Option<String>,
    time: Option<i64>,
    url: Option<String>,
    tsunami: Option<i64>,
    alert: Option<String>,
    sig: Option<i32>,
}

impl From<&Feature> for SeismicEvent {
    fn from(feature: &Feature) -> Self {
        let coordinate = |index: usize| {
            feature
                .geometry
                .as_ref()
                .and_then(|g| g.coordinates.get(index))
                .copied()
                .unwrap_or(0.0)
        };
        let props = &feature.properties;

        Self {
            id: feature.id.clone(),
            magnitude: props.mag.unwrap_or_default(),
            place: props.place.clone().unwrap_or_default(),
            time: props.time.unwrap_or_default(),
            depth: coordinate(2),
            lat: coordinate(1),
            lon: coordinate(0),
            url: props.url.clone().unwrap_or_default(),
            tsunami: props.tsunami == Some(1),
            alert: props.alert.as_deref().and_then(parse_alert_level),
            significance: props.sig.unwrap_or_default(),
        }
    }
}

fn parse_alert_level(level: &str) -> Option<AlertLevel> {
    match level.to_lowercase().as_str() {
        "green" => Some(AlertLevel::Green),
        "yellow" => Some(AlertLevel::Yellow),
        "orange" => Some(AlertLevel::Orange),
        "red" => Some(AlertLevel::Red),
        _ => None,
    }
}

#[derive(Debug, Clone)]
pub struct UsgsClient {
    client: Client,
    base_url: String,
}

impl UsgsClient {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        Ok(Self {
            client: http_client(config.http_timeout)?,
            base_url: config.usgs_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub async fn recent_earthquakes(&self, query: &SeismicQuery) -> Result<Vec<SeismicEvent>, AppError> {
        self.earthquakes_before(query, Utc::now()).await
    }

    /// Events in the day leading up to `end`.
    pub async fn earthquakes_before(
        &self,
        query: &SeismicQuery,
        end: DateTime<Utc>,
    ) -> Result<Vec<SeismicEvent>, AppError> {
        let params = query_params(query, end)?;
        let url = format!("{}{}", self.base_url, QUERY_PATH);
        tracing::debug!("Requesting USGS events with {:?}", params);

        let response = self.client.get(&url).query(&params).send().await?;
        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream(format!(
                "USGS API error: {}: {}",
                status,
                error_text.trim()
            )));
        }

        let body = response.text().await?;
        let collection: FeatureCollection = serde_json::from_str(&body)?;
        Ok(collection.features.iter().map(SeismicEvent::from).collect())
    }
}

fn query_params(query: &SeismicQuery, end: DateTime<Utc>) -> Result<Vec<(&'static str, String)>, AppError> {
    let start = end - Duration::hours(WINDOW_HOURS);

    let mut params = vec![
        ("format", "geojson".to_string()),
        ("starttime", start.to_rfc3339_opts(SecondsFormat::Millis, true)),
        ("endtime", end.to_rfc3339_opts(SecondsFormat::Millis, true)),
        ("minmagnitude", MIN_MAGNITUDE.to_string()),
        ("orderby", "time".to_string()),
        ("limit", MAX_RESULTS.to_string()),
    ];

    if let (Some(lat), Some(lon)) = (query.lat, query.lon) {
        validate_coordinates(lat, lon).map_err(AppError::InvalidCoordinates)?;
        let radius = query.radius.unwrap_or(DEFAULT_RADIUS_KM);
        params.push(("latitude", lat.to_string()));
        params.push(("longitude", lon.to_string()));
        params.push(("maxradiuskm", radius.to_string()));
    }

    Ok(params)
}
