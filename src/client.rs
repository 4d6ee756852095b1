//! Typed client of the dashboard endpoints, for the presentation layer.

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::json;
use std::time::Duration;

use crate::models::{EarthquakesResponse, SeismicEvent, WeatherResponse};

const WEATHER_FALLBACK: &str = "Failed to fetch weather data";
const EARTHQUAKE_FALLBACK: &str = "Failed to fetch earthquake data";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct ClientError {
    pub message: String,
}

impl ClientError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DashboardClient {
    client: reqwest::Client,
    base_url: String,
}

impl DashboardClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::new(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub async fn weather_by_city(&self, city: &str) -> Result<WeatherResponse, ClientError> {
        self.post("/weather", &json!({ "city": city }), WEATHER_FALLBACK)
            .await
    }

    pub async fn weather_by_coords(&self, lat: f64, lon: f64) -> Result<WeatherResponse, ClientError> {
        self.post("/weather", &json!({ "lat": lat, "lon": lon }), WEATHER_FALLBACK)
            .await
    }

    /// Omitted fields fall back to the server defaults (global feed, 500 km radius).
    pub async fn earthquakes(
        &self,
        lat: Option<f64>,
        lon: Option<f64>,
        radius: Option<f64>,
    ) -> Result<Vec<SeismicEvent>, ClientError> {
        let body = json!({ "lat": lat, "lon": lon, "radius": radius });
        let response: EarthquakesResponse = self
            .post("/earthquakes", &body, EARTHQUAKE_FALLBACK)
            .await?;
        Ok(response.earthquakes)
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        fallback: &str,
    ) -> Result<T, ClientError> {
        let url = format!("{}{}", self.base_url, path);

        let response = self.client.post(&url).json(body).send().await.map_err(|e| {
            tracing::warn!("Request to {} failed: {}", url, e);
            ClientError::new(fallback)
        })?;

        let status = response.status();
        let payload: serde_json::Value = response.json().await.unwrap_or_default();

        // A body carrying `error` is a failure whatever the status says
        if let Some(message) = payload.get("error").and_then(|e| e.as_str()) {
            let message = if message.is_empty() { fallback } else { message };
            return Err(ClientError::new(message));
        }
        if !status.is_success() {
            return Err(ClientError::new(fallback));
        }

        serde_json::from_value(payload).map_err(|e| {
            tracing::warn!("Unexpected payload from {}: {}", url, e);
            ClientError::new(fallback)
        })
    }
}

/// Long date such as "Thursday, December 26". `None` means now.
pub fn format_date(timestamp: Option<i64>) -> String {
    let date = timestamp
        .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0))
        .unwrap_or_else(Utc::now);
    date.format("%A, %B %-d").to_string()
}

/// Clock time such as "6:45 AM".
pub fn format_time(timestamp: i64) -> String {
    DateTime::<Utc>::from_timestamp(timestamp, 0)
        .unwrap_or_default()
        .format("%-I:%M %p")
        .to_string()
}
