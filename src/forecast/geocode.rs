//! City lookup through the Open-Meteo geocoding API (no API key required).

use reqwest::Client;
use serde::Deserialize;

use crate::error::AppError;

#[derive(Debug, Clone, Deserialize)]
pub struct Place {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<Place>,
}

#[derive(Debug, Clone)]
pub struct OpenMeteoGeocoder {
    client: Client,
    base_url: String,
}

impl OpenMeteoGeocoder {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Best match for a city name, or `CityNotFound` when there is none.
    pub async fn lookup(&self, city: &str) -> Result<Place, AppError> {
        let url = format!("{}/v1/search", self.base_url);
        tracing::debug!("Geocoding '{}'", city);

        let response = self
            .client
            .get(&url)
            .query(&[("name", city), ("count", "1"), ("language", "en"), ("format", "json")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream(format!(
                "Geocoding failed: HTTP {}: {}",
                status, error_text
            )));
        }

        let body: SearchResponse = response.json().await?;
        body.results.into_iter().next().ok_or(AppError::CityNotFound)
    }
}
