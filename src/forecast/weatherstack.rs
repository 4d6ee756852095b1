use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;

use super::geocode::OpenMeteoGeocoder;
use super::synthesize::{synthesize_daily, synthesize_hourly, CurrentSnapshot};
use super::{http_client, LocationQuery, ProviderId, WeatherProvider};
use crate::condition::Condition;
use crate::config::{Config, SynthesisSettings};
use crate::error::AppError;
use crate::models::{CurrentConditions, WeatherResponse};
use crate::utils::{offset_from_hours, round_temp};

#[derive(Debug, Deserialize)]
struct WsResponse {
    success: Option<bool>,
    error: Option<WsError>,
    location: Option<WsLocation>,
    current: Option<WsCurrent>,
}

#[derive(Debug, Deserialize)]
struct WsError {
    #[serde(default)]
    info: String,
}

#[derive(Debug, Deserialize)]
struct WsLocation {
    #[serde(default)]
    name: String,
    #[serde(default)]
    country: String,
    #[serde(default)]
    lat: String,
    #[serde(default)]
    lon: String,
    #[serde(default)]
    utc_offset: String,
}

#[derive(Debug, Deserialize)]
struct WsCurrent {
    temperature: f64,
    #[serde(default)]
    feelslike: f64,
    #[serde(default)]
    weather_code: i32,
    #[serde(default)]
    weather_icons: Vec<String>,
    #[serde(default)]
    weather_descriptions: Vec<String>,
    #[serde(default)]
    wind_speed: f64,
    #[serde(default)]
    pressure: f64,
    #[serde(default)]
    humidity: i32,
    #[serde(default)]
    visibility: f64,
}

/// What the request already knows about the place, used when the
/// response leaves a field blank.
#[derive(Debug, Default)]
struct Fallback {
    lat: f64,
    lon: f64,
    name: Option<String>,
    country: Option<String>,
}

/// Minimal provider: a single current-conditions endpoint, with the hourly
/// and weekly series synthesized from it.
#[derive(Debug)]
pub struct WeatherstackProvider {
    client: Client,
    api_key: String,
    base_url: String,
    geocoder: OpenMeteoGeocoder,
    synthesis: SynthesisSettings,
}

impl WeatherstackProvider {
    pub fn new(config: &Config, api_key: String) -> Result<Self, AppError> {
        let client = http_client(config.http_timeout)?;
        Ok(Self {
            geocoder: OpenMeteoGeocoder::new(client.clone(), &config.open_meteo_geocoding_url),
            client,
            api_key,
            base_url: config.weatherstack_base_url.trim_end_matches('/').to_string(),
            synthesis: config.synthesis,
        })
    }

    async fn get_current(&self, lat: f64, lon: f64) -> Result<WsResponse, AppError> {
        let url = format!("{}/current", self.base_url);
        let query = format!("{},{}", lat, lon);
        tracing::debug!("Requesting Weatherstack current conditions for {}", query);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("access_key", self.api_key.as_str()),
                ("query", query.as_str()),
                ("units", "m"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream(format!(
                "Weatherstack API error: HTTP {}: {}",
                status, error_text
            )));
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    fn normalize(
        &self,
        response: WsResponse,
        fallback: Fallback,
    ) -> Result<WeatherResponse, AppError> {
        if let Some(error) = response.error {
            return Err(AppError::Upstream(format!("Weatherstack API error: {}", error.info)));
        }
        if response.success == Some(false) {
            return Err(AppError::Upstream("Weatherstack API error: request failed".to_string()));
        }

        let (location, current) = match (response.location, response.current) {
            (Some(location), Some(current)) => (location, current),
            _ => return Err(AppError::InvalidResponse),
        };

        let condition = Condition::from_code(current.weather_code);
        let description = current.weather_descriptions.first().cloned().unwrap_or_default();
        let icon = current.weather_icons.first().cloned().unwrap_or_default();
        let temperature = round_temp(current.temperature);

        let city = if location.name.is_empty() {
            fallback.name.unwrap_or_default()
        } else {
            location.name
        };
        let country = if location.country.is_empty() {
            fallback.country.unwrap_or_default()
        } else {
            location.country
        };

        let snapshot = CurrentSnapshot {
            temperature,
            condition,
            icon: icon.clone(),
            description: description.clone(),
        };
        let now = Utc::now().with_timezone(&offset_from_hours(&location.utc_offset));

        Ok(WeatherResponse {
            current: CurrentConditions {
                city,
                country,
                temperature,
                feels_like: round_temp(current.feelslike),
                condition: condition.to_string(),
                description,
                icon,
                humidity: current.humidity,
                // units=m already reports km/h and km
                wind_speed: current.wind_speed.round() as i32,
                pressure: current.pressure.round() as i32,
                visibility: current.visibility.round() as i32,
                sunrise: 0,
                sunset: 0,
                lat: location.lat.parse().unwrap_or(fallback.lat),
                lon: location.lon.parse().unwrap_or(fallback.lon),
            },
            hourly: synthesize_hourly(&snapshot, now, &self.synthesis),
            weekly: synthesize_daily(&snapshot, now, &self.synthesis),
            alerts: Vec::new(),
        })
    }
}

#[async_trait]
impl WeatherProvider for WeatherstackProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Weatherstack
    }

    async fn resolve(&self, location: &LocationQuery) -> Result<WeatherResponse, AppError> {
        let fallback = match location {
            LocationQuery::Coordinates { lat, lon } => Fallback {
                lat: *lat,
                lon: *lon,
                ..Fallback::default()
            },
            LocationQuery::City(city) => {
                let place = self.geocoder.lookup(city).await?;
                Fallback {
                    lat: place.latitude,
                    lon: place.longitude,
                    name: Some(place.name),
                    country: place.country,
                }
            }
        };

        let response = self.get_current(fallback.lat, fallback.lon).await?;
        self.normalize(response, fallback)
    }
}
