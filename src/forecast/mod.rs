pub mod aggregate;
pub mod geocode;
pub mod openweather;
pub mod synthesize;
pub mod types;
pub mod weatherstack;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::error::AppError;
use crate::models::WeatherResponse;
use crate::utils::validate_coordinates;
use openweather::OpenWeatherProvider;
use weatherstack::WeatherstackProvider;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    OpenWeather,
    Weatherstack,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::OpenWeather => "openweather",
            ProviderId::Weatherstack => "weatherstack",
        }
    }

    pub const fn all() -> &'static [ProviderId] {
        &[ProviderId::OpenWeather, ProviderId::Weatherstack]
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProviderId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "openweather" => Ok(ProviderId::OpenWeather),
            "weatherstack" => Ok(ProviderId::Weatherstack),
            _ => Err(anyhow::anyhow!(
                "Unknown provider '{value}'. Supported providers: openweather, weatherstack."
            )),
        }
    }
}

/// Where the caller wants weather for.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    Coordinates { lat: f64, lon: f64 },
    City(String),
}

impl LocationQuery {
    /// Build a query from the optional request fields. Coordinates win when
    /// both forms are present.
    pub fn from_parts(
        city: Option<&str>,
        lat: Option<f64>,
        lon: Option<f64>,
    ) -> Result<Self, AppError> {
        if let (Some(lat), Some(lon)) = (lat, lon) {
            validate_coordinates(lat, lon).map_err(AppError::InvalidCoordinates)?;
            return Ok(LocationQuery::Coordinates { lat, lon });
        }

        match city.map(str::trim) {
            Some(city) if !city.is_empty() => Ok(LocationQuery::City(city.to_string())),
            _ => Err(AppError::MissingLocation),
        }
    }
}

/// One upstream weather source normalized into the dashboard contract.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    fn id(&self) -> ProviderId;

    async fn resolve(&self, location: &LocationQuery) -> Result<WeatherResponse, AppError>;
}

/// Construct the provider selected in config.
pub fn provider_from_config(config: &Config) -> Result<Arc<dyn WeatherProvider>, AppError> {
    let id = config.weather_provider;
    let api_key = config
        .provider_api_key(id)
        .ok_or(AppError::MissingApiKey)?
        .to_owned();

    let provider: Arc<dyn WeatherProvider> = match id {
        ProviderId::OpenWeather => Arc::new(OpenWeatherProvider::new(config, api_key)?),
        ProviderId::Weatherstack => Arc::new(WeatherstackProvider::new(config, api_key)?),
    };

    Ok(provider)
}

pub(crate) fn http_client(timeout: Duration) -> Result<reqwest::Client, AppError> {
    Ok(reqwest::Client::builder()
        .user_agent(concat!("WeatherDashboard/", env!("CARGO_PKG_VERSION")))
        .timeout(timeout)
        .build()?)
}

/// Hour label such as "3 PM".
pub fn hour_label(time: &DateTime<FixedOffset>) -> String {
    time.format("%-I %p").to_string()
}

/// Short weekday such as "Thu".
pub fn day_label(time: &DateTime<FixedOffset>) -> String {
    time.format("%a").to_string()
}

/// Month and day such as "Dec 26".
pub fn date_label(time: &DateTime<FixedOffset>) -> String {
    time.format("%b %-d").to_string()
}
