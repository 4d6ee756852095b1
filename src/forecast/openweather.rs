use super::aggregate::{aggregate_daily, aggregate_hourly, ForecastSample};
use super::types::*;
use super::{http_client, LocationQuery, ProviderId, WeatherProvider};
use crate::condition::Condition;
use crate::config::Config;
use crate::error::AppError;
use crate::models::{Alert, CurrentConditions, WeatherResponse};
use crate::utils::{meters_to_km, ms_to_kmh, offset_from_seconds, round_temp, utc_offset};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;

/// Rich provider: real current conditions, a 5-day/3-hour forecast and
/// government alerts.
#[derive(Debug)]
pub struct OpenWeatherProvider {
    client: Client,
    api_key: String,
    base_url: String,
    current_path: String,
    forecast3h_path: String,
    onecall_path: String,
    geocode_direct_path: String,
}

impl OpenWeatherProvider {
    pub fn new(config: &Config, api_key: String) -> Result<Self, AppError> {
        Ok(Self {
            client: http_client(config.http_timeout)?,
            api_key,
            base_url: config.openweather_base_url.trim_end_matches('/').to_string(),
            current_path: config.openweather_current_path.clone(),
            forecast3h_path: config.openweather_forecast3h_path.clone(),
            onecall_path: config.openweather_onecall_path.clone(),
            geocode_direct_path: config.openweather_geocode_direct_path.clone(),
        })
    }

    pub async fn get_current(&self, lat: f64, lon: f64) -> Result<CurrentWeatherResponse, AppError> {
        self.get_json(
            &self.current_path,
            &[
                ("lat", &lat.to_string()),
                ("lon", &lon.to_string()),
                ("units", "metric"),
                ("appid", &self.api_key),
            ],
        )
        .await
    }

    pub async fn get_forecast3h(&self, lat: f64, lon: f64) -> Result<Forecast3hResponse, AppError> {
        self.get_json(
            &self.forecast3h_path,
            &[
                ("lat", &lat.to_string()),
                ("lon", &lon.to_string()),
                ("units", "metric"),
                ("appid", &self.api_key),
            ],
        )
        .await
    }

    pub async fn get_alerts(&self, lat: f64, lon: f64) -> Result<Vec<Alert>, AppError> {
        let response: OneCallAlertsResponse = self
            .get_json(
                &self.onecall_path,
                &[
                    ("lat", &lat.to_string()),
                    ("lon", &lon.to_string()),
                    ("exclude", "current,minutely,hourly,daily"),
                    ("appid", &self.api_key),
                ],
            )
            .await?;

        Ok(response.alerts.iter().map(normalize_alert).collect())
    }

    pub async fn geocode_direct(&self, query: &str) -> Result<Vec<GeocodeResponse>, AppError> {
        self.get_json(
            &self.geocode_direct_path,
            &[("q", query), ("limit", "1"), ("appid", &self.api_key)],
        )
        .await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T, AppError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("Requesting OpenWeather {}", path);

        let response = self.client.get(&url).query(params).send().await?;
        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&error_text)
                .map(|body| body.message)
                .unwrap_or_else(|_| format!("HTTP {}: {}", status, error_text));
            return Err(AppError::Upstream(format!("OpenWeather API error: {}", message)));
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    fn id(&self) -> ProviderId {
        ProviderId::OpenWeather
    }

    async fn resolve(&self, location: &LocationQuery) -> Result<WeatherResponse, AppError> {
        let (lat, lon, place) = match location {
            LocationQuery::Coordinates { lat, lon } => (*lat, *lon, None),
            LocationQuery::City(city) => {
                let place = self
                    .geocode_direct(city)
                    .await?
                    .into_iter()
                    .next()
                    .ok_or(AppError::CityNotFound)?;
                (place.lat, place.lon, Some(place))
            }
        };

        let (current, forecast) =
            tokio::try_join!(self.get_current(lat, lon), self.get_forecast3h(lat, lon))?;

        let alerts = match self.get_alerts(lat, lon).await {
            Ok(alerts) => alerts,
            Err(e) => {
                tracing::warn!("Weather alerts unavailable for {:.4},{:.4}: {}", lat, lon, e);
                Vec::new()
            }
        };

        let mut current_conditions = normalize_current(&current, &forecast.city);
        if current_conditions.city.is_empty() {
            if let Some(place) = place {
                current_conditions.city = place.name;
                current_conditions.country = place.country.unwrap_or_default();
            }
        }

        let offset = forecast
            .city
            .timezone
            .or(current.timezone)
            .map(offset_from_seconds)
            .unwrap_or_else(utc_offset);
        let samples = forecast_samples(&forecast);

        Ok(WeatherResponse {
            current: current_conditions,
            hourly: aggregate_hourly(&samples, offset),
            weekly: aggregate_daily(&samples, offset),
            alerts,
        })
    }
}

pub fn normalize_current(
    current: &CurrentWeatherResponse,
    city: &Forecast3hCity,
) -> CurrentConditions {
    let descriptor = current.weather.first();
    let description = descriptor.map(|w| w.description.clone()).unwrap_or_default();
    let icon = descriptor.map(|w| w.icon.clone()).unwrap_or_default();
    let name = if current.name.is_empty() {
        city.name.clone()
    } else {
        current.name.clone()
    };

    CurrentConditions {
        city: name,
        country: current
            .sys
            .country
            .clone()
            .or_else(|| city.country.clone())
            .unwrap_or_default(),
        temperature: round_temp(current.main.temp),
        feels_like: round_temp(current.main.feels_like),
        condition: Condition::from_description(&description).to_string(),
        description,
        icon,
        humidity: current.main.humidity,
        wind_speed: ms_to_kmh(current.wind.speed),
        pressure: current.main.pressure.round() as i32,
        visibility: current.visibility.map(meters_to_km).unwrap_or_default(),
        sunrise: current.sys.sunrise.or(city.sunrise).unwrap_or(0),
        sunset: current.sys.sunset.or(city.sunset).unwrap_or(0),
        lat: current.coord.lat,
        lon: current.coord.lon,
    }
}

pub fn forecast_samples(forecast: &Forecast3hResponse) -> Vec<ForecastSample> {
    forecast
        .list
        .iter()
        .map(|item| {
            let descriptor = item.weather.first();
            let description = descriptor.map(|w| w.description.clone()).unwrap_or_default();
            ForecastSample {
                dt: item.dt,
                temp_c: item.main.temp,
                condition: Condition::from_description(&description),
                icon: descriptor.map(|w| w.icon.clone()).unwrap_or_default(),
                description,
            }
        })
        .collect()
}

pub fn normalize_alert(alert: &OneCallAlert) -> Alert {
    let headline = if alert.sender_name.trim().is_empty() {
        alert.event.clone()
    } else {
        format!("{} issued by {}", alert.event, alert.sender_name)
    };

    Alert {
        event: alert.event.clone(),
        headline,
        description: alert.description.clone(),
        start: alert.start,
        end: alert.end,
        severity: severity_for_event(&alert.event).to_string(),
    }
}

/// OpenWeather alerts carry no severity, so infer one from the event name.
pub fn severity_for_event(event: &str) -> &'static str {
    let event = event.to_lowercase();
    if event.contains("emergency") || event.contains("extreme") {
        "extreme"
    } else if event.contains("warning") {
        "severe"
    } else if event.contains("watch") {
        "moderate"
    } else if event.contains("advisory") || event.contains("statement") {
        "minor"
    } else {
        "moderate"
    }
}
