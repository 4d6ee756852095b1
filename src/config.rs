use std::env;
use std::ops::RangeInclusive;
use std::str::FromStr;
use std::time::Duration;

use crate::forecast::ProviderId;

/// Knobs for the placeholder forecast built by synthesis-mode providers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SynthesisSettings {
    pub hourly_step_hours: i64,
    pub daily_spread_c: i32,
}

impl Default for SynthesisSettings {
    fn default() -> Self {
        Self {
            hourly_step_hours: 3,
            daily_spread_c: 2,
        }
    }
}

impl SynthesisSettings {
    pub const STEP_HOURS_RANGE: RangeInclusive<i64> = 1..=24;
    pub const SPREAD_RANGE: RangeInclusive<i32> = 0..=50;

    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();
        let settings = Self {
            hourly_step_hours: parse_var("SYNTH_HOURLY_STEP_HOURS", defaults.hourly_step_hours)?,
            daily_spread_c: parse_var("SYNTH_DAILY_SPREAD_C", defaults.daily_spread_c)?,
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Keeps forecast timestamps representable and `max_temp >= min_temp`.
    pub fn validate(&self) -> anyhow::Result<()> {
        if !Self::STEP_HOURS_RANGE.contains(&self.hourly_step_hours) {
            anyhow::bail!(
                "SYNTH_HOURLY_STEP_HOURS must be between {} and {}, got {}",
                Self::STEP_HOURS_RANGE.start(),
                Self::STEP_HOURS_RANGE.end(),
                self.hourly_step_hours
            );
        }
        if !Self::SPREAD_RANGE.contains(&self.daily_spread_c) {
            anyhow::bail!(
                "SYNTH_DAILY_SPREAD_C must be between {} and {}, got {}",
                Self::SPREAD_RANGE.start(),
                Self::SPREAD_RANGE.end(),
                self.daily_spread_c
            );
        }
        Ok(())
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub weather_provider: ProviderId,
    pub openweather_api_key: Option<String>,
    pub openweather_base_url: String,
    pub openweather_current_path: String,
    pub openweather_forecast3h_path: String,
    pub openweather_onecall_path: String,
    pub openweather_geocode_direct_path: String,
    pub weatherstack_api_key: Option<String>,
    pub weatherstack_base_url: String,
    pub open_meteo_geocoding_url: String,
    pub usgs_base_url: String,
    pub http_timeout: Duration,
    pub synthesis: SynthesisSettings,
    pub bind_address: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            weather_provider: ProviderId::OpenWeather,
            openweather_api_key: None,
            openweather_base_url: "https://api.openweathermap.org".to_string(),
            openweather_current_path: "/data/2.5/weather".to_string(),
            openweather_forecast3h_path: "/data/2.5/forecast".to_string(),
            openweather_onecall_path: "/data/3.0/onecall".to_string(),
            openweather_geocode_direct_path: "/geo/1.0/direct".to_string(),
            weatherstack_api_key: None,
            weatherstack_base_url: "http://api.weatherstack.com".to_string(),
            open_meteo_geocoding_url: "https://geocoding-api.open-meteo.com".to_string(),
            usgs_base_url: "https://earthquake.usgs.gov".to_string(),
            http_timeout: Duration::from_secs(10),
            synthesis: SynthesisSettings::default(),
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Config::default();

        let weather_provider = match env::var("WEATHER_PROVIDER") {
            Ok(value) => ProviderId::try_from(value.as_str())?,
            Err(_) => defaults.weather_provider,
        };

        Ok(Config {
            weather_provider,
            openweather_api_key: optional_var("OPENWEATHER_API_KEY"),
            openweather_base_url: env::var("OPENWEATHER_BASE_URL")
                .unwrap_or(defaults.openweather_base_url),
            openweather_current_path: env::var("OPENWEATHER_CURRENT_PATH")
                .unwrap_or(defaults.openweather_current_path),
            openweather_forecast3h_path: env::var("OPENWEATHER_FORECAST3H_PATH")
                .unwrap_or(defaults.openweather_forecast3h_path),
            openweather_onecall_path: env::var("OPENWEATHER_ONECALL_PATH")
                .unwrap_or(defaults.openweather_onecall_path),
            openweather_geocode_direct_path: env::var("OPENWEATHER_GEOCODE_DIRECT_PATH")
                .unwrap_or(defaults.openweather_geocode_direct_path),
            weatherstack_api_key: optional_var("WEATHERSTACK_API_KEY"),
            weatherstack_base_url: env::var("WEATHERSTACK_BASE_URL")
                .unwrap_or(defaults.weatherstack_base_url),
            open_meteo_geocoding_url: env::var("OPEN_METEO_GEOCODING_URL")
                .unwrap_or(defaults.open_meteo_geocoding_url),
            usgs_base_url: env::var("USGS_BASE_URL").unwrap_or(defaults.usgs_base_url),
            http_timeout: Duration::from_secs(parse_var("HTTP_TIMEOUT_SECS", 10)?),
            synthesis: SynthesisSettings::from_env()?,
            bind_address: env::var("BIND_ADDRESS").unwrap_or(defaults.bind_address),
        })
    }

    /// API key for the given provider, treating blank values as missing.
    pub fn provider_api_key(&self, id: ProviderId) -> Option<&str> {
        let key = match id {
            ProviderId::OpenWeather => self.openweather_api_key.as_deref(),
            ProviderId::Weatherstack => self.weatherstack_api_key.as_deref(),
        };
        key.filter(|k| !k.trim().is_empty())
    }
}

fn optional_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn parse_var<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("{} has an invalid value '{}': {}", name, raw, e)),
        Err(_) => Ok(default),
    }
}
