//! OpenWeather wire formats.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Coord {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MainReadings {
    pub temp: f64,
    pub feels_like: f64,
    #[serde(default)]
    pub pressure: f64,
    #[serde(default)]
    pub humidity: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeatherDescriptor {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Wind {
    #[serde(default)]
    pub speed: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CurrentSys {
    pub country: Option<String>,
    pub sunrise: Option<i64>,
    pub sunset: Option<i64>,
}

/// `/data/2.5/weather`
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentWeatherResponse {
    #[serde(default)]
    pub name: String,
    pub coord: Coord,
    pub main: MainReadings,
    #[serde(default)]
    pub weather: Vec<WeatherDescriptor>,
    #[serde(default)]
    pub wind: Wind,
    pub visibility: Option<f64>,
    #[serde(default)]
    pub sys: CurrentSys,
    /// Seconds east of UTC.
    pub timezone: Option<i32>,
}

/// `/data/2.5/forecast`
#[derive(Debug, Clone, Deserialize)]
pub struct Forecast3hResponse {
    #[serde(default)]
    pub list: Vec<Forecast3hItem>,
    pub city: Forecast3hCity,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Forecast3hItem {
    pub dt: i64,
    pub main: MainReadings,
    #[serde(default)]
    pub weather: Vec<WeatherDescriptor>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Forecast3hCity {
    #[serde(default)]
    pub name: String,
    pub country: Option<String>,
    pub timezone: Option<i32>,
    pub sunrise: Option<i64>,
    pub sunset: Option<i64>,
}

/// `/geo/1.0/direct`
#[derive(Debug, Clone, Deserialize)]
pub struct GeocodeResponse {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub country: Option<String>,
}

/// `/data/3.0/onecall` restricted to the alerts block.
#[derive(Debug, Clone, Deserialize)]
pub struct OneCallAlertsResponse {
    #[serde(default)]
    pub alerts: Vec<OneCallAlert>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OneCallAlert {
    #[serde(default)]
    pub sender_name: String,
    pub event: String,
    pub start: i64,
    pub end: i64,
    #[serde(default)]
    pub description: String,
}

/// Body OpenWeather sends with non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}
