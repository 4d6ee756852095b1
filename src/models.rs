//! The JSON contract served to the dashboard front end.

use serde::{Deserialize, Serialize};

use crate::condition::Condition;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentConditions {
    pub city: String,
    pub country: String,
    pub temperature: i32,
    pub feels_like: i32,
    pub condition: String,
    pub description: String,
    pub icon: String,
    pub humidity: i32,
    pub wind_speed: i32,
    pub pressure: i32,
    pub visibility: i32,
    pub sunrise: i64,
    pub sunset: i64,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlyPoint {
    pub time: String,
    pub temperature: i32,
    pub condition: Condition,
    pub icon: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyPoint {
    pub day: String,
    pub date: String,
    pub condition: Condition,
    pub icon: String,
    pub min_temp: i32,
    pub max_temp: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub event: String,
    pub headline: String,
    pub description: String,
    pub start: i64,
    pub end: i64,
    /// Usually one of extreme, severe, moderate or minor.
    pub severity: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherResponse {
    pub current: CurrentConditions,
    pub hourly: Vec<HourlyPoint>,
    pub weekly: Vec<DailyPoint>,
    pub alerts: Vec<Alert>,
}

/// PAGER alert level attached to a seismic event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Green,
    Yellow,
    Orange,
    Red,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeismicEvent {
    pub id: String,
    pub magnitude: f64,
    pub place: String,
    /// Unix milliseconds.
    pub time: i64,
    /// Kilometers below the surface.
    pub depth: f64,
    pub lat: f64,
    pub lon: f64,
    pub url: String,
    pub tsunami: bool,
    pub alert: Option<AlertLevel>,
    pub significance: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EarthquakesResponse {
    pub earthquakes: Vec<SeismicEvent>,
}
