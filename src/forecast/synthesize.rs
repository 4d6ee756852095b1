//! Placeholder forecast for providers that only report current conditions.
//!
//! Every generated point repeats the current reading; nothing here is an
//! actual prediction.

use chrono::{DateTime, Duration, FixedOffset};

use super::aggregate::{DAILY_POINTS, HOURLY_POINTS};
use super::{date_label, day_label, hour_label};
use crate::condition::Condition;
use crate::config::SynthesisSettings;
use crate::models::{DailyPoint, HourlyPoint};

/// The current reading that the placeholder series is built from.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentSnapshot {
    pub temperature: i32,
    pub condition: Condition,
    pub icon: String,
    pub description: String,
}

pub fn synthesize_hourly(
    current: &CurrentSnapshot,
    now: DateTime<FixedOffset>,
    settings: &SynthesisSettings,
) -> Vec<HourlyPoint> {
    (0..HOURLY_POINTS as i64)
        .map(|i| {
            let time = now + Duration::hours(i * settings.hourly_step_hours);
            HourlyPoint {
                time: hour_label(&time),
                temperature: current.temperature,
                condition: current.condition,
                icon: current.icon.clone(),
                description: current.description.clone(),
            }
        })
        .collect()
}

pub fn synthesize_daily(
    current: &CurrentSnapshot,
    now: DateTime<FixedOffset>,
    settings: &SynthesisSettings,
) -> Vec<DailyPoint> {
    (0..DAILY_POINTS as i64)
        .map(|i| {
            let date = now + Duration::days(i);
            DailyPoint {
                day: day_label(&date),
                date: date_label(&date),
                condition: current.condition,
                icon: current.icon.clone(),
                min_temp: current.temperature - settings.daily_spread_c,
                max_temp: current.temperature + settings.daily_spread_c,
            }
        })
        .collect()
}
