use chrono::{FixedOffset, Offset, Utc};

/// Validate latitude and longitude coordinates
pub fn validate_coordinates(lat: f64, lon: f64) -> Result<(), String> {
    if !(-90.0..=90.0).contains(&lat) {
        return Err(format!("Invalid latitude: {}. Must be between -90 and 90", lat));
    }
    if !(-180.0..=180.0).contains(&lon) {
        return Err(format!("Invalid longitude: {}. Must be between -180 and 180", lon));
    }
    Ok(())
}

/// Round a temperature to whole degrees.
pub fn round_temp(celsius: f64) -> i32 {
    celsius.round() as i32
}

/// Convert wind speed from m/s to whole km/h
pub fn ms_to_kmh(ms: f64) -> i32 {
    (ms * 3.6).round() as i32
}

/// Convert visibility from meters to whole kilometers
pub fn meters_to_km(meters: f64) -> i32 {
    (meters / 1000.0).round() as i32
}

/// Offset from a count of seconds east of UTC, falling back to UTC when out of range.
pub fn offset_from_seconds(seconds: i32) -> FixedOffset {
    FixedOffset::east_opt(seconds).unwrap_or_else(utc_offset)
}

/// Offset from a string of hours such as "-7.0" or "5.5".
pub fn offset_from_hours(hours: &str) -> FixedOffset {
    hours
        .trim()
        .parse::<f64>()
        .ok()
        .map(|h| offset_from_seconds((h * 3600.0).round() as i32))
        .unwrap_or_else(utc_offset)
}

pub fn utc_offset() -> FixedOffset {
    Utc.fix()
}
