//! Canonical weather conditions and the mapping from provider codes and
//! descriptions into them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of conditions the dashboard knows how to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    Sunny,
    Cloudy,
    Rainy,
    Snowy,
    Stormy,
}

impl Condition {
    pub const ALL: [Condition; 5] = [
        Condition::Sunny,
        Condition::Cloudy,
        Condition::Rainy,
        Condition::Snowy,
        Condition::Stormy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::Sunny => "sunny",
            Condition::Cloudy => "cloudy",
            Condition::Rainy => "rainy",
            Condition::Snowy => "snowy",
            Condition::Stormy => "stormy",
        }
    }

    /// Map a Weatherstack (WWO-style) weather code.
    ///
    /// Ranges are inclusive and checked top to bottom, so a code sitting on a
    /// shared boundary belongs to the earlier band:
    /// - 113: clear / sunny
    /// - 116-143: partly cloudy, cloudy, overcast, mist
    /// - 176-200: patchy rain (200 included)
    /// - 201-299: thunder and drizzle codes
    /// - 300-350: rain (350 included)
    /// - 351-395: snow, sleet, ice pellets
    /// - above 395: rainy
    /// - anything else: cloudy
    pub fn from_code(code: i32) -> Self {
        match code {
            113 => Condition::Sunny,
            116..=143 => Condition::Cloudy,
            176..=200 => Condition::Rainy,
            201..=299 => Condition::Stormy,
            300..=350 => Condition::Rainy,
            351..=395 => Condition::Snowy,
            c if c > 395 => Condition::Rainy,
            _ => Condition::Cloudy,
        }
    }

    /// Map a free-text description such as "light rain".
    ///
    /// Keyword groups are tried in a fixed order and the first hit wins.
    pub fn from_description(description: &str) -> Self {
        const KEYWORDS: [(&[&str], Condition); 5] = [
            (&["clear", "sun"], Condition::Sunny),
            (&["cloud", "mist", "fog"], Condition::Cloudy),
            (&["rain", "drizzle"], Condition::Rainy),
            (&["snow", "sleet"], Condition::Snowy),
            (&["thunder", "storm"], Condition::Stormy),
        ];

        let lowered = description.to_lowercase();
        KEYWORDS
            .iter()
            .find(|(words, _)| words.iter().any(|word| lowered.contains(word)))
            .map(|(_, condition)| *condition)
            .unwrap_or(Condition::Cloudy)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
