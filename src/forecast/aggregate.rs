use chrono::{DateTime, FixedOffset, NaiveDate};

use super::{date_label, day_label, hour_label};
use crate::condition::Condition;
use crate::models::{DailyPoint, HourlyPoint};
use crate::utils::round_temp;

pub const HOURLY_POINTS: usize = 8;
pub const DAILY_POINTS: usize = 7;

/// One 3-hour bucket from a real forecast feed.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastSample {
    /// Unix seconds.
    pub dt: i64,
    pub temp_c: f64,
    pub condition: Condition,
    pub icon: String,
    pub description: String,
}

impl ForecastSample {
    fn local_time(&self, offset: FixedOffset) -> DateTime<FixedOffset> {
        DateTime::from_timestamp(self.dt, 0)
            .unwrap_or_default()
            .with_timezone(&offset)
    }
}

/// First eight samples, relabelled with their local hour.
pub fn aggregate_hourly(samples: &[ForecastSample], offset: FixedOffset) -> Vec<HourlyPoint> {
    samples
        .iter()
        .take(HOURLY_POINTS)
        .map(|sample| HourlyPoint {
            time: hour_label(&sample.local_time(offset)),
            temperature: round_temp(sample.temp_c),
            condition: sample.condition,
            icon: sample.icon.clone(),
            description: sample.description.clone(),
        })
        .collect()
}

struct DayBucket<'a> {
    date: NaiveDate,
    first: &'a ForecastSample,
    first_time: DateTime<FixedOffset>,
    min: f64,
    max: f64,
}

/// Group samples by local calendar day, keeping the first seven days in the
/// order they appear. Each day takes its condition and icon from its first
/// sample.
pub fn aggregate_daily(samples: &[ForecastSample], offset: FixedOffset) -> Vec<DailyPoint> {
    let mut buckets: Vec<DayBucket> = Vec::new();

    for sample in samples {
        let time = sample.local_time(offset);
        let date = time.date_naive();

        match buckets.iter_mut().find(|bucket| bucket.date == date) {
            Some(bucket) => {
                bucket.min = bucket.min.min(sample.temp_c);
                bucket.max = bucket.max.max(sample.temp_c);
            }
            None => buckets.push(DayBucket {
                date,
                first: sample,
                first_time: time,
                min: sample.temp_c,
                max: sample.temp_c,
            }),
        }
    }

    buckets
        .into_iter()
        .take(DAILY_POINTS)
        .map(|bucket| DailyPoint {
            day: day_label(&bucket.first_time),
            date: date_label(&bucket.first_time),
            condition: bucket.first.condition,
            icon: bucket.first.icon.clone(),
            min_temp: round_temp(bucket.min),
            max_temp: round_temp(bucket.max),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn sample(dt: i64, temp_c: f64, condition: Condition) -> ForecastSample {
        ForecastSample {
            dt,
            temp_c,
            condition,
            icon: format!("icon-{}", dt),
            description: condition.to_string(),
        }
    }

    /// Samples every three hours starting at midnight UTC on 2024-12-26.
    fn series(count: usize) -> Vec<ForecastSample> {
        let start = Utc.with_ymd_and_hms(2024, 12, 26, 0, 0, 0).unwrap().timestamp();
        (0..count)
            .map(|i| {
                let temp = 10.0 + (i % 8) as f64 * 1.3;
                sample(start + i as i64 * 3 * 3600, temp, Condition::Cloudy)
            })
            .collect()
    }

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    #[test]
    fn test_hourly_takes_first_eight() {
        let samples = series(40);
        let hourly = aggregate_hourly(&samples, utc());

        assert_eq!(hourly.len(), 8);
        assert_eq!(hourly[0].time, "12 AM");
        assert_eq!(hourly[1].time, "3 AM");
        assert_eq!(hourly[5].time, "3 PM");
        assert_eq!(hourly[1].temperature, 11); // 11.3 rounded
        assert_eq!(hourly[0].icon, samples[0].icon);
    }

    #[test]
    fn test_hourly_with_fewer_samples() {
        let hourly = aggregate_hourly(&series(3), utc());
        assert_eq!(hourly.len(), 3);
    }

    #[test]
    fn test_daily_min_max_per_day() {
        let samples = series(16); // two full days
        let daily = aggregate_daily(&samples, utc());

        assert_eq!(daily.len(), 2);
        for day in &daily {
            assert!(day.max_temp >= day.min_temp);
            assert_eq!(day.min_temp, 10);
            assert_eq!(day.max_temp, 19); // 10 + 7 * 1.3 = 19.1
        }
        assert_eq!(daily[0].day, "Thu");
        assert_eq!(daily[0].date, "Dec 26");
        assert_eq!(daily[1].day, "Fri");
        assert_eq!(daily[1].date, "Dec 27");
    }

    #[test]
    fn test_daily_uses_first_sample_condition() {
        let start = Utc.with_ymd_and_hms(2024, 12, 26, 0, 0, 0).unwrap().timestamp();
        let samples = vec![
            sample(start, 5.0, Condition::Snowy),
            sample(start + 3 * 3600, 8.0, Condition::Sunny),
            sample(start + 6 * 3600, 2.4, Condition::Stormy),
        ];

        let daily = aggregate_daily(&samples, utc());
        assert_eq!(daily.len(), 1);
        assert_eq!(daily[0].condition, Condition::Snowy);
        assert_eq!(daily[0].icon, samples[0].icon);
        assert_eq!(daily[0].min_temp, 2);
        assert_eq!(daily[0].max_temp, 8);
    }

    #[test]
    fn test_daily_caps_at_seven_days() {
        let samples = series(8 * 9); // nine days of samples
        let daily = aggregate_daily(&samples, utc());

        assert_eq!(daily.len(), 7);
        assert_eq!(daily[0].date, "Dec 26");
        assert_eq!(daily[6].date, "Jan 1");
    }

    #[test]
    fn test_daily_count_matches_distinct_days() {
        // 5-day forecast starting mid-day spans six calendar days
        let start = Utc.with_ymd_and_hms(2024, 12, 26, 12, 0, 0).unwrap().timestamp();
        let samples: Vec<_> = (0..40)
            .map(|i| sample(start + i * 3 * 3600, 15.0, Condition::Rainy))
            .collect();

        assert_eq!(aggregate_daily(&samples, utc()).len(), 6);
    }

    #[test]
    fn test_daily_groups_by_local_day() {
        // 22:00 and 01:00 UTC fall on the same day in UTC-5
        let first = Utc.with_ymd_and_hms(2024, 12, 26, 22, 0, 0).unwrap().timestamp();
        let samples = vec![
            sample(first, 1.0, Condition::Cloudy),
            sample(first + 3 * 3600, 3.0, Condition::Cloudy),
        ];

        assert_eq!(aggregate_daily(&samples, utc()).len(), 2);

        let eastern = FixedOffset::west_opt(5 * 3600).unwrap();
        let daily = aggregate_daily(&samples, eastern);
        assert_eq!(daily.len(), 1);
        assert_eq!(daily[0].date, "Dec 26");
        assert_eq!(daily[0].max_temp, 3);
    }

    #[test]
    fn test_empty_input_gives_empty_output() {
        assert!(aggregate_hourly(&[], utc()).is_empty());
        assert!(aggregate_daily(&[], utc()).is_empty());
    }
}
