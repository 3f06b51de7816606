use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::{DateTime, Datelike, Local, NaiveDate, TimeZone, Weekday};

use crate::units::temperature::{c2f, round};
use crate::weather::{DailySummary, ForecastSample};

const TODAY: &str = "Today";
const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

struct DayExtremes {
    date_key: String,
    day_label: String,
    high: f64,
    low: f64,
}

impl DayExtremes {
    fn into_summary(self) -> DailySummary {
        DailySummary {
            high_c: round(self.high),
            low_c: round(self.low),
            high_f: round(c2f(self.high)),
            low_f: round(c2f(self.low)),
            date_key: self.date_key,
            day_label: self.day_label,
        }
    }
}

fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

fn day_label<Tz: TimeZone>(timestamp: i64, now: &DateTime<Tz>) -> String {
    let Some(at) = DateTime::from_timestamp(timestamp, 0) else {
        log::warn!("forecast timestamp {timestamp} is out of range");
        return String::new();
    };
    let weekday = at.with_timezone(&now.timezone()).weekday();
    if weekday == now.weekday() {
        TODAY.to_string()
    } else {
        weekday_name(weekday).to_string()
    }
}

/// Date keys that parse as `YYYY-MM-DD` sort chronologically and come first.
fn compare_date_keys(a: &str, b: &str) -> Ordering {
    let parse = |key: &str| NaiveDate::parse_from_str(key, DATE_KEY_FORMAT).ok();
    match (parse(a), parse(b)) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

/// Collapses 3-hour samples into one high/low summary per `date_key`,
/// sorted by date.
///
/// The first sample seen for a date fixes that day's label ("Today" when its
/// weekday, in `now`'s timezone, matches `now`). Highs and lows only move on
/// a strictly greater or lower Celsius value; Fahrenheit follows from it.
pub fn aggregate_daily<Tz: TimeZone>(
    samples: &[ForecastSample],
    now: &DateTime<Tz>,
) -> Vec<DailySummary> {
    let mut days: HashMap<&str, DayExtremes> = HashMap::new();

    for sample in samples {
        let day = days
            .entry(sample.date_key.as_str())
            .or_insert_with(|| DayExtremes {
                date_key: sample.date_key.clone(),
                day_label: day_label(sample.timestamp, now),
                high: sample.temp_max,
                low: sample.temp_min,
            });

        if sample.temp_max > day.high {
            day.high = sample.temp_max;
        }
        if sample.temp_min < day.low {
            day.low = sample.temp_min;
        }
    }

    let mut summaries: Vec<DailySummary> =
        days.into_values().map(DayExtremes::into_summary).collect();
    summaries.sort_by(|a, b| compare_date_keys(&a.date_key, &b.date_key));
    summaries
}

pub fn aggregate_daily_now(samples: &[ForecastSample]) -> Vec<DailySummary> {
    aggregate_daily(samples, &Local::now())
}
