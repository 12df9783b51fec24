use chrono::{DateTime, Datelike, TimeZone, Timelike, Utc, Weekday};
use std::time::{Duration, Instant};

/// A point in time as seen by both the scheduler and the widgets.
///
/// The scheduler works on the monotonic `instant`; widgets that compare
/// against stored timestamps use `wall`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Moment {
    pub instant: Instant,
    pub wall: DateTime<Utc>,
}

impl Moment {
    pub fn now() -> Self {
        Self {
            instant: Instant::now(),
            wall: Utc::now(),
        }
    }

    pub fn at(instant: Instant, wall: DateTime<Utc>) -> Self {
        Self { instant, wall }
    }

    /// The same moment `by` later on both clocks.
    pub fn advanced(&self, by: Duration) -> Self {
        let wall_by = chrono::Duration::from_std(by).unwrap_or_else(|_| chrono::Duration::zero());
        Self {
            instant: self.instant + by,
            wall: self.wall + wall_by,
        }
    }
}

pub fn weekday_label(day: Weekday) -> &'static str {
    match day {
        Weekday::Sun => "日",
        Weekday::Mon => "月",
        Weekday::Tue => "火",
        Weekday::Wed => "水",
        Weekday::Thu => "木",
        Weekday::Fri => "金",
        Weekday::Sat => "土",
    }
}

/// Format as `YYYY/M/D(曜) HH:MM:SS` in the time zone of `dt`.
pub fn format_datetime<Tz: TimeZone>(dt: &DateTime<Tz>) -> String {
    format!(
        "{}/{}/{}({}) {:02}:{:02}:{:02}",
        dt.year(),
        dt.month(),
        dt.day(),
        weekday_label(dt.weekday()),
        dt.hour(),
        dt.minute(),
        dt.second()
    )
}
