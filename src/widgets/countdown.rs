//! Countdown list with lazy eviction of expired entries.
use crate::error::{ValidationError, WidgetError};
use crate::store::{StoreHandle, COUNTDOWNS_KEY};
use crate::widget_state::WidgetState;
use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

const MINUTE_MS: i64 = 60 * 1000;
const HOUR_MS: i64 = 60 * MINUTE_MS;
const DAY_MS: i64 = 24 * HOUR_MS;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountdownItem {
    pub title: String,
    #[serde(rename = "date", with = "target_serde")]
    pub target: DateTime<Utc>,
}

mod target_serde {
    use chrono::{DateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(target: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&target.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_target(&raw).map_err(de::Error::custom)
    }
}

/// Parse a countdown target.
///
/// Accepts RFC 3339 timestamps as well as the naive `YYYY-MM-DDTHH:MM[:SS]`
/// form of a datetime-local input, which is read as local time.
pub fn parse_target(input: &str) -> Result<DateTime<Utc>, ValidationError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ValidationError::EmptyField("date"));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, fmt) {
            return Local
                .from_local_datetime(&naive)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc))
                .ok_or_else(|| ValidationError::InvalidDate(input.to_string()));
        }
    }
    Err(ValidationError::InvalidDate(input.to_string()))
}

/// Time left until a countdown target, truncated to whole minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Remaining {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
}

impl Remaining {
    /// Split `ms` into days, hours and minutes using floor division at every
    /// level. Anything under a full minute is dropped.
    pub fn from_millis(ms: i64) -> Self {
        let ms = ms.max(0);
        Self {
            days: ms / DAY_MS,
            hours: (ms % DAY_MS) / HOUR_MS,
            minutes: (ms % HOUR_MS) / MINUTE_MS,
        }
    }
}

impl fmt::Display for Remaining {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}日 {}時間 {}分", self.days, self.hours, self.minutes)
    }
}

/// A countdown that has not expired yet, as produced by a refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveCountdown {
    /// Position in [`CountdownWidget::items`]; valid for [`CountdownWidget::delete_at`].
    pub index: usize,
    pub title: String,
    pub target: DateTime<Utc>,
    pub remaining: Remaining,
}

pub struct CountdownWidget {
    state: WidgetState<Vec<CountdownItem>>,
}

impl CountdownWidget {
    pub fn load(store: StoreHandle) -> Self {
        Self {
            state: WidgetState::load(store, COUNTDOWNS_KEY, Vec::new),
        }
    }

    pub fn items(&self) -> &[CountdownItem] {
        self.state.get()
    }

    pub fn len(&self) -> usize {
        self.items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }

    /// Add a countdown from raw user input.
    pub fn add(&mut self, title: &str, target: &str, now: DateTime<Utc>) -> Result<(), WidgetError> {
        if title.trim().is_empty() {
            return Err(ValidationError::EmptyField("title").into());
        }
        let target = parse_target(target)?;
        self.add_at(title, target, now)
    }

    pub fn add_at(
        &mut self,
        title: &str,
        target: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<(), WidgetError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyField("title").into());
        }
        if target < now {
            return Err(ValidationError::PastDate(target).into());
        }
        let item = CountdownItem {
            title: title.to_string(),
            target,
        };
        self.state.mutate(|items| items.push(item))?;
        tracing::debug!(title, %target, "countdown added");
        Ok(())
    }

    /// Evict every countdown whose target is at or before `now` and return
    /// the remaining ones with their time left.
    ///
    /// Eviction is persisted in the same pass. If that write fails the
    /// expired entries are still left out of the result and will be evicted
    /// again on the next refresh.
    pub fn refresh(&mut self, now: DateTime<Utc>) -> Vec<ActiveCountdown> {
        let expired = self.items().iter().filter(|c| c.target <= now).count();
        if expired > 0 {
            match self.state.mutate(|items| items.retain(|c| c.target > now)) {
                Ok(()) => tracing::debug!(expired, "evicted expired countdowns"),
                Err(e) => tracing::error!("failed to evict expired countdowns: {e:#}"),
            }
        }
        self.items()
            .iter()
            .enumerate()
            .filter(|(_, c)| c.target > now)
            .map(|(index, c)| ActiveCountdown {
                index,
                title: c.title.clone(),
                target: c.target,
                remaining: Remaining::from_millis((c.target - now).num_milliseconds()),
            })
            .collect()
    }

    /// Remove the countdown at `index`. Returns `false` when `index` is out
    /// of range, in which case nothing is written.
    pub fn delete_at(&mut self, index: usize) -> anyhow::Result<bool> {
        if index >= self.len() {
            tracing::debug!(index, len = self.len(), "ignoring out of range countdown delete");
            return Ok(false);
        }
        self.state.mutate(|items| {
            items.remove(index);
        })?;
        Ok(true)
    }
}
