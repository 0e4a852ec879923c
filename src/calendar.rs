//! Calendar-day keys and the alignment used to derive them from instants.
//!
//! A [DayKey] identifies one calendar day. Which day an instant falls on
//! depends on where the day boundaries are drawn, so every conversion goes
//! through a [DayAlignment] instead of slicing a formatted timestamp.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::{Date, Duration, OffsetDateTime, UtcOffset, macros::format_description};
use time_tz::{Offset, TimeZone};

use crate::Error;

/// A calendar day, displayed and serialized as `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DayKey(Date);

impl DayKey {
    /// Create a key for `date`.
    pub const fn new(date: Date) -> Self {
        Self(date)
    }

    /// The calendar date behind this key.
    pub fn date(self) -> Date {
        self.0
    }

    /// The key for the day after this one, or `None` past the end of the
    /// supported calendar.
    pub fn next(self) -> Option<Self> {
        self.0.next_day().map(Self)
    }

    /// The key for the day `days` days before this one, or `None` past the
    /// start of the supported calendar.
    pub fn days_before(self, days: u32) -> Option<Self> {
        self.0.checked_sub(Duration::days(days.into())).map(Self)
    }
}

impl From<Date> for DayKey {
    fn from(date: Date) -> Self {
        Self(date)
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}",
            self.0.year(),
            self.0.month() as u8,
            self.0.day()
        )
    }
}

impl FromStr for DayKey {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Date::parse(text.trim(), format_description!("[year]-[month]-[day]"))
            .map(Self)
            .map_err(|_| Error::InvalidDayKey(text.to_owned()))
    }
}

impl Serialize for DayKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DayKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// Where day boundaries are drawn when bucketing instants into days.
///
/// [DayAlignment::Utc] splits days at UTC midnight, which is what a browser
/// does when it slices the first ten characters off an ISO-8601 timestamp.
/// A late-evening transaction west of Greenwich therefore lands on the next
/// UTC day. [DayAlignment::Offset] splits days at local midnight for a fixed
/// UTC offset instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DayAlignment {
    /// Days start at midnight UTC.
    #[default]
    Utc,
    /// Days start at midnight in the given fixed offset.
    Offset(UtcOffset),
}

impl DayAlignment {
    /// Align days to local midnight in `canonical_timezone`, e.g. "Pacific/Auckland".
    ///
    /// The offset is resolved for the current instant, so callers that live
    /// across a daylight-saving change should resolve it again per request.
    ///
    /// # Errors
    /// Returns [Error::InvalidTimezoneError] if the timezone name is unknown.
    pub fn from_timezone(canonical_timezone: &str) -> Result<Self, Error> {
        let offset = time_tz::timezones::get_by_name(canonical_timezone)
            .map(|tz| tz.get_offset_utc(&OffsetDateTime::now_utc()).to_utc())
            .ok_or_else(|| Error::InvalidTimezoneError(canonical_timezone.to_owned()))?;

        if offset == UtcOffset::UTC {
            Ok(Self::Utc)
        } else {
            Ok(Self::Offset(offset))
        }
    }

    /// The UTC offset at which days start.
    pub fn offset(self) -> UtcOffset {
        match self {
            Self::Utc => UtcOffset::UTC,
            Self::Offset(offset) => offset,
        }
    }

    /// The day that `instant` falls on.
    pub fn day_key(self, instant: OffsetDateTime) -> DayKey {
        DayKey(instant.to_offset(self.offset()).date())
    }

    /// The day that `now` falls on.
    pub fn today(self, now: OffsetDateTime) -> DayKey {
        self.day_key(now)
    }

    /// The day `days` days before the day that `now` falls on.
    pub fn days_ago(self, now: OffsetDateTime, days: u32) -> DayKey {
        self.today(now)
            .days_before(days)
            .unwrap_or(DayKey(Date::MIN))
    }

    /// The first instant of `day`.
    pub fn start_of_day(self, day: DayKey) -> OffsetDateTime {
        day.0.midnight().assume_offset(self.offset())
    }
}
