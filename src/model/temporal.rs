//! Temporal wire values.
//!
//! The server ships every temporal in UTC. Turning one into wall-clock time
//! always goes through a target offset, which the codec takes from its
//! `CodecConfig`.

use std::fmt;

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveTime, TimeDelta, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Calendar date, UTC-normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WireDate {
    pub year: i16,
    pub month: i8,
    pub day: i8,
}

/// Time of day in UTC with microsecond precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WireTime {
    pub hour: i8,
    pub minute: i8,
    pub sec: i8,
    pub microsec: i32,
}

/// Full UTC timestamp with microsecond precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WireDateTime {
    pub year: i16,
    pub month: i8,
    pub day: i8,
    pub hour: i8,
    pub minute: i8,
    pub sec: i8,
    pub microsec: i32,
}

// ============================================================================
// WireDate
// ============================================================================

impl WireDate {
    pub fn new(year: i16, month: i8, day: i8) -> Self {
        Self { year, month, day }
    }

    fn naive(&self) -> Result<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year as i32, self.month as u32, self.day as u32)
            .ok_or_else(|| Error::InvalidTemporal(format!("date {self}")))
    }

    /// Midnight UTC of this date, viewed from `tz`.
    pub fn in_zone(&self, tz: &FixedOffset) -> Result<DateTime<FixedOffset>> {
        let midnight = self
            .naive()?
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| Error::InvalidTemporal(format!("date {self}")))?;
        Ok(Utc.from_utc_datetime(&midnight).with_timezone(tz))
    }
}

impl From<NaiveDate> for WireDate {
    fn from(d: NaiveDate) -> Self {
        Self::new(d.year() as i16, d.month() as i8, d.day() as i8)
    }
}

impl fmt::Display for WireDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

// ============================================================================
// WireTime
// ============================================================================

impl WireTime {
    pub fn new(hour: i8, minute: i8, sec: i8, microsec: i32) -> Self {
        Self { hour, minute, sec, microsec }
    }

    /// Wall-clock time in `tz`. Wraps around midnight.
    pub fn in_zone(&self, tz: &FixedOffset) -> Result<NaiveTime> {
        let utc = NaiveTime::from_hms_micro_opt(
            self.hour as u32,
            self.minute as u32,
            self.sec as u32,
            self.microsec as u32,
        )
        .ok_or_else(|| Error::InvalidTemporal(format!("time {self}")))?;
        let (local, _) = utc.overflowing_add_signed(TimeDelta::seconds(tz.local_minus_utc() as i64));
        Ok(local)
    }
}

impl From<NaiveTime> for WireTime {
    /// Interprets `t` as a UTC time of day.
    fn from(t: NaiveTime) -> Self {
        Self::new(t.hour() as i8, t.minute() as i8, t.second() as i8, (t.nanosecond() / 1_000) as i32)
    }
}

impl fmt::Display for WireTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}.{:06}", self.hour, self.minute, self.sec, self.microsec)
    }
}

// ============================================================================
// WireDateTime
// ============================================================================

impl WireDateTime {
    pub fn new(year: i16, month: i8, day: i8, hour: i8, minute: i8, sec: i8, microsec: i32) -> Self {
        Self { year, month, day, hour, minute, sec, microsec }
    }

    /// This instant viewed from `tz`.
    pub fn in_zone(&self, tz: &FixedOffset) -> Result<DateTime<FixedOffset>> {
        let naive = NaiveDate::from_ymd_opt(self.year as i32, self.month as u32, self.day as u32)
            .and_then(|d| {
                d.and_hms_micro_opt(self.hour as u32, self.minute as u32, self.sec as u32, self.microsec as u32)
            })
            .ok_or_else(|| Error::InvalidTemporal(format!("datetime {self}")))?;
        Ok(Utc.from_utc_datetime(&naive).with_timezone(tz))
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for WireDateTime {
    fn from(dt: DateTime<Tz>) -> Self {
        let utc = dt.with_timezone(&Utc);
        Self::new(
            utc.year() as i16,
            utc.month() as i8,
            utc.day() as i8,
            utc.hour() as i8,
            utc.minute() as i8,
            utc.second() as i8,
            (utc.nanosecond() / 1_000) as i32,
        )
    }
}

impl fmt::Display for WireDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}.{:06}",
            self.year, self.month, self.day, self.hour, self.minute, self.sec, self.microsec
        )
    }
}
