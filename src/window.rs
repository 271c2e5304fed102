use std::{fmt::Display, str::FromStr};

use chrono::{Duration, Local, NaiveDateTime, NaiveTime};
use thiserror::Error;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

#[derive(Error, Debug, PartialEq, Eq)]
#[error("invalid utc offset {0:?}, expected ±HH:MM")]
pub struct InvalidOffset(String);

/// Fixed `±HH:MM` suffix appended to every timestamp sent to the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UtcOffset(String);

impl FromStr for UtcOffset {
    type Err = InvalidOffset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidOffset(s.to_string());

        let bytes = s.as_bytes();
        if bytes.len() != 6 || !matches!(bytes[0], b'+' | b'-') || bytes[3] != b':' {
            return Err(invalid());
        }

        let hours: u8 = s[1..3].parse().map_err(|_| invalid())?;
        let minutes: u8 = s[4..6].parse().map_err(|_| invalid())?;
        if !s[1..3].bytes().all(|b| b.is_ascii_digit())
            || !s[4..6].bytes().all(|b| b.is_ascii_digit())
            || hours > 23
            || minutes > 59
        {
            return Err(invalid());
        }

        Ok(UtcOffset(s.to_string()))
    }
}

impl Display for UtcOffset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reporting interval covering the previous calendar day, from 00:01 to today's 00:00.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeWindow {
    start: NaiveDateTime,
    end: NaiveDateTime,
    offset: UtcOffset,
}

impl TimeWindow {
    pub fn previous_day(now: NaiveDateTime, offset: UtcOffset) -> TimeWindow {
        let end = now.date().and_time(NaiveTime::MIN);
        let start = end - Duration::days(1) + Duration::minutes(1);

        TimeWindow { start, end, offset }
    }

    pub fn previous_day_from_now(offset: UtcOffset) -> TimeWindow {
        TimeWindow::previous_day(Local::now().naive_local(), offset)
    }

    #[cfg(test)]
    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    #[cfg(test)]
    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    pub fn start_str(&self) -> String {
        self.format(self.start)
    }

    pub fn end_str(&self) -> String {
        self.format(self.end)
    }

    // wall-clock values are local, the offset is only a label
    fn format(&self, at: NaiveDateTime) -> String {
        format!("{}{}", at.format(TIMESTAMP_FORMAT), self.offset)
    }
}
