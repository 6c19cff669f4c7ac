//! Edge timestamps

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Point in time attached to every edge
///
/// Stored as a naive date-time; offsets given to [`Timestamp::parse`] are
/// normalized to UTC first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(NaiveDateTime);

impl Timestamp {
    pub fn new(datetime: NaiveDateTime) -> Self {
        Self(datetime)
    }

    /// Midnight of a calendar date, `None` when the date does not exist
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self::from)
    }

    /// Parse `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM:SS[.f]` or RFC 3339
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
            return Ok(date.into());
        }
        if let Ok(datetime) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
            return Ok(Self(datetime));
        }
        if let Ok(datetime) = DateTime::parse_from_rfc3339(trimmed) {
            return Ok(Self(datetime.naive_utc()));
        }
        Err(Error::MalformedInput(format!(
            "unrecognized timestamp: {:?}",
            input
        )))
    }

    pub fn as_datetime(&self) -> NaiveDateTime {
        self.0
    }

    pub fn date(&self) -> NaiveDate {
        self.0.date()
    }
}

impl From<NaiveDate> for Timestamp {
    fn from(date: NaiveDate) -> Self {
        Self(date.and_time(NaiveTime::MIN))
    }
}

impl From<NaiveDateTime> for Timestamp {
    fn from(datetime: NaiveDateTime) -> Self {
        Self(datetime)
    }
}

impl std::str::FromStr for Timestamp {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.time() == NaiveTime::MIN {
            write!(f, "{}", self.0.date())
        } else {
            write!(f, "{}", self.0.format("%Y-%m-%dT%H:%M:%S%.f"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_parse_date_only() {
        let ts = Timestamp::parse("2024-05-17").unwrap();
        assert_eq!(ts, Timestamp::from_ymd(2024, 5, 17).unwrap());
        assert_eq!(ts.to_string(), "2024-05-17");
    }

    #[test]
    fn test_parse_rfc3339_normalizes_offset() {
        let ts = Timestamp::parse("2024-05-17T02:00:00+02:00").unwrap();
        assert_eq!(ts, Timestamp::from_ymd(2024, 5, 17).unwrap());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = Timestamp::parse("next tuesday").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
        assert!(Timestamp::from_ymd(2024, 2, 30).is_none());
    }

    #[test]
    fn test_ordering_follows_time() {
        let earlier: Timestamp = "2024-09-23".parse().unwrap();
        let later: Timestamp = "2024-11-26T08:30:00".parse().unwrap();
        assert!(earlier < later);
    }
}
