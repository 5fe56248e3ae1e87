use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

use crate::errors::LedgerError;

/// Canonical textual form of a transaction date.
pub const DAY_FORMAT: &str = "%Y-%m-%d";

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parses a calendar day from `YYYY-MM-DD`, dropping any time-of-day part.
///
/// RFC 3339 stamps are converted to UTC before the day is taken; stamps
/// without an offset are read as UTC.
pub fn parse_day(value: &str) -> Result<NaiveDate, LedgerError> {
    let trimmed = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, DAY_FORMAT) {
        return Ok(date);
    }
    if let Ok(stamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(stamp.with_timezone(&Utc).date_naive());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .map(|naive| naive.date())
        .ok_or_else(|| LedgerError::InvalidDate(trimmed.to_string()))
}

/// Inclusive UTC range running from the first to the last millisecond of
/// its bounding days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl DateWindow {
    /// `[start 00:00:00.000, end 23:59:59.999]` in UTC. A window whose end
    /// precedes its start is allowed and contains nothing.
    pub fn from_days(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start: start_of_day(start),
            end: end_of_day(end),
        }
    }

    pub fn parse(start: &str, end: &str) -> Result<Self, LedgerError> {
        Ok(Self::from_days(parse_day(start)?, parse_day(end)?))
    }

    /// Window covering every day of the given calendar month.
    pub fn month(year: i32, month: u32) -> Result<Self, LedgerError> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| LedgerError::InvalidDate(format!("{year:04}-{month:02}")))?;
        let (next_year, next_month) = if month == 12 {
            (year + 1, 1)
        } else {
            (year, month + 1)
        };
        let last = NaiveDate::from_ymd_opt(next_year, next_month, 1)
            .and_then(|next| next.pred_opt())
            .ok_or_else(|| LedgerError::InvalidDate(format!("{year:04}-{month:02}")))?;
        Ok(Self::from_days(first, last))
    }

    /// Compares the day's UTC midnight against the window bounds.
    pub fn contains(&self, date: NaiveDate) -> bool {
        let stamp = start_of_day(date);
        stamp >= self.start && stamp <= self.end
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn first_day(&self) -> NaiveDate {
        self.start.date_naive()
    }

    pub fn last_day(&self) -> NaiveDate {
        self.end.date_naive()
    }

    pub fn is_single_month(&self) -> bool {
        let (first, last) = (self.first_day(), self.last_day());
        first.year() == last.year() && first.month() == last.month()
    }
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::default()))
}

fn end_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_hms_milli_opt(23, 59, 59, 999)
        .map(|naive| Utc.from_utc_datetime(&naive))
        .unwrap_or_else(|| start_of_day(date))
}

/// Serde adapter writing dates as `YYYY-MM-DD` and reading through
/// [`parse_day`].
pub mod day_format {
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&date.format(super::DAY_FORMAT))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_day(&raw).map_err(de::Error::custom)
    }
}
