mod consts;
mod digits;
mod prelude;
mod table;

pub use consts::*;
pub use digits::{is_devanagari_digits, to_ascii, to_devanagari};
pub use table::{CalendarTable, TableError};

use std::ops::{Add, Sub};
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::prelude::*;

/// Error type for date construction, conversion, and arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateError {
    /// Year outside the calendar table's covered range.
    #[error("year {year} is out of the supported range {min}..={max}")]
    YearOutOfRange { year: u16, min: u16, max: u16 },

    /// Month outside `1..=12`.
    #[error("month {0} is out of range (must be 1..=12)")]
    MonthOutOfRange(u8),

    /// Day outside `1..=days_in_month(year, month)`.
    #[error("day {day} is invalid for {year}-{month:02} (must be 1..={max})")]
    InvalidDay { year: u16, month: u8, day: u8, max: u8 },

    /// Day arithmetic left the calendar table's covered range.
    #[error("day ordinal {0} is outside the covered calendar range")]
    OrdinalOutOfRange(i64),

    /// Timestamp has no civil-date representation.
    #[error("timestamp {0} cannot be represented as a civil date")]
    InvalidTimestamp(i64),

    /// Gregorian date maps outside the calendar table's covered range.
    #[error("gregorian date {0} is outside the convertible range")]
    GregorianOutOfRange(NaiveDate),

    /// Input string is not a `YYYY-MM-DD` date.
    #[error("invalid date format: {0:?}")]
    InvalidFormat(String),
}

/// A date in the Bikram Sambat (BS) calendar.
///
/// BS month lengths vary by year according to an almanac table, so every
/// date is validated against a [`CalendarTable`] at construction and can
/// never hold an out-of-table value. Two dates with equal components are
/// equal and interchangeable; ordering is lexicographic on
/// `(year, month, day)`, which coincides with chronological order.
///
/// The inherent constructors and arithmetic use the bundled table
/// ([`CalendarTable::bundled`], BS 2000–2090); the same operations are
/// available on [`CalendarTable`] for callers supplying their own almanac.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Serialize, Deserialize,
)]
#[display(fmt = "{:04}-{:02}-{:02}", year, month, day)]
#[serde(try_from = "String", into = "String")]
pub struct BsDate {
    year: u16,
    month: u8,
    day: u8,
}

impl BsDate {
    /// Creates a date, validating year, month, and day (in that order)
    /// against the bundled calendar table.
    ///
    /// # Errors
    /// `YearOutOfRange`, `MonthOutOfRange`, or `InvalidDay`.
    pub fn new(year: u16, month: u8, day: u8) -> Result<Self, DateError> {
        CalendarTable::bundled().ymd(year, month, day)
    }

    /// Invariants already checked by a table; crate-internal.
    pub(crate) const fn from_validated(year: u16, month: u8, day: u8) -> Self {
        Self { year, month, day }
    }

    /// Converts a Gregorian civil date via the bundled table.
    ///
    /// # Errors
    /// `GregorianOutOfRange` if the date maps outside BS 2000–2090.
    pub fn from_gregorian(date: NaiveDate) -> Result<Self, DateError> {
        CalendarTable::bundled().from_gregorian(date)
    }

    /// Converts a POSIX timestamp to the BS date in effect in Nepal
    /// (UTC+5:45) at that instant, via the bundled table.
    ///
    /// # Errors
    /// `InvalidTimestamp` or `GregorianOutOfRange`.
    pub fn from_timestamp(secs: i64) -> Result<Self, DateError> {
        CalendarTable::bundled().from_timestamp(secs)
    }

    /// Today's date in Nepal, from the system clock.
    ///
    /// # Errors
    /// `GregorianOutOfRange` if today is outside BS 2000–2090.
    pub fn today() -> Result<Self, DateError> {
        CalendarTable::bundled().today()
    }

    /// Returns the BS year
    pub const fn year(self) -> u16 {
        self.year
    }

    /// Returns the month (1 = Baisakh, ..., 12 = Chaitra)
    pub const fn month(self) -> u8 {
        self.month
    }

    /// Returns the day of month
    pub const fn day(self) -> u8 {
        self.day
    }

    /// The Gregorian equivalent of this date.
    ///
    /// # Errors
    /// `YearOutOfRange` if this date is not covered by the bundled table
    /// (possible only for dates built against a different table).
    pub fn to_gregorian(self) -> Result<NaiveDate, DateError> {
        CalendarTable::bundled().to_gregorian(self)
    }

    /// Moves this date by `delta` days; negative deltas move backwards.
    ///
    /// # Errors
    /// `OrdinalOutOfRange` if the result leaves the covered range.
    pub fn add_days(self, delta: i64) -> Result<Self, DateError> {
        CalendarTable::bundled().add_days(self, delta)
    }

    /// Signed day count from `other` to `self`: positive when `self` is later.
    ///
    /// # Errors
    /// `YearOutOfRange` if either date is not covered by the bundled table.
    pub fn diff_days(self, other: Self) -> Result<i64, DateError> {
        CalendarTable::bundled().diff_days(self, other)
    }

    /// Returns a new date with the given fields replaced, re-validated
    /// from scratch.
    ///
    /// # Errors
    /// Same as [`BsDate::new`] for the resulting components.
    pub fn replace(
        self,
        year: Option<u16>,
        month: Option<u8>,
        day: Option<u8>,
    ) -> Result<Self, DateError> {
        Self::new(
            year.unwrap_or(self.year),
            month.unwrap_or(self.month),
            day.unwrap_or(self.day),
        )
    }

    /// ISO rendering, fixed-width `"YYYY-MM-DD"`. Same as `Display`.
    pub fn isoformat(self) -> String {
        self.to_string()
    }
}

impl FromStr for BsDate {
    type Err = DateError;

    /// Parses `"YYYY-MM-DD"` and validates against the bundled table.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let parts: Vec<&str> = trimmed.split(DATE_SEPARATOR).collect();
        if parts.len() != 3 {
            return Err(DateError::InvalidFormat(s.to_owned()));
        }
        let year = parts[0]
            .parse::<u16>()
            .map_err(|_| DateError::InvalidFormat(s.to_owned()))?;
        let month = parts[1]
            .parse::<u8>()
            .map_err(|_| DateError::InvalidFormat(s.to_owned()))?;
        let day = parts[2]
            .parse::<u8>()
            .map_err(|_| DateError::InvalidFormat(s.to_owned()))?;
        Self::new(year, month, day)
    }
}

impl TryFrom<String> for BsDate {
    type Error = DateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BsDate> for String {
    fn from(date: BsDate) -> Self {
        date.to_string()
    }
}

impl Add<i64> for BsDate {
    type Output = Self;

    /// Operator form of [`BsDate::add_days`].
    ///
    /// # Panics
    /// Panics if the result leaves the bundled table's covered range; use
    /// [`BsDate::add_days`] for a fallible version.
    #[allow(clippy::expect_used)]
    fn add(self, delta: i64) -> Self {
        self.add_days(delta)
            .expect("date arithmetic left the covered calendar range")
    }
}

impl Sub<i64> for BsDate {
    type Output = Self;

    /// Operator form of [`BsDate::add_days`] with a negated delta.
    ///
    /// # Panics
    /// Panics if the result leaves the bundled table's covered range; use
    /// [`BsDate::add_days`] for a fallible version.
    #[allow(clippy::expect_used)]
    fn sub(self, delta: i64) -> Self {
        let delta = delta.checked_neg().expect("day delta negation overflowed");
        self.add_days(delta)
            .expect("date arithmetic left the covered calendar range")
    }
}

impl Sub for BsDate {
    type Output = i64;

    /// Operator form of [`BsDate::diff_days`].
    ///
    /// # Panics
    /// Panics if either date is not covered by the bundled table; use
    /// [`BsDate::diff_days`] for a fallible version.
    #[allow(clippy::expect_used)]
    fn sub(self, other: Self) -> i64 {
        self.diff_days(other)
            .expect("date difference left the covered calendar range")
    }
}
