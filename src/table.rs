use std::collections::BTreeMap;
use std::sync::LazyLock;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Deserialize;

use crate::consts::{MONTHS_PER_YEAR, NEPAL_UTC_OFFSET_SECS, REFERENCE_DATE_AD};
use crate::{BsDate, DateError};

/// Error type for calendar-table loading and construction.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// The document contained no years at all.
    #[error("calendar table document is empty")]
    Empty,

    /// The document is not valid JSON of the expected shape.
    #[error("calendar table is not a valid document: {0}")]
    Parse(#[from] serde_json::Error),

    /// A top-level key did not parse as a year number.
    #[error("calendar table key {0:?} is not a year number")]
    BadYearKey(String),

    /// Covered years must form a contiguous range.
    #[error("calendar table years are not contiguous: expected {expected}, found {found}")]
    NonContiguous { expected: u16, found: u16 },

    /// A year entry is missing one of the 12 months.
    #[error("calendar table year {year} is missing month {month}")]
    MissingMonth { year: u16, month: u8 },

    /// A year entry carries a month key outside "1".."12".
    #[error("calendar table year {year} has unexpected month key {key:?}")]
    UnexpectedMonth { year: u16, key: String },

    /// Every month must have at least one day.
    #[error("calendar table year {year} month {month} has zero days")]
    EmptyMonth { year: u16, month: u8 },
}

/// One year entry of the almanac document: `{"months": {"1": 30, ..., "12": 31}}`.
#[derive(Debug, Deserialize)]
struct YearRecord {
    months: BTreeMap<String, u8>,
}

/// Month lengths of a single year, with the year total precomputed so
/// ordinal walks don't re-sum it.
#[derive(Debug, Clone)]
struct YearShape {
    months: [u8; 12],
    total: u16,
}

impl YearShape {
    fn new(months: [u8; 12]) -> Self {
        let total = months.iter().map(|&d| u16::from(d)).sum();
        Self { months, total }
    }
}

/// The Bikram Sambat almanac: month lengths for a contiguous range of years,
/// anchored to the Gregorian date of the first year's first day.
///
/// Month lengths in the BS calendar follow no closed formula; the table is
/// the source of truth for validation and all day arithmetic. A table is
/// immutable once built and freely shareable across threads.
#[derive(Debug, Clone)]
pub struct CalendarTable {
    first_year: u16,
    epoch_ad: NaiveDate,
    years: Vec<YearShape>,
}

impl CalendarTable {
    /// Builds a table from month lengths for years `first_year..`.
    ///
    /// `epoch_ad` is the Gregorian date of `first_year`-01-01.
    ///
    /// # Errors
    /// Returns `TableError::Empty` for an empty row set and
    /// `TableError::EmptyMonth` if any month length is zero.
    pub fn new(
        first_year: u16,
        epoch_ad: NaiveDate,
        rows: Vec<[u8; 12]>,
    ) -> Result<Self, TableError> {
        if rows.is_empty() {
            return Err(TableError::Empty);
        }
        let mut years = Vec::with_capacity(rows.len());
        for (i, row) in rows.into_iter().enumerate() {
            let year = first_year + i as u16;
            for (m, &len) in row.iter().enumerate() {
                if len == 0 {
                    return Err(TableError::EmptyMonth {
                        year,
                        month: m as u8 + 1,
                    });
                }
            }
            years.push(YearShape::new(row));
        }
        Ok(Self {
            first_year,
            epoch_ad,
            years,
        })
    }

    /// Parses the almanac document format: an object keyed by year (string)
    /// mapping to `{"months": {"1": n, ..., "12": n}}`.
    ///
    /// # Errors
    /// Fails on malformed JSON, non-numeric year keys, gaps in the year
    /// range, missing or extra month keys, and zero-day months. A malformed
    /// document never yields a partially usable table.
    pub fn from_json_str(doc: &str, epoch_ad: NaiveDate) -> Result<Self, TableError> {
        let raw: BTreeMap<String, YearRecord> = serde_json::from_str(doc)?;

        let mut by_year: BTreeMap<u16, YearRecord> = BTreeMap::new();
        for (key, record) in raw {
            let year = key
                .parse::<u16>()
                .map_err(|_| TableError::BadYearKey(key.clone()))?;
            by_year.insert(year, record);
        }

        let Some((&first_year, _)) = by_year.iter().next() else {
            return Err(TableError::Empty);
        };

        let mut rows = Vec::with_capacity(by_year.len());
        let mut expected = first_year;
        for (year, record) in by_year {
            if year != expected {
                return Err(TableError::NonContiguous {
                    expected,
                    found: year,
                });
            }
            expected += 1;

            for key in record.months.keys() {
                match key.parse::<u8>() {
                    Ok(m) if (1..=MONTHS_PER_YEAR).contains(&m) => {}
                    _ => {
                        return Err(TableError::UnexpectedMonth {
                            year,
                            key: key.clone(),
                        });
                    }
                }
            }

            let mut row = [0u8; 12];
            for (slot, month) in row.iter_mut().zip(1..=MONTHS_PER_YEAR) {
                let Some(&len) = record.months.get(&month.to_string()) else {
                    return Err(TableError::MissingMonth { year, month });
                };
                *slot = len;
            }
            rows.push(row);
        }

        Self::new(first_year, epoch_ad, rows)
    }

    /// The almanac shipped with the crate, covering BS 2000 through 2090 and
    /// anchored at 1943-04-14 AD. Parsed once, on first use.
    pub fn bundled() -> &'static Self {
        #[allow(clippy::expect_used)]
        static BUNDLED: LazyLock<CalendarTable> = LazyLock::new(|| {
            let (y, m, d) = REFERENCE_DATE_AD;
            let epoch =
                NaiveDate::from_ymd_opt(y, m, d).expect("reference date is a valid Gregorian date");
            CalendarTable::from_json_str(include_str!("../data/calendar.json"), epoch)
                .expect("bundled calendar table is well-formed")
        });
        &BUNDLED
    }

    /// First covered year (inclusive)
    pub const fn min_year(&self) -> u16 {
        self.first_year
    }

    /// Last covered year (inclusive)
    pub fn max_year(&self) -> u16 {
        self.first_year + self.years.len() as u16 - 1
    }

    fn year_index(&self, year: u16) -> Result<usize, DateError> {
        if !(self.first_year..=self.max_year()).contains(&year) {
            return Err(DateError::YearOutOfRange {
                year,
                min: self.first_year,
                max: self.max_year(),
            });
        }
        Ok(usize::from(year - self.first_year))
    }

    /// Number of days in the given BS month.
    ///
    /// # Errors
    /// `YearOutOfRange` if the year is uncovered (checked first),
    /// `MonthOutOfRange` if the month is not in `1..=12`.
    pub fn days_in_month(&self, year: u16, month: u8) -> Result<u8, DateError> {
        let idx = self.year_index(year)?;
        if !(1..=MONTHS_PER_YEAR).contains(&month) {
            return Err(DateError::MonthOutOfRange(month));
        }
        Ok(self.years[idx].months[usize::from(month) - 1])
    }

    /// Total number of days in the given BS year.
    ///
    /// # Errors
    /// `YearOutOfRange` if the year is uncovered.
    pub fn days_in_year(&self, year: u16) -> Result<u16, DateError> {
        Ok(self.years[self.year_index(year)?].total)
    }

    /// Validates and constructs a date against this table.
    ///
    /// Checks run year, then month, then day, stopping at the first failure.
    ///
    /// # Errors
    /// `YearOutOfRange`, `MonthOutOfRange`, or `InvalidDay`.
    pub fn ymd(&self, year: u16, month: u8, day: u8) -> Result<BsDate, DateError> {
        let max = self.days_in_month(year, month)?;
        if !(1..=max).contains(&day) {
            return Err(DateError::InvalidDay {
                year,
                month,
                day,
                max,
            });
        }
        Ok(BsDate::from_validated(year, month, day))
    }

    /// Days since `(min_year, 1, 1)`, which is ordinal 0. Monotonic and
    /// injective over the covered range; the workhorse behind all arithmetic.
    pub(crate) fn to_ordinal(&self, date: BsDate) -> Result<i64, DateError> {
        let idx = self.year_index(date.year())?;
        let mut days: i64 = self.years[..idx].iter().map(|y| i64::from(y.total)).sum();
        let shape = &self.years[idx];
        days += shape.months[..usize::from(date.month()) - 1]
            .iter()
            .map(|&d| i64::from(d))
            .sum::<i64>();
        Ok(days + i64::from(date.day()) - 1)
    }

    /// Inverse of `to_ordinal`: walks forward from the first year, peeling
    /// off whole years, then whole months, leaving the day of month.
    pub(crate) fn from_ordinal(&self, ordinal: i64) -> Result<BsDate, DateError> {
        if ordinal < 0 {
            return Err(DateError::OrdinalOutOfRange(ordinal));
        }
        let mut rest = ordinal;
        let mut idx = 0usize;
        loop {
            let Some(shape) = self.years.get(idx) else {
                return Err(DateError::OrdinalOutOfRange(ordinal));
            };
            if rest < i64::from(shape.total) {
                break;
            }
            rest -= i64::from(shape.total);
            idx += 1;
        }
        let shape = &self.years[idx];
        let mut month = 1u8;
        for &len in &shape.months {
            if rest < i64::from(len) {
                break;
            }
            rest -= i64::from(len);
            month += 1;
        }
        // rest is now < the month length, so day fits in u8
        let year = self.first_year + idx as u16;
        let day = rest as u8 + 1;
        Ok(BsDate::from_validated(year, month, day))
    }

    /// Converts a Gregorian civil date to a BS date.
    ///
    /// # Errors
    /// `GregorianOutOfRange` if the date falls outside the covered range.
    pub fn from_gregorian(&self, date: NaiveDate) -> Result<BsDate, DateError> {
        let offset = date.signed_duration_since(self.epoch_ad).num_days();
        self.from_ordinal(offset)
            .map_err(|_| DateError::GregorianOutOfRange(date))
    }

    /// Converts a BS date to its Gregorian equivalent. Exact inverse of
    /// [`CalendarTable::from_gregorian`] for every covered date.
    ///
    /// # Errors
    /// `YearOutOfRange` if the date's year is not covered by this table.
    pub fn to_gregorian(&self, date: BsDate) -> Result<NaiveDate, DateError> {
        let ordinal = self.to_ordinal(date)?;
        self.epoch_ad
            .checked_add_signed(Duration::days(ordinal))
            .ok_or(DateError::OrdinalOutOfRange(ordinal))
    }

    /// Converts a POSIX timestamp to the BS date in effect in Nepal (UTC+5:45)
    /// at that instant.
    ///
    /// # Errors
    /// `InvalidTimestamp` if the instant has no civil-date representation,
    /// `GregorianOutOfRange` if the civil date is outside the covered range.
    pub fn from_timestamp(&self, secs: i64) -> Result<BsDate, DateError> {
        let shifted = secs
            .checked_add(NEPAL_UTC_OFFSET_SECS)
            .ok_or(DateError::InvalidTimestamp(secs))?;
        let civil = DateTime::from_timestamp(shifted, 0)
            .ok_or(DateError::InvalidTimestamp(secs))?
            .date_naive();
        self.from_gregorian(civil)
    }

    /// Today's date in Nepal, from the system clock.
    ///
    /// # Errors
    /// `GregorianOutOfRange` if today is outside the covered range.
    pub fn today(&self) -> Result<BsDate, DateError> {
        self.from_timestamp(Utc::now().timestamp())
    }

    /// Moves a date by `delta` days (negative deltas move backwards).
    /// The result satisfies `diff_days(result, date) == delta` exactly.
    ///
    /// # Errors
    /// `OrdinalOutOfRange` if the result leaves the covered range.
    pub fn add_days(&self, date: BsDate, delta: i64) -> Result<BsDate, DateError> {
        let ordinal = self.to_ordinal(date)?;
        let target = ordinal
            .checked_add(delta)
            .ok_or(DateError::OrdinalOutOfRange(delta))?;
        self.from_ordinal(target)
    }

    /// Signed day count from `b` to `a`: positive when `a` is later.
    ///
    /// # Errors
    /// `YearOutOfRange` if either date is not covered by this table.
    pub fn diff_days(&self, a: BsDate, b: BsDate) -> Result<i64, DateError> {
        Ok(self.to_ordinal(a)? - self.to_ordinal(b)?)
    }
}
