//! Charter date normalization and encoding.
//!
//! Callers hand in dates in many shapes: ISO strings, MOM-CA date strings
//! (`13070222`, `13079999`), chrono calendar values or already normalized
//! [`CanonicalTime`]s, either alone or as a `(from, to)` pair. [`normalize`]
//! turns all of them into an optional [`DateValue`], and [`encode_date`]
//! renders that value as `cei:date` or `cei:dateRange`.

mod encode;
mod mom;
mod normalize;

use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};

use crate::error::{CeiError, Result};

pub use encode::encode_date;
pub use mom::{last_day_of_month, parse_mom};
pub use normalize::normalize;

/// A point in time on the proleptic Gregorian calendar with astronomical
/// year numbering (year 0 exists, 1 BC is year 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CanonicalTime(NaiveDateTime);

impl CanonicalTime {
    /// Midnight of the given calendar day.
    ///
    /// Fails when the day does not exist, e.g. February 30.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(Self)
            .ok_or_else(|| CeiError::InvalidDate(format!("{year}-{month:02}-{day:02}")))
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// The underlying chrono value.
    pub fn as_naive(&self) -> NaiveDateTime {
        self.0
    }

    /// MOM-CA date value: year padded to at least three digits with a
    /// leading `-` for negative years, followed by two digit month and day.
    ///
    /// # Examples
    /// ```
    /// use to_cei::date::CanonicalTime;
    ///
    /// let time = CanonicalTime::from_ymd(1307, 2, 22).unwrap();
    /// assert_eq!(time.to_mom_value(), "13070222");
    /// let early = CanonicalTime::from_ymd(-44, 3, 15).unwrap();
    /// assert_eq!(early.to_mom_value(), "-0440315");
    /// ```
    pub fn to_mom_value(&self) -> String {
        let year = self.year();
        let year = if year < 0 {
            format!("-{:03}", year.unsigned_abs())
        } else {
            format!("{year:03}")
        };
        format!("{year}{:02}{:02}", self.month(), self.day())
    }

    /// Signed long date with a five digit year, e.g. `+01300-01-01`.
    pub fn to_long_date(&self) -> String {
        let sign = if self.year() < 0 { '-' } else { '+' };
        format!(
            "{sign}{:05}-{:02}-{:02}",
            self.year().unsigned_abs(),
            self.month(),
            self.day()
        )
    }
}

impl fmt::Display for CanonicalTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_long_date())
    }
}

impl From<NaiveDateTime> for CanonicalTime {
    fn from(value: NaiveDateTime) -> Self {
        Self(value)
    }
}

impl From<NaiveDate> for CanonicalTime {
    fn from(value: NaiveDate) -> Self {
        Self(NaiveDateTime::from(value))
    }
}

impl From<DateTime<Utc>> for CanonicalTime {
    fn from(value: DateTime<Utc>) -> Self {
        Self(value.naive_utc())
    }
}

/// An inclusive span of days with `from <= to`. Times of day are kept but
/// not compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    from: CanonicalTime,
    to: CanonicalTime,
}

impl TimeRange {
    pub fn new(from: CanonicalTime, to: CanonicalTime) -> Result<Self> {
        if from.as_naive().date() > to.as_naive().date() {
            return Err(CeiError::InvertedDateRange {
                from: from.to_long_date(),
                to: to.to_long_date(),
            });
        }
        Ok(Self { from, to })
    }

    pub fn from(&self) -> CanonicalTime {
        self.from
    }

    pub fn to(&self) -> CanonicalTime {
        self.to
    }
}

/// A normalized charter date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateValue {
    Single(CanonicalTime),
    Range(TimeRange),
}

impl From<CanonicalTime> for DateValue {
    fn from(value: CanonicalTime) -> Self {
        Self::Single(value)
    }
}

impl From<TimeRange> for DateValue {
    fn from(value: TimeRange) -> Self {
        Self::Range(value)
    }
}

/// One side of a date input.
#[derive(Debug, Clone, PartialEq)]
pub enum DatePart {
    /// An ISO or MOM-CA date string.
    Text(String),
    /// A calendar value; converted without string parsing.
    Calendar(NaiveDateTime),
    /// An already normalized value, taken as is.
    Canonical(CanonicalTime),
}

impl DatePart {
    /// Short name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Calendar(_) => "calendar",
            Self::Canonical(_) => "canonical",
        }
    }
}

impl From<&str> for DatePart {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for DatePart {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<NaiveDateTime> for DatePart {
    fn from(value: NaiveDateTime) -> Self {
        Self::Calendar(value)
    }
}

impl From<NaiveDate> for DatePart {
    fn from(value: NaiveDate) -> Self {
        Self::Calendar(NaiveDateTime::from(value))
    }
}

impl From<DateTime<Utc>> for DatePart {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Calendar(value.naive_utc())
    }
}

impl From<CanonicalTime> for DatePart {
    fn from(value: CanonicalTime) -> Self {
        Self::Canonical(value)
    }
}

/// Everything a caller may supply as a charter date value.
///
/// # Examples
/// ```
/// use to_cei::date::{DateInput, DatePart};
///
/// assert_eq!(DateInput::from(""), DateInput::Empty);
/// assert_eq!(
///     DateInput::from(("13000101", "13001231")),
///     DateInput::Pair(DatePart::from("13000101"), DatePart::from("13001231"))
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DateInput {
    #[default]
    Empty,
    Single(DatePart),
    Pair(DatePart, DatePart),
}

impl From<&str> for DateInput {
    fn from(value: &str) -> Self {
        if value.is_empty() {
            Self::Empty
        } else {
            Self::Single(value.into())
        }
    }
}

impl From<String> for DateInput {
    fn from(value: String) -> Self {
        value.as_str().into()
    }
}

impl From<Option<&str>> for DateInput {
    fn from(value: Option<&str>) -> Self {
        value.map(Self::from).unwrap_or_default()
    }
}

impl From<NaiveDateTime> for DateInput {
    fn from(value: NaiveDateTime) -> Self {
        Self::Single(value.into())
    }
}

impl From<NaiveDate> for DateInput {
    fn from(value: NaiveDate) -> Self {
        Self::Single(value.into())
    }
}

impl From<DateTime<Utc>> for DateInput {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Single(value.into())
    }
}

impl From<CanonicalTime> for DateInput {
    fn from(value: CanonicalTime) -> Self {
        Self::Single(value.into())
    }
}

impl<A, B> From<(A, B)> for DateInput
where
    A: Into<DatePart>,
    B: Into<DatePart>,
{
    fn from((from, to): (A, B)) -> Self {
        Self::Pair(from.into(), to.into())
    }
}
