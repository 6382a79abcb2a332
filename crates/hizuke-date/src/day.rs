//! A single calendar day in a timezone.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveTime, TimeDelta, Weekday};
use hizuke_core::constants::DATE_FORMAT;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::clock::Clock;
use crate::error::{DateError, DateResult};
use crate::month::Month;
use crate::parse::parse_datetime;
use crate::period::{Operation, shift_methods};
use crate::range::DateRange;
use crate::zone::{Zone, ZonedInput};

/// An immutable calendar day, anchored at midnight in its timezone.
///
/// Days compare by their midnight instant. Two days are equal when both the
/// calendar date and that instant agree, so `2020-01-01` in Tokyo and
/// `2020-01-01` in UTC are different, ordered days.
///
/// Serializes as `{ "date": "2020-01-01", "zone": "Asia/Tokyo" }`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Day {
    date: NaiveDate,
    zone: Zone,
}

impl Day {
    #[must_use]
    pub const fn new(date: NaiveDate, zone: Zone) -> Self {
        Self { date, zone }
    }

    /// ## Summary
    /// Wraps a zoned date-time, dropping its time of day.
    #[must_use]
    pub fn from_datetime(input: &impl ZonedInput) -> Self {
        Self::new(input.local().date(), input.zone())
    }

    /// ## Summary
    /// Parses a date or date-time string. Text without an offset is taken to be UTC.
    ///
    /// ## Errors
    /// Returns `DateError::Parse` if the text is not a recognizable date.
    pub fn parse(text: &str) -> DateResult<Self> {
        Self::parse_in(text, Zone::utc())
    }

    /// ## Summary
    /// Parses a date or date-time string. Text without an offset is taken to be
    /// in the clock's ambient zone.
    ///
    /// ## Errors
    /// Returns `DateError::Parse` if the text is not a recognizable date.
    pub fn parse_with(text: &str, clock: &impl Clock) -> DateResult<Self> {
        Self::parse_in(text, clock.zone())
    }

    fn parse_in(text: &str, ambient: Zone) -> DateResult<Self> {
        let parsed = parse_datetime(text)?;
        Ok(Self::new(parsed.local.date(), parsed.zone_or(ambient)))
    }

    /// ## Summary
    /// Returns the current day in the clock's ambient zone.
    #[must_use]
    pub fn today(clock: &impl Clock) -> Self {
        let zone = clock.zone();
        Self::new(clock.today_in(zone), zone)
    }

    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    #[must_use]
    pub const fn zone(&self) -> Zone {
        self.zone
    }

    #[must_use]
    pub fn year(&self) -> i32 {
        self.date.year()
    }

    #[must_use]
    pub fn month_number(&self) -> u32 {
        self.date.month()
    }

    #[must_use]
    pub fn day_of_month(&self) -> u32 {
        self.date.day()
    }

    #[must_use]
    pub fn weekday(&self) -> Weekday {
        self.date.weekday()
    }

    /// ## Summary
    /// The same calendar date in another timezone.
    #[must_use]
    pub const fn in_zone(&self, zone: Zone) -> Self {
        Self::new(self.date, zone)
    }

    /// ## Errors
    /// Returns `DateError::OutOfRange` on the last representable date.
    pub fn next(&self) -> DateResult<Self> {
        self.add_day()
    }

    /// ## Errors
    /// Returns `DateError::OutOfRange` on the first representable date.
    pub fn prev(&self) -> DateResult<Self> {
        self.sub_day()
    }

    #[must_use]
    pub fn is_first_of_month(&self) -> bool {
        self.date.day() == 1
    }

    #[must_use]
    pub fn is_last_of_month(&self) -> bool {
        self.date.succ_opt().is_none_or(|next| next.month() != self.date.month())
    }

    #[must_use]
    pub fn is_weekday(&self) -> bool {
        !self.is_weekend()
    }

    #[must_use]
    pub fn is_weekend(&self) -> bool {
        matches!(self.weekday(), Weekday::Sat | Weekday::Sun)
    }

    #[must_use]
    pub fn is_monday(&self) -> bool {
        self.weekday() == Weekday::Mon
    }

    #[must_use]
    pub fn is_tuesday(&self) -> bool {
        self.weekday() == Weekday::Tue
    }

    #[must_use]
    pub fn is_wednesday(&self) -> bool {
        self.weekday() == Weekday::Wed
    }

    #[must_use]
    pub fn is_thursday(&self) -> bool {
        self.weekday() == Weekday::Thu
    }

    #[must_use]
    pub fn is_friday(&self) -> bool {
        self.weekday() == Weekday::Fri
    }

    #[must_use]
    pub fn is_saturday(&self) -> bool {
        self.weekday() == Weekday::Sat
    }

    #[must_use]
    pub fn is_sunday(&self) -> bool {
        self.weekday() == Weekday::Sun
    }

    /// Current day as seen from this day's own timezone.
    fn today_here(&self, clock: &impl Clock) -> NaiveDate {
        clock.today_in(self.zone)
    }

    #[must_use]
    pub fn is_yesterday(&self, clock: &impl Clock) -> bool {
        self.today_here(clock).pred_opt() == Some(self.date)
    }

    #[must_use]
    pub fn is_today(&self, clock: &impl Clock) -> bool {
        self.today_here(clock) == self.date
    }

    #[must_use]
    pub fn is_tomorrow(&self, clock: &impl Clock) -> bool {
        self.today_here(clock).succ_opt() == Some(self.date)
    }

    /// Strictly before today.
    #[must_use]
    pub fn is_past(&self, clock: &impl Clock) -> bool {
        self.date < self.today_here(clock)
    }

    /// Strictly after today.
    #[must_use]
    pub fn is_future(&self, clock: &impl Clock) -> bool {
        self.date > self.today_here(clock)
    }

    /// ## Summary
    /// Signed number of calendar days from this day to `other`.
    #[must_use]
    pub fn days_until(&self, other: &Self) -> i64 {
        other.date.signed_duration_since(self.date).num_days()
    }

    shift_methods! {
        Day => add_day, add_days, sub_day, sub_days;
        Week => add_week, add_weeks, sub_week, sub_weeks;
        Month => add_month, add_months, sub_month, sub_months;
        Quarter => add_quarter, add_quarters, sub_quarter, sub_quarters;
        Year => add_year, add_years, sub_year, sub_years;
        Century => add_century, add_centuries, sub_century, sub_centuries;
    }

    fn shift(&self, operation: Operation, amount: u32) -> DateResult<Self> {
        Ok(Self::new(operation.apply(self.date, amount)?, self.zone))
    }

    /// ## Summary
    /// Runs a named add/subtract operation such as `addDays` or `sub_month`.
    ///
    /// ## Errors
    /// Returns `DateError::MethodNotSupported` for an unknown name and
    /// `DateError::OutOfRange` if the result is not representable.
    pub fn apply(&self, method: &str, amount: u32) -> DateResult<Self> {
        self.shift(Operation::from_name("Day", method)?, amount)
    }

    /// ## Summary
    /// Midnight at the start of this day.
    #[must_use]
    pub fn start_of_day(&self) -> DateTime<FixedOffset> {
        self.zone.resolve(self.date.and_time(NaiveTime::MIN))
    }

    /// ## Summary
    /// The last instant before the next midnight, i.e. `23:59:59.999999999`
    /// on an ordinary day.
    #[must_use]
    pub fn end_of_day(&self) -> DateTime<FixedOffset> {
        match self.date.succ_opt() {
            Some(next) => {
                let next_midnight = self.zone.resolve(next.and_time(NaiveTime::MIN));
                next_midnight
                    .checked_sub_signed(TimeDelta::nanoseconds(1))
                    .unwrap_or(next_midnight)
            }
            None => self.at(NaiveTime::MIN + TimeDelta::nanoseconds(-1)),
        }
    }

    /// Instant of a wall-clock time on this day.
    pub(crate) fn at(&self, time: NaiveTime) -> DateTime<FixedOffset> {
        self.zone.resolve(self.date.and_time(time))
    }

    /// ## Summary
    /// The month containing this day.
    #[must_use]
    pub fn month(&self) -> Month {
        Month::containing(self.date, self.zone)
    }

    /// ## Summary
    /// Builds the range from this day to `end`.
    ///
    /// ## Errors
    /// Fails like [`DateRange::new`].
    pub fn range_to(&self, end: &Self) -> DateResult<DateRange> {
        DateRange::new(*self, *end)
    }

    /// ## Summary
    /// Builds the range from `start` to this day.
    ///
    /// ## Errors
    /// Fails like [`DateRange::new`].
    pub fn range_from(&self, start: &Self) -> DateResult<DateRange> {
        DateRange::new(*start, *self)
    }

    fn sort_key(&self) -> (i64, NaiveDate) {
        (self.zone.timestamp(self.date.and_time(NaiveTime::MIN)), self.date)
    }
}

impl PartialEq for Day {
    fn eq(&self, other: &Self) -> bool {
        self.sort_key() == other.sort_key()
    }
}

impl Eq for Day {}

impl PartialOrd for Day {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Day {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl Hash for Day {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.sort_key().hash(state);
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.date.format(DATE_FORMAT))
    }
}

impl FromStr for Day {
    type Err = DateError;

    fn from_str(s: &str) -> DateResult<Self> {
        Self::parse(s)
    }
}
