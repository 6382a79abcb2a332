//! A calendar month in a timezone.

use chrono::{DateTime, Datelike, FixedOffset, Months, NaiveDate, NaiveTime};
use hizuke_core::constants::MONTH_FORMAT;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::clock::Clock;
use crate::day::Day;
use crate::error::{DateError, DateResult};
use crate::parse::parse_month;
use crate::period::{Operation, shift_methods};
use crate::range::{DateRange, DayIter};
use crate::zone::{Zone, ZonedInput};

const TYPE_NAME: &str = "Month";

/// An immutable calendar month, anchored at midnight on its first day.
///
/// Serializes as `{ "month": "2020-11", "zone": "Asia/Tokyo" }`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(try_from = "MonthRepr", into = "MonthRepr")]
pub struct Month {
    first: NaiveDate,
    zone: Zone,
}

impl Month {
    /// ## Summary
    /// Builds a month from a year and a month number (1..=12).
    ///
    /// ## Errors
    /// Returns `DateError::OutOfRange` if the pair does not name a representable month.
    pub fn new(year: i32, month: u32, zone: Zone) -> DateResult<Self> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(|first| Self { first, zone })
            .ok_or_else(|| DateError::OutOfRange(format!("{year:04}-{month:02}")))
    }

    pub(crate) fn containing(date: NaiveDate, zone: Zone) -> Self {
        // Day 1 exists for every month that contains a valid date.
        let first = date.with_day(1).unwrap_or(date);
        Self { first, zone }
    }

    /// ## Summary
    /// Wraps a zoned date-time, truncating it to the start of its month.
    #[must_use]
    pub fn from_datetime(input: &impl ZonedInput) -> Self {
        Self::containing(input.local().date(), input.zone())
    }

    /// ## Summary
    /// Parses `YYYY-MM` or any date text [`Day::parse`] accepts. Text without an
    /// offset is taken to be UTC.
    ///
    /// ## Errors
    /// Returns `DateError::Parse` if the text is not a recognizable month or date.
    pub fn parse(text: &str) -> DateResult<Self> {
        Self::parse_in(text, Zone::utc())
    }

    /// ## Summary
    /// Like [`Month::parse`], with offset-less text taken to be in the clock's ambient zone.
    ///
    /// ## Errors
    /// Returns `DateError::Parse` if the text is not a recognizable month or date.
    pub fn parse_with(text: &str, clock: &impl Clock) -> DateResult<Self> {
        Self::parse_in(text, clock.zone())
    }

    fn parse_in(text: &str, ambient: Zone) -> DateResult<Self> {
        let parsed = parse_month(text)?;
        Ok(Self::containing(parsed.local.date(), parsed.zone_or(ambient)))
    }

    /// ## Summary
    /// Returns the current month in the clock's ambient zone.
    #[must_use]
    pub fn this_month(clock: &impl Clock) -> Self {
        let zone = clock.zone();
        Self::containing(clock.today_in(zone), zone)
    }

    #[must_use]
    pub fn year(&self) -> i32 {
        self.first.year()
    }

    #[must_use]
    pub fn month_number(&self) -> u32 {
        self.first.month()
    }

    #[must_use]
    pub const fn zone(&self) -> Zone {
        self.zone
    }

    /// ## Errors
    /// Returns `DateError::OutOfRange` on the last representable month.
    pub fn next(&self) -> DateResult<Self> {
        self.add_month()
    }

    /// ## Errors
    /// Returns `DateError::OutOfRange` on the first representable month.
    pub fn prev(&self) -> DateResult<Self> {
        self.sub_month()
    }

    /// Current month as seen from this month's own timezone.
    fn current(&self, clock: &impl Clock) -> Self {
        Self::containing(clock.today_in(self.zone), self.zone)
    }

    #[must_use]
    pub fn is_past(&self, clock: &impl Clock) -> bool {
        self.first < self.current(clock).first
    }

    #[must_use]
    pub fn is_future(&self, clock: &impl Clock) -> bool {
        self.first > self.current(clock).first
    }

    #[must_use]
    pub fn is_current_month(&self, clock: &impl Clock) -> bool {
        self.first == self.current(clock).first
    }

    #[must_use]
    pub fn is_next_month(&self, clock: &impl Clock) -> bool {
        self.current(clock)
            .next()
            .is_ok_and(|next| next.first == self.first)
    }

    #[must_use]
    pub fn is_last_month(&self, clock: &impl Clock) -> bool {
        self.current(clock)
            .prev()
            .is_ok_and(|prev| prev.first == self.first)
    }

    #[must_use]
    pub fn first_date(&self) -> Day {
        Day::new(self.first, self.zone)
    }

    #[must_use]
    pub fn last_date(&self) -> Day {
        Day::new(self.last(), self.zone)
    }

    fn last(&self) -> NaiveDate {
        // Only December of the final representable year has no following month.
        self.first
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(NaiveDate::MAX)
    }

    #[must_use]
    pub fn days_in_month(&self) -> u32 {
        self.last().day()
    }

    /// Whether `day` falls in this month, in this month's timezone.
    #[must_use]
    pub fn contains(&self, day: &Day) -> bool {
        day.zone().name() == self.zone.name() && (self.first..=self.last()).contains(&day.date())
    }

    /// ## Summary
    /// Iterates over every day of the month in order.
    #[must_use]
    pub fn days(&self) -> DayIter {
        DayIter::new(self.first, self.last(), self.zone)
    }

    /// ## Summary
    /// Midnight on the first day.
    #[must_use]
    pub fn start_of_month(&self) -> DateTime<FixedOffset> {
        self.zone.resolve(self.first.and_time(NaiveTime::MIN))
    }

    /// ## Summary
    /// The last instant before the following month starts.
    #[must_use]
    pub fn end_of_month(&self) -> DateTime<FixedOffset> {
        self.last_date().end_of_day()
    }

    /// ## Summary
    /// The range spanning the month's first to last day.
    #[must_use]
    pub fn to_date_range(&self) -> DateRange {
        DateRange::from_ordered(self.first_date(), self.last_date())
    }

    shift_methods! {
        Month => add_month, add_months, sub_month, sub_months;
        Quarter => add_quarter, add_quarters, sub_quarter, sub_quarters;
        Year => add_year, add_years, sub_year, sub_years;
        Century => add_century, add_centuries, sub_century, sub_centuries;
    }

    fn shift(&self, operation: Operation, amount: u32) -> DateResult<Self> {
        Ok(Self::containing(
            operation.apply(self.first, amount)?,
            self.zone,
        ))
    }

    /// ## Summary
    /// Runs a named month-granularity operation such as `addMonths` or `sub_year`.
    ///
    /// ## Errors
    /// Returns `DateError::MethodNotSupported` for unknown names and for
    /// day or week operations, and `DateError::OutOfRange` if the result is not
    /// representable.
    pub fn apply(&self, method: &str, amount: u32) -> DateResult<Self> {
        let operation = Operation::from_name(TYPE_NAME, method)?;

        if !operation.period.is_month_based() {
            return Err(DateError::MethodNotSupported {
                type_name: TYPE_NAME,
                method: method.to_string(),
            });
        }

        self.shift(operation, amount)
    }

    fn sort_key(&self) -> (i64, NaiveDate) {
        (self.zone.timestamp(self.first.and_time(NaiveTime::MIN)), self.first)
    }
}

impl PartialEq for Month {
    fn eq(&self, other: &Self) -> bool {
        self.sort_key() == other.sort_key()
    }
}

impl Eq for Month {}

impl PartialOrd for Month {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Month {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl Hash for Month {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.sort_key().hash(state);
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.first.format(MONTH_FORMAT))
    }
}

impl FromStr for Month {
    type Err = DateError;

    fn from_str(s: &str) -> DateResult<Self> {
        Self::parse(s)
    }
}

#[derive(Serialize, Deserialize)]
struct MonthRepr {
    month: String,
    zone: Zone,
}

impl From<Month> for MonthRepr {
    fn from(month: Month) -> Self {
        Self {
            month: month.to_string(),
            zone: month.zone,
        }
    }
}

impl TryFrom<MonthRepr> for Month {
    type Error = DateError;

    fn try_from(repr: MonthRepr) -> DateResult<Self> {
        let parsed = parse_month(&repr.month)?;
        Ok(Self::containing(parsed.local.date(), repr.zone))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::{NaiveDateTime, TimeDelta, TimeZone, Utc};

    fn month(text: &str) -> Month {
        Month::parse(text).expect("valid month")
    }

    fn clock_at(text: &str) -> FixedClock {
        let local = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S").unwrap();
        FixedClock::at_local(local, Zone::utc())
    }

    #[test]
    fn test_construct_truncates_to_first_of_month() {
        let input = Utc.with_ymd_and_hms(2020, 11, 22, 10, 0, 0).unwrap();
        let subject = Month::from_datetime(&input);

        assert_eq!(subject.to_string(), "2020-11");
        assert_eq!(
            subject.start_of_month().format("%Y-%m-%d %H:%M:%S").to_string(),
            "2020-11-01 00:00:00"
        );
    }

    #[test]
    fn test_new_validates_month_number() {
        assert_eq!(Month::new(2020, 2, Zone::utc()).unwrap().to_string(), "2020-02");
        assert!(matches!(
            Month::new(2020, 13, Zone::utc()),
            Err(DateError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_next_and_prev() {
        let subject = month("2020-11-22 10:00:00");

        assert_eq!(subject.next().unwrap().to_string(), "2020-12");
        assert_eq!(subject.prev().unwrap().to_string(), "2020-10");
        assert_eq!(month("2020-12").next().unwrap().to_string(), "2021-01");
        assert_eq!(month("2021-01").prev().unwrap().to_string(), "2020-12");
    }

    #[test]
    fn test_past_and_future() {
        let clock = clock_at("2020-11-22 10:20:30");

        assert!(month("2020-10").is_past(&clock));
        assert!(!month("2020-11").is_past(&clock));
        assert!(!month("2020-12").is_past(&clock));

        assert!(!month("2020-10").is_future(&clock));
        assert!(!month("2020-11").is_future(&clock));
        assert!(month("2020-12").is_future(&clock));
    }

    #[test_log::test]
    fn test_relative_determinations() {
        let clock = clock_at("2020-11-22 10:20:30");

        for (text, current, next, last) in [
            ("2020-09", false, false, false),
            ("2020-10", false, false, true),
            ("2020-11", true, false, false),
            ("2020-12", false, true, false),
            ("2021-01", false, false, false),
        ] {
            let subject = month(text);
            assert_eq!(subject.is_current_month(&clock), current, "{text}");
            assert_eq!(subject.is_next_month(&clock), next, "{text}");
            assert_eq!(subject.is_last_month(&clock), last, "{text}");
        }
    }

    #[test]
    fn test_first_and_last_date() {
        let subject = month("2020-11-22 10:00:00");

        assert_eq!(subject.first_date().to_string(), "2020-11-01");
        assert_eq!(subject.last_date().to_string(), "2020-11-30");
        assert_eq!(month("2020-02").last_date().to_string(), "2020-02-29");
        assert_eq!(month("2021-02").last_date().to_string(), "2021-02-28");
        assert_eq!(month("2020-12").last_date().to_string(), "2020-12-31");
    }

    #[test]
    fn test_start_and_end_of_month() {
        let subject = month("2020-11-22 10:00:00");

        assert_eq!(
            subject.start_of_month().format("%Y-%m-%d %H:%M:%S").to_string(),
            "2020-11-01 00:00:00"
        );
        assert_eq!(
            subject.end_of_month().format("%Y-%m-%d %H:%M:%S").to_string(),
            "2020-11-30 23:59:59"
        );
    }

    #[test]
    fn test_to_date_range() {
        let range = month("2020-11").to_date_range();

        assert_eq!(range.start().to_string(), "2020-11-01");
        assert_eq!(range.end().to_string(), "2020-11-30");
        assert_eq!(range.length_in_days(), 30);
    }

    #[test]
    fn test_days_and_contains() {
        let subject = month("2020-02");
        let days: Vec<String> = subject.days().map(|d| d.to_string()).collect();

        assert_eq!(days.len(), 29);
        assert_eq!(subject.days_in_month(), 29);
        assert_eq!(days.first().map(String::as_str), Some("2020-02-01"));
        assert_eq!(days.last().map(String::as_str), Some("2020-02-29"));

        assert!(subject.contains(&Day::parse("2020-02-15").unwrap()));
        assert!(!subject.contains(&Day::parse("2020-03-01").unwrap()));
        assert!(!subject.contains(&Day::parse("2020-02-15T00:00:00+09:00").unwrap()));
    }

    #[test]
    fn test_comparisons() {
        let earlier = month("2020-10");
        let later = month("2020-11");

        assert!(earlier < later);
        assert!(later >= earlier);
        assert_eq!(earlier, month("2020-10-31 23:59:59"));
        assert_ne!(earlier, later);
    }

    #[test]
    fn test_arithmetic() {
        let base = month("2020-11-22");

        assert_eq!(base.add_months(2).unwrap().to_string(), "2021-01");
        assert_eq!(base.sub_month().unwrap().to_string(), "2020-10");
        assert_eq!(base.add_quarters(2).unwrap().to_string(), "2021-05");
        assert_eq!(base.sub_quarter().unwrap().to_string(), "2020-08");
        assert_eq!(base.add_year().unwrap().to_string(), "2021-11");
        assert_eq!(base.sub_years(2).unwrap().to_string(), "2018-11");
        assert_eq!(base.add_centuries(2).unwrap().to_string(), "2220-11");
        assert_eq!(base.sub_century().unwrap().to_string(), "1920-11");
    }

    #[test]
    fn test_apply_named_operation() {
        let base = month("2020-11");

        assert_eq!(base.apply("addMonths", 2).unwrap().to_string(), "2021-01");
        assert_eq!(base.apply("sub_quarters", 1).unwrap().to_string(), "2020-08");

        for method in ["addDays", "subWeek", "isCurrentMonth"] {
            assert_eq!(
                base.apply(method, 1),
                Err(DateError::MethodNotSupported {
                    type_name: "Month",
                    method: method.to_string(),
                })
            );
        }
    }

    #[test]
    fn test_parse_layouts() {
        for (text, expected) in [
            ("2020-11", "2020-11"),
            ("2020-11-22", "2020-11"),
            ("2020/11/22", "2020-11"),
            ("2020-11-22 10:00:00", "2020-11"),
            ("2020-11-22T10:00:00+09:00", "2020-11"),
        ] {
            assert_eq!(month(text).to_string(), expected, "{text}");
        }
    }

    #[test]
    fn test_this_month() {
        let clock = clock_at("2020-11-22 10:20:30");
        assert_eq!(Month::this_month(&clock).to_string(), "2020-11");
    }

    #[test]
    fn test_zone_carries_through() {
        let subject = Month::parse("2020-11-22T10:00:00+09:00").unwrap();

        assert_eq!(subject.zone().name(), "+09:00");
        assert_eq!(subject.first_date().zone().name(), "+09:00");
        assert_eq!(
            subject.start_of_month().to_rfc3339(),
            "2020-11-01T00:00:00+09:00"
        );
    }

    #[test]
    fn test_serde_keeps_zone() {
        let subject = month("2020-11");

        let json = serde_json::to_string(&subject).unwrap();
        assert_eq!(json, r#"{"month":"2020-11","zone":"UTC"}"#);
        assert_eq!(serde_json::from_str::<Month>(&json).unwrap(), subject);

        for zone in [Zone::Named(chrono_tz::Tz::Asia__Tokyo), "+09:00".parse().unwrap()] {
            let subject = Month::new(2020, 11, zone).unwrap();
            let back: Month =
                serde_json::from_str(&serde_json::to_string(&subject).unwrap()).unwrap();

            assert_eq!(back, subject);
            assert_eq!(back.zone(), zone);
        }

        assert!(serde_json::from_str::<Month>(r#"{"month":"2020-13","zone":"UTC"}"#).is_err());
    }

    #[test]
    fn test_earliest_representable_month() {
        let tokyo: Zone = "+09:00".parse().unwrap();
        let far = Month::new(NaiveDate::MIN.year(), NaiveDate::MIN.month(), tokyo).unwrap();

        assert_eq!(far, far);
        assert!(far < far.next().unwrap());
        assert!(matches!(far.prev(), Err(DateError::OutOfRange(_))));
        assert_eq!(far.first_date().date(), NaiveDate::MIN);

        let months: std::collections::HashSet<Month> = [far, far].into_iter().collect();
        assert_eq!(months.len(), 1);
    }

    #[test]
    fn test_end_of_month_is_before_next_start() {
        let subject = month("2020-11");
        let next = subject.next().unwrap();

        assert_eq!(
            next.start_of_month() - subject.end_of_month(),
            TimeDelta::nanoseconds(1)
        );
    }
}
