//! Inclusive, ordered ranges of days.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeDelta};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::FusedIterator;

use crate::clock::Clock;
use crate::day::Day;
use crate::error::{DateError, DateResult};
use crate::zone::{Zone, ZonedInput};

/// An immutable, inclusive range of days sharing one timezone.
///
/// `start <= end` and `start.zone() == end.zone()` hold for every value; both
/// are checked once in [`DateRange::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RangeBounds", into = "RangeBounds")]
pub struct DateRange {
    start: Day,
    end: Day,
}

impl DateRange {
    /// ## Summary
    /// Builds the range `start..=end`.
    ///
    /// ## Errors
    /// Returns `DateError::TimezoneMismatch` if the endpoints carry different
    /// timezones, otherwise `DateError::EndBeforeStart` if `start > end`.
    pub fn new(start: Day, end: Day) -> DateResult<Self> {
        let (start_zone, end_zone) = (start.zone().name(), end.zone().name());

        if start_zone != end_zone {
            tracing::debug!(%start, %start_zone, %end, %end_zone, "Rejected range across timezones");
            return Err(DateError::TimezoneMismatch {
                start: start.to_string(),
                start_zone,
                end: end.to_string(),
                end_zone,
            });
        }

        if start > end {
            tracing::debug!(%start, %end, "Rejected range ending before it starts");
            return Err(DateError::EndBeforeStart {
                start: start.to_string(),
                end: end.to_string(),
            });
        }

        Ok(Self { start, end })
    }

    /// Caller guarantees both invariants.
    pub(crate) const fn from_ordered(start: Day, end: Day) -> Self {
        Self { start, end }
    }

    /// ## Summary
    /// Parses both endpoints with [`Day::parse`] and builds the range.
    ///
    /// ## Errors
    /// Returns `DateError::Parse` for unreadable text, otherwise fails like [`DateRange::new`].
    pub fn parse(start: &str, end: &str) -> DateResult<Self> {
        Self::new(Day::parse(start)?, Day::parse(end)?)
    }

    /// ## Summary
    /// Parses both endpoints with [`Day::parse_with`] and builds the range.
    ///
    /// ## Errors
    /// Returns `DateError::Parse` for unreadable text, otherwise fails like [`DateRange::new`].
    pub fn parse_with(start: &str, end: &str, clock: &impl Clock) -> DateResult<Self> {
        Self::new(Day::parse_with(start, clock)?, Day::parse_with(end, clock)?)
    }

    /// ## Summary
    /// Wraps two zoned date-times as days and builds the range.
    ///
    /// ## Errors
    /// Fails like [`DateRange::new`].
    pub fn from_datetimes(start: &impl ZonedInput, end: &impl ZonedInput) -> DateResult<Self> {
        Self::new(Day::from_datetime(start), Day::from_datetime(end))
    }

    #[must_use]
    pub const fn start(&self) -> Day {
        self.start
    }

    #[must_use]
    pub const fn end(&self) -> Day {
        self.end
    }

    /// Midnight at the start of the first day.
    #[must_use]
    pub fn start_of_days(&self) -> DateTime<FixedOffset> {
        self.start.start_of_day()
    }

    /// Last instant of the last day.
    #[must_use]
    pub fn end_of_days(&self) -> DateTime<FixedOffset> {
        self.end.end_of_day()
    }

    #[must_use]
    pub const fn timezone(&self) -> Zone {
        self.start.zone()
    }

    #[must_use]
    pub fn contains(&self, day: &Day) -> bool {
        self.start <= *day && *day <= self.end
    }

    /// ## Summary
    /// Whether the two ranges share at least one instant. Touching endpoints count.
    #[must_use]
    pub fn overlaps_with(&self, other: &Self) -> bool {
        self.end >= other.start && other.end >= self.start
    }

    /// ## Summary
    /// Returns the days both ranges have in common, from the later start to
    /// the earlier end.
    ///
    /// ## Errors
    /// Returns `DateError::RangesDontOverlap` if [`DateRange::overlaps_with`] is
    /// false. Otherwise fails like [`DateRange::new`], so ranges in different
    /// timezones only intersect when one lies inside the other.
    pub fn get_overlapping(&self, other: &Self) -> DateResult<Self> {
        if !self.overlaps_with(other) {
            return Err(DateError::RangesDontOverlap {
                first: self.to_string(),
                second: other.to_string(),
            });
        }

        let start = if self.start >= other.start {
            self.start
        } else {
            other.start
        };
        let end = if self.end <= other.end {
            self.end
        } else {
            other.end
        };

        Self::new(start, end)
    }

    /// ## Summary
    /// Number of days in the range, counting both endpoints.
    #[must_use]
    pub fn length_in_days(&self) -> u64 {
        self.start.days_until(&self.end).unsigned_abs() + 1
    }

    /// ## Summary
    /// Iterates over every day from `start` to `end` in ascending order.
    ///
    /// Each call returns a fresh, independent iterator.
    #[must_use]
    pub fn iter(&self) -> DayIter {
        DayIter::new(self.start.date(), self.end.date(), self.timezone())
    }

    /// Same as [`DateRange::iter`].
    #[must_use]
    pub fn per_day(&self) -> DayIter {
        self.iter()
    }

    /// ## Summary
    /// Iterates over hours 0 through 23 of every day in the range.
    ///
    /// An hour that a DST transition skips resolves one hour later, so such
    /// a day repeats an instant instead of omitting one.
    pub fn per_hour(&self) -> impl Iterator<Item = DateTime<FixedOffset>> + use<> {
        self.iter().flat_map(|day| {
            (0..24).map(move |hour| day.at(NaiveTime::MIN + TimeDelta::hours(hour)))
        })
    }

    #[must_use]
    pub fn to_vec(&self) -> Vec<Day> {
        self.iter().collect()
    }

    /// ## Summary
    /// Converts to a [`DatePeriod`] spanning the same days.
    #[must_use]
    pub fn to_period(&self) -> DatePeriod {
        DatePeriod {
            start: self.start.date(),
            end: self.end.date(),
            zone: self.timezone(),
        }
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

impl IntoIterator for &DateRange {
    type Item = Day;
    type IntoIter = DayIter;

    fn into_iter(self) -> DayIter {
        self.iter()
    }
}

#[derive(Serialize, Deserialize)]
struct RangeBounds {
    start: Day,
    end: Day,
}

impl TryFrom<RangeBounds> for DateRange {
    type Error = DateError;

    fn try_from(bounds: RangeBounds) -> DateResult<Self> {
        Self::new(bounds.start, bounds.end)
    }
}

impl From<DateRange> for RangeBounds {
    fn from(range: DateRange) -> Self {
        Self {
            start: range.start,
            end: range.end,
        }
    }
}

/// Iterator over consecutive days, both ends inclusive.
#[derive(Debug, Clone)]
pub struct DayIter {
    front: Option<NaiveDate>,
    back: NaiveDate,
    zone: Zone,
}

impl DayIter {
    pub(crate) const fn new(first: NaiveDate, last: NaiveDate, zone: Zone) -> Self {
        Self {
            front: Some(first),
            back: last,
            zone,
        }
    }

    fn remaining(&self) -> usize {
        self.front.map_or(0, |front| {
            usize::try_from(self.back.signed_duration_since(front).num_days() + 1).unwrap_or(0)
        })
    }
}

impl Iterator for DayIter {
    type Item = Day;

    fn next(&mut self) -> Option<Day> {
        let current = self.front?;
        self.front = if current < self.back {
            current.succ_opt()
        } else {
            None
        };
        Some(Day::new(current, self.zone))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining, Some(remaining))
    }
}

impl DoubleEndedIterator for DayIter {
    fn next_back(&mut self) -> Option<Day> {
        let front = self.front?;
        let current = self.back;

        if current > front {
            match current.pred_opt() {
                Some(pred) => self.back = pred,
                None => self.front = None,
            }
        } else {
            self.front = None;
        }

        Some(Day::new(current, self.zone))
    }
}

impl ExactSizeIterator for DayIter {}

impl FusedIterator for DayIter {}

/// The days of a range as midnight instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatePeriod {
    start: NaiveDate,
    end: NaiveDate,
    zone: Zone,
}

impl DatePeriod {
    #[must_use]
    pub fn start(&self) -> DateTime<FixedOffset> {
        self.zone.resolve(self.start.and_time(NaiveTime::MIN))
    }

    #[must_use]
    pub fn end(&self) -> DateTime<FixedOffset> {
        self.zone.resolve(self.end.and_time(NaiveTime::MIN))
    }

    /// ## Summary
    /// Iterates over the midnight of every day in the period.
    pub fn iter(&self) -> impl Iterator<Item = DateTime<FixedOffset>> + use<> {
        DayIter::new(self.start, self.end, self.zone).map(|day| day.start_of_day())
    }
}
