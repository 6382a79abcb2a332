//! Calendar periods and named add/subtract operations.

use chrono::{Days, Months, NaiveDate};
use std::fmt;

use crate::error::{DateError, DateResult};

/// A calendar unit of arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Period {
    Day,
    Week,
    Month,
    Quarter,
    Year,
    Century,
}

impl Period {
    pub const ALL: [Self; 6] = [
        Self::Day,
        Self::Week,
        Self::Month,
        Self::Quarter,
        Self::Year,
        Self::Century,
    ];

    #[must_use]
    pub const fn singular(self) -> &'static str {
        match self {
            Self::Day => "Day",
            Self::Week => "Week",
            Self::Month => "Month",
            Self::Quarter => "Quarter",
            Self::Year => "Year",
            Self::Century => "Century",
        }
    }

    #[must_use]
    pub const fn plural(self) -> &'static str {
        match self {
            Self::Day => "Days",
            Self::Week => "Weeks",
            Self::Month => "Months",
            Self::Quarter => "Quarters",
            Self::Year => "Years",
            Self::Century => "Centuries",
        }
    }

    /// Whether the period is a whole number of months, so it preserves the
    /// first-of-month anchor of a `Month`.
    #[must_use]
    pub const fn is_month_based(self) -> bool {
        matches!(
            self,
            Self::Month | Self::Quarter | Self::Year | Self::Century
        )
    }

    /// Splits `amount` periods into a day count or a month count.
    const fn factor(self) -> (u32, u32) {
        match self {
            Self::Day => (1, 0),
            Self::Week => (7, 0),
            Self::Month => (0, 1),
            Self::Quarter => (0, 3),
            Self::Year => (0, 12),
            Self::Century => (0, 1200),
        }
    }

    /// ## Summary
    /// Moves `date` forward by `amount` periods.
    ///
    /// Month-based periods clamp to the last day of the target month, so
    /// `2020-01-31` plus one month is `2020-02-29`.
    ///
    /// ## Errors
    /// Returns `DateError::OutOfRange` if the result is not representable.
    pub fn add_to(self, date: NaiveDate, amount: u32) -> DateResult<NaiveDate> {
        self.shift(date, Direction::Add, amount)
    }

    /// ## Summary
    /// Moves `date` backward by `amount` periods, with the same clamping as [`Period::add_to`].
    ///
    /// ## Errors
    /// Returns `DateError::OutOfRange` if the result is not representable.
    pub fn sub_from(self, date: NaiveDate, amount: u32) -> DateResult<NaiveDate> {
        self.shift(date, Direction::Sub, amount)
    }

    fn shift(self, date: NaiveDate, direction: Direction, amount: u32) -> DateResult<NaiveDate> {
        let (days, months) = self.factor();

        let shifted = if months == 0 {
            let days = Days::new(u64::from(days) * u64::from(amount));
            match direction {
                Direction::Add => date.checked_add_days(days),
                Direction::Sub => date.checked_sub_days(days),
            }
        } else {
            months.checked_mul(amount).map(Months::new).and_then(|months| match direction {
                Direction::Add => date.checked_add_months(months),
                Direction::Sub => date.checked_sub_months(months),
            })
        };

        shifted.ok_or_else(|| {
            DateError::OutOfRange(format!(
                "{date} {direction} {amount} {}",
                self.plural().to_lowercase()
            ))
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Add,
    Sub,
}

impl Direction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Sub => "sub",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Add => "+",
            Self::Sub => "-",
        })
    }
}

/// A named add/subtract operation such as `addDays` or `sub_quarter`.
///
/// Singular and plural spellings are equivalent; the count is supplied
/// separately when the operation is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Operation {
    pub direction: Direction,
    pub period: Period,
}

impl Operation {
    #[must_use]
    pub const fn new(direction: Direction, period: Period) -> Self {
        Self { direction, period }
    }

    /// ## Summary
    /// Looks up an operation by its camelCase (`addDays`) or snake_case
    /// (`add_days`) name.
    ///
    /// ## Errors
    /// Returns `DateError::MethodNotSupported` naming `type_name` for any other name.
    pub fn from_name(type_name: &'static str, name: &str) -> DateResult<Self> {
        Self::lookup(name).ok_or_else(|| DateError::MethodNotSupported {
            type_name,
            method: name.to_string(),
        })
    }

    fn lookup(name: &str) -> Option<Self> {
        let (direction, rest) = if let Some(rest) = name.strip_prefix("add") {
            (Direction::Add, rest)
        } else if let Some(rest) = name.strip_prefix("sub") {
            (Direction::Sub, rest)
        } else {
            return None;
        };

        let rest = rest.strip_prefix('_').unwrap_or(rest);

        Period::ALL
            .into_iter()
            .find(|period| {
                rest.eq_ignore_ascii_case(period.singular())
                    || rest.eq_ignore_ascii_case(period.plural())
            })
            .filter(|_| {
                // camelCase keeps the capital, snake_case is all lowercase
                rest.starts_with(char::is_uppercase) || name.contains('_')
            })
            .map(|period| Self::new(direction, period))
    }

    /// ## Summary
    /// Applies the operation `amount` times to `date`.
    ///
    /// ## Errors
    /// Returns `DateError::OutOfRange` if the result is not representable.
    pub fn apply(self, date: NaiveDate, amount: u32) -> DateResult<NaiveDate> {
        self.period.shift(date, self.direction, amount)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.direction.as_str(), self.period.plural())
    }
}

/// Generates the `add_*` / `sub_*` method family for a calendar value.
///
/// The implementing type provides `fn shift(&self, Operation, u32) -> DateResult<Self>`.
macro_rules! shift_methods {
    ($($period:ident => $add_one:ident, $add:ident, $sub_one:ident, $sub:ident;)+) => {
        $(
            #[doc = concat!("Shorthand for `", stringify!($add), "(1)`.")]
            ///
            /// ## Errors
            /// Returns `DateError::OutOfRange` if the result is not representable.
            pub fn $add_one(&self) -> DateResult<Self> {
                self.$add(1)
            }

            #[doc = concat!("Returns a new value `amount` ", stringify!($period), " periods later.")]
            ///
            /// ## Errors
            /// Returns `DateError::OutOfRange` if the result is not representable.
            pub fn $add(&self, amount: u32) -> DateResult<Self> {
                self.shift(
                    $crate::period::Operation::new(
                        $crate::period::Direction::Add,
                        $crate::period::Period::$period,
                    ),
                    amount,
                )
            }

            #[doc = concat!("Shorthand for `", stringify!($sub), "(1)`.")]
            ///
            /// ## Errors
            /// Returns `DateError::OutOfRange` if the result is not representable.
            pub fn $sub_one(&self) -> DateResult<Self> {
                self.$sub(1)
            }

            #[doc = concat!("Returns a new value `amount` ", stringify!($period), " periods earlier.")]
            ///
            /// ## Errors
            /// Returns `DateError::OutOfRange` if the result is not representable.
            pub fn $sub(&self, amount: u32) -> DateResult<Self> {
                self.shift(
                    $crate::period::Operation::new(
                        $crate::period::Direction::Sub,
                        $crate::period::Period::$period,
                    ),
                    amount,
                )
            }
        )+
    };
}

pub(crate) use shift_methods;

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_add_each_period() {
        let base = date(2020, 11, 22);

        assert_eq!(Period::Day.add_to(base, 2).unwrap(), date(2020, 11, 24));
        assert_eq!(Period::Week.add_to(base, 2).unwrap(), date(2020, 12, 6));
        assert_eq!(Period::Month.add_to(base, 2).unwrap(), date(2021, 1, 22));
        assert_eq!(Period::Quarter.add_to(base, 2).unwrap(), date(2021, 5, 22));
        assert_eq!(Period::Year.add_to(base, 2).unwrap(), date(2022, 11, 22));
        assert_eq!(Period::Century.add_to(base, 2).unwrap(), date(2220, 11, 22));
    }

    #[test]
    fn test_sub_each_period() {
        let base = date(2020, 11, 22);

        assert_eq!(Period::Day.sub_from(base, 2).unwrap(), date(2020, 11, 20));
        assert_eq!(Period::Week.sub_from(base, 2).unwrap(), date(2020, 11, 8));
        assert_eq!(Period::Month.sub_from(base, 2).unwrap(), date(2020, 9, 22));
        assert_eq!(Period::Quarter.sub_from(base, 2).unwrap(), date(2020, 5, 22));
        assert_eq!(Period::Year.sub_from(base, 2).unwrap(), date(2018, 11, 22));
        assert_eq!(Period::Century.sub_from(base, 2).unwrap(), date(1820, 11, 22));
    }

    #[test]
    fn test_month_arithmetic_clamps() {
        assert_eq!(
            Period::Month.add_to(date(2020, 1, 31), 1).unwrap(),
            date(2020, 2, 29)
        );
        assert_eq!(
            Period::Year.add_to(date(2020, 2, 29), 1).unwrap(),
            date(2021, 2, 28)
        );
    }

    #[test]
    fn test_out_of_range() {
        let err = Period::Day.add_to(NaiveDate::MAX, 1).unwrap_err();
        assert!(matches!(err, DateError::OutOfRange(_)));

        let err = Period::Century.add_to(date(2020, 1, 1), u32::MAX).unwrap_err();
        assert!(matches!(err, DateError::OutOfRange(_)));
    }

    #[test]
    fn test_operation_names() {
        assert_eq!(
            Operation::from_name("Day", "addDay").unwrap(),
            Operation::new(Direction::Add, Period::Day)
        );
        assert_eq!(
            Operation::from_name("Day", "subCenturies").unwrap(),
            Operation::new(Direction::Sub, Period::Century)
        );
        assert_eq!(
            Operation::from_name("Day", "add_quarters").unwrap(),
            Operation::new(Direction::Add, Period::Quarter)
        );
        assert_eq!(
            Operation::from_name("Day", "sub_week").unwrap(),
            Operation::new(Direction::Sub, Period::Week)
        );
    }

    #[test]
    fn test_every_camel_case_name_round_trips() {
        for period in Period::ALL {
            for direction in [Direction::Add, Direction::Sub] {
                for noun in [period.singular(), period.plural()] {
                    let name = format!("{}{noun}", direction.as_str());
                    assert_eq!(
                        Operation::from_name("Day", &name).unwrap(),
                        Operation::new(direction, period),
                        "{name}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_unknown_names() {
        for name in ["addday", "mulDays", "add", "addFortnight", "isToday", ""] {
            let err = Operation::from_name("Day", name).unwrap_err();
            assert_eq!(
                err,
                DateError::MethodNotSupported {
                    type_name: "Day",
                    method: name.to_string(),
                }
            );
        }
    }

    #[test]
    fn test_operation_display() {
        let op = Operation::new(Direction::Sub, Period::Quarter);
        assert_eq!(op.to_string(), "subQuarters");
    }
}
