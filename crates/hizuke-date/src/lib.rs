//! Hizuke calendar values.
//!
//! Timezone-aware [`Day`], [`Month`] and [`DateRange`] value objects layered
//! over `chrono`. Every value is immutable; arithmetic returns a new value.

pub mod clock;
pub mod day;
pub mod error;
pub mod month;
pub mod parse;
pub mod period;
pub mod range;
pub mod zone;

pub use clock::{Clock, FixedClock, SystemClock};
pub use day::Day;
pub use error::{DateError, DateResult};
pub use month::Month;
pub use period::{Direction, Operation, Period};
pub use range::{DatePeriod, DateRange, DayIter};
pub use zone::{Zone, ZonedInput};
