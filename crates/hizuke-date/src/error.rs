use thiserror::Error;

/// Calendar value errors
///
/// Every variant carries the rendered inputs that caused it so callers can
/// report the failure without holding on to the rejected values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateError {
    /// The text is not a recognizable date or date-time.
    #[error("Unable to parse `{input}` as a date")]
    Parse { input: String },

    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),

    #[error("The end date `{end}` is before the start date `{start}`.")]
    EndBeforeStart { start: String, end: String },

    #[error(
        "The start date TimeZone `{start_zone}` and the end date TimeZone `{end_zone}` are different."
    )]
    TimezoneMismatch {
        start: String,
        start_zone: String,
        end: String,
        end_zone: String,
    },

    #[error("Date range `{first}` and date range `{second}` do not overlap.")]
    RangesDontOverlap { first: String, second: String },

    /// Calendar arithmetic left the representable range.
    #[error("Date out of range: {0}")]
    OutOfRange(String),

    #[error("Call to undefined method {type_name}::{method}()")]
    MethodNotSupported {
        type_name: &'static str,
        method: String,
    },

    #[error(transparent)]
    CoreError(#[from] hizuke_core::error::CoreError),
}

pub type DateResult<T> = std::result::Result<T, DateError>;
