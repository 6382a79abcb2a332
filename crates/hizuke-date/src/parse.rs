//! Free-form date text to wall-clock time plus zone.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use hizuke_core::constants::{DATE_FORMAT, DATETIME_FORMAT};

use crate::error::{DateError, DateResult};
use crate::zone::Zone;

/// Date-time layouts carrying an explicit offset, tried after RFC 3339.
const OFFSET_DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%:z", "%Y-%m-%d %H:%M:%S %:z"];

/// Zone-less date-time layouts.
const DATETIME_FORMATS: &[&str] = &[
    DATETIME_FORMAT,
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

/// Zone-less date layouts.
const DATE_FORMATS: &[&str] = &[DATE_FORMAT, "%Y/%m/%d"];

/// Layouts for `YYYY-MM` / `YYYY/MM` text once completed with day `01`.
const MONTH_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// What a piece of text resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parsed {
    pub local: NaiveDateTime,
    /// `None` when the text carried no offset.
    pub offset_zone: Option<Zone>,
}

impl Parsed {
    /// Zone of the text, falling back to `ambient` for offset-less input.
    #[must_use]
    pub fn zone_or(&self, ambient: Zone) -> Zone {
        self.offset_zone.unwrap_or(ambient)
    }
}

/// ## Summary
/// Parses a date or date-time string.
///
/// Accepts RFC 3339 / W3C timestamps, `YYYY-MM-DD HH:MM:SS` with or without an
/// offset, `YYYY-MM-DD` and `YYYY/MM/DD`, the latter two optionally followed by
/// a time.
///
/// ## Errors
/// Returns `DateError::Parse` if no layout matches.
pub fn parse_datetime(text: &str) -> DateResult<Parsed> {
    let trimmed = text.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(with_offset(dt));
    }

    for format in OFFSET_DATETIME_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(trimmed, format) {
            return Ok(with_offset(dt));
        }
    }

    for format in DATETIME_FORMATS {
        if let Ok(local) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(Parsed {
                local,
                offset_zone: None,
            });
        }
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Ok(Parsed {
                local: date.and_time(NaiveTime::MIN),
                offset_zone: None,
            });
        }
    }

    tracing::debug!(input = text, "No date layout matched");

    Err(DateError::Parse {
        input: text.to_string(),
    })
}

/// ## Summary
/// Parses a month string: everything [`parse_datetime`] accepts plus bare
/// `YYYY-MM` and `YYYY/MM`.
///
/// ## Errors
/// Returns `DateError::Parse` if no layout matches.
pub fn parse_month(text: &str) -> DateResult<Parsed> {
    parse_datetime(text).or_else(|err| {
        let trimmed = text.trim();
        let separator = if trimmed.contains('/') { "/" } else { "-" };
        let first_of_month = format!("{trimmed}{separator}01");

        MONTH_FORMATS
            .iter()
            .find_map(|format| NaiveDate::parse_from_str(&first_of_month, format).ok())
            .map(|date| Parsed {
                local: date.and_time(NaiveTime::MIN),
                offset_zone: None,
            })
            .ok_or(err)
    })
}

fn with_offset(dt: DateTime<chrono::FixedOffset>) -> Parsed {
    Parsed {
        local: dt.naive_local(),
        offset_zone: Some(Zone::Fixed(*dt.offset())),
    }
}
