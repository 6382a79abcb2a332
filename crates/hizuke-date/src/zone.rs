//! Timezone identifiers and local-time resolution for calendar values.
//!
//! Uses ICU4X for Windows timezone ID to IANA mapping when chrono-tz does not
//! recognize an identifier directly.

use chrono::{DateTime, FixedOffset, LocalResult, NaiveDateTime, Offset, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;
use icu::time::zone::WindowsParser;
use icu::time::zone::iana::IanaParserExtended;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::{DateError, DateResult};

/// The timezone a calendar value lives in.
///
/// Two values share a timezone iff their zones have the same [`Zone::name`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Zone {
    /// An IANA zone such as `Asia/Tokyo`.
    Named(Tz),
    /// A fixed offset from UTC, as carried by RFC 3339 timestamps.
    Fixed(FixedOffset),
}

impl Zone {
    #[must_use]
    pub const fn utc() -> Self {
        Self::Named(Tz::UTC)
    }

    /// ## Summary
    /// Returns the timezone identifier: the IANA name, or a `+09:00` style offset.
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::Named(tz) => tz.name().to_string(),
            Self::Fixed(offset) => offset.to_string(),
        }
    }

    /// ## Summary
    /// Resolves a wall-clock time in this zone to an instant.
    ///
    /// A time inside a DST fold resolves to its first occurrence. A time inside
    /// a DST gap does not exist and is shifted forward by one hour. Near the
    /// edges of chrono's range, where the instant itself is not representable,
    /// the wall-clock time is returned as a UTC instant.
    #[must_use]
    pub fn resolve(&self, local: NaiveDateTime) -> DateTime<FixedOffset> {
        let (local, offset) = self.lenient_offset(local);

        local.checked_sub_offset(offset).map_or_else(
            || {
                tracing::trace!(%local, zone = %self, "Instant not representable, keeping wall-clock time");
                local.and_utc().fixed_offset()
            },
            |utc| DateTime::from_naive_utc_and_offset(utc, offset),
        )
    }

    /// ## Summary
    /// Unix timestamp in seconds of a wall-clock time in this zone, resolved
    /// like [`Zone::resolve`].
    ///
    /// Defined for every `NaiveDateTime`, including those whose instant falls
    /// outside chrono's range.
    #[must_use]
    pub fn timestamp(&self, local: NaiveDateTime) -> i64 {
        let (local, offset) = self.lenient_offset(local);
        local.and_utc().timestamp() - i64::from(offset.local_minus_utc())
    }

    /// Wall-clock time after DST gap adjustment, with the offset in force then.
    fn lenient_offset(&self, local: NaiveDateTime) -> (NaiveDateTime, FixedOffset) {
        match self {
            Self::Named(tz) => lenient_named_offset(*tz, local),
            Self::Fixed(offset) => (local, *offset),
        }
    }

    /// ## Summary
    /// Returns the wall-clock time of `instant` as seen from this zone.
    #[must_use]
    pub fn local(&self, instant: DateTime<Utc>) -> NaiveDateTime {
        match self {
            Self::Named(tz) => instant.with_timezone(tz).naive_local(),
            Self::Fixed(offset) => instant.with_timezone(offset).naive_local(),
        }
    }
}

fn lenient_named_offset(tz: Tz, local: NaiveDateTime) -> (NaiveDateTime, FixedOffset) {
    match tz.offset_from_local_datetime(&local) {
        LocalResult::Single(offset) | LocalResult::Ambiguous(offset, _) => (local, offset.fix()),
        LocalResult::None => {
            tracing::trace!(%local, zone = tz.name(), "Local time falls in a DST gap, shifting forward");
            let shifted = local.checked_add_signed(TimeDelta::hours(1)).unwrap_or(local);
            let offset = tz
                .offset_from_local_datetime(&shifted)
                .earliest()
                .unwrap_or_else(|| tz.offset_from_utc_datetime(&local));
            (shifted, offset.fix())
        }
    }
}

impl Default for Zone {
    fn default() -> Self {
        Self::utc()
    }
}

impl From<Tz> for Zone {
    fn from(tz: Tz) -> Self {
        Self::Named(tz)
    }
}

impl From<FixedOffset> for Zone {
    fn from(offset: FixedOffset) -> Self {
        Self::Fixed(offset)
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl FromStr for Zone {
    type Err = DateError;

    /// Accepts IANA names, `Z`, and `+HH:MM` / `+HHMM` offsets. Windows zone
    /// names and `/mozilla.org/` style prefixes are mapped to IANA names.
    fn from_str(s: &str) -> DateResult<Self> {
        let s = s.trim();

        if s == "Z" {
            return Ok(Self::Fixed(FixedOffset::east_opt(0).ok_or_else(|| {
                DateError::UnknownTimezone(s.to_string())
            })?));
        }

        if s.starts_with(['+', '-']) {
            return FixedOffset::from_str(s)
                .map(Self::Fixed)
                .map_err(|_e| DateError::UnknownTimezone(s.to_string()));
        }

        if let Ok(tz) = Tz::from_str(s) {
            return Ok(Self::Named(tz));
        }

        let normalized = normalize_tzid(s);
        tracing::debug!(input = s, %normalized, "Normalized timezone identifier");

        Tz::from_str(&normalized)
            .map(Self::Named)
            .map_err(|_e| DateError::UnknownTimezone(s.to_string()))
    }
}

impl Serialize for Zone {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Zone {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

/// Normalizes non-IANA timezone identifiers to IANA names.
///
/// Uses ICU4X for Windows timezone ID mapping and IANA canonicalization.
fn normalize_tzid(tzid: &str) -> String {
    // Strip common prefixes
    let stripped = tzid
        .strip_prefix("/mozilla.org/")
        .or_else(|| tzid.strip_prefix("/softwarestudio.org/"))
        .unwrap_or(tzid);

    let windows_parser = WindowsParser::new();
    if let Some(tz) = windows_parser.parse(stripped, None) {
        let iana_parser = IanaParserExtended::new();
        for entry in iana_parser.iter() {
            if entry.time_zone == tz {
                return entry.canonical.to_string();
            }
        }
    }

    let iana_parser = IanaParserExtended::new();
    let parsed = iana_parser.parse(stripped);
    if parsed.time_zone != icu::time::TimeZone::UNKNOWN {
        return parsed.canonical.to_string();
    }

    stripped.to_string()
}

/// A foreign date-time value that carries its own timezone.
///
/// This is the seam through which chrono values enter `Day`, `Month` and
/// `DateRange`.
pub trait ZonedInput {
    /// Wall-clock time in the value's own zone.
    fn local(&self) -> NaiveDateTime;

    fn zone(&self) -> Zone;
}

impl ZonedInput for DateTime<Tz> {
    fn local(&self) -> NaiveDateTime {
        self.naive_local()
    }

    fn zone(&self) -> Zone {
        Zone::Named(self.timezone())
    }
}

impl ZonedInput for DateTime<FixedOffset> {
    fn local(&self) -> NaiveDateTime {
        self.naive_local()
    }

    fn zone(&self) -> Zone {
        Zone::Fixed(*self.offset())
    }
}

impl ZonedInput for DateTime<Utc> {
    fn local(&self) -> NaiveDateTime {
        self.naive_utc()
    }

    fn zone(&self) -> Zone {
        Zone::utc()
    }
}
