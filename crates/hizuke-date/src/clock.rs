//! Ambient "current time" sources.

use chrono::{DateTime, NaiveDate, Utc};
use hizuke_core::config::Settings;
use hizuke_core::error::CoreError;

use crate::error::DateResult;
use crate::zone::Zone;

/// Source of the current instant and of the ambient timezone.
///
/// Relative predicates such as `Day::is_today` take a clock explicitly so
/// tests can pin "now" with a [`FixedClock`].
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;

    /// Timezone applied by `today()`-style constructors and to parsed text
    /// that carries no offset.
    fn zone(&self) -> Zone;

    /// ## Summary
    /// Returns the current calendar date as seen from `zone`.
    fn today_in(&self, zone: Zone) -> NaiveDate {
        zone.local(self.now()).date()
    }
}

/// Wall clock with a configurable ambient zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock {
    zone: Zone,
}

impl SystemClock {
    #[must_use]
    pub const fn new(zone: Zone) -> Self {
        Self { zone }
    }

    /// ## Summary
    /// Builds a wall clock in the timezone named by `calendar.timezone`.
    ///
    /// ## Errors
    /// Returns `CoreError::InvalidConfiguration` (wrapped) if the timezone is unknown.
    pub fn from_settings(settings: &Settings) -> DateResult<Self> {
        let zone = settings
            .calendar
            .timezone
            .parse::<Zone>()
            .map_err(|e| CoreError::InvalidConfiguration(e.to_string()))?;

        tracing::debug!(zone = %zone, "Using configured calendar timezone");

        Ok(Self::new(zone))
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn zone(&self) -> Zone {
        self.zone
    }
}

/// Clock pinned to a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    now: DateTime<Utc>,
    zone: Zone,
}

impl FixedClock {
    #[must_use]
    pub const fn new(now: DateTime<Utc>, zone: Zone) -> Self {
        Self { now, zone }
    }

    /// ## Summary
    /// Pins the clock to a wall-clock time in `zone`, e.g. `2020-10-20 10:20:30`.
    #[must_use]
    pub fn at_local(local: chrono::NaiveDateTime, zone: Zone) -> Self {
        Self::new(zone.resolve(local).to_utc(), zone)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }

    fn zone(&self) -> Zone {
        self.zone
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }

    fn zone(&self) -> Zone {
        (**self).zone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDateTime, TimeZone};
    use chrono_tz::Tz;

    #[test]
    fn test_fixed_clock_is_pinned() {
        let now = Utc.with_ymd_and_hms(2020, 10, 20, 10, 20, 30).unwrap();
        let clock = FixedClock::new(now, Zone::utc());

        assert_eq!(clock.now(), now);
        assert_eq!(clock.now(), clock.now());
        assert_eq!(clock.zone(), Zone::utc());
    }

    #[test]
    fn test_at_local_resolves_in_zone() {
        let local =
            NaiveDateTime::parse_from_str("2020-10-20 10:20:30", "%Y-%m-%d %H:%M:%S").unwrap();
        let clock = FixedClock::at_local(local, Zone::Named(Tz::Asia__Tokyo));

        assert_eq!(
            clock.now(),
            Utc.with_ymd_and_hms(2020, 10, 20, 1, 20, 30).unwrap()
        );
    }

    #[test]
    fn test_today_in_other_zone() {
        let now = Utc.with_ymd_and_hms(2020, 10, 20, 20, 0, 0).unwrap();
        let clock = FixedClock::new(now, Zone::utc());

        assert_eq!(
            clock.today_in(Zone::Named(Tz::Asia__Tokyo)),
            NaiveDate::from_ymd_opt(2020, 10, 21).unwrap()
        );
        assert_eq!(
            clock.today_in(Zone::utc()),
            NaiveDate::from_ymd_opt(2020, 10, 20).unwrap()
        );
    }

    #[test_log::test]
    fn test_system_clock_from_settings() {
        let mut settings = Settings::default();
        settings.calendar.timezone = "Asia/Tokyo".to_string();

        let clock = SystemClock::from_settings(&settings).expect("known zone");
        assert_eq!(clock.zone(), Zone::Named(Tz::Asia__Tokyo));
    }

    #[test]
    fn test_system_clock_rejects_unknown_zone() {
        let mut settings = Settings::default();
        settings.calendar.timezone = "Nowhere/Special".to_string();

        let err = SystemClock::from_settings(&settings).unwrap_err();
        assert!(matches!(err, crate::error::DateError::CoreError(_)));
    }
}
