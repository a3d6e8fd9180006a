use std::{fmt, sync::Arc};

use time::{Date, OffsetDateTime, UtcOffset};

/// An instant in time, represented as a date and time with a timezone offset.
///
/// Used to record when a registry was last accessed. Its calendar date, read
/// in the offset of the current reading, decides whether a new day has started.
pub type Timestamp = OffsetDateTime;

/// Returns the current date and time with the local system's UTC offset.
///
/// If the system's UTC offset could not be found, then [`now_utc`] is used
/// instead.
///
/// [`now_utc`]: Timestamp::now_utc
#[inline]
pub fn now() -> Timestamp {
    let t = Timestamp::now_utc();
    match UtcOffset::local_offset_at(t) {
        Ok(offset) => t.to_offset(offset),
        Err(_err) => t,
    }
}

/// Source of "now" for a registry.
pub trait Clock: 'static + Send + Sync {
    /// Returns the current instant.
    ///
    /// Its offset decides which calendar date the instant falls on, so a
    /// clock should keep to one offset.
    fn now(&self) -> Timestamp;
}

/// A [`Clock`] reading the local wall-clock time. See [`now`].
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[inline]
    fn now(&self) -> Timestamp {
        now()
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    #[inline]
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}

/// A [`Clock`] reading the system time in a fixed UTC offset.
///
/// On some platforms the local offset can only be looked up while the process
/// is single-threaded, so [`SystemClock`] falls back to UTC inside a
/// multi-threaded runtime. Capture the offset once at startup with
/// [`OffsetClock::local`] instead. The offset does not follow later daylight
/// saving changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OffsetClock {
    offset: UtcOffset,
}

impl OffsetClock {
    pub fn new(offset: UtcOffset) -> OffsetClock {
        OffsetClock { offset }
    }

    /// Captures the current local offset, or UTC if it cannot be determined.
    pub fn local() -> OffsetClock {
        OffsetClock::new(UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC))
    }

    pub fn offset(&self) -> UtcOffset {
        self.offset
    }
}

impl Clock for OffsetClock {
    #[inline]
    fn now(&self) -> Timestamp {
        Timestamp::now_utc().to_offset(self.offset)
    }
}

/// A [`Clock`] that only moves when told to.
///
/// Clones share the same instant, so a test can keep one handle while a
/// registry owns another.
#[cfg(any(test, feature = "test-util"))]
#[derive(Clone)]
pub struct ManualClock {
    now: Arc<parking_lot::Mutex<Timestamp>>,
}

#[cfg(any(test, feature = "test-util"))]
impl ManualClock {
    pub fn new(now: Timestamp) -> ManualClock {
        ManualClock {
            now: Arc::new(parking_lot::Mutex::new(now)),
        }
    }

    pub fn set(&self, now: Timestamp) {
        *self.now.lock() = now;
    }

    pub fn advance(&self, duration: std::time::Duration) {
        *self.now.lock() += duration;
    }

    pub fn rewind(&self, duration: std::time::Duration) {
        *self.now.lock() -= duration;
    }
}

#[cfg(any(test, feature = "test-util"))]
impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        *self.now.lock()
    }
}

#[cfg(any(test, feature = "test-util"))]
impl fmt::Debug for ManualClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ManualClock").field(&*self.now.lock()).finish()
    }
}

/// Returns `true` if `now` falls on a later calendar date than `last`.
///
/// Both dates are read in the offset of `now`. A clock that moved backward
/// never counts as a new day.
#[inline]
pub fn is_new_day(last: Timestamp, now: Timestamp) -> bool {
    now.date() > date_in_offset_of(last, now)
}

/// Returns the calendar date of `instant` as seen from the offset of `reference`.
#[inline]
pub fn date_in_offset_of(instant: Timestamp, reference: Timestamp) -> Date {
    instant.to_offset(reference.offset()).date()
}

/// Displays a [`Date`] as `MM.DD.YY`.
///
/// # Examples
///
/// ```
/// use lates_core::time::DateLabel;
/// use time::macros::date;
///
/// assert_eq!(DateLabel(date!(2024-03-04)).to_string(), "03.04.24");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DateLabel(pub Date);

impl fmt::Display for DateLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let date = self.0;
        write!(
            f,
            "{:02}.{:02}.{:02}",
            u8::from(date.month()),
            date.day(),
            date.year().rem_euclid(100)
        )
    }
}

#[cfg(test)]
mod test {
    use std::time::Duration;

    use quickcheck::quickcheck;
    use time::macros::{date, datetime, offset};

    use super::*;

    #[test]
    fn same_date_is_not_a_new_day() {
        let last = datetime!(2024-03-14 00:00 UTC);
        let now = datetime!(2024-03-14 23:59:59 UTC);
        assert!(!is_new_day(last, now));
    }

    #[test]
    fn midnight_starts_a_new_day() {
        let last = datetime!(2024-03-14 23:59:59 UTC);
        let now = datetime!(2024-03-15 00:00 UTC);
        assert!(is_new_day(last, now));
    }

    #[test]
    fn backward_clock_is_not_a_new_day() {
        let last = datetime!(2024-03-15 00:10 UTC);
        let now = datetime!(2024-03-14 23:50 UTC);
        assert!(!is_new_day(last, now));
    }

    #[test]
    fn dates_are_read_in_local_offset() {
        // Same UTC day, but the second instant is already past midnight at +02:00.
        let last = datetime!(2024-03-14 20:00 UTC).to_offset(offset!(+2));
        let now = datetime!(2024-03-14 22:30 UTC).to_offset(offset!(+2));
        assert!(is_new_day(last, now));
    }

    #[test]
    fn mixed_offsets_compare_in_one_offset() {
        // 21:00 and 21:30 at -05:00; the second reading has fallen back to UTC,
        // where it is already 2024-03-15.
        let last = datetime!(2024-03-14 21:00 -5);
        let now = datetime!(2024-03-14 21:30 -5).to_offset(offset!(UTC));
        assert_eq!(now.date(), date!(2024-03-15));
        assert!(!is_new_day(last, now));

        // The other way round: UTC first, local later, still the same instant's day.
        let last = datetime!(2024-03-15 02:00 UTC);
        let now = datetime!(2024-03-14 21:30 -5);
        assert!(!is_new_day(last, now));
    }

    #[test]
    fn mixed_offsets_still_see_midnight() {
        let last = datetime!(2024-03-14 23:30 -5).to_offset(offset!(UTC));
        let now = datetime!(2024-03-15 00:10 -5);
        assert!(is_new_day(last, now));
        assert_eq!(date_in_offset_of(last, now), date!(2024-03-14));
    }

    #[test]
    fn date_label_pads_fields() {
        assert_eq!(DateLabel(date!(2009-01-02)).to_string(), "01.02.09");
        assert_eq!(DateLabel(date!(2024-12-31)).to_string(), "12.31.24");
        assert_eq!(DateLabel(date!(2000-06-15)).to_string(), "06.15.00");
    }

    #[test]
    fn manual_clock_handles_share_time() {
        let clock = ManualClock::new(datetime!(2024-03-14 12:00 UTC));
        let handle = clock.clone();

        handle.set(datetime!(2024-03-20 08:00 UTC));
        assert_eq!(clock.now(), datetime!(2024-03-20 08:00 UTC));

        handle.rewind(Duration::from_secs(60 * 60 * 24));
        assert_eq!(clock.now(), datetime!(2024-03-19 08:00 UTC));
    }

    #[test]
    fn system_clock_is_close_to_utc_now() {
        let before = Timestamp::now_utc();
        let now = SystemClock.now();
        let after = Timestamp::now_utc();
        assert!(before <= now && now <= after);
    }

    #[test]
    fn offset_clock_uses_its_offset() {
        let clock = OffsetClock::new(offset!(-5));
        assert_eq!(clock.now().offset(), offset!(-5));
        assert_eq!(clock.offset(), offset!(-5));
    }

    quickcheck! {
        fn never_a_new_day_within_one_date(date: Date, a: u32, b: u32) -> bool {
            let midnight = date.midnight().assume_utc();
            let day = 60 * 60 * 24;
            let first = midnight + Duration::from_secs(u64::from(a % day));
            let second = midnight + Duration::from_secs(u64::from(b % day));
            !is_new_day(first, second) && !is_new_day(second, first)
        }

        fn offset_of_either_reading_does_not_matter_within_one_date(
            date: Date,
            a: u32,
            b: u32,
            hours: i8
        ) -> bool {
            // Keep clear of the representable range, where shifting offsets overflows.
            if date.year().abs() >= 9999 {
                return true;
            }
            let Ok(local) = UtcOffset::from_hms(hours % 24, 0, 0) else {
                return true;
            };
            let midnight = date.midnight().assume_offset(local);
            let day = 60 * 60 * 24;
            let first = midnight + Duration::from_secs(u64::from(a % day));
            let second = midnight + Duration::from_secs(u64::from(b % day));
            let first_utc = first.to_offset(UtcOffset::UTC);
            let second_utc = second.to_offset(UtcOffset::UTC);
            !is_new_day(first_utc, second) && !is_new_day(second_utc, first)
        }

        fn date_label_has_fixed_width(date: Date) -> bool {
            DateLabel(date).to_string().len() == 8
        }
    }
}
