use crate::interval::Interval;
use core::fmt::{self};
use core::ops::{Add, AddAssign, Sub};
use libc::{clock_gettime, timespec, CLOCK_REALTIME};
use serde::Serializer;

/// Number of nanoseconds in 1 second
const NSECS_PER_SEC: i128 = 1_000_000_000;
const SECS_PER_DAY: i64 = 86_400;

/// A point on the wall clock, as seconds and nanoseconds since the Unix epoch.
///
/// `nanos` is always below one second, so points before the epoch carry a negative `sec`
/// and a positive `nanos`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateTime {
    sec: i64,
    nanos: u32,
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let days = self.sec.div_euclid(SECS_PER_DAY);
        let secs_of_day = self.sec.rem_euclid(SECS_PER_DAY);
        let (year, month, day) = civil_from_days(days);

        f.write_fmt(format_args!(
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}.{:09}Z",
            year,
            month,
            day,
            secs_of_day / 3600,
            (secs_of_day % 3600) / 60,
            secs_of_day % 60,
            self.nanos
        ))
    }
}

impl serde::Serialize for DateTime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// Converts days since 1970-01-01 to a proleptic Gregorian (year, month, day).
fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}

impl DateTime {
    pub const UNIX_EPOCH: DateTime = DateTime { sec: 0, nanos: 0 };

    pub fn utc_now() -> DateTime {
        let mut ts: timespec = timespec {
            tv_sec: 0,
            tv_nsec: 0,
        };

        // CLOCK_REALTIME is always available, the call cannot fail with a valid pointer
        unsafe { clock_gettime(CLOCK_REALTIME, &mut ts) };
        DateTime::from_timespec(ts)
    }

    /// Seconds since the epoch as a float, precise to about a microsecond today.
    pub fn timestamp(&self) -> f64 {
        self.interval_since(&DateTime::UNIX_EPOCH).seconds()
    }

    pub fn get_sec(&self) -> i64 {
        self.sec
    }

    pub fn get_nanos(&self) -> u32 {
        self.nanos
    }

    /// Builds a point from nanoseconds since the epoch, saturating at the range of `i64`
    /// seconds.
    pub fn from_nanos(nanos: i128) -> DateTime {
        let sec = nanos.div_euclid(NSECS_PER_SEC);
        if sec > i64::MAX as i128 {
            return DateTime {
                sec: i64::MAX,
                nanos: 999_999_999,
            };
        }
        if sec < i64::MIN as i128 {
            return DateTime {
                sec: i64::MIN,
                nanos: 0,
            };
        }
        DateTime {
            sec: sec as i64,
            nanos: nanos.rem_euclid(NSECS_PER_SEC) as u32,
        }
    }

    pub fn as_nanos(&self) -> i128 {
        self.sec as i128 * NSECS_PER_SEC + self.nanos as i128
    }

    pub fn from_timespec(ts: timespec) -> DateTime {
        DateTime::from_nanos(ts.tv_sec as i128 * NSECS_PER_SEC + ts.tv_nsec as i128)
    }

    /// `self - other`; negative when `self` is the earlier point.
    pub fn interval_since(&self, other: &DateTime) -> Interval {
        Interval::new((self.as_nanos() - other.as_nanos()) as f64)
    }

    /// Interval between this point and a fresh clock reading.
    pub fn interval_since_now(&self) -> Interval {
        self.interval_since(&DateTime::utc_now())
    }

    /// Shifts the point by `interval`, rounded to whole nanoseconds. Infinite intervals
    /// saturate at the representable range and NaN leaves the point unchanged.
    pub fn adding(&self, interval: Interval) -> DateTime {
        let shift = interval.nanoseconds().round() as i128;
        DateTime::from_nanos(self.as_nanos().saturating_add(shift))
    }

    pub fn subtracting(&self, interval: Interval) -> DateTime {
        self.adding(interval.opposite())
    }
}

impl Add<Interval> for DateTime {
    type Output = DateTime;

    fn add(self, other: Interval) -> DateTime {
        self.adding(other)
    }
}

impl AddAssign<Interval> for DateTime {
    fn add_assign(&mut self, other: Interval) {
        *self = self.adding(other);
    }
}

impl Sub<Interval> for DateTime {
    type Output = DateTime;

    fn sub(self, other: Interval) -> DateTime {
        self.subtracting(other)
    }
}

impl Sub<DateTime> for DateTime {
    type Output = Interval;

    fn sub(self, other: DateTime) -> Interval {
        self.interval_since(&other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_approx_eq;
    use crate::convertible::IntervalConvertible;

    #[test]
    fn test_from_nanos_splits_seconds() {
        let dt = DateTime::from_nanos(1_500_000_000);
        assert_eq!(dt.get_sec(), 1);
        assert_eq!(dt.get_nanos(), 500_000_000);

        let before_epoch = DateTime::from_nanos(-1);
        assert_eq!(before_epoch.get_sec(), -1);
        assert_eq!(before_epoch.get_nanos(), 999_999_999);
        assert_eq!(before_epoch.as_nanos(), -1);
    }

    #[test]
    fn test_from_nanos_saturates() {
        let max = DateTime::from_nanos(i128::MAX);
        assert_eq!(max.get_sec(), i64::MAX);
        let min = DateTime::from_nanos(i128::MIN);
        assert_eq!(min.get_sec(), i64::MIN);
    }

    #[test]
    fn test_interval_since_follows_subtraction_order() {
        let earlier = DateTime::from_nanos(1_000);
        let later = DateTime::from_nanos(4_000);
        assert_eq!(later.interval_since(&earlier), 3_000_i32.nanoseconds());
        assert_eq!(earlier.interval_since(&later), (-3_000_i32).nanoseconds());
        assert_eq!(later - earlier, 3_i32.microseconds());
    }

    #[test]
    fn test_adding_moves_forward_and_backward() {
        let start = DateTime::from_nanos(10_000_000_000);
        assert_eq!(start + 2_i32.seconds(), DateTime::from_nanos(12_000_000_000));
        assert_eq!(start + (-2_i32).seconds(), DateTime::from_nanos(8_000_000_000));
        assert_eq!(start - 2_i32.seconds(), DateTime::from_nanos(8_000_000_000));
        assert_eq!(start.adding(1.4_f64.nanoseconds()), DateTime::from_nanos(10_000_000_001));

        let mut moving = start;
        moving += 1_i32.minute();
        assert_eq!(moving.interval_since(&start), 1_i32.minute());
    }

    #[test]
    fn test_adding_non_finite_intervals() {
        let start = DateTime::from_nanos(0);
        assert_eq!(start.adding(Interval::new(f64::NAN)), start);
        assert_eq!(start.adding(Interval::new(f64::INFINITY)).get_sec(), i64::MAX);
        assert_eq!(start.adding(Interval::new(f64::NEG_INFINITY)).get_sec(), i64::MIN);
    }

    #[test]
    fn test_interval_since_now_sign() {
        let past = DateTime::utc_now() - 1_i32.hour();
        let since = past.interval_since_now();
        assert!(since.is_negative());
        assert_approx_eq!(since.hours(), -1.0, 1e-3);
    }

    #[test]
    fn test_display_is_rfc3339() {
        assert_eq!(
            DateTime::UNIX_EPOCH.to_string(),
            "1970-01-01T00:00:00.000000000Z"
        );
        assert_eq!(
            DateTime::from_nanos(951_782_400_123_456_789).to_string(),
            "2000-02-29T00:00:00.123456789Z"
        );
        assert_eq!(
            DateTime::from_nanos(-1_000_000_000).to_string(),
            "1969-12-31T23:59:59.000000000Z"
        );
    }

    #[test]
    fn test_serializes_as_string() {
        let json = serde_json::to_string(&DateTime::UNIX_EPOCH).unwrap();
        assert_eq!(json, "\"1970-01-01T00:00:00.000000000Z\"");
    }

    #[test]
    fn test_timestamp_in_seconds() {
        assert_eq!(DateTime::UNIX_EPOCH.timestamp(), 0.0);
        assert_eq!(DateTime::from_nanos(1_500_000_000).timestamp(), 1.5);
        assert_eq!(DateTime::from_nanos(-250_000_000).timestamp(), -0.25);
        let now = DateTime::utc_now();
        assert_approx_eq!(now.timestamp(), now.get_sec() as f64, 1.0);
    }
}
