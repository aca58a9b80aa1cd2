use core::hash::{Hash, Hasher};
use core::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use core::time::Duration;

use crate::error::CommonError;
use crate::time::DateTime;

/// Number of nanoseconds in 1 microsecond
pub const NANOS_PER_MICRO: f64 = 1_000.0;
/// Number of nanoseconds in 1 millisecond
pub const NANOS_PER_MILLI: f64 = 1_000_000.0;
/// Number of nanoseconds in 1 second
pub const NANOS_PER_SEC: f64 = 1_000_000_000.0;
pub const SECS_PER_MIN: f64 = 60.0;
pub const MINS_PER_HOUR: f64 = 60.0;
pub const HOURS_PER_DAY: f64 = 24.0;
pub const DAYS_PER_WEEK: f64 = 7.0;

/// A signed span of elapsed time, stored as a floating point nanosecond count.
///
/// The sign carries the direction: a positive interval points into the future, a negative
/// one into the past. Intervals have no calendar meaning, a day is always 24 hours.
///
/// Equality is exact `f64` equality of the nanosecond count. Values produced by long
/// arithmetic chains may accumulate rounding error and should not be compared for equality
/// against literals.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
pub struct Interval {
    nanoseconds: f64,
}

impl Interval {
    pub const ZERO: Interval = Interval { nanoseconds: 0.0 };

    pub const fn new(nanoseconds: f64) -> Self {
        Self { nanoseconds }
    }

    pub const fn from_nanoseconds(nanoseconds: f64) -> Self {
        Self::new(nanoseconds)
    }

    pub fn from_seconds(seconds: f64) -> Self {
        Self::new(seconds * NANOS_PER_SEC)
    }

    pub fn from_minutes(minutes: f64) -> Self {
        Self::from_seconds(minutes).multiplying(SECS_PER_MIN)
    }

    pub fn from_hours(hours: f64) -> Self {
        Self::from_minutes(hours).multiplying(MINS_PER_HOUR)
    }

    pub fn from_days(days: f64) -> Self {
        Self::from_hours(days).multiplying(HOURS_PER_DAY)
    }

    pub fn from_weeks(weeks: f64) -> Self {
        Self::from_days(weeks).multiplying(DAYS_PER_WEEK)
    }

    pub fn nanoseconds(&self) -> f64 {
        self.nanoseconds
    }

    pub fn microseconds(&self) -> f64 {
        self.nanoseconds / NANOS_PER_MICRO
    }

    pub fn milliseconds(&self) -> f64 {
        self.nanoseconds / NANOS_PER_MILLI
    }

    pub fn seconds(&self) -> f64 {
        self.nanoseconds / NANOS_PER_SEC
    }

    pub fn minutes(&self) -> f64 {
        self.seconds() / SECS_PER_MIN
    }

    pub fn hours(&self) -> f64 {
        self.minutes() / MINS_PER_HOUR
    }

    pub fn days(&self) -> f64 {
        self.hours() / HOURS_PER_DAY
    }

    pub fn weeks(&self) -> f64 {
        self.days() / DAYS_PER_WEEK
    }

    /// Absolute value of the nanosecond count.
    pub fn magnitude(&self) -> f64 {
        self.nanoseconds.abs()
    }

    pub fn opposite(&self) -> Interval {
        Interval::new(-self.nanoseconds)
    }

    /// True only for a count strictly below zero. `-0.0` and NaN are not negative.
    pub fn is_negative(&self) -> bool {
        self.nanoseconds < 0.0
    }

    /// True only for a count strictly above zero. NaN is not positive.
    pub fn is_positive(&self) -> bool {
        self.nanoseconds > 0.0
    }

    /// Compares magnitudes, so `-3h` is longer than `1h`.
    pub fn is_longer(&self, than: &Interval) -> bool {
        self.magnitude() > than.magnitude()
    }

    /// Compares magnitudes, so `-1m` is shorter than `1h`.
    pub fn is_shorter(&self, than: &Interval) -> bool {
        self.magnitude() < than.magnitude()
    }

    /// Returns the interval with the greatest magnitude.
    ///
    /// Ties go to the earliest argument: `first` beats every element of `rest`, and an
    /// element of `rest` only replaces the current pick when it is strictly longer. A NaN
    /// element never replaces an earlier one.
    pub fn longest(first: Interval, rest: impl IntoIterator<Item = Interval>) -> Interval {
        rest.into_iter().fold(first, |longest, candidate| {
            if candidate.is_longer(&longest) {
                candidate
            } else {
                longest
            }
        })
    }

    /// Returns the interval with the smallest magnitude, ties going to the earliest argument.
    pub fn shortest(first: Interval, rest: impl IntoIterator<Item = Interval>) -> Interval {
        rest.into_iter().fold(first, |shortest, candidate| {
            if candidate.is_shorter(&shortest) {
                candidate
            } else {
                shortest
            }
        })
    }

    /// Same as [`Interval::longest`] over a possibly empty sequence.
    pub fn longest_of(
        intervals: impl IntoIterator<Item = Interval>,
    ) -> Result<Interval, CommonError> {
        let mut intervals = intervals.into_iter();
        let first = intervals.next().ok_or_else(|| {
            CommonError::invalid_argument("longest requires at least one interval")
        })?;
        Ok(Self::longest(first, intervals))
    }

    /// Same as [`Interval::shortest`] over a possibly empty sequence.
    pub fn shortest_of(
        intervals: impl IntoIterator<Item = Interval>,
    ) -> Result<Interval, CommonError> {
        let mut intervals = intervals.into_iter();
        let first = intervals.next().ok_or_else(|| {
            CommonError::invalid_argument("shortest requires at least one interval")
        })?;
        Ok(Self::shortest(first, intervals))
    }

    pub fn multiplying(&self, multiplier: f64) -> Interval {
        Interval::new(self.nanoseconds * multiplier)
    }

    pub fn adding(&self, other: Interval) -> Interval {
        Interval::new(self.nanoseconds + other.nanoseconds)
    }

    pub fn subtracting(&self, other: Interval) -> Interval {
        Interval::new(self.nanoseconds - other.nanoseconds)
    }

    /// The wall-clock time this interval from now.
    pub fn later(&self) -> DateTime {
        DateTime::utc_now().adding(*self)
    }

    /// The wall-clock time this interval before now.
    pub fn ago(&self) -> DateTime {
        DateTime::utc_now().adding(self.opposite())
    }
}

impl Hash for Interval {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // 0.0 and -0.0 compare equal
        let bits = if self.nanoseconds == 0.0 {
            0
        } else {
            self.nanoseconds.to_bits()
        };
        bits.hash(state);
    }
}

impl Add for Interval {
    type Output = Interval;

    fn add(self, other: Interval) -> Interval {
        self.adding(other)
    }
}

impl AddAssign for Interval {
    fn add_assign(&mut self, other: Interval) {
        *self = self.adding(other);
    }
}

impl Sub for Interval {
    type Output = Interval;

    fn sub(self, other: Interval) -> Interval {
        self.subtracting(other)
    }
}

impl SubAssign for Interval {
    fn sub_assign(&mut self, other: Interval) {
        *self = self.subtracting(other);
    }
}

impl Mul<f64> for Interval {
    type Output = Interval;

    fn mul(self, multiplier: f64) -> Interval {
        self.multiplying(multiplier)
    }
}

impl Mul<Interval> for f64 {
    type Output = Interval;

    fn mul(self, interval: Interval) -> Interval {
        interval.multiplying(self)
    }
}

impl Neg for Interval {
    type Output = Interval;

    fn neg(self) -> Interval {
        self.opposite()
    }
}

impl From<Duration> for Interval {
    fn from(duration: Duration) -> Self {
        Interval::new(duration.as_nanos() as f64)
    }
}

impl TryFrom<Interval> for Duration {
    type Error = CommonError;

    /// Fails for negative, NaN and infinite intervals. Fractional nanoseconds are truncated
    /// and finite values beyond `Duration::MAX` saturate.
    fn try_from(interval: Interval) -> Result<Self, CommonError> {
        let nanos = interval.nanoseconds();
        if !nanos.is_finite() || nanos < 0.0 {
            return Err(CommonError::invalid_argument(format!(
                "{} ns has no Duration equivalent",
                nanos
            )));
        }
        let total = nanos as u128;
        let secs = total / 1_000_000_000;
        if secs > u64::MAX as u128 {
            return Ok(Duration::MAX);
        }
        Ok(Duration::new(secs as u64, (total % 1_000_000_000) as u32))
    }
}
