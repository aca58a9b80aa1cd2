use crate::error::CommonError;
use crate::interval::{
    Interval, DAYS_PER_WEEK, HOURS_PER_DAY, MINS_PER_HOUR, NANOS_PER_MICRO, NANOS_PER_MILLI,
    NANOS_PER_SEC, SECS_PER_MIN,
};

/// Lets a plain number act as a duration literal: `3_i64.hours()`, `1.5_f64.seconds()`.
///
/// Implementors only provide [`IntervalConvertible::nanoseconds`]; every other unit is
/// derived from it by a fixed multiplier. Singular and plural spellings return the same
/// value. Unsuffixed literals need a type, `(-1).hour()` does not compile but
/// `(-1_i32).hour()` does.
pub trait IntervalConvertible: Copy {
    /// The number read as a nanosecond count.
    fn nanoseconds(self) -> Interval;

    fn nanosecond(self) -> Interval {
        self.nanoseconds()
    }

    fn microseconds(self) -> Interval {
        self.nanoseconds().multiplying(NANOS_PER_MICRO)
    }

    fn microsecond(self) -> Interval {
        self.microseconds()
    }

    fn milliseconds(self) -> Interval {
        self.nanoseconds().multiplying(NANOS_PER_MILLI)
    }

    fn millisecond(self) -> Interval {
        self.milliseconds()
    }

    fn seconds(self) -> Interval {
        self.nanoseconds().multiplying(NANOS_PER_SEC)
    }

    fn second(self) -> Interval {
        self.seconds()
    }

    fn minutes(self) -> Interval {
        self.seconds().multiplying(SECS_PER_MIN)
    }

    fn minute(self) -> Interval {
        self.minutes()
    }

    fn hours(self) -> Interval {
        self.minutes().multiplying(MINS_PER_HOUR)
    }

    fn hour(self) -> Interval {
        self.hours()
    }

    fn days(self) -> Interval {
        self.hours().multiplying(HOURS_PER_DAY)
    }

    fn day(self) -> Interval {
        self.days()
    }

    fn weeks(self) -> Interval {
        self.days().multiplying(DAYS_PER_WEEK)
    }

    fn week(self) -> Interval {
        self.weeks()
    }
}

macro_rules! impl_interval_convertible {
    ($($numeric:ty),* $(,)?) => {
        $(
            impl IntervalConvertible for $numeric {
                fn nanoseconds(self) -> Interval {
                    Interval::new(self as f64)
                }
            }
        )*
    };
}

impl_interval_convertible!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64
);

/// Builds an interval from a value and a unit name such as `"ms"`, `"minute"` or `"Hours"`.
pub fn interval_from_unit(value: f64, unit: &str) -> Result<Interval, CommonError> {
    let interval = match unit.trim().to_ascii_lowercase().as_str() {
        "ns" | "nanosecond" | "nanoseconds" => value.nanoseconds(),
        "us" | "µs" | "microsecond" | "microseconds" => value.microseconds(),
        "ms" | "millisecond" | "milliseconds" => value.milliseconds(),
        "s" | "sec" | "second" | "seconds" => value.seconds(),
        "m" | "min" | "minute" | "minutes" => value.minutes(),
        "h" | "hour" | "hours" => value.hours(),
        "d" | "day" | "days" => value.days(),
        "w" | "week" | "weeks" => value.weeks(),
        other => {
            return Err(CommonError::invalid_argument(format!(
                "unknown interval unit '{}'",
                other
            )))
        }
    };
    Ok(interval)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_singular_and_plural_agree() {
        assert_eq!(1_i64.nanosecond(), 1_i64.nanoseconds());
        assert_eq!(1_i64.microsecond(), 1_i64.microseconds());
        assert_eq!(1_i64.millisecond(), 1_i64.milliseconds());
        assert_eq!(1_i64.second(), 1_i64.seconds());
        assert_eq!(1_i64.minute(), 1_i64.minutes());
        assert_eq!(1_i64.hour(), 1_i64.hours());
        assert_eq!(1_i64.day(), 1_i64.days());
        assert_eq!(1_i64.week(), 1_i64.weeks());
    }

    #[test]
    fn test_unit_ladder() {
        assert_eq!(1_u8.nanoseconds().nanoseconds(), 1.0);
        assert_eq!(1_u16.microseconds().nanoseconds(), 1e3);
        assert_eq!(1_u32.milliseconds().nanoseconds(), 1e6);
        assert_eq!(1_u64.seconds().nanoseconds(), 1e9);
        assert_eq!(1_i8.minutes().nanoseconds(), 6e10);
        assert_eq!(1_i16.hours().nanoseconds(), 3.6e12);
        assert_eq!(1_i32.days().nanoseconds(), 8.64e13);
        assert_eq!(1_usize.weeks().nanoseconds(), 6.048e14);
    }

    #[test]
    fn test_matches_interval_constructors() {
        assert_eq!(1_i32.hour(), Interval::from_hours(1.0));
        assert_eq!(60_i32.minutes(), Interval::from_minutes(60.0));
        assert_eq!(3600_i32.seconds(), Interval::from_seconds(3600.0));
        assert_eq!(2.5_f64.days(), Interval::from_days(2.5));
        assert_eq!(0.5_f32.weeks(), Interval::from_weeks(0.5));
    }

    #[test]
    fn test_arithmetic_on_literals() {
        assert_eq!(1_i32.hour() * 2.0, 2_i32.hours());
        assert_eq!(2_i32.hours() - 1_i32.hour(), 1_i32.hour());
        assert_eq!(30_i32.minutes() + 30_i32.minutes(), 1_i32.hour());
        assert!((-1_i32).hour().is_longer(&30_i32.minutes()));
        assert_eq!(Interval::longest(1_i32.hour(), [3_i32.hours(), 2_i32.hours()]), 3_i32.hours());
        assert_eq!(Interval::shortest(1_i32.hour(), [3_i32.hours(), 2_i32.hours()]), 1_i32.hour());
    }

    #[test]
    fn test_negative_and_fractional_values() {
        assert!((-5_i64).minutes().is_negative());
        assert_eq!((-5_i64).minutes(), 5_i64.minutes().opposite());
        assert_eq!(0.5_f64.seconds(), 500_i32.milliseconds());
        assert_eq!(1.5_f64.microseconds().nanoseconds(), 1_500.0);
    }

    #[test]
    fn test_large_integers_are_exact_within_mantissa() {
        let max_exact: i64 = 1 << 53;
        assert_eq!(max_exact.nanoseconds().nanoseconds(), 9_007_199_254_740_992.0);
        assert_eq!(u128::from(u64::MAX).nanoseconds().nanoseconds(), u64::MAX as f64);
    }

    #[test]
    fn test_interval_from_unit() {
        assert_eq!(interval_from_unit(500.0, "ms").unwrap(), 500_i32.milliseconds());
        assert_eq!(interval_from_unit(2.0, "Hours").unwrap(), 2_i32.hours());
        assert_eq!(interval_from_unit(1.0, " week ").unwrap(), 1_i32.week());
        assert_eq!(interval_from_unit(-3.0, "s").unwrap(), (-3_i32).seconds());
        assert_eq!(interval_from_unit(7.0, "ns").unwrap(), 7_i32.nanoseconds());
        assert!(matches!(
            interval_from_unit(1.0, "fortnight"),
            Err(CommonError::InvalidArgument(_))
        ));
    }
}
