//! This crate provides a signed, nanosecond precision [`Interval`] type, a conversion trait
//! that turns plain numbers into intervals, wall-clock arithmetic on [`DateTime`] and the
//! adapter that arms a timer `interval` from now.
//!
//! # Usage
//!
//! ```
//! use timekeeping::{Interval, IntervalConvertible};
//!
//! let total = 1_i32.hour() + 30_i32.minutes();
//! assert_eq!(total, Interval::from_minutes(90.0));
//! assert!((-2_i32).hours().is_longer(&total));
//! ```
//!
//! A negative interval handed to [`timer::schedule_after`] arms the timer with
//! [`timer::Deadline::NEVER`]: it means "do not fire", not "fire immediately".

pub mod convertible;
pub mod error;
pub mod interval;
pub mod time;
pub mod timer;
#[cfg(target_os = "linux")]
pub mod timer_fd;

pub use convertible::IntervalConvertible;
pub use error::CommonError;
pub use interval::Interval;
pub use time::DateTime;

#[macro_export]
macro_rules! assert_approx_eq {
    ($a:expr, $b:expr, $epsilon:expr) => {{
        let (a, b, eps) = (&$a, &$b, &$epsilon);
        assert!(
            (*a - *b).abs() < *eps,
            "{:?} is not approximately equal to {:?} (epsilon = {:?})",
            *a,
            *b,
            *eps
        );
    }};
}

/// Calls a libc function, returning early with the OS error when it reports `-1`.
#[macro_export]
macro_rules! libc_call {
    ($name:ident($($arg_name:expr),*)) => (unsafe {
        let result = libc::$name($($arg_name),*);
        if result == -1 {
            return Err(std::io::Error::last_os_error().into());
        }
        result
    })
}
