use crate::{error::CommonError, interval::Interval, time::DateTime};
use core::time::Duration;

/// An absolute point on `CLOCK_REALTIME`, in nanoseconds since the Unix epoch.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Deadline {
    nanos: i64,
}

impl Deadline {
    /// The most distant deadline a timer can be armed with, 2262-04-11T23:47:16.854775807Z.
    /// Negative intervals are armed here so the timer never fires.
    pub const NEVER: Deadline = Deadline { nanos: i64::MAX };

    pub fn now() -> Self {
        DateTime::utc_now().into()
    }

    pub const fn from_nanos(nanos: i64) -> Self {
        Self { nanos }
    }

    pub fn as_nanos(&self) -> i64 {
        self.nanos
    }

    pub fn is_never(&self) -> bool {
        *self == Deadline::NEVER
    }

    /// Moves the deadline forward, stopping at [`Deadline::NEVER`].
    pub fn saturating_add_nanos(self, nanos: i64) -> Self {
        Self {
            nanos: self.nanos.saturating_add(nanos),
        }
    }

    pub fn to_date_time(&self) -> DateTime {
        DateTime::from_nanos(self.nanos as i128)
    }

    pub fn to_timespec(&self) -> libc::timespec {
        libc::timespec {
            tv_sec: self.nanos.div_euclid(1_000_000_000) as libc::time_t,
            tv_nsec: self.nanos.rem_euclid(1_000_000_000) as libc::c_long,
        }
    }
}

impl From<DateTime> for Deadline {
    fn from(dt: DateTime) -> Self {
        let nanos = dt.as_nanos().clamp(i64::MIN as i128, i64::MAX as i128);
        Deadline::from_nanos(nanos as i64)
    }
}

/// A timer that can be armed with an absolute wall-clock deadline.
pub trait TimerPrimitive {
    /// Arms the timer to fire at `deadline`, then every `period` if one is given. Replaces
    /// any previous arming.
    fn arm_at(&mut self, deadline: Deadline, period: Option<Duration>)
        -> Result<(), CommonError>;
    /// Arms the timer so that it never fires.
    fn arm_never(&mut self) -> Result<(), CommonError>;
}

/// Converts a nanosecond count to the integer unit timers use.
///
/// Returns `None` for negative and NaN counts, which must never fire. Everything else is
/// truncated toward zero and capped at `i64::MAX`, so `+inf` becomes `i64::MAX`.
pub fn clamp_nanoseconds(nanoseconds: f64) -> Option<i64> {
    if nanoseconds.is_nan() || nanoseconds < 0.0 {
        return None;
    }
    if nanoseconds >= i64::MAX as f64 {
        return Some(i64::MAX);
    }
    Some(nanoseconds as i64)
}

/// The deadline `interval` after `now`, or [`Deadline::NEVER`] for negative and NaN intervals.
pub fn deadline_after(interval: Interval, now: Deadline) -> Deadline {
    match clamp_nanoseconds(interval.nanoseconds()) {
        Some(nanos) => now.saturating_add_nanos(nanos),
        None => Deadline::NEVER,
    }
}

/// Arms `timer` to fire once, `interval` from now.
///
/// A negative interval means "do not fire", not "fire immediately": the timer is armed with
/// [`Deadline::NEVER`]. Returns the deadline handed to the timer.
pub fn schedule_after<T>(interval: Interval, timer: &mut T) -> Result<Deadline, CommonError>
where
    T: TimerPrimitive + ?Sized,
{
    arm(interval, None, timer)
}

/// Arms `timer` to fire `after` from now and then every `every`.
///
/// The first expiry follows [`schedule_after`]. A zero, negative or NaN `every` leaves a
/// one-shot timer.
pub fn schedule_repeating<T>(
    after: Interval,
    every: Interval,
    timer: &mut T,
) -> Result<Deadline, CommonError>
where
    T: TimerPrimitive + ?Sized,
{
    let period = clamp_nanoseconds(every.nanoseconds())
        .filter(|nanos| *nanos > 0)
        .map(|nanos| Duration::from_nanos(nanos as u64));
    if period.is_none() {
        log::warn!("Repeat interval {:?} has no period, arming once", every);
    }
    arm(after, period, timer)
}

fn arm<T>(
    interval: Interval,
    period: Option<Duration>,
    timer: &mut T,
) -> Result<Deadline, CommonError>
where
    T: TimerPrimitive + ?Sized,
{
    let deadline = deadline_after(interval, Deadline::now());
    if deadline.is_never() {
        log::debug!("Interval {:?} does not fire, arming never", interval);
        timer.arm_never()?;
        return Ok(deadline);
    }
    log::debug!(
        "Arming timer at {} (period {:?})",
        deadline.to_date_time(),
        period
    );
    timer.arm_at(deadline, period)?;
    Ok(deadline)
}
