use core::time::Duration;
use mio::{event::Source, unix::SourceFd, Interest, Registry, Token};
use std::os::fd::{AsRawFd, RawFd};

use crate::{
    error::CommonError,
    libc_call,
    timer::{Deadline, TimerPrimitive},
};

/// A `timerfd` on `CLOCK_REALTIME`, armed with absolute deadlines.
///
/// The descriptor is non-blocking and becomes readable once the timer expires, so it can be
/// registered with a `mio::Poll`.
#[derive(Debug)]
pub struct TimerFd {
    fd: RawFd,
}

fn duration_to_timespec(duration: Duration) -> libc::timespec {
    libc::timespec {
        tv_sec: duration.as_secs() as libc::time_t,
        tv_nsec: duration.subsec_nanos() as libc::c_long,
    }
}

fn itimerspec_to_libc(deadline: Deadline, period: Option<Duration>) -> libc::itimerspec {
    let mut it_value = deadline.to_timespec();
    // An all-zero value disarms the timer, the epoch itself is long past anyway
    if it_value.tv_sec == 0 && it_value.tv_nsec == 0 {
        it_value.tv_nsec = 1;
    }
    libc::itimerspec {
        it_interval: duration_to_timespec(period.unwrap_or(Duration::ZERO)),
        it_value,
    }
}

impl TimerFd {
    pub fn new() -> Result<Self, CommonError> {
        let fd = libc_call!(timerfd_create(
            libc::CLOCK_REALTIME,
            libc::TFD_NONBLOCK | libc::TFD_CLOEXEC
        ));
        log::debug!("Created timerfd {}", fd);
        Ok(Self { fd })
    }

    fn settime(&mut self, flags: libc::c_int, spec: &libc::itimerspec) -> Result<(), CommonError> {
        libc_call!(timerfd_settime(self.fd, flags, spec, std::ptr::null_mut()));
        Ok(())
    }

    /// Stops the timer without closing it.
    pub fn disarm(&mut self) -> Result<(), CommonError> {
        let zero = libc::itimerspec {
            it_interval: duration_to_timespec(Duration::ZERO),
            it_value: duration_to_timespec(Duration::ZERO),
        };
        self.settime(0, &zero)
    }

    /// Time left until the next expiry, `None` when the timer is disarmed.
    pub fn remaining(&self) -> Result<Option<Duration>, CommonError> {
        let mut spec = libc::itimerspec {
            it_interval: duration_to_timespec(Duration::ZERO),
            it_value: duration_to_timespec(Duration::ZERO),
        };
        libc_call!(timerfd_gettime(self.fd, &mut spec));
        let remaining = Duration::new(
            spec.it_value.tv_sec as u64,
            spec.it_value.tv_nsec as u32,
        );
        if remaining.is_zero() {
            return Ok(None);
        }
        Ok(Some(remaining))
    }

    /// Number of expirations since the last read, `0` when none are pending.
    pub fn read_expirations(&mut self) -> Result<u64, CommonError> {
        let mut expirations: u64 = 0;
        let result = unsafe {
            libc::read(
                self.fd,
                &mut expirations as *mut u64 as *mut libc::c_void,
                std::mem::size_of::<u64>(),
            )
        };
        if result == -1 {
            let err = std::io::Error::last_os_error();
            if err.kind() == std::io::ErrorKind::WouldBlock {
                return Ok(0);
            }
            return Err(err.into());
        }
        Ok(expirations)
    }
}

impl TimerPrimitive for TimerFd {
    fn arm_at(&mut self, deadline: Deadline, period: Option<Duration>) -> Result<(), CommonError> {
        let spec = itimerspec_to_libc(deadline, period);
        self.settime(libc::TFD_TIMER_ABSTIME, &spec)
    }

    fn arm_never(&mut self) -> Result<(), CommonError> {
        self.arm_at(Deadline::NEVER, None)
    }
}

impl AsRawFd for TimerFd {
    fn as_raw_fd(&self) -> RawFd {
        self.fd
    }
}

impl Source for TimerFd {
    fn register(
        &mut self,
        registry: &Registry,
        token: Token,
        interests: Interest,
    ) -> std::io::Result<()> {
        SourceFd(&self.fd).register(registry, token, interests)
    }

    fn reregister(
        &mut self,
        registry: &Registry,
        token: Token,
        interests: Interest,
    ) -> std::io::Result<()> {
        SourceFd(&self.fd).reregister(registry, token, interests)
    }

    fn deregister(&mut self, registry: &Registry) -> std::io::Result<()> {
        SourceFd(&self.fd).deregister(registry)
    }
}

impl Drop for TimerFd {
    fn drop(&mut self) {
        if unsafe { libc::close(self.fd) } == -1 {
            log::warn!(
                "Failed to close timerfd {}: {}",
                self.fd,
                std::io::Error::last_os_error()
            );
        }
    }
}
