//! Nanosecond-precision timestamps.
//!
//! [`Timestamp`] wraps a `u64` nanosecond count. Event timestamps are
//! assigned by the capture layer; [`Timestamp::now`] uses `CLOCK_MONOTONIC`
//! for low-overhead, NTP-drift-independent timing when the replay tool
//! measures its own latency.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Nanosecond-precision timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(pub u64);

impl Timestamp {
    /// Capture the current monotonic time as nanoseconds.
    ///
    /// Uses `clock_gettime(CLOCK_MONOTONIC)` where available; falls back to
    /// `std::time::SystemTime` elsewhere.
    #[inline]
    pub fn now() -> Self {
        #[cfg(any(target_os = "linux", target_os = "macos"))]
        {
            Self(monotonic_nanos())
        }
        #[cfg(not(any(target_os = "linux", target_os = "macos")))]
        {
            use std::time::{SystemTime, UNIX_EPOCH};
            let dur = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .expect("system clock before UNIX epoch");
            Self(dur.as_nanos() as u64)
        }
    }

    /// Create a timestamp from microseconds.
    #[inline]
    pub const fn from_micros(us: u64) -> Self {
        Self(us * 1_000)
    }

    /// Create a timestamp from milliseconds.
    #[inline]
    pub const fn from_millis(ms: u64) -> Self {
        Self(ms * 1_000_000)
    }

    /// Raw nanosecond value.
    #[inline]
    pub const fn as_nanos(&self) -> u64 {
        self.0
    }

    /// Nanoseconds elapsed from `earlier` to `self`.
    ///
    /// Saturates to `0` if `self` is before `earlier`; capture timestamps
    /// should not go backwards, but replay files are untrusted input.
    #[inline]
    pub const fn nanos_since(&self, earlier: Timestamp) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:09}", self.0 / 1_000_000_000, self.0 % 1_000_000_000)
    }
}

#[cfg(any(target_os = "linux", target_os = "macos"))]
fn monotonic_nanos() -> u64 {
    let mut ts = libc::timespec {
        tv_sec: 0,
        tv_nsec: 0,
    };
    // SAFETY: passing a valid pointer to a stack-allocated timespec.
    unsafe {
        libc::clock_gettime(libc::CLOCK_MONOTONIC, &mut ts);
    }
    ts.tv_sec as u64 * 1_000_000_000 + ts.tv_nsec as u64
}
