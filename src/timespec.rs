// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Absolute deadline conversion for timed semaphore waits.
// `sem_timedwait` takes a CLOCK_REALTIME timespec, so deadlines are
// expressed as `SystemTime`.

use std::time::{SystemTime, UNIX_EPOCH};

/// Seconds and nanoseconds since the Unix epoch.
///
/// `nanos` is always in `0..1_000_000_000`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timespec {
    pub secs: i64,
    pub nanos: u32,
}

impl Timespec {
    pub const EPOCH: Timespec = Timespec { secs: 0, nanos: 0 };
}

/// Split `t` into whole seconds and the sub-second remainder.
///
/// Both parts truncate toward the epoch. Instants before the epoch clamp to
/// [`Timespec::EPOCH`]: such a deadline has already passed, and a negative
/// `tv_nsec` would make the kernel reject the wait with `EINVAL`. Seconds
/// beyond `i64::MAX` saturate.
pub fn from_system_time(t: SystemTime) -> Timespec {
    match t.duration_since(UNIX_EPOCH) {
        Ok(d) => Timespec {
            secs: i64::try_from(d.as_secs()).unwrap_or(i64::MAX),
            nanos: d.subsec_nanos(),
        },
        Err(_) => Timespec::EPOCH,
    }
}

#[cfg(unix)]
impl From<Timespec> for libc::timespec {
    fn from(ts: Timespec) -> Self {
        // Zero-init: some targets carry padding fields in `timespec`.
        let mut out: libc::timespec = unsafe { std::mem::zeroed() };
        out.tv_sec = libc::time_t::try_from(ts.secs).unwrap_or(libc::time_t::MAX);
        out.tv_nsec = ts.nanos as libc::c_long;
        out
    }
}
