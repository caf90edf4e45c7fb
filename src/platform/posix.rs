// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// POSIX implementation of named semaphores (sem_open / sem_wait / sem_post).
// Every failing call reads errno through `io::Error::last_os_error()` before
// doing anything else.

use std::ffi::CString;
use std::io;
use std::time::SystemTime;

use crate::options::OpenFlags;
use crate::sem_name;

// ---------------------------------------------------------------------------
// Adaptive backoff for the macOS timed-wait emulation.
// ---------------------------------------------------------------------------

/// - k < 4:  busy spin (do nothing)
/// - k < 16: CPU pause hint
/// - k < 32: thread yield
/// - k >= 32: sleep 1ms
#[cfg(target_os = "macos")]
#[inline]
fn adaptive_yield(k: &mut u32) {
    if *k < 4 {
        // busy spin
    } else if *k < 16 {
        std::hint::spin_loop();
    } else if *k < 32 {
        std::thread::yield_now();
    } else {
        std::thread::sleep(std::time::Duration::from_millis(1));
        return;
    }
    *k += 1;
}

fn c_name_of(name: &str) -> io::Result<CString> {
    CString::new(sem_name::make_sem_name(name))
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))
}

// ---------------------------------------------------------------------------
// PlatformSemaphore — POSIX named semaphore
// ---------------------------------------------------------------------------

pub struct PlatformSemaphore {
    sem: *mut libc::sem_t,
}

// Safety: sem_t operations are thread-safe; the pointer is only closed in Drop.
unsafe impl Send for PlatformSemaphore {}
unsafe impl Sync for PlatformSemaphore {}

impl PlatformSemaphore {
    /// Open (or create) the named semaphore `name`.
    ///
    /// `mode` and `value` are passed to `sem_open` only when `flags` may
    /// create the object.
    pub fn open(name: &str, flags: OpenFlags, mode: u32, value: u32) -> io::Result<Self> {
        let c_name = c_name_of(name)?;
        let sem = if flags.may_create() {
            unsafe {
                libc::sem_open(
                    c_name.as_ptr(),
                    flags.as_oflag(),
                    mode as libc::c_uint,
                    value as libc::c_uint,
                )
            }
        } else {
            unsafe { libc::sem_open(c_name.as_ptr(), flags.as_oflag()) }
        };
        if sem == libc::SEM_FAILED {
            return Err(io::Error::last_os_error());
        }
        Ok(Self { sem })
    }

    /// Block until the count is positive, then decrement it.
    pub fn wait(&self) -> io::Result<()> {
        loop {
            if unsafe { libc::sem_wait(self.sem) } == 0 {
                return Ok(());
            }
            let err = io::Error::last_os_error();
            if err.raw_os_error() != Some(libc::EINTR) {
                return Err(err);
            }
        }
    }

    /// Decrement without blocking. `Ok(false)` when the count is zero.
    pub fn try_wait(&self) -> io::Result<bool> {
        loop {
            if unsafe { libc::sem_trywait(self.sem) } == 0 {
                return Ok(true);
            }
            let err = io::Error::last_os_error();
            match err.raw_os_error() {
                Some(libc::EAGAIN) => return Ok(false),
                Some(libc::EINTR) => continue,
                _ => return Err(err),
            }
        }
    }

    /// Wait until `deadline` (CLOCK_REALTIME). `Ok(false)` on timeout.
    #[cfg(not(target_os = "macos"))]
    pub fn timed_wait(&self, deadline: SystemTime) -> io::Result<bool> {
        let ts: libc::timespec = crate::timespec::from_system_time(deadline).into();
        loop {
            if unsafe { libc::sem_timedwait(self.sem, &ts) } == 0 {
                return Ok(true);
            }
            let err = io::Error::last_os_error();
            match err.raw_os_error() {
                Some(libc::ETIMEDOUT) => return Ok(false),
                // Absolute deadline: retrying after a signal keeps the same bound.
                Some(libc::EINTR) => continue,
                _ => return Err(err),
            }
        }
    }

    /// Wait until `deadline`. `Ok(false)` on timeout.
    ///
    /// macOS has no `sem_timedwait`; poll `sem_trywait` with adaptive backoff.
    #[cfg(target_os = "macos")]
    pub fn timed_wait(&self, deadline: SystemTime) -> io::Result<bool> {
        let mut k = 0u32;
        loop {
            if self.try_wait()? {
                return Ok(true);
            }
            if SystemTime::now() >= deadline {
                return Ok(false);
            }
            adaptive_yield(&mut k);
        }
    }

    /// Increment the count, waking at most one waiter.
    pub fn post(&self) -> io::Result<()> {
        if unsafe { libc::sem_post(self.sem) } != 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }

    /// Remove `name` from the semaphore namespace. Open handles stay valid.
    pub fn unlink(name: &str) -> io::Result<()> {
        let c_name = c_name_of(name)?;
        if unsafe { libc::sem_unlink(c_name.as_ptr()) } != 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }
}

impl Drop for PlatformSemaphore {
    fn drop(&mut self) {
        // Closes the local reference only; the kernel object lives until unlinked.
        unsafe { libc::sem_close(self.sem) };
    }
}
