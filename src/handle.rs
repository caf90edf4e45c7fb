// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Cross-platform named semaphore handle.
// Delegates to platform::PlatformSemaphore (POSIX or Windows).

use std::fmt;
use std::time::{Duration, SystemTime};

use crate::error::{Result, SemaphoreError};
use crate::options::{OpenFlags, SemaphoreOptions};
use crate::platform::PlatformSemaphore;

/// One open handle to a named, process-shareable counting semaphore.
///
/// Dropping the handle closes the local reference only. The kernel object
/// stays reachable by name until [`SemaphoreHandle::unlink`] removes it.
///
/// Interrupted syscalls (`EINTR`) are retried inside every primitive, so
/// callers never see spurious interruption errors.
pub struct SemaphoreHandle {
    inner: PlatformSemaphore,
}

impl SemaphoreHandle {
    /// Open or create the semaphore `name`.
    ///
    /// `initial_count` is used only if this call creates the object.
    pub fn open_or_create(
        name: &str,
        flags: OpenFlags,
        mode: u32,
        initial_count: u32,
    ) -> Result<Self> {
        check_name(name)?;
        let inner = PlatformSemaphore::open(name, flags, mode, initial_count)
            .map_err(|e| SemaphoreError::os("sem_open", e))?;
        tracing::debug!(name, ?flags, mode, initial_count, "semaphore opened");
        Ok(Self { inner })
    }

    /// Open with a [`SemaphoreOptions`] set.
    pub fn open(name: &str, options: &SemaphoreOptions) -> Result<Self> {
        Self::open_or_create(name, options.flags, options.mode, options.initial_count)
    }

    /// Block until the count is positive, then decrement it.
    pub fn wait(&self) -> Result<()> {
        self.inner
            .wait()
            .map_err(|e| SemaphoreError::os("sem_wait", e))
    }

    /// Decrement without blocking.
    /// Returns `Ok(false)` if the count was zero.
    pub fn try_wait(&self) -> Result<bool> {
        self.inner
            .try_wait()
            .map_err(|e| SemaphoreError::os("sem_trywait", e))
    }

    /// Wait until the count is positive or `deadline` passes.
    /// Returns `Ok(false)` on timeout.
    pub fn try_wait_until(&self, deadline: SystemTime) -> Result<bool> {
        self.inner
            .timed_wait(deadline)
            .map_err(|e| SemaphoreError::os("sem_timedwait", e))
    }

    /// Wait at most `timeout`. Returns `Ok(false)` on timeout.
    ///
    /// The deadline is `now + timeout`, read just before waiting, so it is
    /// approximate by the scheduling delay between the two steps. A timeout
    /// too large to represent waits without bound.
    pub fn try_wait_for(&self, timeout: Duration) -> Result<bool> {
        match SystemTime::now().checked_add(timeout) {
            Some(deadline) => self.try_wait_until(deadline),
            None => self.wait().map(|()| true),
        }
    }

    /// Increment the count, waking at most one waiter.
    pub fn post(&self) -> Result<()> {
        self.inner
            .post()
            .map_err(|e| SemaphoreError::os("sem_post", e))
    }

    /// Post `count` times. Stops at the first failure.
    pub fn post_n(&self, count: u32) -> Result<()> {
        for _ in 0..count {
            self.post()?;
        }
        Ok(())
    }

    /// Remove `name` from the OS namespace.
    ///
    /// Later opens of `name` no longer find the old object; handles that are
    /// already open keep working until closed.
    pub fn unlink(name: &str) -> Result<()> {
        check_name(name)?;
        PlatformSemaphore::unlink(name).map_err(|e| SemaphoreError::os("sem_unlink", e))?;
        tracing::debug!(name, "semaphore unlinked");
        Ok(())
    }

    /// Best-effort unlink that ignores every error.
    pub fn clear_storage(name: &str) {
        let _ = Self::unlink(name);
    }
}

impl fmt::Debug for SemaphoreHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SemaphoreHandle").finish_non_exhaustive()
    }
}

fn check_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(SemaphoreError::invalid_name(name, "name is empty"));
    }
    if name.contains('\0') {
        return Err(SemaphoreError::invalid_name(name, "name contains a NUL byte"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_name_rejected_before_syscall() {
        let err = SemaphoreHandle::open_or_create("", OpenFlags::CreateOrOpen, 0o666, 0)
            .err()
            .expect("empty name must fail");
        assert!(matches!(err, SemaphoreError::InvalidName { .. }));
    }

    #[test]
    fn nul_name_rejected() {
        let err = SemaphoreHandle::unlink("bad\0name").expect_err("NUL must fail");
        assert!(matches!(err, SemaphoreError::InvalidName { .. }));
    }
}
