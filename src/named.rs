// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Name- and ownership-aware wrapper around SemaphoreHandle.

use std::mem::ManuallyDrop;
use std::ptr;
use std::time::{Duration, SystemTime};

use crate::error::Result;
use crate::handle::SemaphoreHandle;
use crate::options::{OpenFlags, SemaphoreOptions};

/// A named semaphore together with its name.
///
/// `OWNING` decides what happens on drop:
///
/// - `true` ([`OwnedSemaphore`]): the name is unlinked from the OS namespace.
///   If that fails the error is logged and the process aborts; a stale
///   kernel-visible semaphore is not left behind silently.
/// - `false` ([`SharedSemaphore`]): only the local handle is closed.
///
/// The type is move-only. Assigning over an owning value drops the old one
/// first, so its name is unlinked before the new name and handle move in.
#[derive(Debug)]
pub struct NamedSemaphore<const OWNING: bool> {
    name: String,
    handle: SemaphoreHandle,
}

/// Unlinks its name on drop.
pub type OwnedSemaphore = NamedSemaphore<true>;

/// Closes its handle on drop and leaves the name in place.
pub type SharedSemaphore = NamedSemaphore<false>;

impl<const OWNING: bool> NamedSemaphore<OWNING> {
    /// Open (or create, depending on `options.flags`) the semaphore `name`.
    pub fn open(name: &str, options: &SemaphoreOptions) -> Result<Self> {
        let handle = SemaphoreHandle::open(name, options)?;
        Ok(Self {
            name: name.to_string(),
            handle,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether dropping this value unlinks the name.
    pub const fn is_owning(&self) -> bool {
        OWNING
    }

    pub fn handle(&self) -> &SemaphoreHandle {
        &self.handle
    }

    pub fn wait(&self) -> Result<()> {
        self.handle.wait()
    }

    pub fn try_wait(&self) -> Result<bool> {
        self.handle.try_wait()
    }

    pub fn try_wait_for(&self, timeout: Duration) -> Result<bool> {
        self.handle.try_wait_for(timeout)
    }

    pub fn try_wait_until(&self, deadline: SystemTime) -> Result<bool> {
        self.handle.try_wait_until(deadline)
    }

    pub fn post(&self) -> Result<()> {
        self.handle.post()
    }

    pub fn post_n(&self, count: u32) -> Result<()> {
        self.handle.post_n(count)
    }
}

impl OwnedSemaphore {
    /// Create the semaphore `name` with `initial_count`, or open it if it
    /// already exists. The returned value owns the name.
    pub fn create(name: &str, initial_count: u32) -> Result<Self> {
        Self::open(name, &SemaphoreOptions::new().initial_count(initial_count))
    }

    /// Give up responsibility for unlinking without unlinking.
    pub fn disown(self) -> SharedSemaphore {
        let this = ManuallyDrop::new(self);
        // Safety: `this` is never dropped, so each field is moved out exactly once.
        let (name, handle) = unsafe { (ptr::read(&this.name), ptr::read(&this.handle)) };
        NamedSemaphore { name, handle }
    }
}

impl SharedSemaphore {
    /// Open an existing semaphore. Fails with `ENOENT` if `name` is not present.
    pub fn open_existing(name: &str) -> Result<Self> {
        Self::open(name, &SemaphoreOptions::new().flags(OpenFlags::Open))
    }
}

impl<const OWNING: bool> Drop for NamedSemaphore<OWNING> {
    fn drop(&mut self) {
        if !OWNING {
            return;
        }
        match SemaphoreHandle::unlink(&self.name) {
            Ok(()) => tracing::debug!(name = %self.name, "owned semaphore released"),
            Err(e) => {
                tracing::error!(
                    name = %self.name,
                    code = ?e.code(),
                    error = %e,
                    "failed to unlink owned semaphore, aborting"
                );
                std::process::abort();
            }
        }
    }
}
